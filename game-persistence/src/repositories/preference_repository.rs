use anyhow::Result;
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};

use crate::entities::{prelude::*, preferences};
use game_core::PreferenceStore;

/// SQLite-backed key/value preferences.
pub struct PreferenceRepository {
    db: DatabaseConnection,
}

impl PreferenceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find(&self, key: &str) -> Result<Option<String>> {
        let model = Preferences::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(model.map(|m| m.value))
    }

    pub async fn upsert(&self, key: &str, value: &str) -> Result<()> {
        let model = preferences::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value.to_string()),
            updated_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        Preferences::insert(model)
            .on_conflict(
                OnConflict::column(preferences::Column::Key)
                    .update_columns([preferences::Column::Value, preferences::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for PreferenceRepository {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.find(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.upsert(key, value).await
    }
}
