use anyhow::{Result, anyhow};
use async_trait::async_trait;
use game_types::Theme;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

pub const DEFAULT_THEME_KEY: &str = "rps-theme";

/// Key-value capability used to remember the player's preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-local store. Values are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("preference store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("preference store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct ThemeController {
    theme: Theme,
    key: String,
    store: Arc<dyn PreferenceStore>,
}

impl ThemeController {
    /// Resolve the starting theme: the stored value when there is a valid
    /// one, otherwise `system_default`. Store errors are logged, not raised.
    pub async fn load(
        store: Arc<dyn PreferenceStore>,
        key: impl Into<String>,
        system_default: Theme,
    ) -> Self {
        let key = key.into();

        let theme = match store.get(&key).await {
            Ok(Some(value)) => match value.parse::<Theme>() {
                Ok(theme) => theme,
                Err(e) => {
                    debug!("Ignoring stored theme for '{}': {}", key, e);
                    system_default
                }
            },
            Ok(None) => system_default,
            Err(e) => {
                warn!("Failed to read theme preference '{}': {}", key, e);
                system_default
            }
        };

        Self { theme, key, store }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn toggle(&mut self) -> Theme {
        self.set_theme(self.theme.toggled()).await
    }

    pub async fn set_theme(&mut self, theme: Theme) -> Theme {
        self.theme = theme;
        if let Err(e) = self.store.set(&self.key, theme.as_str()).await {
            warn!("Failed to save theme preference '{}': {}", self.key, e);
        }
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    #[async_trait]
    impl PreferenceStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("storage unavailable"))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("storage unavailable"))
        }
    }

    #[tokio::test]
    async fn test_falls_back_to_system_preference() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let controller = ThemeController::load(store, DEFAULT_THEME_KEY, Theme::Light).await;
        assert_eq!(controller.theme(), Theme::Light);
    }

    #[tokio::test]
    async fn test_stored_value_wins() {
        let store = Arc::new(MemoryPreferenceStore::new());
        store.set(DEFAULT_THEME_KEY, "dark").await.unwrap();

        let controller = ThemeController::load(store, DEFAULT_THEME_KEY, Theme::Light).await;
        assert_eq!(controller.theme(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_garbage_value_ignored() {
        let store = Arc::new(MemoryPreferenceStore::new());
        store.set(DEFAULT_THEME_KEY, "purple").await.unwrap();

        let controller = ThemeController::load(store, DEFAULT_THEME_KEY, Theme::Dark).await;
        assert_eq!(controller.theme(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_toggle_twice_round_trips() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let mut controller =
            ThemeController::load(store.clone(), DEFAULT_THEME_KEY, Theme::Dark).await;

        assert_eq!(controller.toggle().await, Theme::Light);
        assert_eq!(
            store.get(DEFAULT_THEME_KEY).await.unwrap().as_deref(),
            Some("light")
        );

        assert_eq!(controller.toggle().await, Theme::Dark);
        assert_eq!(
            store.get(DEFAULT_THEME_KEY).await.unwrap().as_deref(),
            Some(controller.theme().as_str())
        );
    }

    #[tokio::test]
    async fn test_broken_store_is_not_fatal() {
        let mut controller =
            ThemeController::load(Arc::new(BrokenStore), DEFAULT_THEME_KEY, Theme::Light).await;
        assert_eq!(controller.theme(), Theme::Light);
        assert_eq!(controller.toggle().await, Theme::Dark);
        assert_eq!(controller.theme(), Theme::Dark);
    }
}
