use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    #[error("invalid message: {reason}")]
    InvalidMessage { reason: String },
    #[error("invalid theme: {value}")]
    InvalidTheme { value: String },
}
