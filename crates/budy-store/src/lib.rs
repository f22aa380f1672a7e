pub mod config;
pub mod file;
pub mod memory;

pub use config::{Config, Provider};
pub use file::{data_root, write_atomic, FileStorage};
pub use memory::MemoryStorage;

use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no stored value for key '{0}'")]
    NotFound(String),
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed stored value: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Key/value persistence for serializable values.
pub trait Storage {
    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError>;
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError>;
}
