use crate::{Storage, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-process storage. Values are kept as JSON text so loads go through the
/// same deserialization path as files.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    docs: RefCell<HashMap<String, String>>,
    fail_saves: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save` fail with `StoreError::Unavailable`.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    /// Store a raw document under `key`, bypassing serialization.
    pub fn insert_raw(&self, key: &str, raw: &str) {
        self.docs.borrow_mut().insert(key.to_string(), raw.to_string());
    }
}

impl Storage for MemoryStorage {
    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        if self.fail_saves.get() {
            return Err(StoreError::Unavailable(format!("save of '{key}' rejected")));
        }
        let json = serde_json::to_string(value)?;
        self.docs.borrow_mut().insert(key.to_string(), json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError> {
        let docs = self.docs.borrow();
        let raw = docs
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        Ok(serde_json::from_str(raw)?)
    }
}
