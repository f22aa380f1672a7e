use crate::{Storage, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Return the per-user data root: `$BUDY_HOME`, else `~/.budy/`.
pub fn data_root() -> PathBuf {
    if let Some(dir) = std::env::var_os("BUDY_HOME").filter(|v| !v.is_empty()) {
        PathBuf::from(dir)
    } else if let Some(home) = dirs::home_dir() {
        home.join(".budy")
    } else {
        PathBuf::from(".budy")
    }
}

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("no parent dir for {}", path.display()),
        )
    })?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// One JSON document per key: `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the data directory, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_vec(value)?;
        let path = self.key_path(key);
        write_atomic(&path, &json)?;
        tracing::debug!(path = %path.display(), bytes = json.len(), "saved");
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError> {
        let path = self.key_path(key);
        let content = match fs::read(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        value: u32,
    }

    #[test]
    fn data_root_is_not_empty() {
        assert!(!data_root().as_os_str().is_empty());
    }

    #[test]
    fn write_atomic_creates_file_and_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("test.txt");
        write_atomic(&path, b"hello world").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello world");
        write_atomic(&path, b"bye").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "bye");
    }

    #[test]
    fn save_then_load_uses_key_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStorage::new(tmp.path()).unwrap();
        let sample = Sample {
            name: "test".into(),
            value: 42,
        };
        store.save("test-key", &sample).unwrap();

        let path = tmp.path().join("test-key.json");
        assert!(path.is_file());
        let raw: Sample = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, sample);

        let loaded: Sample = store.load("test-key").unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn load_missing_key_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStorage::new(tmp.path()).unwrap();
        let err = store.load::<Sample>("non-existent").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn load_malformed_document_is_serde_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStorage::new(tmp.path()).unwrap();
        fs::write(store.key_path("broken"), "{not json").unwrap();
        let err = store.load::<Sample>("broken").unwrap_err();
        assert!(matches!(err, StoreError::Serde(_)));
    }

    #[test]
    fn new_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");
        let store = FileStorage::new(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir.as_path());
    }
}
