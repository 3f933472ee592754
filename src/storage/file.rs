use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::storage::KeyValueStorage;

/// Stores each key as `{dir}/{key}.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::InvalidInput(format!(
                "Storage key {:?} is not a plain name",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a sibling temp file first so a crash never leaves half a slot
    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.dir)?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::debug!(path = %path.display(), bytes = value.len(), "Storage slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "movie-scout-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_slot_is_none() {
        let storage = FileStorage::new(temp_dir("missing"));
        assert_eq!(storage.get("movie-favorites").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let dir = temp_dir("roundtrip");
        let storage = FileStorage::new(&dir);

        storage.set("movie-favorites", r#"[{"id":42,"title":"Dune"}]"#).unwrap();

        assert_eq!(
            storage.get("movie-favorites").unwrap(),
            Some(r#"[{"id":42,"title":"Dune"}]"#.to_string())
        );
        assert!(dir.join("movie-favorites.json").exists());
        assert!(!dir.join("movie-favorites.json.tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_failed_rename_cleans_temp_file() {
        let dir = temp_dir("rename");
        // A non-empty directory in place of the slot makes the rename fail
        fs::create_dir_all(dir.join("movie-favorites.json").join("occupied")).unwrap();
        let storage = FileStorage::new(&dir);

        assert!(matches!(
            storage.set("movie-favorites", "[]"),
            Err(AppError::Io(_))
        ));
        assert!(!dir.join("movie-favorites.json.tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_remove_slot() {
        let dir = temp_dir("remove");
        let storage = FileStorage::new(&dir);

        storage.set("movie-favorites", "[]").unwrap();
        storage.remove("movie-favorites").unwrap();
        assert_eq!(storage.get("movie-favorites").unwrap(), None);
        storage.remove("movie-favorites").unwrap();

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let storage = FileStorage::new(temp_dir("keys"));
        assert!(matches!(
            storage.get("../etc/passwd"),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(storage.set("", "[]"), Err(AppError::InvalidInput(_))));
    }
}
