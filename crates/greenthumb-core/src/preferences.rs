//! User preferences: first-load flag and gardening experience rating

use crate::error::PreferenceError;
use crate::experience::ExperienceLevel;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const FIRST_LOAD_KEY: &str = "first_load";
const GARDENING_EXPERIENCE_KEY: &str = "gardening_experience";

/// Key/value preference backend
pub trait PreferenceStore: Send + Sync {
    /// Read raw value
    ///
    /// # Errors
    /// Backend-specific read failure
    fn get(&self, key: &str) -> Result<Option<Value>, PreferenceError>;

    /// Write raw value
    ///
    /// # Errors
    /// Backend-specific write failure
    fn set(&self, key: &str, value: Value) -> Result<(), PreferenceError>;
}

/// Preferences held in memory only
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    values: Mutex<BTreeMap<String, Value>>,
}

impl InMemoryPreferenceStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<Value>, PreferenceError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), PreferenceError> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }
}

/// Preferences persisted as a JSON object in a single file
///
/// The whole file is rewritten on every `set` and replaced by rename, so a
/// failed write leaves both the file and the in-memory values unchanged.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, Value>>,
}

impl JsonFilePreferenceStore {
    /// Open the file at `path`; a missing file starts empty
    ///
    /// # Errors
    /// - `PreferenceError::Io` if the file exists but cannot be read
    /// - `PreferenceError::Corrupt` if it is not a JSON object
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PreferenceError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| {
                PreferenceError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(PreferenceError::io_error(&path, e)),
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `values` to a sibling temp file and rename it over the backing file
    fn persist(&self, values: &BTreeMap<String, Value>) -> Result<(), PreferenceError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| PreferenceError::io_error(parent, e))?;
        let bytes = serde_json::to_vec_pretty(values).map_err(|source| PreferenceError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let mut file =
            NamedTempFile::new_in(parent).map_err(|e| PreferenceError::io_error(parent, e))?;
        file.write_all(&bytes)
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| PreferenceError::io_error(file.path(), e))?;
        file.persist(&self.path)
            .map_err(|e| PreferenceError::io_error(&self.path, e.error))?;
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<Value>, PreferenceError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), PreferenceError> {
        let mut values = self.values.lock();
        let mut next = values.clone();
        next.insert(key.to_string(), value);
        self.persist(&next)?;
        *values = next;
        Ok(())
    }
}

/// Typed access to the app's preferences
pub struct Preferences {
    store: Box<dyn PreferenceStore>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

impl Preferences {
    /// Wrap a backend
    #[must_use]
    pub fn new(store: impl PreferenceStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// In-memory preferences
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(InMemoryPreferenceStore::new())
    }

    /// Whether the app has not been opened before; defaults to `true`
    ///
    /// # Errors
    /// Backend failure or a non-boolean stored value
    pub fn first_load(&self) -> Result<bool, PreferenceError> {
        match self.store.get(FIRST_LOAD_KEY)? {
            None => Ok(true),
            Some(Value::Bool(flag)) => Ok(flag),
            Some(_) => Err(PreferenceError::TypeMismatch {
                key: FIRST_LOAD_KEY.to_string(),
            }),
        }
    }

    /// Set the first-load flag
    ///
    /// # Errors
    /// Backend failure
    pub fn set_first_load(&self, first_load: bool) -> Result<(), PreferenceError> {
        self.store.set(FIRST_LOAD_KEY, Value::Bool(first_load))
    }

    /// Saved experience rating, if any
    ///
    /// # Errors
    /// Backend failure or a stored value outside the label set
    pub fn gardening_experience(&self) -> Result<Option<ExperienceLevel>, PreferenceError> {
        let mismatch = || PreferenceError::TypeMismatch {
            key: GARDENING_EXPERIENCE_KEY.to_string(),
        };
        match self.store.get(GARDENING_EXPERIENCE_KEY)? {
            None => Ok(None),
            Some(value) => {
                let index = value.as_u64().ok_or_else(mismatch)?;
                let index = usize::try_from(index).map_err(|_| mismatch())?;
                ExperienceLevel::from_index(index)
                    .map(Some)
                    .ok_or_else(mismatch)
            }
        }
    }

    /// Save experience rating
    ///
    /// # Errors
    /// Backend failure
    pub fn set_gardening_experience(&self, level: ExperienceLevel) -> Result<(), PreferenceError> {
        self.store
            .set(GARDENING_EXPERIENCE_KEY, Value::from(level.index()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_before_anything_is_saved() {
        let prefs = Preferences::in_memory();
        assert!(prefs.first_load().unwrap());
        assert_eq!(prefs.gardening_experience().unwrap(), None);
    }

    #[test]
    fn in_memory_round_trip() {
        let prefs = Preferences::in_memory();
        prefs.set_first_load(false).unwrap();
        prefs
            .set_gardening_experience(ExperienceLevel::Intermediate)
            .unwrap();

        assert!(!prefs.first_load().unwrap());
        assert_eq!(
            prefs.gardening_experience().unwrap(),
            Some(ExperienceLevel::Intermediate)
        );
    }

    #[test]
    fn json_file_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        {
            let prefs = Preferences::new(JsonFilePreferenceStore::open(&path).unwrap());
            prefs.set_first_load(false).unwrap();
            prefs.set_gardening_experience(ExperienceLevel::Expert).unwrap();
        }

        let prefs = Preferences::new(JsonFilePreferenceStore::open(&path).unwrap());
        assert!(!prefs.first_load().unwrap());
        assert_eq!(
            prefs.gardening_experience().unwrap(),
            Some(ExperienceLevel::Expert)
        );
    }

    #[test]
    fn failed_write_leaves_values_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("state");
        let path = parent.join("prefs.json");
        let store = JsonFilePreferenceStore::open(&path).unwrap();
        store.set(FIRST_LOAD_KEY, Value::Bool(true)).unwrap();

        std::fs::remove_dir_all(&parent).unwrap();
        std::fs::write(&parent, "in the way").unwrap();

        let prefs = Preferences::new(store);
        assert!(matches!(
            prefs.set_first_load(false),
            Err(PreferenceError::Io { .. })
        ));
        assert!(prefs.first_load().unwrap());
    }

    #[test]
    fn rewrite_leaves_only_the_backing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let prefs = Preferences::new(JsonFilePreferenceStore::open(&path).unwrap());

        prefs.set_first_load(false).unwrap();
        prefs.set_gardening_experience(ExperienceLevel::Beginner).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("prefs.json")]);
        let on_disk: BTreeMap<String, Value> =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk[FIRST_LOAD_KEY], Value::Bool(false));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonFilePreferenceStore::open(&path).unwrap_err();
        assert!(matches!(err, PreferenceError::Corrupt { .. }));
    }

    #[test]
    fn wrong_type_is_reported() {
        let store = InMemoryPreferenceStore::new();
        store.set(FIRST_LOAD_KEY, Value::from("yes")).unwrap();
        store.set(GARDENING_EXPERIENCE_KEY, Value::from(17)).unwrap();
        let prefs = Preferences::new(store);

        assert!(matches!(
            prefs.first_load(),
            Err(PreferenceError::TypeMismatch { .. })
        ));
        assert!(matches!(
            prefs.gardening_experience(),
            Err(PreferenceError::TypeMismatch { .. })
        ));
    }
}
