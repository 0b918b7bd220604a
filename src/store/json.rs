//! JSON file backend for user records.
//!
//! Each user's data lives in `<data_dir>/users/<username>/record.json`.
//! Saves write to a temporary file first and then rename it over the old
//! record, so a crash mid-write never leaves a half-written record behind.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{Error, record::UserRecord, record::Username};

use super::UserDataStore;

/// Stores each user's record as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `data_dir`.
    ///
    /// The directory does not need to exist yet, it is created on the first
    /// save.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn user_dir(&self, username: &Username) -> PathBuf {
        self.data_dir.join("users").join(username.as_str())
    }

    fn record_path(&self, username: &Username) -> PathBuf {
        self.user_dir(username).join("record.json")
    }
}

impl UserDataStore for JsonFileStore {
    fn load(&self, username: &Username) -> Result<UserRecord, Error> {
        let path = self.record_path(username);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(UserRecord::default());
            }
            Err(error) => {
                return Err(Error::StoreRead(format!(
                    "could not read {}: {error}",
                    path.display()
                )));
            }
        };

        match serde_json::from_str(&contents) {
            Ok(record) => Ok(record),
            Err(error) => {
                // A corrupt record should not lock the user out. Start fresh
                // and leave the bad file in place for manual recovery.
                tracing::warn!(
                    "malformed record at {}, starting with an empty record: {error}",
                    path.display()
                );
                Ok(UserRecord::default())
            }
        }
    }

    fn save(&self, username: &Username, record: &UserRecord) -> Result<(), Error> {
        let path = self.record_path(username);
        let json = serde_json::to_string_pretty(record)
            .map_err(|error| Error::StoreSave(error.to_string()))?;

        write_atomically(&self.user_dir(username), &path, &json)
            .map_err(|error| Error::StoreSave(format!("could not write {}: {error}", path.display())))
    }
}

fn write_atomically(dir: &Path, path: &Path, contents: &str) -> io::Result<()> {
    fs::create_dir_all(dir)?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)
}
