//! The credentials file: usernames and their bcrypt password hashes.
//!
//! Credentials live in a single JSON file mapping usernames to hashes,
//! e.g. `{"alice": "$2b$12$..."}`. The file is written by the `add_user`
//! binary and read once at server startup.

use std::{collections::HashMap, fs, io, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, record::Username};

/// The known users and their bcrypt password hashes.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials {
    users: HashMap<Username, String>,
}

impl Credentials {
    /// Load credentials from the JSON file at `path`.
    ///
    /// A missing file yields empty credentials so the server can start
    /// before any user has been created.
    ///
    /// # Errors
    /// Returns [Error::StoreRead] if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(
                    "no credentials file at {}, nobody will be able to log in",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(error) => {
                return Err(Error::StoreRead(format!(
                    "could not read {}: {error}",
                    path.display()
                )));
            }
        };

        serde_json::from_str(&contents).map_err(|error| {
            Error::StoreRead(format!("could not parse {}: {error}", path.display()))
        })
    }

    /// Write the credentials to the JSON file at `path`.
    ///
    /// # Errors
    /// Returns [Error::StoreSave] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|error| Error::StoreSave(error.to_string()))?;

        fs::write(path, json).map_err(|error| {
            Error::StoreSave(format!("could not write {}: {error}", path.display()))
        })
    }

    /// Check `password` against the stored hash for `username`.
    ///
    /// # Errors
    /// Returns [Error::InvalidCredentials] if the user is unknown or the
    /// password does not match. Internal hashing failures are logged and
    /// also reported as invalid credentials so the client cannot tell the
    /// difference.
    pub fn verify(&self, username: &Username, password: &str) -> Result<(), Error> {
        let hash = self.users.get(username).ok_or(Error::InvalidCredentials)?;

        match bcrypt::verify(password, hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::InvalidCredentials),
            Err(error) => {
                tracing::error!("could not verify password hash: {error}");
                Err(Error::InvalidCredentials)
            }
        }
    }

    /// Set or replace the password for `username`.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if hashing the password fails.
    pub fn set_password(&mut self, username: Username, password: &str) -> Result<(), Error> {
        let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|error| Error::HashingError(error.to_string()))?;

        self.users.insert(username, hash);

        Ok(())
    }

    /// The known usernames in alphabetical order.
    pub fn usernames(&self) -> Vec<Username> {
        let mut usernames: Vec<Username> = self.users.keys().cloned().collect();
        usernames.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        usernames
    }

    /// The number of known users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no users have been created yet.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod credentials_tests {
    use crate::{Error, record::Username};

    use super::Credentials;

    fn alice() -> Username {
        Username::new("alice").expect("username should be valid")
    }

    #[test]
    fn verify_accepts_correct_password() {
        let mut credentials = Credentials::default();
        credentials
            .set_password(alice(), "hunter2")
            .expect("could not set password");

        assert_eq!(credentials.verify(&alice(), "hunter2"), Ok(()));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let mut credentials = Credentials::default();
        credentials
            .set_password(alice(), "hunter2")
            .expect("could not set password");

        assert_eq!(
            credentials.verify(&alice(), "wrong"),
            Err(Error::InvalidCredentials)
        );
    }

    #[test]
    fn verify_rejects_unknown_user() {
        let credentials = Credentials::default();

        assert_eq!(
            credentials.verify(&alice(), "hunter2"),
            Err(Error::InvalidCredentials)
        );
    }

    #[test]
    fn usernames_are_sorted() {
        let mut credentials = Credentials::default();
        for name in ["carol", "alice", "bob"] {
            credentials
                .set_password(Username::new(name).unwrap(), "hunter2")
                .expect("could not set password");
        }

        let usernames: Vec<String> = credentials
            .usernames()
            .iter()
            .map(|username| username.to_string())
            .collect();

        assert_eq!(usernames, ["alice", "bob", "carol"]);
    }

    #[test]
    fn load_missing_file_yields_empty_credentials() {
        let dir = tempfile::tempdir().expect("could not create temp dir");

        let credentials =
            Credentials::load(&dir.path().join("users.json")).expect("load should succeed");

        assert!(credentials.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("could not create temp dir");
        let path = dir.path().join("users.json");
        let mut credentials = Credentials::default();
        credentials
            .set_password(alice(), "hunter2")
            .expect("could not set password");

        credentials.save(&path).expect("save should succeed");
        let loaded = Credentials::load(&path).expect("load should succeed");

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.verify(&alice(), "hunter2"), Ok(()));
    }

    #[test]
    fn load_rejects_malformed_file() {
        let dir = tempfile::tempdir().expect("could not create temp dir");
        let path = dir.path().join("users.json");
        std::fs::write(&path, "{not json").expect("could not write file");

        let result = Credentials::load(&path);

        assert!(
            matches!(result, Err(Error::StoreRead(_))),
            "want StoreRead, got {result:?}"
        );
    }
}
