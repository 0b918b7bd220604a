//! Persistence of per-user records.

mod json;

pub use json::JsonFileStore;

use crate::{Error, record::UserRecord, record::Username};

/// Loads and saves a user's [UserRecord].
///
/// The whole record is the unit of persistence. Handlers load the record,
/// mutate it in memory, and save it back.
pub trait UserDataStore: Send + Sync {
    /// Load the record for `username`.
    ///
    /// A user with no stored data gets an empty record, this is not an
    /// error.
    ///
    /// # Errors
    /// Returns [Error::StoreRead] if the stored data exists but cannot be
    /// read.
    fn load(&self, username: &Username) -> Result<UserRecord, Error>;

    /// Save the record for `username`, replacing any previous data.
    ///
    /// # Errors
    /// Returns [Error::StoreSave] if the record cannot be written.
    fn save(&self, username: &Username, record: &UserRecord) -> Result<(), Error>;
}
