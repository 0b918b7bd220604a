use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{
    Error,
    record::{UserRecord, Username},
    store::UserDataStore,
};

/// An in-memory [UserDataStore] for handler tests.
///
/// Saves can be made to fail on demand to test error paths.
#[derive(Default)]
pub(crate) struct MemoryStore {
    records: Mutex<HashMap<Username, UserRecord>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn with_record(username: &Username, record: UserRecord) -> Arc<Self> {
        let store = Self::default();
        store
            .records
            .lock()
            .unwrap()
            .insert(username.clone(), record);

        Arc::new(store)
    }

    /// Make every subsequent save fail with [Error::StoreSave].
    pub(crate) fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    pub(crate) fn record(&self, username: &Username) -> UserRecord {
        self.records
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .unwrap_or_default()
    }
}

impl UserDataStore for MemoryStore {
    fn load(&self, username: &Username) -> Result<UserRecord, Error> {
        Ok(self.record(username))
    }

    fn save(&self, username: &Username, record: &UserRecord) -> Result<(), Error> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::StoreSave("simulated save failure".to_owned()));
        }

        self.records
            .lock()
            .unwrap()
            .insert(username.clone(), record.clone());

        Ok(())
    }
}
