//! Auth store persisted into a key/value backend.

use super::{AuthStorage, AuthStore, BaseAuthStore, ListenerId, MemoryStorage};
use crate::error::Result;
use crate::models::AuthModel;
use serde_json::{json, Value};
use std::sync::Arc;

/// Storage key used when none is given.
pub const DEFAULT_STORAGE_KEY: &str = "pocketbase_auth";

/// Auth store persisting `{"token": ..., "model": ...}` as JSON under a single key.
///
/// Reads always go to the backend, so several stores sharing a backend (or a
/// file directory) observe each other's writes.
pub struct LocalAuthStore {
    base: BaseAuthStore,
    storage: Arc<dyn AuthStorage>,
    storage_key: String,
}

impl LocalAuthStore {
    /// Store under `storage_key` in process memory.
    pub fn new(storage_key: impl Into<String>) -> Self {
        Self::with_storage(storage_key, Arc::new(MemoryStorage::new()))
    }

    /// Store under `storage_key` in the given backend.
    pub fn with_storage(storage_key: impl Into<String>, storage: Arc<dyn AuthStorage>) -> Self {
        LocalAuthStore {
            base: BaseAuthStore::new(),
            storage,
            storage_key: storage_key.into(),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// See [`BaseAuthStore::on_change`].
    pub fn on_change<F>(&self, callback: F, fire_immediately: bool) -> ListenerId
    where
        F: Fn(&str, Option<&AuthModel>) + Send + Sync + 'static,
    {
        self.base.on_change(callback, fire_immediately)
    }

    /// See [`BaseAuthStore::remove_listener`].
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.base.remove_listener(id)
    }

    /// Stored value; raw strings are kept when the value is not JSON.
    fn storage_get(&self) -> Value {
        match self.storage.get(&self.storage_key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
            Ok(None) => Value::Null,
            Err(e) => {
                tracing::warn!("Failed to read auth state from {}: {}", self.storage_key, e);
                Value::Null
            }
        }
    }
}

impl Default for LocalAuthStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_KEY)
    }
}

impl AuthStore for LocalAuthStore {
    fn token(&self) -> String {
        self.storage_get()
            .get("token")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    fn model(&self) -> Option<AuthModel> {
        match self.storage_get() {
            Value::Object(mut map) => map.remove("model").and_then(AuthModel::from_value),
            _ => None,
        }
    }

    fn save(&self, token: &str, model: Option<AuthModel>) -> Result<()> {
        let payload = json!({
            "token": token,
            "model": model,
        });
        self.storage.set(&self.storage_key, &payload.to_string())?;
        self.base.set_state(token, model);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.storage.remove(&self.storage_key)?;
        self.base.set_state("", None);
        Ok(())
    }
}

impl std::fmt::Debug for LocalAuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAuthStore")
            .field("storage_key", &self.storage_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Admin, Record};
    use crate::stores::FileStorage;
    use parking_lot::Mutex;

    #[test]
    fn test_round_trip_admin_and_record() {
        let store = LocalAuthStore::default();

        store
            .save("t1", Some(AuthModel::Admin(Admin { id: "a1".into(), ..Default::default() })))
            .unwrap();
        assert_eq!(store.token(), "t1");
        assert!(store.is_admin());

        let record = Record::from_value(json!({"id": "r1", "collectionId": "c1", "username": "joe"}));
        store.save("t2", Some(AuthModel::Record(record))).unwrap();
        assert!(store.is_auth_record());
        assert_eq!(
            store.model().and_then(|m| m.as_record().map(|r| r.get_str("username").to_string())),
            Some("joe".to_string())
        );
    }

    #[test]
    fn test_clear_removes_key() {
        let storage = Arc::new(MemoryStorage::new());
        let store = LocalAuthStore::with_storage("auth", storage.clone());

        store.save("t", None).unwrap();
        assert!(storage.get("auth").unwrap().is_some());

        store.clear().unwrap();
        assert!(storage.get("auth").unwrap().is_none());
        assert_eq!(store.token(), "");
    }

    #[test]
    fn test_non_json_value_is_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set("auth", "plain-token").unwrap();
        let store = LocalAuthStore::with_storage("auth", storage);

        assert_eq!(store.token(), "");
        assert!(store.model().is_none());
    }

    #[test]
    fn test_non_object_model_is_none() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set("auth", r#"{"token":"t","model":"x"}"#).unwrap();
        let store = LocalAuthStore::with_storage("auth", storage);

        assert_eq!(store.token(), "t");
        assert!(store.model().is_none());
    }

    #[test]
    fn test_file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let first = LocalAuthStore::with_storage(
            DEFAULT_STORAGE_KEY,
            Arc::new(FileStorage::new(dir.path())),
        );
        first.save("persisted", None).unwrap();

        let second = LocalAuthStore::with_storage(
            DEFAULT_STORAGE_KEY,
            Arc::new(FileStorage::new(dir.path())),
        );
        assert_eq!(second.token(), "persisted");
    }

    #[test]
    fn test_change_listener_fires_on_save() {
        let store = LocalAuthStore::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        store.on_change(move |token, _| sink.lock().push(token.to_string()), false);

        store.save("x", None).unwrap();
        store.clear().unwrap();
        assert_eq!(*seen.lock(), vec!["x", ""]);
    }
}
