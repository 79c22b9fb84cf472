//! In-memory auth store with change notifications.

use super::AuthStore;
use crate::error::Result;
use crate::models::AuthModel;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type ChangeCallback = Arc<dyn Fn(&str, Option<&AuthModel>) + Send + Sync>;

/// Handle returned by [`BaseAuthStore::on_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Default, Clone)]
struct AuthState {
    token: String,
    model: Option<AuthModel>,
}

/// Auth store keeping the token and model in memory.
///
/// Listeners registered with [`on_change`](Self::on_change) run after every
/// `save` and `clear`, outside of the store's locks.
#[derive(Default)]
pub struct BaseAuthStore {
    state: RwLock<AuthState>,
    listeners: Mutex<Vec<(ListenerId, ChangeCallback)>>,
    next_listener: AtomicU64,
}

impl BaseAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a change listener.
    ///
    /// With `fire_immediately` the callback also runs once right away with the
    /// current state.
    pub fn on_change<F>(&self, callback: F, fire_immediately: bool) -> ListenerId
    where
        F: Fn(&str, Option<&AuthModel>) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        let callback: ChangeCallback = Arc::new(callback);
        self.listeners.lock().push((id, callback.clone()));

        if fire_immediately {
            let state = self.state.read().clone();
            callback(&state.token, state.model.as_ref());
        }

        id
    }

    /// Unregister a change listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    pub(crate) fn set_state(&self, token: &str, model: Option<AuthModel>) {
        {
            let mut state = self.state.write();
            state.token = token.to_string();
            state.model = model;
        }
        self.trigger_change();
    }

    fn trigger_change(&self) {
        let state = self.state.read().clone();
        let listeners: Vec<ChangeCallback> =
            self.listeners.lock().iter().map(|(_, cb)| cb.clone()).collect();

        for callback in listeners {
            callback(&state.token, state.model.as_ref());
        }
    }
}

impl AuthStore for BaseAuthStore {
    fn token(&self) -> String {
        self.state.read().token.clone()
    }

    fn model(&self) -> Option<AuthModel> {
        self.state.read().model.clone()
    }

    fn save(&self, token: &str, model: Option<AuthModel>) -> Result<()> {
        self.set_state(token, model);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.set_state("", None);
        Ok(())
    }
}

impl std::fmt::Debug for BaseAuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseAuthStore")
            .field("has_token", &!self.state.read().token.is_empty())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
