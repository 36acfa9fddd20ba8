use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::state::AppState;

/// Which cached booking view a change touches. Account scopes hold one
/// owner's dashboard view, All holds the admin view over every booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheScope {
    Account(String),
    All,
}

/// Broadcast on every booking mutation. Subscribers use the owner id to
/// decide whether their view needs a rebuild.
#[derive(Debug, Clone)]
pub struct BookingChange {
    pub owner_id: String,
}

/// In-process cache of booking collections, keyed by scope.
///
/// Reads go through `get`/`put`; any booking mutation must call
/// `publish_change`, which drops the owner's entry and the admin entry
/// before fanning the change out to subscribers.
#[derive(Default)]
pub struct SyncCache {
    entries: Mutex<HashMap<CacheScope, serde_json::Value>>,
}

impl SyncCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scope: &CacheScope) -> Option<serde_json::Value> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(scope).cloned()
    }

    pub fn put(&self, scope: CacheScope, value: serde_json::Value) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(scope, value);
    }

    pub fn invalidate(&self, scope: &CacheScope) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(scope);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }
}

/// Invalidate the views a booking mutation makes stale, then notify
/// subscribers. Broadcast send failure just means nobody is listening.
pub fn publish_change(state: &Arc<AppState>, owner_id: &str) {
    state
        .cache
        .invalidate(&CacheScope::Account(owner_id.to_string()));
    state.cache.invalidate(&CacheScope::All);

    let _ = state.bookings_tx.send(BookingChange {
        owner_id: owner_id.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_what_put_stored() {
        let cache = SyncCache::new();
        let scope = CacheScope::Account("user_1".to_string());

        assert!(cache.get(&scope).is_none());
        cache.put(scope.clone(), serde_json::json!({"upcoming": []}));
        assert_eq!(
            cache.get(&scope),
            Some(serde_json::json!({"upcoming": []}))
        );
    }

    #[test]
    fn test_invalidate_removes_only_that_scope() {
        let cache = SyncCache::new();
        cache.put(
            CacheScope::Account("user_1".to_string()),
            serde_json::json!(1),
        );
        cache.put(CacheScope::All, serde_json::json!(2));

        cache.invalidate(&CacheScope::Account("user_1".to_string()));

        assert!(cache.get(&CacheScope::Account("user_1".to_string())).is_none());
        assert_eq!(cache.get(&CacheScope::All), Some(serde_json::json!(2)));
    }

    #[test]
    fn test_account_scopes_are_isolated() {
        let cache = SyncCache::new();
        cache.put(
            CacheScope::Account("user_1".to_string()),
            serde_json::json!("a"),
        );
        cache.put(
            CacheScope::Account("user_2".to_string()),
            serde_json::json!("b"),
        );

        assert_eq!(
            cache.get(&CacheScope::Account("user_1".to_string())),
            Some(serde_json::json!("a"))
        );
        assert_eq!(
            cache.get(&CacheScope::Account("user_2".to_string())),
            Some(serde_json::json!("b"))
        );
    }
}
