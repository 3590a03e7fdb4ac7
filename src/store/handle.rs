use crate::store::record_store::RecordStore;
use log::info;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared, swappable reference to the current [`RecordStore`].
///
/// Queries take a [`snapshot`](StoreHandle::snapshot) and work on it to the
/// end, so a concurrent [`replace`](StoreHandle::replace) never mixes old and
/// new data inside one report.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    current: Arc<RwLock<Arc<RecordStore>>>,
}

impl StoreHandle {
    pub fn new(store: RecordStore) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(store))),
        }
    }

    pub fn snapshot(&self) -> Arc<RecordStore> {
        // The guarded value is a plain Arc swap, so a poisoned lock still holds a whole store.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Installs `store` for subsequent queries and returns the previous one.
    pub fn replace(&self, store: RecordStore) -> Arc<RecordStore> {
        let next = Arc::new(store);
        info!("Replacing record store ({} series)", next.len());
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}

impl From<RecordStore> for StoreHandle {
    fn from(store: RecordStore) -> Self {
        Self::new(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_survives_replace() {
        let handle = StoreHandle::new(RecordStore::default());
        let before = handle.snapshot();
        let old = handle.replace(RecordStore::default());
        assert!(Arc::ptr_eq(&before, &old));
        assert!(!Arc::ptr_eq(&before, &handle.snapshot()));
    }

    #[test]
    fn test_clones_share_the_store() {
        let handle = StoreHandle::new(RecordStore::default());
        let clone = handle.clone();
        handle.replace(RecordStore::default());
        assert!(Arc::ptr_eq(&handle.snapshot(), &clone.snapshot()));
    }
}
