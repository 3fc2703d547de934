//! In-flight operation registry.
//!
//! One mutation per request at a time: before touching a record the service
//! claims its id here, and the claim is released when the guard drops. A
//! second submission for the same id while the first is still running fails
//! fast instead of racing to the database.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::error::StoreError;

/// Tracks which request ids currently have a mutation in flight.
///
/// Cloning shares the underlying set, so every handle of a service sees the
/// same claims.
#[derive(Debug, Default, Clone)]
pub struct InFlightRegistry {
    ids: Arc<Mutex<HashSet<String>>>,
}

impl InFlightRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a request id for mutation.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::OperationInFlight` if the id is already claimed.
    pub fn claim(&self, id: &str) -> Result<InFlightGuard, StoreError> {
        let mut ids = self
            .ids
            .lock()
            .map_err(|_| StoreError::Query("in-flight registry lock poisoned".to_string()))?;
        if !ids.insert(id.to_string()) {
            return Err(StoreError::OperationInFlight(id.to_string()));
        }
        Ok(InFlightGuard {
            ids: Arc::clone(&self.ids),
            id: id.to_string(),
        })
    }

    /// Whether a mutation is currently in flight for `id`.
    #[must_use]
    pub fn is_in_flight(&self, id: &str) -> bool {
        self.ids.lock().map(|ids| ids.contains(id)).unwrap_or(false)
    }
}

/// Releases the claim on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    ids: Arc<Mutex<HashSet<String>>>,
    id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut ids) = self.ids.lock() {
            ids.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_and_release() {
        let registry = InFlightRegistry::new();
        let guard = registry.claim("brw-00000001").unwrap();
        assert!(registry.is_in_flight("brw-00000001"));
        drop(guard);
        assert!(!registry.is_in_flight("brw-00000001"));
    }

    #[test]
    fn duplicate_claim_fails() {
        let registry = InFlightRegistry::new();
        let _guard = registry.claim("brw-00000001").unwrap();
        let err = registry.claim("brw-00000001").unwrap_err();
        assert!(matches!(err, StoreError::OperationInFlight(id) if id == "brw-00000001"));
    }

    #[test]
    fn distinct_ids_are_independent() {
        let registry = InFlightRegistry::new();
        let _a = registry.claim("brw-00000001").unwrap();
        let _b = registry.claim("don-00000001").unwrap();
        assert!(registry.is_in_flight("brw-00000001"));
        assert!(registry.is_in_flight("don-00000001"));
    }

    #[test]
    fn clones_share_claims() {
        let registry = InFlightRegistry::new();
        let other = registry.clone();
        let _guard = registry.claim("brw-00000001").unwrap();
        assert!(other.claim("brw-00000001").is_err());
    }
}
