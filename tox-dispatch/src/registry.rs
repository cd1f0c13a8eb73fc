//! Callback registry with stable identities
//!
//! Subsystems register zero-argument callbacks (e.g. "release this when the
//! session closes") and later unregister them without disturbing anyone
//! else's handle. Slots are never shifted: removing a callback leaves a
//! tombstone, and only tombstones at the end of the table are reclaimed.

use std::fmt;

type Callback = Box<dyn FnMut() + Send>;

/// Handle to one registration
///
/// The handle is consumed by [`CallbackRegistry::remove`], so it can only be
/// used to unregister once.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct CallbackId(usize);

impl CallbackId {
    /// Slot index this handle addresses
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Ordered slot table of callbacks
#[derive(Default)]
pub struct CallbackRegistry {
    slots: Vec<Option<Callback>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback and return its handle
    pub fn add<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut() + Send + 'static,
    {
        self.slots.push(Some(Box::new(callback)));
        let id = CallbackId(self.slots.len() - 1);
        log::trace!("Registered callback in slot {}", id.0);
        id
    }

    /// Unregister a callback
    ///
    /// The slot becomes a tombstone, then trailing tombstones are dropped.
    /// Tombstones before the last live slot stay in place so that other
    /// handles keep addressing their own slots. A handle pointing past the
    /// end of the table or at a tombstone is ignored.
    pub fn remove(&mut self, id: CallbackId) {
        let Some(slot) = self.slots.get_mut(id.0) else {
            log::debug!(
                "Ignoring removal of slot {} from a table of {}",
                id.0,
                self.slots.len()
            );
            return;
        };
        if slot.take().is_none() {
            log::warn!("Callback slot {} was already removed", id.0);
            return;
        }
        log::trace!("Removed callback in slot {}", id.0);

        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
    }

    /// Call every live callback once, in registration order
    pub fn invoke(&mut self) {
        for callback in self.slots.iter_mut().flatten() {
            callback();
        }
    }

    /// Number of slots, tombstones included
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of live callbacks
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("slots", &self.slot_count())
            .field("live", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> impl FnMut() + Send {
        let log = Arc::clone(log);
        move || log.lock().unwrap().push(name)
    }

    #[test]
    fn test_ids_stay_stable_across_removal() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = CallbackRegistry::new();

        let a = registry.add(recorder(&log, "A"));
        let b = registry.add(recorder(&log, "B"));
        let c = registry.add(recorder(&log, "C"));

        registry.remove(b);
        registry.invoke();
        assert_eq!(*log.lock().unwrap(), vec!["A", "C"]);

        let d = registry.add(recorder(&log, "D"));
        log.lock().unwrap().clear();
        registry.invoke();
        assert_eq!(*log.lock().unwrap(), vec!["A", "C", "D"]);

        assert_eq!(a.index(), 0);
        assert_eq!(c.index(), 2);
        assert_eq!(d.index(), 3);

        // Removing A must leave C and D untouched
        registry.remove(a);
        log.lock().unwrap().clear();
        registry.invoke();
        assert_eq!(*log.lock().unwrap(), vec!["C", "D"]);
    }

    #[test]
    fn test_tail_tombstones_reclaimed() {
        let mut registry = CallbackRegistry::new();
        let a = registry.add(|| {});
        let b = registry.add(|| {});

        registry.remove(b);
        assert_eq!(registry.slot_count(), 1);
        registry.remove(a);
        assert_eq!(registry.slot_count(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_middle_tombstone_kept() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = CallbackRegistry::new();
        let _a = registry.add(recorder(&log, "A"));
        let b = registry.add(recorder(&log, "B"));
        let _c = registry.add(recorder(&log, "C"));

        registry.remove(b);
        assert_eq!(registry.slot_count(), 3);
        assert_eq!(registry.len(), 2);

        registry.invoke();
        assert_eq!(*log.lock().unwrap(), vec!["A", "C"]);
    }

    #[test]
    fn test_reclaim_cascades_through_earlier_tombstones() {
        let mut registry = CallbackRegistry::new();
        let _a = registry.add(|| {});
        let b = registry.add(|| {});
        let c = registry.add(|| {});

        registry.remove(b);
        assert_eq!(registry.slot_count(), 3);
        registry.remove(c);
        assert_eq!(registry.slot_count(), 1);
    }

    #[test]
    fn test_reclaimed_index_reused() {
        let mut registry = CallbackRegistry::new();
        let _a = registry.add(|| {});
        let b = registry.add(|| {});
        registry.remove(b);

        let again = registry.add(|| {});
        assert_eq!(again.index(), 1);
    }

    #[test]
    fn test_invoke_does_not_consume() {
        let count = Arc::new(Mutex::new(0));
        let mut registry = CallbackRegistry::new();
        let counter = Arc::clone(&count);
        registry.add(move || *counter.lock().unwrap() += 1);

        registry.invoke();
        registry.invoke();
        assert_eq!(*count.lock().unwrap(), 2);
        assert_eq!(registry.slot_count(), 1);
    }

    #[test]
    fn test_foreign_id_ignored() {
        let mut empty = CallbackRegistry::new();
        let mut other = CallbackRegistry::new();
        let id = other.add(|| {});

        empty.remove(id);
        assert_eq!(empty.slot_count(), 0);
    }
}
