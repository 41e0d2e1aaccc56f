//! # Observable Store
//!
//! The engine behind every storefront collection: an ordered list of values
//! plus a set of observers that are told about each change.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  store.mutate(|items| ...)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock items ──► clone into a working copy ──► run closure on copy       │
//! │       │                                                                 │
//! │       ├── Mutation::Skip   → copy discarded, nobody notified           │
//! │       │                                                                 │
//! │       └── Mutation::Commit → copy replaces items                       │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                     unlock, then notify every observer once            │
//! │                     (registration order, panics isolated)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Observers run after the lock is released, so an observer may read the
//! store it is subscribed to. Snapshots are clones: nothing handed out by a
//! store aliases its internal collection.
//!
//! ## Usage
//! ```rust
//! use debuti_core::store::{Mutation, ObservableStore};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let store: ObservableStore<u32> = ObservableStore::new("numbers");
//! let seen = Arc::new(AtomicUsize::new(0));
//!
//! let counter = seen.clone();
//! let handle = store.subscribe(move |items| {
//!     counter.store(items.len(), Ordering::SeqCst);
//! });
//!
//! store.mutate(|items| {
//!     items.push(7);
//!     Mutation::Commit(())
//! });
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//!
//! handle.unsubscribe();
//! handle.unsubscribe(); // second call is a no-op
//! ```

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

// =============================================================================
// Observer Types
// =============================================================================

/// Unique observer identifier. Never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObserverId(pub u64);

/// Callback receiving the committed snapshot.
pub type Observer<T> = Arc<dyn Fn(&[T]) + Send + Sync>;

/// Outcome reported by a [`ObservableStore::mutate`] closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation<R> {
    /// The working copy changed: commit it and notify.
    Commit(R),
    /// Nothing changed: discard the working copy, notify nobody.
    Skip(R),
}

impl<R> Mutation<R> {
    pub fn into_inner(self) -> R {
        match self {
            Mutation::Commit(value) | Mutation::Skip(value) => value,
        }
    }

    pub fn is_commit(&self) -> bool {
        matches!(self, Mutation::Commit(_))
    }
}

// =============================================================================
// Store Internals
// =============================================================================

struct Inner<T> {
    name: &'static str,
    items: Mutex<Vec<T>>,
    observers: RwLock<Vec<(ObserverId, Observer<T>)>>,
    next_id: AtomicU64,
}

/// Type-erased deregistration, so one handle type serves every store.
trait Detach: Send + Sync {
    fn detach(&self, id: ObserverId) -> bool;
}

impl<T: Send + 'static> Detach for Inner<T> {
    fn detach(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        let removed = observers.len() != before;
        if removed {
            tracing::debug!(store = self.name, observer = id.0, "Observer removed");
        }
        removed
    }
}

// =============================================================================
// Unsubscribe Handle
// =============================================================================

/// Handle returned by [`ObservableStore::subscribe`].
///
/// Calling [`Unsubscribe::unsubscribe`] more than once is harmless and never
/// removes a different observer. Dropping the handle does NOT unsubscribe.
#[derive(Clone)]
pub struct Unsubscribe {
    target: Weak<dyn Detach>,
    id: ObserverId,
}

impl Unsubscribe {
    /// Deregisters the observer. Returns `true` only on the call that
    /// actually removed it.
    pub fn unsubscribe(&self) -> bool {
        match self.target.upgrade() {
            Some(target) => target.detach(self.id),
            None => false,
        }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe").field("id", &self.id).finish()
    }
}

// =============================================================================
// Observable Store
// =============================================================================

/// An ordered in-memory collection with change observers.
///
/// Cloning is cheap and yields another handle to the same collection.
pub struct ObservableStore<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for ObservableStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> ObservableStore<T> {
    /// Creates an empty store. `name` only appears in log output.
    pub fn new(name: &'static str) -> Self {
        Self::with_items(name, Vec::new())
    }

    pub fn with_items(name: &'static str, items: Vec<T>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                items: Mutex::new(items),
                observers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    /// Registers an observer and returns its deregistration handle.
    ///
    /// The observer is not called on registration; read [`Self::snapshot`]
    /// for the initial state.
    pub fn subscribe<F>(&self, callback: F) -> Unsubscribe
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        let id = ObserverId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
        self.inner.observers.write().push((id, Arc::new(callback)));
        tracing::debug!(store = self.inner.name, observer = id.0, "Observer added");

        let target: Weak<dyn Detach> = Arc::downgrade(&self.inner) as Weak<dyn Detach>;
        Unsubscribe { target, id }
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.read().len()
    }

    /// Invokes every observer with the current snapshot, in registration
    /// order. A panicking observer is logged and skipped.
    pub fn notify(&self) {
        let snapshot = self.snapshot();
        self.notify_with(&snapshot);
    }

    fn notify_with(&self, snapshot: &[T]) {
        // Copy the list out so observers may (un)subscribe while being called.
        let observers: Vec<(ObserverId, Observer<T>)> = self.inner.observers.read().clone();

        for (id, observer) in observers {
            let result = catch_unwind(AssertUnwindSafe(|| observer(snapshot)));
            if let Err(payload) = result {
                tracing::error!(
                    store = self.inner.name,
                    observer = id.0,
                    panic = %panic_message(payload.as_ref()),
                    "Observer panicked"
                );
            }
        }
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Runs `f` on a working copy of the collection.
    ///
    /// On [`Mutation::Commit`] the copy replaces the collection and every
    /// observer is notified exactly once. On [`Mutation::Skip`] the
    /// collection is untouched and nobody is notified.
    ///
    /// Observers run after the lock is released. Mutations from one thread
    /// are observed in order, but concurrent mutations from different
    /// threads may be observed out of order: an observer can receive a newer
    /// snapshot before an older one. Observers that need the latest state
    /// should re-read it rather than trust the order of calls.
    pub fn mutate<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut Vec<T>) -> Mutation<R>,
    {
        let (outcome, committed) = {
            let mut items = self.inner.items.lock();
            let mut next = items.clone();
            match f(&mut next) {
                Mutation::Commit(value) => {
                    *items = next.clone();
                    (value, Some(next))
                }
                Mutation::Skip(value) => (value, None),
            }
        };

        if let Some(snapshot) = committed {
            tracing::debug!(store = self.inner.name, len = snapshot.len(), "Store updated");
            self.notify_with(&snapshot);
        }

        outcome
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// A copy of the current collection.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.items.lock().clone()
    }

    /// Reads the collection in place without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.items.lock())
    }

    pub fn len(&self) -> usize {
        self.inner.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.lock().is_empty()
    }
}

impl<T> fmt::Debug for ObservableStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableStore")
            .field("name", &self.inner.name)
            .field("len", &self.inner.items.lock().len())
            .field("observers", &self.inner.observers.read().len())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn push(store: &ObservableStore<u32>, value: u32) {
        store.mutate(|items| {
            items.push(value);
            Mutation::Commit(())
        });
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&[u32]) + Send + Sync + 'static) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        (calls, move |_: &[u32]| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_commit_notifies_once_with_new_snapshot() {
        let store = ObservableStore::new("test");
        let received = Arc::new(Mutex::new(Vec::new()));

        let sink = received.clone();
        store.subscribe(move |items: &[u32]| sink.lock().push(items.to_vec()));

        push(&store, 1);
        push(&store, 2);

        assert_eq!(*received.lock(), vec![vec![1], vec![1, 2]]);
    }

    #[test]
    fn test_skip_leaves_items_and_does_not_notify() {
        let store = ObservableStore::with_items("test", vec![1u32, 2]);
        let (calls, observer) = counter();
        store.subscribe(observer);

        let result = store.mutate(|items| {
            items.clear();
            Mutation::Skip("ignored")
        });

        assert_eq!(result, "ignored");
        assert_eq!(store.snapshot(), vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_observers_called_in_registration_order() {
        let store: ObservableStore<u32> = ObservableStore::new("test");
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = order.clone();
            store.subscribe(move |_| order.lock().push(tag));
        }

        store.notify();
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_notify_with_no_observers_and_empty_items() {
        let store: ObservableStore<u32> = ObservableStore::new("test");
        store.notify();
        assert!(store.is_empty());
        assert_eq!(store.observer_count(), 0);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let store = ObservableStore::new("test");
        let (first_calls, first) = counter();
        let (second_calls, second) = counter();

        let handle = store.subscribe(first);
        store.subscribe(second);

        assert!(handle.unsubscribe());
        assert!(!handle.unsubscribe());
        assert_eq!(store.observer_count(), 1);

        push(&store, 9);
        assert_eq!(first_calls.load(Ordering::SeqCst), 0);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_observer_ids_are_never_reused() {
        let store: ObservableStore<u32> = ObservableStore::new("test");
        let a = store.subscribe(|_| {});
        a.unsubscribe();
        let b = store.subscribe(|_| {});

        assert_ne!(a.id(), b.id());
        // The stale handle must not remove the new observer.
        assert!(!a.unsubscribe());
        assert_eq!(store.observer_count(), 1);
    }

    #[test]
    fn test_dropping_handle_keeps_observer() {
        let store = ObservableStore::new("test");
        let (calls, observer) = counter();
        drop(store.subscribe(observer));

        push(&store, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_after_store_dropped() {
        let store: ObservableStore<u32> = ObservableStore::new("test");
        let handle = store.subscribe(|_| {});
        drop(store);
        assert!(!handle.unsubscribe());
    }

    #[test]
    fn test_panicking_observer_does_not_stop_others() {
        let store = ObservableStore::new("test");
        let (calls, observer) = counter();

        store.subscribe(|_: &[u32]| panic!("observer blew up"));
        store.subscribe(observer);

        push(&store, 5);

        assert_eq!(store.snapshot(), vec![5]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_observer_may_read_store() {
        let store: ObservableStore<u32> = ObservableStore::new("test");
        let seen_len = Arc::new(AtomicUsize::new(0));

        let reader = store.clone();
        let seen = seen_len.clone();
        store.subscribe(move |_| {
            seen.store(reader.len(), Ordering::SeqCst);
        });

        push(&store, 1);
        push(&store, 2);
        assert_eq!(seen_len.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_observer_may_unsubscribe_itself() {
        let store: ObservableStore<u32> = ObservableStore::new("test");
        let slot: Arc<Mutex<Option<Unsubscribe>>> = Arc::new(Mutex::new(None));
        let calls = Arc::new(AtomicUsize::new(0));

        let own_handle = slot.clone();
        let seen = calls.clone();
        let handle = store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            if let Some(handle) = own_handle.lock().as_ref() {
                handle.unsubscribe();
            }
        });
        *slot.lock() = Some(handle);

        push(&store, 1);
        push(&store, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.observer_count(), 0);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let store = ObservableStore::with_items("test", vec![1u32]);
        let mut snapshot = store.snapshot();
        snapshot.push(2);
        assert_eq!(store.snapshot(), vec![1]);
    }

    #[test]
    fn test_clones_share_state() {
        let store: ObservableStore<u32> = ObservableStore::new("test");
        let other = store.clone();
        push(&other, 3);
        assert_eq!(store.snapshot(), vec![3]);
    }

    #[test]
    fn test_mutation_helpers() {
        assert!(Mutation::Commit(1).is_commit());
        assert!(!Mutation::Skip(1).is_commit());
        assert_eq!(Mutation::Skip(4).into_inner(), 4);
    }
}
