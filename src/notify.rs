//! Change notification registry.
//!
//! Observers register interest in a [`ContentUri`] and are called back
//! synchronously whenever a mutation on a related URI commits. A change on
//! `U` reaches:
//!
//! - observers registered on `U` itself,
//! - observers on an ancestor of `U` (the collection covers its items),
//! - observers on a descendant of `U` (a bulk change covers its items).
//!
//! Siblings never see each other's changes.

use crate::uri::ContentUri;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, trace};

/// Callback invoked when an observed resource changes.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`ChangeNotifier::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Observer {
    id: ObserverId,
    uri: ContentUri,
    callback: ChangeCallback,
}

impl Observer {
    fn wants(&self, changed: &ContentUri) -> bool {
        self.uri == *changed
            || self.uri.is_ancestor_of(changed)
            || changed.is_ancestor_of(&self.uri)
    }
}

/// Registry of change observers.
///
/// Cloning yields another handle onto the same registry.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    observers: Arc<Mutex<Vec<Observer>>>,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl ChangeNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for changes to `uri` or to anything underneath it.
    pub fn observe(&self, uri: &ContentUri, callback: ChangeCallback) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push(Observer {
            id,
            uri: uri.clone(),
            callback,
        });
        debug!(uri = %uri, "Registered observer");
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn stop_observing(&self, id: ObserverId) -> bool {
        let mut observers = self.lock();
        let before = observers.len();
        observers.retain(|o| o.id != id);
        before != observers.len()
    }

    /// Deliver a change on `uri` to every interested observer.
    ///
    /// Callbacks run on the calling thread after the registry lock is
    /// released, so a callback may register or remove observers.
    pub fn notify_change(&self, uri: &ContentUri) {
        let callbacks: Vec<ChangeCallback> = self
            .lock()
            .iter()
            .filter(|o| o.wants(uri))
            .map(|o| Arc::clone(&o.callback))
            .collect();

        trace!(uri = %uri, observers = callbacks.len(), "Notifying change");
        for callback in callbacks {
            callback();
        }
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Observer>> {
        // A panicking callback never runs under the lock, so the list is intact.
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, ChangeCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let callback: ChangeCallback = Arc::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (count, callback)
    }

    fn uri(s: &str) -> ContentUri {
        ContentUri::parse(s).unwrap()
    }

    #[test]
    fn test_exact_match() {
        let notifier = ChangeNotifier::new();
        let (count, cb) = counter();
        notifier.observe(&uri("content://a/inventory/1"), cb);

        notifier.notify_change(&uri("content://a/inventory/1"));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_collection_observer_sees_item_changes() {
        let notifier = ChangeNotifier::new();
        let (count, cb) = counter();
        notifier.observe(&uri("content://a/inventory"), cb);

        notifier.notify_change(&uri("content://a/inventory/3"));
        notifier.notify_change(&uri("content://a/inventory/4"));
        assert_eq!(count.load(Ordering::SeqCst), 2);

        notifier.notify_change(&uri("content://b/inventory/3"));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_bulk_change_reaches_item_observers() {
        let notifier = ChangeNotifier::new();
        let (count, cb) = counter();
        notifier.observe(&uri("content://a/inventory/3"), cb);

        notifier.notify_change(&uri("content://a/inventory"));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_siblings_are_isolated() {
        let notifier = ChangeNotifier::new();
        let (count, cb) = counter();
        notifier.observe(&uri("content://a/inventory/3"), cb);

        notifier.notify_change(&uri("content://a/inventory/4"));
        notifier.notify_change(&uri("content://b/inventory/3"));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stop_observing() {
        let notifier = ChangeNotifier::new();
        let (count, cb) = counter();
        let id = notifier.observe(&uri("content://a/inventory"), cb);

        assert!(notifier.stop_observing(id));
        assert!(!notifier.stop_observing(id));
        assert_eq!(notifier.observer_count(), 0);

        notifier.notify_change(&uri("content://a/inventory"));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_callback_may_unregister_itself() {
        let notifier = ChangeNotifier::new();
        let handle = notifier.clone();
        let slot: Arc<Mutex<Option<ObserverId>>> = Arc::new(Mutex::new(None));
        let slot_cb = Arc::clone(&slot);

        let id = notifier.observe(
            &uri("content://a/inventory"),
            Arc::new(move || {
                if let Some(id) = slot_cb.lock().unwrap().take() {
                    handle.stop_observing(id);
                }
            }),
        );
        *slot.lock().unwrap() = Some(id);

        notifier.notify_change(&uri("content://a/inventory"));
        assert_eq!(notifier.observer_count(), 0);
    }
}
