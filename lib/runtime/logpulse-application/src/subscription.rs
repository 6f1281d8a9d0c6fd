use std::fmt;
use std::sync::Arc;

use logpulse_domain::Snapshot;

pub type SnapshotCallback = Box<dyn FnMut(&Arc<Snapshot>) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Ordered list of snapshot listeners.
///
/// Callbacks run in subscription order on the publishing thread. They must
/// not call back into the engine that owns this list.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, SnapshotCallback)>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Arc<Snapshot>) + Send + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    pub fn publish(&mut self, snapshot: &Arc<Snapshot>) {
        for (_, callback) in &mut self.entries {
            callback(snapshot);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_publish_reaches_subscribers_until_unsubscribed() {
        let mut subscribers = Subscribers::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let first = subscribers.subscribe(move |snapshot| {
            sink.lock().unwrap().push(("first", snapshot.sequence));
        });
        let sink = Arc::clone(&seen);
        subscribers.subscribe(move |snapshot| {
            sink.lock().unwrap().push(("second", snapshot.sequence));
        });

        let snapshot = Arc::new(Snapshot::default());
        subscribers.publish(&snapshot);
        assert!(subscribers.unsubscribe(first));
        assert!(!subscribers.unsubscribe(first));
        subscribers.publish(&snapshot);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![("first", 0), ("second", 0), ("second", 0)]
        );
        assert_eq!(subscribers.len(), 1);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut subscribers = Subscribers::new();
        let a = subscribers.subscribe(|_| {});
        let b = subscribers.subscribe(|_| {});
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "sub-1");
    }
}
