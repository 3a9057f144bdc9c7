//! Listener registry for committed state changes.
//!
//! Observers register a zero-argument callback and read the state back
//! through the engine accessor when it fires; no payload is carried.
//! Callbacks run synchronously, once per committed mutation, so no
//! partially-applied transition is ever observable.

use tracing::{debug, instrument};

/// Callback invoked after every committed mutation.
pub type Listener = Box<dyn Fn() + Send>;

/// Handle returned by [`ChangeNotifier::subscribe`]; pass it back to
/// [`ChangeNotifier::unsubscribe`] for symmetric teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

/// Registry of change listeners.
pub struct ChangeNotifier {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

impl ChangeNotifier {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Registers a listener and returns its subscription handle.
    #[instrument(skip_all)]
    pub fn subscribe(&mut self, listener: impl Fn() + Send + 'static) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        debug!(id, count = self.listeners.len(), "Listener subscribed");
        Subscription(id)
    }

    /// Removes the listener behind `subscription`. Unknown handles are
    /// ignored, so teardown is idempotent.
    #[instrument(skip(self))]
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.listeners.retain(|(id, _)| *id != subscription.0);
        debug!(count = self.listeners.len(), "Listener unsubscribed");
    }

    /// Invokes every listener once, in subscription order.
    pub fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener();
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
