//! Cancellation handles and the per-cell dispose bag.

/// Handle to a live observation.
///
/// Disposing (explicitly or by dropping) runs the cancellation exactly once.
/// After disposal the observed source never calls the observer again, even
/// if a notification round is already in flight.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Create a subscription that runs `cancel` when disposed.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to cancel.
    pub fn empty() -> Self {
        Self { cancel: None }
    }

    /// Fold several subscriptions into one that disposes all of them in order.
    pub fn merge(parts: Vec<Subscription>) -> Self {
        Self::new(move || drop(parts))
    }

    /// Cancel now.
    pub fn dispose(mut self) {
        self.cancel_now();
    }

    /// True until the subscription has been disposed.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Owned set of subscriptions disposed together.
///
/// A cell keeps one bag for everything tied to its current binding and
/// empties it before it is bound again.
#[derive(Debug, Default)]
pub struct DisposeBag {
    subscriptions: Vec<Subscription>,
}

impl DisposeBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a subscription.
    pub fn insert(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Dispose everything in registration order and leave the bag empty.
    pub fn dispose(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
    }

    /// Number of held subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// True when the bag holds nothing.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
