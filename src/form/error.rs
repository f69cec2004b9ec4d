/// Errors reported by a [`SubscriptionStore`](super::SubscriptionStore).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store is in use elsewhere and cannot accept a write right now.
    #[error("subscription store is busy")]
    Busy,
}

/// Errors reported by a [`Navigator`](super::Navigator).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// Nothing is listening for navigation requests any more.
    #[error("navigation target is gone, cannot open {0}")]
    Closed(String),
}

/// Errors that can occur while operating the sign-up form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// A tier key does not name any known tier.
    #[error("unknown subscription tier: {0}")]
    UnknownTier(String),

    /// Storing the submitted subscription failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Navigating away after a successful submit failed.
    #[error("navigation error: {0}")]
    Navigation(#[from] NavigationError),
}
