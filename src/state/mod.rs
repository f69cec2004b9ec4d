//! In-memory holder for submitted subscriptions.

mod subscriptions;

pub use subscriptions::{StoredSubscription, SubscriptionState};
