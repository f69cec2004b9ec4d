use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::form::{StoreError, SubscriptionStore};
use crate::model::SubscriptionRecord;

/// A submitted subscription with the time it was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSubscription {
    #[serde(flatten)]
    pub record: SubscriptionRecord,
    pub created_at: DateTime<Utc>,
}

/// Shared in-memory holder of submitted subscriptions.
///
/// Clones share the same underlying list, so the form can write through one
/// handle while the list screen reads through another.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionState {
    inner: Rc<RefCell<Vec<StoredSubscription>>>,
}

impl SubscriptionState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently stored subscription.
    pub fn latest(&self) -> Option<StoredSubscription> {
        self.inner.borrow().last().cloned()
    }

    /// All stored subscriptions, newest first.
    pub fn list(&self) -> Vec<StoredSubscription> {
        self.inner.borrow().iter().rev().cloned().collect()
    }

    /// Number of stored subscriptions.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` if nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    fn push_at(
        &self,
        record: SubscriptionRecord,
        created_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut subscriptions = self.inner.try_borrow_mut().map_err(|_| StoreError::Busy)?;
        subscriptions.push(StoredSubscription { record, created_at });
        Ok(())
    }
}

impl SubscriptionStore for SubscriptionState {
    fn set_subscription(&mut self, record: SubscriptionRecord) -> Result<(), StoreError> {
        self.push_at(record, Utc::now())?;
        tracing::debug!(count = self.len(), "subscription stored");
        Ok(())
    }
}
