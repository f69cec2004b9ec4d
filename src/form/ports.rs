//! Capabilities the form controller depends on but does not implement.

use std::fmt;

use futures::channel::oneshot;

use super::error::{NavigationError, StoreError};
use crate::model::SubscriptionRecord;

/// Views the form can ask to navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The sign-up form itself.
    CreateSubscription,
    /// The list of stored subscriptions.
    SubscriptionList,
}

impl Route {
    /// Stable route key.
    pub fn key(self) -> &'static str {
        match self {
            Self::CreateSubscription => "create-subscription",
            Self::SubscriptionList => "list-subscription",
        }
    }
}

#[mutants::skip]
impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Presentation hints for a confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogConfig {
    /// Requested dialog width, e.g. `"300px"`.
    pub width: String,
}

/// The answer a confirmation dialog resolves with.
///
/// A dialog dismissed without an answer resolves with nothing: its sender is
/// dropped and the receiver observes cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogResult {
    pub confirmed: bool,
}

/// Holds submitted subscriptions.
pub trait SubscriptionStore {
    /// Stores `record`. Called once per successful submit.
    fn set_subscription(&mut self, record: SubscriptionRecord) -> Result<(), StoreError>;
}

/// Switches the visible view.
pub trait Navigator {
    /// Requests navigation to `route`.
    fn navigate(&mut self, route: Route) -> Result<(), NavigationError>;
}

/// Asks the user a yes/no question.
pub trait ConfirmDialog {
    /// Opens a confirmation dialog. The answer arrives later on the returned receiver.
    fn open_confirmation(&mut self, config: DialogConfig) -> oneshot::Receiver<DialogResult>;
}
