//! Sign-up form logic: idle detection, submit/clear orchestration and the
//! collaborator traits the form talks to.

mod controller;
mod error;
mod idle;
mod ports;

pub use controller::{DEFAULT_DIALOG_WIDTH, FormController, SubmitOutcome};
pub use error::{FormError, NavigationError, StoreError};
pub use idle::{DEFAULT_IDLE_DELAY, IdleDetector};
pub use ports::{ConfirmDialog, DialogConfig, DialogResult, Navigator, Route, SubscriptionStore};
