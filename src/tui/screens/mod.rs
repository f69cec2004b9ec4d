//! TUI screen implementations.

pub mod create_subscription;
pub mod help;
pub mod subscription_list;

pub use create_subscription::{
    CreateSubscriptionState, Focus, SubscriptionForm, draw_create_subscription,
};
pub use help::{HelpState, draw_help};
pub use subscription_list::{SubscriptionListState, draw_subscription_list};
