//! Reusable TUI widgets.

pub mod confirm_dialog;
pub mod form;
pub mod status_bar;

pub use confirm_dialog::{ConfirmDialogState, dialog_columns, draw_confirm_dialog};
pub use form::{FormRow, draw_form, mask};
pub use status_bar::{StatusBarContext, draw_status_bar};
