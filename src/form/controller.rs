use std::time::{Duration, Instant};

use futures::channel::oneshot;

use super::error::FormError;
use super::idle::{DEFAULT_IDLE_DELAY, IdleDetector};
use super::ports::{ConfirmDialog, DialogConfig, DialogResult, Navigator, Route, SubscriptionStore};
use crate::model::{
    DEFAULT_TIER, Field, FormFields, SubscriptionRecord, SubscriptionTier, ValidationMessage,
    default_tiers, is_form_valid, tier_name, validation_messages,
};

/// Width requested for the clear-form confirmation dialog.
pub const DEFAULT_DIALOG_WIDTH: &str = "300px";

/// Result of [`FormController::on_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; see [`FormController::messages`].
    Invalid,
    /// The record was stored and navigation was requested.
    Submitted(SubscriptionRecord),
}

/// Computes the warning flag after the idle detector fires.
///
/// The warning is raised when the user stopped on an invalid form and stays
/// raised until they stop on a valid one.
fn next_form_warning(current: bool, stopped: bool, valid: bool) -> bool {
    match (stopped, valid) {
        (true, false) => true,
        (true, true) => false,
        (false, _) => current,
    }
}

/// Owns the sign-up form state and drives validation, idle detection and
/// the storage, navigation and dialog collaborators.
pub struct FormController<S, N, D> {
    store: S,
    navigator: N,
    dialog: D,
    fields: FormFields,
    subscription_types: Vec<SubscriptionTier>,
    selected_subscription: String,
    idle: IdleDetector,
    messages: Vec<ValidationMessage>,
    form_warning: bool,
    dialog_width: String,
    pending_clear: Option<oneshot::Receiver<DialogResult>>,
}

impl<S, N, D> FormController<S, N, D>
where
    S: SubscriptionStore,
    N: Navigator,
    D: ConfirmDialog,
{
    /// Creates an initialized controller with the default idle delay.
    pub fn new(store: S, navigator: N, dialog: D) -> Self {
        let mut controller = Self {
            store,
            navigator,
            dialog,
            fields: FormFields::default(),
            subscription_types: Vec::new(),
            selected_subscription: String::new(),
            idle: IdleDetector::new(DEFAULT_IDLE_DELAY),
            messages: Vec::new(),
            form_warning: false,
            dialog_width: DEFAULT_DIALOG_WIDTH.to_string(),
            pending_clear: None,
        };
        controller.initialize();
        controller
    }

    /// Replaces the idle delay. Any pending idle deadline is dropped.
    pub fn with_idle_delay(mut self, delay: Duration) -> Self {
        self.idle = IdleDetector::new(delay);
        self
    }

    /// Replaces the width requested for confirmation dialogs.
    pub fn with_dialog_width(mut self, width: impl Into<String>) -> Self {
        self.dialog_width = width.into();
        self
    }

    /// Resets the form to its initial state.
    ///
    /// Clears both fields, restores the tier list and the default tier, drops
    /// messages and the warning, cancels any pending idle deadline and forgets
    /// any unanswered clear request. Calling it repeatedly has no further effect.
    pub fn initialize(&mut self) {
        self.fields = FormFields::default();
        self.subscription_types = default_tiers();
        self.selected_subscription = DEFAULT_TIER.to_string();
        self.idle.cancel();
        self.messages.clear();
        self.form_warning = false;
        self.pending_clear = None;
    }

    /// Stores a new value for `field` and records the keystroke for idle detection.
    pub fn on_field_input(&mut self, field: Field, value: impl Into<String>, now: Instant) {
        let value = value.into();
        match field {
            Field::Email => self.fields.email = Some(value),
            Field::Password => self.fields.password = value,
        }
        self.idle.on_keystroke(now);
    }

    /// Selects the tier keyed by `value`.
    ///
    /// Unknown keys are rejected and leave the current selection unchanged.
    pub fn select_tier(&mut self, value: &str) -> Result<(), FormError> {
        if tier_name(&self.subscription_types, value).is_none() {
            return Err(FormError::UnknownTier(value.to_string()));
        }
        self.selected_subscription = value.to_string();
        Ok(())
    }

    /// Asks for confirmation before clearing the form.
    ///
    /// Returns immediately; the answer is applied by a later [`poll_dialog`](Self::poll_dialog).
    /// A second request replaces an unanswered first one.
    pub fn on_clear(&mut self) {
        let config = DialogConfig {
            width: self.dialog_width.clone(),
        };
        self.pending_clear = Some(self.dialog.open_confirmation(config));
    }

    /// Applies the answer to a pending clear request, if it has arrived.
    ///
    /// Only an explicit confirmation resets the form; a refusal or a dismissed
    /// dialog changes nothing. Returns `true` if the form was reset.
    pub fn poll_dialog(&mut self) -> bool {
        let Some(receiver) = self.pending_clear.as_mut() else {
            return false;
        };
        let confirmed = match receiver.try_recv() {
            Ok(None) => return false,
            Ok(Some(result)) => result.confirmed,
            Err(oneshot::Canceled) => false,
        };
        self.pending_clear = None;
        if confirmed {
            tracing::info!("form cleared");
            self.initialize();
        } else {
            tracing::debug!("clear not confirmed");
        }
        confirmed
    }

    /// Fires the idle deadline if it has elapsed, recomputing the warning flag.
    ///
    /// Returns `true` if the deadline fired.
    pub fn poll_idle(&mut self, now: Instant) -> bool {
        let fields = &self.fields;
        let form_warning = &mut self.form_warning;
        self.idle.poll(now, || {
            let next = next_form_warning(*form_warning, true, is_form_valid(fields));
            if next != *form_warning {
                tracing::debug!(warning = next, "form warning changed");
            }
            *form_warning = next;
        })
    }

    /// Advances time-driven state: the idle deadline and the clear dialog.
    pub fn tick(&mut self, now: Instant) {
        self.poll_idle(now);
        self.poll_dialog();
    }

    /// Validates the form and, if valid, stores the subscription and
    /// navigates to the subscription list.
    ///
    /// Invalid input is not an error: messages are recomputed and
    /// [`SubmitOutcome::Invalid`] is returned without touching the
    /// collaborators. Once storage accepts the record there is no rollback,
    /// even if navigation then fails.
    pub fn on_submit(&mut self) -> Result<SubmitOutcome, FormError> {
        if !is_form_valid(&self.fields) {
            self.messages = validation_messages(&self.fields);
            tracing::info!(errors = self.messages.len(), "submit rejected");
            return Ok(SubmitOutcome::Invalid);
        }

        let tier = tier_name(&self.subscription_types, &self.selected_subscription)
            .ok_or_else(|| FormError::UnknownTier(self.selected_subscription.clone()))?
            .to_string();
        let record = SubscriptionRecord {
            email: self.fields.email.clone().unwrap_or_default(),
            tier,
            password: self.fields.password.clone(),
        };
        self.messages.clear();

        self.store.set_subscription(record.clone())?;
        self.navigator.navigate(Route::SubscriptionList)?;
        tracing::info!(tier = %record.tier, "subscription submitted");
        Ok(SubmitOutcome::Submitted(record))
    }

    /// Current email value, `None` until first typed.
    pub fn email(&self) -> Option<&str> {
        self.fields.email.as_deref()
    }

    /// Current password value.
    pub fn password(&self) -> &str {
        &self.fields.password
    }

    /// Both field values.
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// `true` once the user has stopped typing for the idle delay.
    pub fn stopped(&self) -> bool {
        self.idle.stopped()
    }

    /// Messages from the last rejected submit.
    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    /// Whether the "form has problems" warning should be shown.
    pub fn form_warning(&self) -> bool {
        self.form_warning
    }

    /// The selectable tiers, in display order.
    pub fn subscription_types(&self) -> &[SubscriptionTier] {
        &self.subscription_types
    }

    /// Key of the selected tier.
    pub fn selected_subscription(&self) -> &str {
        &self.selected_subscription
    }

    /// Time left until the idle deadline fires, if one is pending.
    pub fn time_until_idle(&self, now: Instant) -> Option<Duration> {
        self.idle.time_until_idle(now)
    }

    /// `true` while a clear request waits for its answer.
    pub fn is_clear_pending(&self) -> bool {
        self.pending_clear.is_some()
    }

    /// The storage collaborator.
    pub fn store(&self) -> &S {
        &self.store
    }
}
