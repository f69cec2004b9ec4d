mod subscription;
mod validation;

pub use subscription::{
    DEFAULT_TIER, SubscriptionRecord, SubscriptionTier, default_tiers, tier_name,
};
pub use validation::{
    Field, FormFields, PASSWORD_MIN_LEN, PASSWORD_SYMBOLS, ValidationError, ValidationMessage,
    error_message_for, is_form_valid, validate_email, validate_field, validate_password,
    validation_messages,
};
