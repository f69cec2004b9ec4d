use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Validation failures for sign-up form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The field is empty or was never filled in.
    #[error("value is required")]
    Required,
    /// The field is non-empty but does not have the expected shape.
    #[error("value does not match the expected pattern")]
    PatternMismatch,
}

/// The validated fields of the sign-up form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Password,
}

impl Field {
    /// Human-readable label, also used as the `field` of a validation message.
    pub fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Password => "Password",
        }
    }
}

#[mutants::skip]
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw values of the sign-up form as typed by the user.
///
/// `email` stays `None` until the field is first edited, and again after a reset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormFields {
    pub email: Option<String>,
    pub password: String,
}

/// A user-facing validation message for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessage {
    pub field: Field,
    pub message: String,
}

/// Symbols of which a password must contain at least one.
pub const PASSWORD_SYMBOLS: &str = "#?!@$%^&*-";

/// Minimum password length, in characters.
pub const PASSWORD_MIN_LEN: usize = 8;

const INVALID_EMAIL_MESSAGE: &str = "Enter Valid Email";
const INVALID_PASSWORD_MESSAGE: &str =
    "Enter a Password 8 character long with at least one character and one special character";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,4}$").expect("valid hardcoded regex")
});

/// Validates an email address.
///
/// Matching is case-sensitive; callers are expected to fold input to lowercase.
pub fn validate_email(email: Option<&str>) -> Result<(), ValidationError> {
    match email {
        None | Some("") => Err(ValidationError::Required),
        Some(s) if EMAIL_RE.is_match(s) => Ok(()),
        Some(_) => Err(ValidationError::PatternMismatch),
    }
}

/// Validates a password: at least [`PASSWORD_MIN_LEN`] characters, with at
/// least one ASCII letter and one of [`PASSWORD_SYMBOLS`].
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Required);
    }
    let long_enough = password.chars().count() >= PASSWORD_MIN_LEN;
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));
    if long_enough && has_letter && has_symbol {
        Ok(())
    } else {
        Err(ValidationError::PatternMismatch)
    }
}

/// Maps a validation outcome to the message shown next to `field`.
///
/// Returns an empty string for a passing outcome.
pub fn error_message_for(field: Field, outcome: &Result<(), ValidationError>) -> String {
    match (field, outcome) {
        (_, Ok(())) => String::new(),
        (field, Err(ValidationError::Required)) => format!("{} is required", field.label()),
        (Field::Email, Err(ValidationError::PatternMismatch)) => INVALID_EMAIL_MESSAGE.to_string(),
        (Field::Password, Err(ValidationError::PatternMismatch)) => {
            INVALID_PASSWORD_MESSAGE.to_string()
        }
    }
}

/// Validates a single field of `fields`.
pub fn validate_field(fields: &FormFields, field: Field) -> Result<(), ValidationError> {
    match field {
        Field::Email => validate_email(fields.email.as_deref()),
        Field::Password => validate_password(&fields.password),
    }
}

/// Returns `true` iff every field passes validation.
pub fn is_form_valid(fields: &FormFields) -> bool {
    validate_field(fields, Field::Email).is_ok() && validate_field(fields, Field::Password).is_ok()
}

/// Collects a message for every failing field, email first, then password.
pub fn validation_messages(fields: &FormFields) -> Vec<ValidationMessage> {
    [Field::Email, Field::Password]
        .into_iter()
        .filter_map(|field| {
            let outcome = validate_field(fields, field);
            outcome.is_err().then(|| ValidationMessage {
                field,
                message: error_message_for(field, &outcome),
            })
        })
        .collect()
}
