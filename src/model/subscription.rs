use serde::{Deserialize, Serialize};

/// Key of the tier selected when the form is first shown or reset.
pub const DEFAULT_TIER: &str = "advanced";

/// One selectable subscription level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionTier {
    /// Stable key used for selection.
    pub value: String,
    /// Display name written into the submitted record.
    pub name: String,
}

impl SubscriptionTier {
    fn new(value: &str, name: &str) -> Self {
        Self {
            value: value.to_string(),
            name: name.to_string(),
        }
    }
}

/// Builds the fixed, ordered list of tiers: Basic, Advanced, Pro.
pub fn default_tiers() -> Vec<SubscriptionTier> {
    vec![
        SubscriptionTier::new("basic", "Basic"),
        SubscriptionTier::new("advanced", "Advanced"),
        SubscriptionTier::new("pro", "Pro"),
    ]
}

/// Returns the display name of the tier keyed by `value`, scanning in order.
pub fn tier_name<'a>(tiers: &'a [SubscriptionTier], value: &str) -> Option<&'a str> {
    tiers
        .iter()
        .find(|tier| tier.value == value)
        .map(|tier| tier.name.as_str())
}

/// A completed subscription, handed to storage after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub email: String,
    /// Display name of the chosen tier (e.g. `"Advanced"`), not its key.
    #[serde(rename = "type")]
    pub tier: String,
    pub password: String,
}
