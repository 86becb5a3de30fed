//! Profile sufficiency gate - decides when retrieval may begin.

use serde::{Deserialize, Serialize};

use super::trip_profile::TripProfile;

/// Filled trip fields required in count-threshold mode.
pub const COUNT_THRESHOLD: usize = 3;

/// Rule used to decide whether enough is known to start retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SufficiencyMode {
    /// At least three of dates, duration, group, interests, budget, region.
    #[default]
    CountThreshold,
    /// A recognized identity with persona is enough on its own; otherwise
    /// either travel dates or duration must be known.
    IdentityShortcut,
}

/// Returns true when the profile satisfies the given mode.
pub fn is_sufficient(profile: &TripProfile, mode: SufficiencyMode) -> bool {
    match mode {
        SufficiencyMode::CountThreshold => profile.filled_field_count() >= COUNT_THRESHOLD,
        SufficiencyMode::IdentityShortcut => {
            if profile.has_identity() {
                return true;
            }
            let known = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.trim().is_empty());
            known(&profile.travel_dates) || known(&profile.duration)
        }
    }
}
