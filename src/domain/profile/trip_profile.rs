//! TripProfile - the accumulating record of what the traveller has told us.

use serde::{Deserialize, Serialize};

use super::update::ProfileUpdate;

/// Number of trip fields that count toward sufficiency and completion.
pub const TRIP_FIELD_COUNT: usize = 6;

/// Text shown when nothing is known yet.
pub const EMPTY_SUMMARY: &str = "정보 없음";

/// Trip attributes gathered across a conversation.
///
/// Created empty when a session starts and only ever grows: merging fills or
/// overwrites scalar fields with newly extracted values and appends unseen
/// interest tags, but never clears anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripProfile {
    pub travel_dates: Option<String>,
    pub duration: Option<String>,
    pub group_type: Option<String>,
    pub travel_region: Option<String>,
    pub budget: Option<String>,
    /// Interest tags in first-seen order, without duplicates.
    #[serde(default)]
    pub interests: Vec<String>,
    pub display_name: Option<String>,
    pub persona_tag: Option<String>,
    pub style_tag: Option<String>,
}

impl TripProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new profile with `update` merged into a copy of this one.
    pub fn merge(&self, update: &ProfileUpdate) -> TripProfile {
        let mut merged = self.clone();
        merged.apply(update);
        merged
    }

    /// Merges `update` into this profile in place.
    ///
    /// Present, non-blank scalar values overwrite; blank or missing values are
    /// ignored. Interest tags are unioned in, keeping first-seen order.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        overwrite(&mut self.travel_dates, &update.travel_dates);
        overwrite(&mut self.duration, &update.duration);
        overwrite(&mut self.group_type, &update.group_type);
        overwrite(&mut self.travel_region, &update.travel_region);
        overwrite(&mut self.budget, &update.budget);
        overwrite(&mut self.display_name, &update.display_name);
        overwrite(&mut self.persona_tag, &update.persona_tag);
        overwrite(&mut self.style_tag, &update.style_tag);

        for tag in &update.interests {
            let tag = tag.trim();
            if !tag.is_empty() && !self.interests.iter().any(|t| t == tag) {
                self.interests.push(tag.to_string());
            }
        }
    }

    /// Counts the filled fields among dates, duration, group, interests, budget and region.
    pub fn filled_field_count(&self) -> usize {
        self.trip_fields().iter().filter(|(_, filled)| *filled).count()
    }

    /// Fraction of the six trip fields that are filled, in `0.0..=1.0`.
    pub fn completion(&self) -> f32 {
        self.filled_field_count() as f32 / TRIP_FIELD_COUNT as f32
    }

    /// Labels of the trip fields that are still unknown.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.trip_fields()
            .into_iter()
            .filter(|(_, filled)| !filled)
            .map(|(label, _)| label)
            .collect()
    }

    /// Returns true when both a recognized identity and a persona are set.
    pub fn has_identity(&self) -> bool {
        is_filled(&self.display_name) && is_filled(&self.persona_tag)
    }

    /// One-line summary, `label: value` parts joined by ` | `.
    pub fn summary(&self) -> String {
        let interests = self.interests.join(", ");
        let parts: Vec<String> = [
            ("이름", self.display_name.as_deref()),
            ("성향", self.persona_tag.as_deref()),
            ("여행 스타일", self.style_tag.as_deref()),
            ("여행 날짜", self.travel_dates.as_deref()),
            ("여행 기간", self.duration.as_deref()),
            ("여행 유형", self.group_type.as_deref()),
            ("관심사", Some(interests.as_str())),
            ("예산", self.budget.as_deref()),
            ("여행 지역", self.travel_region.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, value)| match value {
            Some(v) if !v.trim().is_empty() => Some(format!("{}: {}", label, v)),
            _ => None,
        })
        .collect();

        if parts.is_empty() {
            EMPTY_SUMMARY.to_string()
        } else {
            parts.join(" | ")
        }
    }

    fn trip_fields(&self) -> [(&'static str, bool); TRIP_FIELD_COUNT] {
        [
            ("여행 날짜", is_filled(&self.travel_dates)),
            ("여행 기간", is_filled(&self.duration)),
            ("여행 유형", is_filled(&self.group_type)),
            ("관심사", !self.interests.is_empty()),
            ("예산", is_filled(&self.budget)),
            ("여행 지역", is_filled(&self.travel_region)),
        ]
    }
}

fn is_filled(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn overwrite(field: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value.as_deref().map(str::trim) {
        if !v.is_empty() {
            *field = Some(v.to_string());
        }
    }
}
