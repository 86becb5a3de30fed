//! Profile module - trip attributes and the rules for growing them.
//!
//! A [`TripProfile`] accumulates across turns. Each turn yields a
//! [`ProfileUpdate`] from the extraction collaborator which is merged in with
//! [`TripProfile::merge`]; [`is_sufficient`] then decides whether the
//! conversation can move on to retrieval.
//!
//! # Example
//!
//! ```ignore
//! let update = ProfileUpdate::parse_lenient(r#"{"duration": "2박3일"}"#);
//! let profile = TripProfile::new().merge(&update);
//! assert!(!is_sufficient(&profile, SufficiencyMode::CountThreshold));
//! ```

mod sufficiency;
mod trip_profile;
mod update;

pub use sufficiency::{is_sufficient, SufficiencyMode, COUNT_THRESHOLD};
pub use trip_profile::{TripProfile, EMPTY_SUMMARY, TRIP_FIELD_COUNT};
pub use update::ProfileUpdate;
