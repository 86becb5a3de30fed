//! Planning module - per-category demand derived from the profile.

mod budget;
mod demand;
mod search_policy;

pub use budget::synthesis_budget;
pub use demand::{CategoryCounts, DemandPlanner, DEFAULT_DAYS};
pub use search_policy::SearchPolicy;
