//! Synthesis budget - how many results per category reach the itinerary prompt.

use super::demand::CategoryCounts;

/// Caps applied to each category's results before synthesis.
pub fn synthesis_budget(days: u32) -> CategoryCounts {
    match days {
        0..=2 => CategoryCounts::new(3, 6, 5, 2),
        3 => CategoryCounts::new(3, 8, 6, 3),
        4 => CategoryCounts::new(4, 10, 8, 4),
        _ => CategoryCounts::new(5, 15, 10, 5),
    }
}
