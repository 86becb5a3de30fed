//! DemandPlanner - how many results to request per category.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Category;

/// Day count used when the duration text says nothing usable.
pub const DEFAULT_DAYS: u32 = 3;

/// Per-category result counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub hotel: usize,
    pub tour: usize,
    pub food: usize,
    pub event: usize,
}

impl CategoryCounts {
    /// Creates counts in canonical category order.
    pub const fn new(hotel: usize, tour: usize, food: usize, event: usize) -> Self {
        Self {
            hotel,
            tour,
            food,
            event,
        }
    }

    /// Returns the count for one category.
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Hotel => self.hotel,
            Category::Tour => self.tour,
            Category::Food => self.food,
            Category::Event => self.event,
        }
    }

    /// Sum over all categories.
    pub fn total(&self) -> usize {
        self.hotel + self.tour + self.food + self.event
    }

    /// `(category, count)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Keyword fallbacks, checked in order when the text has no digits.
const DAY_KEYWORDS: [(&[&str], u32); 5] = [
    (&["당일", "하루"], 1),
    (&["1박", "2일"], 2),
    (&["2박", "3일"], 3),
    (&["3박", "4일"], 4),
    (&["4박", "5일"], 5),
];

/// Count tables by day bucket: ≤1, ≤2, ≤3, ≤4, ≤5, >5.
const DEMAND_TABLE: [CategoryCounts; 6] = [
    CategoryCounts::new(3, 4, 3, 3),
    CategoryCounts::new(3, 6, 5, 3),
    CategoryCounts::new(4, 8, 7, 3),
    CategoryCounts::new(4, 12, 10, 3),
    CategoryCounts::new(5, 15, 13, 3),
    CategoryCounts::new(5, 18, 16, 3),
];

/// Maps free-text trip duration to per-category demand.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemandPlanner;

impl DemandPlanner {
    /// Infers the number of trip days from free text.
    ///
    /// The largest number in the text wins ("2박3일" is 3 days). Without
    /// digits, keyword fallbacks apply; anything else is [`DEFAULT_DAYS`].
    pub fn infer_days(duration: &str) -> u32 {
        let duration = duration.trim();
        if duration.is_empty() {
            return DEFAULT_DAYS;
        }

        let largest = duration
            .split(|c: char| !c.is_ascii_digit())
            .filter(|run| !run.is_empty())
            .map(|run| run.parse::<u32>().unwrap_or(u32::MAX))
            .max();
        if let Some(days) = largest {
            return days;
        }

        DAY_KEYWORDS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| duration.contains(k)))
            .map(|(_, days)| *days)
            .unwrap_or(DEFAULT_DAYS)
    }

    /// Returns the count table for a day count.
    pub fn plan_for_days(days: u32) -> CategoryCounts {
        let bucket = match days {
            0..=1 => 0,
            2 => 1,
            3 => 2,
            4 => 3,
            5 => 4,
            _ => 5,
        };
        DEMAND_TABLE[bucket]
    }

    /// Returns per-category counts for a duration hint.
    pub fn plan(duration: &str) -> CategoryCounts {
        Self::plan_for_days(Self::infer_days(duration))
    }
}
