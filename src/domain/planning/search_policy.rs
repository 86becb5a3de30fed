//! Search policy - which categories a ready turn should search.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Category;

/// Which categories to search once the profile is sufficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPolicy {
    /// Search all four categories.
    #[default]
    Always,
    /// Search only categories whose signal words appear in the message;
    /// all four when none do.
    KeywordGated,
}

impl SearchPolicy {
    /// Categories to search for this message, in canonical order.
    pub fn categories_for(&self, message: &str) -> Vec<Category> {
        match self {
            SearchPolicy::Always => Category::ALL.to_vec(),
            SearchPolicy::KeywordGated => {
                let signaled: Vec<Category> = Category::ALL
                    .into_iter()
                    .filter(|c| c.is_signaled_by(message))
                    .collect();
                if signaled.is_empty() {
                    Category::ALL.to_vec()
                } else {
                    signaled
                }
            }
        }
    }
}
