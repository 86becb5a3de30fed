//! Category enum for the four retrieval domains.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// One of the four retrieval domains.
///
/// Variant order is the canonical dispatch order: sequential dispatch visits
/// categories in exactly this order and reports always list them this way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Lodging.
    Hotel,
    /// Sights.
    Tour,
    /// Restaurants and cafes.
    Food,
    /// Festivals, performances, hands-on programs.
    Event,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 4] = [
        Category::Hotel,
        Category::Tour,
        Category::Food,
        Category::Event,
    ];

    /// Returns the wire/config name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hotel => "hotel",
            Category::Tour => "tour",
            Category::Food => "food",
            Category::Event => "event",
        }
    }

    /// Returns the label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Hotel => "숙박",
            Category::Tour => "관광지",
            Category::Food => "맛집",
            Category::Event => "이벤트",
        }
    }

    /// Words in a user message that signal interest in this category.
    pub fn signal_keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Hotel => &[
                "숙박", "호텔", "펜션", "리조트", "게스트하우스", "잠", "머물", "체크인", "숙소",
            ],
            Category::Tour => &[
                "관광", "여행지", "명소", "가볼만한", "구경", "관광지", "장소", "코스", "여행",
                "일정",
            ],
            Category::Food => &[
                "맛집", "음식", "식당", "카페", "먹을", "요리", "특산품", "디저트", "점심", "저녁",
                "식사",
            ],
            Category::Event => &["축제", "이벤트", "행사", "공연", "체험", "활동", "프로그램"],
        }
    }

    /// Returns true if the text contains any of this category's signal words.
    pub fn is_signaled_by(&self, text: &str) -> bool {
        self.signal_keywords().iter().any(|k| text.contains(k))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hotel" => Ok(Category::Hotel),
            "tour" => Ok(Category::Tour),
            "food" => Ok(Category::Food),
            "event" => Ok(Category::Event),
            other => Err(ValidationError::invalid_format(
                "category",
                format!("unknown value '{}'", other),
            )),
        }
    }
}
