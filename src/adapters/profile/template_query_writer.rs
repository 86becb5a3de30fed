//! Template Query Writer - composes retrieval queries from profile fields.
//!
//! Output shape: `{region} {group} {persona} {style} {interests} {category phrase} 추천`.
//! Every query ends in "추천" so batch perturbation has a word to rewrite.

use async_trait::async_trait;

use crate::domain::foundation::Category;
use crate::domain::profile::TripProfile;
use crate::ports::{QueryWriter, QueryWriterError};

const DEFAULT_REGION: &str = "제주도";

/// QueryWriter that needs no model.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateQueryWriter;

impl TemplateQueryWriter {
    pub fn new() -> Self {
        Self
    }

    /// Builds the query synchronously.
    pub fn compose(&self, category: Category, profile: &TripProfile) -> String {
        let mut parts: Vec<String> = Vec::new();

        parts.push(region_phrase(profile));
        if let Some(group) = profile.group_type.as_deref().and_then(|g| group_phrase(category, g)) {
            parts.push(group.to_string());
        }
        if let Some(persona) = profile.persona_tag.as_deref().and_then(persona_phrase) {
            parts.push(persona.to_string());
        }
        if let Some(style) = non_blank(profile.style_tag.as_deref()) {
            parts.push(style.to_string());
        }
        if !profile.interests.is_empty() {
            parts.push(profile.interests.join(" "));
        }
        parts.push(category_phrase(category).to_string());
        parts.push("추천".to_string());

        parts.join(" ")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn region_phrase(profile: &TripProfile) -> String {
    match non_blank(profile.travel_region.as_deref()) {
        Some(region) if region.contains("제주") => region.to_string(),
        Some(region) => format!("제주 {}", region),
        None => DEFAULT_REGION.to_string(),
    }
}

fn group_phrase(category: Category, group: &str) -> Option<&'static str> {
    let phrase = match (category, group.trim()) {
        (Category::Hotel, "커플") => "로맨틱한 오션뷰",
        (Category::Hotel, "가족") => "가족 친화적인",
        (Category::Hotel, "친구") => "넓고 편리한",
        (Category::Hotel, "혼자") => "1인 여행객에게 좋은",
        (Category::Tour, "커플") => "커플 데이트",
        (Category::Tour, "가족") => "아이와 함께 가기 좋은",
        (Category::Tour, "친구") => "친구와 즐기는",
        (Category::Tour, "혼자") => "혼자 조용히 걷기 좋은",
        (Category::Food, "커플") => "분위기 좋은 데이트",
        (Category::Food, "가족") => "가족 외식",
        (Category::Food, "친구") => "여럿이 먹기 좋은",
        (Category::Food, "혼자") => "혼밥하기 좋은",
        (Category::Event, "커플") => "커플이 함께 즐기기 좋은",
        (Category::Event, "가족") => "가족 체험",
        (Category::Event, "친구") => "친구와 참여하는",
        (Category::Event, "혼자") => "혼자서도 즐길 수 있는",
        _ => return None,
    };
    Some(phrase)
}

fn persona_phrase(persona: &str) -> Option<&'static str> {
    match persona.trim() {
        "테토남" | "테토녀" => Some("효율적이고 모던한"),
        "에겐남" | "에겐녀" => Some("따뜻하고 아늑한"),
        _ => None,
    }
}

fn category_phrase(category: Category) -> &'static str {
    match category {
        Category::Hotel => "호텔 숙박",
        Category::Tour => "관광지 명소",
        Category::Food => "맛집",
        Category::Event => "축제 이벤트 행사",
    }
}

#[async_trait]
impl QueryWriter for TemplateQueryWriter {
    async fn write_query(
        &self,
        category: Category,
        profile: &TripProfile,
        _message: &str,
    ) -> Result<String, QueryWriterError> {
        Ok(self.compose(category, profile))
    }
}
