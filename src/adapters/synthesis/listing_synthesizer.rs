//! Listing synthesizer - markdown itineraries without a model.
//!
//! Used when no AI provider is configured. The itinerary is a per-category
//! list of the retrieved places and the follow-up asks for the first
//! missing trip fields.

use async_trait::async_trait;

use crate::domain::profile::EMPTY_SUMMARY;
use crate::ports::{FollowUpRequest, ItinerarySynthesizer, SynthesisError, SynthesisRequest};

/// Missing fields named in one follow-up question.
const FOLLOW_UP_FIELDS: usize = 2;

/// ItinerarySynthesizer that formats results as fixed markdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingSynthesizer;

impl ListingSynthesizer {
    pub fn new() -> Self {
        Self
    }

    fn render(&self, request: &SynthesisRequest) -> String {
        let mut doc = String::from("## 제주 여행 추천\n\n");
        if request.profile_summary != EMPTY_SUMMARY {
            doc.push_str(&format!("> {}\n\n", request.profile_summary));
        }

        for result in &request.results {
            doc.push_str(&format!("### {}\n", result.category.label()));
            if result.is_empty() {
                doc.push_str("- 검색 결과가 없습니다\n\n");
                continue;
            }
            for item in &result.items {
                match (item.address.trim(), item.description.trim()) {
                    ("", "") => doc.push_str(&format!("- **{}**\n", item.name)),
                    ("", desc) => doc.push_str(&format!("- **{}**: {}\n", item.name, desc)),
                    (addr, "") => doc.push_str(&format!("- **{}** ({})\n", item.name, addr)),
                    (addr, desc) => {
                        doc.push_str(&format!("- **{}** ({}): {}\n", item.name, addr, desc))
                    }
                }
            }
            doc.push('\n');
        }
        doc.trim_end().to_string()
    }
}

#[async_trait]
impl ItinerarySynthesizer for ListingSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, SynthesisError> {
        if request.results.iter().all(|r| r.is_empty()) {
            return Err(SynthesisError::Empty);
        }
        Ok(self.render(request))
    }

    async fn follow_up(&self, request: &FollowUpRequest) -> Result<String, SynthesisError> {
        let asked: Vec<&str> = request
            .missing_fields
            .iter()
            .take(FOLLOW_UP_FIELDS)
            .copied()
            .collect();
        if asked.is_empty() {
            return Ok("더 원하시는 여행 스타일이 있으면 알려주세요!".to_string());
        }
        Ok(format!(
            "좋아요! 더 잘 맞는 추천을 위해 {}을(를) 알려주시겠어요?",
            asked.join(", ")
        ))
    }
}
