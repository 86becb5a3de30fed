//! Prompt templates for the LLM-backed collaborators.
//!
//! Prompts are Korean because the conversation is. Each builder returns the
//! user-turn text; system prompts are constants.

use serde::Serialize;

use crate::domain::foundation::Category;
use crate::domain::retrieval::CategoryResult;
use crate::ports::{FollowUpRequest, SynthesisRequest};

/// System prompt for profile extraction.
pub const EXTRACTION_SYSTEM_PROMPT: &str =
    "당신은 제주도 여행 상담 메시지에서 여행 정보를 추출하는 도우미입니다. 반드시 JSON 객체 하나만 출력하세요.";

/// System prompt for itinerary synthesis.
pub const SYNTHESIS_SYSTEM_PROMPT: &str = "당신은 제주 여행 일정 추천 전문가 '오르미'입니다.
- 친구처럼 친근하고 자연스러운 말투로 말하세요.
- 일정은 오전 / 오후 / 저녁으로 나누고, 시간대마다 1~2곳을 제안하세요.
- 장소 간 이동 동선과 소요 시간을 고려하세요.
- 식사 시간에는 반드시 식사가 가능한 장소를 포함하세요.
- 1일차 오후에는 숙소에 체크인하고, 모든 날은 숙소에서, 마지막 날은 공항에서 마무리하세요.
- 장소 설명은 제공된 정보만 사용하고 추측하지 마세요.
- 모든 장소는 정확한 이름과 주소를 포함하세요.";

/// System prompt for clarifying follow-ups.
pub const FOLLOW_UP_SYSTEM_PROMPT: &str =
    "당신은 제주도 여행 상담사입니다. 사용자와 자연스럽게 대화하면서 필요한 정보를 수집하세요.";

/// System prompt for query writing.
pub const QUERY_SYSTEM_PROMPT: &str =
    "당신은 제주 여행자를 위한 검색 쿼리 생성 전문가입니다. 벡터 검색에 쓸 자연어 문장 한 줄만 출력하세요.";

/// Builds the extraction prompt.
pub fn extraction_prompt(message: &str, profile_summary: &str) -> String {
    format!(
        r#"사용자 메시지: {message}

현재 프로필: {profile_summary}

다음 정보를 JSON으로 추출하세요 (없으면 null):
{{
    "travel_dates": "여행 날짜 (예: 8월 1일-3일)",
    "duration": "여행 기간 (예: 2박3일, 3일)",
    "group_type": "여행 유형 (예: 커플, 가족, 친구, 혼자)",
    "interests": ["관심사 (예: 액티비티, 맛집, 힐링, 사진촬영)"],
    "budget": "예산 정보",
    "travel_region": "여행 지역 (예: 제주시, 서귀포)"
}}

- "여자친구랑", "연인과" → group_type: "커플"
- "2박3일" → duration 그대로
- 명시적으로 언급된 정보만 추출하세요."#
    )
}

/// Builds the follow-up prompt.
pub fn follow_up_prompt(request: &FollowUpRequest) -> String {
    let missing = if request.missing_fields.is_empty() {
        "없음".to_string()
    } else {
        request.missing_fields.join(", ")
    };
    format!(
        "현재 수집된 정보: {}\n부족한 정보: {}\n최근 대화:\n{}\n사용자 최신 메시지: {}\n\n\
         - 이미 언급된 정보는 다시 묻지 마세요.\n\
         - 부족한 정보를 자연스럽게 한두 가지만 물어보세요.\n\
         - 친근하고 도움이 되는 톤을 유지하세요.",
        request.profile_summary,
        missing,
        or_first_turn(&request.conversation_summary),
        request.user_message,
    )
}

/// Builds the synthesis prompt.
pub fn synthesis_prompt(request: &SynthesisRequest) -> String {
    let mut prompt = format!(
        "사용자 프로필: {}\n최근 대화:\n{}\n사용자 요청: {}\n",
        request.profile_summary,
        or_first_turn(&request.conversation_summary),
        request.user_message,
    );
    if let Some(tone) = request.persona_tag.as_deref().and_then(persona_tone) {
        prompt.push_str(&format!("말투: {}\n", tone));
    }
    for result in &request.results {
        prompt.push_str(&format!(
            "- {} 정보: {}\n",
            result.category.label(),
            items_json(result)
        ));
    }
    prompt.push_str("\n위 정보를 바탕으로 개인화된 일자별 제주 여행 일정을 작성하세요.");
    prompt
}

/// Tone instruction for a personality tag ("테토", "에겐녀", ...).
fn persona_tone(tag: &str) -> Option<&'static str> {
    let tag = tag.trim();
    if tag.starts_with("테토") {
        Some("효율적이고 모던한 여행을 좋아하는 사용자입니다. 간결하고 직설적으로 말하세요.")
    } else if tag.starts_with("에겐") {
        Some("따뜻하고 아늑한 여행을 좋아하는 사용자입니다. 다정하고 감성적으로 말하세요.")
    } else {
        None
    }
}

/// Builds the query prompt for one category.
pub fn query_prompt(category: Category, profile_summary: &str, message: &str) -> String {
    format!(
        "카테고리: {}\n사용자 프로필: {}\n사용자 메시지: {}\n\n\
         관심사, 여행 지역, 동행자를 반영해 {} 검색 쿼리 한 줄을 만드세요. \
         \"제주\"를 포함하고 \"추천\"으로 끝내세요.\n\n검색 쿼리:",
        category.label(),
        profile_summary,
        message,
        category.label(),
    )
}

fn or_first_turn(summary: &str) -> &str {
    if summary.trim().is_empty() {
        "첫 질문입니다"
    } else {
        summary
    }
}

#[derive(Serialize)]
struct PromptItem<'a> {
    name: &'a str,
    address: &'a str,
    description: &'a str,
}

fn items_json(result: &CategoryResult) -> String {
    let items: Vec<PromptItem<'_>> = result
        .items
        .iter()
        .map(|item| PromptItem {
            name: &item.name,
            address: &item.address,
            description: &item.description,
        })
        .collect();
    serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string())
}
