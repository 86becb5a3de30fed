//! Keyword Profile Extractor - trip fields from fixed keyword tables.
//!
//! No model call is involved, so extraction is instant and deterministic.
//! Tables are checked in order and the first matching row wins.

use async_trait::async_trait;

use crate::domain::profile::{ProfileUpdate, TripProfile};
use crate::ports::{ExtractionError, ProfileExtractor};

type Table = &'static [(&'static [&'static str], &'static str)];

const DURATIONS: Table = &[
    (&["1박", "2일"], "1박2일"),
    (&["2박", "3일"], "2박3일"),
    (&["3박", "4일"], "3박4일"),
];

const GROUPS: Table = &[
    (&["커플", "연인", "남친", "여친", "애인", "여자친구", "남자친구"], "커플"),
    (&["가족", "아이", "부모", "엄마", "아빠"], "가족"),
    (&["친구", "동료", "같이"], "친구"),
    (&["혼자", "혼행", "솔로"], "혼자"),
];

const INTERESTS: Table = &[
    (&["맛집", "음식", "먹거리"], "맛집"),
    (&["힐링", "휴식", "쉬고"], "힐링"),
    (&["액티비티", "체험", "활동"], "액티비티"),
    (&["사진", "인스타", "감성"], "사진촬영"),
];

const REGIONS: Table = &[
    (&["제주시", "제주 시내", "공항 근처"], "제주시"),
    (&["서귀포", "중문", "성산"], "서귀포"),
    (&["서쪽", "한림", "협재"], "제주 서쪽"),
    (&["동쪽", "성산일출봉"], "제주 동쪽"),
];

/// ProfileExtractor driven by keyword tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordProfileExtractor;

impl KeywordProfileExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts synchronously.
    pub fn extract_now(&self, message: &str) -> ProfileUpdate {
        let text = message.to_lowercase();
        ProfileUpdate {
            duration: first_match(DURATIONS, &text),
            group_type: first_match(GROUPS, &text),
            travel_region: first_match(REGIONS, &text),
            interests: INTERESTS
                .iter()
                .filter(|(words, _)| mentions(words, &text))
                .map(|(_, value)| value.to_string())
                .collect(),
            ..ProfileUpdate::default()
        }
    }
}

fn mentions(words: &[&str], text: &str) -> bool {
    words.iter().any(|w| text.contains(w))
}

fn first_match(table: Table, text: &str) -> Option<String> {
    table
        .iter()
        .find(|(words, _)| mentions(words, text))
        .map(|(_, value)| value.to_string())
}

#[async_trait]
impl ProfileExtractor for KeywordProfileExtractor {
    async fn extract(
        &self,
        message: &str,
        _current: &TripProfile,
    ) -> Result<ProfileUpdate, ExtractionError> {
        Ok(self.extract_now(message))
    }
}
