//! ProfileUpdate - fields extracted from a single user turn.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Fields extracted from one message. `None` means "nothing new".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, deserialize_with = "lenient_text")]
    pub travel_dates: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub group_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub travel_region: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub budget: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub interests: Vec<String>,
    #[serde(default, alias = "name", deserialize_with = "lenient_text")]
    pub display_name: Option<String>,
    #[serde(default, alias = "personality", deserialize_with = "lenient_text")]
    pub persona_tag: Option<String>,
    #[serde(default, alias = "travel_style", deserialize_with = "lenient_text")]
    pub style_tag: Option<String>,
}

impl ProfileUpdate {
    /// Parses extraction output, tolerating fences, preambles and junk.
    ///
    /// Anything that does not contain a JSON object yields an empty update.
    pub fn parse_lenient(raw: &str) -> ProfileUpdate {
        find_json_object(raw)
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default()
    }

    /// Returns true if the update carries no information.
    pub fn is_empty(&self) -> bool {
        *self == ProfileUpdate::default()
    }
}

/// Locates the outermost JSON object, preferring a fenced code block.
fn find_json_object(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let body = ["```json", "```JSON", "```"]
        .iter()
        .find_map(|fence| {
            let start = trimmed.find(fence)? + fence.len();
            let end = trimmed[start..].find("```")?;
            Some(trimmed[start..start + end].trim())
        })
        .unwrap_or(trimmed);

    let start = body.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in body[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            let s = s.trim();
            let is_placeholder = s.is_empty() || s.eq_ignore_ascii_case("null");
            (!is_placeholder).then(|| s.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let raw: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    Ok(raw
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
