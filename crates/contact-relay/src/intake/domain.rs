use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::sanitizer::sanitize;

/// Contact form payload exactly as the visitor sent it.
///
/// Every field is optional; values that are not JSON strings are treated as
/// absent so a malicious payload cannot crash the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubmission {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RawSubmission {
    /// Decodes a request body. Anything that is not a JSON object degrades to an
    /// empty submission, which the validator then rejects field by field.
    pub fn from_json(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(submission) => submission,
            Err(err) => {
                tracing::debug!(error = %err, "request body is not a contact payload");
                Self::default()
            }
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        _ => None,
    })
}

/// Submission after every field went through [`sanitize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SanitizedSubmission {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    /// Messaging handle, always `@`-prefixed when non-empty.
    pub telegram: String,
    pub level: String,
    pub message: String,
}

impl SanitizedSubmission {
    pub fn from_raw(raw: &RawSubmission) -> Self {
        let clean = |field: &Option<String>| sanitize(field.as_deref().unwrap_or_default());

        Self {
            full_name: clean(&raw.full_name),
            phone: clean(&raw.phone),
            email: clean(&raw.email),
            telegram: normalize_handle(&clean(&raw.telegram)),
            level: clean(&raw.level),
            message: clean(&raw.message),
        }
    }

    /// The messaging handle without its leading `@`.
    pub fn handle_body(&self) -> &str {
        let trimmed = self.telegram.trim();
        trimmed.strip_prefix('@').unwrap_or(trimmed)
    }
}

pub(crate) fn normalize_handle(handle: &str) -> String {
    let trimmed = handle.trim();
    if trimmed.is_empty() || trimmed.starts_with('@') {
        trimmed.to_string()
    } else {
        format!("@{trimmed}")
    }
}

/// Proficiency tiers offered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ProficiencyLevel {
    pub const ALL: [ProficiencyLevel; 3] = [
        ProficiencyLevel::Beginner,
        ProficiencyLevel::Intermediate,
        ProficiencyLevel::Advanced,
    ];

    /// Accepts either locale's label; English labels are case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL.into_iter().find(|level| {
            trimmed == level.arabic_label() || trimmed.eq_ignore_ascii_case(level.english_label())
        })
    }

    pub fn arabic_label(self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "مبتدئ",
            ProficiencyLevel::Intermediate => "متوسط",
            ProficiencyLevel::Advanced => "متقدم",
        }
    }

    pub fn english_label(self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "Beginner",
            ProficiencyLevel::Intermediate => "Intermediate",
            ProficiencyLevel::Advanced => "Advanced",
        }
    }
}
