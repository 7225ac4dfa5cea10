use serde::{Deserialize, Serialize};

// ─── Request ──────────────────────────────────────────────────────────────

/// Body of a `generateContent` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: impl IntoIterator<Item = String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: parts.into_iter().map(|text| Part { text: Some(text) }).collect(),
        }
    }
}

/// A content part. Only text parts are produced or read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 2048,
            temperature: 0.7,
            top_p: 1.0,
        }
    }
}

// ─── Response ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub finish_message: Option<String>,
}

pub const EMPTY_REPLY: &str =
    "Sorry, I couldn't get a valid response from the AI. The response was empty or malformed.";

impl GenerateContentResponse {
    /// The text the operator sees: the first candidate's text parts joined,
    /// or an explanation of why there is none.
    pub fn reply_text(&self) -> String {
        let Some(candidate) = self.candidates.first() else {
            return EMPTY_REPLY.to_string();
        };

        let parts = candidate
            .content
            .as_ref()
            .map(|c| c.parts.as_slice())
            .unwrap_or_default();
        if !parts.is_empty() {
            return parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>();
        }

        match candidate.finish_reason.as_deref() {
            Some(reason) if reason != "STOP" => format!(
                "AI response finished due to: {reason}. {}",
                candidate.finish_message.as_deref().unwrap_or_default()
            ),
            _ => EMPTY_REPLY.to_string(),
        }
    }
}

// ─── Error envelope ───────────────────────────────────────────────────────

/// Google API error body: `{"error": {"code", "message", "status", "details"}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorEnvelope {
    #[serde(default)]
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
