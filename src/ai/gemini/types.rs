//! Gemini `generateContent` payload types.

use crate::models::ResponsePart;
use serde::{Deserialize, Serialize};

/// Gemini content container used in both requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Untagged union of text and inline media content parts.
///
/// Variant order matters for `#[serde(untagged)]` decoding; `Other` must stay
/// last so unfamiliar part shapes (thought signatures, tool calls) still parse.
///
/// `thought: true` marks the model's reasoning, which is never reply content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thought: Option<bool>,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thought: Option<bool>,
    },
    Other(serde_json::Value),
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text {
            text: text.into(),
            thought: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
            thought: None,
        }
    }

    /// Domain view of this part; `None` for thoughts and shapes the pipeline ignores.
    pub fn into_response_part(self) -> Option<ResponsePart> {
        match self {
            Part::Text {
                thought: Some(true),
                ..
            }
            | Part::InlineData {
                thought: Some(true),
                ..
            } => {
                tracing::debug!("Skipping Gemini thought part");
                None
            }
            Part::Text { text, .. } => Some(ResponsePart::Text(text)),
            Part::InlineData { inline_data, .. } => Some(ResponsePart::Image {
                mime_type: inline_data.mime_type,
                data: inline_data.data,
            }),
            Part::Other(value) => {
                tracing::debug!("Skipping unrecognized Gemini part: {}", value);
                None
            }
        }
    }
}

/// Base64 inline payload used for image requests and replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

/// Top-level `generateContent` response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Usable parts of the first candidate, in arrival order.
    pub fn into_response_parts(self) -> Vec<ResponsePart> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            tracing::warn!("Gemini blocked the prompt: {}", reason);
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Vec::new();
        };
        if let Some(reason) = candidate.finish_reason.as_deref() {
            tracing::debug!("Gemini finish reason: {}", reason);
        }

        candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(Part::into_response_part)
            .collect()
    }
}

/// Candidate completion item returned by Gemini.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}
