//! `generateContent` request and response bodies.
//!
//! Only the fields the stylist reads or sends are modelled; everything
//! else in the response is ignored.

use crate::error::GeminiError;
use serde::{Deserialize, Serialize};
use zeroxin_core::ImagePayload;

/// Image type assumed when the model omits `mimeType`.
const FALLBACK_IMAGE_MIME: &str = "image/png";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, alias = "inline_data", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn image(image: &ImagePayload) -> Self {
        Self {
            text: None,
            inline_data: Some(Blob {
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
            }),
        }
    }
}

/// Inline binary data, base64 encoded.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    #[serde(default, alias = "mime_type")]
    pub mime_type: String,
    #[serde(default)]
    pub data: String,
}

impl std::fmt::Debug for Blob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blob")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    /// The first non-empty inline image of the first candidate.
    pub fn first_inline_image(&self) -> Result<ImagePayload, GeminiError> {
        let candidate = self.candidates.first().ok_or(GeminiError::NoCandidate)?;
        let parts = match &candidate.content {
            Some(content) if !content.parts.is_empty() => &content.parts,
            _ => return Err(GeminiError::EmptyContent),
        };

        let blob = parts
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|b| !b.data.is_empty())
            .ok_or(GeminiError::NoInlineImage)?;

        let mime_type = if blob.mime_type.is_empty() {
            FALLBACK_IMAGE_MIME
        } else {
            blob.mime_type.as_str()
        };
        Ok(ImagePayload::from_base64(mime_type, blob.data.clone()))
    }

    /// Why the prompt was blocked, if the service refused it.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }
}

/// Error envelope returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_text_concatenates_first_candidate() {
        let resp = response(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [
                    {"text": "{\"faceShape\":"},
                    {"text": "\"Oval\"}"}
                ]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }));
        assert_eq!(resp.text().as_deref(), Some("{\"faceShape\":\"Oval\"}"));
    }

    #[test]
    fn test_text_missing() {
        assert!(response(json!({})).text().is_none());
        let resp = response(json!({"candidates": [{"finishReason": "SAFETY"}]}));
        assert!(resp.text().is_none());
    }

    #[test]
    fn test_first_inline_image_wins() {
        let resp = response(json!({
            "candidates": [{"content": {"parts": [
                {"text": "Here is the new look."},
                {"inlineData": {"mimeType": "image/png", "data": "Rmlyc3Q="}},
                {"inlineData": {"mimeType": "image/png", "data": "U2Vjb25k"}}
            ]}}]
        }));
        let image = resp.first_inline_image().unwrap();
        assert_eq!(image.to_data_url(), "data:image/png;base64,Rmlyc3Q=");
    }

    #[test]
    fn test_snake_case_inline_data_accepted() {
        let resp = response(json!({
            "candidates": [{"content": {"parts": [
                {"inline_data": {"mime_type": "image/jpeg", "data": "/9j/"}}
            ]}}]
        }));
        let image = resp.first_inline_image().unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[test]
    fn test_missing_mime_defaults_to_png() {
        let resp = response(json!({
            "candidates": [{"content": {"parts": [{"inlineData": {"data": "AAAA"}}]}}]
        }));
        assert_eq!(resp.first_inline_image().unwrap().mime_type, "image/png");
    }

    #[test]
    fn test_no_candidate() {
        let resp = response(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        assert!(matches!(
            resp.first_inline_image(),
            Err(GeminiError::NoCandidate)
        ));
        assert_eq!(resp.block_reason(), Some("SAFETY"));
    }

    #[test]
    fn test_empty_candidate_content() {
        let resp = response(json!({"candidates": [{"finishReason": "STOP"}]}));
        assert!(matches!(
            resp.first_inline_image(),
            Err(GeminiError::EmptyContent)
        ));
        let resp = response(json!({"candidates": [{"content": {"parts": []}}]}));
        assert!(matches!(
            resp.first_inline_image(),
            Err(GeminiError::EmptyContent)
        ));
    }

    #[test]
    fn test_text_only_candidate_has_no_image() {
        let resp = response(json!({
            "candidates": [{"content": {"parts": [
                {"text": "I can't edit this photo."},
                {"inlineData": {"mimeType": "image/png", "data": ""}}
            ]}}]
        }));
        assert!(matches!(
            resp.first_inline_image(),
            Err(GeminiError::NoInlineImage)
        ));
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let image = ImagePayload::from_base64("image/jpeg", "/9j/");
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::image(&image), Part::text("hello")],
            }],
            generation_config: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"contents": [{"parts": [
                {"inlineData": {"mimeType": "image/jpeg", "data": "/9j/"}},
                {"text": "hello"}
            ]}]})
        );
    }
}
