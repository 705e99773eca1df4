use crate::error::GeminiError;
use crate::prompts;
use crate::wire::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use reqwest::Client;
use zeroxin_core::{parse_analysis, AnalysisResult, ImagePayload, Stylist, StylistError};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Longest slice of a raw error body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Connection settings for the Generative Language API.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Base URL without trailing slash.
    pub api_base: String,
    /// Model used for structured face analysis.
    pub analysis_model: String,
    /// Model used for image-to-image hairstyle edits.
    pub image_model: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("analysis_model", &self.analysis_model)
            .field("image_model", &self.image_model)
            .finish()
    }
}

/// [`Stylist`] backed by Gemini `generateContent`.
///
/// One request per call: no retries, and the HTTP client's default
/// timeout behaviour.
pub struct GeminiStylist {
    config: GeminiConfig,
    http: Client,
}

impl GeminiStylist {
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        if config.api_key.trim().is_empty() {
            return Err(GeminiError::MissingApiKey);
        }
        let http = Client::builder().build()?;

        tracing::info!(
            api_base = %config.api_base,
            analysis_model = %config.analysis_model,
            image_model = %config.image_model,
            "Gemini stylist configured"
        );

        Ok(Self { config, http })
    }

    /// `{api_base}/models/{model}:generateContent`
    pub fn endpoint(&self, model: &str) -> String {
        let model = model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        format!(
            "{}/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            model_path
        )
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let started = std::time::Instant::now();
        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        tracing::debug!(
            model,
            candidates = body.candidates.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generateContent returned"
        );
        if let Some(reason) = body.block_reason() {
            tracing::warn!(model, reason, "prompt blocked");
        }
        Ok(body)
    }
}

#[async_trait]
impl Stylist for GeminiStylist {
    async fn analyze(&self, image: &ImagePayload) -> Result<AnalysisResult, StylistError> {
        tracing::info!(model = %self.config.analysis_model, mime_type = %image.mime_type, "analyzing face");
        let request = prompts::analysis_request(image);
        let response = self.generate(&self.config.analysis_model, &request).await?;
        analysis_from_response(&response)
    }

    async fn transform(
        &self,
        image: &ImagePayload,
        style: &str,
    ) -> Result<ImagePayload, StylistError> {
        tracing::info!(model = %self.config.image_model, style, "transforming hairstyle");
        let request = prompts::transform_request(image, style);
        let response = self.generate(&self.config.image_model, &request).await?;
        Ok(response.first_inline_image()?)
    }
}

/// Parse the structured analysis out of a response.
pub fn analysis_from_response(
    response: &GenerateContentResponse,
) -> Result<AnalysisResult, StylistError> {
    let text = response.text().ok_or(GeminiError::NoText)?;
    parse_analysis(&text)
}

/// Human-readable message from an error body, preferring the API envelope.
fn api_error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorBody>(body) {
        return match envelope.error.status {
            Some(status) => format!("{status}: {}", envelope.error.message),
            None => envelope.error.message,
        };
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty error body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY).collect()
}
