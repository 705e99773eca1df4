//! The external stylist collaborator.
//!
//! A stylist analyzes a portrait and renders hairstyle transformations.
//! The workflow only ever talks to this trait, so backends can be swapped
//! and the state machine can be exercised with canned responses.

use crate::types::{AnalysisResult, ImagePayload};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StylistError {
    #[error("could not parse analysis: {0}")]
    Parse(String),
    #[error("no image data returned: {0}")]
    NoImage(String),
    #[error("stylist backend error: {0}")]
    Backend(String),
}

/// Face analysis and hairstyle transformation, one request per call.
#[async_trait]
pub trait Stylist: Send + Sync {
    /// Detect the face shape and propose hairstyles for it.
    async fn analyze(&self, image: &ImagePayload) -> Result<AnalysisResult, StylistError>;

    /// Render `image` with only the hairstyle changed to `style`.
    async fn transform(&self, image: &ImagePayload, style: &str)
        -> Result<ImagePayload, StylistError>;
}

/// Parse the JSON text of a structured analysis response.
///
/// Empty text, malformed JSON and missing required fields all fail; no
/// partial analysis is ever returned.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, StylistError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(StylistError::Parse("empty response text".into()));
    }
    serde_json::from_str(trimmed).map_err(|e| StylistError::Parse(e.to_string()))
}
