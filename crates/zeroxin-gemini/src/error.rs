use thiserror::Error;
use zeroxin_core::StylistError;

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("API key not configured (set GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("response has no candidate")]
    NoCandidate,
    #[error("candidate content is empty")]
    EmptyContent,
    #[error("response has no inline image part")]
    NoInlineImage,
    #[error("response has no text")]
    NoText,
}

impl From<GeminiError> for StylistError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::NoCandidate | GeminiError::EmptyContent | GeminiError::NoInlineImage => {
                StylistError::NoImage(err.to_string())
            }
            GeminiError::NoText => StylistError::Parse(err.to_string()),
            other => StylistError::Backend(other.to_string()),
        }
    }
}
