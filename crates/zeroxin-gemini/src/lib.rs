//! zeroxin-gemini — Gemini backend for the hairstyle workflow.
//!
//! Implements [`zeroxin_core::Stylist`] over the Generative Language
//! `generateContent` endpoint: structured JSON analysis with one model,
//! image-to-image hairstyle edits with another.

pub mod client;
pub mod error;
pub mod prompts;
pub mod wire;

pub use client::{
    GeminiConfig, GeminiStylist, DEFAULT_ANALYSIS_MODEL, DEFAULT_API_BASE, DEFAULT_IMAGE_MODEL,
};
pub use error::GeminiError;
