use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest portrait accepted for upload (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// File name used when the transformed portrait is saved.
pub const DOWNLOAD_FILE_NAME: &str = "zeroxin-new-look.png";

/// One hairstyle proposed by the analysis model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub description: String,
    /// Why this style suits the detected face shape.
    pub suitability: String,
}

/// Structured face-shape analysis returned by a stylist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub face_shape: String,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("image is empty")]
    Empty,
    #[error("image is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
    #[error("unsupported image format (expected JPEG or PNG)")]
    UnsupportedFormat,
    #[error("not a base64 data URL")]
    NotDataUrl,
    #[error("invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// An image held as base64 text plus its MIME type, the form in which
/// portraits travel to and from the model.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

impl ImagePayload {
    /// Accept raw upload bytes. Only JPEG and PNG up to [`MAX_UPLOAD_BYTES`]
    /// are allowed; the format is sniffed from the content.
    pub fn from_upload(bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ImageError::TooLarge {
                size: bytes.len(),
                limit: MAX_UPLOAD_BYTES,
            });
        }

        let mime_type = match image::guess_format(bytes) {
            Ok(image::ImageFormat::Jpeg) => "image/jpeg",
            Ok(image::ImageFormat::Png) => "image/png",
            _ => return Err(ImageError::UnsupportedFormat),
        };

        tracing::debug!(mime_type, size = bytes.len(), "upload accepted");

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: BASE64.encode(bytes),
        })
    }

    pub fn from_base64(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Parse a `data:<mime>;base64,<data>` reference.
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let rest = url.strip_prefix("data:").ok_or(ImageError::NotDataUrl)?;
        let (header, data) = rest.split_once(',').ok_or(ImageError::NotDataUrl)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(ImageError::NotDataUrl)?;
        if mime_type.is_empty() || data.is_empty() {
            return Err(ImageError::NotDataUrl);
        }
        Ok(Self::from_base64(mime_type, data))
    }

    /// Displayable reference, e.g. `data:image/png;base64,iVBOR...`.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decode back to raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, ImageError> {
        Ok(BASE64.decode(self.data.as_bytes())?)
    }

    /// Decoded size in bytes, net of `=` padding.
    pub fn byte_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|&b| b == b'=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }
}

// Payloads are megabytes of base64; keep them out of debug output and logs.
impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}
