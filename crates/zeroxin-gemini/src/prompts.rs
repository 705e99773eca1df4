//! Instructions and output schema sent with each call.

use crate::wire::{Content, GenerateContentRequest, GenerationConfig, Part};
use serde_json::json;
use zeroxin_core::ImagePayload;

pub const ANALYSIS_INSTRUCTION: &str = "Analyze this person's face shape and provide 3 hairstyle \
suggestions that would look great on them. Focus on high-fashion and classic styles. Return the \
results as structured JSON.";

/// Instruction asking the image model to change only the hair.
pub fn transform_instruction(style: &str) -> String {
    format!(
        "Modify the person's hairstyle in the provided image to be: {style}. Maintain the exact \
         same facial features, lighting, and background. Only change the hair. The result should \
         look professional, realistic, and like a studio portrait."
    )
}

/// Structured output schema matching `AnalysisResult`.
pub fn analysis_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "faceShape": { "type": "STRING" },
            "suggestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "suitability": { "type": "STRING" }
                    },
                    "required": ["name", "description", "suitability"]
                }
            }
        },
        "required": ["faceShape", "suggestions"]
    })
}

pub fn analysis_request(image: &ImagePayload) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".into()),
            parts: vec![Part::image(image), Part::text(ANALYSIS_INSTRUCTION)],
        }],
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".into()),
            response_schema: Some(analysis_schema()),
        }),
    }
}

pub fn transform_request(image: &ImagePayload, style: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".into()),
            parts: vec![Part::image(image), Part::text(transform_instruction(style))],
        }],
        generation_config: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portrait() -> ImagePayload {
        ImagePayload::from_base64("image/png", "iVBORw0KGgo=")
    }

    #[test]
    fn test_analysis_request_shape() {
        let value = serde_json::to_value(analysis_request(&portrait())).unwrap();
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["text"], ANALYSIS_INSTRUCTION);

        let config = &value["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(
            config["responseSchema"]["required"],
            json!(["faceShape", "suggestions"])
        );
        assert_eq!(
            config["responseSchema"]["properties"]["suggestions"]["items"]["required"],
            json!(["name", "description", "suitability"])
        );
    }

    #[test]
    fn test_transform_request_embeds_style() {
        let value = serde_json::to_value(transform_request(&portrait(), "Curtain bangs")).unwrap();
        let text = value["contents"][0]["parts"][1]["text"].as_str().unwrap();
        assert!(text.contains("to be: Curtain bangs."));
        assert!(text.contains("Only change the hair."));
        assert!(value.get("generationConfig").is_none());
    }
}
