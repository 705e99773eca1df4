//! Plain-text rendering of the workflow for the interactive session.

use std::fmt::Write as _;
use zeroxin_core::{Stage, Workflow};

pub fn render(workflow: &Workflow) -> String {
    let mut out = String::new();

    if let Some(message) = workflow.error_message() {
        let _ = writeln!(out, "! {message}  (type `dismiss` to close)\n");
    }

    match workflow.stage() {
        Stage::Upload => {
            out.push_str("Your Perfect Cut Awaits\n");
            out.push_str("Upload a clear portrait photo (JPEG or PNG, up to 5MB).\n");
            out.push_str("  open <path>     analyze a portrait\n");
        }
        Stage::Analyzing { .. } => {
            out.push_str("Analyzing Facial Geometry...\n");
        }
        Stage::Suggestions { analysis, .. } => {
            let _ = writeln!(out, "Detected profile: {} Face Shape\n", analysis.face_shape);
            out.push_str("Curated Suggestions\n");
            for (i, s) in analysis.suggestions.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", i + 1, s.name);
                let _ = writeln!(out, "     {}", s.description);
                let _ = writeln!(out, "     {}", s.suitability);
            }
            out.push_str("\n  <number>        apply a suggestion\n");
            out.push_str("  custom <style>  or specify your own\n");
        }
        Stage::Transforming { style, .. } => {
            let _ = writeln!(out, "Visualizing Your New Look... ({style})");
        }
        Stage::Result { style, result, .. } => {
            let _ = writeln!(out, "The Transformation: {style}");
            let _ = writeln!(out, "  result: {} image, {} bytes\n", result.mime_type, result.byte_len());
            out.push_str("  save            download the new look\n");
            out.push_str("  change          change style\n");
            out.push_str("  another <path>  try another photo\n");
        }
    }
    if workflow.step().is_busy() {
        out.push_str("  please wait\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeroxin_core::{AnalysisResult, ImagePayload, StylistError, Suggestion};

    fn at_suggestions() -> Workflow {
        let mut wf = Workflow::new();
        wf.begin_analysis(ImagePayload::from_base64("image/jpeg", "/9j/"))
            .unwrap();
        wf.complete_analysis(Ok(AnalysisResult {
            face_shape: "Diamond".into(),
            suggestions: vec![
                Suggestion {
                    name: "Textured Fringe".into(),
                    description: "Choppy fringe".into(),
                    suitability: "Softens cheekbones".into(),
                },
                Suggestion {
                    name: "Chin-Length Bob".into(),
                    description: "Blunt bob".into(),
                    suitability: "Adds width at the jaw".into(),
                },
            ],
        }))
        .unwrap();
        wf
    }

    #[test]
    fn test_render_upload() {
        let text = render(&Workflow::new());
        assert!(text.contains("open <path>"));
        assert!(!text.starts_with('!'));
    }

    #[test]
    fn test_render_suggestions_numbered() {
        let text = render(&at_suggestions());
        assert!(text.contains("Diamond Face Shape"));
        assert!(text.contains("  1. Textured Fringe"));
        assert!(text.contains("  2. Chin-Length Bob"));
        assert!(text.contains("custom <style>"));
    }

    #[test]
    fn test_render_busy_steps() {
        let mut wf = at_suggestions();
        assert!(!render(&wf).contains("please wait"));

        wf.begin_transform("Textured Fringe").unwrap();
        let text = render(&wf);
        assert!(text.starts_with("Visualizing Your New Look... (Textured Fringe)"));
        assert!(text.contains("please wait"));
    }

    #[test]
    fn test_render_error_banner_first() {
        let mut wf = at_suggestions();
        wf.begin_transform("Mullet").unwrap();
        wf.complete_transform(Err(StylistError::Backend("HTTP 500 upstream".into())))
            .unwrap();

        let text = render(&wf);
        assert!(text.starts_with("! Transformation failed."));
        assert!(!text.contains("HTTP 500"));
    }

    #[test]
    fn test_render_result() {
        let mut wf = at_suggestions();
        wf.begin_transform("Textured Fringe").unwrap();
        wf.complete_transform(Ok(ImagePayload::from_base64("image/png", "AAAA")))
            .unwrap();

        let text = render(&wf);
        assert!(text.contains("The Transformation: Textured Fringe"));
        assert!(text.contains("image/png"));
        assert!(text.contains("another <path>"));
    }
}
