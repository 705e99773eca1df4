//! Upload → analyze → suggest → transform → result state machine.
//!
//! Each [`Stage`] carries exactly the data that is valid for its step, so
//! combinations such as a result image while uploading cannot be built.
//! Transitions here are synchronous; the [`Controller`](crate::Controller)
//! performs the stylist calls between `begin_*` and `complete_*`.

use crate::stylist::StylistError;
use crate::types::{AnalysisResult, ImageError, ImagePayload};
use thiserror::Error;

/// The single active step of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Upload,
    Analyzing,
    Suggestions,
    Transforming,
    Result,
}

impl Step {
    /// Whether an external call is outstanding in this step.
    pub fn is_busy(self) -> bool {
        matches!(self, Step::Analyzing | Step::Transforming)
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::Upload => "upload",
            Step::Analyzing => "analyzing",
            Step::Suggestions => "suggestions",
            Step::Transforming => "transforming",
            Step::Result => "result",
        };
        f.write_str(name)
    }
}

/// Failure class shown to the user as a dismissible banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Analysis,
    Transform,
}

impl Failure {
    /// Fixed user-facing text. Never includes backend diagnostics.
    pub fn message(self) -> &'static str {
        match self {
            Failure::Analysis => {
                "We encountered an issue analyzing your photo. Please try another one."
            }
            Failure::Transform => "Transformation failed. Let's try another style.",
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("cannot {action} during the {step} step")]
    IllegalTransition { step: Step, action: &'static str },
    #[error("no suggestion #{index} ({available} available)")]
    UnknownSuggestion { index: usize, available: usize },
    #[error("invalid image: {0}")]
    Image(#[from] ImageError),
}

/// Workflow state, tagged by step.
#[derive(Debug, Clone, Default)]
pub enum Stage {
    #[default]
    Upload,
    Analyzing {
        original: ImagePayload,
    },
    Suggestions {
        original: ImagePayload,
        analysis: AnalysisResult,
        /// Result left behind by "change style"; kept, never displayed.
        previous_result: Option<ImagePayload>,
    },
    Transforming {
        original: ImagePayload,
        analysis: AnalysisResult,
        style: String,
        previous_result: Option<ImagePayload>,
    },
    Result {
        original: ImagePayload,
        analysis: AnalysisResult,
        style: String,
        result: ImagePayload,
    },
}

impl Stage {
    pub fn step(&self) -> Step {
        match self {
            Stage::Upload => Step::Upload,
            Stage::Analyzing { .. } => Step::Analyzing,
            Stage::Suggestions { .. } => Step::Suggestions,
            Stage::Transforming { .. } => Step::Transforming,
            Stage::Result { .. } => Step::Result,
        }
    }
}

/// True when a custom prompt may be submitted.
pub fn can_submit_prompt(prompt: &str) -> bool {
    !prompt.trim().is_empty()
}

/// The workflow stage plus the optional error banner.
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    stage: Stage,
    error: Option<Failure>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.stage.step()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn error(&self) -> Option<Failure> {
        self.error
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error.map(Failure::message)
    }

    /// The captured portrait, present from analysis until reset.
    pub fn original(&self) -> Option<&ImagePayload> {
        match &self.stage {
            Stage::Upload => None,
            Stage::Analyzing { original }
            | Stage::Suggestions { original, .. }
            | Stage::Transforming { original, .. }
            | Stage::Result { original, .. } => Some(original),
        }
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match &self.stage {
            Stage::Suggestions { analysis, .. }
            | Stage::Transforming { analysis, .. }
            | Stage::Result { analysis, .. } => Some(analysis),
            Stage::Upload | Stage::Analyzing { .. } => None,
        }
    }

    /// The transformed portrait. Only available in the result step.
    pub fn result_image(&self) -> Option<&ImagePayload> {
        match &self.stage {
            Stage::Result { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Last result retained after "change style".
    pub fn previous_result(&self) -> Option<&ImagePayload> {
        match &self.stage {
            Stage::Suggestions {
                previous_result, ..
            }
            | Stage::Transforming {
                previous_result, ..
            } => previous_result.as_ref(),
            _ => None,
        }
    }

    /// Style being rendered, or the one that produced the current result.
    pub fn style(&self) -> Option<&str> {
        match &self.stage {
            Stage::Transforming { style, .. } | Stage::Result { style, .. } => {
                Some(style.as_str())
            }
            _ => None,
        }
    }

    /// Image and style for the outstanding transform call.
    pub fn transform_request(&self) -> Option<(&ImagePayload, &str)> {
        match &self.stage {
            Stage::Transforming {
                original, style, ..
            } => Some((original, style.as_str())),
            _ => None,
        }
    }

    /// Upload → Analyzing.
    pub fn begin_analysis(&mut self, original: ImagePayload) -> Result<(), WorkflowError> {
        if !matches!(self.stage, Stage::Upload) {
            return Err(self.illegal("select an image"));
        }
        self.error = None;
        self.stage = Stage::Analyzing { original };
        Ok(())
    }

    /// Analyzing → Suggestions on success, back to Upload on failure.
    pub fn complete_analysis(
        &mut self,
        outcome: Result<AnalysisResult, StylistError>,
    ) -> Result<(), WorkflowError> {
        match std::mem::take(&mut self.stage) {
            Stage::Analyzing { original } => {
                match outcome {
                    Ok(analysis) => {
                        tracing::info!(
                            face_shape = %analysis.face_shape,
                            suggestions = analysis.suggestions.len(),
                            "analysis complete"
                        );
                        self.stage = Stage::Suggestions {
                            original,
                            analysis,
                            previous_result: None,
                        };
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "analysis failed");
                        self.error = Some(Failure::Analysis);
                    }
                }
                Ok(())
            }
            other => self.restore(other, "complete an analysis"),
        }
    }

    /// Suggestions → Transforming.
    ///
    /// Returns `Ok(false)` without changing anything when the prompt is
    /// empty or no portrait has been captured yet.
    pub fn begin_transform(&mut self, prompt: &str) -> Result<bool, WorkflowError> {
        let style = prompt.trim();
        match std::mem::take(&mut self.stage) {
            Stage::Upload => Ok(false),
            Stage::Suggestions {
                original,
                analysis,
                previous_result,
            } => {
                if style.is_empty() {
                    self.stage = Stage::Suggestions {
                        original,
                        analysis,
                        previous_result,
                    };
                    return Ok(false);
                }
                self.error = None;
                self.stage = Stage::Transforming {
                    original,
                    analysis,
                    style: style.to_string(),
                    previous_result,
                };
                Ok(true)
            }
            other => self.restore(other, "request a transformation").map(|_| false),
        }
    }

    /// Transforming → Result on success, back to Suggestions on failure.
    pub fn complete_transform(
        &mut self,
        outcome: Result<ImagePayload, StylistError>,
    ) -> Result<(), WorkflowError> {
        match std::mem::take(&mut self.stage) {
            Stage::Transforming {
                original,
                analysis,
                style,
                previous_result,
            } => {
                match outcome {
                    Ok(result) => {
                        tracing::info!(style = %style, mime_type = %result.mime_type, "transformation complete");
                        self.stage = Stage::Result {
                            original,
                            analysis,
                            style,
                            result,
                        };
                    }
                    Err(err) => {
                        tracing::warn!(style = %style, error = %err, "transformation failed");
                        self.error = Some(Failure::Transform);
                        self.stage = Stage::Suggestions {
                            original,
                            analysis,
                            previous_result,
                        };
                    }
                }
                Ok(())
            }
            other => self.restore(other, "complete a transformation"),
        }
    }

    /// Result → Suggestions, keeping the portrait and analysis.
    pub fn change_style(&mut self) -> Result<(), WorkflowError> {
        match std::mem::take(&mut self.stage) {
            Stage::Result {
                original,
                analysis,
                result,
                ..
            } => {
                self.error = None;
                self.stage = Stage::Suggestions {
                    original,
                    analysis,
                    previous_result: Some(result),
                };
                Ok(())
            }
            other => self.restore(other, "change style"),
        }
    }

    /// Result → Upload, clearing everything.
    pub fn reset(&mut self) -> Result<(), WorkflowError> {
        if !matches!(self.stage, Stage::Result { .. }) {
            return Err(self.illegal("try another photo"));
        }
        *self = Self::default();
        Ok(())
    }

    /// Clear the banner. The step is unchanged.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn restore(&mut self, stage: Stage, action: &'static str) -> Result<(), WorkflowError> {
        self.stage = stage;
        Err(self.illegal(action))
    }

    fn illegal(&self, action: &'static str) -> WorkflowError {
        WorkflowError::IllegalTransition {
            step: self.step(),
            action,
        }
    }
}
