//! zeroxin-core — Hairstyle consultation workflow.
//!
//! Models the upload → analyze → suggest → transform → result flow as a
//! state machine, with face analysis and hairstyle rendering delegated to
//! an external [`Stylist`].

pub mod controller;
pub mod stylist;
pub mod types;
pub mod workflow;

pub use controller::Controller;
pub use stylist::{parse_analysis, Stylist, StylistError};
pub use types::{AnalysisResult, ImageError, ImagePayload, Suggestion, DOWNLOAD_FILE_NAME};
pub use workflow::{can_submit_prompt, Failure, Stage, Step, Workflow, WorkflowError};
