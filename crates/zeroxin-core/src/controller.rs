use crate::stylist::Stylist;
use crate::types::ImagePayload;
use crate::workflow::{Workflow, WorkflowError};

/// Drives a [`Workflow`] by calling a [`Stylist`] between transitions.
///
/// Every trigger that reaches the stylist takes `&mut self`, so at most one
/// request is outstanding at a time. Stylist failures never surface as
/// errors here: they revert the step and set the banner. `Err` is only
/// returned for actions that are not legal in the current step.
pub struct Controller<S> {
    stylist: S,
    workflow: Workflow,
}

impl<S: Stylist> Controller<S> {
    pub fn new(stylist: S) -> Self {
        Self {
            stylist,
            workflow: Workflow::new(),
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Accept a portrait and analyze it.
    pub async fn select_image(&mut self, image: ImagePayload) -> Result<(), WorkflowError> {
        self.workflow.begin_analysis(image)?;

        let outcome = match self.workflow.original() {
            Some(original) => self.stylist.analyze(original).await,
            None => return Ok(()),
        };
        self.workflow.complete_analysis(outcome)
    }

    /// Accept raw upload bytes, validating them first.
    pub async fn upload(&mut self, bytes: &[u8]) -> Result<(), WorkflowError> {
        let image = ImagePayload::from_upload(bytes)?;
        self.select_image(image).await
    }

    /// Apply one of the analyzed suggestions (zero-based).
    pub async fn choose_suggestion(&mut self, index: usize) -> Result<(), WorkflowError> {
        let analysis = self.workflow.analysis().ok_or(WorkflowError::IllegalTransition {
            step: self.workflow.step(),
            action: "choose a suggestion",
        })?;
        let name = analysis
            .suggestions
            .get(index)
            .map(|s| s.name.clone())
            .ok_or(WorkflowError::UnknownSuggestion {
                index,
                available: analysis.suggestions.len(),
            })?;
        self.transform(&name).await
    }

    /// Apply free-form style text. Empty text does nothing.
    pub async fn submit_custom_prompt(&mut self, prompt: &str) -> Result<(), WorkflowError> {
        self.transform(prompt).await
    }

    pub fn change_style(&mut self) -> Result<(), WorkflowError> {
        self.workflow.change_style()
    }

    pub fn try_another_photo(&mut self) -> Result<(), WorkflowError> {
        self.workflow.reset()
    }

    pub fn dismiss_error(&mut self) {
        self.workflow.dismiss_error();
    }

    async fn transform(&mut self, prompt: &str) -> Result<(), WorkflowError> {
        if !self.workflow.begin_transform(prompt)? {
            tracing::debug!(step = %self.workflow.step(), "transform skipped");
            return Ok(());
        }

        let outcome = match self.workflow.transform_request() {
            Some((original, style)) => self.stylist.transform(original, style).await,
            None => return Ok(()),
        };
        self.workflow.complete_transform(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylist::{parse_analysis, StylistError};
    use crate::types::AnalysisResult;
    use crate::workflow::{Failure, Step};
    use async_trait::async_trait;
    use std::sync::Mutex;

    const OVAL: &str = r#"{"faceShape":"Oval","suggestions":[
        {"name":"Crop","description":"Short textured crop","suitability":"Adds height"},
        {"name":"Side Part","description":"Classic side part","suitability":"Frames the jaw"}
    ]}"#;

    /// Stylist returning canned payloads and recording every call.
    struct CannedStylist {
        analysis_text: &'static str,
        transform: Option<ImagePayload>,
        calls: Mutex<Vec<String>>,
    }

    impl CannedStylist {
        fn new(analysis_text: &'static str, transform: Option<ImagePayload>) -> Self {
            Self {
                analysis_text,
                transform,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Stylist for CannedStylist {
        async fn analyze(&self, _image: &ImagePayload) -> Result<AnalysisResult, StylistError> {
            self.calls.lock().unwrap().push("analyze".into());
            parse_analysis(self.analysis_text)
        }

        async fn transform(
            &self,
            _image: &ImagePayload,
            style: &str,
        ) -> Result<ImagePayload, StylistError> {
            self.calls.lock().unwrap().push(format!("transform:{style}"));
            self.transform
                .clone()
                .ok_or_else(|| StylistError::NoImage("no inline image part".into()))
        }
    }

    fn portrait() -> ImagePayload {
        ImagePayload::from_base64("image/jpeg", "/9j/4AAQ")
    }

    fn png() -> ImagePayload {
        ImagePayload::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap()
    }

    #[tokio::test]
    async fn test_full_session_scenario() {
        let mut ctl = Controller::new(CannedStylist::new(OVAL, Some(png())));

        ctl.select_image(portrait()).await.unwrap();
        assert_eq!(ctl.workflow().step(), Step::Suggestions);
        assert_eq!(ctl.workflow().analysis().unwrap().face_shape, "Oval");

        ctl.choose_suggestion(0).await.unwrap();
        assert_eq!(ctl.workflow().step(), Step::Result);
        assert_eq!(
            ctl.workflow().result_image().unwrap().to_data_url(),
            "data:image/png;base64,iVBORw0KGgo="
        );

        ctl.change_style().unwrap();
        assert_eq!(ctl.workflow().step(), Step::Suggestions);
        assert_eq!(ctl.workflow().original(), Some(&portrait()));
        assert!(ctl.workflow().analysis().is_some());
        assert_eq!(ctl.workflow().previous_result(), Some(&png()));

        // Re-render from Suggestions is still possible after going back.
        ctl.submit_custom_prompt("Slicked back undercut").await.unwrap();
        assert_eq!(ctl.workflow().step(), Step::Result);

        ctl.try_another_photo().unwrap();
        assert_eq!(ctl.workflow().step(), Step::Upload);
        assert!(ctl.workflow().original().is_none());
        assert!(ctl.workflow().analysis().is_none());

        assert_eq!(
            ctl.stylist.calls(),
            ["analyze", "transform:Crop", "transform:Slicked back undercut"]
        );
    }

    #[tokio::test]
    async fn test_bad_analysis_returns_to_upload() {
        for text in ["", "not json", r#"{"faceShape":"Oval"}"#] {
            let mut ctl = Controller::new(CannedStylist::new(text, None));
            ctl.select_image(portrait()).await.unwrap();

            assert_eq!(ctl.workflow().step(), Step::Upload, "input: {text:?}");
            assert_eq!(ctl.workflow().error(), Some(Failure::Analysis));
            assert!(ctl.workflow().analysis().is_none());
        }
    }

    #[tokio::test]
    async fn test_missing_image_returns_to_suggestions() {
        let mut ctl = Controller::new(CannedStylist::new(OVAL, None));
        ctl.select_image(portrait()).await.unwrap();
        ctl.choose_suggestion(1).await.unwrap();

        assert_eq!(ctl.workflow().step(), Step::Suggestions);
        assert_eq!(ctl.workflow().error(), Some(Failure::Transform));
        assert_eq!(ctl.workflow().analysis().unwrap().suggestions.len(), 2);

        ctl.dismiss_error();
        assert!(ctl.workflow().error().is_none());
        assert_eq!(ctl.workflow().step(), Step::Suggestions);
    }

    #[tokio::test]
    async fn test_empty_prompt_never_calls_stylist() {
        let mut ctl = Controller::new(CannedStylist::new(OVAL, Some(png())));
        ctl.select_image(portrait()).await.unwrap();

        ctl.submit_custom_prompt("").await.unwrap();
        ctl.submit_custom_prompt("   ").await.unwrap();

        assert_eq!(ctl.workflow().step(), Step::Suggestions);
        assert_eq!(ctl.stylist.calls(), ["analyze"]);
    }

    #[tokio::test]
    async fn test_transform_before_upload_is_noop() {
        let mut ctl = Controller::new(CannedStylist::new(OVAL, Some(png())));
        ctl.submit_custom_prompt("Crop").await.unwrap();

        assert_eq!(ctl.workflow().step(), Step::Upload);
        assert!(ctl.stylist.calls().is_empty());
    }

    #[tokio::test]
    async fn test_prompt_after_failed_analysis_keeps_analysis_banner() {
        let mut ctl = Controller::new(CannedStylist::new("not json", Some(png())));
        ctl.select_image(portrait()).await.unwrap();
        ctl.submit_custom_prompt("Buzz cut").await.unwrap();

        assert!(ctl.workflow().result_image().is_none());
        assert_eq!(
            ctl.workflow().error_message(),
            Some(Failure::Analysis.message())
        );
        assert_eq!(ctl.stylist.calls(), ["analyze"]);
    }

    #[tokio::test]
    async fn test_unknown_suggestion_index() {
        let mut ctl = Controller::new(CannedStylist::new(OVAL, Some(png())));
        ctl.select_image(portrait()).await.unwrap();

        let err = ctl.choose_suggestion(5).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::UnknownSuggestion {
                index: 5,
                available: 2
            }
        ));
        assert_eq!(ctl.workflow().step(), Step::Suggestions);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_image() {
        let mut ctl = Controller::new(CannedStylist::new(OVAL, None));
        let err = ctl.upload(b"plain text").await.unwrap_err();

        assert!(matches!(err, WorkflowError::Image(_)));
        assert_eq!(ctl.workflow().step(), Step::Upload);
        assert!(ctl.stylist.calls().is_empty());
    }

    #[tokio::test]
    async fn test_suggestion_before_analysis_is_illegal() {
        let mut ctl = Controller::new(CannedStylist::new(OVAL, None));
        let err = ctl.choose_suggestion(0).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::IllegalTransition {
                step: Step::Upload,
                ..
            }
        ));
    }
}
