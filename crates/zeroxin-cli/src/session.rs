use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use zeroxin_core::{Controller, ImagePayload, Stylist, Workflow, WorkflowError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error("session task exited")]
    ChannelClosed,
}

/// A user interaction. The only way state changes.
#[derive(Debug)]
pub enum UserAction {
    SelectImage(ImagePayload),
    /// Zero-based index into the analyzed suggestions.
    ChooseSuggestion(usize),
    CustomPrompt(String),
    ChangeStyle,
    TryAnotherPhoto,
    DismissError,
    /// No-op; returns the current state.
    Refresh,
}

impl UserAction {
    fn name(&self) -> &'static str {
        match self {
            UserAction::SelectImage(_) => "select_image",
            UserAction::ChooseSuggestion(_) => "choose_suggestion",
            UserAction::CustomPrompt(_) => "custom_prompt",
            UserAction::ChangeStyle => "change_style",
            UserAction::TryAnotherPhoto => "try_another_photo",
            UserAction::DismissError => "dismiss_error",
            UserAction::Refresh => "refresh",
        }
    }
}

struct SessionRequest {
    action: UserAction,
    reply: oneshot::Sender<Result<Workflow, SessionError>>,
}

/// Clone-safe handle to the session task.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionRequest>,
}

impl SessionHandle {
    /// Apply an action and wait for the resulting state.
    ///
    /// Actions are processed strictly one at a time; a rejected action
    /// leaves the state as it was.
    pub async fn dispatch(&self, action: UserAction) -> Result<Workflow, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SessionRequest {
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::ChannelClosed)?;
        reply_rx.await.map_err(|_| SessionError::ChannelClosed)?
    }
}

/// Spawn a task owning the controller and process actions in order.
pub fn spawn_session<S: Stylist + 'static>(stylist: S) -> SessionHandle {
    let (tx, mut rx) = mpsc::channel::<SessionRequest>(4);

    tokio::spawn(async move {
        let mut controller = Controller::new(stylist);
        tracing::info!("session started");

        while let Some(SessionRequest { action, reply }) = rx.recv().await {
            let name = action.name();
            tracing::debug!(action = name, step = %controller.workflow().step(), "action received");

            let result = apply(&mut controller, action)
                .await
                .map(|()| controller.workflow().clone())
                .map_err(SessionError::from);

            if let Err(err) = &result {
                tracing::debug!(action = name, error = %err, "action rejected");
            }
            let _ = reply.send(result);
        }
        tracing::info!("session ended");
    });

    SessionHandle { tx }
}

async fn apply<S: Stylist>(
    controller: &mut Controller<S>,
    action: UserAction,
) -> Result<(), WorkflowError> {
    match action {
        UserAction::SelectImage(image) => controller.select_image(image).await,
        UserAction::ChooseSuggestion(index) => controller.choose_suggestion(index).await,
        UserAction::CustomPrompt(prompt) => controller.submit_custom_prompt(&prompt).await,
        UserAction::ChangeStyle => controller.change_style(),
        UserAction::TryAnotherPhoto => controller.try_another_photo(),
        UserAction::DismissError => {
            controller.dismiss_error();
            Ok(())
        }
        UserAction::Refresh => Ok(()),
    }
}
