use std::sync::Arc;

use thiserror::Error;
use threadpilot_client::{ActionClient, ActionError};
use threadpilot_core::domain::{dm_route, BotHandle, FeedbackPolarity, PostId, TeamName, Tone};
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("navigation to {route} failed: {message}")]
    Failed { route: String, message: String },
}

/// Client-side navigation capability supplied by the host.
pub trait Navigator: Send + Sync {
    fn open(&self, route: &str) -> Result<(), NavigationError>;
}

#[derive(Debug, Error)]
pub enum MenuError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Entries of the post dropdown menu. `navigates_to_bot` mirrors which
/// entries open the bot conversation before firing their request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostMenuAction {
    SummarizeThread,
    SummarizeAudio,
    FileTicket,
    ReactForMe,
}

impl PostMenuAction {
    pub const ALL: [PostMenuAction; 4] = [
        PostMenuAction::SummarizeThread,
        PostMenuAction::SummarizeAudio,
        PostMenuAction::FileTicket,
        PostMenuAction::ReactForMe,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::SummarizeThread => "Summarize Thread",
            Self::SummarizeAudio => "Summarize Meeting Audio",
            Self::FileTicket => "Jira ticket Thread",
            Self::ReactForMe => "React for me",
        }
    }

    pub fn navigates_to_bot(self) -> bool {
        matches!(self, Self::SummarizeThread | Self::FileTicket)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorAction {
    Simplify,
    ChangeTone(Tone),
    AskAiToEdit,
}

impl EditorAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Simplify => "Simplify",
            Self::ChangeTone(_) => "Change Tone",
            Self::AskAiToEdit => "Ask AI to Edit",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeBlockAction {
    ExplainCode,
    SuggestImprovements,
}

impl CodeBlockAction {
    pub const ALL: [CodeBlockAction; 2] =
        [CodeBlockAction::ExplainCode, CodeBlockAction::SuggestImprovements];

    pub fn label(self) -> &'static str {
        match self {
            Self::ExplainCode => "Explain Code",
            Self::SuggestImprovements => "Suggest Improvements",
        }
    }
}

/// Maps one user interaction to exactly one action client call.
///
/// No validation, no loading state, no error display: a failed call is
/// returned to the host untouched.
pub struct MenuDispatcher {
    client: ActionClient,
    navigator: Arc<dyn Navigator>,
    bot: BotHandle,
}

impl MenuDispatcher {
    pub fn new(client: ActionClient, navigator: Arc<dyn Navigator>, bot: BotHandle) -> Self {
        Self { client, navigator, bot }
    }

    pub async fn dispatch_post_action(
        &self,
        action: PostMenuAction,
        team: &TeamName,
        post: &PostId,
    ) -> Result<(), MenuError> {
        if action.navigates_to_bot() {
            let route = dm_route(team, &self.bot);
            debug!(
                event_name = "host.menu.navigate",
                label = action.label(),
                route = %route,
                "opening bot conversation before issuing action"
            );
            self.navigator.open(&route)?;
        }

        debug!(
            event_name = "host.menu.dispatch",
            label = action.label(),
            post_id = %post,
            "dispatching post menu action"
        );
        match action {
            PostMenuAction::SummarizeThread => self.client.summarize(post).await?,
            PostMenuAction::SummarizeAudio => self.client.transcribe(post).await?,
            PostMenuAction::FileTicket => self.client.file_ticket(post).await?,
            PostMenuAction::ReactForMe => self.client.react(post).await?,
        }
        Ok(())
    }

    pub async fn dispatch_editor_action(
        &self,
        action: EditorAction,
        text: &str,
    ) -> Result<(), MenuError> {
        debug!(event_name = "host.menu.dispatch", label = action.label(), "dispatching editor action");
        match action {
            EditorAction::Simplify => self.client.simplify(text).await?,
            EditorAction::ChangeTone(tone) => self.client.change_tone(tone, text).await?,
            EditorAction::AskAiToEdit => self.client.ask_ai_change_text(text).await?,
        }
        Ok(())
    }

    pub async fn dispatch_code_action(
        &self,
        action: CodeBlockAction,
        code: &str,
    ) -> Result<(), MenuError> {
        debug!(event_name = "host.menu.dispatch", label = action.label(), "dispatching code block action");
        match action {
            CodeBlockAction::ExplainCode => self.client.explain_code(code).await?,
            CodeBlockAction::SuggestImprovements => {
                self.client.suggest_code_improvements(code).await?
            }
        }
        Ok(())
    }

    /// Controls rendered on a bot response post.
    pub async fn rate(&self, post: &PostId, polarity: FeedbackPolarity) -> Result<(), MenuError> {
        self.client.feedback(post, polarity).await?;
        Ok(())
    }

    pub async fn stop(&self, post: &PostId) -> Result<(), MenuError> {
        self.client.stop_generating(post).await?;
        Ok(())
    }

    pub async fn regenerate(&self, post: &PostId) -> Result<(), MenuError> {
        self.client.regenerate(post).await?;
        Ok(())
    }
}
