use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use threadpilot_core::domain::{FeedbackPolarity, PostId, Tone};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::transport::{ActionRequest, ActionTransport, TransportError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The server answered outside [200, 300). `message` is empty by
    /// contract; the status code is all the server exposes.
    #[error("request to {url} failed with status {status_code}")]
    RequestFailed { status_code: u16, url: String, message: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Typed client for the plugin's action endpoints.
///
/// Holds the plugin namespace and a transport; every operation issues exactly
/// one POST and returns `Ok(())` on any 2xx response.
#[derive(Clone)]
pub struct ActionClient {
    transport: Arc<dyn ActionTransport>,
    plugin_id: String,
}

impl ActionClient {
    pub fn new(transport: Arc<dyn ActionTransport>, plugin_id: impl Into<String>) -> Self {
        Self { transport, plugin_id: plugin_id.into() }
    }

    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// Requests an automated emoji reaction to a post.
    pub async fn react(&self, post: &PostId) -> Result<(), ActionError> {
        let url = format!("/plugins/{}/react/{}", self.plugin_id, post);
        self.dispatch("react", url, None).await
    }

    /// Requests a summary of the thread rooted at a post.
    pub async fn summarize(&self, post: &PostId) -> Result<(), ActionError> {
        let url = format!("/plugins/{}/summarize/post/{}", self.plugin_id, post);
        self.dispatch("summarize", url, None).await
    }

    /// Requests ticket creation from the conversation rooted at a post.
    pub async fn file_ticket(&self, post: &PostId) -> Result<(), ActionError> {
        let url = format!("/plugins/{}/jiraticket/post/{}", self.plugin_id, post);
        self.dispatch("file_ticket", url, None).await
    }

    /// Records feedback polarity on a bot response.
    pub async fn feedback(
        &self,
        post: &PostId,
        polarity: FeedbackPolarity,
    ) -> Result<(), ActionError> {
        let url = format!(
            "/plugins/{}/feedback/post/{}/{}",
            self.plugin_id,
            post,
            polarity.as_path_segment()
        );
        self.dispatch("feedback", url, None).await
    }

    /// Requests audio transcription of a post's attachment.
    pub async fn transcribe(&self, post: &PostId) -> Result<(), ActionError> {
        let url = format!("/plugins/{}/transcribe/{}", self.plugin_id, post);
        self.dispatch("transcribe", url, None).await
    }

    /// Stops an in-flight bot response on a post.
    pub async fn stop_generating(&self, post: &PostId) -> Result<(), ActionError> {
        let url = format!("/plugins/{}/stop/post/{}", self.plugin_id, post);
        self.dispatch("stop_generating", url, None).await
    }

    /// Asks the bot to regenerate its response on a post.
    pub async fn regenerate(&self, post: &PostId) -> Result<(), ActionError> {
        let url = format!("/plugins/{}/regenerate/post/{}", self.plugin_id, post);
        self.dispatch("regenerate", url, None).await
    }

    /// Asks the bot to simplify the given editor text.
    pub async fn simplify(&self, text: &str) -> Result<(), ActionError> {
        let url = format!("/plugins/{}/text/simplify", self.plugin_id);
        self.dispatch("simplify", url, Some(json!({ "message": text }))).await
    }

    /// Asks the bot to rewrite the given editor text in a tone.
    pub async fn change_tone(&self, tone: Tone, text: &str) -> Result<(), ActionError> {
        let url =
            format!("/plugins/{}/text/change_tone/{}", self.plugin_id, tone.as_path_segment());
        self.dispatch("change_tone", url, Some(json!({ "message": text }))).await
    }

    /// Hands the given editor text to the bot with an open-ended edit prompt.
    pub async fn ask_ai_change_text(&self, text: &str) -> Result<(), ActionError> {
        let url = format!("/plugins/{}/text/ask_ai_change_text", self.plugin_id);
        self.dispatch("ask_ai_change_text", url, Some(json!({ "message": text }))).await
    }

    /// Asks the bot to explain a code block.
    pub async fn explain_code(&self, code: &str) -> Result<(), ActionError> {
        let url = format!("/plugins/{}/text/explain_code", self.plugin_id);
        self.dispatch("explain_code", url, Some(json!({ "message": code }))).await
    }

    /// Asks the bot to suggest improvements to a code block.
    pub async fn suggest_code_improvements(&self, code: &str) -> Result<(), ActionError> {
        let url = format!("/plugins/{}/text/suggest_code_improvements", self.plugin_id);
        self.dispatch("suggest_code_improvements", url, Some(json!({ "message": code }))).await
    }

    async fn dispatch(
        &self,
        action: &'static str,
        url: String,
        body: Option<serde_json::Value>,
    ) -> Result<(), ActionError> {
        let correlation_id = Uuid::new_v4().to_string();
        debug!(
            event_name = "client.action.issued",
            action,
            correlation_id = %correlation_id,
            url = %url,
            "issuing plugin action request"
        );

        let response = self
            .transport
            .post(ActionRequest { url: url.clone(), body, correlation_id: correlation_id.clone() })
            .await?;

        if response.is_success() {
            debug!(
                event_name = "client.action.completed",
                action,
                correlation_id = %correlation_id,
                url = %url,
                status = response.status,
                "plugin action request completed"
            );
            return Ok(());
        }

        warn!(
            event_name = "client.action.failed",
            action,
            correlation_id = %correlation_id,
            url = %url,
            status = response.status,
            "plugin action request failed"
        );
        Err(ActionError::RequestFailed {
            status_code: response.status,
            url,
            message: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use async_trait::async_trait;
    use threadpilot_core::domain::{FeedbackPolarity, PostId, Tone};
    use tokio::sync::Mutex;

    use super::{ActionClient, ActionError};
    use crate::transport::{ActionRequest, ActionResponse, ActionTransport, TransportError};

    #[derive(Default)]
    struct ScriptedTransport {
        state: Mutex<ScriptedState>,
    }

    #[derive(Default)]
    struct ScriptedState {
        responses: VecDeque<Result<ActionResponse, TransportError>>,
        requests: Vec<ActionRequest>,
    }

    impl ScriptedTransport {
        fn with_responses(responses: Vec<Result<ActionResponse, TransportError>>) -> Self {
            Self {
                state: Mutex::new(ScriptedState {
                    responses: responses.into(),
                    requests: Vec::new(),
                }),
            }
        }

        fn with_statuses(statuses: Vec<u16>) -> Self {
            Self::with_responses(
                statuses.into_iter().map(|status| Ok(ActionResponse { status })).collect(),
            )
        }

        async fn requests(&self) -> Vec<ActionRequest> {
            self.state.lock().await.requests.clone()
        }
    }

    #[async_trait]
    impl ActionTransport for ScriptedTransport {
        async fn post(&self, request: ActionRequest) -> Result<ActionResponse, TransportError> {
            let mut state = self.state.lock().await;
            state.requests.push(request);
            state.responses.pop_front().unwrap_or(Ok(ActionResponse { status: 200 }))
        }
    }

    fn client_over(transport: Arc<ScriptedTransport>) -> ActionClient {
        ActionClient::new(transport, "ai-actions")
    }

    fn post(raw: &str) -> PostId {
        PostId::new(raw).expect("valid post id")
    }

    #[tokio::test]
    async fn summarize_with_200_resolves() {
        let transport = Arc::new(ScriptedTransport::with_statuses(vec![200]));
        let client = client_over(transport.clone());

        client.summarize(&post("abc123")).await.expect("2xx resolves with no value");

        let requests = transport.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "/plugins/ai-actions/summarize/post/abc123");
        assert_eq!(requests[0].body, None);
    }

    #[tokio::test]
    async fn react_with_403_rejects_with_status_and_url() {
        let transport = Arc::new(ScriptedTransport::with_statuses(vec![403]));
        let client = client_over(transport);

        let error = client.react(&post("xyz")).await.expect_err("403 rejects");
        assert_eq!(
            error,
            ActionError::RequestFailed {
                status_code: 403,
                url: "/plugins/ai-actions/react/xyz".to_string(),
                message: String::new(),
            }
        );
    }

    #[tokio::test]
    async fn post_actions_build_documented_paths() {
        let transport = Arc::new(ScriptedTransport::with_statuses(vec![200; 5]));
        let client = client_over(transport.clone());
        let id = post("p1");

        client.react(&id).await.expect("react");
        client.file_ticket(&id).await.expect("file_ticket");
        client.transcribe(&id).await.expect("transcribe");
        client.stop_generating(&id).await.expect("stop_generating");
        client.regenerate(&id).await.expect("regenerate");

        let urls: Vec<String> =
            transport.requests().await.into_iter().map(|request| request.url).collect();
        assert_eq!(
            urls,
            vec![
                "/plugins/ai-actions/react/p1",
                "/plugins/ai-actions/jiraticket/post/p1",
                "/plugins/ai-actions/transcribe/p1",
                "/plugins/ai-actions/stop/post/p1",
                "/plugins/ai-actions/regenerate/post/p1",
            ]
        );
    }

    #[tokio::test]
    async fn feedback_polarity_paths_are_never_swapped() {
        let transport = Arc::new(ScriptedTransport::with_statuses(vec![200, 200]));
        let client = client_over(transport.clone());
        let id = post("p2");

        client.feedback(&id, FeedbackPolarity::Positive).await.expect("positive");
        client.feedback(&id, FeedbackPolarity::Negative).await.expect("negative");

        let urls: Vec<String> =
            transport.requests().await.into_iter().map(|request| request.url).collect();
        assert_eq!(urls[0], "/plugins/ai-actions/feedback/post/p2/positive");
        assert_eq!(urls[1], "/plugins/ai-actions/feedback/post/p2/negative");
    }

    #[tokio::test]
    async fn text_actions_carry_message_bodies() {
        let transport = Arc::new(ScriptedTransport::with_statuses(vec![200; 5]));
        let client = client_over(transport.clone());

        client.simplify("walls of text").await.expect("simplify");
        client.change_tone(Tone::Professional, "hey").await.expect("change_tone");
        client.ask_ai_change_text("draft").await.expect("ask_ai_change_text");
        client.explain_code("fn main() {}").await.expect("explain_code");
        client.suggest_code_improvements("fn main() {}").await.expect("suggest");

        let requests = transport.requests().await;
        assert_eq!(requests[0].url, "/plugins/ai-actions/text/simplify");
        assert_eq!(requests[0].body, Some(serde_json::json!({ "message": "walls of text" })));
        assert_eq!(requests[1].url, "/plugins/ai-actions/text/change_tone/professional");
        assert_eq!(requests[2].url, "/plugins/ai-actions/text/ask_ai_change_text");
        assert_eq!(requests[3].url, "/plugins/ai-actions/text/explain_code");
        assert_eq!(requests[4].url, "/plugins/ai-actions/text/suggest_code_improvements");
    }

    #[tokio::test]
    async fn status_boundaries_follow_half_open_success_range() {
        let transport = Arc::new(ScriptedTransport::with_statuses(vec![200, 299, 300, 199]));
        let client = client_over(transport);
        let id = post("p3");

        client.react(&id).await.expect("200 succeeds");
        client.react(&id).await.expect("299 succeeds");
        let at_300 = client.react(&id).await.expect_err("300 fails");
        assert!(matches!(at_300, ActionError::RequestFailed { status_code: 300, .. }));
        let at_199 = client.react(&id).await.expect_err("199 fails");
        assert!(matches!(at_199, ActionError::RequestFailed { status_code: 199, .. }));
    }

    #[tokio::test]
    async fn transport_failures_propagate_unwrapped() {
        let transport = Arc::new(ScriptedTransport::with_responses(vec![Err(
            TransportError::Request {
                url: "/plugins/ai-actions/react/p4".to_string(),
                message: "connection refused".to_string(),
            },
        )]));
        let client = client_over(transport);

        let error = client.react(&post("p4")).await.expect_err("transport error propagates");
        assert!(matches!(error, ActionError::Transport(TransportError::Request { .. })));
    }

    #[tokio::test]
    async fn concurrent_calls_are_independent() {
        let transport = Arc::new(ScriptedTransport::with_statuses(vec![200, 200]));
        let client = client_over(transport.clone());
        let first = post("first");
        let second = post("second");

        let (a, b) = tokio::join!(client.summarize(&first), client.transcribe(&second));
        a.expect("first call independent");
        b.expect("second call independent");

        let mut urls: Vec<String> =
            transport.requests().await.into_iter().map(|request| request.url).collect();
        urls.sort();
        assert_eq!(
            urls,
            vec![
                "/plugins/ai-actions/summarize/post/first",
                "/plugins/ai-actions/transcribe/second",
            ]
        );
    }

    #[tokio::test]
    async fn each_request_gets_its_own_correlation_id() {
        let transport = Arc::new(ScriptedTransport::with_statuses(vec![200, 200]));
        let client = client_over(transport.clone());
        let id = post("p5");

        client.react(&id).await.expect("first");
        client.react(&id).await.expect("second");

        let requests = transport.requests().await;
        assert_ne!(requests[0].correlation_id, requests[1].correlation_id);
    }
}
