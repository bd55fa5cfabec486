use std::future::Future;
use std::pin::Pin;

use threadpilot_client::{ActionClient, ActionError};
use threadpilot_core::domain::PostId;

use super::CommandResult;

pub type ActionFuture = Pin<Box<dyn Future<Output = Result<(), ActionError>> + Send>>;

/// Runs one action against the server and folds the outcome into the shared
/// report shape. Exit code 1 for every failure class; the payload's typed
/// fields distinguish them.
pub async fn run<F>(
    client: &ActionClient,
    name: &'static str,
    post_id_raw: &str,
    action: F,
) -> CommandResult
where
    F: FnOnce(ActionClient, PostId) -> ActionFuture,
{
    let post = match PostId::new(post_id_raw) {
        Ok(post) => post,
        Err(error) => return CommandResult::invalid_post_id(name, error.to_string()),
    };

    match action(client.clone(), post).await {
        Ok(()) => CommandResult::accepted(name),
        Err(error) => CommandResult::action_failed(name, &error),
    }
}
