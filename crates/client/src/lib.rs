//! Action client for the assistant plugin's HTTP surface.
//!
//! Every operation is a single-shot POST to a plugin-namespaced path on the
//! chat server; the response body is discarded on success and a non-2xx
//! status is surfaced as [`ActionError::RequestFailed`] carrying the status
//! code and the request path. There are no retries, no caching, and no
//! deduplication: each call issues exactly one request.
//!
//! # Key Types
//!
//! - `ActionClient` - the typed operations (`react`, `summarize`, …)
//! - `ActionTransport` - trait seam between the client and the wire
//! - `HttpTransport` - production transport over `reqwest`
//! - `RequestDecorator` - caller-supplied ambient authentication

pub mod actions;
pub mod transport;

pub use actions::{ActionClient, ActionError};
pub use transport::{
    ActionRequest, ActionResponse, ActionTransport, HttpTransport, NoopDecorator,
    RequestDecorator, SessionTokenDecorator, TransportError,
};
