//! Trait definitions for the HTTP transport.
//!
//! The dispatcher only needs a non-blocking "send GET, complete later"
//! primitive. Production code uses [`HttpTransport`](super::HttpTransport),
//! while tests substitute [`mocks::MockTransport`].

use super::domain::{LookupContext, LyricRequest};

/// Non-blocking request primitive.
///
/// `send` must return without waiting for the network. When the request
/// settles, the implementation hands the raw body (or the failure) together
/// with `context` to [`on_complete`](super::response::on_complete).
/// Rate limiting for the request's (host, port) is the implementation's job.
pub trait Transport: Send + Sync {
    fn send(&self, request: LyricRequest, context: LookupContext);
}
