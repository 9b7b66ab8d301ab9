//! Lyrics lookup against the Apiseeds lyrics service.
//!
//! # Architecture
//!
//! - **Domain** (`domain.rs`) - requests, the per-lookup context and error types
//! - **DTOs** (`dto.rs`) - exact shape of the Apiseeds response
//! - **Adapter** (`adapter.rs`) - the only place DTOs become lyrics text
//! - **Rate limiting** (`ratelimit.rs`) - process-wide minimum spacing per (host, port)
//! - **Transport** (`traits.rs`, `transport.rs`) - non-blocking GET primitive
//! - **Dispatch** (`dispatch.rs`) - precondition checks and request submission
//! - **Response** (`response.rs`) - completion handler for one lookup
//!
//! A lookup is dispatched per track. The album's in-flight counter goes up
//! at dispatch and comes back down, followed by a finalize signal, when the
//! transport hands the response to [`response::on_complete`].
//!
//! # Usage
//!
//! ```ignore
//! use lyrics_seeds::lyrics::{self, HttpTransport, RequestDispatcher};
//!
//! lyrics::register_rate_policy(&config.service);
//! let dispatcher = RequestDispatcher::new(credentials, Arc::new(HttpTransport::new()?));
//!
//! let album = Album::new("Metallica");
//! let track = TrackMetadata::new("Metallica", "Enter Sandman").into_shared();
//! dispatcher.dispatch(&album, &track);
//! album.wait_loaded().await;
//! ```

use std::time::Duration;

pub mod adapter;
pub mod dispatch;
pub mod domain;
pub mod dto;
pub mod ratelimit;
pub mod response;
pub mod traits;
pub mod transport;

pub use dispatch::RequestDispatcher;
pub use domain::{
    DispatchError, DispatchOutcome, LookupContext, LookupError, LyricRequest, Priority,
    TransportError,
};
pub use ratelimit::RateLimiter;
pub use traits::Transport;
pub use transport::HttpTransport;

use crate::config::ServiceConfig;

/// Prefix for plugin-level log lines.
pub const PLUGIN_NAME: &str = "Apiseeds Lyrics";

pub const APISEEDS_HOST: &str = "orion.apiseeds.com";
pub const APISEEDS_PORT: u16 = 443;

/// Apiseeds allows 200 requests per minute.
pub const REQUESTS_PER_MINUTE: u32 = 200;

/// Minimum spacing between two requests: 60s / 200.
pub const APISEEDS_DELAY: Duration = Duration::from_millis(60_000 / REQUESTS_PER_MINUTE as u64);

/// Register the service's rate policy with the process-wide limiter.
///
/// Call once at startup, before the first dispatch.
pub fn register_rate_policy(service: &ServiceConfig) {
    let min_delay = service.min_delay();
    ratelimit::global().register(&service.host, service.port, min_delay);
    tracing::debug!(
        host = %service.host,
        port = service.port,
        min_delay_ms = min_delay.as_millis() as u64,
        "Registered rate policy"
    );
}
