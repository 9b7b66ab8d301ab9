//! Domain types for a single lyrics lookup.
//!
//! These types are ours; the Apiseeds response shape lives in `dto.rs`.

use std::sync::Arc;

use crate::album::{Album, RequestGuard};
use crate::metadata::SharedMetadata;

/// Scheduling priority relative to other queued requests for the same host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Priority {
    #[default]
    Normal,
    High,
}

/// One lyric lookup request, built fresh per track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricRequest {
    host: String,
    port: u16,
    artist: String,
    title: String,
    apikey: String,
    priority: Priority,
}

impl LyricRequest {
    /// Lookup of `artist`/`title` authenticated with `apikey`.
    pub fn lookup(
        host: impl Into<String>,
        port: u16,
        artist: impl Into<String>,
        title: impl Into<String>,
        apikey: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            artist: artist.into(),
            title: title.into(),
            apikey: apikey.into(),
            priority: Priority::Normal,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Request path as built from the metadata, without escaping.
    pub fn path(&self) -> String {
        format!("/api/music/lyric/{}/{}", self.artist, self.title)
    }

    /// Request path with artist and title percent-encoded as path segments.
    pub fn encoded_path(&self) -> String {
        format!(
            "/api/music/lyric/{}/{}",
            urlencoding::encode(&self.artist),
            urlencoding::encode(&self.title)
        )
    }

    /// Query parameters, unencoded.
    pub fn query(&self) -> Vec<(&'static str, &str)> {
        vec![("apikey", self.apikey.as_str())]
    }

    /// Encoded query string.
    pub fn query_string(&self) -> String {
        self.query()
            .into_iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Full request URL. Port 443 is requested over https, anything else
    /// over plain http.
    pub fn url(&self) -> String {
        let scheme = if self.port == 443 { "https" } else { "http" };
        format!(
            "{}://{}:{}{}?{}",
            scheme,
            self.host,
            self.port,
            self.encoded_path(),
            self.query_string()
        )
    }
}

/// State a completion needs: the target track and the album's guard.
///
/// Passed by value to [`on_complete`](super::response::on_complete), so a
/// lookup can complete at most once. If a transport drops the context
/// without completing it, the guard still releases the album.
#[derive(Debug)]
pub struct LookupContext {
    metadata: SharedMetadata,
    guard: RequestGuard,
}

impl LookupContext {
    pub fn new(guard: RequestGuard, metadata: SharedMetadata) -> Self {
        Self { metadata, guard }
    }

    pub fn metadata(&self) -> &SharedMetadata {
        &self.metadata
    }

    pub fn album(&self) -> &Arc<Album> {
        self.guard.album()
    }

    pub(crate) fn into_parts(self) -> (SharedMetadata, RequestGuard) {
        (self.metadata, self.guard)
    }
}

/// Result of a dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Request submitted; completion will finalize the album.
    Dispatched,
    /// A precondition failed; nothing was sent and the album is untouched.
    Skipped(DispatchError),
}

/// Precondition failures detected before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("API key is missing, please provide a valid value")]
    MissingApiKey,

    #[error("artist is missing, please provide a valid value")]
    MissingArtist,

    #[error("title is missing, please provide a valid value")]
    MissingTitle,
}

/// Failures reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Transport setup failed: {0}")]
    Setup(String),
}

/// Why a lookup produced no lyrics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("response has no {0}")]
    FieldMissing(&'static str),
}
