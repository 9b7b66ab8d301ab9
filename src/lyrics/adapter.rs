//! Adapter layer: turn a raw Apiseeds payload into lyrics text.
//!
//! This is the ONLY place DTO types are converted. If Apiseeds changes its
//! response format, only this file and dto.rs need to change.

use super::domain::{LookupError, TransportError};
use super::dto;

/// Path of the lyric text inside the response.
pub const LYRICS_FIELD: &str = "result.track.text";

/// Decode a payload as delivered by the transport and extract the lyrics.
pub fn extract_lyrics(payload: Result<String, TransportError>) -> Result<String, LookupError> {
    let body = payload?;
    let response: dto::LyricResponse =
        serde_json::from_str(&body).map_err(|e| LookupError::Decode(e.to_string()))?;
    to_lyrics(response)
}

/// Pull the lyric text out of a decoded response.
pub fn to_lyrics(response: dto::LyricResponse) -> Result<String, LookupError> {
    response
        .result
        .and_then(|result| result.track)
        .and_then(|track| track.text)
        .ok_or(LookupError::FieldMissing(LYRICS_FIELD))
}
