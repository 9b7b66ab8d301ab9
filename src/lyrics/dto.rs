//! Apiseeds API Data Transfer Objects
//!
//! These types match what the Apiseeds lyric endpoint returns, reduced to
//! the one field we read. Sibling fields (artist, language, copyright,
//! scores) are ignored whatever their type.
//! DO NOT use these types outside the lyrics module - convert via the adapter.
//!
//! Example response:
//! ```json
//! {
//!   "result": {
//!     "artist": {"name": "Metallica"},
//!     "track": {
//!       "name": "Enter Sandman",
//!       "text": "Say your prayers, little one...",
//!       "lang": {"code": "en", "name": "English"}
//!     },
//!     "copyright": {
//!       "notice": "Enter Sandman lyrics are property and copyright of their owners.",
//!       "artist": "Copyright Metallica",
//!       "text": "All lyrics provided for educational purposes and personal use only."
//!     },
//!     "probability": 100,
//!     "similarity": 1
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level lyric lookup response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LyricResponse {
    pub result: Option<LyricResult>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LyricResult {
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Track {
    /// Lyric text
    pub text: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs accept what the real API returns.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let json = r#"{
            "result": {
                "artist": {"name": "Metallica"},
                "track": {
                    "name": "Enter Sandman",
                    "text": "Say your prayers, little one",
                    "lang": {"code": "en", "name": "English"}
                },
                "copyright": {
                    "notice": "Enter Sandman lyrics are property and copyright of their owners.",
                    "artist": "Copyright Metallica",
                    "text": "All lyrics provided for educational purposes and personal use only."
                },
                "probability": 100,
                "similarity": 1
            }
        }"#;

        let response: LyricResponse =
            serde_json::from_str(json).expect("Should parse full response");

        let track = response
            .result
            .and_then(|r| r.track)
            .expect("track present");
        assert_eq!(track.text.as_deref(), Some("Say your prayers, little one"));
    }

    #[test]
    fn test_sibling_fields_of_any_type_are_ignored() {
        let json = r#"{
            "result": {
                "artist": "Metallica",
                "track": {"name": 5, "text": "L", "lang": "en"},
                "copyright": null,
                "probability": "100"
            }
        }"#;

        let response: LyricResponse = serde_json::from_str(json).expect("Should parse");
        let track = response.result.and_then(|r| r.track).expect("track present");
        assert_eq!(track.text.as_deref(), Some("L"));
    }

    #[test]
    fn test_parse_empty_object() {
        let response: LyricResponse = serde_json::from_str("{}").expect("Should parse {}");
        assert!(response.result.is_none());
    }

    #[test]
    fn test_parse_error_body_ignores_unknown_fields() {
        let json = r#"{"error": "Lyric no found, try again later."}"#;
        let response: LyricResponse =
            serde_json::from_str(json).expect("Should parse error body");
        assert!(response.result.is_none());
    }

    #[test]
    fn test_parse_sparse_track() {
        let json = r#"{"result": {"track": {"name": "Untitled"}}}"#;
        let response: LyricResponse = serde_json::from_str(json).expect("Should parse");
        let track = response.result.and_then(|r| r.track).expect("track present");
        assert!(track.text.is_none());
    }

    #[test]
    fn test_wrong_type_fails_to_parse() {
        let json = r#"{"result": {"track": {"text": 42}}}"#;
        assert!(serde_json::from_str::<LyricResponse>(json).is_err());
    }
}
