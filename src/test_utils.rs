//! Test utilities and fixtures for lyrics-seeds tests.
//!
//! This module provides common test helpers, an in-memory credential store
//! and canned Apiseeds payloads to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use lyrics_seeds::test_utils::{credentials_with_key, mock_track_metadata};
//!
//! #[test]
//! fn test_something() {
//!     let credentials = credentials_with_key("K1");
//!     let track = mock_track_metadata().into_shared();
//!     // ... test logic
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::{APIKEY_SETTING, ConfigError, CredentialStore};
use crate::metadata::TrackMetadata;

/// Credential store backed by a plain map.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    values: Mutex<HashMap<String, String>>,
}

impl CredentialStore for MemoryCredentials {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Creates a credential store holding `apikey` under the Apiseeds setting.
pub fn credentials_with_key(apikey: &str) -> Arc<MemoryCredentials> {
    let store = MemoryCredentials::default();
    store.values.lock().insert(APIKEY_SETTING.to_string(), apikey.to_string());
    Arc::new(store)
}

/// Creates a credential store with no key at all.
pub fn empty_credentials() -> Arc<MemoryCredentials> {
    Arc::new(MemoryCredentials::default())
}

/// Creates mock track metadata for testing.
///
/// Returns metadata with artist and title populated and no lyrics.
pub fn mock_track_metadata() -> TrackMetadata {
    TrackMetadata::new("Metallica", "Enter Sandman")
}

/// A well-formed Apiseeds response carrying `text` as the lyrics.
pub fn lyrics_payload(text: &str) -> String {
    serde_json::json!({
        "result": {
            "artist": {"name": "Metallica"},
            "track": {
                "name": "Enter Sandman",
                "text": text,
                "lang": {"code": "en", "name": "English"}
            },
            "probability": 100,
            "similarity": 1
        }
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::adapter;

    #[test]
    fn test_memory_credentials_round_trip() {
        let store = empty_credentials();
        assert_eq!(store.get(APIKEY_SETTING), None);

        store.set(APIKEY_SETTING, "K2").unwrap();
        assert_eq!(store.get(APIKEY_SETTING).as_deref(), Some("K2"));
        assert_eq!(credentials_with_key("K1").get(APIKEY_SETTING).as_deref(), Some("K1"));
    }

    #[test]
    fn test_lyrics_payload_is_extractable() {
        let lyrics = adapter::extract_lyrics(Ok(lyrics_payload("Exit light")));
        assert_eq!(lyrics, Ok("Exit light".to_string()));
    }
}
