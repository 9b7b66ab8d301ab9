//! Completion handler for a dispatched lyrics lookup.
//!
//! [`on_complete`] runs once per dispatched request, on whatever task the
//! transport completes on. Whatever the payload, the album's in-flight
//! counter is decremented and the album finalized afterwards: the
//! [`RequestGuard`](crate::album::RequestGuard) carried by the context does
//! this when it is dropped, including when extraction panics.

use tracing::{debug, info};

use super::PLUGIN_NAME;
use super::adapter;
use super::domain::{LookupContext, TransportError};
use crate::metadata::Field;

/// Handle the settled response for one track.
///
/// On success the lyric text is written to the track's `lyrics` field;
/// on any failure the metadata is left as it was.
pub fn on_complete(context: LookupContext, payload: Result<String, TransportError>) {
    let (metadata, guard) = context.into_parts();
    let title = metadata
        .lock()
        .get(Field::Title)
        .unwrap_or_default()
        .to_string();

    match adapter::extract_lyrics(payload) {
        Ok(lyrics) => {
            metadata.lock().set(Field::Lyrics, lyrics);
            info!("{}: lyrics found for track {}", PLUGIN_NAME, title);
        }
        Err(e) => {
            info!("{}: lyrics NOT found for track {}", PLUGIN_NAME, title);
            debug!(album = %guard.album().name(), error = %e, "lyrics lookup failed");
        }
    }

    // Decrement, then finalize
    drop(guard);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::album::Album;
    use crate::metadata::TrackMetadata;
    use std::sync::Arc;

    fn complete(
        metadata: TrackMetadata,
        payload: Result<String, TransportError>,
    ) -> (Arc<Album>, TrackMetadata) {
        let album = Album::new("test");
        let shared = metadata.into_shared();
        let context = LookupContext::new(album.begin_request(), Arc::clone(&shared));
        assert_eq!(album.in_flight(), 1);

        on_complete(context, payload);
        let result = shared.lock().clone();
        (album, result)
    }

    #[test]
    fn test_success_sets_lyrics() {
        let (album, meta) = complete(
            TrackMetadata::new("Metallica", "Enter Sandman"),
            Ok(r#"{"result":{"track":{"text":"Say your prayers"}}}"#.to_string()),
        );

        assert_eq!(meta.get(Field::Lyrics), Some("Say your prayers"));
        assert_eq!(album.in_flight(), 0);
        assert_eq!(album.finalize_count(), 1);
    }

    #[test]
    fn test_success_replaces_existing_lyrics() {
        let (_, meta) = complete(
            TrackMetadata::new("a", "b").with(Field::Lyrics, "old"),
            Ok(r#"{"result":{"track":{"text":"new"}}}"#.to_string()),
        );
        assert_eq!(meta.get(Field::Lyrics), Some("new"));
    }

    #[test]
    fn test_failures_leave_metadata_unchanged_and_finalize_once() {
        let failures = [
            Ok("{}".to_string()),
            Ok("<html>Bad Gateway</html>".to_string()),
            Ok(r#"{"result":{"track":{"name":"x"}}}"#.to_string()),
            Err(TransportError::Network("connection refused".to_string())),
            Err(TransportError::Status(404)),
        ];

        for payload in failures {
            let before = TrackMetadata::new("a", "b").with(Field::Lyrics, "kept");
            let (album, after) = complete(before.clone(), payload.clone());

            assert_eq!(after, before, "payload: {:?}", payload);
            assert_eq!(album.in_flight(), 0, "payload: {:?}", payload);
            assert_eq!(album.finalize_count(), 1, "payload: {:?}", payload);
        }
    }

    #[test]
    fn test_missing_title_still_completes() {
        let (album, meta) = complete(
            TrackMetadata::default(),
            Ok(r#"{"result":{"track":{"text":"L"}}}"#.to_string()),
        );
        assert_eq!(meta.get(Field::Lyrics), Some("L"));
        assert_eq!(album.finalize_count(), 1);
    }

    #[test]
    fn test_completion_decrements_only_its_own_request() {
        let album = Album::new("test");
        let _other = album.begin_request();
        let context = LookupContext::new(
            album.begin_request(),
            TrackMetadata::new("a", "b").into_shared(),
        );
        assert_eq!(album.in_flight(), 2);

        on_complete(context, Ok("{}".to_string()));
        assert_eq!(album.in_flight(), 1);
        assert_eq!(album.finalize_count(), 1);
    }
}
