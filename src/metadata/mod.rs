//! Track metadata and audio tag access.
//!
//! [`TrackMetadata`] is the per-track record the lyrics lookup reads from
//! and writes to. Its key set is fixed ([`Field`]); a field that was never
//! set reads back as `None` rather than an empty string.
//!
//! Tags are read from and written to audio files with the lofty crate
//! (MP3, FLAC, OGG, M4A, WAV).

use std::path::Path;
use std::sync::Arc;

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt};
use parking_lot::Mutex;

use crate::error::{Error, Result};

/// Metadata fields known to the lyrics lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Artist,
    Title,
    Lyrics,
}

impl Field {
    /// The field's string key.
    pub fn key(self) -> &'static str {
        match self {
            Field::Artist => "artist",
            Field::Title => "title",
            Field::Lyrics => "lyrics",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Metadata for a single track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    artist: Option<String>,
    title: Option<String>,
    lyrics: Option<String>,
}

/// Track metadata shared between the host pipeline and an in-flight lookup.
pub type SharedMetadata = Arc<Mutex<TrackMetadata>>;

impl TrackMetadata {
    /// Metadata with artist and title set.
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: Some(artist.into()),
            title: Some(title.into()),
            lyrics: None,
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Wrap into [`SharedMetadata`] for handing to a lookup.
    pub fn into_shared(self) -> SharedMetadata {
        Arc::new(Mutex::new(self))
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Artist => &self.artist,
            Field::Title => &self.title,
            Field::Lyrics => &self.lyrics,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Artist => &mut self.artist,
            Field::Title => &mut self.title,
            Field::Lyrics => &mut self.lyrics,
        }
    }
}

/// Read artist, title and lyrics tags from an audio file.
///
/// Missing tags stay absent; no placeholder values are invented.
pub fn read(path: &Path) -> Result<TrackMetadata> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }

    let tagged_file = Probe::open(path)
        .and_then(|probe| probe.read())
        .map_err(|e| Error::metadata(path, e.to_string()))?;

    let mut metadata = TrackMetadata::default();

    // Get the primary tag, or fall back to the first available tag
    let Some(tag) = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
    else {
        return Ok(metadata);
    };

    if let Some(artist) = tag.artist() {
        metadata.set(Field::Artist, artist);
    }
    if let Some(title) = tag.title() {
        metadata.set(Field::Title, title);
    }
    if let Some(lyrics) = tag
        .items()
        .find(|item| item.key() == &ItemKey::Lyrics)
        .and_then(|item| item.value().text())
    {
        metadata.set(Field::Lyrics, lyrics);
    }

    Ok(metadata)
}

/// Write lyrics into the file's primary tag, creating the tag if needed.
pub fn write_lyrics(path: &Path, lyrics: &str) -> Result<()> {
    let mut tagged_file = Probe::open(path)
        .and_then(|probe| probe.read())
        .map_err(|e| Error::metadata(path, e.to_string()))?;

    let tag_type = tagged_file.primary_tag_type();
    if tagged_file.tag(tag_type).is_none() {
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged_file
        .tag_mut(tag_type)
        .ok_or_else(|| Error::metadata(path, "no writable tag"))?;

    if !tag.insert_text(ItemKey::Lyrics, lyrics.to_string()) {
        return Err(Error::metadata(
            path,
            format!("{:?} tags cannot hold lyrics", tag_type),
        ));
    }

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|e| Error::metadata(path, format!("failed to write tags: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_fields_are_absent() {
        let meta = TrackMetadata::default();
        for field in [Field::Artist, Field::Title, Field::Lyrics] {
            assert_eq!(meta.get(field), None);
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut meta = TrackMetadata::new("Metallica", "Enter Sandman");
        assert_eq!(meta.get(Field::Artist), Some("Metallica"));
        assert_eq!(meta.get(Field::Title), Some("Enter Sandman"));
        assert_eq!(meta.get(Field::Lyrics), None);

        meta.set(Field::Lyrics, "Say your prayers, little one");
        assert_eq!(meta.get(Field::Lyrics), Some("Say your prayers, little one"));
    }

    #[test]
    fn test_empty_string_is_present() {
        let meta = TrackMetadata::default().with(Field::Title, "");
        assert_eq!(meta.get(Field::Title), Some(""));
    }

    #[test]
    fn test_field_keys() {
        assert_eq!(Field::Artist.key(), "artist");
        assert_eq!(Field::Lyrics.to_string(), "lyrics");
    }

    #[test]
    fn test_shared_metadata_is_mutated_in_place() {
        let shared = TrackMetadata::new("a", "b").into_shared();
        let other = Arc::clone(&shared);
        other.lock().set(Field::Lyrics, "la la");
        assert_eq!(shared.lock().get(Field::Lyrics), Some("la la"));
    }

    #[test]
    fn test_read_non_audio_file_returns_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "This is just some text, not music.").expect("Failed to write");

        let result = read(file.path());
        assert!(matches!(result, Err(Error::Metadata { .. })));
    }

    #[test]
    fn test_read_non_existent_file_returns_error() {
        let result = read(Path::new("non_existent_file.mp3"));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_write_lyrics_to_non_audio_returns_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "Not an audio file").expect("Failed to write");

        assert!(write_lyrics(file.path(), "lyrics").is_err());
    }
}
