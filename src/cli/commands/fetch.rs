//! Single-track lyrics lookup.

use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::album::Album;
use crate::config::{CredentialStore, ServiceConfig};
use crate::lyrics::{DispatchError, DispatchOutcome};
use crate::metadata::{Field, TrackMetadata};

use super::{build_dispatcher, print_api_key_instructions};

/// Fetch lyrics for one artist/title and print them
pub fn cmd_fetch(
    rt: &Runtime,
    credentials: Arc<dyn CredentialStore>,
    service: &ServiceConfig,
    artist: &str,
    title: &str,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let dispatcher = build_dispatcher(credentials, service)?;
        let album = Album::new(format!("{} - {}", artist, title));
        let track = TrackMetadata::new(artist, title).into_shared();

        if let DispatchOutcome::Skipped(e) = dispatcher.dispatch(&album, &track) {
            if e == DispatchError::MissingApiKey {
                print_api_key_instructions();
            }
            anyhow::bail!(e);
        }

        album.wait_loaded().await;

        let lyrics = track.lock().get(Field::Lyrics).map(String::from);
        match lyrics {
            Some(lyrics) => println!("{}", lyrics),
            None => println!("✗ No lyrics found for {} - {}", artist, title),
        }
        Ok(())
    })
}
