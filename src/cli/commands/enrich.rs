//! Batch lyrics enrichment for audio files.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use crate::album::Album;
use crate::config::{CredentialStore, ServiceConfig};
use crate::lyrics::DispatchOutcome;
use crate::metadata::{self, Field, SharedMetadata};

use super::{build_dispatcher, collect_audio_files, has_api_key, print_api_key_instructions};

/// A dispatched file and its lyrics before the lookup.
struct Pending {
    path: PathBuf,
    before: Option<String>,
    track: SharedMetadata,
}

/// Per-run counters
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    found: usize,
    unchanged: usize,
    not_found: usize,
    skipped: usize,
    failed: usize,
    written: usize,
}

/// Batch enrich audio files with lyrics
#[allow(clippy::too_many_arguments)]
pub fn cmd_enrich(
    rt: &Runtime,
    credentials: Arc<dyn CredentialStore>,
    service: &ServiceConfig,
    path: &Path,
    recursive: bool,
    write: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    if !has_api_key(credentials.as_ref()) {
        print_api_key_instructions();
        anyhow::bail!("Apiseeds API key is missing");
    }

    let files = collect_audio_files(path, recursive)?;
    if files.is_empty() {
        println!("No audio files found.");
        return Ok(());
    }

    println!("Found {} audio files", files.len());
    if dry_run {
        println!("(Dry run - no changes will be made)");
    }
    println!();

    let summary = rt.block_on(async {
        let dispatcher = build_dispatcher(credentials, service)?;
        let album = Album::new(path.display().to_string());
        let mut summary = Summary::default();
        let mut pending = Vec::new();

        for file in files {
            let track = match metadata::read(&file) {
                Ok(track) => track,
                Err(e) => {
                    println!("  ✗ {}: {}", file.display(), e);
                    summary.failed += 1;
                    continue;
                }
            };

            let before = track.get(Field::Lyrics).map(String::from);
            let track = track.into_shared();
            match dispatcher.dispatch(&album, &track) {
                DispatchOutcome::Dispatched => pending.push(Pending {
                    path: file,
                    before,
                    track,
                }),
                DispatchOutcome::Skipped(e) => {
                    println!("  ⊘ {}: {}", file.display(), e);
                    summary.skipped += 1;
                }
            }
        }

        debug!(in_flight = album.in_flight(), "waiting for lookups");
        album.wait_loaded().await;

        for entry in pending {
            apply(&entry, write, dry_run, &mut summary);
        }
        anyhow::Ok(summary)
    })?;

    println!();
    println!("═══════════════════════════════════════");
    println!("Summary:");
    println!("  Lyrics found:     {}", summary.found);
    println!("  Already current:  {}", summary.unchanged);
    println!("  Not found:        {}", summary.not_found);
    println!("  Skipped:          {}", summary.skipped);
    println!("  Unreadable:       {}", summary.failed);
    if write && !dry_run {
        println!("  Written:          {}", summary.written);
    }

    Ok(())
}

/// Report one completed lookup and write its lyrics if requested.
fn apply(entry: &Pending, write: bool, dry_run: bool, summary: &mut Summary) {
    let after = entry.track.lock().get(Field::Lyrics).map(String::from);
    let name = entry.path.display();

    let Some(lyrics) = after else {
        println!("  ✗ {}: no lyrics found", name);
        summary.not_found += 1;
        return;
    };

    if entry.before.as_deref() == Some(lyrics.as_str()) {
        println!("  = {}: lyrics already current", name);
        summary.unchanged += 1;
        return;
    }

    summary.found += 1;
    if dry_run {
        println!("  ✓ {}: lyrics found (would write {} lines)", name, lyrics.lines().count());
    } else if write {
        match metadata::write_lyrics(&entry.path, &lyrics) {
            Ok(()) => {
                println!("  ✓ {}: lyrics written", name);
                summary.written += 1;
            }
            Err(e) => {
                warn!("Failed to write lyrics to {:?}: {}", entry.path, e);
                println!("  ✗ {}: failed to write lyrics: {}", name, e);
            }
        }
    } else {
        println!("  ✓ {}: lyrics found", name);
    }
}
