//! Lyrics Seeds - fetch song lyrics from the Apiseeds lyrics service.
//!
//! Lyrics are looked up per track by artist and title and written into the
//! track's metadata. Lookups for a batch of tracks share one album, which
//! tracks how many requests are still in flight. Requests to the service are
//! spaced by a process-wide rate limiter.

pub mod album;
pub mod cli;
pub mod config;
pub mod error;
pub mod lyrics;
pub mod metadata;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging (stderr, so fetched lyrics can be piped)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("lyrics_seeds=info".parse()?))
        .init();

    cli::run_command(&args)
}
