//! Command-line interface for lyrics-seeds.
//!
//! This module provides CLI commands for managing the Apiseeds API key,
//! fetching lyrics for a single track and enriching audio files in bulk.

mod commands;

pub use commands::{Cli, Commands, ConfigAction, run_command};
