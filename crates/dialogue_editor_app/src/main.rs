// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dialogue Editor - command-line host for dialogue graphs
//!
//! Works on a project directory holding `*.dialogue.ron` assets and a
//! `dialogue_editor.ron` settings file:
//! - CSV export and import for translators
//! - Language list migration
//! - Structural validation
//! - Resaving through the live graph
//! - Terminal playback
//!
//! ## Architecture
//!
//! Graph editing and persistence live in `dialogue_editor_graph`, playback in
//! `dialogue_editor_runtime`. This binary wires both to the file system.

mod assets;
mod cli;
mod console;
mod csv_tool;
mod language_update;
mod settings;
mod validate;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let mut env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dialogue_editor=info"));
    if cli.verbose {
        if let Ok(directive) = "dialogue_editor=debug".parse::<Directive>() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Dialogue Editor v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = cli.run() {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
