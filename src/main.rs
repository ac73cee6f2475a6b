//! Notedown - live markdown preview and background autosave for note files.
//!
//! # Usage
//!
//! ```bash
//! notedown note.md
//! notedown --watch note.md
//! notedown --watch --save-url http://localhost:5000/notes/3/edit note.md
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use notedown::app::App;
use notedown::autosave::{Autosaver, DEFAULT_QUIET_INTERVAL};
use notedown::config::{
    clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags, ConfigFlags,
};

/// Live markdown preview and background autosave for note files
#[derive(Parser, Debug)]
#[command(name = "notedown", version, about, long_about = None)]
struct Cli {
    /// Markdown note file to preview
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Watch the file for edits and re-render on change
    #[arg(short, long)]
    watch: bool,

    /// Endpoint for background saves (form-encoded POST)
    #[arg(long, value_name = "URL")]
    save_url: Option<String>,

    /// Note title sent with each save (defaults to the file stem)
    #[arg(long)]
    title: Option<String>,

    /// Quiet interval in milliseconds before an autosave fires
    #[arg(long, value_name = "MS")]
    quiet_ms: Option<u64>,

    /// Write rendered markup to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Disable background saves even when a save URL is configured
    #[arg(long)]
    no_autosave: bool,

    /// Save current command-line flags as defaults in .notedownrc
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in .notedownrc
    #[arg(long)]
    clear: bool,
}

fn build_autosaver(effective: &ConfigFlags, file: &std::path::Path) -> Option<Autosaver> {
    if effective.no_autosave {
        return None;
    }
    let url = effective.save_url.as_ref()?;
    let title = effective.title.clone().unwrap_or_else(|| {
        file.file_stem()
            .map_or_else(|| "note".to_string(), |stem| stem.to_string_lossy().into_owned())
    });
    let quiet_interval = effective
        .quiet_ms
        .map_or(DEFAULT_QUIET_INTERVAL, Duration::from_millis);
    Some(Autosaver::new(url.clone(), title, quiet_interval))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    // Verify file exists
    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }

    let autosaver = build_autosaver(&effective, &cli.file);

    let mut app = App::new(cli.file)
        .with_watch(effective.watch)
        .with_out(effective.out.clone())
        .with_autosaver(autosaver);

    app.run().await.context("Application error")
}
