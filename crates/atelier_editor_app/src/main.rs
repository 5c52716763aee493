// SPDX-License-Identifier: MIT OR Apache-2.0
//! Atelier Editor - headless scene preview
//!
//! Loads editor settings and an optional scene document, then plays the
//! document's animation (or its active camera path) at the configured
//! frame rate and logs the evaluated poses.
//!
//! Run `atelier_editor --help` for the command line options.

use atelier_editor_app::{demo_document, run_preview, EditorDocument, EditorSettings, SceneDocument};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default preview length in seconds
const DEFAULT_SECONDS: f32 = 5.0;

/// Headless preview of an Atelier scene document
#[derive(Debug, Parser)]
#[command(name = "atelier_editor", version, about)]
struct Args {
    /// Scene document to load (JSON, RON or binary); the demo scene when omitted
    document: Option<PathBuf>,

    /// Editor settings file
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Preview length in seconds
    #[arg(long, value_name = "N", default_value_t = DEFAULT_SECONDS)]
    seconds: f32,

    /// Write the document here after the preview
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(|| PathBuf::from(atelier_editor_app::SETTINGS_FILE_NAME));
    let settings = EditorSettings::load_or_default(&settings_path);

    let default_filter = settings
        .as_ref()
        .map(|s| s.log_filter.clone())
        .unwrap_or_else(|_| EditorSettings::default().log_filter);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Atelier Editor v{}", env!("CARGO_PKG_VERSION"));

    let settings = settings.unwrap_or_else(|e| {
        tracing::error!("Failed to load settings from {}: {e}", settings_path.display());
        EditorSettings::default()
    });

    let mut document = match &args.document {
        Some(path) => match SceneDocument::load(path) {
            Ok(loaded) => {
                let mut document = EditorDocument::with_settings(&settings);
                document.import_document(loaded);
                document
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => {
            tracing::info!("No document given, using the demo scene");
            demo_document(&settings)
        }
    };

    match run_preview(&mut document, &settings, args.seconds) {
        Some(summary) => tracing::info!(
            "Preview done: {:?}, {} frames, camera moved on {}",
            summary.mode,
            summary.frames,
            summary.camera_frames
        ),
        None => tracing::warn!("Nothing to preview: no animation tracks and no playable camera path"),
    }

    if let Some(path) = &args.save {
        if let Err(e) = document.export_document().save(path) {
            tracing::error!("Failed to save {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}
