//! Export pipeline.
//!
//! Two independently invokable exporters share the slide model, the theme
//! resolver, and the image normalizer:
//!
//! - [`pptx`]: native-document export (editable shapes/text, OPC package)
//! - [`raster`]: paginated-raster export (one fixed-size page image per
//!   slide, assembled into a PDF by [`pdf`])
//!
//! Artifacts are rendered fully in memory and written with a single
//! `fs::write`; a failing stage never leaves a partial file behind.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod pdf;
pub mod pptx;
pub mod raster;

/// Raster page geometry, fixed 16:9.
pub const PAGE_WIDTH: u32 = 1920;
pub const PAGE_HEIGHT: u32 = 1080;

/// Native-document slide geometry: 10 x 5.625 inches, in EMU.
pub const EMU_PER_INCH: i64 = 914_400;
pub const SLIDE_WIDTH_EMU: i64 = 9_144_000;
pub const SLIDE_HEIGHT_EMU: i64 = 5_143_500;

/// Export failures. Image unavailability is deliberately absent: it
/// degrades a single slide and never surfaces here.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    #[error("nothing to export: the deck is empty")]
    EmptyDeck,
    #[error("capture failed for slide {index}: {message}")]
    Capture { index: usize, message: String },
    #[error("failed to encode {part}: {message}")]
    Encode { part: &'static str, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Artifact filename: `SlideSmith_Presentation_<millis>.<ext>`.
pub fn artifact_filename(ext: &str) -> String {
    format!(
        "SlideSmith_Presentation_{}.{ext}",
        chrono::Utc::now().timestamp_millis()
    )
}

/// Writes a finished artifact into `dir` and returns its path. The single
/// write keeps export all-or-nothing at the file level.
pub fn write_artifact(dir: &Path, ext: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    let path = dir.join(artifact_filename(ext));
    std::fs::write(&path, bytes)?;
    Ok(path)
}
