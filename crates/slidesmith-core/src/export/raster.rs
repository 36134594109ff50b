//! Paginated-raster export.
//!
//! Each slide renders to its own off-screen target and the captures run
//! concurrently; results are assembled in deck order. The painter that
//! turns a slide variant into pixels is the view layer's concern and sits
//! behind [`RenderTarget`], so export never drives (or restores) the
//! on-screen slide selection.

use std::path::{Path, PathBuf};

use futures_util::future::try_join_all;
use thiserror::Error;
use tracing::debug;

use slidesmith_types::{Deck, Slide};

use crate::theme::ThemeTokens;

use super::pdf::{self, JpegPage};
use super::{ExportError, write_artifact};

/// JPEG quality for captured pages.
const PAGE_JPEG_QUALITY: u8 = 90;

/// A single capture failure. Fatal to the whole export.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CaptureFailed(pub String);

/// Off-screen render target for one slide at 1920 x 1080.
pub trait RenderTarget {
    fn capture(
        &self,
        slide: &Slide,
        theme: &ThemeTokens,
    ) -> impl Future<Output = Result<image::RgbImage, CaptureFailed>>;
}

/// Renders every slide and assembles the pages into a PDF, in deck order.
///
/// Captures run concurrently; any single failure aborts the export with
/// [`ExportError::Capture`] and nothing is written.
pub async fn export_deck<T: RenderTarget>(
    target: &T,
    deck: &Deck,
    theme_id: &str,
) -> Result<Vec<u8>, ExportError> {
    let theme = ThemeTokens::resolve(theme_id)?;
    if deck.is_empty() {
        return Err(ExportError::EmptyDeck);
    }

    let captures = deck.iter().enumerate().map(|(index, slide)| async move {
        let image = target
            .capture(slide, theme)
            .await
            .map_err(|e| ExportError::Capture {
                index,
                message: e.to_string(),
            })?;
        encode_page(&image)
    });
    let pages = try_join_all(captures).await?;

    debug!(pages = pages.len(), theme = theme_id, "raster export assembled");
    Ok(pdf::assemble(&pages))
}

/// [`export_deck`] plus artifact naming and the single file write.
pub async fn export_deck_to_file<T: RenderTarget>(
    target: &T,
    deck: &Deck,
    theme_id: &str,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let bytes = export_deck(target, deck, theme_id).await?;
    write_artifact(dir, "pdf", &bytes)
}

fn encode_page(image: &image::RgbImage) -> Result<JpegPage, ExportError> {
    use image::codecs::jpeg::JpegEncoder;

    let (width, height) = image.dimensions();
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, PAGE_JPEG_QUALITY);
    encoder
        .encode(image.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| ExportError::Encode {
            part: "page jpeg",
            message: e.to_string(),
        })?;

    Ok(JpegPage {
        jpeg,
        width,
        height,
    })
}
