//! Export command handler.

use std::path::Path;

use anyhow::{Context, Result};

use slidesmith_core::config::Config;
use slidesmith_core::export::pptx;
use slidesmith_types::Deck;

pub async fn run(
    deck_path: &Path,
    theme_override: Option<&str>,
    out_override: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let raw = std::fs::read_to_string(deck_path)
        .with_context(|| format!("read deck from {}", deck_path.display()))?;
    let deck: Deck = serde_json::from_str(&raw)
        .with_context(|| format!("parse deck JSON from {}", deck_path.display()))?;

    let theme = theme_override.unwrap_or(&config.theme);
    let dir = out_override.unwrap_or(&config.export_dir);

    let client = reqwest::Client::new();
    let path = pptx::export_deck_to_file(&client, &deck, theme, dir)
        .await
        .context("export deck")?;

    println!(
        "Exported {} slide(s) to {}",
        deck.len(),
        path.display()
    );
    Ok(())
}
