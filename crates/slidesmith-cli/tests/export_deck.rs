use std::fs;
use std::io::Cursor;

use assert_cmd::cargo::cargo_bin_cmd;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use predicates::prelude::*;

fn write_deck(dir: &std::path::Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("deck.json");
    fs::write(&path, json).unwrap();
    path
}

fn inline_png() -> String {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 100, 50]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    format!("data:image/png;base64,{}", BASE64.encode(buf.into_inner()))
}

#[test]
fn test_export_writes_pptx_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let deck = write_deck(
        dir.path(),
        r#"[
            {"type": "title", "title": "Q3", "subtitle": "Results"},
            {"type": "bullet", "title": "Wins", "items": ["A", "B"]}
        ]"#,
    );

    cargo_bin_cmd!("slidesmith")
        .args(["export", deck.to_str().unwrap()])
        .args(["--out", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 slide(s)"));

    let artifact = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| p.extension().is_some_and(|e| e == "pptx"))
        .expect("a .pptx artifact");
    let name = artifact.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("SlideSmith_Presentation_"));

    let mut archive = zip::ZipArchive::new(Cursor::new(fs::read(&artifact).unwrap())).unwrap();
    assert!(archive.by_name("ppt/slides/slide1.xml").is_ok());
    assert!(archive.by_name("ppt/slides/slide2.xml").is_ok());
}

#[test]
fn test_export_embeds_inline_images_offline() {
    let dir = tempfile::tempdir().unwrap();
    let deck = write_deck(
        dir.path(),
        &format!(
            r#"[{{"type": "split", "title": "Chart", "imageUrl": "{}"}}]"#,
            inline_png()
        ),
    );

    cargo_bin_cmd!("slidesmith")
        .args(["export", deck.to_str().unwrap()])
        .args(["--out", dir.path().to_str().unwrap(), "--theme", "cyber"])
        .assert()
        .success();

    let artifact = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| p.extension().is_some_and(|e| e == "pptx"))
        .expect("a .pptx artifact");
    let mut archive = zip::ZipArchive::new(Cursor::new(fs::read(&artifact).unwrap())).unwrap();
    assert!(archive.by_name("ppt/media/image1.jpeg").is_ok());
}

#[test]
fn test_export_rejects_unknown_theme() {
    let dir = tempfile::tempdir().unwrap();
    let deck = write_deck(dir.path(), r#"[{"type": "quote", "quote": "Ship it"}]"#);

    cargo_bin_cmd!("slidesmith")
        .args(["export", deck.to_str().unwrap()])
        .args(["--out", dir.path().to_str().unwrap(), "--theme", "vaporwave"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown theme"));
}

#[test]
fn test_export_rejects_malformed_deck() {
    let dir = tempfile::tempdir().unwrap();
    let deck = write_deck(dir.path(), r#"[{"type": "hologram", "title": "?"}]"#);

    cargo_bin_cmd!("slidesmith")
        .args(["export", deck.to_str().unwrap()])
        .args(["--out", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse deck JSON"));
}
