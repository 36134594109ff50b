//! Native-document (PPTX) export.
//!
//! Builds an OPC package with one editable slide part per deck slide.
//! Layout is a fixed coordinate table per variant on a 10 x 5.625 inch
//! canvas. Remote images are normalized concurrently and each failure
//! degrades only its own slide.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use futures_util::future::join_all;
use tracing::debug;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use slidesmith_types::{Deck, Slide};

use crate::images::{self, NormalizedImage};
use crate::theme::ThemeTokens;

use super::{EMU_PER_INCH, ExportError, SLIDE_HEIGHT_EMU, SLIDE_WIDTH_EMU, write_artifact};

/// Exports a deck to PPTX bytes.
///
/// The theme resolves before any network work so an unknown id fails
/// fast. Image normalization fans out across slides unordered; the
/// package build itself is deterministic in deck order.
pub async fn export_deck(
    client: &reqwest::Client,
    deck: &Deck,
    theme_id: &str,
) -> Result<Vec<u8>, ExportError> {
    let theme = ThemeTokens::resolve(theme_id)?;
    let assets = join_all(deck.iter().map(|slide| slide_assets(client, slide))).await;
    let bytes = build_package(deck, &assets, theme)?;
    debug!(slides = deck.len(), theme = theme_id, "native export assembled");
    Ok(bytes)
}

/// [`export_deck`] plus artifact naming and the single file write.
pub async fn export_deck_to_file(
    client: &reqwest::Client,
    deck: &Deck,
    theme_id: &str,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let bytes = export_deck(client, deck, theme_id).await?;
    write_artifact(dir, "pptx", &bytes)
}

/// Normalized images for one slide. `None` means unavailable: the field
/// is omitted from the output, never an error.
#[derive(Debug, Default)]
struct SlideAssets {
    background: Option<NormalizedImage>,
    image: Option<NormalizedImage>,
}

async fn slide_assets(client: &reqwest::Client, slide: &Slide) -> SlideAssets {
    let source = match slide {
        Slide::Title {
            background_image: Some(source),
            ..
        } => Some((source, true)),
        Slide::Split {
            image_url: Some(source),
            ..
        } => Some((source, false)),
        _ => None,
    };
    let Some((source, is_background)) = source else {
        return SlideAssets::default();
    };

    match images::normalize(client, source).await {
        Ok(normalized) if is_background => SlideAssets {
            background: Some(normalized),
            image: None,
        },
        Ok(normalized) => SlideAssets {
            background: None,
            image: Some(normalized),
        },
        Err(unavailable) => {
            debug!(source, %unavailable, "image omitted from export");
            SlideAssets::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Package assembly
// ---------------------------------------------------------------------------

fn build_package(
    deck: &Deck,
    assets: &[SlideAssets],
    theme: &ThemeTokens,
) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let n = deck.len();

    part(&mut zip, "[Content_Types].xml", content_types(n).as_bytes())?;
    part(&mut zip, "_rels/.rels", ROOT_RELS.as_bytes())?;
    part(&mut zip, "docProps/core.xml", CORE_PROPS.as_bytes())?;
    part(&mut zip, "docProps/app.xml", APP_PROPS.as_bytes())?;
    part(&mut zip, "ppt/presentation.xml", presentation(n).as_bytes())?;
    part(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        presentation_rels(n).as_bytes(),
    )?;
    part(&mut zip, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER.as_bytes())?;
    part(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        SLIDE_MASTER_RELS.as_bytes(),
    )?;
    part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT.as_bytes())?;
    part(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        SLIDE_LAYOUT_RELS.as_bytes(),
    )?;
    part(&mut zip, "ppt/theme/theme1.xml", theme_part(theme).as_bytes())?;

    let mut media_seq = 0usize;
    for (i, (slide, slide_assets)) in deck.iter().zip(assets).enumerate() {
        let built = build_slide(slide, slide_assets, theme, &mut media_seq);
        part(
            &mut zip,
            &format!("ppt/slides/slide{}.xml", i + 1),
            built.xml.as_bytes(),
        )?;
        part(
            &mut zip,
            &format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
            built.rels.as_bytes(),
        )?;
        for media in built.media {
            part(
                &mut zip,
                &format!("ppt/media/{}", media.filename),
                &media.jpeg,
            )?;
        }
    }

    let cursor = zip.finish().map_err(package_err)?;
    Ok(cursor.into_inner())
}

fn part(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    body: &[u8],
) -> Result<(), ExportError> {
    zip.start_file(name, SimpleFileOptions::default())
        .map_err(package_err)?;
    zip.write_all(body)?;
    Ok(())
}

fn package_err(e: zip::result::ZipError) -> ExportError {
    ExportError::Encode {
        part: "package",
        message: e.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Slide XML
// ---------------------------------------------------------------------------

const XMLNS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

struct MediaPart {
    filename: String,
    rel_id: String,
    jpeg: Vec<u8>,
}

struct BuiltSlide {
    xml: String,
    rels: String,
    media: Vec<MediaPart>,
}

#[derive(Clone, Copy, PartialEq)]
enum Align {
    Left,
    Center,
    Right,
}

/// One text box in the fixed layout table. Geometry in inches, font size
/// in points.
struct TextBox<'a> {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    size: u32,
    bold: bool,
    italic: bool,
    color: String,
    font: &'a str,
    align: Align,
    middle: bool,
    bullets: bool,
}

impl<'a> TextBox<'a> {
    fn new(theme: &'a ThemeTokens, x: f64, y: f64, w: f64, h: f64, size: u32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            size,
            bold: false,
            italic: false,
            color: theme.text.hex(),
            font: theme.font_face,
            align: Align::Left,
            middle: false,
            bullets: false,
        }
    }
}

fn build_slide(
    slide: &Slide,
    assets: &SlideAssets,
    theme: &ThemeTokens,
    media_seq: &mut usize,
) -> BuiltSlide {
    let mut shapes = String::new();
    let mut media: Vec<MediaPart> = Vec::new();
    let mut next_rel = 2; // rId1 is the slide layout
    let mut next_shape = 2; // id 1 is the group shape

    let mut background = format!(
        r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
        theme.background.hex()
    );

    match slide {
        Slide::Title {
            title,
            subtitle,
            background_image: _,
        } => {
            let has_bg = if let Some(image) = &assets.background {
                *media_seq += 1;
                let rel_id = format!("rId{next_rel}");
                next_rel += 1;
                background = format!(
                    r#"<p:bg><p:bgPr><a:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></a:blipFill><a:effectLst/></p:bgPr></p:bg>"#
                );
                media.push(MediaPart {
                    filename: format!("image{media_seq}.jpeg"),
                    rel_id,
                    jpeg: image.jpeg.clone(),
                });
                true
            } else {
                false
            };

            let mut title_box = TextBox::new(theme, 1.0, 2.5, 8.0, 1.5, 48);
            title_box.bold = true;
            title_box.align = Align::Center;
            title_box.middle = true;
            // Heading color washes out over a photo background.
            title_box.color = if has_bg {
                "FFFFFF".to_string()
            } else {
                theme.heading.hex()
            };
            push_box(&mut shapes, &mut next_shape, &[title.as_str()], &title_box);

            if let Some(subtitle) = subtitle {
                let mut sub = TextBox::new(theme, 1.0, 4.2, 8.0, 0.8, 24);
                sub.color = theme.accent.hex();
                sub.align = Align::Center;
                sub.middle = true;
                push_box(&mut shapes, &mut next_shape, &[subtitle.as_str()], &sub);
            }
        }

        Slide::Bullet { title, items } => {
            let mut heading = TextBox::new(theme, 0.5, 0.5, 9.0, 1.0, 36);
            heading.bold = true;
            heading.color = theme.heading.hex();
            push_box(&mut shapes, &mut next_shape, &[title.as_str()], &heading);

            if !items.is_empty() {
                let mut list = TextBox::new(theme, 0.8, 1.8, 8.4, 4.0, 20);
                list.bullets = true;
                let lines: Vec<&str> = items.iter().map(String::as_str).collect();
                push_box(&mut shapes, &mut next_shape, &lines, &list);
            }
        }

        Slide::Split {
            title,
            text,
            image_url: _,
        } => {
            let mut heading = TextBox::new(theme, 0.5, 0.5, 9.0, 1.0, 36);
            heading.bold = true;
            heading.color = theme.heading.hex();
            push_box(&mut shapes, &mut next_shape, &[title.as_str()], &heading);

            if let Some(text) = text {
                let body = TextBox::new(theme, 0.5, 1.8, 4.5, 4.0, 18);
                push_box(&mut shapes, &mut next_shape, &[text.as_str()], &body);
            }

            if let Some(image) = &assets.image {
                *media_seq += 1;
                let rel_id = format!("rId{next_rel}");
                next_rel += 1;
                shapes.push_str(&picture(
                    next_shape,
                    &rel_id,
                    contain_fit(image.width, image.height, 5.2, 1.5, 4.3, 4.0),
                ));
                next_shape += 1;
                media.push(MediaPart {
                    filename: format!("image{media_seq}.jpeg"),
                    rel_id,
                    jpeg: image.jpeg.clone(),
                });
            } else {
                let mut placeholder = TextBox::new(theme, 5.2, 1.5, 4.3, 4.0, 24);
                placeholder.color = theme.accent.hex();
                placeholder.align = Align::Center;
                placeholder.middle = true;
                push_box(&mut shapes, &mut next_shape, &["Visual Content"], &placeholder);
            }
        }

        Slide::Bigdata {
            number,
            caption,
            title,
        } => {
            if let Some(title) = title {
                let mut heading = TextBox::new(theme, 0.5, 0.5, 9.0, 1.0, 36);
                heading.bold = true;
                heading.color = theme.heading.hex();
                heading.align = Align::Center;
                push_box(&mut shapes, &mut next_shape, &[title.as_str()], &heading);
            }

            let mut figure = TextBox::new(theme, 1.0, 2.0, 8.0, 2.0, 96);
            figure.bold = true;
            figure.color = theme.accent.hex();
            figure.align = Align::Center;
            figure.middle = true;
            push_box(&mut shapes, &mut next_shape, &[number.to_string().as_str()], &figure);

            if let Some(caption) = caption {
                let mut cap = TextBox::new(theme, 1.0, 4.5, 8.0, 1.0, 28);
                cap.align = Align::Center;
                cap.middle = true;
                push_box(&mut shapes, &mut next_shape, &[caption.as_str()], &cap);
            }
        }

        Slide::Quote { quote, author } => {
            let mut body = TextBox::new(theme, 1.0, 2.0, 8.0, 2.5, 32);
            body.italic = true;
            body.color = theme.heading.hex();
            body.align = Align::Center;
            body.middle = true;
            push_box(&mut shapes, &mut next_shape, &[format!("\"{quote}\"").as_str()], &body);

            if let Some(author) = author {
                let mut by = TextBox::new(theme, 1.0, 4.8, 8.0, 0.7, 28);
                by.color = theme.accent.hex();
                by.align = Align::Right;
                by.middle = true;
                push_box(&mut shapes, &mut next_shape, &[format!("\u{2014} {author}").as_str()], &by);
            }
        }
    }

    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {XMLNS}><p:cSld>{background}<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    );

    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#,
    );
    for part in &media {
        rels.push_str(&format!(
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/{}"/>"#,
            part.rel_id, part.filename
        ));
    }
    rels.push_str("</Relationships>");

    BuiltSlide { xml, rels, media }
}

fn push_box(shapes: &mut String, next_shape: &mut usize, lines: &[&str], tb: &TextBox) {
    shapes.push_str(&text_box(*next_shape, lines, tb));
    *next_shape += 1;
}

fn text_box(id: usize, lines: &[&str], tb: &TextBox) -> String {
    let anchor = if tb.middle { "ctr" } else { "t" };
    let algn = match tb.align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    };
    let bold = i32::from(tb.bold);
    let italic = i32::from(tb.italic);

    let mut paragraphs = String::new();
    for line in lines {
        let bullet = if tb.bullets {
            r#"<a:buChar char="&#8226;"/>"#
        } else {
            "<a:buNone/>"
        };
        paragraphs.push_str(&format!(
            r#"<a:p><a:pPr algn="{algn}">{bullet}</a:pPr><a:r><a:rPr lang="en-US" sz="{sz}" b="{bold}" i="{italic}" dirty="0"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill><a:latin typeface="{font}"/></a:rPr><a:t>{text}</a:t></a:r></a:p>"#,
            sz = tb.size * 100,
            color = tb.color,
            font = esc(tb.font),
            text = esc(line),
        ));
    }

    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr wrap="square" anchor="{anchor}"/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
        x = emu(tb.x),
        y = emu(tb.y),
        cx = emu(tb.w),
        cy = emu(tb.h),
    )
}

fn picture(id: usize, rel_id: &str, frame: (i64, i64, i64, i64)) -> String {
    let (x, y, cx, cy) = frame;
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Image {id}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
    )
}

/// Contain-fits an image into a box (inches), centered, returning an EMU
/// frame.
fn contain_fit(px_w: u32, px_h: u32, box_x: f64, box_y: f64, box_w: f64, box_h: f64) -> (i64, i64, i64, i64) {
    let aspect = f64::from(px_w.max(1)) / f64::from(px_h.max(1));
    let (w, h) = if box_w / box_h > aspect {
        (box_h * aspect, box_h)
    } else {
        (box_w, box_w / aspect)
    };
    let x = box_x + (box_w - w) / 2.0;
    let y = box_y + (box_h - h) / 2.0;
    (emu(x), emu(y), emu(w), emu(h))
}

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH as f64).round() as i64
}

fn esc(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

// ---------------------------------------------------------------------------
// Fixed package parts
// ---------------------------------------------------------------------------

fn content_types(slide_count: usize) -> String {
    let mut overrides = String::new();
    for i in 1..=slide_count {
        overrides.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="jpeg" ContentType="image/jpeg"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>{overrides}</Types>"#
    )
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

const CORE_PROPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>AI Generated Presentation</dc:title><dc:creator>SlideSmith AI</dc:creator><dc:subject>Generated by SlideSmith AI</dc:subject></cp:coreProperties>"#;

const APP_PROPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>SlideSmith</Application></Properties>"#;

fn presentation(slide_count: usize) -> String {
    let mut slide_ids = String::new();
    for i in 0..slide_count {
        slide_ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + i,
            2 + i
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {XMLNS}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="{SLIDE_WIDTH_EMU}" cy="{SLIDE_HEIGHT_EMU}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
    )
}

fn presentation_rels(slide_count: usize) -> String {
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#,
    );
    for i in 0..slide_count {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            2 + i,
            i + 1
        ));
    }
    rels.push_str("</Relationships>");
    rels
}

const EMPTY_SP_TREE: &str = r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree>"#;

const SLIDE_MASTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="FFFFFF"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#;

const SLIDE_MASTER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/></Relationships>"#;

const SLIDE_LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const SLIDE_LAYOUT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#;

/// Theme part carrying the resolved token colors so downstream edits in
/// an office suite inherit something sensible.
fn theme_part(theme: &ThemeTokens) -> String {
    let heading = theme.heading.hex();
    let text = theme.text.hex();
    let background = theme.background.hex();
    let accent = theme.accent.hex();
    let font = esc(theme.font_face);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="SlideSmith"><a:themeElements><a:clrScheme name="SlideSmith"><a:dk1><a:srgbClr val="{heading}"/></a:dk1><a:lt1><a:srgbClr val="{background}"/></a:lt1><a:dk2><a:srgbClr val="{text}"/></a:dk2><a:lt2><a:srgbClr val="{background}"/></a:lt2><a:accent1><a:srgbClr val="{accent}"/></a:accent1><a:accent2><a:srgbClr val="{accent}"/></a:accent2><a:accent3><a:srgbClr val="{accent}"/></a:accent3><a:accent4><a:srgbClr val="{accent}"/></a:accent4><a:accent5><a:srgbClr val="{accent}"/></a:accent5><a:accent6><a:srgbClr val="{accent}"/></a:accent6><a:hlink><a:srgbClr val="{accent}"/></a:hlink><a:folHlink><a:srgbClr val="{accent}"/></a:folHlink></a:clrScheme><a:fontScheme name="SlideSmith"><a:majorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#
    )
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use slidesmith_types::BigLabel;

    use super::*;

    fn read_zip(bytes: &[u8]) -> zip::ZipArchive<Cursor<Vec<u8>>> {
        zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap()
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = read_zip(bytes);
        let mut file = archive.by_name(name).unwrap();
        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();
        contents
    }

    fn sample_deck() -> Deck {
        vec![
            Slide::Title {
                title: "Q3".into(),
                subtitle: Some("Results".into()),
                background_image: None,
            },
            Slide::Bullet {
                title: "Wins".into(),
                items: vec!["A".into(), "B".into()],
            },
        ]
    }

    fn inline_png() -> String {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([10, 20, 30]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        format!(
            "data:image/png;base64,{}",
            BASE64.encode(buf.into_inner())
        )
    }

    #[tokio::test]
    async fn worked_example_produces_two_slide_parts() {
        let client = reqwest::Client::new();
        let bytes = export_deck(&client, &sample_deck(), "corporate")
            .await
            .unwrap();

        let archive = read_zip(&bytes);
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.contains(&"ppt/slides/slide1.xml"));
        assert!(names.contains(&"ppt/slides/slide2.xml"));
        assert!(!names.contains(&"ppt/slides/slide3.xml"));

        let slide1 = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide1.contains("<a:t>Q3</a:t>"));
        assert!(slide1.contains("<a:t>Results</a:t>"));
        assert!(slide1.contains(r#"algn="ctr""#));

        let slide2 = read_part(&bytes, "ppt/slides/slide2.xml");
        assert!(slide2.contains("<a:t>Wins</a:t>"));
        assert!(slide2.contains("<a:t>A</a:t>"));
        assert!(slide2.contains("<a:t>B</a:t>"));
        assert!(slide2.contains("buChar"));
    }

    #[tokio::test]
    async fn unknown_theme_fails_fast() {
        let client = reqwest::Client::new();
        let err = export_deck(&client, &sample_deck(), "brutalist")
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::UnknownTheme(_)));
    }

    #[tokio::test]
    async fn failed_image_degrades_to_placeholder_not_error() {
        let client = reqwest::Client::new();
        let deck = vec![Slide::Split {
            title: "Chart".into(),
            text: Some("body".into()),
            image_url: Some("http://127.0.0.1:1/missing.png".into()),
        }];

        let bytes = export_deck(&client, &deck, "cyber").await.unwrap();

        let archive = read_zip(&bytes);
        assert!(!archive.file_names().any(|n| n.starts_with("ppt/media/")));
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains("<a:t>Visual Content</a:t>"));
    }

    #[tokio::test]
    async fn inline_image_is_embedded_and_related() {
        let client = reqwest::Client::new();
        let deck = vec![Slide::Split {
            title: "Chart".into(),
            text: None,
            image_url: Some(inline_png()),
        }];

        let bytes = export_deck(&client, &deck, "corporate").await.unwrap();

        let archive = read_zip(&bytes);
        assert!(archive.file_names().any(|n| n == "ppt/media/image1.jpeg"));
        let rels = read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        assert!(rels.contains("../media/image1.jpeg"));
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains(r#"r:embed="rId2""#));
    }

    #[tokio::test]
    async fn background_image_fills_the_title_slide() {
        let client = reqwest::Client::new();
        let deck = vec![Slide::Title {
            title: "Launch".into(),
            subtitle: None,
            background_image: Some(inline_png()),
        }];

        let bytes = export_deck(&client, &deck, "corporate").await.unwrap();

        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains("<a:blipFill>"));
        // Title renders white over the photo.
        assert!(slide.contains(r#"val="FFFFFF""#));
    }

    #[tokio::test]
    async fn text_is_xml_escaped() {
        let client = reqwest::Client::new();
        let deck = vec![Slide::Bigdata {
            number: BigLabel::Text("<3 & counting".into()),
            caption: None,
            title: None,
        }];

        let bytes = export_deck(&client, &deck, "editorial").await.unwrap();

        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains("&lt;3 &amp; counting"));
    }

    #[tokio::test]
    async fn empty_deck_still_builds_a_valid_package() {
        let client = reqwest::Client::new();
        let bytes = export_deck(&client, &Deck::new(), "corporate")
            .await
            .unwrap();
        let archive = read_zip(&bytes);
        assert!(archive.file_names().any(|n| n == "ppt/presentation.xml"));
        assert!(!archive.file_names().any(|n| n.starts_with("ppt/slides/")));
    }

    #[test]
    fn contain_fit_letterboxes_wide_images() {
        // 2:1 image in a 4.3 x 4.0 box pins to the box width.
        let (_, _, cx, cy) = contain_fit(200, 100, 5.2, 1.5, 4.3, 4.0);
        assert_eq!(cx, emu(4.3));
        assert_eq!(cy, emu(2.15));

        // 1:2 image pins to the box height.
        let (_, _, cx, cy) = contain_fit(100, 200, 5.2, 1.5, 4.3, 4.0);
        assert_eq!(cy, emu(4.0));
        assert_eq!(cx, emu(2.0));
    }
}
