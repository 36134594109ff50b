//! Slide document model.
//!
//! A deck is an ordered sequence of tagged slide variants. The JSON shape
//! mirrors the generation protocol: each slide object carries a `type`
//! discriminator and camelCase field names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One presentation, in presentation order. An empty deck is the valid
/// initial state.
pub type Deck = Vec<Slide>;

/// A single slide. Exactly one variant per slide; an unknown `type` tag
/// fails deserialization rather than being coerced into some default shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Slide {
    /// Opening slide: large centered title, optional subtitle, optional
    /// full-bleed background image (URL or inline data URL).
    Title {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
        #[serde(
            rename = "backgroundImage",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        background_image: Option<String>,
    },

    /// Heading plus an ordered list of bullet items.
    Bullet { title: String, items: Vec<String> },

    /// Heading with a left text column and a right image (or placeholder).
    Split {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
    },

    /// One oversized statistic with optional heading and caption.
    Bigdata {
        number: BigLabel,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },

    /// Centered quotation with optional attribution.
    Quote {
        quote: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        author: Option<String>,
    },
}

impl Slide {
    /// The wire discriminator for this variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Slide::Title { .. } => "title",
            Slide::Bullet { .. } => "bullet",
            Slide::Split { .. } => "split",
            Slide::Bigdata { .. } => "bigdata",
            Slide::Quote { .. } => "quote",
        }
    }
}

/// The big-number label on a `bigdata` slide. The generator emits either a
/// JSON string ("87%") or a bare number (42), so both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BigLabel {
    Text(String),
    Number(f64),
}

impl fmt::Display for BigLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BigLabel::Text(s) => f.write_str(s),
            BigLabel::Number(n) => {
                // Integral values print without a trailing ".0".
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
        }
    }
}
