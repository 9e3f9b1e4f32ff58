//! Display-ready vibe records
//!
//! These types are shared between the Gemini client, the session state
//! machine, and whatever front-end renders the result card.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

/// Prefix every generated image URL carries.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Title, description and palette produced by the text model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibeMetadata {
    pub title: String,
    pub description: String,
    pub palette: Vec<String>,
}

impl VibeMetadata {
    /// Strict palette check: exactly five `#RRGGBB` colors.
    pub fn has_strict_palette(&self) -> bool {
        self.palette.len() == 5
            && self
                .palette
                .iter()
                .all(|c| c.len() == 7 && parse_hex_color(c).is_some())
    }
}

/// Final record: the metadata plus the generated image as a data URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VibeResult {
    pub title: String,
    pub description: String,
    pub palette: Vec<String>,
    pub image_url: String,
}

impl VibeResult {
    pub fn new(metadata: VibeMetadata, image_url: String) -> Self {
        Self {
            title: metadata.title,
            description: metadata.description,
            palette: metadata.palette,
            image_url,
        }
    }

    /// Decode the base64 payload of `image_url`.
    ///
    /// Returns `None` when the URL is not a base64 data URI or the payload
    /// does not decode.
    pub fn image_bytes(&self) -> Option<Vec<u8>> {
        let (header, payload) = self.image_url.split_once(',')?;
        if !header.starts_with("data:") || !header.ends_with(";base64") {
            return None;
        }
        BASE64.decode(payload.trim().as_bytes()).ok()
    }
}

/// An sRGB color parsed from a palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Parse `#RRGGBB` or `#RGB` (leading `#` optional, surrounding whitespace
/// ignored). Anything else yields `None`.
pub fn parse_hex_color(s: &str) -> Option<Rgb> {
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        6 => Some(Rgb {
            r: u8::from_str_radix(&hex[0..2], 16).ok()?,
            g: u8::from_str_radix(&hex[2..4], 16).ok()?,
            b: u8::from_str_radix(&hex[4..6], 16).ok()?,
        }),
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some(Rgb {
                r: digit(0)?,
                g: digit(1)?,
                b: digit(2)?,
            })
        }
        _ => None,
    }
}
