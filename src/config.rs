//! Configuration records for subtitle and watermark rendering.
//!
//! The embedding layer (UI, service, test harness) resolves its widgets or
//! request payloads into these plain records and hands them to the
//! generator; the core never reads anything else. Both records deserialize
//! from YAML/JSON with sensible defaults for every omitted field.

use serde::{Deserialize, Serialize};

use crate::text::parse_hex_color;

// Default values
fn default_font_size() -> u32 {
    40
}

fn default_fill_color() -> String {
    "#FFFFFF".to_string()
}

fn default_outline_color() -> String {
    "#000000".to_string()
}

fn default_watermark_size() -> u32 {
    60
}

fn default_opacity() -> u8 {
    35
}

fn default_anchor() -> WatermarkAnchor {
    WatermarkAnchor::BottomRight
}

/// Watermark anchor on the source image: three rows by three columns.
///
/// Unrecognized keys fall back to `BottomRight`, so deserialization is
/// total over arbitrary strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum WatermarkAnchor {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl WatermarkAnchor {
    /// Resolve an anchor key, falling back to bottom-right for anything
    /// unrecognized.
    pub fn from_key(key: &str) -> Self {
        match key {
            "top-left" => Self::TopLeft,
            "top-center" => Self::TopCenter,
            "top-right" => Self::TopRight,
            "middle-left" => Self::MiddleLeft,
            "middle-center" => Self::MiddleCenter,
            "middle-right" => Self::MiddleRight,
            "bottom-left" => Self::BottomLeft,
            "bottom-center" => Self::BottomCenter,
            "bottom-right" => Self::BottomRight,
            _ => Self::BottomRight,
        }
    }

    /// The canonical kebab-case key for this anchor.
    pub fn as_key(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::MiddleLeft => "middle-left",
            Self::MiddleCenter => "middle-center",
            Self::MiddleRight => "middle-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl From<String> for WatermarkAnchor {
    fn from(key: String) -> Self {
        Self::from_key(&key)
    }
}

/// Watermark content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkKind {
    #[default]
    Text,
    Image,
}

/// Subtitle rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleConfig {
    /// Subtitle lines, top to bottom. Blank lines are ignored at render
    /// time; use [`prepare_lines`] to build this from a raw text block.
    #[serde(default)]
    pub lines: Vec<String>,

    /// Font size in pixels (default: 40)
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Glyph fill color as hex string (default: "#FFFFFF")
    #[serde(default = "default_fill_color")]
    pub fill_color: String,

    /// Glyph outline color as hex string (default: "#000000")
    #[serde(default = "default_outline_color")]
    pub outline_color: String,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            font_size: default_font_size(),
            fill_color: default_fill_color(),
            outline_color: default_outline_color(),
        }
    }
}

impl SubtitleConfig {
    /// Lines that will actually render: trimmed, blanks dropped, order
    /// preserved.
    pub fn effective_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Validate the record before rendering.
    pub fn validate(&self) -> Result<(), String> {
        if self.font_size == 0 {
            return Err("font_size must be greater than 0".to_string());
        }
        parse_hex_color(&self.fill_color)
            .map_err(|e| format!("fill_color: {}", e))?;
        parse_hex_color(&self.outline_color)
            .map_err(|e| format!("outline_color: {}", e))?;
        Ok(())
    }
}

/// Watermark configuration.
///
/// One flat record covering both content types; `text` and `fill_color`
/// matter only for `kind = text`, the session-held watermark raster only
/// for `kind = image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// Apply a watermark at all (default: false)
    #[serde(default)]
    pub enabled: bool,

    /// Content type: text or image (default: text)
    #[serde(default, rename = "type")]
    pub kind: WatermarkKind,

    /// Text content for text watermarks; empty text skips the draw
    #[serde(default)]
    pub text: String,

    /// Size parameter (default: 60). Font size in pixels for text;
    /// scale input for images (scale = size / 60 × 0.3)
    #[serde(default = "default_watermark_size")]
    pub size: u32,

    /// Opacity 0-100 (default: 35), mapped to 0.0-1.0 alpha
    #[serde(default = "default_opacity")]
    pub opacity: u8,

    /// Placement anchor (default: bottom-right)
    #[serde(default = "default_anchor")]
    pub anchor: WatermarkAnchor,

    /// Text color as hex string (default: "#FFFFFF"); text kind only
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: WatermarkKind::Text,
            text: String::new(),
            size: default_watermark_size(),
            opacity: default_opacity(),
            anchor: default_anchor(),
            fill_color: default_fill_color(),
        }
    }
}

impl WatermarkConfig {
    /// Opacity as a 0.0-1.0 alpha factor.
    pub fn alpha(&self) -> f32 {
        f32::from(self.opacity) / 100.0
    }

    /// Validate the record before rendering.
    pub fn validate(&self) -> Result<(), String> {
        if self.size == 0 {
            return Err("size must be greater than 0".to_string());
        }
        if self.opacity > 100 {
            return Err("opacity must be between 0 and 100".to_string());
        }
        if self.kind == WatermarkKind::Text {
            parse_hex_color(&self.fill_color)
                .map_err(|e| format!("fill_color: {}", e))?;
        }
        Ok(())
    }
}

/// Split a raw text block into subtitle lines: one line per newline,
/// trimmed, blanks dropped.
pub fn prepare_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}
