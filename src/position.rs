//! Watermark anchor resolution.
//!
//! Maps one of nine named anchors to a concrete placement point inside
//! the source region of the canvas (the watermark never enters the
//! subtitle block below it). The returned y coordinate always denotes
//! the bottom edge of the drawn content; the returned alignment says how
//! the content spreads around x. Both watermark kinds share this
//! resolver.

use crate::config::WatermarkAnchor;
use crate::constants::WATERMARK_PADDING;

/// Region of the canvas available for watermark placement: the source
/// image area, canvasWidth × sourceHeight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionDimensions {
    pub width: u32,
    pub height: u32,
}

/// Dimensions of the content being anchored (measured text box or scaled
/// watermark image). Only the height enters the placement math; the
/// width is absorbed by the horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentDimensions {
    pub width: u32,
    pub height: u32,
}

/// How content spreads horizontally around the anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    /// Content starts at x.
    Left,
    /// Content is centered on x.
    Center,
    /// Content ends at x.
    Right,
}

/// Resolved placement: anchor point plus derived alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorPoint {
    pub x: i32,
    /// Bottom edge of the drawn content.
    pub y: i32,
    pub align: HorizontalAlign,
}

/// Resolve a named anchor to a placement point within the region.
pub fn resolve_anchor(
    anchor: WatermarkAnchor,
    region: RegionDimensions,
    content: ContentDimensions,
) -> AnchorPoint {
    use WatermarkAnchor::*;

    let width = region.width as i32;
    let height = region.height as i32;
    let content_height = content.height as i32;

    let x = match anchor {
        TopLeft | MiddleLeft | BottomLeft => WATERMARK_PADDING,
        TopCenter | MiddleCenter | BottomCenter => width / 2,
        TopRight | MiddleRight | BottomRight => width - WATERMARK_PADDING,
    };

    let y = match anchor {
        TopLeft | TopCenter | TopRight => WATERMARK_PADDING + content_height,
        MiddleLeft | MiddleCenter | MiddleRight => height / 2,
        BottomLeft | BottomCenter | BottomRight => height - WATERMARK_PADDING,
    };

    let align = match anchor {
        TopLeft | MiddleLeft | BottomLeft => HorizontalAlign::Left,
        TopCenter | MiddleCenter | BottomCenter => HorizontalAlign::Center,
        TopRight | MiddleRight | BottomRight => HorizontalAlign::Right,
    };

    AnchorPoint { x, y, align }
}
