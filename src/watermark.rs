//! Watermark application.
//!
//! Draws a text or image watermark over the source frame area of the
//! canvas. The watermark is confined to that area and never reaches
//! into the subtitle extension below it. Opacity is applied
//! through the canvas global alpha, which is always restored to fully
//! opaque before returning so later draws are unaffected.

use image::imageops::FilterType;
use image::RgbaImage;

use crate::canvas::Canvas;
use crate::config::{WatermarkConfig, WatermarkKind};
use crate::constants::{WATERMARK_BASE_SCALE, WATERMARK_SIZE_REFERENCE};
use crate::error::SubslateError;
use crate::position::{resolve_anchor, ContentDimensions, RegionDimensions};
use crate::text::{measure_text, parse_hex_color, render_text, TextRenderOptions};

/// Apply the configured watermark to the frame region of the canvas.
///
/// Disabled watermarks, empty text, and a missing watermark image all
/// skip drawing without error. The canvas global alpha is restored to
/// 1.0 on every path.
pub fn apply(
    canvas: &mut Canvas,
    config: &WatermarkConfig,
    image: Option<&RgbaImage>,
    region: RegionDimensions,
) -> Result<(), SubslateError> {
    if !config.enabled {
        return Ok(());
    }

    canvas.set_global_alpha(config.alpha());
    let result = match config.kind {
        WatermarkKind::Text => draw_text_watermark(canvas, config, region),
        WatermarkKind::Image => draw_image_watermark(canvas, config, image, region),
    };
    canvas.set_global_alpha(1.0);
    result
}

fn draw_text_watermark(
    canvas: &mut Canvas,
    config: &WatermarkConfig,
    region: RegionDimensions,
) -> Result<(), SubslateError> {
    let text = config.text.trim();
    if text.is_empty() {
        tracing::debug!("watermark text empty, skipping");
        return Ok(());
    }

    let fill = parse_hex_color(&config.fill_color)
        .map_err(|e| SubslateError::invalid_config(format!("watermark fill_color: {}", e)))?;

    let content = ContentDimensions {
        width: measure_text(text, config.size as f32).ceil() as u32,
        height: config.size,
    };
    let anchor = resolve_anchor(config.anchor, region, content);

    let sprite = render_text(
        text,
        &TextRenderOptions {
            font_size: config.size as f32,
            fill,
            outline: None,
        },
    );
    let x = sprite.x_for_align(anchor.x, anchor.align);
    // The anchor y is the text bottom edge.
    let y = sprite.y_for_bottom(anchor.y);
    canvas.draw_image(sprite.image(), x, y);

    tracing::debug!(x, y, anchor = config.anchor.as_key(), "drew text watermark");
    Ok(())
}

fn draw_image_watermark(
    canvas: &mut Canvas,
    config: &WatermarkConfig,
    image: Option<&RgbaImage>,
    region: RegionDimensions,
) -> Result<(), SubslateError> {
    let Some(source) = image else {
        tracing::debug!("no watermark image loaded, skipping");
        return Ok(());
    };

    let scale = config.size as f32 / WATERMARK_SIZE_REFERENCE * WATERMARK_BASE_SCALE;
    let scaled_width = ((source.width() as f32 * scale).round() as u32).max(1);
    let scaled_height = ((source.height() as f32 * scale).round() as u32).max(1);

    let content = ContentDimensions {
        width: scaled_width,
        height: scaled_height,
    };
    let anchor = resolve_anchor(config.anchor, region, content);

    // The anchor gives the image's left edge and bottom edge for every
    // column; the alignment is consumed by the text path only.
    let x = anchor.x;
    let y = anchor.y - scaled_height as i32;

    let resized = image::imageops::resize(source, scaled_width, scaled_height, FilterType::Lanczos3);
    canvas.draw_image(&resized, x, y);

    tracing::debug!(
        x,
        y,
        scaled_width,
        scaled_height,
        anchor = config.anchor.as_key(),
        "drew image watermark"
    );
    Ok(())
}
