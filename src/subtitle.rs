//! Subtitle row compositing.
//!
//! Fills the extension area below the source frame with one row per
//! subtitle line. Every row (and every gap between rows) is cropped from
//! the same fixed strip at the bottom of the source frame, so the
//! extension reads as a continuation of the frame rather than a scroll:
//! each caption appears over an identical background. Rows get a
//! translucent black mask to keep the text legible; gaps stay unmasked.

use image::{Rgba, RgbaImage};

use crate::canvas::Canvas;
use crate::config::SubtitleConfig;
use crate::constants::ROW_MASK_ALPHA;
use crate::error::SubslateError;
use crate::layout::RowLayout;
use crate::position::HorizontalAlign;
use crate::text::{parse_hex_color, render_text, TextRenderOptions};

/// Draw the subtitle rows and gap strips onto the canvas.
///
/// `lines` must match the line count the layout was computed for. With no
/// lines this is a no-op and the canvas keeps the bare source frame.
pub fn render_rows(
    canvas: &mut Canvas,
    source: &RgbaImage,
    layout: &RowLayout,
    lines: &[&str],
    config: &SubtitleConfig,
) -> Result<(), SubslateError> {
    if !layout.has_rows() {
        return Ok(());
    }

    let fill = parse_hex_color(&config.fill_color)
        .map_err(|e| SubslateError::invalid_config(format!("fill_color: {}", e)))?;
    let outline = parse_hex_color(&config.outline_color)
        .map_err(|e| SubslateError::invalid_config(format!("outline_color: {}", e)))?;

    let width = source.width();
    let strip_height = layout.row_height_px();
    let template_y = layout.template_y_px();
    let mask = Rgba([0, 0, 0, (ROW_MASK_ALPHA * 255.0).round() as u8]);

    let options = TextRenderOptions {
        font_size: config.font_size as f32,
        fill,
        outline: Some(outline),
    };

    for (i, line) in lines.iter().enumerate() {
        let row_y = layout.row_y_px(i);

        // Background: the shared template strip, then the legibility mask.
        canvas.draw_image_region(source, 0, template_y, width, strip_height, 0, row_y);
        canvas.fill_rect(0, row_y, width, strip_height, mask);

        let sprite = render_text(line, &options);
        let x = sprite.x_for_align(width as i32 / 2, HorizontalAlign::Center);
        let y = sprite.y_for_center(row_y + strip_height as i32 / 2);
        canvas.draw_image(sprite.image(), x, y);

        tracing::debug!(row = i, y = row_y, text_len = line.len(), "rendered subtitle row");
    }

    // Gap strips between consecutive rows reuse the same template crop,
    // without a mask.
    for i in 0..lines.len().saturating_sub(1) {
        let gap_y = layout.gap_y_px(i);
        canvas.draw_image_region(source, 0, template_y, width, layout.gap_px(), 0, gap_y);
    }

    Ok(())
}
