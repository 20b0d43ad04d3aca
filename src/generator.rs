//! Composition pipeline.
//!
//! Orchestrates one generation pass: size the canvas from the subtitle
//! layout, paint the source frame, fill the extension with subtitle
//! rows, stamp the watermark, and encode the result. Every pass starts
//! from a fresh canvas, so generating twice with the same inputs yields
//! identical bytes.

use image::RgbaImage;

use crate::canvas::Canvas;
use crate::config::{SubtitleConfig, WatermarkConfig};
use crate::encoder::{self, RenderedOutput, SourceFormat};
use crate::error::SubslateError;
use crate::layout::RowLayout;
use crate::position::RegionDimensions;
use crate::subtitle;
use crate::watermark;

/// Compose the full output canvas without encoding it.
pub fn compose_frame(
    source: &RgbaImage,
    watermark_image: Option<&RgbaImage>,
    subtitle_config: &SubtitleConfig,
    watermark_config: &WatermarkConfig,
) -> Result<Canvas, SubslateError> {
    subtitle_config
        .validate()
        .map_err(SubslateError::invalid_config)?;
    watermark_config
        .validate()
        .map_err(SubslateError::invalid_config)?;

    let lines = subtitle_config.effective_lines();
    let layout = RowLayout::new(
        source.width(),
        source.height(),
        subtitle_config.font_size,
        lines.len(),
    );

    tracing::debug!(
        width = source.width(),
        source_height = source.height(),
        canvas_height = layout.canvas_height_px(),
        rows = lines.len(),
        "composing frame"
    );

    let mut canvas = Canvas::new(source.width(), layout.canvas_height_px());
    canvas.draw_image(source, 0, 0);

    subtitle::render_rows(&mut canvas, source, &layout, &lines, subtitle_config)?;

    let frame_region = RegionDimensions {
        width: source.width(),
        height: source.height(),
    };
    watermark::apply(&mut canvas, watermark_config, watermark_image, frame_region)?;

    Ok(canvas)
}

/// Run the full pipeline and encode in the output format derived from
/// the source format.
pub fn generate(
    source: &RgbaImage,
    source_format: SourceFormat,
    watermark_image: Option<&RgbaImage>,
    subtitle_config: &SubtitleConfig,
    watermark_config: &WatermarkConfig,
) -> Result<RenderedOutput, SubslateError> {
    let canvas = compose_frame(source, watermark_image, subtitle_config, watermark_config)?;
    let output = encoder::encode(canvas.as_image(), source_format.output_format())?;

    tracing::info!(
        width = output.width,
        height = output.height,
        format = output.content_type(),
        bytes = output.data.len(),
        "generated subtitle image"
    );

    Ok(output)
}
