//! Glyph measurement and text sprite rendering.
//!
//! Renders a line of text into a transparent RGBA sprite that the
//! compositors place on the canvas. Two passes: an optional outline pass
//! (the glyph run redrawn at every offset within the stroke radius in
//! the outline color) underneath a fill pass, giving the stroke-then-fill
//! look of subtitle captions. The font is embedded, so rendering is
//! deterministic across machines.
//!
//! # Example
//!
//! ```ignore
//! use subslate::text::{render_text, Color, TextRenderOptions};
//!
//! let options = TextRenderOptions {
//!     font_size: 40.0,
//!     fill: Color::white(),
//!     outline: Some(Color::black()),
//! };
//! let sprite = render_text("example line", &options);
//! ```

use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::sync::OnceLock;

use crate::constants::TEXT_STROKE_WIDTH;
use crate::position::HorizontalAlign;

/// Embedded default face (DejaVu Sans), stands in for the generic
/// sans-serif family.
static EMBEDDED_FONT: OnceLock<FontRef<'static>> = OnceLock::new();

const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");

fn embedded_font() -> &'static FontRef<'static> {
    EMBEDDED_FONT.get_or_init(|| {
        FontRef::try_from_slice(EMBEDDED_FONT_DATA).expect("embedded font data is valid")
    })
}

/// RGB color for text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// White color.
    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Black color.
    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }
}

/// Options for text sprite rendering.
#[derive(Debug, Clone)]
pub struct TextRenderOptions {
    /// Font size in pixels.
    pub font_size: f32,
    /// Glyph fill color.
    pub fill: Color,
    /// Outline color for the stroke pass; `None` renders fill only.
    pub outline: Option<Color>,
}

/// Parse a hex color string into RGB components.
///
/// Supports both #RGB and #RRGGBB formats.
pub fn parse_hex_color(hex: &str) -> Result<Color, String> {
    let hex = hex
        .strip_prefix('#')
        .ok_or_else(|| "Color must start with '#'".to_string())?;

    match hex.len() {
        3 => {
            // #RGB format - each hex digit doubled: 0xF -> 0xFF
            let r = u8::from_str_radix(&hex[0..1], 16).map_err(|_| "Invalid hex digit")?;
            let g = u8::from_str_radix(&hex[1..2], 16).map_err(|_| "Invalid hex digit")?;
            let b = u8::from_str_radix(&hex[2..3], 16).map_err(|_| "Invalid hex digit")?;
            Ok(Color::new(r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| "Invalid hex digit")?;
            let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| "Invalid hex digit")?;
            let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| "Invalid hex digit")?;
            Ok(Color::new(r, g, b))
        }
        _ => Err(format!(
            "Color must be #RGB or #RRGGBB format, got {} characters",
            hex.len()
        )),
    }
}

/// Advance width of a text run in pixels at the given font size,
/// including kerning.
pub fn measure_text(text: &str, font_size: f32) -> f32 {
    let font = embedded_font();
    let scale = PxScale::from(font_size);
    let scaled_font = font.as_scaled(scale);

    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            width += scaled_font.kern(prev, glyph_id);
        }

        width += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width
}

/// A rendered text run: transparent RGBA sprite plus the metrics needed
/// to place it.
#[derive(Debug, Clone)]
pub struct TextSprite {
    image: RgbaImage,
    /// Measured advance width of the glyph run (excludes stroke padding).
    text_width: u32,
    /// Stroke padding on each side of the glyph box; 0 without outline.
    pad: u32,
}

impl TextSprite {
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn text_width(&self) -> u32 {
        self.text_width
    }

    pub fn pad(&self) -> u32 {
        self.pad
    }

    /// Sprite x so the glyph box aligns to `x` per the alignment rule:
    /// starts at x (Left), centered on x (Center), ends at x (Right).
    pub fn x_for_align(&self, x: i32, align: HorizontalAlign) -> i32 {
        let pad = self.pad as i32;
        let text_width = self.text_width as i32;
        match align {
            HorizontalAlign::Left => x - pad,
            HorizontalAlign::Center => x - text_width / 2 - pad,
            HorizontalAlign::Right => x - text_width - pad,
        }
    }

    /// Sprite y so the glyph box's bottom edge sits at `bottom_y`.
    pub fn y_for_bottom(&self, bottom_y: i32) -> i32 {
        bottom_y - (self.height() as i32 - self.pad as i32)
    }

    /// Sprite y so the glyph box is vertically centered on `center_y`.
    pub fn y_for_center(&self, center_y: i32) -> i32 {
        center_y - self.height() as i32 / 2
    }
}

/// Render a text run to a sprite. The sprite carries full alpha; any
/// translucency is applied by the canvas at draw time.
pub fn render_text(text: &str, options: &TextRenderOptions) -> TextSprite {
    let font = embedded_font();
    let scale = PxScale::from(options.font_size);
    let scaled_font = font.as_scaled(scale);

    let text_width = measure_text(text, options.font_size).ceil() as u32;
    let glyph_height = scaled_font.height().ceil() as u32;
    let pad = if options.outline.is_some() {
        TEXT_STROKE_WIDTH / 2
    } else {
        0
    };

    let sprite_width = (text_width + 2 * pad).max(1);
    let sprite_height = (glyph_height + 2 * pad).max(1);
    let mut image = RgbaImage::new(sprite_width, sprite_height);

    let origin_x = pad as f32;
    let baseline_y = pad as f32 + scaled_font.ascent();

    if let Some(outline) = options.outline {
        for (dx, dy) in stroke_offsets((TEXT_STROKE_WIDTH / 2) as i32) {
            draw_glyph_run(
                &mut image,
                text,
                scale,
                origin_x + dx as f32,
                baseline_y + dy as f32,
                outline,
            );
        }
    }
    draw_glyph_run(&mut image, text, scale, origin_x, baseline_y, options.fill);

    TextSprite {
        image,
        text_width,
        pad,
    }
}

/// Offsets within the stroke radius disc, center excluded.
fn stroke_offsets(radius: i32) -> Vec<(i32, i32)> {
    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx == 0 && dy == 0 {
                continue;
            }
            if dx * dx + dy * dy <= radius * radius {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

/// Rasterize one glyph run into the sprite at the given origin.
fn draw_glyph_run(
    image: &mut RgbaImage,
    text: &str,
    scale: PxScale,
    origin_x: f32,
    baseline_y: f32,
    color: Color,
) {
    let font = embedded_font();
    let scaled_font = font.as_scaled(scale);
    let width = image.width() as i32;
    let height = image.height() as i32;

    let mut cursor_x = origin_x;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline_y));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();

            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;

                if x >= 0 && y >= 0 && x < width && y < height {
                    let pixel_alpha = (coverage * 255.0) as u8;
                    let pixel = Rgba([color.r, color.g, color.b, pixel_alpha]);

                    let existing = image.get_pixel(x as u32, y as u32);
                    let blended = blend_pixels(*existing, pixel);
                    image.put_pixel(x as u32, y as u32, blended);
                }
            });
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }
}

/// Blend two RGBA pixels using alpha compositing (anti-aliased edges
/// accumulate instead of overwriting).
fn blend_pixels(bottom: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let top_alpha = top[3] as f32 / 255.0;
    let bottom_alpha = bottom[3] as f32 / 255.0;

    let out_alpha = top_alpha + bottom_alpha * (1.0 - top_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |t: u8, b: u8| -> u8 {
        let t = t as f32 / 255.0;
        let b = b as f32 / 255.0;
        let result = (t * top_alpha + b * bottom_alpha * (1.0 - top_alpha)) / out_alpha;
        (result * 255.0) as u8
    };

    Rgba([
        blend(top[0], bottom[0]),
        blend(top[1], bottom[1]),
        blend(top[2], bottom[2]),
        (out_alpha * 255.0) as u8,
    ])
}
