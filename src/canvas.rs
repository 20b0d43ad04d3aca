//! RGBA drawing surface.
//!
//! A thin 2D canvas over an [`RgbaImage`]: clipped region blits, rect
//! fills, and a global alpha factor that scales every draw until reset.
//! All operations clamp to the canvas bounds, so callers may pass
//! partially (or fully) off-canvas coordinates and only the visible part
//! is touched.

use image::{Rgba, RgbaImage};

/// Mutable compositing target for one generated frame.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
    global_alpha: f32,
}

impl Canvas {
    /// Create a fully transparent canvas with global alpha 1.0.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            global_alpha: 1.0,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Current global alpha factor.
    pub fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    /// Set the global alpha factor, clamped to 0.0-1.0. Every subsequent
    /// draw multiplies its source alpha by this value until it is set
    /// back.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    /// Alpha-blend a full image onto the canvas with its top-left corner
    /// at (x, y).
    pub fn draw_image(&mut self, src: &RgbaImage, x: i32, y: i32) {
        self.draw_image_region(src, 0, 0, src.width(), src.height(), x, y);
    }

    /// Alpha-blend a rectangular region of `src` onto the canvas.
    ///
    /// The source rectangle is clamped to the source bounds and the
    /// destination to the canvas bounds; the copy is 1:1, no scaling.
    pub fn draw_image_region(
        &mut self,
        src: &RgbaImage,
        src_x: u32,
        src_y: u32,
        src_w: u32,
        src_h: u32,
        dst_x: i32,
        dst_y: i32,
    ) {
        if src_x >= src.width() || src_y >= src.height() {
            return;
        }
        let src_w = src_w.min(src.width() - src_x);
        let src_h = src_h.min(src.height() - src_y);

        let target_w = self.image.width() as i32;
        let target_h = self.image.height() as i32;

        let x_start = dst_x.max(0);
        let y_start = dst_y.max(0);
        let x_end = (dst_x + src_w as i32).min(target_w);
        let y_end = (dst_y + src_h as i32).min(target_h);

        for ty in y_start..y_end {
            for tx in x_start..x_end {
                let sx = src_x + (tx - dst_x) as u32;
                let sy = src_y + (ty - dst_y) as u32;

                let fg = *src.get_pixel(sx, sy);
                let bg = *self.image.get_pixel(tx as u32, ty as u32);

                let blended = blend_pixels(bg, fg, self.global_alpha);
                self.image.put_pixel(tx as u32, ty as u32, blended);
            }
        }
    }

    /// Alpha-blend a solid rectangle onto the canvas. The color's own
    /// alpha channel and the global alpha both apply.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgba<u8>) {
        let target_w = self.image.width() as i32;
        let target_h = self.image.height() as i32;

        let x_start = x.max(0);
        let y_start = y.max(0);
        let x_end = (x + width as i32).min(target_w);
        let y_end = (y + height as i32).min(target_h);

        for ty in y_start..y_end {
            for tx in x_start..x_end {
                let bg = *self.image.get_pixel(tx as u32, ty as u32);
                let blended = blend_pixels(bg, color, self.global_alpha);
                self.image.put_pixel(tx as u32, ty as u32, blended);
            }
        }
    }

    /// Borrow the underlying pixel buffer.
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consume the canvas, returning the pixel buffer.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Blend two pixels using alpha compositing with an additional opacity
/// factor on the foreground.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha)
fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let bg_alpha = background[3] as f32 / 255.0;

    // Porter-Duff "over" operator
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0) as u8,
    ])
}
