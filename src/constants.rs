// Constants module - fixed values of the compositing pipeline
//
// These are behavioral constants, not tunables: changing any of them
// changes the rendered output for every caller.

// =============================================================================
// Subtitle layout
// =============================================================================

/// Row height as a multiple of the font size
pub const LINE_HEIGHT_RATIO: f64 = 1.3;

/// Vertical gap between consecutive subtitle rows in pixels
pub const ROW_GAP: f64 = 3.0;

/// Alpha of the translucent black mask painted over each row background
pub const ROW_MASK_ALPHA: f32 = 0.65;

// =============================================================================
// Text rendering
// =============================================================================

/// Full stroke width of the text outline pass in pixels
pub const TEXT_STROKE_WIDTH: u32 = 4;

// =============================================================================
// Watermark placement
// =============================================================================

/// Distance between an edge anchor and the image border in pixels
pub const WATERMARK_PADDING: i32 = 20;

/// Size parameter value at which an image watermark reaches base scale
pub const WATERMARK_SIZE_REFERENCE: f32 = 60.0;

/// Base scale factor applied to image watermarks
pub const WATERMARK_BASE_SCALE: f32 = 0.3;

// =============================================================================
// Output encoding
// =============================================================================

/// JPEG encoding quality (1-100)
pub const JPEG_QUALITY: u8 = 90;

/// Prefix of the suggested output filename
pub const FILENAME_PREFIX: &str = "subtitle-image";
