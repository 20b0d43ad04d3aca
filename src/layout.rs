//! Subtitle block geometry.
//!
//! Pure layout math for the appended subtitle area: row height derived
//! from the font size (`rowHeight = fontSize × 1.3`), a constant
//! inter-row gap, and the vertical offsets of every row and gap strip.
//! Values stay in f64; pixel conversions happen at the last moment,
//! truncating the canvas height and rounding draw offsets to whole
//! pixels. Drawing clips at canvas edges, so a rounded offset can never
//! overrun the buffer.

use crate::constants::{LINE_HEIGHT_RATIO, ROW_GAP};

/// Geometry of one composited frame: source dimensions plus the subtitle
/// block appended below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowLayout {
    /// Output canvas width; always the source width.
    pub canvas_width: u32,
    /// Source image height; the subtitle block starts here.
    pub source_height: u32,
    /// Number of subtitle rows.
    pub line_count: usize,
    /// Height of one subtitle row (fontSize × 1.3).
    pub row_height: f64,
    /// Gap between consecutive rows.
    pub gap: f64,
    /// Total height of the subtitle block; 0.0 when there are no rows.
    pub block_height: f64,
    /// Output canvas height: source height + block height.
    pub canvas_height: f64,
}

impl RowLayout {
    /// Compute the layout for a source image, font size, and line count.
    ///
    /// Inputs are pre-validated upstream (`font_size > 0`, source
    /// dimensions > 0); this function has no failure modes.
    pub fn new(source_width: u32, source_height: u32, font_size: u32, line_count: usize) -> Self {
        let row_height = f64::from(font_size) * LINE_HEIGHT_RATIO;
        let block_height = if line_count > 0 {
            line_count as f64 * row_height + (line_count - 1) as f64 * ROW_GAP
        } else {
            0.0
        };
        let canvas_height = f64::from(source_height) + block_height;

        Self {
            canvas_width: source_width,
            source_height,
            line_count,
            row_height,
            gap: ROW_GAP,
            block_height,
            canvas_height,
        }
    }

    /// Whether any subtitle rows will be drawn.
    pub fn has_rows(&self) -> bool {
        self.line_count > 0
    }

    /// Vertical offset of row `i` (0-indexed).
    pub fn row_y(&self, i: usize) -> f64 {
        f64::from(self.source_height) + i as f64 * (self.row_height + self.gap)
    }

    /// Vertical offset of the gap strip below row `i`; valid for
    /// `i < line_count - 1`.
    pub fn gap_y(&self, i: usize) -> f64 {
        f64::from(self.source_height) + (i + 1) as f64 * self.row_height + i as f64 * self.gap
    }

    /// Canvas height in whole pixels; fractional block heights truncate.
    pub fn canvas_height_px(&self) -> u32 {
        self.canvas_height as u32
    }

    /// Row height in whole pixels.
    pub fn row_height_px(&self) -> u32 {
        self.row_height.round() as u32
    }

    /// Gap height in whole pixels.
    pub fn gap_px(&self) -> u32 {
        self.gap.round() as u32
    }

    /// Row offset in whole pixels.
    pub fn row_y_px(&self, i: usize) -> i32 {
        self.row_y(i).round() as i32
    }

    /// Gap strip offset in whole pixels.
    pub fn gap_y_px(&self, i: usize) -> i32 {
        self.gap_y(i).round() as i32
    }

    /// Source-space top edge of the template strip: the bottom-most strip
    /// of the source image at row height.
    pub fn template_y_px(&self) -> u32 {
        self.source_height.saturating_sub(self.row_height_px())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // Test: canvas height formula holds exactly in f64
    #[rstest]
    #[case(1000, 500, 40, 3)]
    #[case(1000, 500, 40, 1)]
    #[case(640, 360, 25, 2)]
    #[case(1920, 1080, 72, 5)]
    #[case(8, 8, 1, 1)]
    fn test_canvas_height_formula(
        #[case] width: u32,
        #[case] height: u32,
        #[case] font_size: u32,
        #[case] lines: usize,
    ) {
        let layout = RowLayout::new(width, height, font_size, lines);
        let row_height = f64::from(font_size) * LINE_HEIGHT_RATIO;
        let block = lines as f64 * row_height + (lines - 1) as f64 * ROW_GAP;

        assert_eq!(layout.row_height, row_height);
        assert_eq!(layout.block_height, block);
        assert_eq!(layout.canvas_height, f64::from(height) + block);
        assert_eq!(layout.canvas_width, width);
    }

    #[test]
    fn test_zero_lines_collapses_block() {
        let layout = RowLayout::new(800, 600, 40, 0);
        assert!(!layout.has_rows());
        assert_eq!(layout.block_height, 0.0);
        assert_eq!(layout.canvas_height, 600.0);
        assert_eq!(layout.canvas_height_px(), 600);
    }

    #[test]
    fn test_single_line_has_no_gap_contribution() {
        let layout = RowLayout::new(800, 600, 30, 1);
        assert_eq!(layout.block_height, layout.row_height);
    }

    #[test]
    fn test_canvas_never_shorter_than_source() {
        for lines in 0..6 {
            for font_size in [1, 13, 40, 90] {
                let layout = RowLayout::new(320, 240, font_size, lines);
                assert!(layout.canvas_height >= 240.0);
                assert!(layout.canvas_height_px() >= 240);
            }
        }
    }

    // Test: pixel snapshot for the common 40px case
    #[test]
    fn test_pixel_conversion_font_40() {
        let layout = RowLayout::new(1000, 500, 40, 3);
        assert_eq!(layout.row_height_px(), 52);
        assert_eq!(layout.gap_px(), 3);
        assert_eq!(layout.template_y_px(), 448);
        // 500 + 3*52 + 2*3 = 662
        assert_eq!(layout.canvas_height_px(), 662);
        assert_eq!(layout.row_y_px(0), 500);
        assert_eq!(layout.row_y_px(1), 555);
        assert_eq!(layout.row_y_px(2), 610);
        assert_eq!(layout.gap_y_px(0), 552);
        assert_eq!(layout.gap_y_px(1), 607);
    }

    #[test]
    fn test_row_progression_spacing() {
        let layout = RowLayout::new(1000, 500, 33, 4);
        for i in 0..3 {
            let step = layout.row_y(i + 1) - layout.row_y(i);
            assert!((step - (layout.row_height + layout.gap)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_gap_sits_directly_below_its_row() {
        let layout = RowLayout::new(1000, 500, 33, 4);
        for i in 0..3 {
            let expected = layout.row_y(i) + layout.row_height;
            assert!((layout.gap_y(i) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_template_strip_clamps_on_tiny_source() {
        // Row taller than the source image: strip top clamps to 0.
        let layout = RowLayout::new(100, 30, 40, 1);
        assert_eq!(layout.template_y_px(), 0);
    }
}
