//! Session state for one editing flow.
//!
//! A [`Session`] owns the currently loaded source image, the optional
//! watermark image, and the most recent render. It replaces ambient
//! globals: callers hold a session, feed it uploads, and ask it to
//! generate. Loading a new source or watermark invalidates the previous
//! render, so a stale image can never be downloaded.

use image::RgbaImage;

use crate::config::{SubtitleConfig, WatermarkConfig};
use crate::encoder::{self, RenderedOutput, SourceFormat};
use crate::error::SubslateError;
use crate::generator;

/// A decoded source frame and the format it arrived in.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub image: RgbaImage,
    pub format: SourceFormat,
}

impl SourceImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Mutable state for one user flow: source, watermark, last render.
#[derive(Debug, Default)]
pub struct Session {
    source: Option<SourceImage>,
    watermark: Option<RgbaImage>,
    last_output: Option<RenderedOutput>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and store a source upload. The declared MIME type is
    /// checked before decoding; on any failure the session keeps its
    /// previous state.
    pub fn load_source(&mut self, data: &[u8], content_type: &str) -> Result<(), SubslateError> {
        let (image, format) = encoder::decode_source(data, content_type)?;

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            format = format.content_type(),
            "loaded source image"
        );

        self.source = Some(SourceImage { image, format });
        self.last_output = None;
        Ok(())
    }

    /// Decode and store a watermark image upload.
    pub fn load_watermark(&mut self, data: &[u8]) -> Result<(), SubslateError> {
        let image = image::load_from_memory(data)
            .map_err(|e| SubslateError::decode(format!("Failed to decode watermark image: {}", e)))?
            .to_rgba8();

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "loaded watermark image"
        );

        self.watermark = Some(image);
        self.last_output = None;
        Ok(())
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn watermark_image(&self) -> Option<&RgbaImage> {
        self.watermark.as_ref()
    }

    pub fn last_output(&self) -> Option<&RenderedOutput> {
        self.last_output.as_ref()
    }

    /// Run the pipeline against the loaded source and store the result.
    ///
    /// Fails with [`SubslateError::NoSourceImage`] when nothing has been
    /// loaded; that is the only precondition.
    pub fn generate(
        &mut self,
        subtitle: &SubtitleConfig,
        watermark: &WatermarkConfig,
    ) -> Result<&RenderedOutput, SubslateError> {
        let source = self.source.as_ref().ok_or(SubslateError::NoSourceImage)?;

        let output = generator::generate(
            &source.image,
            source.format,
            self.watermark.as_ref(),
            subtitle,
            watermark,
        )?;

        Ok(self.last_output.insert(output))
    }

    /// The last render, for download. Fails if nothing has been
    /// generated since the inputs last changed.
    pub fn download(&self) -> Result<&RenderedOutput, SubslateError> {
        self.last_output.as_ref().ok_or(SubslateError::NoRenderedOutput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::OutputFormat;
    use image::Rgba;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([120, 80, 40, 255]));
        encoder::encode(&image, OutputFormat::Png).unwrap().data
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([120, 80, 40, 255]));
        encoder::encode(&image, OutputFormat::Jpeg).unwrap().data
    }

    #[test]
    fn test_empty_session_preconditions() {
        let mut session = Session::new();

        assert_eq!(
            session.download().unwrap_err(),
            SubslateError::NoRenderedOutput
        );
        assert_eq!(
            session
                .generate(&SubtitleConfig::default(), &WatermarkConfig::default())
                .unwrap_err(),
            SubslateError::NoSourceImage
        );
    }

    #[test]
    fn test_load_source_records_format_and_dimensions() {
        let mut session = Session::new();
        session.load_source(&png_bytes(33, 21), "image/png").unwrap();

        let source = session.source().unwrap();
        assert_eq!(source.width(), 33);
        assert_eq!(source.height(), 21);
        assert_eq!(source.format, SourceFormat::Png);
    }

    #[test]
    fn test_load_source_failure_keeps_previous_state() {
        let mut session = Session::new();
        session.load_source(&png_bytes(10, 10), "image/png").unwrap();
        session
            .generate(&SubtitleConfig::default(), &WatermarkConfig::default())
            .unwrap();

        // Wrong MIME type: rejected before decode.
        let err = session
            .load_source(&png_bytes(5, 5), "image/gif")
            .unwrap_err();
        assert!(matches!(err, SubslateError::UnsupportedFormat(_)));

        // Garbage bytes: decode failure.
        let err = session.load_source(b"junk", "image/png").unwrap_err();
        assert!(matches!(err, SubslateError::Decode(_)));

        // Source and render both survive the failures.
        assert_eq!(session.source().unwrap().width(), 10);
        assert!(session.download().is_ok());
    }

    #[test]
    fn test_generate_then_download_round_trip() {
        let mut session = Session::new();
        session.load_source(&jpeg_bytes(24, 16), "image/jpeg").unwrap();

        let config = SubtitleConfig {
            lines: vec!["hello".to_string()],
            font_size: 10,
            ..SubtitleConfig::default()
        };
        let generated = session
            .generate(&config, &WatermarkConfig::default())
            .unwrap()
            .clone();

        assert_eq!(generated.format, OutputFormat::Jpeg);
        assert_eq!(&generated.data[0..2], &[0xFF, 0xD8]);

        let downloaded = session.download().unwrap();
        assert_eq!(downloaded, &generated);
    }

    #[test]
    fn test_new_source_invalidates_last_render() {
        let mut session = Session::new();
        session.load_source(&png_bytes(10, 10), "image/png").unwrap();
        session
            .generate(&SubtitleConfig::default(), &WatermarkConfig::default())
            .unwrap();
        assert!(session.download().is_ok());

        session.load_source(&png_bytes(12, 12), "image/png").unwrap();
        assert_eq!(
            session.download().unwrap_err(),
            SubslateError::NoRenderedOutput
        );
    }

    #[test]
    fn test_new_watermark_invalidates_last_render() {
        let mut session = Session::new();
        session.load_source(&png_bytes(10, 10), "image/png").unwrap();
        session
            .generate(&SubtitleConfig::default(), &WatermarkConfig::default())
            .unwrap();

        session.load_watermark(&png_bytes(4, 4)).unwrap();
        assert!(session.download().is_err());
        assert!(session.watermark_image().is_some());
    }

    #[test]
    fn test_watermark_image_changes_the_render() {
        let mut session = Session::new();
        session.load_source(&png_bytes(80, 60), "image/png").unwrap();

        let config = SubtitleConfig::default();
        let watermark = WatermarkConfig {
            enabled: true,
            kind: crate::config::WatermarkKind::Image,
            opacity: 80,
            ..WatermarkConfig::default()
        };

        // No image loaded: the image watermark is skipped.
        let without = session.generate(&config, &watermark).unwrap().clone();

        let mark = RgbaImage::from_pixel(40, 40, Rgba([255, 0, 0, 255]));
        let mark_png = encoder::encode(&mark, OutputFormat::Png).unwrap().data;
        session.load_watermark(&mark_png).unwrap();

        let with = session.generate(&config, &watermark).unwrap().clone();
        assert_ne!(without.data, with.data);
    }
}
