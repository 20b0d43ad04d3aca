//! Image decoding and output encoding.
//!
//! The pipeline accepts JPEG, PNG and WebP sources and emits either JPEG
//! (quality 90) or PNG. JPEG sources stay JPEG; PNG and WebP sources are
//! written as PNG, so transparency survives and no WebP encoder is
//! needed on the output side.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, RgbaImage};
use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::constants::{FILENAME_PREFIX, JPEG_QUALITY};
use crate::error::SubslateError;

/// Accepted source image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    WebP,
}

impl SourceFormat {
    /// Map a MIME type to a source format. Anything outside the supported
    /// set is rejected before any decode work happens.
    pub fn from_mime(content_type: &str) -> Result<Self, SubslateError> {
        match content_type {
            "image/jpeg" => Ok(SourceFormat::Jpeg),
            "image/png" => Ok(SourceFormat::Png),
            "image/webp" => Ok(SourceFormat::WebP),
            other => Err(SubslateError::unsupported_format(other)),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "image/jpeg",
            SourceFormat::Png => "image/png",
            SourceFormat::WebP => "image/webp",
        }
    }

    /// Output format the pipeline will encode to for this source.
    pub fn output_format(&self) -> OutputFormat {
        match self {
            SourceFormat::Jpeg => OutputFormat::Jpeg,
            SourceFormat::Png | SourceFormat::WebP => OutputFormat::Png,
        }
    }
}

/// Formats the pipeline encodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// An encoded result ready for download or preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub data: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl RenderedOutput {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    /// Download filename for a given epoch timestamp in milliseconds.
    pub fn suggested_filename(&self, timestamp_millis: i64) -> String {
        format!(
            "{}-{}.{}",
            FILENAME_PREFIX,
            timestamp_millis,
            self.format.extension()
        )
    }

    /// Download filename stamped with the current time.
    pub fn suggested_filename_now(&self) -> String {
        self.suggested_filename(chrono::Utc::now().timestamp_millis())
    }

    /// Base64 data URL for inline preview.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type(),
            STANDARD.encode(&self.data)
        )
    }
}

/// Decode source bytes after checking the declared MIME type.
///
/// The MIME check runs first so unsupported uploads fail without
/// touching the decoder.
pub fn decode_source(data: &[u8], content_type: &str) -> Result<(RgbaImage, SourceFormat), SubslateError> {
    let format = SourceFormat::from_mime(content_type)?;
    let image = image::load_from_memory(data)
        .map_err(|e| SubslateError::decode(format!("Failed to decode image: {}", e)))?;
    Ok((image.to_rgba8(), format))
}

/// Encode a composed canvas image in the given output format.
pub fn encode(image: &RgbaImage, format: OutputFormat) -> Result<RenderedOutput, SubslateError> {
    let width = image.width();
    let height = image.height();
    let mut output = Cursor::new(Vec::new());

    match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel.
            let rgb_data = rgba_to_rgb(image);
            let encoder = JpegEncoder::new_with_quality(&mut output, JPEG_QUALITY);
            encoder
                .write_image(&rgb_data, width, height, image::ColorType::Rgb8)
                .map_err(|e| SubslateError::encode(format!("JPEG encoding failed: {}", e)))?;
        }
        OutputFormat::Png => {
            let encoder = PngEncoder::new(&mut output);
            encoder
                .write_image(image.as_raw(), width, height, image::ColorType::Rgba8)
                .map_err(|e| SubslateError::encode(format!("PNG encoding failed: {}", e)))?;
        }
    }

    Ok(RenderedOutput {
        data: output.into_inner(),
        format,
        width,
        height,
    })
}

/// Convert RGBA pixel data to RGB by dropping the alpha channel.
fn rgba_to_rgb(image: &RgbaImage) -> Vec<u8> {
    let rgba = image.as_raw();
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);

    for pixel in rgba.chunks_exact(4) {
        rgb.push(pixel[0]);
        rgb.push(pixel[1]);
        rgb.push(pixel[2]);
    }

    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn test_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 128, 255])
        })
    }

    // Test: MIME type mapping
    #[test]
    fn test_from_mime_supported_types() {
        assert_eq!(SourceFormat::from_mime("image/jpeg").unwrap(), SourceFormat::Jpeg);
        assert_eq!(SourceFormat::from_mime("image/png").unwrap(), SourceFormat::Png);
        assert_eq!(SourceFormat::from_mime("image/webp").unwrap(), SourceFormat::WebP);
    }

    #[test]
    fn test_from_mime_rejects_unsupported() {
        let err = SourceFormat::from_mime("image/gif").unwrap_err();
        assert_eq!(err, SubslateError::UnsupportedFormat("image/gif".to_string()));
        assert!(SourceFormat::from_mime("text/html").is_err());
        assert!(SourceFormat::from_mime("").is_err());
    }

    #[test]
    fn test_output_format_mapping() {
        assert_eq!(SourceFormat::Jpeg.output_format(), OutputFormat::Jpeg);
        assert_eq!(SourceFormat::Png.output_format(), OutputFormat::Png);
        // WebP sources are normalized to PNG output.
        assert_eq!(SourceFormat::WebP.output_format(), OutputFormat::Png);
    }

    #[test]
    fn test_extensions() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
    }

    // Test: encoding output carries the right magic bytes
    #[test]
    fn test_encode_jpeg_magic_bytes() {
        let image = test_image(32, 24);
        let output = encode(&image, OutputFormat::Jpeg).unwrap();

        assert!(output.data.len() > 2);
        assert_eq!(&output.data[0..2], &[0xFF, 0xD8]);
        assert_eq!(output.width, 32);
        assert_eq!(output.height, 24);
    }

    #[test]
    fn test_encode_png_magic_bytes() {
        let image = test_image(32, 24);
        let output = encode(&image, OutputFormat::Png).unwrap();

        assert!(output.data.len() > 8);
        assert_eq!(&output.data[0..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let image = test_image(16, 16);
        let first = encode(&image, OutputFormat::Png).unwrap();
        let second = encode(&image, OutputFormat::Png).unwrap();
        assert_eq!(first.data, second.data);

        let first_jpeg = encode(&image, OutputFormat::Jpeg).unwrap();
        let second_jpeg = encode(&image, OutputFormat::Jpeg).unwrap();
        assert_eq!(first_jpeg.data, second_jpeg.data);
    }

    #[test]
    fn test_png_round_trip_preserves_pixels() {
        let image = test_image(20, 10);
        let output = encode(&image, OutputFormat::Png).unwrap();

        let decoded = image::load_from_memory(&output.data).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (20, 10));
        assert_eq!(decoded, image);
    }

    // Test: decode boundary
    #[test]
    fn test_decode_source_checks_mime_first() {
        // Valid PNG bytes with a wrong MIME type still get rejected.
        let image = test_image(8, 8);
        let png = encode(&image, OutputFormat::Png).unwrap();

        let err = decode_source(&png.data, "image/gif").unwrap_err();
        assert!(matches!(err, SubslateError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_decode_source_rejects_garbage() {
        let err = decode_source(b"not an image", "image/png").unwrap_err();
        assert!(matches!(err, SubslateError::Decode(_)));
    }

    #[test]
    fn test_decode_source_round_trip() {
        let image = test_image(12, 9);
        let png = encode(&image, OutputFormat::Png).unwrap();

        let (decoded, format) = decode_source(&png.data, "image/png").unwrap();
        assert_eq!(format, SourceFormat::Png);
        assert_eq!(decoded.dimensions(), (12, 9));
        assert_eq!(decoded, image);
    }

    // Test: download naming and preview URL
    #[test]
    fn test_suggested_filename() {
        let output = RenderedOutput {
            data: vec![1, 2, 3],
            format: OutputFormat::Jpeg,
            width: 1,
            height: 1,
        };
        assert_eq!(
            output.suggested_filename(1700000000123),
            "subtitle-image-1700000000123.jpg"
        );

        let png = RenderedOutput { format: OutputFormat::Png, ..output };
        assert_eq!(
            png.suggested_filename(1700000000123),
            "subtitle-image-1700000000123.png"
        );
    }

    #[test]
    fn test_suggested_filename_now_shape() {
        let output = RenderedOutput {
            data: vec![1, 2, 3],
            format: OutputFormat::Png,
            width: 1,
            height: 1,
        };
        let name = output.suggested_filename_now();

        let stamp = name
            .strip_prefix("subtitle-image-")
            .and_then(|rest| rest.strip_suffix(".png"))
            .unwrap();
        assert!(stamp.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn test_data_url_prefix() {
        let output = RenderedOutput {
            data: vec![0x89, 0x50],
            format: OutputFormat::Png,
            width: 1,
            height: 1,
        };
        let url = output.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(url, format!("data:image/png;base64,{}", STANDARD.encode([0x89u8, 0x50])));
    }
}
