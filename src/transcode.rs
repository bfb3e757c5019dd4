//! Decode → resample → encode for a single variant.
//!
//! The pixel pipeline keeps two alpha representations apart on purpose:
//! decoding yields straight RGBA, resampling and encoding work on
//! premultiplied RGBA, and each encoder converts back to what its format
//! stores (straight alpha for PNG, color composited over black for JPEG).

use crate::error::{AssetError, Result};
use image::{
    codecs::jpeg::{JpegEncoder, PixelDensity},
    imageops::{self, FilterType},
    metadata::Orientation,
    DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageReader, Rgb, RgbImage,
    RgbaImage,
};
use std::{io::Cursor, path::Path};

/// Physical resolution written into every output file.
pub const OUTPUT_DPI: u16 = 96;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encoded format of an output file, chosen from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// `.png` → PNG, `.jpg`/`.jpeg` → JPEG, anything else → PNG.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("jpg") | Some("jpeg") => OutputFormat::Jpeg,
            _ => OutputFormat::Png,
        }
    }
}

/// Produces the encoded bytes of one variant from the encoded source.
pub trait Transcoder {
    fn transcode(
        &self,
        source: &[u8],
        format: OutputFormat,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>>;
}

/// Transcoder backed by the `image` and `png` crates.
#[derive(Debug, Clone, Copy)]
pub struct ImageTranscoder {
    jpeg_quality: u8,
}

impl ImageTranscoder {
    pub fn new() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Default for ImageTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcoder for ImageTranscoder {
    fn transcode(
        &self,
        source: &[u8],
        format: OutputFormat,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>> {
        if width == 0 || height == 0 {
            return Err(AssetError::encode(format!(
                "target size {width}x{height} has zero area"
            )));
        }

        let straight = decode(source)?;
        let resized = Premultiplied::from_straight(straight).resample(width, height);

        match format {
            OutputFormat::Png => encode_png(&resized.to_straight()),
            OutputFormat::Jpeg => encode_jpeg(&resized.to_rgb_over_black(), self.jpeg_quality),
        }
    }
}

/// Decode to straight 8-bit RGBA with EXIF orientation already applied.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AssetError::unsupported_format(e.to_string()))?
        .into_decoder()
        .map_err(|e| AssetError::unsupported_format(e.to_string()))?;

    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut image = DynamicImage::from_decoder(decoder)
        .map_err(|e| AssetError::unsupported_format(e.to_string()))?;
    image.apply_orientation(orientation);

    Ok(image.to_rgba8())
}

/// Whether applying the orientation exchanges width and height.
pub(crate) fn swaps_axes(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}

/// RGBA buffer whose color channels are multiplied by alpha.
#[derive(Debug, Clone)]
pub struct Premultiplied(RgbaImage);

impl Premultiplied {
    pub fn from_straight(mut image: RgbaImage) -> Self {
        for px in image.pixels_mut() {
            let alpha = px[3] as u16;
            for c in 0..3 {
                px[c] = ((px[c] as u16 * alpha + 127) / 255) as u8;
            }
        }
        Self(image)
    }

    /// Resample to exactly `width` x `height` with a Lanczos3 filter.
    pub fn resample(&self, width: u32, height: u32) -> Self {
        Self(imageops::resize(&self.0, width, height, FilterType::Lanczos3))
    }

    pub fn to_straight(&self) -> RgbaImage {
        let mut out = self.0.clone();
        for px in out.pixels_mut() {
            let alpha = px[3] as u32;
            if alpha == 0 {
                px.0 = [0, 0, 0, 0];
                continue;
            }
            for c in 0..3 {
                // filter ringing can push color above alpha
                let color = (px[c] as u32).min(alpha);
                px[c] = ((color * 255 + alpha / 2) / alpha) as u8;
            }
        }
        out
    }

    pub fn to_rgb_over_black(&self) -> RgbImage {
        RgbImage::from_fn(self.0.width(), self.0.height(), |x, y| {
            let px = self.0.get_pixel(x, y);
            let alpha = px[3];
            Rgb([px[0].min(alpha), px[1].min(alpha), px[2].min(alpha)])
        })
    }
}

fn pixels_per_meter(dpi: u16) -> u32 {
    (dpi as f64 / 0.0254).round() as u32
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let encode_err = |e: png::EncodingError| AssetError::encode(format!("PNG: {e}"));
    let ppm = pixels_per_meter(OUTPUT_DPI);

    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Best);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));

        let mut writer = encoder.write_header().map_err(encode_err)?;
        writer.write_image_data(image.as_raw()).map_err(encode_err)?;
        writer.finish().map_err(encode_err)?;
    }
    Ok(buf)
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.set_pixel_density(PixelDensity::dpi(OUTPUT_DPI));
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| AssetError::encode(format!("JPEG: {e}")))?;
    Ok(buf)
}
