//! The source image a generation run is derived from.

use crate::error::{AssetError, Result};
use crate::geometry::check_source_dimensions;
use crate::transcode::{self, swaps_axes};
use image::{metadata::Orientation, ImageDecoder, ImageFormat, ImageReader, RgbaImage};
use std::{fs, io::Cursor, path::Path};

/// Encoded formats accepted as a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Png,
    Jpeg,
}

impl SourceFormat {
    /// Sniff the format from the leading magic bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            ImageFormat::Png => Some(SourceFormat::Png),
            ImageFormat::Jpeg => Some(SourceFormat::Jpeg),
            _ => None,
        }
    }
}

/// Encoded source bytes plus their displayed pixel dimensions.
///
/// Dimensions are those after EXIF orientation, i.e. what the variants are
/// scaled from.
#[derive(Debug, Clone)]
pub struct SourceImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl SourceImage {
    /// Wrap a buffer whose dimensions the caller already knows.
    ///
    /// Nothing is checked here; [`SourceImage::validate`] runs at the start of
    /// every generation.
    pub fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
        }
    }

    /// Probe the dimensions of an encoded buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if SourceFormat::detect(&bytes).is_none() {
            return Err(AssetError::invalid_source(
                "source must be a PNG or JPEG image",
            ));
        }
        let (width, height) = probe_dimensions(&bytes)?;
        let source = Self::new(bytes, width, height);
        source.validate()?;
        Ok(source)
    }

    /// Read and probe a `.png`, `.jpg` or `.jpeg` file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| AssetError::filesystem(path, e))?;
        Self::from_bytes(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> Option<SourceFormat> {
        SourceFormat::detect(&self.bytes)
    }

    /// Reject zero-area, non PNG/JPEG or undecodable sources.
    ///
    /// The whole image is decoded, so a valid header followed by corrupt
    /// pixel data is caught here rather than by every variant.
    pub fn validate(&self) -> Result<()> {
        check_source_dimensions(self.width, self.height)?;
        if self.format().is_none() {
            return Err(AssetError::invalid_source(
                "source bytes are not a recognized PNG or JPEG image",
            ));
        }

        let decoded = self.decode()?;
        if decoded.dimensions() != self.dimensions() {
            let (w, h) = decoded.dimensions();
            return Err(AssetError::invalid_source(format!(
                "source declared as {}x{} decodes to {w}x{h}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Decode to straight RGBA with EXIF orientation applied.
    pub fn decode(&self) -> Result<RgbaImage> {
        transcode::decode(&self.bytes)
            .map_err(|e| AssetError::invalid_source(format!("cannot decode source: {e}")))
    }
}

fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .and_then(|reader| reader.into_decoder().map_err(std::io::Error::other))
        .map_err(|e| AssetError::invalid_source(format!("cannot read image header: {e}")))?;

    let (width, height) = decoder.dimensions();
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    if swaps_axes(orientation) {
        Ok((height, width))
    } else {
        Ok((width, height))
    }
}
