//! File information shown when previewing a generated variant.

use crate::error::{AssetError, Result};
use crate::generate::VariantResult;
use std::{fmt, fs, path::Path};

/// Shown when there is no usable file to describe.
pub const NOTHING_TO_SHOW: &str = "Nothing to show";

const SIZE_SUFFIXES: [&str; 7] = ["bytes", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Name, pixel size and on-disk size of an image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

impl FileInfo {
    pub fn read(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| AssetError::filesystem(path, e))?;
        let (width, height) = image::image_dimensions(path)
            .map_err(|e| AssetError::unsupported_format(format!("{}: {e}", path.display())))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            width,
            height,
            size_bytes: metadata.len(),
        })
    }
}

impl fmt::Display for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}\nImageSize: {}x{}\nFileSize: {}",
            self.name,
            self.width,
            self.height,
            size_suffix(self.size_bytes, 2)
        )
    }
}

/// Describe a previewed variant, or [`NOTHING_TO_SHOW`] when it is missing,
/// failed, or cannot be read back.
pub fn describe(variant: Option<&VariantResult>) -> String {
    variant
        .filter(|v| v.is_success())
        .and_then(|v| FileInfo::read(&v.path).ok())
        .map(|info| info.to_string())
        .unwrap_or_else(|| NOTHING_TO_SHOW.to_string())
}

/// Human readable size with binary (1024) steps, e.g. `1.50 KB`.
pub fn size_suffix(bytes: u64, decimal_places: usize) -> String {
    if bytes == 0 {
        return format!("{:.*} bytes", decimal_places, 0.0);
    }

    let mut magnitude = ((63 - bytes.leading_zeros()) / 10) as usize;
    let mut adjusted = bytes as f64 / (1u64 << (magnitude * 10)) as f64;

    // 1023.999 KB would print as "1024.00 KB"
    let scale = 10f64.powi(decimal_places as i32);
    if (adjusted * scale).round() / scale >= 1000.0 && magnitude + 1 < SIZE_SUFFIXES.len() {
        magnitude += 1;
        adjusted /= 1024.0;
    }

    format!("{:.*} {}", decimal_places, adjusted, SIZE_SUFFIXES[magnitude])
}
