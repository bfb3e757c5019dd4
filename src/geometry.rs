//! Pixel geometry of scaled variants.
//!
//! Pure functions, no I/O.

use crate::catalog::BASELINE_MULTIPLIER;
use crate::error::{AssetError, Result};

/// Output dimensions for a variant with the given multiplier.
///
/// The source is treated as the 4x baseline, so `factor = multiplier / 4.0`.
/// Each side is rounded to the nearest pixel, halves away from zero.
///
/// # Examples
/// ```
/// # use asset_gen::geometry::resolve;
/// assert_eq!(resolve(400, 400, 1.0), (100, 100));
/// assert_eq!(resolve(512, 512, 0.75), (96, 96));
/// ```
pub fn resolve(source_width: u32, source_height: u32, multiplier: f64) -> (u32, u32) {
    let factor = multiplier / BASELINE_MULTIPLIER;
    (scale(source_width, factor), scale(source_height, factor))
}

fn scale(side: u32, factor: f64) -> u32 {
    (side as f64 * factor).round() as u32
}

/// Reject sources that would produce zero-area variants.
pub fn check_source_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(AssetError::invalid_source(format!(
            "source image has zero area ({width}x{height})"
        )));
    }
    Ok(())
}
