//! Generate Android, iOS and Windows scaled image assets from one source image.
//!
//! The source is treated as the 4x baseline. Every variant in the
//! [`catalog`] is resized from it and written into the conventional folder
//! layout:
//!
//! ```text
//! {root}/{name}.png
//! {root}/Android/{ldpi,mdpi,hdpi,xhdpi,xxhdpi,xxxhdpi}/{name}.png
//! {root}/IOS/{name}.png, {name}@2.png, {name}@3.png
//! {root}/Windows/{name}.scale-{100,140,180,240}.png
//! ```

pub mod catalog;
pub mod error;
pub mod generate;
pub mod geometry;
pub mod layout;
pub mod preview;
pub mod report;
pub mod source;
pub mod transcode;

pub use catalog::{Platform, QualityTier, VariantSpec};
pub use error::{AssetError, Result};
pub use generate::{
    generate, generate_with, GenerationRequest, GenerationResult, PlatformResult, VariantResult,
};
pub use source::SourceImage;
pub use transcode::{ImageTranscoder, OutputFormat, Transcoder};
