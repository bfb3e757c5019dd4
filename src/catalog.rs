//! Scale catalog for every supported target platform.
//!
//! Each variant carries a multiplier expressed against a 4x baseline, so a
//! single formula (`multiplier / 4.0`) derives the scale factor for Android
//! density buckets, iOS scales and Windows scale percentages alike.

use serde::Serialize;
use std::{fmt, str::FromStr};

/// Multiplier of the largest variant; the source image is treated as 4x.
pub const BASELINE_MULTIPLIER: f64 = 4.0;

const NAME_PLACEHOLDER: &str = "{name}";

/// Target ecosystem for generated assets.
///
/// Declaration order is the generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Platform {
    Android,
    Ios,
    Windows,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Android, Platform::Ios, Platform::Windows];

    /// Top-level folder created below the output root.
    pub fn folder_name(self) -> &'static str {
        match self {
            Platform::Android => "Android",
            Platform::Ios => "IOS",
            Platform::Windows => "Windows",
        }
    }

    /// Ordered variants generated for this platform.
    pub fn variants(self) -> &'static [VariantSpec] {
        match self {
            Platform::Android => &ANDROID,
            Platform::Ios => &IOS,
            Platform::Windows => &WINDOWS,
        }
    }

    /// Look up a variant by its identifier (e.g. `"XHDPI"`, `"@2x"`, `"scale-140"`).
    pub fn variant(self, id: &str) -> Option<&'static VariantSpec> {
        self.variants().iter().find(|spec| spec.id == id)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
            Platform::Windows => "Windows",
        })
    }
}

/// One scaled output of the source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantSpec {
    pub platform: Platform,
    /// Stable identifier, e.g. `"LDPI"` or `"scale-180"`.
    pub id: &'static str,
    /// Multiplier relative to 1x; the source is assumed to be 4x.
    pub multiplier: f64,
    /// File name pattern containing a `{name}` placeholder.
    pub file_pattern: &'static str,
}

impl VariantSpec {
    const fn new(
        platform: Platform,
        id: &'static str,
        multiplier: f64,
        file_pattern: &'static str,
    ) -> Self {
        Self {
            platform,
            id,
            multiplier,
            file_pattern,
        }
    }

    /// Output file name for the given base name.
    pub fn file_name(&self, name: &str) -> String {
        self.file_pattern.replacen(NAME_PLACEHOLDER, name, 1)
    }

    /// Folder below the platform folder, if any.
    ///
    /// Android resource folders must be lower case, so the bucket folder is
    /// always derived from the lower-cased identifier.
    pub fn subdirectory(&self) -> Option<String> {
        match self.platform {
            Platform::Android => Some(self.id.to_ascii_lowercase()),
            Platform::Ios | Platform::Windows => None,
        }
    }

    /// Pixel dimensions of this variant for a source of the given size.
    pub fn resolve(&self, source_width: u32, source_height: u32) -> (u32, u32) {
        crate::geometry::resolve(source_width, source_height, self.multiplier)
    }
}

static ANDROID: [VariantSpec; 6] = [
    VariantSpec::new(Platform::Android, "LDPI", 0.75, "{name}.png"),
    VariantSpec::new(Platform::Android, "MDPI", 1.0, "{name}.png"),
    VariantSpec::new(Platform::Android, "HDPI", 1.5, "{name}.png"),
    VariantSpec::new(Platform::Android, "XHDPI", 2.0, "{name}.png"),
    VariantSpec::new(Platform::Android, "XXHDPI", 3.0, "{name}.png"),
    VariantSpec::new(Platform::Android, "XXXHDPI", 4.0, "{name}.png"),
];

static IOS: [VariantSpec; 3] = [
    VariantSpec::new(Platform::Ios, "@1x", 1.0, "{name}.png"),
    VariantSpec::new(Platform::Ios, "@2x", 2.0, "{name}@2.png"),
    VariantSpec::new(Platform::Ios, "@3x", 3.0, "{name}@3.png"),
];

static WINDOWS: [VariantSpec; 4] = [
    VariantSpec::new(Platform::Windows, "scale-100", 1.0, "{name}.scale-100.png"),
    VariantSpec::new(Platform::Windows, "scale-140", 1.4, "{name}.scale-140.png"),
    VariantSpec::new(Platform::Windows, "scale-180", 1.8, "{name}.scale-180.png"),
    VariantSpec::new(Platform::Windows, "scale-240", 2.4, "{name}.scale-240.png"),
];

/// Low/Medium/High alias used to pick a variant for previewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    /// Variant shown for this tier on the given platform.
    pub fn variant(self, platform: Platform) -> &'static VariantSpec {
        let index = match (platform, self) {
            (Platform::Android, QualityTier::Low) => 1,
            (Platform::Android, QualityTier::Medium) => 3,
            (Platform::Android, QualityTier::High) => 5,
            (Platform::Ios, QualityTier::Low) => 0,
            (Platform::Ios, QualityTier::Medium) => 1,
            (Platform::Ios, QualityTier::High) => 2,
            (Platform::Windows, QualityTier::Low) => 0,
            (Platform::Windows, QualityTier::Medium) => 2,
            (Platform::Windows, QualityTier::High) => 3,
        };
        &platform.variants()[index]
    }
}

impl FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(QualityTier::Low),
            "medium" => Ok(QualityTier::Medium),
            "high" => Ok(QualityTier::High),
            other => Err(format!(
                "Unknown quality tier: {other}. Available tiers: low, medium, high"
            )),
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        })
    }
}
