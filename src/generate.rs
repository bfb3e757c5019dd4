//! Generation runs: one source image in, every enabled platform's variants out.

use crate::catalog::{Platform, QualityTier, VariantSpec};
use crate::error::{AssetError, Result};
use crate::layout;
use crate::source::{SourceFormat, SourceImage};
use crate::transcode::{ImageTranscoder, OutputFormat, Transcoder};
use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Identifier recorded for the unscaled copy at the run root.
pub const MAIN_VARIANT_ID: &str = "main";

/// What to generate.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    /// Base name for every output file. Blank names are replaced by a
    /// generated identifier.
    pub base_name: String,
    pub platforms: BTreeSet<Platform>,
    pub source: &'a SourceImage,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(
        base_name: impl Into<String>,
        platforms: impl IntoIterator<Item = Platform>,
        source: &'a SourceImage,
    ) -> Self {
        Self {
            base_name: base_name.into(),
            platforms: platforms.into_iter().collect(),
            source,
        }
    }
}

/// Outcome of one attempted output file.
#[derive(Debug)]
pub struct VariantResult {
    pub id: &'static str,
    pub width: u32,
    pub height: u32,
    pub path: PathBuf,
    pub outcome: Result<()>,
}

impl VariantResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&AssetError> {
        self.outcome.as_ref().err()
    }
}

/// Outcome of one platform.
#[derive(Debug)]
pub struct PlatformResult {
    /// Folder actually used, e.g. `Android (2)` on a repeated run.
    pub folder: Result<PathBuf>,
    /// Variants in catalog order; empty when the folder could not be created.
    pub variants: Vec<VariantResult>,
}

impl PlatformResult {
    pub fn variant(&self, id: &str) -> Option<&VariantResult> {
        self.variants.iter().find(|v| v.id == id)
    }

    pub fn is_success(&self) -> bool {
        self.folder.is_ok() && self.variants.iter().all(VariantResult::is_success)
    }
}

/// Everything a run attempted, successes and failures alike.
#[derive(Debug)]
pub struct GenerationResult {
    pub root: PathBuf,
    /// Effective base name after blank-name substitution.
    pub base_name: String,
    pub main: VariantResult,
    pub platforms: BTreeMap<Platform, PlatformResult>,
}

impl GenerationResult {
    pub fn platform(&self, platform: Platform) -> Option<&PlatformResult> {
        self.platforms.get(&platform)
    }

    pub fn variant(&self, platform: Platform, id: &str) -> Option<&VariantResult> {
        self.platform(platform)?.variant(id)
    }

    /// Variant selected by a quality tier, for previews.
    pub fn preview(&self, platform: Platform, tier: QualityTier) -> Option<&VariantResult> {
        self.variant(platform, tier.variant(platform).id)
    }

    /// All platform variants in generation order.
    pub fn variants(&self) -> impl Iterator<Item = (Platform, &VariantResult)> {
        self.platforms
            .iter()
            .flat_map(|(platform, result)| result.variants.iter().map(move |v| (*platform, v)))
    }

    pub fn failure_count(&self) -> usize {
        let main = usize::from(!self.main.is_success());
        let folders = self.platforms.values().filter(|p| p.folder.is_err()).count();
        let variants = self.variants().filter(|(_, v)| !v.is_success()).count();
        main + folders + variants
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Run a generation with the default transcoder.
pub fn generate(root: &Path, request: &GenerationRequest<'_>) -> Result<GenerationResult> {
    generate_with(&ImageTranscoder::default(), root, request)
}

/// Run a generation with a caller-supplied transcoder.
///
/// Only request validation and creation of `root` itself fail the whole
/// call. Every later failure is recorded in the returned result and work
/// continues with the next variant or platform.
pub fn generate_with<T>(
    transcoder: &T,
    root: &Path,
    request: &GenerationRequest<'_>,
) -> Result<GenerationResult>
where
    T: Transcoder + ?Sized,
{
    if request.platforms.is_empty() {
        return Err(AssetError::invalid_request("no target platform enabled"));
    }
    let source = request.source;
    source.validate()?;
    let base_name = resolve_base_name(&request.base_name);

    layout::ensure_root(root)?;
    info!(
        root = %root.display(),
        name = %base_name,
        width = source.width(),
        height = source.height(),
        "generating assets"
    );

    let main = write_main_copy(transcoder, root, &base_name, source);

    let mut platforms = BTreeMap::new();
    for &platform in &request.platforms {
        let result = generate_platform(transcoder, root, platform, &base_name, source);
        platforms.insert(platform, result);
    }

    Ok(GenerationResult {
        root: root.to_path_buf(),
        base_name,
        main,
        platforms,
    })
}

/// Trimmed, file-name-safe base name, or a generated identifier when blank.
pub fn resolve_base_name(raw: &str) -> String {
    let sanitized: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        generate_identifier()
    } else {
        sanitized
    }
}

/// Random identifier shaped like a version 4 UUID.
pub fn generate_identifier() -> String {
    let mut bytes: [u8; 16] = rand::random();
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

fn write_main_copy<T>(transcoder: &T, root: &Path, name: &str, source: &SourceImage) -> VariantResult
where
    T: Transcoder + ?Sized,
{
    let path = layout::main_copy_path(root, name);
    let (width, height) = source.dimensions();

    // PNG sources are copied verbatim; anything else is re-encoded to match the extension
    let outcome = match source.format() {
        Some(SourceFormat::Png) => layout::write_file(&path, source.bytes()),
        _ => transcoder
            .transcode(source.bytes(), OutputFormat::from_path(&path), width, height)
            .and_then(|bytes| layout::write_file(&path, &bytes)),
    };

    match &outcome {
        Ok(()) => debug!(path = %path.display(), "wrote main copy"),
        Err(e) => warn!(path = %path.display(), error = %e, "main copy failed"),
    }

    VariantResult {
        id: MAIN_VARIANT_ID,
        width,
        height,
        path,
        outcome,
    }
}

fn generate_platform<T>(
    transcoder: &T,
    root: &Path,
    platform: Platform,
    name: &str,
    source: &SourceImage,
) -> PlatformResult
where
    T: Transcoder + ?Sized,
{
    let dir = match layout::create_platform_dir(root, platform) {
        Ok(dir) => dir,
        Err(e) => {
            warn!(%platform, error = %e, "skipping platform, folder creation failed");
            return PlatformResult {
                folder: Err(e),
                variants: Vec::new(),
            };
        }
    };
    info!(%platform, folder = %dir.display(), "generating platform variants");

    let variants = platform
        .variants()
        .iter()
        .map(|spec| generate_variant(transcoder, &dir, spec, name, source))
        .collect();

    PlatformResult {
        folder: Ok(dir),
        variants,
    }
}

fn generate_variant<T>(
    transcoder: &T,
    platform_dir: &Path,
    spec: &VariantSpec,
    name: &str,
    source: &SourceImage,
) -> VariantResult
where
    T: Transcoder + ?Sized,
{
    let (width, height) = spec.resolve(source.width(), source.height());
    let path = layout::variant_path(platform_dir, spec, name);
    let format = OutputFormat::from_path(&path);

    let outcome = transcoder
        .transcode(source.bytes(), format, width, height)
        .and_then(|bytes| layout::write_file(&path, &bytes));

    match &outcome {
        Ok(()) => debug!(
            platform = %spec.platform,
            variant = spec.id,
            width,
            height,
            path = %path.display(),
            "wrote variant"
        ),
        Err(e) => warn!(
            platform = %spec.platform,
            variant = spec.id,
            error = %e,
            "variant failed"
        ),
    }

    VariantResult {
        id: spec.id,
        width,
        height,
        path,
        outcome,
    }
}
