use anyhow::{Context, Result};
use asset_gen::{
    generate, preview, report::RunReport, GenerationRequest, GenerationResult, Platform,
    QualityTier, SourceImage,
};
use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[clap(
    name = "asset-gen",
    about = "Generate Android, iOS and Windows image assets from a single 4x source image"
)]
struct Args {
    /// Path to the source image (PNG or JPEG), treated as the 4x asset.
    #[clap(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = "./assets")]
    output: PathBuf,

    /// Base name of the generated files. A unique identifier is used when blank.
    #[clap(short, long, value_name = "NAME", default_value = "")]
    name: String,

    /// Generate Android drawable density buckets
    #[clap(long)]
    android: bool,

    /// Generate iOS @1x/@2x/@3x assets
    #[clap(long)]
    ios: bool,

    /// Generate Windows scale-100..scale-240 assets
    #[clap(long)]
    windows: bool,

    /// Print file info of the variant selected by this quality tier (low, medium, high)
    #[clap(long, value_name = "TIER")]
    preview: Option<QualityTier>,

    /// Write a JSON report of the run to this file
    #[clap(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[clap(short, long)]
    verbose: bool,
}

impl Args {
    /// Platforms selected on the command line; none selected means all of them.
    fn platforms(&self) -> Vec<Platform> {
        let selected: Vec<Platform> = [
            (self.android, Platform::Android),
            (self.ios, Platform::Ios),
            (self.windows, Platform::Windows),
        ]
        .into_iter()
        .filter_map(|(enabled, platform)| enabled.then_some(platform))
        .collect();

        if selected.is_empty() {
            Platform::ALL.to_vec()
        } else {
            selected
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "asset_gen=debug" } else { "asset_gen=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let source = SourceImage::open(&args.input)
        .with_context(|| format!("Failed to load image {}", args.input.display()))?;

    let request = GenerationRequest::new(args.name.clone(), args.platforms(), &source);
    let result = generate(&args.output, &request).context("Can't generate assets")?;

    print_result(&result);

    if let Some(tier) = args.preview {
        print_previews(&result, tier);
    }

    if let Some(path) = &args.report {
        RunReport::from(&result)
            .write(path)
            .context("Can't write run report")?;
        println!("✓ Wrote report {}", path.display());
    }

    if result.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{} output(s) failed", result.failure_count());
        Ok(ExitCode::FAILURE)
    }
}

fn print_result(result: &GenerationResult) {
    let relative = |path: &std::path::Path| {
        path.strip_prefix(&result.root)
            .unwrap_or(path)
            .display()
            .to_string()
    };

    match &result.main.outcome {
        Ok(()) => println!("✓ Generated {}", relative(&result.main.path)),
        Err(e) => println!("✗ {}: {e}", relative(&result.main.path)),
    }

    for (platform, outcome) in &result.platforms {
        match &outcome.folder {
            Ok(dir) => println!("Generating {platform} assets in {}...", relative(dir)),
            Err(e) => {
                println!("✗ {platform}: {e}");
                continue;
            }
        }

        for variant in &outcome.variants {
            match &variant.outcome {
                Ok(()) => println!(
                    "  ✓ Generated {} ({}x{})",
                    relative(&variant.path),
                    variant.width,
                    variant.height
                ),
                Err(e) => println!("  ✗ {} {}: {e}", platform, variant.id),
            }
        }
    }
}

fn print_previews(result: &GenerationResult, tier: QualityTier) {
    for platform in result.platforms.keys() {
        println!("\n{platform} ({tier} quality):");
        println!("{}", preview::describe(result.preview(*platform, tier)));
    }
}
