use anyhow::Context;
use clap::Parser;
use digit_locator::error::ErrorResponse;
use digit_locator::locator::BoxReport;
use digit_locator::preprocessing::StepTiming;
use digit_locator::{ColorFrame, CoordinateSpace, Locator, LocatorConfig, LocatorError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "digit-locator")]
#[command(about = "Locate handwritten digits in a photo and cut them into classifier-ready glyphs")]
#[command(version)]
pub struct Args {
    /// Image file to process (any format the image crate decodes)
    pub image: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(long, env = "DIGIT_LOCATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Fraction of the width removed from each side before processing
    #[arg(long, env = "DIGIT_LOCATOR_CROP_FRACTION")]
    pub crop_fraction: Option<f32>,

    /// Upper bound on the removed side margin in pixels
    #[arg(long, env = "DIGIT_LOCATOR_MAX_MARGIN")]
    pub max_margin: Option<u32>,

    /// Gaussian kernel size (odd, 1 disables smoothing)
    #[arg(long)]
    pub blur_kernel: Option<u32>,

    /// Adaptive threshold window size (odd)
    #[arg(long)]
    pub block_size: Option<u32>,

    /// Adaptive threshold bias
    #[arg(long)]
    pub bias: Option<f32>,

    /// Minimum cohesion ratio for a group of boxes
    #[arg(long)]
    pub cohesion: Option<f32>,

    /// Side length of the canonical glyph square
    #[arg(long)]
    pub glyph_size: Option<u32>,

    /// Coordinate space of reported boxes (cropped, original, normalized)
    #[arg(long, default_value = "original")]
    pub coordinates: String,

    /// Directory to write glyph_NN.png files into
    #[arg(long)]
    pub glyph_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Layer flag overrides on top of the config file (or the defaults)
    fn locator_config(&self) -> anyhow::Result<LocatorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                LocatorConfig::from_json(&json)?
            }
            None => LocatorConfig::default(),
        };

        if let Some(v) = self.crop_fraction {
            config.crop.margin_fraction = v;
        }
        if self.max_margin.is_some() {
            config.crop.max_margin = self.max_margin;
        }
        if let Some(v) = self.blur_kernel {
            config.binarize.blur_kernel = v;
        }
        if let Some(v) = self.block_size {
            config.binarize.block_size = v;
        }
        if let Some(v) = self.bias {
            config.binarize.bias = v;
        }
        if let Some(v) = self.cohesion {
            config.grouping.cohesion_threshold = v;
        }
        if let Some(v) = self.glyph_size {
            config.glyph.size = v;
        }
        Ok(config)
    }
}

/// JSON report printed on success
#[derive(Serialize)]
struct LocateReport {
    count: usize,
    #[serde(flatten)]
    boxes: BoxReport,
    crop_offset: u32,
    original_width: u32,
    original_height: u32,
    cropped_width: u32,
    cropped_height: u32,
    total_time_ms: u64,
    steps: Vec<StepTiming>,
    glyph_files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&args) {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            let body = match err.downcast_ref::<LocatorError>() {
                Some(locator_err) => ErrorResponse::from(locator_err),
                None => ErrorResponse {
                    error: format!("{:#}", err),
                    code: "INTERNAL_ERROR".to_string(),
                },
            };
            tracing::error!("{}", body.error);
            eprintln!(
                "{}",
                serde_json::to_string(&body).unwrap_or_else(|_| body.error.clone())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<String> {
    let space = CoordinateSpace::from_str(&args.coordinates).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown coordinate space '{}' (expected cropped, original or normalized)",
            args.coordinates
        )
    })?;
    let locator = Locator::new(args.locator_config()?)?;

    tracing::info!(
        "Starting digit-locator v{} on {}",
        env!("CARGO_PKG_VERSION"),
        args.image.display()
    );

    let image = image::open(&args.image)
        .with_context(|| format!("Failed to load image {}", args.image.display()))?
        .to_rgb8();
    let frame = ColorFrame::from(image);

    let result = locator.locate(&frame)?;
    if result.is_empty() {
        tracing::info!("No digit-like shapes found");
    } else {
        tracing::info!(
            "Located {} digits in {}ms",
            result.len(),
            result.total_time_ms
        );
    }

    let glyph_files = match &args.glyph_dir {
        Some(dir) => write_glyphs(dir, &result)?,
        None => Vec::new(),
    };

    let report = LocateReport {
        count: result.len(),
        boxes: result.boxes_in(space),
        crop_offset: result.crop_offset,
        original_width: result.original_width,
        original_height: result.original_height,
        cropped_width: result.cropped_width,
        cropped_height: result.cropped_height,
        total_time_ms: result.total_time_ms,
        steps: result.steps.clone(),
        glyph_files,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn write_glyphs(dir: &Path, result: &digit_locator::Localization) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create glyph directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(result.len());
    for (i, glyph) in result.glyphs().enumerate() {
        let path = dir.join(format!("glyph_{:02}.png", i));
        glyph
            .to_gray_image()
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
