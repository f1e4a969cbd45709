//! The `harvest fetch` command.

use clap::{Args, ValueEnum};
use harvest_core::{
    Config, FetchEvent, Harvester, OutputFormat as CoreOutputFormat, OutputWriter,
    PipelineOutcome, UrlListDiscoverer,
};
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Report formats for accepted images.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    /// One "Downloaded: ..." line per image
    #[default]
    Text,
    /// Single JSON array
    Json,
    /// One JSON object per line
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => CoreOutputFormat::Text,
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Arguments for the `fetch` command.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Search keyword
    #[arg(required = true)]
    pub keyword: String,

    /// Number of images to keep
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,

    /// Candidate URL list, one per line ("-" reads stdin)
    #[arg(short, long, default_value = "-")]
    pub urls: String,

    /// Directory to write images into (overrides config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum concurrent downloads (overrides config)
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Minimum image width in pixels (overrides config)
    #[arg(long)]
    pub min_width: Option<u32>,

    /// Minimum image height in pixels (overrides config)
    #[arg(long)]
    pub min_height: Option<u32>,

    /// Per-download timeout in milliseconds (overrides config)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Execute the fetch command.
pub async fn execute(args: FetchArgs, config: Config) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args);
    let harvester = Harvester::new(config)?;
    let discoverer = UrlListDiscoverer::from_arg(&args.urls);

    let progress = create_progress_bar(args.count as u64, args.no_progress);
    let mut skipped: u64 = 0;
    let start_time = Instant::now();

    let outcome = harvester
        .fetch_images_with_progress(&discoverer, &args.keyword, args.count, |event| {
            match event {
                FetchEvent::Accepted(image) => {
                    progress.inc(1);
                    progress.set_message(image.filename.clone());
                }
                FetchEvent::Skipped { .. } | FetchEvent::Duplicate { .. } => {
                    skipped += 1;
                    progress.set_message(format!("{skipped} skipped"));
                }
            }
        })
        .await?;

    progress.finish_and_clear();

    write_report(&outcome, args.format)?;
    print_summary(&outcome, args.count, start_time.elapsed());

    if outcome.len() < args.count {
        tracing::warn!(
            "Only {} of {} requested images were accepted",
            outcome.len(),
            args.count
        );
    }

    Ok(())
}

/// Layer CLI flags over the loaded configuration.
fn apply_overrides(mut config: Config, args: &FetchArgs) -> Config {
    if let Some(dir) = &args.output_dir {
        let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
        config.general.download_dir = PathBuf::from(expanded);
    }
    if let Some(parallel) = args.parallel {
        config.fetch.parallel_workers = parallel;
    }
    if let Some(min_width) = args.min_width {
        config.quality.min_width = min_width;
    }
    if let Some(min_height) = args.min_height {
        config.quality.min_height = min_height;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.fetch.timeout_ms = timeout_ms;
    }
    config
}

/// Print accepted images to stdout in the requested format.
fn write_report(outcome: &PipelineOutcome, format: OutputFormat) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    OutputWriter::new(BufWriter::new(stdout.lock()), format.into(), true)
        .write_images(&outcome.images)?;
    Ok(())
}

/// Create a progress bar sized to the requested image count.
fn create_progress_bar(total: u64, hidden: bool) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    if hidden {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb.set_message("searching...");
    pb
}

/// Print a summary table to stderr.
fn print_summary(outcome: &PipelineOutcome, requested: usize, elapsed: Duration) {
    let stats = &outcome.stats;
    let mb = outcome.total_bytes() as f64 / 1_000_000.0;

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Accepted:     {:>8} / {}", outcome.len(), requested);
    eprintln!("    Candidates:   {:>8}", stats.submitted);
    if stats.download_failures > 0 {
        eprintln!("    Download err: {:>8}", stats.download_failures);
    }
    if stats.quality_rejections > 0 {
        eprintln!("    Too small:    {:>8}", stats.quality_rejections);
    }
    if stats.storage_failures > 0 {
        eprintln!("    Write err:    {:>8}", stats.storage_failures);
    }
    if stats.duplicates > 0 {
        eprintln!("    Duplicates:   {:>8}", stats.duplicates);
    }
    if stats.abandoned > 0 {
        eprintln!("    Not needed:   {:>8}", stats.abandoned);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Downloaded:   {:>8.1} MB", mb);
    eprintln!("    Duration:     {:>8.1}s", elapsed.as_secs_f64());
    eprintln!("  ====================================");
}
