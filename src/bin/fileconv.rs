//! CLI binary for fileconv.
//!
//! A thin shim over the library crate: classify the input, list or pick a
//! target format, run the dispatcher, write the deliverable to disk.

use anyhow::{bail, Context, Result};
use clap::Parser;
use fileconv::{
    conversion_targets, convert, package, ConversionConfig, ConversionRequest, PdfToDocxMode,
    SourceFile, TargetFormat,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Show which targets this file can convert to
  fileconv photo.png --list

  # Re-encode an image (default target = first catalog entry)
  fileconv photo.png --to webp

  # Every PDF page as a PNG, zipped
  fileconv report.pdf --to image-archive

  # Plain text to a paginated PDF
  fileconv notes.txt --to pdf

  # PDF to Word via the remote service, falling back to local extraction
  fileconv report.pdf --to docx --pdf-to-docx fallback

ENVIRONMENT VARIABLES:
  FILECONV_REMOTE_URL   Base URL of the PDF→DOCX conversion service
                        (default: http://127.0.0.1:8000)
  PDFIUM_LIB_PATH       Path to an existing libpdfium shared library

The declared input type is inferred from the file extension, exactly as a
browser fills in File.type. A mislabelled extension means a misclassified
file; bytes are never sniffed.
"#;

/// Convert images, PDFs, and plain-text files between formats locally.
#[derive(Parser, Debug)]
#[command(
    name = "fileconv",
    version,
    about = "Convert images, PDFs, and plain-text files between formats locally",
    long_about = "Convert a local file to another format. Images re-encode in process; PDFs \
rasterise to per-page PNGs or echo unchanged; plain text paginates into PDF or DOCX. Only \
PDF→DOCX may leave the machine, to a configurable conversion service.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input file path.
    input: PathBuf,

    /// Target format. Defaults to the first catalog entry for the input kind.
    #[arg(short, long, value_enum)]
    to: Option<TargetArg>,

    /// Directory for the output file. Defaults to the current directory.
    #[arg(short, long, env = "FILECONV_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// List the valid target formats for this input and exit.
    #[arg(long)]
    list: bool,

    /// Emit --list output as JSON.
    #[arg(long)]
    json: bool,

    /// Base URL of the remote PDF→DOCX conversion service.
    #[arg(long, env = "FILECONV_REMOTE_URL")]
    remote_url: Option<String>,

    /// PDF→DOCX routing: remote, fallback, or local.
    #[arg(long, value_enum, default_value = "remote")]
    pdf_to_docx: ModeArg,

    /// Upscale factor for PDF page rasterisation (1.0–4.0).
    #[arg(long, default_value_t = 2.0)]
    scale: f32,

    /// Remote conversion timeout in seconds.
    #[arg(long, env = "FILECONV_REMOTE_TIMEOUT", default_value_t = 120)]
    remote_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FILECONV_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "FILECONV_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum TargetArg {
    Png,
    Jpg,
    Webp,
    Pdf,
    ImageArchive,
    Txt,
    Docx,
}

impl From<TargetArg> for TargetFormat {
    fn from(v: TargetArg) -> Self {
        match v {
            TargetArg::Png => TargetFormat::Png,
            TargetArg::Jpg => TargetFormat::Jpg,
            TargetArg::Webp => TargetFormat::Webp,
            TargetArg::Pdf => TargetFormat::Pdf,
            TargetArg::ImageArchive => TargetFormat::ImageArchive,
            TargetArg::Txt => TargetFormat::Txt,
            TargetArg::Docx => TargetFormat::Docx,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Remote,
    Fallback,
    Local,
}

impl From<ModeArg> for PdfToDocxMode {
    fn from(v: ModeArg) -> Self {
        match v {
            ModeArg::Remote => PdfToDocxMode::RemoteOnly,
            ModeArg::Fallback => PdfToDocxMode::LocalFallback,
            ModeArg::Local => PdfToDocxMode::LocalOnly,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Classify ─────────────────────────────────────────────────────────
    let source = SourceFile::from_path(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let kind = source.kind();
    let targets = conversion_targets(kind);

    // ── List mode ────────────────────────────────────────────────────────
    if cli.list {
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(targets).context("Failed to serialise targets")?
            );
        } else if targets.is_empty() {
            println!("{} ({kind}): no conversions available", source.name);
        } else {
            println!("{} ({kind}):", source.name);
            for option in targets {
                println!("  {}  {:<14} {}", option.icon, option.format, option.label);
            }
        }
        return Ok(());
    }

    if targets.is_empty() {
        bail!(
            "'{}' has unrecognised type '{}'; nothing to convert to",
            source.name,
            source.content_type
        );
    }

    // No --to: the catalog's first entry is the default selection.
    let target: TargetFormat = cli
        .to
        .map(Into::into)
        .unwrap_or_else(|| targets[0].format);

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ConversionConfig::builder()
        .render_scale(cli.scale)
        .pdf_to_docx(cli.pdf_to_docx.into())
        .remote_timeout_secs(cli.remote_timeout);
    if let Some(ref url) = cli.remote_url {
        builder = builder.remote_base_url(url.clone());
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run the conversion ───────────────────────────────────────────────
    // One conversion is in flight at a time; the spinner is the visible
    // "converting" state while it runs.
    let spinner = if cli.quiet {
        None
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Converting {} → {target}…", source.name));
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    };

    let source_name = source.name.clone();
    let request = ConversionRequest::new(source, target);
    let result = convert(&request, &config).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let outcome = result.with_context(|| format!("Conversion of '{source_name}' failed"))?;
    let page_count = match &outcome {
        fileconv::ConversionOutcome::Pages(pages) => Some(pages.len()),
        fileconv::ConversionOutcome::Single(_) => None,
    };
    let artifact = package(outcome, &source_name).context("Failed to package output")?;

    // ── Deliver ──────────────────────────────────────────────────────────
    let out_dir = cli.output_dir.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let out_path = out_dir.join(&artifact.filename);
    std::fs::File::create(&out_path)
        .and_then(|mut f| f.write_all(&artifact.bytes))
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    if !cli.quiet {
        let detail = match page_count {
            Some(n) => format!("{n} page(s), {} bytes", artifact.bytes.len()),
            None => format!("{} bytes", artifact.bytes.len()),
        };
        eprintln!(
            "{}  {}  {}",
            green("✔"),
            bold(&out_path.display().to_string()),
            dim(&detail),
        );
    }

    Ok(())
}
