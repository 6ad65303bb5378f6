//! # fileconv
//!
//! Convert a file (image, PDF, or plain text) to another format, locally.
//!
//! Every conversion runs in-process against the file's bytes (raster
//! re-encoding, PDF rasterisation, text-layer extraction, text pagination,
//! DOCX packaging) with one exception: PDF→DOCX may be delegated to an
//! external conversion service, because faithful layout reconstruction is
//! beyond a text-layer reflow.
//!
//! ## Pipeline Overview
//!
//! ```text
//! (name, declared MIME type, bytes)
//!  │
//!  ├─ 1. Classify   declared type → SourceKind (pure lookup, no sniffing)
//!  ├─ 2. Catalog    SourceKind → ordered valid TargetFormats
//!  ├─ 3. Dispatch   (SourceKind, TargetFormat) → exactly one routine
//!  └─ 4. Deliver    artifact(s); multi-page results zip into one archive
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fileconv::{convert, package, ConversionConfig, ConversionRequest,
//!                SourceFile, TargetFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = SourceFile::from_path("report.pdf")?;
//!     let request = ConversionRequest::new(source, TargetFormat::ImageArchive);
//!     let outcome = convert(&request, &ConversionConfig::default()).await?;
//!     let artifact = package(outcome, "report.pdf")?;
//!     std::fs::write(&artifact.filename, &artifact.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `fileconv` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! fileconv = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod archive;
pub mod artifact;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use archive::{archive_name, package, zip_artifacts};
pub use artifact::{ConversionArtifact, ConversionOutcome, ConversionRequest, SourceFile};
pub use config::{
    ConversionConfig, ConversionConfigBuilder, PageGeometry, PdfToDocxMode,
    DEFAULT_REMOTE_BASE_URL, REMOTE_URL_ENV,
};
pub use convert::convert;
pub use error::ConvertError;
pub use format::{conversion_targets, SourceKind, TargetFormat, TargetOption};
