//! Error types for the fileconv library.
//!
//! A single fatal error enum: every routine-level failure propagates up to
//! the dispatcher uncaught, and the dispatcher performs no local recovery or
//! retry. Multi-artifact conversions have no partial-success mode: one bad
//! page fails the whole request, because the caller is handed one archive,
//! not per-page results.
//!
//! The variants deliberately distinguish the failure classes a caller can
//! react to (undecodable input vs. a failed remote delegation, say) instead
//! of collapsing everything into one generic "conversion failed" signal.

use crate::format::{SourceKind, TargetFormat};
use thiserror::Error;

/// All errors returned by the fileconv library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Codec errors ──────────────────────────────────────────────────────
    /// The source bytes could not be decoded as their declared kind.
    #[error("could not decode '{name}' as {kind}: {detail}")]
    Decode {
        name: String,
        kind: SourceKind,
        detail: String,
    },

    /// An encoder ran but produced no usable payload.
    #[error("{format} encoder produced no output: {detail}")]
    Encode {
        format: TargetFormat,
        detail: String,
    },

    /// A single PDF page failed to rasterise. Fails the whole operation.
    #[error("rasterisation failed for page {page}: {detail}")]
    PageRender { page: usize, detail: String },

    // ── Dispatch errors ───────────────────────────────────────────────────
    /// The requested (source, target) pairing is outside the dispatch table.
    ///
    /// This is a programming/UI error, not a recoverable runtime condition;
    /// the dispatcher fails fast rather than silently doing nothing.
    #[error("no conversion from {src} to {target}")]
    InvalidPairing {
        // NB: thiserror treats any field literally named `source` as the error
        // source (requiring `impl std::error::Error`); this is a plain display
        // field, so it is named `src`.
        src: SourceKind,
        target: TargetFormat,
    },

    // ── Remote delegation errors ──────────────────────────────────────────
    /// The external conversion service returned a failure or was unreachable.
    ///
    /// `status` is `None` when no HTTP response was received at all
    /// (connection refused, timeout). `message` carries the response body
    /// when there was one; the service reports its own diagnostics there.
    #[error("remote conversion failed{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Remote {
        status: Option<u16>,
        message: String,
    },

    // ── Packaging errors ──────────────────────────────────────────────────
    /// The zip archive of a multi-artifact result could not be written.
    #[error("failed to package archive: {0}")]
    Archive(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "failed to bind to pdfium library: {0}\n\
         Install libpdfium and set PDFIUM_LIB_PATH, or place the shared \
         library next to the executable."
    )]
    PdfiumBinding(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}
