//! The conversion dispatcher.
//!
//! One exhaustive match over (source kind, target format) selects exactly
//! one conversion routine: the routing table from the module docs of
//! [`crate::pipeline`]. Making the table explicit is the point: a pairing
//! outside it fails fast with [`ConvertError::InvalidPairing`] instead of
//! silently doing nothing, which is how the nested-conditional original
//! behaved when an unimplemented combination slipped through.
//!
//! The dispatcher owns no state and performs no retries; every routine
//! failure propagates to the caller unchanged, except for the optional
//! remote→local fallback on PDF→DOCX, which is an explicit config choice.

use crate::artifact::{ConversionArtifact, ConversionOutcome, ConversionRequest, SourceFile};
use crate::config::{ConversionConfig, PdfToDocxMode};
use crate::error::ConvertError;
use crate::format::{SourceKind, TargetFormat};
use crate::pipeline::{docx, extract, image, raster, remote, textpdf};
use tracing::{info, warn};

/// Convert one source file to the requested target format.
///
/// # Returns
/// [`ConversionOutcome::Single`] for every route except PDF→image-archive,
/// which yields [`ConversionOutcome::Pages`] (one PNG per page, page order).
/// Use [`crate::archive::package`] to collapse either into one deliverable.
///
/// # Errors
/// [`ConvertError::InvalidPairing`] when the target is not in the source
/// kind's catalog table; otherwise whatever the selected routine raised.
pub async fn convert(
    request: &ConversionRequest,
    config: &ConversionConfig,
) -> Result<ConversionOutcome, ConvertError> {
    let source = &request.source;
    let target = request.target;
    let kind = source.kind();
    info!("Converting '{}' ({}) → {}", source.name, kind, target);

    match (kind, target) {
        // ── Images ──────────────────────────────────────────────────────
        (k, TargetFormat::Png | TargetFormat::Jpg | TargetFormat::Webp) if k.is_image() => {
            let source = source.clone();
            let config = config.clone();
            let artifact = tokio::task::spawn_blocking(move || {
                image::transcode(&source, target, &config)
            })
            .await
            .map_err(|e| ConvertError::Internal(format!("transcode task panicked: {e}")))??;
            Ok(ConversionOutcome::Single(artifact))
        }
        (k, TargetFormat::Docx) if k.is_image() => {
            Ok(ConversionOutcome::Single(docx::image_notice_docx(source)?))
        }

        // ── PDF documents ───────────────────────────────────────────────
        (SourceKind::PdfDocument, TargetFormat::ImageArchive) => {
            Ok(ConversionOutcome::Pages(raster::rasterize(source, config).await?))
        }
        (SourceKind::PdfDocument, TargetFormat::Pdf) => Ok(identity(source)),
        (SourceKind::PdfDocument, TargetFormat::Docx) => {
            Ok(ConversionOutcome::Single(pdf_to_docx(source, config).await?))
        }

        // ── Plain text ──────────────────────────────────────────────────
        (SourceKind::PlainText, TargetFormat::Pdf) => {
            let source = source.clone();
            let config = config.clone();
            let artifact =
                tokio::task::spawn_blocking(move || textpdf::text_to_pdf(&source, &config))
                    .await
                    .map_err(|e| {
                        ConvertError::Internal(format!("pagination task panicked: {e}"))
                    })??;
            Ok(ConversionOutcome::Single(artifact))
        }
        (SourceKind::PlainText, TargetFormat::Docx) => {
            Ok(ConversionOutcome::Single(docx::text_to_docx(source)?))
        }
        (SourceKind::PlainText, TargetFormat::Txt) => Ok(identity(source)),

        // ── Everything else is outside the table ────────────────────────
        (source_kind, target) => Err(ConvertError::InvalidPairing {
            src: source_kind,
            target,
        }),
    }
}

/// Echo the original bytes unchanged under the unchanged name.
fn identity(source: &SourceFile) -> ConversionOutcome {
    ConversionOutcome::Single(ConversionArtifact::new(
        source.bytes.clone(),
        source.name.clone(),
    ))
}

/// PDF→DOCX routing per the configured mode.
async fn pdf_to_docx(
    source: &SourceFile,
    config: &ConversionConfig,
) -> Result<ConversionArtifact, ConvertError> {
    match config.pdf_to_docx {
        PdfToDocxMode::RemoteOnly => remote::pdf_to_docx(source, config).await,
        PdfToDocxMode::LocalOnly => extract_to_docx(source).await,
        PdfToDocxMode::LocalFallback => match remote::pdf_to_docx(source, config).await {
            Ok(artifact) => Ok(artifact),
            Err(ConvertError::Remote { status, message }) => {
                warn!(
                    "Remote conversion failed ({}), falling back to local text extraction",
                    status.map(|s| s.to_string()).unwrap_or_else(|| message.clone())
                );
                extract_to_docx(source).await
            }
            Err(other) => Err(other),
        },
    }
}

/// Local PDF→DOCX: text-layer extraction reflowed into a document.
async fn extract_to_docx(source: &SourceFile) -> Result<ConversionArtifact, ConvertError> {
    let pages = extract::extract_pages(source).await?;
    docx::pages_to_docx(&pages, &source.name)
}
