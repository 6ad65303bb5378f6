//! Archive packaging for multi-artifact outcomes.
//!
//! A PDF→image-archive conversion produces one PNG per page; delivery hands
//! the user a single zip, named by replacing the source's `.pdf` suffix with
//! `_images.zip`. Entries keep artifact order, which is page order.

use crate::artifact::{pdf_basename, ConversionArtifact, ConversionOutcome};
use crate::error::ConvertError;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Zip an ordered artifact sequence into a single payload.
pub fn zip_artifacts(artifacts: &[ConversionArtifact]) -> Result<Vec<u8>, ConvertError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for artifact in artifacts {
        writer
            .start_file(artifact.filename.as_str(), options)
            .map_err(|e| ConvertError::Archive(e.to_string()))?;
        writer
            .write_all(&artifact.bytes)
            .map_err(|e| ConvertError::Archive(e.to_string()))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| ConvertError::Archive(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Archive name derived from the source filename: `report.pdf` →
/// `report_images.zip`.
pub fn archive_name(source_name: &str) -> String {
    format!("{}_images.zip", pdf_basename(source_name))
}

/// Collapse an outcome to exactly one deliverable artifact, zipping
/// multi-artifact outcomes.
pub fn package(
    outcome: ConversionOutcome,
    source_name: &str,
) -> Result<ConversionArtifact, ConvertError> {
    match outcome {
        ConversionOutcome::Single(artifact) => Ok(artifact),
        ConversionOutcome::Pages(pages) => {
            let bytes = zip_artifacts(&pages)?;
            Ok(ConversionArtifact::new(bytes, archive_name(source_name)))
        }
    }
}
