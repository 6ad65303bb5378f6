//! Request and artifact types.
//!
//! Everything here is request-scoped: a [`SourceFile`] and its
//! [`ConversionRequest`] are constructed per user action and discarded once
//! the resulting [`ConversionOutcome`] has been handed off for delivery.

use crate::error::ConvertError;
use crate::format::{SourceKind, TargetFormat};
use std::path::Path;

/// An input file: name, declared content type, and byte content.
///
/// The content type is *declared*, not sniffed; see
/// [`SourceKind::from_mime`].
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, deriving the declared content type from its
    /// extension the way a browser fills in `File.type`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| ConvertError::Internal(format!("read {}: {e}", path.display())))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "input".to_string());
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = SourceKind::mime_for_extension(&ext).to_string();
        Ok(Self {
            name,
            content_type,
            bytes,
        })
    }

    /// The source kind derived from the declared content type.
    pub fn kind(&self) -> SourceKind {
        SourceKind::from_mime(&self.content_type)
    }
}

/// One conversion request: a source file plus the requested target format.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub source: SourceFile,
    pub target: TargetFormat,
}

impl ConversionRequest {
    pub fn new(source: SourceFile, target: TargetFormat) -> Self {
        Self { source, target }
    }
}

/// One produced output file: binary payload plus suggested filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl ConversionArtifact {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
        }
    }
}

/// The result of a dispatched conversion.
///
/// Single-output conversions yield [`ConversionOutcome::Single`];
/// PDF→image-archive yields [`ConversionOutcome::Pages`], one artifact per
/// page in page order, for the caller to archive together (see
/// [`crate::archive::package`]).
#[derive(Debug, Clone)]
pub enum ConversionOutcome {
    Single(ConversionArtifact),
    Pages(Vec<ConversionArtifact>),
}

impl ConversionOutcome {
    /// All artifacts in delivery order.
    pub fn artifacts(&self) -> &[ConversionArtifact] {
        match self {
            ConversionOutcome::Single(a) => std::slice::from_ref(a),
            ConversionOutcome::Pages(pages) => pages,
        }
    }
}

/// Replace the final extension of `name` with `ext` (adding one if absent).
///
/// Mirrors the original naming rule: `photo.png` → `photo.jpg`,
/// `notes` → `notes.pdf`.
pub(crate) fn replace_extension(name: &str, ext: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => format!("{stem}.{ext}"),
        _ => format!("{name}.{ext}"),
    }
}

/// Strip a trailing `.pdf` (case-insensitive) from a filename, for deriving
/// per-page and archive names.
pub(crate) fn pdf_basename(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        &name[..name.len() - 4]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_extension_swaps_last_suffix() {
        assert_eq!(replace_extension("photo.png", "jpg"), "photo.jpg");
        assert_eq!(replace_extension("a.b.c.txt", "pdf"), "a.b.c.pdf");
        assert_eq!(replace_extension("noext", "docx"), "noext.docx");
        // A leading dot is a hidden-file prefix, not an extension.
        assert_eq!(replace_extension(".bashrc", "txt"), ".bashrc.txt");
    }

    #[test]
    fn pdf_basename_strips_suffix() {
        assert_eq!(pdf_basename("report.pdf"), "report");
        assert_eq!(pdf_basename("Report.PDF"), "Report");
        assert_eq!(pdf_basename("notes.txt"), "notes.txt");
    }

    #[test]
    fn source_kind_follows_declared_type() {
        let file = SourceFile::new("actually_a_png.pdf", "image/png", vec![1, 2, 3]);
        // Declared type wins; the name and bytes are never inspected.
        assert_eq!(file.kind(), SourceKind::PngImage);
    }
}
