//! Source-kind classification and the target-format catalog.
//!
//! Classification is a pure lookup over the *declared* content type; the
//! bytes are never sniffed. A mislabelled file is therefore misclassified
//! silently, matching what a browser's `File.type` gives you; content
//! sniffing would change observable behaviour and is deliberately not done.
//!
//! The catalog is the single source of truth for which targets a source kind
//! may convert to, in a fixed order. Callers use the first entry as the
//! default selection, so the order is part of the contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The recognised category of an input file, derived once from its declared
/// MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    PngImage,
    JpegImage,
    WebpImage,
    PdfDocument,
    PlainText,
    /// Anything with an unrecognised declared type. Converts to nothing.
    Unknown,
}

impl SourceKind {
    /// Classify a declared content-type string.
    ///
    /// Closed lookup table; unrecognised types map to [`SourceKind::Unknown`].
    pub fn from_mime(content_type: &str) -> Self {
        match content_type {
            "image/png" => SourceKind::PngImage,
            "image/jpeg" => SourceKind::JpegImage,
            "image/webp" => SourceKind::WebpImage,
            "application/pdf" => SourceKind::PdfDocument,
            "text/plain" => SourceKind::PlainText,
            _ => SourceKind::Unknown,
        }
    }

    /// The declared MIME type a file extension implies, the way a browser
    /// derives `File.type` from the file name.
    pub fn mime_for_extension(ext: &str) -> &'static str {
        match ext.to_ascii_lowercase().as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "webp" => "image/webp",
            "pdf" => "application/pdf",
            "txt" => "text/plain",
            _ => "application/octet-stream",
        }
    }

    /// True for the three raster-image kinds.
    pub fn is_image(self) -> bool {
        matches!(
            self,
            SourceKind::PngImage | SourceKind::JpegImage | SourceKind::WebpImage
        )
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::PngImage => "image/png",
            SourceKind::JpegImage => "image/jpeg",
            SourceKind::WebpImage => "image/webp",
            SourceKind::PdfDocument => "application/pdf",
            SourceKind::PlainText => "text/plain",
            SourceKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// The requested output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetFormat {
    Png,
    Jpg,
    Webp,
    Pdf,
    /// One PNG per PDF page, delivered together as a zip archive.
    ImageArchive,
    Txt,
    Docx,
}

impl TargetFormat {
    /// File extension used when deriving output filenames.
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Png => "png",
            TargetFormat::Jpg => "jpg",
            TargetFormat::Webp => "webp",
            TargetFormat::Pdf => "pdf",
            TargetFormat::ImageArchive => "zip",
            TargetFormat::Txt => "txt",
            TargetFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetFormat::Png => "png",
            TargetFormat::Jpg => "jpg",
            TargetFormat::Webp => "webp",
            TargetFormat::Pdf => "pdf",
            TargetFormat::ImageArchive => "image-archive",
            TargetFormat::Txt => "txt",
            TargetFormat::Docx => "docx",
        };
        f.write_str(s)
    }
}

/// One selectable conversion target with its display metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetOption {
    pub format: TargetFormat,
    pub label: &'static str,
    pub icon: &'static str,
}

const IMAGE_TARGETS: &[TargetOption] = &[
    TargetOption { format: TargetFormat::Png, label: "PNG", icon: "🖼️" },
    TargetOption { format: TargetFormat::Jpg, label: "JPG", icon: "📷" },
    TargetOption { format: TargetFormat::Webp, label: "WebP", icon: "🌐" },
    TargetOption { format: TargetFormat::Pdf, label: "PDF", icon: "📄" },
    TargetOption { format: TargetFormat::Docx, label: "Word (DOCX)", icon: "📘" },
];

const PDF_TARGETS: &[TargetOption] = &[
    TargetOption { format: TargetFormat::ImageArchive, label: "Images (ZIP)", icon: "🗜️" },
    TargetOption { format: TargetFormat::Pdf, label: "PDF", icon: "📄" },
    TargetOption { format: TargetFormat::Docx, label: "Word (DOCX)", icon: "📘" },
];

const TEXT_TARGETS: &[TargetOption] = &[
    TargetOption { format: TargetFormat::Pdf, label: "PDF", icon: "📄" },
    TargetOption { format: TargetFormat::Docx, label: "Word (DOCX)", icon: "📘" },
    TargetOption { format: TargetFormat::Txt, label: "Text (TXT)", icon: "📝" },
];

/// The ordered set of targets a source kind may convert to.
///
/// Order is stable and deterministic; the first entry is the default
/// selection. [`SourceKind::Unknown`] yields an empty slice.
pub fn conversion_targets(kind: SourceKind) -> &'static [TargetOption] {
    match kind {
        SourceKind::PngImage | SourceKind::JpegImage | SourceKind::WebpImage => IMAGE_TARGETS,
        SourceKind::PdfDocument => PDF_TARGETS,
        SourceKind::PlainText => TEXT_TARGETS,
        SourceKind::Unknown => &[],
    }
}
