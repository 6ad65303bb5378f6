//! DOCX packaging: assemble paragraph blocks into a Word container.
//!
//! Three producers feed this module: plain-text files (one paragraph per
//! line), extracted PDF text (one paragraph per page, page breaks between),
//! and the image placeholder (a fixed notice: the image's visual content is
//! *not* embedded, and the output says so).

use crate::artifact::{replace_extension, ConversionArtifact, SourceFile};
use crate::error::ConvertError;
use crate::format::TargetFormat;
use docx_rs::{BreakType, Docx, LineSpacing, Paragraph, Run};
use std::io::Cursor;
use tracing::info;

/// Convert a UTF-8 text file: one paragraph per input line.
///
/// Lines are trimmed; blank lines become a single-space paragraph so vertical
/// rhythm survives the round trip into Word.
pub fn text_to_docx(source: &SourceFile) -> Result<ConversionArtifact, ConvertError> {
    let text = String::from_utf8_lossy(&source.bytes);
    let mut docx = Docx::new();

    for line in text.replace("\r\n", "\n").split('\n') {
        let content = line.trim();
        let content = if content.is_empty() { " " } else { content };
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(content))
                .line_spacing(LineSpacing::new().line(360)),
        );
    }

    pack(docx, &source.name)
}

/// Assemble extracted per-page text blocks into one document.
///
/// A page-break paragraph separates consecutive pages (never trailing), so
/// the source PDF's page count stays visible in the output.
pub fn pages_to_docx(
    pages: &[String],
    source_name: &str,
) -> Result<ConversionArtifact, ConvertError> {
    let mut docx = Docx::new();

    for (idx, page_text) in pages.iter().enumerate() {
        if idx > 0 {
            docx = docx.add_paragraph(
                Paragraph::new().add_run(Run::new().add_break(BreakType::Page)),
            );
        }
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(page_text.as_str())));
    }

    info!(
        "Packaged {} extracted page(s) into {}",
        pages.len(),
        replace_extension(source_name, "docx")
    );
    pack(docx, source_name)
}

/// Textual placeholder for image → docx: the source filename plus a notice
/// that the pixels themselves are not carried over.
pub fn image_notice_docx(source: &SourceFile) -> Result<ConversionArtifact, ConvertError> {
    let docx = Docx::new()
        .add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("Image converted to Word document").bold()),
        )
        .add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(format!("Source file: {}", source.name))),
        )
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(
            "The image is not embedded visually; this is a text-only conversion.",
        )));

    pack(docx, &source.name)
}

/// Serialise and name the container.
fn pack(docx: Docx, source_name: &str) -> Result<ConversionArtifact, ConvertError> {
    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ConvertError::Encode {
            format: TargetFormat::Docx,
            detail: e.to_string(),
        })?;

    let bytes = buf.into_inner();
    if bytes.is_empty() {
        return Err(ConvertError::Encode {
            format: TargetFormat::Docx,
            detail: "packager produced an empty container".into(),
        });
    }

    Ok(ConversionArtifact::new(
        bytes,
        replace_extension(source_name, TargetFormat::Docx.extension()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    /// Pull `word/document.xml` out of a packed DOCX.
    fn document_xml(bytes: &[u8]) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip container");
        let mut file = archive
            .by_name("word/document.xml")
            .expect("document part present");
        let mut xml = String::new();
        file.read_to_string(&mut xml).unwrap();
        xml
    }

    #[test]
    fn text_lines_become_paragraphs() {
        let source = SourceFile::new("notes.txt", "text/plain", b"alpha\nbeta".to_vec());
        let artifact = text_to_docx(&source).unwrap();
        assert_eq!(artifact.filename, "notes.docx");

        let xml = document_xml(&artifact.bytes);
        assert!(xml.contains("alpha"));
        assert!(xml.contains("beta"));
    }

    #[test]
    fn single_page_has_no_break() {
        let artifact = pages_to_docx(&["Hello world".to_string()], "doc.pdf").unwrap();
        let xml = document_xml(&artifact.bytes);
        assert!(xml.contains("Hello world"));
        assert!(!xml.contains("w:type=\"page\""), "unexpected page break");
    }

    #[test]
    fn breaks_sit_between_pages_not_after() {
        let pages = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        let artifact = pages_to_docx(&pages, "doc.pdf").unwrap();
        let xml = document_xml(&artifact.bytes);
        assert_eq!(xml.matches("w:type=\"page\"").count(), 2);
    }

    #[test]
    fn image_notice_names_the_source() {
        let source = SourceFile::new("photo.webp", "image/webp", vec![0; 4]);
        let artifact = image_notice_docx(&source).unwrap();
        assert_eq!(artifact.filename, "photo.docx");

        let xml = document_xml(&artifact.bytes);
        assert!(xml.contains("photo.webp"));
        assert!(xml.contains("not embedded"));
    }
}
