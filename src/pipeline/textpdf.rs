//! Plain text → PDF: paginate, then write the PDF container directly.
//!
//! The container is assembled with `lopdf`: one content stream per page,
//! the Helvetica Type1 base font with WinAnsi encoding, and text placed line
//! by line from the top margin down. No font embedding: Helvetica is one of
//! the base-14 fonts every reader supplies.

use crate::artifact::{replace_extension, ConversionArtifact, SourceFile};
use crate::config::{ConversionConfig, PageGeometry};
use crate::error::ConvertError;
use crate::format::TargetFormat;
use crate::pipeline::paginate::{paginate, HelveticaMetrics, MM_PER_PT};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Cursor;
use tracing::info;

const PT_PER_MM: f32 = 1.0 / MM_PER_PT;

/// Convert a UTF-8 text file into a paginated PDF.
pub fn text_to_pdf(
    source: &SourceFile,
    config: &ConversionConfig,
) -> Result<ConversionArtifact, ConvertError> {
    let text = String::from_utf8_lossy(&source.bytes);
    let pages = paginate(&text, &config.geometry, &HelveticaMetrics);
    info!(
        "Paginated {} → {} page(s) of text",
        source.name,
        pages.len()
    );

    let bytes = build_document(&pages, &config.geometry)?;
    Ok(ConversionArtifact::new(
        bytes,
        replace_extension(&source.name, TargetFormat::Pdf.extension()),
    ))
}

/// Serialise pages of wrapped lines into a PDF document.
pub(crate) fn build_document(
    pages: &[Vec<String>],
    geometry: &PageGeometry,
) -> Result<Vec<u8>, ConvertError> {
    let encode_err = |detail: String| ConvertError::Encode {
        format: TargetFormat::Pdf,
        detail,
    };

    let width_pt = geometry.page_width_mm * PT_PER_MM;
    let height_pt = geometry.page_height_mm * PT_PER_MM;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for lines in pages {
        let mut operations = Vec::with_capacity(lines.len() * 5 + 2);
        let mut y_mm = geometry.margin_mm;
        for line in lines {
            if !line.is_empty() {
                // PDF user space is bottom-up; the cursor tracks top-down mm.
                let x_pt = geometry.margin_mm * PT_PER_MM;
                let y_pt = (geometry.page_height_mm - y_mm) * PT_PER_MM;
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec!["F1".into(), Object::Real(geometry.font_size_pt)],
                ));
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Real(x_pt), Object::Real(y_pt)],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_win_ansi(line))],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            y_mm += geometry.line_height_mm;
        }

        let content = Content { operations };
        let stream = Stream::new(
            dictionary! {},
            content.encode().map_err(|e| encode_err(e.to_string()))?,
        );
        let content_id = doc.add_object(stream);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(width_pt),
                Object::Real(height_pt),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buf = Cursor::new(Vec::new());
    doc.save_to(&mut buf)
        .map_err(|e| encode_err(e.to_string()))?;
    let bytes = buf.into_inner();
    if bytes.is_empty() {
        return Err(encode_err("writer produced an empty document".into()));
    }
    Ok(bytes)
}

/// Map a line to WinAnsi bytes: ASCII and Latin-1 pass through, a few common
/// typographic characters get their WinAnsi slots, everything else becomes
/// `?`.
fn encode_win_ansi(line: &str) -> Vec<u8> {
    line.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E => c as u8,
            0xA0..=0xFF => c as u8,
            _ => match c {
                '€' => 0x80,
                '‚' => 0x82,
                '„' => 0x84,
                '…' => 0x85,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '™' => 0x99,
                _ => b'?',
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::paginate::lines_per_page;

    fn text_source(text: &str, name: &str) -> SourceFile {
        SourceFile::new(name, "text/plain", text.as_bytes().to_vec())
    }

    #[test]
    fn output_parses_and_has_expected_page_count() {
        let config = ConversionConfig::default();
        let n = lines_per_page(&config.geometry);
        let text = vec!["line"; n + 1].join("\n");

        let artifact = text_to_pdf(&text_source(&text, "notes.txt"), &config).unwrap();
        assert_eq!(artifact.filename, "notes.pdf");

        let doc = Document::load_mem(&artifact.bytes).expect("generated PDF must parse");
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn single_short_text_is_one_page() {
        let config = ConversionConfig::default();
        let artifact = text_to_pdf(&text_source("Hello world", "hi.txt"), &config).unwrap();
        let doc = Document::load_mem(&artifact.bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn empty_text_still_produces_a_one_page_document() {
        let config = ConversionConfig::default();
        let artifact = text_to_pdf(&text_source("", "empty.txt"), &config).unwrap();
        let doc = Document::load_mem(&artifact.bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn win_ansi_passthrough_and_fallback() {
        assert_eq!(encode_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("日本"), vec![b'?', b'?']);
        assert_eq!(encode_win_ansi("€"), vec![0x80]);
    }
}
