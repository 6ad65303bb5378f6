//! PDF text-layer extraction.
//!
//! Pulls each page's text runs out of the pdfium text layer and normalises
//! them for reflow into a document format: whitespace runs collapse to
//! single spaces and the result is trimmed. A page with no extractable text
//! yields a fixed placeholder so page count and boundaries stay visible in
//! the output document.

use crate::artifact::SourceFile;
use crate::error::ConvertError;
use crate::pipeline::bind_pdfium;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

/// Placeholder paragraph for a page whose text layer is empty.
pub const EMPTY_PAGE_PLACEHOLDER: &str = "No text was detected on this page.";

/// Extract one normalised text block per page, in page order.
pub async fn extract_pages(source: &SourceFile) -> Result<Vec<String>, ConvertError> {
    let name = source.name.clone();
    let kind = source.kind();
    let bytes = source.bytes.clone();

    tokio::task::spawn_blocking(move || extract_pages_blocking(&name, kind, &bytes))
        .await
        .map_err(|e| ConvertError::Internal(format!("extract task panicked: {e}")))?
}

fn extract_pages_blocking(
    name: &str,
    kind: crate::format::SourceKind,
    bytes: &[u8],
) -> Result<Vec<String>, ConvertError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| ConvertError::Decode {
            name: name.to_string(),
            kind,
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    let mut blocks = Vec::with_capacity(pages.len() as usize);

    for (idx, page) in pages.iter().enumerate() {
        let raw = page
            .text()
            .map(|t| t.all())
            .map_err(|e| ConvertError::PageRender {
                page: idx + 1,
                detail: format!("text layer: {e:?}"),
            })?;

        let text = collapse_whitespace(&raw);
        debug!("Page {}: {} chars extracted", idx + 1, text.len());

        if text.is_empty() {
            blocks.push(EMPTY_PAGE_PLACEHOLDER.to_string());
        } else {
            blocks.push(text);
        }
    }

    info!("Extracted text from {} page(s) of {}", blocks.len(), name);
    Ok(blocks)
}

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(input: &str) -> String {
    RE_WHITESPACE.replace_all(input, " ").trim().to_string()
}
