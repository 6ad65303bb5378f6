//! PDF rasterisation: one PNG artifact per page via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a dedicated
//! blocking-pool thread so the async workers never stall during CPU-heavy
//! rendering.
//!
//! Pages rasterise sequentially (pdfium holds the document), but each
//! rendered surface is PNG-encoded concurrently once pdfium is done with it.
//! Output order is fixed by page index, not completion order.

use crate::artifact::{pdf_basename, ConversionArtifact, SourceFile};
use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::pipeline::{bind_pdfium, image::encode_png};
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info};

/// Rasterise every page of a PDF into PNG artifacts named
/// `{basename}_page_{i}.png`, i from 1, in page order.
///
/// A parse failure is a decode error; any single page's render failure fails
/// the whole operation; the caller delivers one archive, not partial
/// results.
pub async fn rasterize(
    source: &SourceFile,
    config: &ConversionConfig,
) -> Result<Vec<ConversionArtifact>, ConvertError> {
    let name = source.name.clone();
    let kind = source.kind();
    let bytes = source.bytes.clone();
    let scale = config.render_scale;

    let surfaces = tokio::task::spawn_blocking(move || render_all_pages(&name, kind, &bytes, scale))
        .await
        .map_err(|e| ConvertError::Internal(format!("render task panicked: {e}")))??;

    let basename = pdf_basename(&source.name).to_string();
    let encodes = surfaces.into_iter().enumerate().map(|(idx, surface)| {
        let filename = format!("{basename}_page_{}.png", idx + 1);
        tokio::task::spawn_blocking(move || {
            encode_png(&surface).map(|bytes| ConversionArtifact::new(bytes, filename))
        })
    });

    // try_join_all preserves input order, so artifacts stay in page order
    // regardless of which encode finishes first.
    let artifacts = futures::future::try_join_all(encodes)
        .await
        .map_err(|e| ConvertError::Internal(format!("encode task panicked: {e}")))?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        "Rasterised {} → {} page artifact(s)",
        source.name,
        artifacts.len()
    );
    Ok(artifacts)
}

/// Blocking implementation: load the document and render each page at the
/// configured upscale factor.
fn render_all_pages(
    name: &str,
    kind: crate::format::SourceKind,
    bytes: &[u8],
    scale: f32,
) -> Result<Vec<DynamicImage>, ConvertError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| ConvertError::Decode {
            name: name.to_string(),
            kind,
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    let total = pages.len() as usize;
    info!("PDF loaded: {} pages", total);

    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);

    let mut surfaces = Vec::with_capacity(total);
    for (idx, page) in pages.iter().enumerate() {
        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| ConvertError::PageRender {
                    page: idx + 1,
                    detail: format!("{e:?}"),
                })?;
        let surface = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            surface.width(),
            surface.height()
        );
        surfaces.push(surface);
        // `bitmap` drops here: one render surface is live at a time.
    }

    Ok(surfaces)
}
