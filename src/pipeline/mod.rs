//! Conversion routines, one submodule per route.
//!
//! Each submodule implements exactly one transformation; the dispatcher in
//! [`crate::convert`] selects which one runs. Keeping routes separate makes
//! each independently testable and lets us swap an implementation (e.g. the
//! rendering backend) without touching the others.
//!
//! ```text
//! image    — raster → raster re-encode (png / jpg / webp)
//! raster   — PDF → one PNG per page (pdfium)
//! extract  — PDF text layer → normalised per-page text (pdfium)
//! paginate — plain text → wrapped lines → fixed-geometry pages
//! textpdf  — paginated text → PDF container
//! docx     — paragraphs → DOCX container
//! remote   — PDF → DOCX via the external conversion service
//! ```
//!
//! pdfium is not async-safe; every route that touches it runs its work
//! inside `tokio::task::spawn_blocking`, as does the CPU-heavy image
//! re-encoding.

pub mod docx;
pub mod extract;
pub mod image;
pub mod paginate;
pub mod raster;
pub mod remote;
pub mod textpdf;

use crate::error::ConvertError;
use pdfium_render::prelude::*;

/// Bind to a pdfium library: a copy next to the executable first, then the
/// system library.
pub(crate) fn bind_pdfium() -> Result<Pdfium, ConvertError> {
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| ConvertError::PdfiumBinding(format!("{e:?}")))
}
