//! Configuration types for file conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share a config across requests and to diff two runs to
//! understand why their outputs differ.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};

/// Environment variable consulted when no remote base URL is configured.
pub const REMOTE_URL_ENV: &str = "FILECONV_REMOTE_URL";

/// Default remote conversion endpoint (local development server).
pub const DEFAULT_REMOTE_BASE_URL: &str = "http://127.0.0.1:8000";

/// Configuration for a conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use fileconv::{ConversionConfig, PdfToDocxMode};
///
/// let config = ConversionConfig::builder()
///     .render_scale(2.0)
///     .pdf_to_docx(PdfToDocxMode::LocalFallback)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Upscale factor applied when rasterising PDF pages. Default: 2.0.
    ///
    /// Pages render at their natural size times this factor. 2× keeps small
    /// print legible in the exported PNGs without ballooning file sizes.
    pub render_scale: f32,

    /// JPEG encoder quality, 1–100. Default: 95.
    pub jpeg_quality: u8,

    /// Lossy WebP encoder quality, 1.0–100.0. Default: 95.0.
    pub webp_quality: f32,

    /// How PDF→DOCX requests are routed. Default: [`PdfToDocxMode::RemoteOnly`].
    pub pdf_to_docx: PdfToDocxMode,

    /// Base URL of the remote conversion service.
    ///
    /// When `None`, the `FILECONV_REMOTE_URL` environment variable is
    /// consulted, then [`DEFAULT_REMOTE_BASE_URL`].
    pub remote_base_url: Option<String>,

    /// Timeout for the remote conversion request in seconds. Default: 120.
    ///
    /// The original behaviour left the transport default unbounded; a
    /// stalled upload would hang the conversion forever. Every remote call
    /// here is bounded.
    pub remote_timeout_secs: u64,

    /// Page geometry used when paginating plain text into a PDF.
    pub geometry: PageGeometry,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            render_scale: 2.0,
            jpeg_quality: 95,
            webp_quality: 95.0,
            pdf_to_docx: PdfToDocxMode::default(),
            remote_base_url: None,
            remote_timeout_secs: 120,
            geometry: PageGeometry::default(),
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Resolve the effective remote base URL.
    ///
    /// Most-specific first: explicit config value, then the
    /// `FILECONV_REMOTE_URL` environment variable, then the documented
    /// development default.
    pub fn resolve_remote_base_url(&self) -> String {
        if let Some(ref url) = self.remote_base_url {
            if !url.is_empty() {
                return url.clone();
            }
        }
        if let Ok(url) = std::env::var(REMOTE_URL_ENV) {
            if !url.is_empty() {
                return url;
            }
        }
        DEFAULT_REMOTE_BASE_URL.to_string()
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn render_scale(mut self, scale: f32) -> Self {
        self.config.render_scale = scale.clamp(1.0, 4.0);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn webp_quality(mut self, quality: f32) -> Self {
        self.config.webp_quality = quality.clamp(1.0, 100.0);
        self
    }

    pub fn pdf_to_docx(mut self, mode: PdfToDocxMode) -> Self {
        self.config.pdf_to_docx = mode;
        self
    }

    pub fn remote_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.remote_base_url = Some(url.into());
        self
    }

    pub fn remote_timeout_secs(mut self, secs: u64) -> Self {
        self.config.remote_timeout_secs = secs.max(1);
        self
    }

    pub fn geometry(mut self, geometry: PageGeometry) -> Self {
        self.config.geometry = geometry;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if !(1.0..=4.0).contains(&c.render_scale) {
            return Err(ConvertError::InvalidConfig(format!(
                "render scale must be 1.0–4.0, got {}",
                c.render_scale
            )));
        }
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(ConvertError::InvalidConfig(format!(
                "jpeg quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        self.config.geometry.validate()?;
        Ok(self.config)
    }
}

/// How PDF→DOCX conversions are routed.
///
/// Both routings existed in the original tool's history; which one wins is a
/// caller decision, so it is a config option rather than a hardcoded choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PdfToDocxMode {
    /// Always delegate to the remote service. (default)
    #[default]
    RemoteOnly,
    /// Delegate remotely; on a remote failure, fall back to local text
    /// extraction. Non-remote errors still propagate.
    LocalFallback,
    /// Never touch the network: extract the text layer locally.
    LocalOnly,
}

/// Fixed page geometry for paginating plain text into a PDF.
///
/// Defaults describe an A4 portrait page with 20 mm margins, a 7 mm line
/// height, and 16 pt Helvetica, the same layout the original text renderer
/// produced. Wrap boundaries depend on these values together with the font
/// metrics, so changing them changes where every line breaks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub line_height_mm: f32,
    pub font_size_pt: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 20.0,
            line_height_mm: 7.0,
            font_size_pt: 16.0,
        }
    }
}

impl PageGeometry {
    /// Width available to text after both margins.
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    fn validate(&self) -> Result<(), ConvertError> {
        if self.content_width_mm() <= 0.0 {
            return Err(ConvertError::InvalidConfig(
                "margins leave no room for content".into(),
            ));
        }
        if self.line_height_mm <= 0.0 || self.font_size_pt <= 0.0 {
            return Err(ConvertError::InvalidConfig(
                "line height and font size must be positive".into(),
            ));
        }
        if self.page_height_mm <= 2.0 * self.margin_mm + self.line_height_mm {
            return Err(ConvertError::InvalidConfig(
                "page height leaves no room for a single line".into(),
            ));
        }
        Ok(())
    }
}
