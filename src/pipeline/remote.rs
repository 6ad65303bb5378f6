//! Remote PDF→DOCX delegation.
//!
//! The one conversion that cannot be done locally is handed to an external
//! service: the original PDF bytes go up as a multipart file upload, and the
//! response body comes back as the DOCX binary. A non-2xx response body is
//! the service's own diagnostic text and is surfaced verbatim in the error.
//!
//! No retry: the dispatcher reports failure to the caller and stops. The
//! request is bounded by the configured timeout; the transport default
//! would otherwise let a stalled upload hang forever.

use crate::artifact::{replace_extension, ConversionArtifact, SourceFile};
use crate::config::ConversionConfig;
use crate::error::ConvertError;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, info};

/// Upload endpoint path, relative to the configured base URL.
const CONVERT_PATH: &str = "/convert/pdf-to-docx";

/// Convert a PDF to DOCX via the remote conversion service.
pub async fn pdf_to_docx(
    source: &SourceFile,
    config: &ConversionConfig,
) -> Result<ConversionArtifact, ConvertError> {
    let base = config.resolve_remote_base_url();
    let url = format!("{}{}", base.trim_end_matches('/'), CONVERT_PATH);
    info!("Delegating {} to {}", source.name, url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.remote_timeout_secs))
        .build()
        .map_err(|e| ConvertError::Internal(format!("http client: {e}")))?;

    let part = Part::bytes(source.bytes.clone())
        .file_name(source.name.clone())
        .mime_str("application/pdf")
        .map_err(|e| ConvertError::Internal(format!("multipart: {e}")))?;
    let form = Form::new().part("file", part);

    let response = client
        .post(&url)
        .multipart(form)
        .send()
        .await
        .map_err(|e| ConvertError::Remote {
            status: None,
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        let message = if message.is_empty() {
            format!("HTTP {status}")
        } else {
            message
        };
        return Err(ConvertError::Remote {
            status: Some(status.as_u16()),
            message,
        });
    }

    let bytes = response.bytes().await.map_err(|e| ConvertError::Remote {
        status: Some(status.as_u16()),
        message: format!("reading response body: {e}"),
    })?;
    if bytes.is_empty() {
        return Err(ConvertError::Remote {
            status: Some(status.as_u16()),
            message: "service returned an empty document".into(),
        });
    }
    debug!("Remote conversion returned {} bytes", bytes.len());

    Ok(ConversionArtifact::new(
        bytes.to_vec(),
        replace_extension(&source.name, "docx"),
    ))
}
