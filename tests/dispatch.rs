//! End-to-end dispatcher tests.
//!
//! Fixtures are built in memory: raster inputs with the `image` crate, PDF
//! inputs by running the plain-text→PDF route first and feeding its output
//! back in. Tests that need a pdfium shared library skip themselves when
//! none can be bound, so the suite passes on machines without pdfium.
//!
//! Run with:
//!   cargo test --test dispatch

use fileconv::{
    conversion_targets, convert, package, ConversionConfig, ConversionOutcome, ConversionRequest,
    PdfToDocxMode, SourceFile, SourceKind, TargetFormat,
};
use image::{DynamicImage, Rgba, RgbaImage};
use std::io::{Cursor, Read};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip the current test when no pdfium library can be bound.
macro_rules! skip_unless_pdfium {
    () => {
        if !pdfium_available() {
            println!("SKIP — no pdfium shared library available");
            return;
        }
    };
}

fn pdfium_available() -> bool {
    use pdfium_render::prelude::*;
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .is_ok()
}

fn gradient_image(w: u32, h: u32) -> DynamicImage {
    let img = RgbaImage::from_fn(w, h, |x, y| {
        Rgba([(x * 9 % 256) as u8, (y * 17 % 256) as u8, 128, 255])
    });
    DynamicImage::ImageRgba8(img)
}

fn encode(img: &DynamicImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

fn text_source(text: &str, name: &str) -> SourceFile {
    SourceFile::new(name, "text/plain", text.as_bytes().to_vec())
}

/// Build a real PDF by running the text→PDF route.
async fn pdf_fixture(text: &str, name: &str) -> SourceFile {
    let request = ConversionRequest::new(text_source(text, "fixture.txt"), TargetFormat::Pdf);
    let outcome = convert(&request, &ConversionConfig::default())
        .await
        .expect("text→pdf fixture");
    match outcome {
        ConversionOutcome::Single(artifact) => {
            SourceFile::new(name, "application/pdf", artifact.bytes)
        }
        other => panic!("expected single artifact, got {other:?}"),
    }
}

fn single(outcome: ConversionOutcome) -> fileconv::ConversionArtifact {
    match outcome {
        ConversionOutcome::Single(a) => a,
        other => panic!("expected single artifact, got {other:?}"),
    }
}

/// Pull `word/document.xml` out of a DOCX payload.
fn document_xml(bytes: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("valid container");
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .expect("document part")
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

// ── Catalog properties ───────────────────────────────────────────────────────

#[test]
fn catalog_is_stable_across_calls() {
    for kind in [
        SourceKind::PngImage,
        SourceKind::JpegImage,
        SourceKind::WebpImage,
        SourceKind::PdfDocument,
        SourceKind::PlainText,
        SourceKind::Unknown,
    ] {
        assert_eq!(conversion_targets(kind), conversion_targets(kind));
    }
}

#[test]
fn first_catalog_entry_is_the_default_selection() {
    assert_eq!(
        conversion_targets(SourceKind::PdfDocument)[0].format,
        TargetFormat::ImageArchive
    );
    assert_eq!(
        conversion_targets(SourceKind::PlainText)[0].format,
        TargetFormat::Pdf
    );
    assert_eq!(
        conversion_targets(SourceKind::PngImage)[0].format,
        TargetFormat::Png
    );
}

// ── Image scenarios ──────────────────────────────────────────────────────────

#[tokio::test]
async fn jpeg_to_jpeg_keeps_pixel_dimensions() {
    // JPEG has no alpha channel; encode the fixture from RGB.
    let img = DynamicImage::ImageRgb8(gradient_image(31, 17).to_rgb8());
    let source = SourceFile::new(
        "photo.jpg",
        "image/jpeg",
        encode(&img, image::ImageFormat::Jpeg),
    );
    let request = ConversionRequest::new(source, TargetFormat::Jpg);

    let artifact = single(
        convert(&request, &ConversionConfig::default())
            .await
            .unwrap(),
    );
    assert_eq!(artifact.filename, "photo.jpg");

    let decoded = image::load_from_memory(&artifact.bytes).expect("valid JPEG output");
    assert_eq!((decoded.width(), decoded.height()), (31, 17));
    assert_eq!(
        image::guess_format(&artifact.bytes).unwrap(),
        image::ImageFormat::Jpeg
    );
}

#[tokio::test]
async fn png_to_webp_round_trips() {
    let img = gradient_image(20, 20);
    let source = SourceFile::new("img.png", "image/png", encode(&img, image::ImageFormat::Png));
    let request = ConversionRequest::new(source, TargetFormat::Webp);

    let artifact = single(
        convert(&request, &ConversionConfig::default())
            .await
            .unwrap(),
    );
    assert_eq!(artifact.filename, "img.webp");
    assert_eq!(
        image::guess_format(&artifact.bytes).unwrap(),
        image::ImageFormat::WebP
    );
}

#[tokio::test]
async fn image_to_docx_is_a_textual_placeholder() {
    let img = gradient_image(4, 4);
    let source = SourceFile::new("img.png", "image/png", encode(&img, image::ImageFormat::Png));
    let request = ConversionRequest::new(source, TargetFormat::Docx);

    let artifact = single(
        convert(&request, &ConversionConfig::default())
            .await
            .unwrap(),
    );
    assert_eq!(artifact.filename, "img.docx");
    let xml = document_xml(&artifact.bytes);
    assert!(xml.contains("img.png"));
}

// ── Text scenarios ───────────────────────────────────────────────────────────

#[tokio::test]
async fn text_to_pdf_paginates() {
    // 80 wrapped lines at 36 lines per A4 page → 3 pages.
    let text = vec!["line"; 80].join("\n");
    let request = ConversionRequest::new(text_source(&text, "notes.txt"), TargetFormat::Pdf);

    let artifact = single(
        convert(&request, &ConversionConfig::default())
            .await
            .unwrap(),
    );
    assert_eq!(artifact.filename, "notes.pdf");

    let doc = lopdf::Document::load_mem(&artifact.bytes).expect("generated PDF parses");
    assert_eq!(doc.get_pages().len(), 3);
}

#[tokio::test]
async fn text_to_docx_carries_every_line() {
    let request = ConversionRequest::new(
        text_source("first line\nsecond line", "notes.txt"),
        TargetFormat::Docx,
    );
    let artifact = single(
        convert(&request, &ConversionConfig::default())
            .await
            .unwrap(),
    );
    let xml = document_xml(&artifact.bytes);
    assert!(xml.contains("first line"));
    assert!(xml.contains("second line"));
}

#[tokio::test]
async fn txt_identity_is_byte_exact() {
    let source = text_source("unchanged content", "keep.txt");
    let request = ConversionRequest::new(source.clone(), TargetFormat::Txt);
    let artifact = single(
        convert(&request, &ConversionConfig::default())
            .await
            .unwrap(),
    );
    assert_eq!(artifact.bytes, source.bytes);
    assert_eq!(artifact.filename, "keep.txt");
}

// ── PDF scenarios ────────────────────────────────────────────────────────────

#[tokio::test]
async fn pdf_identity_is_byte_exact() {
    let source = pdf_fixture("identity test", "orig.pdf").await;
    let request = ConversionRequest::new(source.clone(), TargetFormat::Pdf);
    let artifact = single(
        convert(&request, &ConversionConfig::default())
            .await
            .unwrap(),
    );
    assert_eq!(artifact.bytes, source.bytes);
    assert_eq!(artifact.filename, "orig.pdf");
}

#[tokio::test]
async fn three_page_pdf_yields_three_page_artifacts() {
    skip_unless_pdfium!();

    let text = vec!["line"; 80].join("\n");
    let source = pdf_fixture(&text, "report.pdf").await;
    let request = ConversionRequest::new(source, TargetFormat::ImageArchive);

    let outcome = convert(&request, &ConversionConfig::default())
        .await
        .unwrap();
    let pages = match &outcome {
        ConversionOutcome::Pages(pages) => pages.clone(),
        other => panic!("expected pages, got {other:?}"),
    };

    assert_eq!(pages.len(), 3);
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.filename, format!("report_page_{}.png", i + 1));
        assert_eq!(
            image::guess_format(&page.bytes).unwrap(),
            image::ImageFormat::Png
        );
    }

    // Packaging zips the pages under the derived archive name, in order.
    let archive = package(outcome, "report.pdf").unwrap();
    assert_eq!(archive.filename, "report_images.zip");
    let mut zip = zip::ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
    let names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "report_page_1.png",
            "report_page_2.png",
            "report_page_3.png"
        ]
    );
}

#[tokio::test]
async fn rasterised_pages_upscale_by_the_render_scale() {
    skip_unless_pdfium!();

    let source = pdf_fixture("one page", "single.pdf").await;
    let request = ConversionRequest::new(source, TargetFormat::ImageArchive);

    let outcome = convert(&request, &ConversionConfig::default())
        .await
        .unwrap();
    let pages = match outcome {
        ConversionOutcome::Pages(pages) => pages,
        other => panic!("expected pages, got {other:?}"),
    };
    assert_eq!(pages.len(), 1);

    // A4 is 595×842 pt; at the default 2× factor the render is ~1190×1684.
    let img = image::load_from_memory(&pages[0].bytes).unwrap();
    assert!(
        (1150..=1250).contains(&img.width()),
        "unexpected width {}",
        img.width()
    );
}

#[tokio::test]
async fn corrupt_pdf_fails_with_decode_error() {
    skip_unless_pdfium!();

    let source = SourceFile::new("broken.pdf", "application/pdf", b"not a pdf".to_vec());
    let request = ConversionRequest::new(source, TargetFormat::ImageArchive);
    let err = convert(&request, &ConversionConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, fileconv::ConvertError::Decode { .. }));
}

#[tokio::test]
async fn pdf_to_docx_local_extraction_single_page() {
    skip_unless_pdfium!();

    let source = pdf_fixture("Hello world", "hello.pdf").await;
    let config = ConversionConfig::builder()
        .pdf_to_docx(PdfToDocxMode::LocalOnly)
        .build()
        .unwrap();
    let request = ConversionRequest::new(source, TargetFormat::Docx);

    let artifact = single(convert(&request, &config).await.unwrap());
    assert_eq!(artifact.filename, "hello.docx");

    let xml = document_xml(&artifact.bytes);
    assert!(xml.contains("Hello world"), "missing extracted text");
    // One page → no page-boundary break anywhere in the document.
    assert!(!xml.contains("w:type=\"page\""), "unexpected page break");
}

#[tokio::test]
async fn pdf_to_docx_local_extraction_multi_page_has_boundaries() {
    skip_unless_pdfium!();

    let text = vec!["words on every page"; 80].join("\n");
    let source = pdf_fixture(&text, "long.pdf").await;
    let config = ConversionConfig::builder()
        .pdf_to_docx(PdfToDocxMode::LocalOnly)
        .build()
        .unwrap();
    let request = ConversionRequest::new(source, TargetFormat::Docx);

    let artifact = single(convert(&request, &config).await.unwrap());
    let xml = document_xml(&artifact.bytes);
    // 3 pages → exactly 2 boundaries, between pages, never trailing.
    assert_eq!(xml.matches("w:type=\"page\"").count(), 2);
}

// ── Remote scenarios ─────────────────────────────────────────────────────────

mod stub_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One-shot HTTP server: answers the first request with `status` and
    /// `body`, then shuts down. Returns the base URL to point the client at.
    pub async fn spawn(status: u16, body: &'static [u8], content_type: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;

            let reason = match status {
                200 => "OK",
                500 => "Internal Server Error",
                _ => "Error",
            };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{addr}")
    }

    /// Read headers, then drain the body per Content-Length so the client
    /// never sees a reset mid-upload.
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find_header_end(&buf) {
                break pos;
            }
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let mut remaining = content_length.saturating_sub(buf.len() - (header_end + 4));
        while remaining > 0 {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            remaining = remaining.saturating_sub(n);
        }
    }

    fn find_header_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n")
    }
}

#[tokio::test]
async fn remote_failure_surfaces_the_response_body() {
    let base = stub_server::spawn(500, b"server overloaded", "text/plain").await;
    let config = ConversionConfig::builder()
        .remote_base_url(base)
        .remote_timeout_secs(10)
        .build()
        .unwrap();

    let source = SourceFile::new("doc.pdf", "application/pdf", b"%PDF-1.5".to_vec());
    let request = ConversionRequest::new(source, TargetFormat::Docx);

    let err = convert(&request, &config).await.unwrap_err();
    match err {
        fileconv::ConvertError::Remote { status, message } => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "server overloaded");
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn remote_success_returns_the_document_body() {
    let base = stub_server::spawn(
        200,
        b"DOCX-PAYLOAD",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    )
    .await;
    let config = ConversionConfig::builder()
        .remote_base_url(base)
        .remote_timeout_secs(10)
        .build()
        .unwrap();

    let source = SourceFile::new("doc.pdf", "application/pdf", b"%PDF-1.5".to_vec());
    let request = ConversionRequest::new(source, TargetFormat::Docx);

    let artifact = single(convert(&request, &config).await.unwrap());
    assert_eq!(artifact.filename, "doc.docx");
    assert_eq!(artifact.bytes, b"DOCX-PAYLOAD");
}

#[tokio::test]
async fn unreachable_remote_is_a_remote_error_without_status() {
    // Port 1 on loopback: nothing listens there, so the connect fails fast.
    let config = ConversionConfig::builder()
        .remote_base_url("http://127.0.0.1:1")
        .remote_timeout_secs(5)
        .build()
        .unwrap();

    let source = SourceFile::new("doc.pdf", "application/pdf", b"%PDF-1.5".to_vec());
    let request = ConversionRequest::new(source, TargetFormat::Docx);

    let err = convert(&request, &config).await.unwrap_err();
    assert!(matches!(
        err,
        fileconv::ConvertError::Remote { status: None, .. }
    ));
}

#[tokio::test]
async fn local_fallback_extracts_after_remote_failure() {
    skip_unless_pdfium!();

    let base = stub_server::spawn(500, b"maintenance window", "text/plain").await;
    let config = ConversionConfig::builder()
        .remote_base_url(base)
        .remote_timeout_secs(10)
        .pdf_to_docx(PdfToDocxMode::LocalFallback)
        .build()
        .unwrap();

    let source = pdf_fixture("fallback content", "fb.pdf").await;
    let request = ConversionRequest::new(source, TargetFormat::Docx);

    let artifact = single(convert(&request, &config).await.unwrap());
    let xml = document_xml(&artifact.bytes);
    assert!(xml.contains("fallback content"));
}
