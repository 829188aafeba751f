// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Page exporter — turns one matching page into its download/render bundle:
// a standalone single-page PDF, the text used for highlighting, and an
// optional PNG preview.

use gazetteer_core::ScanConfig;
use gazetteer_core::error::GazetteerError;
use gazetteer_core::types::{PageArtifact, PageHit, TextSource};
use image::ImageFormat;
use tracing::{debug, instrument, warn};

use crate::pdf::reader::PdfReader;
use crate::scan::ocr::OcrToolchain;

/// Exports per-page artifacts for pages the scanner matched.
///
/// Shares the scan's configuration and toolchain capability so the exported
/// text comes from the same source the match did, and previews are rendered
/// at the configured resolution.
pub struct PageExporter<'a> {
    config: &'a ScanConfig,
    ocr: Option<&'a OcrToolchain>,
}

impl<'a> PageExporter<'a> {
    /// Create an exporter over the scan's config and toolchain capability.
    pub fn new(config: &'a ScanConfig, ocr: Option<&'a OcrToolchain>) -> Self {
        Self { config, ocr }
    }

    /// Build the artifact bundle for one matching page.
    ///
    /// The preview is `None` whenever the rasterization toolchain is absent;
    /// a toolchain that is present but fails on this page also degrades to
    /// `None` with a warning, matching the per-page recovery policy of the
    /// scan itself. The single-page PDF and text, by contrast, are required —
    /// failure there is an error.
    #[instrument(skip(self, document), fields(page = hit.index))]
    pub fn export(&self, document: &[u8], hit: PageHit) -> Result<PageArtifact, GazetteerError> {
        let reader = PdfReader::from_bytes(document)?;
        let pdf = reader.extract_page(hit.index)?;
        let text = self.page_text(&reader, document, hit)?;
        let preview = self.render_preview(document, hit.index);

        debug!(
            page = hit.index,
            pdf_bytes = pdf.len(),
            text_chars = text.len(),
            has_preview = preview.is_some(),
            "page artifact built"
        );

        Ok(PageArtifact { pdf, text, preview })
    }

    /// The text a render of this page would highlight — from the same source
    /// that produced the scan hit. A native hit whose text layer has since
    /// come back empty (or an OCR hit) goes through the toolchain when one is
    /// available.
    fn page_text(
        &self,
        reader: &PdfReader,
        document: &[u8],
        hit: PageHit,
    ) -> Result<String, GazetteerError> {
        let native = match hit.source {
            TextSource::Native => reader.page_text(hit.index)?,
            TextSource::Ocr => String::new(),
        };

        if !native.is_empty() {
            return Ok(native);
        }

        if let Some(toolchain) = self.ocr.filter(|_| self.config.use_ocr) {
            return toolchain.page_text(
                document,
                hit.index,
                &self.config.ocr_language,
                self.config.ocr_resolution,
            );
        }

        Ok(native)
    }

    /// Render the page preview as PNG, decoding and re-encoding through the
    /// `image` crate so a truncated rasterizer output never reaches the
    /// rendering layer.
    fn render_preview(&self, document: &[u8], page_index: usize) -> Option<Vec<u8>> {
        let toolchain = self.ocr?;
        let raw = match toolchain.rasterize_page(document, page_index, self.config.preview_resolution)
        {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(page = page_index, %err, "preview rasterization failed; omitting preview");
                return None;
            }
        };

        match reencode_png(&raw) {
            Ok(png) => Some(png),
            Err(err) => {
                warn!(page = page_index, %err, "preview re-encoding failed; omitting preview");
                None
            }
        }
    }
}

/// Decode an image and re-encode it as PNG.
fn reencode_png(raw: &[u8]) -> Result<Vec<u8>, GazetteerError> {
    let decoded = image::load_from_memory(raw)
        .map_err(|err| GazetteerError::ImageError(format!("failed to decode preview: {}", err)))?;

    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    decoded
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| GazetteerError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

/// Download name for an exported page: `{basename}_p{page_number}.pdf`, with
/// the page number 1-based as shown to the user.
pub fn artifact_file_name(original_name: &str, page_index: usize) -> String {
    let base = match original_name.len().checked_sub(4) {
        Some(cut)
            if original_name.is_char_boundary(cut)
                && original_name[cut..].eq_ignore_ascii_case(".pdf") =>
        {
            &original_name[..cut]
        }
        _ => original_name,
    };
    format!("{}_p{}.pdf", base, page_index + 1)
}
