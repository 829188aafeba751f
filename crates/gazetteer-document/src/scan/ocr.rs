// SPDX-License-Identifier: PMPL-1.0-or-later
//
// OCR toolchain wrapper — rasterizes single PDF pages with `pdftoppm`
// (poppler-utils) and recognises text with `tesseract`.
//
// Both tools are external processes. Availability is probed once, at startup:
// a successfully constructed `OcrToolchain` is the capability value, and code
// that can work without OCR takes `Option<&OcrToolchain>`. There is no
// process-wide availability flag.

use std::path::{Path, PathBuf};
use std::process::Command;

use gazetteer_core::error::GazetteerError;
use tracing::{debug, info, instrument, warn};

/// Handle to a probed, working rasterization + recognition toolchain.
///
/// Construct it once via [`OcrToolchain::probe`] and pass it by reference into
/// the scanner and exporter. If probing fails the toolchain simply does not
/// exist, and OCR-dependent behavior (OCR matching, preview images) is
/// disabled downstream — native-text scanning is unaffected.
pub struct OcrToolchain {
    /// First line of `pdftoppm -v` output, kept for diagnostics.
    pdftoppm_version: String,
    /// First line of `tesseract --version` output, kept for diagnostics.
    tesseract_version: String,
}

impl OcrToolchain {
    // -- Probing --------------------------------------------------------------

    /// Probe for `pdftoppm` and `tesseract` on the current system.
    ///
    /// # Errors
    ///
    /// Returns [`GazetteerError::OcrUnavailable`] naming the missing tool.
    /// Callers treat that as a warning, not a failure: scanning continues on
    /// native text alone.
    #[instrument]
    pub fn probe() -> Result<Self, GazetteerError> {
        let pdftoppm_version = probe_tool("pdftoppm", "-v", "install poppler-utils")?;
        let tesseract_version = probe_tool("tesseract", "--version", "install tesseract-ocr")?;

        info!(
            pdftoppm = %pdftoppm_version,
            tesseract = %tesseract_version,
            "OCR toolchain available"
        );

        Ok(Self {
            pdftoppm_version,
            tesseract_version,
        })
    }

    /// Probed `pdftoppm` version line.
    pub fn pdftoppm_version(&self) -> &str {
        &self.pdftoppm_version
    }

    /// Probed `tesseract` version line.
    pub fn tesseract_version(&self) -> &str {
        &self.tesseract_version
    }

    // -- Rasterization --------------------------------------------------------

    /// Render one page (0-based index) of a PDF to a PNG at the given dpi.
    #[instrument(skip(self, pdf_bytes), fields(page_index, dpi))]
    pub fn rasterize_page(
        &self,
        pdf_bytes: &[u8],
        page_index: usize,
        dpi: u32,
    ) -> Result<Vec<u8>, GazetteerError> {
        let workdir = tempfile::tempdir()?;
        let image_path = self.rasterize_to_file(pdf_bytes, page_index, dpi, workdir.path())?;
        let bytes = std::fs::read(&image_path)?;
        debug!(page_index, bytes = bytes.len(), "page rasterized");
        Ok(bytes)
    }

    /// Rasterize one page into `dir` and return the path of the produced PNG.
    fn rasterize_to_file(
        &self,
        pdf_bytes: &[u8],
        page_index: usize,
        dpi: u32,
        dir: &Path,
    ) -> Result<PathBuf, GazetteerError> {
        let pdf_path = dir.join("input.pdf");
        std::fs::write(&pdf_path, pdf_bytes)?;

        // pdftoppm takes 1-based page numbers; -f/-l restricts it to one page.
        let page_number = page_index + 1;
        let prefix = dir.join("page");
        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-f")
            .arg(page_number.to_string())
            .arg("-l")
            .arg(page_number.to_string())
            .arg(&pdf_path)
            .arg(&prefix)
            .output()
            .map_err(|err| {
                GazetteerError::RasterError(format!("failed to run pdftoppm: {}", err))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GazetteerError::RasterError(format!(
                "pdftoppm failed on page {}: {}",
                page_index,
                stderr.trim()
            )));
        }

        // The output filename's zero padding depends on the document's total
        // page count, so glob for the single PNG instead of predicting it.
        let mut images: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();
        images.sort();

        images.into_iter().next().ok_or_else(|| {
            GazetteerError::RasterError(format!(
                "pdftoppm produced no image for page {}",
                page_index
            ))
        })
    }

    // -- Recognition ----------------------------------------------------------

    /// Rasterize one page and run text recognition on it.
    ///
    /// `language` is passed straight to tesseract's `-l` flag, so combined
    /// hints like "chi_tra+eng" work as-is. Returns the recognised text, which
    /// may legitimately be empty for blank or pictorial pages.
    #[instrument(skip(self, pdf_bytes), fields(page_index, language, dpi))]
    pub fn page_text(
        &self,
        pdf_bytes: &[u8],
        page_index: usize,
        language: &str,
        dpi: u32,
    ) -> Result<String, GazetteerError> {
        let workdir = tempfile::tempdir()?;
        let image_path = self.rasterize_to_file(pdf_bytes, page_index, dpi, workdir.path())?;

        let output = Command::new("tesseract")
            .arg(&image_path)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("--psm")
            .arg("1") // automatic page segmentation with orientation detection
            .output()
            .map_err(|err| {
                GazetteerError::OcrError(format!("failed to run tesseract: {}", err))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GazetteerError::OcrError(format!(
                "tesseract failed on page {}: {}",
                page_index,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(page_index, chars = text.len(), "OCR recognition complete");
        Ok(text)
    }
}

/// Run `tool flag` once and return the first line of its output, or an
/// `OcrUnavailable` error carrying an install hint.
fn probe_tool(tool: &str, flag: &str, hint: &str) -> Result<String, GazetteerError> {
    match Command::new(tool).arg(flag).output() {
        Ok(output) => {
            // pdftoppm prints its version banner to stderr; tesseract to stdout.
            let banner = if output.stdout.is_empty() {
                String::from_utf8_lossy(&output.stderr).into_owned()
            } else {
                String::from_utf8_lossy(&output.stdout).into_owned()
            };
            let first_line = banner.lines().next().unwrap_or(tool).trim().to_owned();
            Ok(first_line)
        }
        Err(err) => {
            warn!(tool, %err, "OCR tool not found");
            Err(GazetteerError::OcrUnavailable(format!(
                "`{}` not found ({}): {}",
                tool, hint, err
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Probing must never panic; both outcomes are valid depending on what
    /// the host has installed.
    #[test]
    fn probe_reports_availability_without_panicking() {
        match OcrToolchain::probe() {
            Ok(toolchain) => {
                assert!(!toolchain.pdftoppm_version().is_empty());
                assert!(!toolchain.tesseract_version().is_empty());
            }
            Err(err) => {
                assert!(matches!(err, GazetteerError::OcrUnavailable(_)));
            }
        }
    }

    #[test]
    fn probe_missing_tool_yields_unavailable() {
        let result = probe_tool("gazetteer-no-such-tool", "--version", "not installable");
        assert!(matches!(result, Err(GazetteerError::OcrUnavailable(_))));
    }
}
