// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Scan configuration.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{GazetteerError, Result};

/// Allowed OCR rasterization resolution, in dots per inch.
pub const OCR_DPI_RANGE: RangeInclusive<u32> = 150..=600;

/// Allowed preview-image resolution, in dots per inch.
pub const PREVIEW_DPI_RANGE: RangeInclusive<u32> = 100..=300;

/// Per-scan settings supplied by the caller alongside the pattern set.
///
/// Immutable once a scan starts. The defaults mirror the interactive form's
/// initial state: OCR off, Traditional Chinese language hint, 300 dpi OCR
/// rendering, 150 dpi previews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Try OCR on pages whose native text layer did not match.
    pub use_ocr: bool,
    /// Tesseract language code, e.g. "chi_tra", "chi_sim", "eng", or a
    /// "+"-joined combination such as "chi_tra+eng".
    pub ocr_language: String,
    /// Rasterization resolution for OCR, in dpi.
    pub ocr_resolution: u32,
    /// Rasterization resolution for preview images, in dpi.
    pub preview_resolution: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            use_ocr: false,
            ocr_language: "chi_tra".to_owned(),
            ocr_resolution: 300,
            preview_resolution: 150,
        }
    }
}

impl ScanConfig {
    /// Check that resolutions fall within the supported dpi ranges and that a
    /// language hint is present when OCR is requested.
    pub fn validate(&self) -> Result<()> {
        if !OCR_DPI_RANGE.contains(&self.ocr_resolution) {
            return Err(GazetteerError::InvalidConfig(format!(
                "OCR resolution {} dpi outside supported range {}-{}",
                self.ocr_resolution,
                OCR_DPI_RANGE.start(),
                OCR_DPI_RANGE.end()
            )));
        }
        if !PREVIEW_DPI_RANGE.contains(&self.preview_resolution) {
            return Err(GazetteerError::InvalidConfig(format!(
                "preview resolution {} dpi outside supported range {}-{}",
                self.preview_resolution,
                PREVIEW_DPI_RANGE.start(),
                PREVIEW_DPI_RANGE.end()
            )));
        }
        if self.use_ocr && self.ocr_language.trim().is_empty() {
            return Err(GazetteerError::InvalidConfig(
                "OCR requested but no language code given".to_owned(),
            ));
        }
        Ok(())
    }
}
