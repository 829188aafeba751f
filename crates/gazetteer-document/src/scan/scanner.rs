// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Page scanner — walks every page of a gazette, trying the native text layer
// first and the OCR fallback second, and collects the matching page indices.

use gazetteer_core::ScanConfig;
use gazetteer_core::error::GazetteerError;
use gazetteer_core::types::{ScanOutcome, TextSource};
use tracing::{info, instrument, warn};

use crate::pdf::reader::PdfReader;
use crate::scan::matcher::PatternSet;
use crate::scan::ocr::OcrToolchain;

/// Orchestrates one scan: text extraction, optional OCR, and pattern matching
/// across all pages of a document.
///
/// Holds only borrowed, immutable inputs, so a scanner is cheap to build per
/// request and `scan` is safe to re-run — identical inputs give identical
/// outcomes.
pub struct PageScanner<'a> {
    patterns: &'a PatternSet,
    config: &'a ScanConfig,
    ocr: Option<&'a OcrToolchain>,
}

impl<'a> PageScanner<'a> {
    /// Create a scanner for a compiled pattern set and validated configuration.
    ///
    /// `ocr` is the probed toolchain capability; pass `None` when probing
    /// failed. A config requesting OCR without a toolchain is accepted — the
    /// scan then behaves exactly as if OCR were off, with a logged warning.
    pub fn new(
        patterns: &'a PatternSet,
        config: &'a ScanConfig,
        ocr: Option<&'a OcrToolchain>,
    ) -> Result<Self, GazetteerError> {
        config.validate()?;
        Ok(Self {
            patterns,
            config,
            ocr,
        })
    }

    /// Scan every page of `document` in order and return the matching pages.
    ///
    /// Per page: native text is extracted and matched first; only if it did
    /// not match (and OCR is enabled and available) is the page rasterized and
    /// recognised. Every page is visited regardless of earlier hits, and a
    /// page that fails to extract or recognise is logged and treated as
    /// non-matching — one corrupt page must not abort the batch.
    ///
    /// # Errors
    ///
    /// Only a document that cannot be opened at all fails the scan.
    #[instrument(skip_all, fields(bytes_len = document.len()))]
    pub fn scan(&self, document: &[u8]) -> Result<ScanOutcome, GazetteerError> {
        let reader = PdfReader::from_bytes(document)?;
        let page_count = reader.page_count();

        let ocr = if self.config.use_ocr {
            if self.ocr.is_none() {
                warn!("OCR requested but toolchain unavailable; scanning native text only");
            }
            self.ocr
        } else {
            None
        };

        let mut outcome = ScanOutcome::default();

        for index in 0..page_count {
            match reader.page_text(index) {
                Ok(text) if self.patterns.is_match(&text) => {
                    outcome.record(index, TextSource::Native);
                    continue;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(page = index, %err, "native extraction failed; treating as no match");
                }
            }

            if let Some(toolchain) = ocr {
                match toolchain.page_text(
                    document,
                    index,
                    &self.config.ocr_language,
                    self.config.ocr_resolution,
                ) {
                    Ok(text) if self.patterns.is_match(&text) => {
                        outcome.record(index, TextSource::Ocr);
                    }
                    Ok(_) => {}
                    Err(err) => {
                        warn!(page = index, %err, "OCR failed; treating as no match");
                    }
                }
            }
        }

        info!(
            matched = outcome.len(),
            pages = page_count,
            "scan complete"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testpdf::build_pdf;

    fn scan(document: &[u8], patterns: &str, config: &ScanConfig) -> ScanOutcome {
        let set = PatternSet::parse(patterns).unwrap();
        let scanner = PageScanner::new(&set, config, None).unwrap();
        scanner.scan(document).unwrap()
    }

    #[test]
    fn matching_page_found_by_index() {
        let document = build_pdf(&[
            "ordinary announcements",
            "board disciplinary resolution follows",
            "closing notices",
        ]);
        let outcome = scan(&document, "disciplinary resolution", &ScanConfig::default());
        assert_eq!(outcome.indices(), vec![1]);
        assert_eq!(outcome.source_for(1), Some(TextSource::Native));
    }

    #[test]
    fn multiple_hits_come_back_ascending() {
        let document = build_pdf(&[
            "resolution issued today",
            "unrelated content",
            "another resolution recorded",
            "final resolution of the board",
        ]);
        let outcome = scan(&document, "resolution", &ScanConfig::default());
        assert_eq!(outcome.indices(), vec![0, 2, 3]);
    }

    #[test]
    fn page_matching_several_patterns_appears_once() {
        let document = build_pdf(&["revocation and suspension in one notice"]);
        let outcome = scan(&document, "revocation\nsuspension", &ScanConfig::default());
        assert_eq!(outcome.indices(), vec![0]);
    }

    #[test]
    fn zero_page_document_yields_empty_outcome() {
        let document = build_pdf(&[]);
        let outcome = scan(&document, "discipline", &ScanConfig::default());
        assert!(outcome.is_empty());
    }

    #[test]
    fn no_match_yields_empty_outcome() {
        let document = build_pdf(&["nothing here", "or here"]);
        let outcome = scan(&document, "discipline", &ScanConfig::default());
        assert!(outcome.is_empty());
    }

    #[test]
    fn scan_is_idempotent() {
        let document = build_pdf(&["a resolution", "plain text", "more resolution text"]);
        let set = PatternSet::parse("resolution").unwrap();
        let config = ScanConfig::default();
        let scanner = PageScanner::new(&set, &config, None).unwrap();

        let first = scanner.scan(&document).unwrap();
        let second = scanner.scan(&document).unwrap();
        assert_eq!(first, second);
    }

    /// Degraded environment: requesting OCR without a toolchain must behave
    /// exactly like a native-only scan.
    #[test]
    fn ocr_requested_without_toolchain_falls_back_to_native() {
        let document = build_pdf(&["scanned image placeholder", "a resolution page"]);
        let mut with_ocr = ScanConfig::default();
        with_ocr.use_ocr = true;

        let native_only = scan(&document, "resolution", &ScanConfig::default());
        let degraded = scan(&document, "resolution", &with_ocr);
        assert_eq!(native_only, degraded);
    }

    #[test]
    fn invalid_config_rejected_before_scanning() {
        let set = PatternSet::parse("anything").unwrap();
        let mut config = ScanConfig::default();
        config.ocr_resolution = 10_000;
        assert!(PageScanner::new(&set, &config, None).is_err());
    }

    #[test]
    fn unreadable_document_is_an_input_error() {
        let set = PatternSet::parse("anything").unwrap();
        let config = ScanConfig::default();
        let scanner = PageScanner::new(&set, &config, None).unwrap();
        assert!(scanner.scan(b"not a pdf at all").is_err());
    }
}
