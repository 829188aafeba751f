// SPDX-License-Identifier: PMPL-1.0-or-later
//
// gazetteer-document — the page-matching pipeline for government-gazette PDFs.
//
// Provides per-page text extraction (native layer and OCR fallback), regex
// matching with highlight markup, a page scanner orchestrating both, a
// single-page exporter with optional PNG previews, and the caller-owned
// session cache keyed by document fingerprint.

pub mod cache;
pub mod export;
pub mod pdf;
pub mod scan;

// Re-export the primary structs so callers can use `gazetteer_document::PageScanner` etc.
pub use cache::SessionCache;
pub use export::{PageExporter, artifact_file_name};
pub use pdf::reader::PdfReader;
pub use scan::matcher::PatternSet;
pub use scan::ocr::OcrToolchain;
pub use scan::scanner::PageScanner;

#[cfg(test)]
pub(crate) mod testpdf;
