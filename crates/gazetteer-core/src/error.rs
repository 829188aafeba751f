// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Unified error types for Gazetteer.

use thiserror::Error;

/// Top-level error type for all Gazetteer operations.
///
/// Per-page extraction and recognition failures surface as ordinary `Err`
/// values from the leaf functions; the page scanner recovers from them locally
/// and they never abort a multi-page scan.
#[derive(Debug, Error)]
pub enum GazetteerError {
    // -- Input validation --
    #[error("invalid pattern set: {0}")]
    InvalidPatterns(String),

    #[error("invalid scan configuration: {0}")]
    InvalidConfig(String),

    #[error("page {page} out of range (document has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("page rasterization failed: {0}")]
    RasterError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    #[error("OCR toolchain unavailable: {0}")]
    OcrUnavailable(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Session cache --
    #[error("stale document fingerprint: cache holds {active}, got {offered}")]
    StaleFingerprint { active: String, offered: String },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, GazetteerError>;
