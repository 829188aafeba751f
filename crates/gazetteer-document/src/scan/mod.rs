// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Scanning pipeline — pattern compilation and matching, the external OCR
// toolchain, and the per-page scan orchestrator.

pub mod matcher;
pub mod ocr;
pub mod scanner;

pub use matcher::PatternSet;
pub use ocr::OcrToolchain;
pub use scanner::PageScanner;
