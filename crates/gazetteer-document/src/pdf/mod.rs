// SPDX-License-Identifier: PMPL-1.0-or-later
//
// PDF module — reading documents, extracting per-page text, and exporting
// single pages as standalone PDFs.

pub mod reader;

pub use reader::PdfReader;
