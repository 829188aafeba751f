// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Shared types for the scan pipeline: document fingerprints, scan outcomes,
// and exported page artifacts.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Content fingerprint of an uploaded document — the SHA-256 of its raw bytes
/// as a lowercase hex string.
///
/// Two uploads with the same fingerprint are the same document; a fingerprint
/// change is what invalidates cached scan results and artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint a document's raw bytes.
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// The fingerprint as a lowercase hex digest.
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which text source produced a match for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextSource {
    /// Text extracted from the document's embedded text layer.
    Native,
    /// Text recognised from a rasterized image of the page.
    Ocr,
}

/// A single matching page: its 0-based index and the source that matched.
///
/// Native extraction is tried first, so `source` is `Ocr` only when the
/// native text layer produced no match for the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageHit {
    /// 0-based page index into the document.
    pub index: usize,
    /// The text source whose match put this page in the result.
    pub source: TextSource,
}

/// Ordered result of scanning a document: the matching pages, ascending by
/// index, each page at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    hits: Vec<PageHit>,
}

impl ScanOutcome {
    /// Record a matching page. Out-of-order or duplicate indices are ignored,
    /// so the hit list is ascending and duplicate-free by construction.
    pub fn record(&mut self, index: usize, source: TextSource) {
        if self.hits.last().is_none_or(|last| last.index < index) {
            self.hits.push(PageHit { index, source });
        }
    }

    /// The matching pages with their sources, ascending by index.
    pub fn hits(&self) -> &[PageHit] {
        &self.hits
    }

    /// The matching 0-based page indices, ascending.
    pub fn indices(&self) -> Vec<usize> {
        self.hits.iter().map(|hit| hit.index).collect()
    }

    /// The source that matched a given page, if the page matched at all.
    pub fn source_for(&self, index: usize) -> Option<TextSource> {
        self.hits
            .iter()
            .find(|hit| hit.index == index)
            .map(|hit| hit.source)
    }

    /// Number of matching pages.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// True when no page matched — the "no relevant pages found" state.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Per-page export bundle: the standalone single-page PDF, the text used for
/// highlighting, and an optional rendered preview.
#[derive(Debug, Clone)]
pub struct PageArtifact {
    /// Serialised single-page PDF containing exactly this page.
    pub pdf: Vec<u8>,
    /// The page's extracted text, from the same source the scan matched on.
    pub text: String,
    /// PNG preview of the page. `None` whenever the rasterization toolchain
    /// is unavailable — an expected state, not an error.
    pub preview: Option<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-256 of the empty byte slice (well-known constant).
    const EMPTY_SHA256: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn fingerprint_empty_input() {
        assert_eq!(Fingerprint::of(b"").as_hex(), EMPTY_SHA256);
    }

    #[test]
    fn fingerprint_known_value() {
        // SHA-256("hello") — verified against coreutils sha256sum.
        let expected = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        assert_eq!(Fingerprint::of(b"hello").as_hex(), expected);
    }

    #[test]
    fn fingerprint_detects_document_change() {
        assert_ne!(Fingerprint::of(b"gazette 41"), Fingerprint::of(b"gazette 42"));
        assert_eq!(Fingerprint::of(b"gazette 41"), Fingerprint::of(b"gazette 41"));
    }

    #[test]
    fn outcome_keeps_indices_ascending_and_unique() {
        let mut outcome = ScanOutcome::default();
        outcome.record(1, TextSource::Native);
        outcome.record(1, TextSource::Ocr); // duplicate — dropped
        outcome.record(4, TextSource::Ocr);
        outcome.record(2, TextSource::Native); // out of order — dropped

        assert_eq!(outcome.indices(), vec![1, 4]);
        assert_eq!(outcome.source_for(1), Some(TextSource::Native));
        assert_eq!(outcome.source_for(4), Some(TextSource::Ocr));
        assert_eq!(outcome.source_for(2), None);
    }

    #[test]
    fn outcome_empty_is_the_no_match_state() {
        let outcome = ScanOutcome::default();
        assert!(outcome.is_empty());
        assert_eq!(outcome.len(), 0);
        assert!(outcome.indices().is_empty());
    }
}
