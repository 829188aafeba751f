// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Session cache — caller-owned store for the active document's scan outcome
// and exported page artifacts, keyed by content fingerprint.
//
// Scanning (especially with OCR) is expensive, so the rendering layer keeps
// one of these per session and re-triggers a scan only when the fingerprint
// changes. There are no ambient globals: the cache is an explicit value
// passed by the caller.

use std::collections::HashMap;

use gazetteer_core::error::GazetteerError;
use gazetteer_core::types::{Fingerprint, PageArtifact, ScanOutcome};
use tracing::{debug, info};

/// In-session cache for exactly one active document.
///
/// All reads and writes carry the fingerprint they were computed for; a write
/// against anything other than the active fingerprint is rejected, and reads
/// for a stale fingerprint simply miss. Activating a new fingerprint drops
/// everything cached for the previous document.
#[derive(Default)]
pub struct SessionCache {
    /// Fingerprint of the document this cache currently serves.
    active: Option<Fingerprint>,
    /// Scan outcome for the active document, once a scan completed.
    outcome: Option<ScanOutcome>,
    /// Lazily exported artifacts for matching pages, keyed by page index.
    artifacts: HashMap<usize, PageArtifact>,
}

impl SessionCache {
    /// Create an empty cache with no active document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `fingerprint` the active document.
    ///
    /// Returns `true` when this changed the active document — everything
    /// cached for the previous one is dropped, and the caller must trigger a
    /// fresh scan explicitly. Returns `false` when the fingerprint is already
    /// active, in which case cached results stay valid.
    pub fn activate(&mut self, fingerprint: Fingerprint) -> bool {
        if self.active.as_ref() == Some(&fingerprint) {
            return false;
        }

        info!(%fingerprint, "new document fingerprint; dropping cached session state");
        self.active = Some(fingerprint);
        self.outcome = None;
        self.artifacts.clear();
        true
    }

    /// Fingerprint of the active document, if any.
    pub fn active_fingerprint(&self) -> Option<&Fingerprint> {
        self.active.as_ref()
    }

    // -- Scan outcome ---------------------------------------------------------

    /// Store a completed scan outcome for the active document.
    pub fn store_outcome(
        &mut self,
        fingerprint: &Fingerprint,
        outcome: ScanOutcome,
    ) -> Result<(), GazetteerError> {
        self.check_active(fingerprint)?;
        debug!(matched = outcome.len(), "scan outcome cached");
        self.outcome = Some(outcome);
        Ok(())
    }

    /// The cached scan outcome for `fingerprint`, if it is the active
    /// document and a scan has completed.
    pub fn outcome(&self, fingerprint: &Fingerprint) -> Option<&ScanOutcome> {
        if self.active.as_ref() != Some(fingerprint) {
            return None;
        }
        self.outcome.as_ref()
    }

    // -- Page artifacts -------------------------------------------------------

    /// Store an exported artifact for a page of the active document.
    pub fn store_artifact(
        &mut self,
        fingerprint: &Fingerprint,
        page_index: usize,
        artifact: PageArtifact,
    ) -> Result<(), GazetteerError> {
        self.check_active(fingerprint)?;
        self.artifacts.insert(page_index, artifact);
        Ok(())
    }

    /// The cached artifact for (`fingerprint`, `page_index`), if present.
    pub fn artifact(&self, fingerprint: &Fingerprint, page_index: usize) -> Option<&PageArtifact> {
        if self.active.as_ref() != Some(fingerprint) {
            return None;
        }
        self.artifacts.get(&page_index)
    }

    /// Drop all cached state, including the active fingerprint.
    pub fn clear(&mut self) {
        self.active = None;
        self.outcome = None;
        self.artifacts.clear();
    }

    fn check_active(&self, fingerprint: &Fingerprint) -> Result<(), GazetteerError> {
        match self.active.as_ref() {
            Some(active) if active == fingerprint => Ok(()),
            Some(active) => Err(GazetteerError::StaleFingerprint {
                active: active.as_hex().to_owned(),
                offered: fingerprint.as_hex().to_owned(),
            }),
            None => Err(GazetteerError::StaleFingerprint {
                active: "<none>".to_owned(),
                offered: fingerprint.as_hex().to_owned(),
            }),
        }
    }
}
