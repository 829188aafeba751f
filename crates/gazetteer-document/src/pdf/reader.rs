// SPDX-License-Identifier: PMPL-1.0-or-later
//
// PDF reader — open an uploaded gazette, extract per-page text, and clone a
// single page into a standalone PDF using the `lopdf` crate.

use std::collections::{BTreeMap, BTreeSet};

use gazetteer_core::error::GazetteerError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, instrument, warn};

/// Page attributes that may be inherited from ancestor /Pages nodes and must
/// be materialised onto an exported page, since the export severs the page
/// from its original tree.
const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Reads an uploaded gazette PDF held in memory.
///
/// Wraps `lopdf::Document` and exposes the three container operations the
/// pipeline needs: page count, per-page text extraction, and single-page
/// export. All page indices at this surface are 0-based; lopdf's 1-based page
/// numbering stays internal.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Load a PDF from the uploaded byte buffer.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, GazetteerError> {
        let document = Document::load_mem(data).map_err(|err| {
            GazetteerError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    // -- Text extraction ------------------------------------------------------

    /// Extract the native text layer of a page (0-based index).
    ///
    /// Returns an empty string for pages with no extractable text — absence of
    /// text is a valid state, not an error. Returns `Err` for out-of-range
    /// indices and for pages whose content streams cannot be decoded, so the
    /// caller can decide whether to log, surface, or treat the page as
    /// non-matching.
    pub fn page_text(&self, page_index: usize) -> Result<String, GazetteerError> {
        let page_number = self.page_number(page_index)?;
        self.document.extract_text(&[page_number]).map_err(|err| {
            GazetteerError::PdfError(format!(
                "text extraction failed on page {}: {}",
                page_index, err
            ))
        })
    }

    // -- Single-page export ---------------------------------------------------

    /// Export one page (0-based index) as a standalone single-page PDF.
    ///
    /// The page object and everything it transitively references — content
    /// streams, fonts, images — are cloned into a fresh document with its own
    /// page tree. Attributes the page inherits from ancestor /Pages nodes
    /// (resources, media box, rotation) are materialised onto the exported
    /// page so the output renders identically on its own.
    #[instrument(skip(self), fields(page_index))]
    pub fn extract_page(&self, page_index: usize) -> Result<Vec<u8>, GazetteerError> {
        let page_number = self.page_number(page_index)?;
        let pages = self.document.get_pages();
        let page_id: ObjectId = *pages.get(&page_number).ok_or_else(|| {
            GazetteerError::PdfError(format!("page {} not found in page tree", page_index))
        })?;

        let mut target = Document::with_version("1.5");
        let mut memo: BTreeMap<ObjectId, ObjectId> = BTreeMap::new();

        let cloned_page_id = clone_referenced(&self.document, &mut target, page_id, &mut memo)?;

        // Pull down inherited attributes the clone could not see because
        // /Parent links are not followed.
        for key in INHERITABLE_PAGE_KEYS {
            if self.page_has_attribute(page_id, key) {
                continue;
            }
            if let Some(value) = inherited_attribute(&self.document, page_id, key) {
                let cloned_value = clone_object(&self.document, &mut target, &value, &mut memo)?;
                if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(cloned_page_id) {
                    page_dict.set(key, cloned_value);
                }
            }
        }

        // Build the minimal page tree: one /Pages node with a single kid, and
        // a catalog pointing at it.
        let pages_id = target.new_object_id();
        if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(cloned_page_id) {
            page_dict.set("Parent", Object::Reference(pages_id));
        }

        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(1)),
            ("Kids", Object::Array(vec![Object::Reference(cloned_page_id)])),
        ]);
        target.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = target.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        target.trailer.set("Root", Object::Reference(catalog_id));

        let mut output = Vec::new();
        target.save_to(&mut output).map_err(|err| {
            GazetteerError::PdfError(format!("failed to serialise extracted page: {}", err))
        })?;

        debug!(page_index, output_bytes = output.len(), "Page exported");
        Ok(output)
    }

    // -- Helpers --------------------------------------------------------------

    /// Map a 0-based page index onto lopdf's 1-based page number, range-checked.
    fn page_number(&self, page_index: usize) -> Result<u32, GazetteerError> {
        let page_count = self.page_count();
        if page_index >= page_count {
            return Err(GazetteerError::PageOutOfRange {
                page: page_index,
                page_count,
            });
        }
        Ok(page_index as u32 + 1)
    }

    /// Whether the page dictionary itself carries the given attribute.
    fn page_has_attribute(&self, page_id: ObjectId, key: &[u8]) -> bool {
        matches!(
            self.document.get_object(page_id),
            Ok(Object::Dictionary(dict)) if dict.has(key)
        )
    }
}

/// Walk the /Parent chain of a page looking for an inheritable attribute,
/// returning the nearest ancestor's value.
///
/// Malformed documents can carry /Parent chains that loop; a revisited node
/// ends the walk with `None` rather than spinning.
fn inherited_attribute(source: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut visited: BTreeSet<ObjectId> = BTreeSet::new();
    let mut current = page_id;
    loop {
        if !visited.insert(current) {
            warn!(?current, "cycle in /Parent chain; abandoning attribute lookup");
            return None;
        }
        let Ok(Object::Dictionary(dict)) = source.get_object(current) else {
            return None;
        };
        if current != page_id
            && let Ok(value) = dict.get(key)
        {
            return Some(value.clone());
        }
        current = dict.get(b"Parent").ok().and_then(|p| p.as_reference().ok())?;
    }
}

/// Clone the object behind a reference from `source` into `target`, returning
/// its id in the target document.
///
/// The memo table maps source ids to target ids. It is consulted before any
/// clone and seeded before recursing, so shared resources (a font used by
/// many pages, say) are cloned exactly once and reference cycles terminate.
fn clone_referenced(
    source: &Document,
    target: &mut Document,
    id: ObjectId,
    memo: &mut BTreeMap<ObjectId, ObjectId>,
) -> Result<ObjectId, GazetteerError> {
    if let Some(&mapped) = memo.get(&id) {
        return Ok(mapped);
    }

    let new_id = target.new_object_id();
    memo.insert(id, new_id);

    let object = source.get_object(id).map_err(|err| {
        GazetteerError::PdfError(format!("cannot read object {:?}: {}", id, err))
    })?;
    let cloned = clone_object(source, target, object, memo)?;
    target.objects.insert(new_id, cloned);

    Ok(new_id)
}

/// Deep-clone a single lopdf object, rewriting every reference it contains to
/// point into `target`. /Parent entries are dropped — the exported page gets a
/// fresh parent, and following them would clone the entire source page tree.
fn clone_object(
    source: &Document,
    target: &mut Document,
    object: &Object,
    memo: &mut BTreeMap<ObjectId, ObjectId>,
) -> Result<Object, GazetteerError> {
    match object {
        Object::Dictionary(dict) => Ok(Object::Dictionary(clone_dictionary(
            source, target, dict, memo,
        )?)),
        Object::Array(items) => {
            let mut cloned = Vec::with_capacity(items.len());
            for item in items {
                cloned.push(clone_object(source, target, item, memo)?);
            }
            Ok(Object::Array(cloned))
        }
        Object::Reference(id) => match clone_referenced(source, target, *id, memo) {
            Ok(new_id) => Ok(Object::Reference(new_id)),
            Err(err) => {
                // Dangling references occur in real-world gazettes; a Null in
                // their place keeps the rest of the page intact.
                warn!(?id, %err, "Cannot resolve reference, using Null");
                Ok(Object::Null)
            }
        },
        Object::Stream(stream) => {
            let dict = clone_dictionary(source, target, &stream.dict, memo)?;
            Ok(Object::Stream(lopdf::Stream::new(
                dict,
                stream.content.clone(),
            )))
        }
        // Boolean, Integer, Real, String, Name, Null are trivially cloneable.
        other => Ok(other.clone()),
    }
}

fn clone_dictionary(
    source: &Document,
    target: &mut Document,
    dict: &Dictionary,
    memo: &mut BTreeMap<ObjectId, ObjectId>,
) -> Result<Dictionary, GazetteerError> {
    let mut cloned = Dictionary::new();
    for (key, value) in dict.iter() {
        if key == b"Parent" {
            continue;
        }
        cloned.set(key.clone(), clone_object(source, target, value, memo)?);
    }
    Ok(cloned)
}
