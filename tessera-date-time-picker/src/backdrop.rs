//! The modal backdrop shared by every picker of a document.
//!
//! A document owns at most one backdrop. It is created lazily by the first
//! [`Backdrop::acquire`] and every later acquire for the same document returns
//! a handle to that same backdrop. All handles read and write the same
//! visibility flag, so the last `show` or `hide` wins. The table keeps one
//! entry per document until [`Backdrop::release`] drops it.
use std::sync::{
    OnceLock,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Identifies the document a backdrop belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    /// The default document.
    pub const MAIN: DocumentId = DocumentId(0);

    /// Allocates a document id distinct from every other one.
    pub fn unique() -> Self {
        static NEXT_DOCUMENT: AtomicU64 = AtomicU64::new(1);
        DocumentId(NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::MAIN
    }
}

/// Stable identity of a created backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackdropId(u64);

struct BackdropEntry {
    id: BackdropId,
    shown: bool,
}

#[derive(Default)]
struct BackdropTable {
    next_id: u64,
    entries: FxHashMap<DocumentId, BackdropEntry>,
}

static BACKDROPS: OnceLock<RwLock<BackdropTable>> = OnceLock::new();

fn backdrop_table() -> &'static RwLock<BackdropTable> {
    BACKDROPS.get_or_init(|| RwLock::new(BackdropTable::default()))
}

/// Handle to a document's backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backdrop {
    document: DocumentId,
    id: BackdropId,
}

impl Backdrop {
    /// Returns the backdrop of `document`, creating it on first use.
    pub fn acquire(document: DocumentId) -> Self {
        let mut table = backdrop_table().write();
        let BackdropTable { next_id, entries } = &mut *table;
        let entry = entries.entry(document).or_insert_with(|| {
            let id = BackdropId(*next_id);
            *next_id += 1;
            debug!(?document, ?id, "created modal backdrop");
            BackdropEntry { id, shown: false }
        });
        Self {
            document,
            id: entry.id,
        }
    }

    /// Returns the backdrop's identity.
    pub fn id(&self) -> BackdropId {
        self.id
    }

    /// Returns the document the backdrop belongs to.
    pub fn document(&self) -> DocumentId {
        self.document
    }

    /// Shows the backdrop.
    pub fn show(&self) {
        self.set_shown(true);
    }

    /// Hides the backdrop. Hiding a hidden backdrop does nothing.
    pub fn hide(&self) {
        self.set_shown(false);
    }

    /// Drops the document's backdrop from the table.
    ///
    /// Every handle of the document becomes inert: `show` and `hide` do
    /// nothing and `is_shown` reports false. A later [`Backdrop::acquire`]
    /// creates a new backdrop with a fresh id. Returns false if the backdrop
    /// was already released.
    pub fn release(self) -> bool {
        let removed = backdrop_table().write().entries.remove(&self.document);
        if let Some(entry) = &removed {
            debug!(document = ?self.document, id = ?entry.id, "released modal backdrop");
        }
        removed.is_some()
    }

    /// Returns true while the backdrop is shown.
    pub fn is_shown(&self) -> bool {
        backdrop_table()
            .read()
            .entries
            .get(&self.document)
            .is_some_and(|entry| entry.shown)
    }

    fn set_shown(&self, shown: bool) {
        let mut table = backdrop_table().write();
        if let Some(entry) = table.entries.get_mut(&self.document) {
            entry.shown = shown;
        }
    }
}
