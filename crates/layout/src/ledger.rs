//! Annotation ledger
//!
//! Append-only store of page and annotation records for one run. Both id
//! counters live behind a single mutex together with the records, so ids are
//! strictly increasing in record order and never reused, and a page committed
//! through [`AnnotationLedger::commit_page`] lands with all of its
//! annotations or none of them.

use crate::category::Category;
use crate::geometry::BBox;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::{Mutex, MutexGuard};

/// Identifier of a page record
pub type PageId = u64;

/// Identifier of an annotation record
pub type AnnotationId = u64;

/// One generated page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: PageId,
    pub file_ref: String,
    pub width: u32,
    pub height: u32,
}

/// One annotated region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: AnnotationId,
    pub page_id: PageId,
    pub category: Category,
    pub bbox: BBox,
    pub area: u64,
}

impl AnnotationRecord {
    fn new(id: AnnotationId, page_id: PageId, category: Category, bbox: BBox) -> Self {
        Self {
            id,
            page_id,
            category,
            bbox,
            area: bbox.area(),
        }
    }

    pub fn category_id(&self) -> u32 {
        self.category.id()
    }
}

/// Ids handed out by a page commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedPage {
    pub page_id: PageId,
    pub file_ref: String,
    pub annotation_ids: Range<AnnotationId>,
}

/// Immutable copy of the ledger contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub pages: Vec<PageRecord>,
    pub annotations: Vec<AnnotationRecord>,
}

impl LedgerSnapshot {
    /// Fixed category table `(id, name)`
    pub fn categories(&self) -> Vec<(u32, &'static str)> {
        Category::ALL.iter().map(|c| (c.id(), c.name())).collect()
    }

    /// Annotations belonging to one page
    pub fn annotations_for(&self, page_id: PageId) -> impl Iterator<Item = &AnnotationRecord> {
        self.annotations.iter().filter(move |a| a.page_id == page_id)
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    next_page: PageId,
    next_annotation: AnnotationId,
    pages: Vec<PageRecord>,
    annotations: Vec<AnnotationRecord>,
}

/// Process-wide page and annotation store
#[derive(Debug, Default)]
pub struct AnnotationLedger {
    state: Mutex<LedgerState>,
}

impl AnnotationLedger {
    /// Empty ledger with both counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty ledger whose counters start at the given ids
    pub fn starting_at(page: PageId, annotation: AnnotationId) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                next_page: page,
                next_annotation: annotation,
                ..LedgerState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        // Records are only appended after every fallible step, so a
        // poisoned lock still guards consistent data.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a page and return its id
    pub fn record_page(&self, width: u32, height: u32, file_ref: impl Into<String>) -> PageId {
        let mut state = self.lock();
        let id = state.next_page;
        state.next_page += 1;
        state.pages.push(PageRecord {
            id,
            file_ref: file_ref.into(),
            width,
            height,
        });
        id
    }

    /// Record one annotation; `area` is computed from `bbox`
    pub fn record_annotation(&self, page_id: PageId, category: Category, bbox: BBox) -> AnnotationId {
        let mut state = self.lock();
        let id = state.next_annotation;
        state.next_annotation += 1;
        state
            .annotations
            .push(AnnotationRecord::new(id, page_id, category, bbox));
        id
    }

    /// Record a page together with all of its annotations atomically
    ///
    /// `name` receives the new page id and returns the page's file reference.
    pub fn commit_page<F>(
        &self,
        width: u32,
        height: u32,
        name: F,
        regions: &[(Category, BBox)],
    ) -> CommittedPage
    where
        F: FnOnce(PageId) -> String,
    {
        let mut state = self.lock();

        let page_id = state.next_page;
        let file_ref = name(page_id);
        let first = state.next_annotation;
        let last = first + regions.len() as AnnotationId;

        state.next_page += 1;
        state.next_annotation = last;
        state.pages.push(PageRecord {
            id: page_id,
            file_ref: file_ref.clone(),
            width,
            height,
        });
        for (id, (category, bbox)) in (first..last).zip(regions) {
            state
                .annotations
                .push(AnnotationRecord::new(id, page_id, *category, *bbox));
        }

        CommittedPage {
            page_id,
            file_ref,
            annotation_ids: first..last,
        }
    }

    pub fn page_count(&self) -> usize {
        self.lock().pages.len()
    }

    pub fn annotation_count(&self) -> usize {
        self.lock().annotations.len()
    }

    /// Copy of every record so far
    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = self.lock();
        LedgerSnapshot {
            pages: state.pages.clone(),
            annotations: state.annotations.clone(),
        }
    }

    /// Consume the ledger, handing its records to persistence
    pub fn into_snapshot(self) -> LedgerSnapshot {
        let state = self.state.into_inner().unwrap_or_else(|e| e.into_inner());
        LedgerSnapshot {
            pages: state.pages,
            annotations: state.annotations,
        }
    }
}
