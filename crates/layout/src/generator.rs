//! Multi-page run driver
//!
//! Pages are independent units of work and are generated on the rayon pool.
//! Each page gets its own random source derived from the run seed and its
//! index, so page content does not depend on scheduling. The ledger is the
//! only shared state.

use crate::compositor::{GeneratedPage, PageCompositor, PageReport};
use crate::config::LayoutConfig;
use crate::ledger::{AnnotationLedger, LedgerSnapshot, PageId};
use crate::provider::ContentProvider;
use crate::Result;
use page_canvas::{OutputFormat, PageCanvas};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Destination for finished page images
pub trait PageSink: Sync {
    /// Encoding used for page files
    fn format(&self) -> OutputFormat {
        OutputFormat::default()
    }

    /// File reference recorded for a page id
    fn file_name(&self, page_id: PageId) -> String {
        format!("page_{}.{}", page_id, self.format().extension())
    }

    /// Persist one page; failures abort the run
    fn write_page(&self, file_ref: &str, canvas: &PageCanvas) -> Result<()>;
}

/// Outcome counters of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub requested: u64,
    pub written: u64,
    /// Degenerate pages dropped by policy
    pub dropped: u64,
    /// Pages never started because the run was cancelled
    pub cancelled: u64,
    /// Block-level counters summed over all pages
    pub blocks: PageReport,
}

enum PageOutcome {
    Written(PageReport),
    Dropped,
    Cancelled,
}

/// Derive the seed of one page from the run seed
pub fn page_seed(run_seed: u64, index: u64) -> u64 {
    // splitmix64 finaliser
    let mut z = run_seed.wrapping_add(index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Generates a dataset of pages with one shared ledger
pub struct DatasetGenerator<P> {
    config: LayoutConfig,
    provider: P,
    ledger: AnnotationLedger,
    seed: u64,
    cancel: Arc<AtomicBool>,
}

impl<P: ContentProvider> DatasetGenerator<P> {
    /// Create a generator; fails if the configuration is invalid
    pub fn new(config: LayoutConfig, provider: P) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            provider,
            ledger: AnnotationLedger::new(),
            seed,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Continue numbering from an existing ledger
    pub fn with_ledger(mut self, ledger: AnnotationLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Seed the run actually uses
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn ledger(&self) -> &AnnotationLedger {
        &self.ledger
    }

    /// Flag that stops the run before the next page starts
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Generate `pages` pages into `sink`
    ///
    /// Runs on the current rayon pool. A sink failure stops the run with an
    /// error; pages already committed stay in the ledger.
    pub fn run(&self, pages: u64, sink: &dyn PageSink) -> Result<RunSummary> {
        log::info!("generating {} pages with seed {}", pages, self.seed);
        let compositor = PageCompositor::new(&self.config, &self.provider);

        let outcomes: Vec<PageOutcome> = (0..pages)
            .into_par_iter()
            .map(|index| self.run_page(&compositor, index, sink))
            .collect::<Result<Vec<_>>>()?;

        let mut summary = RunSummary {
            requested: pages,
            ..RunSummary::default()
        };
        for outcome in outcomes {
            match outcome {
                PageOutcome::Written(report) => {
                    summary.written += 1;
                    summary.blocks += report;
                }
                PageOutcome::Dropped => summary.dropped += 1,
                PageOutcome::Cancelled => summary.cancelled += 1,
            }
        }

        log::info!(
            "wrote {} pages ({} dropped, {} cancelled), {} annotations in ledger",
            summary.written,
            summary.dropped,
            summary.cancelled,
            self.ledger.annotation_count()
        );
        if summary.blocks.skipped() > 0 {
            log::warn!("{} blocks skipped during rendering", summary.blocks.skipped());
        }
        Ok(summary)
    }

    fn run_page(
        &self,
        compositor: &PageCompositor<'_, P>,
        index: u64,
        sink: &dyn PageSink,
    ) -> Result<PageOutcome> {
        if self.cancel.load(Ordering::Relaxed) {
            return Ok(PageOutcome::Cancelled);
        }

        let mut rng = StdRng::seed_from_u64(page_seed(self.seed, index));
        let page = compositor.generate_page(&mut rng, &self.ledger, index + 1, |id| {
            sink.file_name(id)
        });

        match page {
            Some(GeneratedPage {
                committed,
                canvas,
                report,
            }) => {
                sink.write_page(&committed.file_ref, &canvas)?;
                Ok(PageOutcome::Written(report))
            }
            None => Ok(PageOutcome::Dropped),
        }
    }

    /// Copy of the ledger for persistence
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    pub fn into_ledger(self) -> AnnotationLedger {
        self.ledger
    }
}
