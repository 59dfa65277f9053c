//! Page composition
//!
//! A page is produced in two steps. [`PageCompositor::plan_page`] runs the
//! partitioner, sampler, placer and decomposer and yields pure geometry.
//! [`PageCompositor::compose_page`] asks the content provider for every
//! planned block, pastes the assets and collects the regions that actually
//! made it onto the canvas. Failures at either step drop single blocks,
//! never the page.

use crate::category::Category;
use crate::config::{EmptyPagePolicy, LayoutConfig, LayoutMode};
use crate::decompose::{decompose, Decomposition};
use crate::geometry::{BBox, Span};
use crate::ledger::{AnnotationLedger, CommittedPage, PageId};
use crate::partition::{Partitioner, Slot};
use crate::placement::{FreePlacer, PackedCursor, Placement, Placer};
use crate::provider::{ContentProvider, FigureKind, RenderContext, RenderRequest};
use crate::sampler::{BlockSampler, CategoryChoice, BLOCK_CATEGORIES, FIGURE_CATEGORIES};
use page_canvas::{fit_to_frame, ImageScaleMode, PageCanvas};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::AddAssign;

/// A block that survived placement
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedBlock {
    pub category: Category,
    /// Final placed box, caption strip included
    pub bbox: BBox,
    pub decomposition: Decomposition,
    pub context: RenderContext,
}

impl PlannedBlock {
    /// Annotated regions this block contributes once rendered
    pub fn regions(&self) -> Vec<(Category, BBox)> {
        self.decomposition.regions(self.category)
    }

    fn request(&self) -> RenderRequest {
        RenderRequest {
            category: self.category,
            width: self.bbox.w,
            height: self.bbox.h,
            context: self.context.clone(),
        }
    }
}

/// Per-page counters of everything that did not go to plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageReport {
    /// Blocks placed by the resolver
    pub placed: u64,
    /// Blocks rejected by the packed cursor
    pub overflow: u64,
    /// Blocks dropped after the free search ran out of attempts
    pub exhausted: u64,
    /// Blocks that could not fit their area at all
    pub too_large: u64,
    /// Blocks skipped because the provider failed
    pub render_failed: u64,
    /// Blocks skipped because the asset could not be fitted or pasted
    pub paste_failed: u64,
    /// Artifact pass failed and the unfiltered canvas was kept
    pub artifact_failed: u64,
}

impl PageReport {
    fn record(&mut self, placement: &Placement) {
        match placement {
            Placement::Placed(_) => self.placed += 1,
            Placement::Overflow => self.overflow += 1,
            Placement::Exhausted { .. } => self.exhausted += 1,
            Placement::TooLarge => self.too_large += 1,
        }
    }

    /// Blocks planned but missing from the finished page
    pub fn skipped(&self) -> u64 {
        self.render_failed + self.paste_failed
    }
}

impl AddAssign for PageReport {
    fn add_assign(&mut self, rhs: Self) {
        self.placed += rhs.placed;
        self.overflow += rhs.overflow;
        self.exhausted += rhs.exhausted;
        self.too_large += rhs.too_large;
        self.render_failed += rhs.render_failed;
        self.paste_failed += rhs.paste_failed;
        self.artifact_failed += rhs.artifact_failed;
    }
}

/// Geometry of one page before rendering
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub width: u32,
    pub height: u32,
    pub blocks: Vec<PlannedBlock>,
    pub report: PageReport,
}

/// A rendered page and the regions drawn on it
#[derive(Debug, Clone)]
pub struct ComposedPage {
    pub canvas: PageCanvas,
    /// Annotated regions in record order
    pub regions: Vec<(Category, BBox)>,
    pub report: PageReport,
}

impl ComposedPage {
    /// No content block made it onto the page; a page number alone does not count
    pub fn is_degenerate(&self) -> bool {
        self.regions
            .iter()
            .all(|(category, _)| *category == Category::PageNumber)
    }
}

/// A page that has been committed to the ledger
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    pub committed: CommittedPage,
    pub canvas: PageCanvas,
    pub report: PageReport,
}

/// Drives one page end to end
pub struct PageCompositor<'a, P: ?Sized> {
    config: &'a LayoutConfig,
    provider: &'a P,
}

impl<'a, P: ContentProvider + ?Sized> PageCompositor<'a, P> {
    /// Create a compositor over a validated configuration
    pub fn new(config: &'a LayoutConfig, provider: &'a P) -> Self {
        Self { config, provider }
    }

    /// Resolve the geometry of one page
    ///
    /// # Arguments
    /// * `rng` - Page-local random source
    /// * `number` - 1-based page number used for the page-number label
    pub fn plan_page<R: Rng>(&self, rng: &mut R, number: u64) -> PagePlan {
        let mut report = PageReport::default();
        let mut blocks = match self.config.mode {
            LayoutMode::Packed => self.plan_packed(rng, &mut report),
            LayoutMode::Free => self.plan_free(rng, &mut report),
        };

        if let Some(bbox) = self.config.page_number_box() {
            blocks.push(PlannedBlock {
                category: Category::PageNumber,
                bbox,
                decomposition: decompose(
                    Category::PageNumber,
                    bbox,
                    &self.config.captions,
                    self.config.axis_fraction,
                ),
                context: RenderContext {
                    font_size: self.config.text.font_size.sample(rng),
                    label: Some(format!("Page {}", number)),
                    seed: rng.gen(),
                    ..RenderContext::default()
                },
            });
        }

        log::debug!(
            "planned page {}: {} blocks, {} overflow, {} exhausted, {} too large",
            number,
            blocks.len(),
            report.overflow,
            report.exhausted,
            report.too_large
        );

        PagePlan {
            width: self.config.page.width,
            height: self.config.page.height,
            blocks,
            report,
        }
    }

    fn plan_packed<R: Rng>(&self, rng: &mut R, report: &mut PageReport) -> Vec<PlannedBlock> {
        let sampler = BlockSampler::new(self.config);
        let slots = Partitioner::new(self.config).partition(rng);
        let mut blocks = Vec::new();
        for slot in &slots {
            self.fill_slot(rng, &sampler, slot, report, &mut blocks);
        }
        blocks
    }

    /// Pack one slot; the first category drawn decides the slot's kind
    fn fill_slot<R: Rng>(
        &self,
        rng: &mut R,
        sampler: &BlockSampler<'_>,
        slot: &Slot,
        report: &mut PageReport,
        blocks: &mut Vec<PlannedBlock>,
    ) {
        let area = slot.bounds.size();
        let mut cursor = PackedCursor::new(
            slot.bounds,
            self.config.offset,
            self.config.jitter,
            self.config.gap,
        );

        let first = sampler.choose_category(rng, area, &BLOCK_CATEGORIES);
        if first.category == Category::Text {
            let size = sampler.sample_size(rng, Category::Text, area);
            let placement = cursor.place(rng, size);
            self.admit(rng, first, placement, report, blocks);
            return;
        }

        let shared = if self.config.figure.uniform_size {
            Some(sampler.sample_size(rng, first.category, area))
        } else {
            None
        };

        let mut choice = first;
        loop {
            let size = match shared {
                Some(size) => size,
                None => sampler.sample_size(rng, choice.category, area),
            };
            let placement = cursor.place(rng, size);
            if !self.admit(rng, choice, placement, report, blocks) {
                break;
            }
            choice = sampler.choose_category(rng, area, &FIGURE_CATEGORIES);
        }
    }

    fn plan_free<R: Rng>(&self, rng: &mut R, report: &mut PageReport) -> Vec<PlannedBlock> {
        let sampler = BlockSampler::new(self.config);
        let area = self.config.content_area();
        let occupied: Vec<BBox> = self.config.page_number_box().into_iter().collect();
        let mut placer =
            FreePlacer::new(area, self.config.free.max_attempts).with_occupied(occupied);

        let free = &self.config.free;
        let mut inventory = Vec::new();
        push_n(&mut inventory, Category::Image, free.images, rng);
        push_n(&mut inventory, Category::Graph, free.graphs, rng);
        push_n(&mut inventory, Category::Text, free.texts, rng);
        inventory.shuffle(rng);

        let mut blocks = Vec::new();
        for category in inventory {
            let size = sampler.sample_free_size(rng, category, area.size());
            let placement = placer.place(rng, size);
            let choice = CategoryChoice {
                category,
                bold: false,
            };
            self.admit(rng, choice, placement, report, &mut blocks);
        }
        blocks
    }

    /// Record the outcome of one placement; returns true if a block was added
    fn admit<R: Rng>(
        &self,
        rng: &mut R,
        choice: CategoryChoice,
        placement: Placement,
        report: &mut PageReport,
        blocks: &mut Vec<PlannedBlock>,
    ) -> bool {
        report.record(&placement);
        let bbox = match placement {
            Placement::Placed(bbox) => bbox,
            Placement::Exhausted { attempts } => {
                log::warn!(
                    "dropped {} block after {} placement attempts",
                    choice.category,
                    attempts
                );
                return false;
            }
            Placement::TooLarge => {
                log::debug!("{} block does not fit its area", choice.category);
                return false;
            }
            Placement::Overflow => return false,
        };

        let decomposition = decompose(
            choice.category,
            bbox,
            &self.config.captions,
            self.config.axis_fraction,
        );
        let context = self.context_for(rng, choice, &decomposition);
        blocks.push(PlannedBlock {
            category: choice.category,
            bbox,
            decomposition,
            context,
        });
        true
    }

    fn context_for<R: Rng>(
        &self,
        rng: &mut R,
        choice: CategoryChoice,
        decomposition: &Decomposition,
    ) -> RenderContext {
        let text = &self.config.text;
        let font_size = if choice.bold {
            text.bold_font_size.sample(rng)
        } else {
            text.font_size.sample(rng)
        };
        let figure = if choice.category == Category::Graph {
            FigureKind::ALL.choose(rng).copied()
        } else {
            None
        };

        RenderContext {
            bold: choice.bold,
            font_size,
            figure,
            caption_height: decomposition.caption.map_or(0, |c| c.h),
            label: None,
            seed: rng.gen(),
        }
    }

    /// Render and paste every planned block, then run the artifact pass
    pub fn compose_page<R: Rng>(&self, rng: &mut R, plan: &PagePlan) -> ComposedPage {
        let mut canvas = PageCanvas::blank(plan.width, plan.height);
        let mut report = plan.report;
        let mut regions = Vec::new();

        for block in &plan.blocks {
            let request = block.request();
            let asset = match self.provider.render(&request) {
                Ok(asset) => asset,
                Err(e) => {
                    log::warn!(
                        "skipping {} block at ({}, {}): {}",
                        block.category,
                        block.bbox.x,
                        block.bbox.y,
                        e
                    );
                    report.render_failed += 1;
                    continue;
                }
            };

            let fitted = if asset.dimensions() == (block.bbox.w, block.bbox.h) {
                Ok(asset)
            } else {
                fit_to_frame(&asset, block.bbox.w, block.bbox.h, ImageScaleMode::Stretch)
            };
            let pasted = fitted.and_then(|asset| canvas.paste(&asset, block.bbox.x, block.bbox.y));
            if let Err(e) = pasted {
                log::warn!("skipping {} block: {}", block.category, e);
                report.paste_failed += 1;
                continue;
            }

            regions.extend(block.regions());
        }

        if let Some(artifacts) = &self.config.artifacts {
            let filter = artifacts.filter();
            if !filter.is_noop() {
                let filtered = filter.apply(rng, canvas.image());
                match filtered {
                    Ok(filtered) => canvas = PageCanvas::from_image(filtered),
                    Err(e) => {
                        log::warn!("artifact pass failed, keeping unfiltered page: {}", e);
                        report.artifact_failed += 1;
                    }
                }
            }
        }

        ComposedPage {
            canvas,
            regions,
            report,
        }
    }

    /// Plan, compose and commit one page
    ///
    /// Returns `None` when the page is degenerate and the configuration
    /// drops such pages; nothing is recorded in that case.
    pub fn generate_page<R, F>(
        &self,
        rng: &mut R,
        ledger: &AnnotationLedger,
        number: u64,
        name: F,
    ) -> Option<GeneratedPage>
    where
        R: Rng,
        F: FnOnce(PageId) -> String,
    {
        let plan = self.plan_page(rng, number);
        let composed = self.compose_page(rng, &plan);

        if composed.is_degenerate() && self.config.empty_pages == EmptyPagePolicy::Drop {
            log::info!("page {} has no content blocks, dropping it", number);
            return None;
        }

        let committed = ledger.commit_page(plan.width, plan.height, name, &composed.regions);
        log::debug!(
            "committed page {} as id {} with {} annotations",
            number,
            committed.page_id,
            composed.regions.len()
        );

        Some(GeneratedPage {
            committed,
            canvas: composed.canvas,
            report: composed.report,
        })
    }
}

fn push_n<R: Rng>(inventory: &mut Vec<Category>, category: Category, count: Span, rng: &mut R) {
    let n = count.sample(rng);
    inventory.extend(std::iter::repeat(category).take(n as usize));
}
