//! Block category and size sampling

use crate::category::Category;
use crate::config::LayoutConfig;
use crate::geometry::{Size, Span};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Categories a free-standing block may be sampled as
pub const BLOCK_CATEGORIES: [Category; 3] = [Category::Image, Category::Graph, Category::Text];

/// Categories allowed after a slot has started a figure row
pub const FIGURE_CATEGORIES: [Category; 2] = [Category::Image, Category::Graph];

/// Sampled category plus the text emphasis hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryChoice {
    pub category: Category,
    /// Slot was too low for figures and drew a bold header
    pub bold: bool,
}

/// Draws block categories and concrete sizes within slot constraints
pub struct BlockSampler<'a> {
    config: &'a LayoutConfig,
}

impl<'a> BlockSampler<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    fn weight(&self, category: Category) -> u32 {
        let w = &self.config.weights;
        match category {
            Category::Image => w.image,
            Category::Graph => w.graph,
            Category::Text => w.text,
            _ => 0,
        }
    }

    /// Weighted choice among `allowed`, forced to `Text` in low slots
    ///
    /// Falls back to `Text` when every allowed weight is zero and `Text` is
    /// allowed, otherwise to the first allowed category.
    pub fn choose_category<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        slot: Size,
        allowed: &[Category],
    ) -> CategoryChoice {
        if slot.height < self.config.text_only_below && allowed.contains(&Category::Text) {
            let bold = rng.gen_bool(self.config.text.bold_probability);
            return CategoryChoice {
                category: Category::Text,
                bold,
            };
        }

        let weights: Vec<u32> = allowed.iter().map(|&c| self.weight(c)).collect();
        let category = match WeightedIndex::new(&weights) {
            Ok(dist) => allowed[dist.sample(rng)],
            Err(_) => {
                let fallback = if allowed.contains(&Category::Text) {
                    Category::Text
                } else {
                    allowed.first().copied().unwrap_or(Category::Text)
                };
                log::debug!("all weights zero for {:?}, using {}", allowed, fallback);
                fallback
            }
        };

        CategoryChoice {
            category,
            bold: false,
        }
    }

    /// Concrete size for a block inside a slot of size `slot`
    ///
    /// Never exceeds the slot; configured minimums larger than the slot are
    /// clipped to it. Returns an empty size only for an empty slot.
    pub fn sample_size<R: Rng + ?Sized>(&self, rng: &mut R, category: Category, slot: Size) -> Size {
        if slot.is_empty() {
            return Size::new(0, 0);
        }
        match category {
            Category::Text => self.text_size(rng, slot),
            _ => self.figure_size(rng, slot),
        }
    }

    /// Size for a block scattered over the whole area under the free strategy
    pub fn sample_free_size<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        category: Category,
        area: Size,
    ) -> Size {
        if area.is_empty() {
            return Size::new(0, 0);
        }
        match category {
            Category::Text => {
                let inset = self.config.text.width_inset.clipped(area.width - 1).sample(rng);
                let height = self
                    .config
                    .text
                    .free_height
                    .clipped(area.height)
                    .sample(rng)
                    .max(1);
                Size::new(area.width - inset, height)
            }
            _ => self.figure_size(rng, area),
        }
    }

    fn text_size<R: Rng + ?Sized>(&self, rng: &mut R, slot: Size) -> Size {
        let text = &self.config.text;
        let w_inset = text.width_inset.clipped(slot.width - 1).sample(rng);
        let h_inset = text.height_inset.clipped(slot.height - 1).sample(rng);
        Size::new(slot.width - w_inset, slot.height - h_inset)
    }

    fn figure_size<R: Rng + ?Sized>(&self, rng: &mut R, slot: Size) -> Size {
        let fig = &self.config.figure;
        if fig.square {
            let side = clip_span(fig.height_span(), slot.width.min(slot.height)).sample(rng);
            return Size::new(side, side);
        }
        let height = clip_span(fig.height_span(), slot.height).sample(rng);
        let width = clip_span(fig.width_span(), slot.width).sample(rng);
        Size::new(width, height)
    }
}

/// Clip a span to `[1, limit]`
fn clip_span(span: Span, limit: u32) -> Span {
    let s = span.clipped(limit);
    Span::new(s.min.max(1), s.max.max(1))
}
