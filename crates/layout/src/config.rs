//! Layout configuration schema
//!
//! Every field has a default, so `{}` is a valid configuration. Unknown keys
//! are rejected to catch typos before a long run starts.

use crate::geometry::{BBox, Span};
use crate::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration for a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LayoutConfig {
    /// Page geometry
    #[serde(default)]
    pub page: PageConfig,

    /// Placement strategy
    #[serde(default)]
    pub mode: LayoutMode,

    /// Column partitioning
    #[serde(default)]
    pub columns: ColumnConfig,

    /// Row partitioning
    #[serde(default)]
    pub rows: RowConfig,

    /// Category weights for sampling
    #[serde(default)]
    pub weights: CategoryWeights,

    /// Image and graph sizes
    #[serde(default)]
    pub figure: FigureConfig,

    /// Text block sizes and style hints
    #[serde(default)]
    pub text: TextConfig,

    /// Slots lower than this are always filled with text
    #[serde(default = "default_text_only_below")]
    pub text_only_below: u32,

    /// Vertical/horizontal offset policy inside a slot
    #[serde(default)]
    pub offset: OffsetPolicy,

    /// Maximum horizontal jitter for the jittered policy
    #[serde(default = "default_jitter")]
    pub jitter: u32,

    /// Randomised gap after each packed block
    #[serde(default = "default_gap")]
    pub gap: Span,

    /// Caption strips
    #[serde(default)]
    pub captions: CaptionConfig,

    /// Fraction of a graph's width/height used for axis strips
    #[serde(default = "default_axis_fraction")]
    pub axis_fraction: f64,

    /// Free-placement parameters
    #[serde(default)]
    pub free: FreeConfig,

    /// Optional page number in the footer band
    #[serde(default)]
    pub page_number: Option<PageNumberConfig>,

    /// What to do with pages where nothing could be placed
    #[serde(default)]
    pub empty_pages: EmptyPagePolicy,

    /// Optional digital-artifact pass on finished pages
    #[serde(default)]
    pub artifacts: Option<ArtifactConfig>,

    /// Seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            mode: LayoutMode::default(),
            columns: ColumnConfig::default(),
            rows: RowConfig::default(),
            weights: CategoryWeights::default(),
            figure: FigureConfig::default(),
            text: TextConfig::default(),
            text_only_below: default_text_only_below(),
            offset: OffsetPolicy::default(),
            jitter: default_jitter(),
            gap: default_gap(),
            captions: CaptionConfig::default(),
            axis_fraction: default_axis_fraction(),
            free: FreeConfig::default(),
            page_number: None,
            empty_pages: EmptyPagePolicy::default(),
            artifacts: None,
            seed: None,
        }
    }
}

impl LayoutConfig {
    /// Parse and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LayoutConfig =
            serde_json::from_str(json).map_err(|e| LayoutError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LayoutError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Reject configurations that cannot produce any legal page
    ///
    /// Inconsistent size ranges are not errors; the sampler clips them.
    pub fn validate(&self) -> Result<()> {
        let p = &self.page;
        if p.width == 0 || p.height == 0 {
            return Err(LayoutError::ConfigError(format!(
                "page size must be positive, got {}x{}",
                p.width, p.height
            )));
        }
        let margins = p.margin.saturating_mul(2);
        if p.width <= margins || p.height <= margins {
            return Err(LayoutError::ConfigError(format!(
                "margin {} leaves no usable area on a {}x{} page",
                p.margin, p.width, p.height
            )));
        }
        if self.columns.min == 0 || self.columns.max == 0 {
            return Err(LayoutError::ConfigError(
                "column count must be at least 1".to_string(),
            ));
        }
        let cols = self.columns.max.max(self.columns.min);
        if (cols - 1).saturating_mul(self.columns.gap) >= p.width - margins {
            return Err(LayoutError::ConfigError(format!(
                "{} columns with gap {} do not fit the usable width",
                cols, self.columns.gap
            )));
        }
        if self.rows.min_step == 0 && self.rows.max_step == 0 {
            return Err(LayoutError::ConfigError(
                "row step range must not be zero".to_string(),
            ));
        }
        if self.free.max_attempts == 0 {
            return Err(LayoutError::ConfigError(
                "free.maxAttempts must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.axis_fraction) {
            return Err(LayoutError::ConfigError(format!(
                "axisFraction must be in [0, 1), got {}",
                self.axis_fraction
            )));
        }
        if !(0.0..=1.0).contains(&self.text.bold_probability) {
            return Err(LayoutError::ConfigError(format!(
                "text.boldProbability must be in [0, 1], got {}",
                self.text.bold_probability
            )));
        }
        if let Some(pn) = &self.page_number {
            if pn.width == 0 || pn.height == 0 {
                return Err(LayoutError::ConfigError(
                    "pageNumber size must be positive".to_string(),
                ));
            }
            if pn.width > p.width - margins
                || pn.height.saturating_add(pn.gap) >= p.height - margins
            {
                return Err(LayoutError::ConfigError(
                    "pageNumber band does not fit inside the margins".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The legal area `[margin, width - margin] x [margin, height - margin]`
    pub fn content_area(&self) -> BBox {
        let p = &self.page;
        BBox::new(
            p.margin,
            p.margin,
            p.width.saturating_sub(p.margin.saturating_mul(2)),
            p.height.saturating_sub(p.margin.saturating_mul(2)),
        )
    }

    /// Bounding box reserved for the page number, if enabled
    pub fn page_number_box(&self) -> Option<BBox> {
        let pn = self.page_number.as_ref()?;
        let area = self.content_area();
        let x = match pn.position {
            PageNumberPosition::Right => area.right() - pn.width,
            PageNumberPosition::Center => area.x + (area.w - pn.width) / 2,
        };
        Some(BBox::new(x, area.bottom() - pn.height, pn.width, pn.height))
    }

    /// Content area minus the footer band reserved for the page number
    pub fn body_area(&self) -> BBox {
        let area = self.content_area();
        match &self.page_number {
            Some(pn) => BBox::new(area.x, area.y, area.w, area.h - pn.height - pn.gap),
            None => area,
        }
    }
}

/// Page geometry in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PageConfig {
    #[serde(default = "default_page_width")]
    pub width: u32,
    #[serde(default = "default_page_height")]
    pub height: u32,
    #[serde(default = "default_margin")]
    pub margin: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: default_page_width(),
            height: default_page_height(),
            margin: default_margin(),
        }
    }
}

/// Placement strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Rows and columns packed left to right
    #[default]
    Packed,
    /// Random scattering over the whole page with overlap checks
    Free,
}

/// Number of columns and the gap between them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ColumnConfig {
    #[serde(default = "default_min_columns")]
    pub min: u32,
    #[serde(default = "default_max_columns")]
    pub max: u32,
    #[serde(default = "default_column_gap")]
    pub gap: u32,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            min: default_min_columns(),
            max: default_max_columns(),
            gap: default_column_gap(),
        }
    }
}

/// Row step range for the partitioner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RowConfig {
    #[serde(default = "default_min_step")]
    pub min_step: u32,
    #[serde(default = "default_max_step")]
    pub max_step: u32,
}

impl RowConfig {
    pub fn span(&self) -> Span {
        Span::new(self.min_step, self.max_step).normalized()
    }
}

impl Default for RowConfig {
    fn default() -> Self {
        Self {
            min_step: default_min_step(),
            max_step: default_max_step(),
        }
    }
}

/// Relative sampling weights
///
/// Keys missing from a given object count as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryWeights {
    #[serde(default)]
    pub image: u32,
    #[serde(default)]
    pub graph: u32,
    #[serde(default)]
    pub text: u32,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            image: 30,
            graph: 20,
            text: 50,
        }
    }
}

/// Image and graph size ranges (total height, caption strip included)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FigureConfig {
    #[serde(default = "default_figure_min_width")]
    pub min_width: u32,
    #[serde(default = "default_figure_max_width")]
    pub max_width: u32,
    #[serde(default = "default_figure_min_height")]
    pub min_height: u32,
    #[serde(default = "default_figure_max_height")]
    pub max_height: u32,
    /// Force width == height
    #[serde(default)]
    pub square: bool,
    /// Share one sampled size among all figures of a slot
    #[serde(default)]
    pub uniform_size: bool,
}

impl FigureConfig {
    pub fn width_span(&self) -> Span {
        Span::new(self.min_width, self.max_width).normalized()
    }

    pub fn height_span(&self) -> Span {
        Span::new(self.min_height, self.max_height).normalized()
    }
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            min_width: default_figure_min_width(),
            max_width: default_figure_max_width(),
            min_height: default_figure_min_height(),
            max_height: default_figure_max_height(),
            square: false,
            uniform_size: false,
        }
    }
}

/// Text block sizing and rendering hints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TextConfig {
    /// Amount removed from the slot width
    #[serde(default = "default_width_inset")]
    pub width_inset: Span,
    /// Amount removed from the slot height
    #[serde(default = "default_height_inset")]
    pub height_inset: Span,
    /// Text height under the free strategy
    #[serde(default = "default_free_height")]
    pub free_height: Span,
    #[serde(default = "default_font_size")]
    pub font_size: Span,
    #[serde(default = "default_bold_font_size")]
    pub bold_font_size: Span,
    /// Chance that a forced-text slot is drawn bold
    #[serde(default = "default_bold_probability")]
    pub bold_probability: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            width_inset: default_width_inset(),
            height_inset: default_height_inset(),
            free_height: default_free_height(),
            font_size: default_font_size(),
            bold_font_size: default_bold_font_size(),
            bold_probability: default_bold_probability(),
        }
    }
}

/// Offset policy inside a slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetPolicy {
    /// Top-aligned, flush with the cursor
    #[default]
    Fixed,
    /// Random vertical offset in the free space, small horizontal jitter
    Jittered,
}

/// Caption strip heights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CaptionConfig {
    #[serde(default = "default_image_caption")]
    pub image_height: u32,
    #[serde(default = "default_graph_caption")]
    pub graph_height: u32,
    /// Also split a caption strip off image blocks
    #[serde(default = "default_true")]
    pub decompose_images: bool,
}

impl CaptionConfig {
    /// Caption height for a category, zero when it gets none
    pub fn height_for(&self, category: crate::Category) -> u32 {
        match category {
            crate::Category::Graph => self.graph_height,
            crate::Category::Image if self.decompose_images => self.image_height,
            _ => 0,
        }
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            image_height: default_image_caption(),
            graph_height: default_graph_caption(),
            decompose_images: true,
        }
    }
}

/// Free-placement parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FreeConfig {
    /// Retry budget per block
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Images per page
    #[serde(default = "default_free_images")]
    pub images: Span,
    /// Graphs per page
    #[serde(default = "default_free_graphs")]
    pub graphs: Span,
    /// Text blocks per page
    #[serde(default = "default_free_texts")]
    pub texts: Span,
}

impl Default for FreeConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            images: default_free_images(),
            graphs: default_free_graphs(),
            texts: default_free_texts(),
        }
    }
}

/// Where the page number sits in the footer band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageNumberPosition {
    #[default]
    Right,
    Center,
}

/// Page number block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PageNumberConfig {
    #[serde(default)]
    pub position: PageNumberPosition,
    #[serde(default = "default_page_number_width")]
    pub width: u32,
    #[serde(default = "default_page_number_height")]
    pub height: u32,
    /// Space kept between the body and the footer band
    #[serde(default = "default_page_number_gap")]
    pub gap: u32,
}

impl Default for PageNumberConfig {
    fn default() -> Self {
        Self {
            position: PageNumberPosition::default(),
            width: default_page_number_width(),
            height: default_page_number_height(),
            gap: default_page_number_gap(),
        }
    }
}

/// Degenerate page policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyPagePolicy {
    /// Emit the page with an empty annotation set
    #[default]
    Keep,
    /// Emit neither a page record nor a file
    Drop,
}

/// Digital-artifact pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArtifactConfig {
    /// Per-channel noise amplitude
    #[serde(default)]
    pub noise: u8,
    /// JPEG recompression quality
    #[serde(default)]
    pub jpeg_quality: Option<u8>,
}

impl ArtifactConfig {
    pub fn filter(&self) -> page_canvas::ArtifactFilter {
        page_canvas::ArtifactFilter::new(self.noise, self.jpeg_quality)
    }
}

fn default_page_width() -> u32 {
    1200
}
fn default_page_height() -> u32 {
    1600
}
fn default_margin() -> u32 {
    50
}
fn default_min_columns() -> u32 {
    1
}
fn default_max_columns() -> u32 {
    2
}
fn default_column_gap() -> u32 {
    20
}
fn default_min_step() -> u32 {
    300
}
fn default_max_step() -> u32 {
    500
}
fn default_figure_min_width() -> u32 {
    200
}
fn default_figure_max_width() -> u32 {
    450
}
fn default_figure_min_height() -> u32 {
    200
}
fn default_figure_max_height() -> u32 {
    450
}
fn default_width_inset() -> Span {
    Span::new(0, 20)
}
fn default_height_inset() -> Span {
    Span::new(10, 40)
}
fn default_free_height() -> Span {
    Span::new(150, 400)
}
fn default_font_size() -> Span {
    Span::new(12, 16)
}
fn default_bold_font_size() -> Span {
    Span::new(30, 40)
}
fn default_bold_probability() -> f64 {
    0.7
}
fn default_text_only_below() -> u32 {
    150
}
fn default_jitter() -> u32 {
    15
}
fn default_gap() -> Span {
    Span::new(10, 30)
}
fn default_image_caption() -> u32 {
    20
}
fn default_graph_caption() -> u32 {
    25
}
fn default_true() -> bool {
    true
}
fn default_axis_fraction() -> f64 {
    0.15
}
fn default_max_attempts() -> u32 {
    100
}
fn default_free_images() -> Span {
    Span::new(0, 2)
}
fn default_free_graphs() -> Span {
    Span::new(0, 3)
}
fn default_free_texts() -> Span {
    Span::new(1, 5)
}
fn default_page_number_width() -> u32 {
    100
}
fn default_page_number_height() -> u32 {
    30
}
fn default_page_number_gap() -> u32 {
    10
}
