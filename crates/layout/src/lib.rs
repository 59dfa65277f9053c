//! Layout - Synthetic document page layout and annotation
//!
//! This crate provides:
//! - Region partitioning of a page into column/row slots
//! - Block category and size sampling
//! - Placement resolution (packed rows or free scattering)
//! - Decomposition of figures into graphic, caption and axis regions
//! - An annotation ledger with run-wide monotonic ids
//! - Page composition against a pluggable content provider
//! - Parallel multi-page generation and COCO/YOLO export
//!
//! # Example
//!
//! ```ignore
//! use layout::{parse_config, DatasetGenerator, CocoDataset};
//!
//! let config = parse_config(r#"{ "mode": "packed", "seed": 7 }"#)?;
//! let generator = DatasetGenerator::new(config, provider)?;
//! generator.run(100, &sink)?;
//! CocoDataset::from_snapshot(&generator.snapshot()).save("annotations.json")?;
//! ```

mod category;
pub mod compositor;
pub mod config;
pub mod decompose;
pub mod export;
pub mod generator;
pub mod geometry;
pub mod ledger;
pub mod partition;
pub mod placement;
pub mod provider;
pub mod sampler;

pub use category::Category;
pub use compositor::{ComposedPage, GeneratedPage, PageCompositor, PagePlan, PageReport};
pub use config::LayoutConfig;
pub use decompose::{decompose, Decomposition};
pub use export::{yolo_label_name, yolo_labels, CategoryStats, CocoDataset};
pub use generator::{DatasetGenerator, PageSink, RunSummary};
pub use geometry::{BBox, Size, Span};
pub use ledger::{AnnotationLedger, AnnotationRecord, LedgerSnapshot, PageRecord};
pub use partition::{Partitioner, Slot};
pub use placement::{FreePlacer, PackedCursor, Placement, Placer};
pub use provider::{
    ContentProvider, FigureKind, RenderContext, RenderError, RenderRequest, SolidProvider,
};
pub use sampler::BlockSampler;

use thiserror::Error;

/// Errors that can occur during layout generation
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("Canvas error: {0}")]
    CanvasError(#[from] page_canvas::CanvasError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Parse and validate a layout configuration from JSON
pub fn parse_config(json: &str) -> Result<LayoutConfig> {
    LayoutConfig::from_json(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.page.width, 1200);
        assert_eq!(config.page.margin, 50);
    }

    #[test]
    fn test_parse_config_rejects_garbage() {
        let err = parse_config("not json").unwrap_err();
        assert!(err.to_string().starts_with("Invalid configuration"));
    }
}
