//! Subcommands

pub mod generate;
pub mod stats;
pub mod yolo;

/// Annotation file written next to the generated pages
pub const ANNOTATIONS_FILE: &str = "annotations.json";
