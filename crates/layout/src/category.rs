//! Annotation categories and their persistent ids

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of block categories
///
/// The numeric ids are fixed for every layout strategy and every run; the
/// first five match the detector's class order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Graph,
    Image,
    Text,
    AxisX,
    AxisY,
    Caption,
    PageNumber,
}

impl Category {
    /// Every category in id order
    pub const ALL: [Category; 7] = [
        Category::Graph,
        Category::Image,
        Category::Text,
        Category::AxisX,
        Category::AxisY,
        Category::Caption,
        Category::PageNumber,
    ];

    /// Stable numeric id used in persisted annotations
    pub fn id(self) -> u32 {
        match self {
            Category::Graph => 0,
            Category::Image => 1,
            Category::Text => 2,
            Category::AxisX => 3,
            Category::AxisY => 4,
            Category::Caption => 5,
            Category::PageNumber => 6,
        }
    }

    /// Look a category up by its numeric id
    pub fn from_id(id: u32) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.id() == id)
    }

    /// Persisted name
    pub fn name(self) -> &'static str {
        match self {
            Category::Graph => "graph",
            Category::Image => "image",
            Category::Text => "text",
            Category::AxisX => "x_axis",
            Category::AxisY => "y_axis",
            Category::Caption => "caption",
            Category::PageNumber => "page_number",
        }
    }

    /// Categories that carry their own rendered asset
    pub fn is_rendered(self) -> bool {
        matches!(
            self,
            Category::Graph | Category::Image | Category::Text | Category::PageNumber
        )
    }

    /// Image or Graph
    pub fn is_figure(self) -> bool {
        matches!(self, Category::Graph | Category::Image)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_dense() {
        let ids: Vec<u32> = Category::ALL.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_from_id_round_trip() {
        for c in Category::ALL {
            assert_eq!(Category::from_id(c.id()), Some(c));
        }
        assert_eq!(Category::from_id(99), None);
    }

    #[test]
    fn test_detector_class_order() {
        assert_eq!(Category::Graph.name(), "graph");
        assert_eq!(Category::Image.name(), "image");
        assert_eq!(Category::Text.name(), "text");
        assert_eq!(Category::AxisX.name(), "x_axis");
        assert_eq!(Category::AxisY.name(), "y_axis");
    }

    #[test]
    fn test_rendered_categories() {
        assert!(Category::Graph.is_rendered());
        assert!(Category::PageNumber.is_rendered());
        assert!(!Category::Caption.is_rendered());
        assert!(!Category::AxisX.is_rendered());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Category::PageNumber).unwrap();
        assert_eq!(json, "\"page_number\"");
        let back: Category = serde_json::from_str("\"axis_x\"").unwrap();
        assert_eq!(back, Category::AxisX);
    }
}
