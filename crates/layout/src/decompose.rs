//! Composite block decomposition
//!
//! A figure block is split into its graphic box and a caption strip along
//! the bottom; graphs additionally get axis strips inside the graphic box.
//! The strips are annotated separately but drawn by the parent's asset.

use crate::category::Category;
use crate::config::CaptionConfig;
use crate::geometry::BBox;

/// Sub-regions of one placed block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decomposition {
    /// The block's own box (the graphic, for figures)
    pub primary: BBox,
    /// Caption strip below the graphic
    pub caption: Option<BBox>,
    /// Horizontal axis strip along the graphic's bottom
    pub axis_x: Option<BBox>,
    /// Vertical axis strip along the graphic's left edge
    pub axis_y: Option<BBox>,
}

impl Decomposition {
    /// Every annotated region with its category, parent first
    pub fn regions(&self, category: Category) -> Vec<(Category, BBox)> {
        let mut regions = vec![(category, self.primary)];
        if let Some(b) = self.axis_y {
            regions.push((Category::AxisY, b));
        }
        if let Some(b) = self.axis_x {
            regions.push((Category::AxisX, b));
        }
        if let Some(b) = self.caption {
            regions.push((Category::Caption, b));
        }
        regions
    }
}

/// Split a placed block into annotated sub-regions
///
/// `placed` must be the final placed box. A block no taller than its
/// caption strip keeps its full height as graphic and gets no caption.
pub fn decompose(
    category: Category,
    placed: BBox,
    captions: &CaptionConfig,
    axis_fraction: f64,
) -> Decomposition {
    let caption_h = captions.height_for(category);
    let (primary, caption) = if caption_h > 0 && placed.h > caption_h {
        let graphic_h = placed.h - caption_h;
        (
            BBox::new(placed.x, placed.y, placed.w, graphic_h),
            Some(BBox::new(placed.x, placed.y + graphic_h, placed.w, caption_h)),
        )
    } else {
        (placed, None)
    };

    let (axis_x, axis_y) = if category == Category::Graph {
        axis_strips(primary, axis_fraction)
    } else {
        (None, None)
    };

    Decomposition {
        primary,
        caption,
        axis_x,
        axis_y,
    }
}

fn axis_strips(graphic: BBox, fraction: f64) -> (Option<BBox>, Option<BBox>) {
    let y_w = (graphic.w as f64 * fraction).floor() as u32;
    let x_h = (graphic.h as f64 * fraction).floor() as u32;

    let axis_y = (y_w > 0).then(|| BBox::new(graphic.x, graphic.y, y_w, graphic.h));
    let axis_x =
        (x_h > 0).then(|| BBox::new(graphic.x, graphic.bottom() - x_h, graphic.w, x_h));
    (axis_x, axis_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_graph_caption_split() {
        let d = decompose(
            Category::Graph,
            BBox::new(100, 100, 300, 250),
            &CaptionConfig::default(),
            0.15,
        );
        assert_eq!(d.primary, BBox::new(100, 100, 300, 225));
        assert_eq!(d.caption, Some(BBox::new(100, 325, 300, 25)));
        assert_eq!(d.primary.h + d.caption.unwrap().h, 250);
    }

    #[test]
    fn test_graph_axes_inside_graphic() {
        let d = decompose(
            Category::Graph,
            BBox::new(100, 100, 300, 250),
            &CaptionConfig::default(),
            0.15,
        );
        assert_eq!(d.axis_y, Some(BBox::new(100, 100, 45, 225)));
        assert_eq!(d.axis_x, Some(BBox::new(100, 292, 300, 33)));
        assert!(d.primary.contains(&d.axis_x.unwrap()));
        assert!(d.primary.contains(&d.axis_y.unwrap()));
    }

    #[test]
    fn test_image_caption_no_axes() {
        let d = decompose(
            Category::Image,
            BBox::new(0, 0, 200, 200),
            &CaptionConfig::default(),
            0.15,
        );
        assert_eq!(d.primary, BBox::new(0, 0, 200, 180));
        assert_eq!(d.caption, Some(BBox::new(0, 180, 200, 20)));
        assert_eq!(d.axis_x, None);
        assert_eq!(d.axis_y, None);
    }

    #[test]
    fn test_image_without_caption_when_disabled() {
        let captions = CaptionConfig {
            decompose_images: false,
            ..CaptionConfig::default()
        };
        let placed = BBox::new(0, 0, 200, 200);
        let d = decompose(Category::Image, placed, &captions, 0.15);
        assert_eq!(d.primary, placed);
        assert_eq!(d.regions(Category::Image), vec![(Category::Image, placed)]);
    }

    #[test]
    fn test_text_is_not_split() {
        let placed = BBox::new(10, 10, 500, 300);
        let d = decompose(Category::Text, placed, &CaptionConfig::default(), 0.15);
        assert_eq!(d.primary, placed);
        assert_eq!(d.caption, None);
    }

    #[test]
    fn test_block_shorter_than_caption() {
        let placed = BBox::new(0, 0, 100, 25);
        let d = decompose(Category::Graph, placed, &CaptionConfig::default(), 0.15);
        assert_eq!(d.primary, placed);
        assert_eq!(d.caption, None);
    }

    #[test]
    fn test_regions_order() {
        let d = decompose(
            Category::Graph,
            BBox::new(100, 100, 300, 250),
            &CaptionConfig::default(),
            0.15,
        );
        let cats: Vec<Category> = d.regions(Category::Graph).iter().map(|r| r.0).collect();
        assert_eq!(
            cats,
            vec![
                Category::Graph,
                Category::AxisY,
                Category::AxisX,
                Category::Caption
            ]
        );
    }
}
