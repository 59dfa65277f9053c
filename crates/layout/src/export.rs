//! Dataset export formats
//!
//! - [`CocoDataset`]: COCO-style JSON built from a ledger snapshot
//! - [`yolo_labels`]: per-page YOLO label text
//! - [`CategoryStats`]: per-category balance over a snapshot

use crate::category::Category;
use crate::ledger::{AnnotationRecord, LedgerSnapshot, PageRecord};
use crate::{LayoutError, Result};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Dataset-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoInfo {
    pub description: String,
    pub version: String,
    pub year: i32,
    pub contributor: String,
    pub date_created: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoLicense {
    pub id: u32,
    pub name: String,
    pub url: String,
}

/// One page image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoImage {
    pub id: u64,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub license: u32,
    pub date_captured: String,
}

/// One bounding-box annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoAnnotation {
    pub id: u64,
    pub image_id: u64,
    pub category_id: u32,
    /// `[x, y, w, h]`
    pub bbox: [u32; 4],
    pub area: u64,
    #[serde(default)]
    pub segmentation: Vec<Vec<f64>>,
    #[serde(default)]
    pub iscrowd: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoCategory {
    pub id: u32,
    pub name: String,
    pub supercategory: String,
}

/// COCO-style dataset file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoDataset {
    pub info: CocoInfo,
    #[serde(default)]
    pub licenses: Vec<CocoLicense>,
    pub images: Vec<CocoImage>,
    pub annotations: Vec<CocoAnnotation>,
    pub categories: Vec<CocoCategory>,
}

impl CocoDataset {
    /// Build a dataset stamped with the current time
    pub fn from_snapshot(snapshot: &LedgerSnapshot) -> Self {
        Self::from_snapshot_at(snapshot, Utc::now())
    }

    /// Build a dataset with an explicit timestamp
    pub fn from_snapshot_at(snapshot: &LedgerSnapshot, timestamp: DateTime<Utc>) -> Self {
        let date = timestamp.format(DATE_FORMAT).to_string();

        let images = snapshot
            .pages
            .iter()
            .map(|p| CocoImage {
                id: p.id,
                file_name: p.file_ref.clone(),
                width: p.width,
                height: p.height,
                license: 1,
                date_captured: date.clone(),
            })
            .collect();

        let annotations = snapshot
            .annotations
            .iter()
            .map(|a| CocoAnnotation {
                id: a.id,
                image_id: a.page_id,
                category_id: a.category_id(),
                bbox: a.bbox.to_array(),
                area: a.area,
                segmentation: Vec::new(),
                iscrowd: 0,
            })
            .collect();

        let categories = snapshot
            .categories()
            .into_iter()
            .map(|(id, name)| CocoCategory {
                id,
                name: name.to_string(),
                supercategory: "layout".to_string(),
            })
            .collect();

        Self {
            info: CocoInfo {
                description: "Synthetic document layout dataset".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                year: timestamp.year(),
                contributor: String::new(),
                date_created: date,
            },
            licenses: vec![CocoLicense {
                id: 1,
                name: "Synthetic".to_string(),
                url: String::new(),
            }],
            images,
            annotations,
            categories,
        }
    }

    /// Convert back into ledger records
    ///
    /// Fails on category ids outside the fixed table.
    pub fn to_snapshot(&self) -> Result<LedgerSnapshot> {
        let pages = self
            .images
            .iter()
            .map(|i| PageRecord {
                id: i.id,
                file_ref: i.file_name.clone(),
                width: i.width,
                height: i.height,
            })
            .collect();

        let annotations = self
            .annotations
            .iter()
            .map(|a| {
                let category = Category::from_id(a.category_id).ok_or_else(|| {
                    LayoutError::ExportError(format!(
                        "annotation {} has unknown category id {}",
                        a.id, a.category_id
                    ))
                })?;
                let [x, y, w, h] = a.bbox;
                Ok(AnnotationRecord {
                    id: a.id,
                    page_id: a.image_id,
                    category,
                    bbox: crate::geometry::BBox::new(x, y, w, h),
                    area: a.area,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(LedgerSnapshot { pages, annotations })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the dataset as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// YOLO label lines `class cx cy w h` for one page, normalised to its size
pub fn yolo_labels<'a, I>(page: &PageRecord, annotations: I) -> String
where
    I: IntoIterator<Item = &'a AnnotationRecord>,
{
    let pw = page.width.max(1) as f64;
    let ph = page.height.max(1) as f64;

    let mut out = String::new();
    for a in annotations {
        let b = a.bbox;
        let cx = (b.x as f64 + b.w as f64 / 2.0) / pw;
        let cy = (b.y as f64 + b.h as f64 / 2.0) / ph;
        out.push_str(&format!(
            "{} {:.6} {:.6} {:.6} {:.6}\n",
            a.category_id(),
            cx,
            cy,
            b.w as f64 / pw,
            b.h as f64 / ph
        ));
    }
    out
}

/// Label file name for a page file, e.g. `page_3.jpg` -> `page_3.txt`
pub fn yolo_label_name(file_ref: &str) -> String {
    let stem = Path::new(file_ref)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_ref);
    format!("{}.txt", stem)
}

/// Per-category annotation counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub pages: u64,
    pub total: u64,
    pub counts: BTreeMap<Category, u64>,
}

impl CategoryStats {
    pub fn from_snapshot(snapshot: &LedgerSnapshot) -> Self {
        let mut counts: BTreeMap<Category, u64> =
            Category::ALL.iter().map(|&c| (c, 0)).collect();
        for a in &snapshot.annotations {
            *counts.entry(a.category).or_insert(0) += 1;
        }
        Self {
            pages: snapshot.pages.len() as u64,
            total: snapshot.annotations.len() as u64,
            counts,
        }
    }

    pub fn count(&self, category: Category) -> u64 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Share of all annotations in `[0, 1]`
    pub fn share(&self, category: Category) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count(category) as f64 / self.total as f64
        }
    }
}

impl fmt::Display for CategoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} pages, {} annotations", self.pages, self.total)?;
        for (category, count) in &self.counts {
            writeln!(
                f,
                "{:>2} {:<12} {:>8} {:>6.2}%",
                category.id(),
                category.name(),
                count,
                self.share(*category) * 100.0
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BBox;
    use crate::ledger::AnnotationLedger;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample_snapshot() -> LedgerSnapshot {
        let ledger = AnnotationLedger::new();
        ledger.commit_page(1000, 2000, |id| format!("page_{id}.jpg"), &[
            (Category::Graph, BBox::new(100, 100, 300, 225)),
            (Category::Caption, BBox::new(100, 325, 300, 25)),
            (Category::Text, BBox::new(0, 0, 500, 1000)),
        ]);
        ledger.commit_page(1000, 2000, |id| format!("page_{id}.jpg"), &[]);
        ledger.into_snapshot()
    }

    #[test]
    fn test_coco_from_snapshot() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let coco = CocoDataset::from_snapshot_at(&sample_snapshot(), ts);

        assert_eq!(coco.images.len(), 2);
        assert_eq!(coco.images[0].file_name, "page_0.jpg");
        assert_eq!(coco.images[0].date_captured, "2024-05-01 12:30:00");
        assert_eq!(coco.info.year, 2024);
        assert_eq!(coco.annotations.len(), 3);
        assert_eq!(coco.annotations[1].category_id, 5);
        assert_eq!(coco.annotations[1].bbox, [100, 325, 300, 25]);
        assert_eq!(coco.annotations[1].area, 7500);
        assert_eq!(coco.annotations[1].iscrowd, 0);
        assert_eq!(coco.categories.len(), 7);
        assert_eq!(coco.categories[2].name, "text");
    }

    #[test]
    fn test_coco_json_shape() {
        let coco = CocoDataset::from_snapshot(&sample_snapshot());
        let value: serde_json::Value = serde_json::from_str(&coco.to_json().unwrap()).unwrap();
        assert!(value["images"].is_array());
        assert_eq!(value["annotations"][0]["image_id"], 0);
        assert_eq!(value["annotations"][0]["segmentation"], serde_json::json!([]));
    }

    #[test]
    fn test_coco_back_to_snapshot() {
        let snapshot = sample_snapshot();
        let coco = CocoDataset::from_snapshot(&snapshot);
        let parsed = CocoDataset::from_json(&coco.to_json().unwrap()).unwrap();
        assert_eq!(parsed.to_snapshot().unwrap(), snapshot);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut coco = CocoDataset::from_snapshot(&sample_snapshot());
        coco.annotations[0].category_id = 42;
        let err = coco.to_snapshot().unwrap_err();
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_yolo_labels() {
        let snapshot = sample_snapshot();
        let page = &snapshot.pages[0];
        let labels = yolo_labels(page, snapshot.annotations_for(page.id));
        let lines: Vec<&str> = labels.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "0 0.250000 0.106250 0.300000 0.112500");
        assert_eq!(lines[2], "2 0.250000 0.250000 0.500000 0.500000");
    }

    #[test]
    fn test_yolo_label_name() {
        assert_eq!(yolo_label_name("page_3.jpg"), "page_3.txt");
        assert_eq!(yolo_label_name("noext"), "noext.txt");
    }

    #[test]
    fn test_category_stats() {
        let stats = CategoryStats::from_snapshot(&sample_snapshot());
        assert_eq!(stats.pages, 2);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.count(Category::Graph), 1);
        assert_eq!(stats.count(Category::Image), 0);
        assert!((stats.share(Category::Text) - 1.0 / 3.0).abs() < 1e-9);
        assert!(stats.to_string().contains("caption"));
    }

    #[test]
    fn test_stats_empty() {
        let stats = CategoryStats::from_snapshot(&LedgerSnapshot::default());
        assert_eq!(stats.share(Category::Text), 0.0);
    }
}
