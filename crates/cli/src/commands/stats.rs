//! `docsynth stats`

use anyhow::{Context as _, Result};
use clap::Args;
use layout::{CategoryStats, CocoDataset};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct StatsCommand {
    /// COCO annotation file produced by `generate`
    #[arg(short, long)]
    annotations: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl StatsCommand {
    pub fn execute(self) -> Result<()> {
        let stats = load_stats(&self)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            print!("{stats}");
        }
        Ok(())
    }
}

fn load_stats(cmd: &StatsCommand) -> Result<CategoryStats> {
    let dataset = CocoDataset::from_file(&cmd.annotations)
        .with_context(|| format!("Failed to read {}", cmd.annotations.display()))?;
    Ok(CategoryStats::from_snapshot(&dataset.to_snapshot()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ANNOTATIONS_FILE;
    use layout::{AnnotationLedger, BBox, Category};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_stats_from_file() {
        let ledger = AnnotationLedger::new();
        let page = ledger.record_page(100, 100, "page_0.png");
        ledger.record_annotation(page, Category::Text, BBox::new(0, 0, 10, 10));
        ledger.record_annotation(page, Category::Text, BBox::new(20, 0, 10, 10));
        ledger.record_annotation(page, Category::Graph, BBox::new(40, 40, 10, 10));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(ANNOTATIONS_FILE);
        CocoDataset::from_snapshot(&ledger.snapshot()).save(&path).unwrap();

        let stats = load_stats(&StatsCommand {
            annotations: path,
            json: false,
        })
        .unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.count(Category::Text), 2);
        assert_eq!(stats.count(Category::Image), 0);
    }

    #[test]
    fn test_missing_file() {
        let result = load_stats(&StatsCommand {
            annotations: PathBuf::from("/nonexistent/annotations.json"),
            json: true,
        });
        assert!(result.is_err());
    }
}
