//! `docsynth yolo`

use anyhow::{Context as _, Result};
use clap::Args;
use layout::{yolo_label_name, yolo_labels, CocoDataset};
use std::fs;
use std::path::PathBuf;

/// Class list written alongside the label files
const CLASSES_FILE: &str = "classes.txt";

#[derive(Args, Debug)]
pub struct YoloCommand {
    /// COCO annotation file produced by `generate`
    #[arg(short, long)]
    annotations: PathBuf,

    /// Directory for the label files
    #[arg(short, long)]
    out: PathBuf,
}

impl YoloCommand {
    #[cfg(test)]
    pub fn new(annotations: PathBuf, out: PathBuf) -> Self {
        Self { annotations, out }
    }

    pub fn execute(self) -> Result<()> {
        let dataset = CocoDataset::from_file(&self.annotations)
            .with_context(|| format!("Failed to read {}", self.annotations.display()))?;
        let snapshot = dataset.to_snapshot()?;
        fs::create_dir_all(&self.out)
            .with_context(|| format!("Failed to create {}", self.out.display()))?;

        for page in &snapshot.pages {
            let labels = yolo_labels(page, snapshot.annotations_for(page.id));
            let path = self.out.join(yolo_label_name(&page.file_ref));
            fs::write(&path, labels)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }

        let classes: String = snapshot
            .categories()
            .iter()
            .map(|(_, name)| format!("{name}\n"))
            .collect();
        fs::write(self.out.join(CLASSES_FILE), classes)?;

        log::info!(
            "wrote {} label files to {}",
            snapshot.pages.len(),
            self.out.display()
        );
        Ok(())
    }
}
