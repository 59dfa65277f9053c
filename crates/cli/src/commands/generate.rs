//! `docsynth generate`

use super::ANNOTATIONS_FILE;
use crate::sink::DirectorySink;
use anyhow::{bail, Context as _, Result};
use clap::{Args, ValueEnum};
use layout::{AnnotationLedger, CocoDataset, DatasetGenerator, LayoutConfig, LedgerSnapshot};
use page_canvas::OutputFormat;
use rayon::ThreadPoolBuilder;
use std::path::PathBuf;
use synth_content::{Corpus, PhotoLibrary, SyntheticProvider, Typeface, DEFAULT_SCIENCE_SHARE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageFormat {
    Jpeg,
    Png,
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Layout configuration JSON; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of pages to generate
    #[arg(short, long, default_value = "100")]
    pages: u64,

    /// Output directory for page images and the annotation file
    #[arg(short, long)]
    out: PathBuf,

    /// Run seed, overriding the one in the config
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (defaults to one per core)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// TTF/OTF font for text; greeked text when omitted
    #[arg(long)]
    font: Option<PathBuf>,

    /// Word list, one word per line
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Folder of science photos
    #[arg(long)]
    photos_science: Option<PathBuf>,

    /// Folder of general photos
    #[arg(long)]
    photos_other: Option<PathBuf>,

    /// Share of photos drawn from the science folder
    #[arg(long, default_value_t = DEFAULT_SCIENCE_SHARE)]
    science_share: f64,

    /// Page image encoding
    #[arg(long, value_enum, default_value = "jpeg")]
    format: PageFormat,

    /// JPEG quality (1-100)
    #[arg(long, default_value = "95")]
    quality: u8,

    /// Continue ids from an existing annotation file in the output directory
    #[arg(long)]
    append: bool,
}

impl GenerateCommand {
    pub fn execute(self) -> Result<()> {
        let mut config = match &self.config {
            Some(path) => LayoutConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => LayoutConfig::default(),
        };
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        let provider = self.build_provider(config.axis_fraction)?;
        let format = match self.format {
            PageFormat::Jpeg => OutputFormat::Jpeg {
                quality: self.quality,
            },
            PageFormat::Png => OutputFormat::Png,
        };
        let sink = DirectorySink::create(&self.out, format)
            .with_context(|| format!("Failed to create {}", self.out.display()))?;

        let annotations_path = self.out.join(ANNOTATIONS_FILE);
        let previous = if self.append && annotations_path.exists() {
            let dataset = CocoDataset::from_file(&annotations_path)
                .with_context(|| format!("Failed to read {}", annotations_path.display()))?;
            dataset.to_snapshot()?
        } else {
            if annotations_path.exists() {
                log::warn!("overwriting {}", annotations_path.display());
            }
            LedgerSnapshot::default()
        };

        let generator = DatasetGenerator::new(config, provider)
            .context("Invalid layout configuration")?
            .with_ledger(continue_ledger(&previous));

        let summary = match self.jobs {
            Some(0) => bail!("--jobs must be at least 1"),
            Some(jobs) => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .context("Failed to build worker pool")?;
                pool.install(|| generator.run(self.pages, &sink))?
            }
            None => generator.run(self.pages, &sink)?,
        };

        let mut snapshot = previous;
        let fresh = generator.snapshot();
        snapshot.pages.extend(fresh.pages);
        snapshot.annotations.extend(fresh.annotations);
        CocoDataset::from_snapshot(&snapshot)
            .save(&annotations_path)
            .with_context(|| format!("Failed to write {}", annotations_path.display()))?;

        log::info!(
            "{} of {} pages written to {} (seed {}), {} blocks skipped",
            summary.written,
            summary.requested,
            sink.dir().display(),
            generator.seed(),
            summary.blocks.skipped()
        );
        Ok(())
    }

    fn build_provider(&self, axis_fraction: f64) -> Result<SyntheticProvider> {
        let corpus = match &self.corpus {
            Some(path) => Corpus::from_file(path)
                .with_context(|| format!("Failed to load corpus {}", path.display()))?,
            None => Corpus::embedded()?,
        };
        let mut provider = SyntheticProvider::new(corpus).with_axis_fraction(axis_fraction);

        if let Some(path) = &self.font {
            let face = Typeface::from_file(path)?;
            provider = provider.with_typeface(face);
        }

        if self.photos_science.is_some() || self.photos_other.is_some() {
            let library = PhotoLibrary::scan(
                self.photos_science.as_deref(),
                self.photos_other.as_deref(),
                self.science_share,
            )?;
            if library.is_empty() {
                log::warn!("no photos found, images will be procedural");
            }
            provider = provider.with_photos(library);
        }
        Ok(provider)
    }
}

/// Ledger whose ids continue after everything in `previous`
fn continue_ledger(previous: &LedgerSnapshot) -> AnnotationLedger {
    let next_page = previous.pages.iter().map(|p| p.id + 1).max().unwrap_or(0);
    let next_annotation = previous
        .annotations
        .iter()
        .map(|a| a.id + 1)
        .max()
        .unwrap_or(0);
    AnnotationLedger::starting_at(next_page, next_annotation)
}
