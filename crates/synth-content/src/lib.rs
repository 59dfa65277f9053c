//! Synth Content - Synthetic page content for docsynth
//!
//! This crate provides:
//! - A word corpus and greedy word wrapping
//! - Greeked or TTF text rendering for paragraphs, headers and labels
//! - Procedural line, bar and scatter charts with axes and captions
//! - Photo crops from science and general photo folders
//! - [`SyntheticProvider`], a `layout::ContentProvider` tying it together
//!
//! # Example
//!
//! ```ignore
//! use synth_content::{Corpus, PhotoLibrary, SyntheticProvider, Typeface};
//!
//! let photos = PhotoLibrary::scan(Some(science_dir), Some(other_dir), 0.9)?;
//! let provider = SyntheticProvider::new(Corpus::embedded()?)
//!     .with_typeface(Typeface::from_file("fonts/NotoSerif-Regular.ttf")?)
//!     .with_photos(photos);
//! ```

pub mod chart;
pub mod corpus;
pub mod photo;
pub mod provider;
pub mod text;
pub mod typeface;
pub mod wrap;

pub use chart::{render_chart, ChartSpec};
pub use corpus::Corpus;
pub use photo::{PhotoLibrary, DEFAULT_SCIENCE_SHARE};
pub use provider::SyntheticProvider;
pub use typeface::{TextStyle, Typeface};

use thiserror::Error;

/// Errors that can occur while loading content sources
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to load corpus: {0}")]
    CorpusLoadError(String),

    #[error("Font error: {0}")]
    FontError(String),

    #[error("Photo library error: {0}")]
    PhotoError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for content operations
pub type Result<T> = std::result::Result<T, ContentError>;
