//! Word corpus for synthetic body text

use crate::{ContentError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Embedded English word list, weighted towards academic vocabulary
pub const EMBEDDED_CORPUS: &str = include_str!("../data/corpus.txt");

/// Flat list of words that text blocks are drawn from
#[derive(Debug, Clone)]
pub struct Corpus {
    words: Vec<String>,
}

impl Corpus {
    /// Corpus built from the embedded word list
    pub fn embedded() -> Result<Self> {
        Self::from_str_content(EMBEDDED_CORPUS)
    }

    /// Load a corpus from a file
    ///
    /// One word per line, UTF-8 encoded. Lines starting with `#` are ignored.
    ///
    /// # Arguments
    /// * `path` - Path to the corpus file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| ContentError::CorpusLoadError(e.to_string()))?;

        Self::from_str_content(&content)
    }

    /// Load a corpus from a string
    ///
    /// Lines holding several whitespace-separated words contribute each word.
    pub fn from_str_content(content: &str) -> Result<Self> {
        let words: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .flat_map(str::split_whitespace)
            .map(str::to_string)
            .collect();

        if words.is_empty() {
            return Err(ContentError::CorpusLoadError(
                "Corpus is empty".to_string(),
            ));
        }

        Ok(Self { words })
    }

    /// One uniformly chosen word
    pub fn word<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // Never empty after construction
        self.words.choose(rng).map(String::as_str).unwrap_or("")
    }

    /// `count` random words
    pub fn words<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<&str> {
        (0..count).map(|_| self.word(rng)).collect()
    }

    /// A sentence of `count` words, capitalised and ending in a full stop
    pub fn sentence<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> String {
        let mut sentence = self.words(rng, count.max(1)).join(" ");
        if let Some(first) = sentence.get(..1) {
            let upper = first.to_uppercase();
            sentence.replace_range(..1, &upper);
        }
        sentence.push('.');
        sentence
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl FromStr for Corpus {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_content(s)
    }
}
