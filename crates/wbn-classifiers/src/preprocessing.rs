//! Term normalization and tokenization shared by fit, predict and the
//! dataset loaders.
//!
//! The model only depends on the `Normalizer` trait, so any deterministic
//! `word -> word` mapping can be plugged in. The default reduces words to
//! their Snowball (Porter2) English stem.
use std::collections::BTreeMap;

use rust_stemmers::{Algorithm, Stemmer};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::NormalizerKind;

/// Maps a surface word form to the canonical term that gets counted.
///
/// Implementations must be pure: the same input always yields the same term.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, word: &str) -> String;

    fn name(&self) -> &str {
        "normalizer"
    }
}

/// Lower-case then stem with the Snowball English algorithm.
pub struct SnowballNormalizer {
    stemmer: Stemmer,
}

impl SnowballNormalizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for SnowballNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SnowballNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowballNormalizer")
            .field("algorithm", &"english")
            .finish()
    }
}

impl Normalizer for SnowballNormalizer {
    fn normalize(&self, word: &str) -> String {
        let lowered = word.trim().to_lowercase();
        self.stemmer.stem(&lowered).into_owned()
    }

    fn name(&self) -> &str {
        "snowball"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseNormalizer;

impl Normalizer for LowercaseNormalizer {
    fn normalize(&self, word: &str) -> String {
        word.trim().to_lowercase()
    }

    fn name(&self) -> &str {
        "lowercase"
    }
}

/// Counts words exactly as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl Normalizer for IdentityNormalizer {
    fn normalize(&self, word: &str) -> String {
        word.to_string()
    }

    fn name(&self) -> &str {
        "identity"
    }
}

impl NormalizerKind {
    pub fn build(self) -> Box<dyn Normalizer> {
        match self {
            NormalizerKind::Snowball => Box::new(SnowballNormalizer::new()),
            NormalizerKind::Lowercase => Box::new(LowercaseNormalizer),
            NormalizerKind::Identity => Box::new(IdentityNormalizer),
        }
    }
}

/// Split raw text into lower-cased words on Unicode word boundaries.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}

/// Normalize `terms` and count them. Terms that normalize to an empty
/// string are dropped.
pub fn term_counts<'a, I>(normalizer: &dyn Normalizer, terms: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for term in terms {
        let normalized = normalizer.normalize(term);
        if normalized.is_empty() {
            continue;
        }
        *counts.entry(normalized).or_insert(0) += 1;
    }
    counts
}
