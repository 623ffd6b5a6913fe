use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::WbnError;

/// Central configuration for the WBN classifier.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Fraction of the global corpus size used as the per-class edge depth.
    pub depth_fraction: f64,

    pub term_source: TermSource,

    pub normalizer: NormalizerKind,
}

/// Which terms of a document are counted during fit and predict.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TermSource {
    #[default]
    Tokens,
    /// Extracted keywords, falling back to tokens for documents without any.
    Keywords,
    Both,
}

/// Term normalizer applied before counting.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NormalizerKind {
    /// Lower-case, then Snowball (Porter2) English stemming.
    #[default]
    Snowball,
    Lowercase,
    Identity,
}

impl FromStr for TermSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tokens" => Ok(TermSource::Tokens),
            "keywords" => Ok(TermSource::Keywords),
            "both" => Ok(TermSource::Both),
            _ => Err(format!(
                "Unknown term source: {}. Expected one of: tokens, keywords, both",
                s
            )),
        }
    }
}

impl FromStr for NormalizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "snowball" | "stem" => Ok(NormalizerKind::Snowball),
            "lowercase" => Ok(NormalizerKind::Lowercase),
            "identity" | "none" => Ok(NormalizerKind::Identity),
            _ => Err(format!(
                "Unknown normalizer: {}. Expected one of: snowball, lowercase, identity",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub const DEFAULT_DEPTH_FRACTION: f64 = 0.05;

    pub fn new(depth_fraction: f64) -> Self {
        Self {
            depth_fraction,
            ..Self::default()
        }
    }

    pub fn with_term_source(mut self, term_source: TermSource) -> Self {
        self.term_source = term_source;
        self
    }

    pub fn with_normalizer(mut self, normalizer: NormalizerKind) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Check hyper-parameters before a model is built from this config.
    pub fn validate(&self) -> Result<(), WbnError> {
        if !self.depth_fraction.is_finite()
            || self.depth_fraction <= 0.0
            || self.depth_fraction > 1.0
        {
            return Err(WbnError::InvalidConfig(format!(
                "depth_fraction must be in (0, 1], got {}",
                self.depth_fraction
            )));
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            depth_fraction: Self::DEFAULT_DEPTH_FRACTION,
            term_source: TermSource::default(),
            normalizer: NormalizerKind::default(),
        }
    }
}
