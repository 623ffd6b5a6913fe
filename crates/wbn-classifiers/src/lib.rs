//! wbn-classifiers: Weighted Bayesian Network text classification.
//!
//! Every class is fitted into a directed graph over its normalized terms,
//! with one edge per term pair. A document is scored by multiplying the
//! strongest edge scores of each class graph it overlaps with, and the
//! best-scoring class is predicted.
//!
//! The crate also carries the pieces needed around the model: label
//! encoding, term normalization, dataset readers and evaluation statistics.
//! Logging goes through the `log` facade; installing a logger is left to the
//! binary.
pub mod config;
pub mod data_handling;
pub mod encoding;
pub mod error;
pub mod io;
pub mod models;
pub mod preprocessing;
pub mod stats;
pub mod validation;

pub use config::ModelConfig;
pub use data_handling::{Document, DocumentData, Documents};
pub use error::WbnError;
pub use models::WbnClassifier;
