pub mod classification;
pub mod graph;
pub mod scoring;
pub mod wbn;

pub mod classifier_trait;

pub use classification::{Attribute, Classification, ClassificationScore, TermGraph};
pub use classifier_trait::TextClassifier;
pub use wbn::WbnClassifier;
