//! IO utilities for loading document datasets.

pub mod dataset;
pub mod sample;

pub use dataset::{
    parse_json_dataset, read_dataset, read_delimited_dataset, read_json_dataset, read_tsv_dataset,
    TsvReaderConfig,
};
pub use sample::sample_documents;
