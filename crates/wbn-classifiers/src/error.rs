use thiserror::Error;

/// Errors raised while fitting or evaluating a WBN model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WbnError {
    /// `data` and `target` have different lengths.
    #[error("Number of instances: {data} does not match number of targets: {target}")]
    InstanceCount { data: usize, target: usize },

    /// No class reached the edge depth for an instance.
    #[error("No classification reached the required edge depth (depth fraction: {depth_fraction})")]
    MaxDepthExceeded { depth_fraction: f64 },

    #[error("Invalid model configuration: {0}")]
    InvalidConfig(String),
}
