use crate::data_handling::DocumentData;
use crate::error::WbnError;
use crate::models::classification::Classification;

/// Contract shared by text classifiers that learn from labeled documents and
/// predict integer class codes.
pub trait TextClassifier {
    /// Fit the model on parallel `data`/`target` sequences, replacing any
    /// previous fit.
    fn fit(&mut self, data: &[DocumentData], target: &[String])
        -> Result<&[Classification], WbnError>;

    /// Predict one class code per document, in input order.
    fn predict(&mut self, data: &[DocumentData]) -> Result<Vec<usize>, WbnError>;

    /// Decode class codes back into labels.
    fn reverse_encode(&self, codes: &[usize]) -> Vec<Option<String>>;

    /// Optional human readable name for the model
    fn name(&self) -> &str { "classifier" }
}
