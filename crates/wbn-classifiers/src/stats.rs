//! Evaluation statistics for predicted classes.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::data_handling::DocumentData;
use crate::error::WbnError;
use crate::models::classifier_trait::TextClassifier;
use crate::validation::validate;

/// Fraction of positions where `predicted` equals `expected`.
///
/// Returns 0 for empty input.
pub fn accuracy(predicted: &[usize], expected: &[usize]) -> Result<f64, WbnError> {
    validate(predicted, expected)?;
    if expected.is_empty() {
        return Ok(0.0);
    }
    let correct = predicted
        .iter()
        .zip(expected)
        .filter(|(p, e)| p == e)
        .count();
    Ok(correct as f64 / expected.len() as f64)
}

/// `n_classes x n_classes` matrix with expected codes as rows and predicted
/// codes as columns. Pairs involving a code outside `0..n_classes` are skipped.
pub fn confusion_matrix(
    predicted: &[usize],
    expected: &[usize],
    n_classes: usize,
) -> Result<Vec<Vec<usize>>, WbnError> {
    validate(predicted, expected)?;
    let mut matrix = vec![vec![0usize; n_classes]; n_classes];
    for (&p, &e) in predicted.iter().zip(expected) {
        if p >= n_classes || e >= n_classes {
            log::warn!("Skipping out-of-range class pair (expected {}, predicted {})", e, p);
            continue;
        }
        matrix[e][p] += 1;
    }
    Ok(matrix)
}

/// Precision, recall and F1 of one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of documents expected to carry the label.
    pub support: usize,
}

/// Per-label metrics for every label that is expected or predicted.
/// `None` predictions (abstentions) count against recall only.
pub fn class_report(
    predicted: &[Option<String>],
    expected: &[String],
) -> Result<Vec<ClassMetrics>, WbnError> {
    validate(predicted, expected)?;

    // label -> (true positives, predicted count, expected count)
    let mut counts: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();
    for (p, e) in predicted.iter().zip(expected) {
        counts.entry(e.as_str()).or_default().2 += 1;
        if let Some(p) = p {
            let entry = counts.entry(p.as_str()).or_default();
            entry.1 += 1;
            if p == e {
                entry.0 += 1;
            }
        }
    }

    Ok(counts
        .into_iter()
        .map(|(label, (tp, n_predicted, n_expected))| {
            let precision = ratio(tp, n_predicted);
            let recall = ratio(tp, n_expected);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                label: label.to_string(),
                precision,
                recall,
                f1,
                support: n_expected,
            }
        })
        .collect())
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Outcome of predicting a labeled set one document at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationSummary {
    /// Predicted label per document; `None` where no class reached the depth.
    pub predictions: Vec<Option<String>>,
    pub correct: usize,
    pub abstained: usize,
}

impl EvaluationSummary {
    pub fn total(&self) -> usize {
        self.predictions.len()
    }

    /// Correct predictions over all documents, abstentions included.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.total())
    }

    /// Share of documents that received a prediction.
    pub fn coverage(&self) -> f64 {
        ratio(self.total() - self.abstained, self.total())
    }
}

/// Predict every document individually so that one document without enough
/// evidence does not abort the rest, then compare against `expected` labels.
pub fn evaluate<M: TextClassifier + ?Sized>(
    model: &mut M,
    data: &[DocumentData],
    expected: &[String],
) -> Result<EvaluationSummary, WbnError> {
    validate(data, expected)?;

    let mut summary = EvaluationSummary::default();
    for (document, label) in data.iter().zip(expected) {
        let predicted = match model.predict(std::slice::from_ref(document)) {
            Ok(codes) => model.reverse_encode(&codes).into_iter().next().flatten(),
            Err(WbnError::MaxDepthExceeded { .. }) => {
                summary.abstained += 1;
                None
            }
            Err(e) => return Err(e),
        };
        if predicted.as_deref() == Some(label.as_str()) {
            summary.correct += 1;
        }
        summary.predictions.push(predicted);
    }

    log::info!(
        "Evaluated {} documents with {}: accuracy {:.4}, coverage {:.4}",
        summary.total(),
        model.name(),
        summary.accuracy(),
        summary.coverage()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_counts_matches() {
        assert!((accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]).unwrap() - 0.75).abs() < 1e-12);
        assert_eq!(accuracy(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn accuracy_rejects_length_mismatch() {
        let err = accuracy(&[0, 1], &[0]).unwrap_err();
        assert_eq!(err, WbnError::InstanceCount { data: 2, target: 1 });
    }

    #[test]
    fn confusion_matrix_rows_are_expected() {
        let matrix = confusion_matrix(&[0, 1, 1, 5], &[0, 0, 1, 1], 2).unwrap();
        assert_eq!(matrix, vec![vec![1, 1], vec![0, 1]]);
    }

    #[test]
    fn class_report_handles_abstentions() {
        let predicted = vec![Some("a".to_string()), None, Some("a".to_string())];
        let expected = vec!["a".to_string(), "b".to_string(), "b".to_string()];
        let report = class_report(&predicted, &expected).unwrap();

        assert_eq!(report.len(), 2);
        let a = &report[0];
        assert_eq!(a.label, "a");
        assert!((a.precision - 0.5).abs() < 1e-12);
        assert!((a.recall - 1.0).abs() < 1e-12);
        assert_eq!(a.support, 1);

        let b = &report[1];
        assert_eq!(b.precision, 0.0);
        assert_eq!(b.recall, 0.0);
        assert_eq!(b.f1, 0.0);
        assert_eq!(b.support, 2);
    }
}
