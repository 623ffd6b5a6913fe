//! CLI helpers for fitting, classifying and evaluating datasets.
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use wbn_classifiers::config::ModelConfig;
use wbn_classifiers::io::read_dataset;
use wbn_classifiers::stats::{
    accuracy, class_report, confusion_matrix, evaluate, ClassMetrics, EvaluationSummary,
};
use wbn_classifiers::{Documents, WbnClassifier, WbnError};

use crate::util::validate_dataset_file;

/// Parameters shared by the `classify` and `evaluate` subcommands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    pub model: ModelConfig,
    /// Share of documents used for fitting when evaluating.
    pub train_fraction: f32,
    pub seed: u64,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            train_fraction: 0.8,
            seed: 42,
        }
    }
}

impl ClassifyConfig {
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            anyhow::bail!(
                "train_fraction must be between 0 and 1 (exclusive), got {}",
                self.train_fraction
            );
        }
        Ok(())
    }
}

/// Load a classify configuration from a JSON file.
pub fn load_classify_config<P: AsRef<Path>>(path: P) -> Result<ClassifyConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: ClassifyConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

/// One output row of `classify`. `code` and `label` are empty when the
/// document had too little evidence under every class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRow {
    pub index: usize,
    pub code: Option<usize>,
    pub label: Option<String>,
    pub probability: Option<f64>,
}

fn load_labeled<P: AsRef<Path>>(path: P) -> Result<Documents> {
    validate_dataset_file(&path)?;
    let documents = read_dataset(&path)?;
    if !documents.is_fully_labeled() {
        anyhow::bail!(
            "Every document needs a label: {}",
            path.as_ref().display()
        );
    }
    documents.log_summary();
    Ok(documents)
}

/// Fit on `train_path`, then predict every document of `input_path`.
pub fn run_classify<P: AsRef<Path>>(
    train_path: P,
    input_path: P,
    config: &ClassifyConfig,
) -> Result<Vec<PredictionRow>> {
    config.validate()?;
    let train = load_labeled(&train_path)?;

    validate_dataset_file(&input_path)?;
    let input = read_dataset(&input_path)?;

    let mut model = WbnClassifier::from_config(config.model.clone())?;
    model.fit(&train.data(), &train.target())?;
    log::info!(
        "Classifying {} documents (depth {})",
        input.len(),
        model.depth()
    );

    let mut rows = Vec::with_capacity(input.len());
    for (index, document) in input.iter().enumerate() {
        let row = match model.predict_scores(std::slice::from_ref(&document.data)) {
            Ok(scores) => {
                let best = scores.into_iter().next();
                let code = best.as_ref().map(|score| score.class_code);
                PredictionRow {
                    index,
                    code,
                    label: code.and_then(|c| model.encoder().label_of(c).map(str::to_string)),
                    probability: best.map(|score| score.probability),
                }
            }
            Err(WbnError::MaxDepthExceeded { .. }) => {
                log::warn!("Document {} has too little evidence for any class", index);
                PredictionRow {
                    index,
                    code: None,
                    label: None,
                    probability: None,
                }
            }
            Err(e) => return Err(e.into()),
        };
        rows.push(row);
    }

    Ok(rows)
}

/// Write predictions as TSV to `output`, or to stdout when `None`.
pub fn write_predictions(rows: &[PredictionRow], output: Option<&Path>) -> Result<()> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output: {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);
    wtr.write_record(["index", "code", "label", "probability"])?;
    for row in rows {
        wtr.write_record([
            row.index.to_string(),
            row.code.map(|c| c.to_string()).unwrap_or_default(),
            row.label.clone().unwrap_or_default(),
            row.probability.map(|p| p.to_string()).unwrap_or_default(),
        ])?;
    }
    wtr.flush().context("Failed to write predictions")?;
    Ok(())
}

/// Result of `run_evaluate`.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub train_size: usize,
    pub test_size: usize,
    pub summary: EvaluationSummary,
    pub classes: Vec<ClassMetrics>,
    /// Training labels in code order; rows and columns of `confusion`.
    pub labels: Vec<String>,
    /// Accuracy over documents that received a prediction and whose
    /// expected label was seen in training.
    pub covered_accuracy: f64,
    pub confusion: Vec<Vec<usize>>,
}

/// Split a labeled dataset, fit on the training part and score the rest.
pub fn run_evaluate<P: AsRef<Path>>(dataset: P, config: &ClassifyConfig) -> Result<EvaluationReport> {
    config.validate()?;
    let documents = load_labeled(&dataset)?;
    let (train, test) = documents.train_test_split(config.train_fraction, config.seed);
    if train.is_empty() || test.is_empty() {
        anyhow::bail!(
            "Split of {} documents left an empty train or test set",
            documents.len()
        );
    }

    let mut model = WbnClassifier::from_config(config.model.clone())?;
    model.fit(&train.data(), &train.target())?;

    let expected = test.target();
    let summary = evaluate(&mut model, &test.data(), &expected)?;
    let classes = class_report(&summary.predictions, &expected)?;

    let encoder = model.encoder();
    let (predicted_codes, expected_codes): (Vec<usize>, Vec<usize>) = summary
        .predictions
        .iter()
        .zip(&expected)
        .filter_map(|(predicted, label)| {
            let predicted = encoder.code_of(predicted.as_deref()?)?;
            let expected = encoder.code_of(label)?;
            Some((predicted, expected))
        })
        .unzip();
    let labels: Vec<String> = encoder.labels().map(str::to_string).collect();
    let covered_accuracy = accuracy(&predicted_codes, &expected_codes)?;
    let confusion = confusion_matrix(&predicted_codes, &expected_codes, labels.len())?;

    Ok(EvaluationReport {
        train_size: train.len(),
        test_size: test.len(),
        summary,
        classes,
        labels,
        covered_accuracy,
        confusion,
    })
}

/// Human-readable evaluation summary.
pub fn write_evaluation<W: Write>(report: &EvaluationReport, mut out: W) -> Result<()> {
    writeln!(
        out,
        "train: {}\ttest: {}\taccuracy: {:.4}\tcovered accuracy: {:.4}\tcoverage: {:.4}\tabstained: {}",
        report.train_size,
        report.test_size,
        report.summary.accuracy(),
        report.covered_accuracy,
        report.summary.coverage(),
        report.summary.abstained
    )?;
    writeln!(out, "label\tprecision\trecall\tf1\tsupport")?;
    for metrics in &report.classes {
        writeln!(
            out,
            "{}\t{:.4}\t{:.4}\t{:.4}\t{}",
            metrics.label, metrics.precision, metrics.recall, metrics.f1, metrics.support
        )?;
    }

    // expected labels as rows, predicted labels as columns
    writeln!(out, "confusion\t{}", report.labels.join("\t"))?;
    for (label, row) in report.labels.iter().zip(&report.confusion) {
        let counts: Vec<String> = row.iter().map(|count| count.to_string()).collect();
        writeln!(out, "{}\t{}", label, counts.join("\t"))?;
    }
    Ok(())
}
