use std::collections::{BTreeMap, BTreeSet};

use crate::config::ModelConfig;
use crate::data_handling::DocumentData;
use crate::encoding::LabelEncoder;
use crate::error::WbnError;
use crate::models::classification::{Classification, ClassificationScore};
use crate::models::classifier_trait::TextClassifier;
use crate::models::graph::ClassAccumulator;
use crate::models::scoring::{best_score, compute_depth, Instance};
use crate::preprocessing::{term_counts, Normalizer};
use crate::validation::validate;

/// Weighted Bayesian Network classifier.
///
/// Each class is represented by a directed graph over its terms. A document
/// is scored against every class by multiplying the strongest edge scores,
/// and the class with the highest product wins.
pub struct WbnClassifier {
    config: ModelConfig,
    normalizer: Box<dyn Normalizer>,
    encoder: LabelEncoder,
    classes: Vec<Classification>,
    predictions: Vec<ClassificationScore>,
}

impl WbnClassifier {
    /// Create an unfitted model using the normalizer named in `config`.
    pub fn new(config: ModelConfig) -> Self {
        let normalizer = config.normalizer.build();
        Self::with_normalizer(config, normalizer)
    }

    /// Create an unfitted model with a caller-supplied normalizer. The
    /// `normalizer` field of `config` is ignored.
    pub fn with_normalizer(config: ModelConfig, normalizer: Box<dyn Normalizer>) -> Self {
        WbnClassifier {
            config,
            normalizer,
            encoder: LabelEncoder::new(),
            classes: Vec::new(),
            predictions: Vec::new(),
        }
    }

    /// Validate `config` before building the model.
    pub fn from_config(config: ModelConfig) -> Result<Self, WbnError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    pub fn classifications(&self) -> &[Classification] {
        &self.classes
    }

    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }

    /// Winning scores of every successful prediction since the last fit or clear.
    pub fn prediction_log(&self) -> &[ClassificationScore] {
        &self.predictions
    }

    pub fn clear_prediction_log(&mut self) {
        self.predictions.clear();
    }

    /// Union of all class corpora.
    pub fn global_corpus(&self) -> BTreeSet<&str> {
        self.classes
            .iter()
            .flat_map(|class| class.corpus.iter().map(String::as_str))
            .collect()
    }

    /// Edge depth used when scoring against the current classifications.
    pub fn depth(&self) -> usize {
        compute_depth(self.global_corpus().len(), self.config.depth_fraction)
    }

    /// Build one term graph per distinct label.
    ///
    /// Any previous fit and the prediction log are discarded first.
    ///
    /// # Errors
    ///
    /// `WbnError::InstanceCount` when `data` and `target` differ in length;
    /// the model is left untouched in that case.
    pub fn fit<S: AsRef<str>>(
        &mut self,
        data: &[DocumentData],
        target: &[S],
    ) -> Result<&[Classification], WbnError> {
        validate(data, target)?;

        self.classes.clear();
        self.predictions.clear();
        self.encoder.encode(target);

        let mut by_class: BTreeMap<&str, ClassAccumulator> = BTreeMap::new();
        for (document, label) in data.iter().zip(target) {
            let counts = term_counts(
                self.normalizer.as_ref(),
                document.terms(self.config.term_source),
            );
            by_class
                .entry(label.as_ref())
                .or_default()
                .add_document(&counts);
        }

        for (label, accumulator) in by_class {
            let Some(code) = self.encoder.code_of(label) else {
                continue;
            };
            let classification = accumulator.into_classification(label, code);
            log::debug!(
                "Class '{}' (code {}): {} terms, {} nodes, {} edges",
                label,
                code,
                classification.corpus.len(),
                classification.node_count(),
                classification.edge_count()
            );
            self.classes.push(classification);
        }

        log::info!(
            "Fitted {} classifications from {} documents using the {} normalizer",
            self.classes.len(),
            data.len(),
            self.normalizer.name()
        );

        Ok(&self.classes)
    }

    /// Predict the class code of every document.
    ///
    /// # Errors
    ///
    /// `WbnError::MaxDepthExceeded` when any document lacks enough scored
    /// edges under every class. The whole batch fails; predict documents one
    /// at a time to keep partial results.
    pub fn predict(&mut self, data: &[DocumentData]) -> Result<Vec<usize>, WbnError> {
        let scores = self.predict_scores(data)?;
        Ok(scores.into_iter().map(|score| score.class_code).collect())
    }

    /// Like `predict`, returning the full winning score of every document.
    pub fn predict_scores(
        &mut self,
        data: &[DocumentData],
    ) -> Result<Vec<ClassificationScore>, WbnError> {
        let winners = self.score_batch(data)?;
        self.predictions.extend(winners.iter().cloned());
        Ok(winners)
    }

    fn score_batch(&self, data: &[DocumentData]) -> Result<Vec<ClassificationScore>, WbnError> {
        if !self.is_fitted() && !data.is_empty() {
            log::warn!("Predicting {} documents with an unfitted model", data.len());
        }
        let corpus = self.global_corpus();
        let depth = compute_depth(corpus.len(), self.config.depth_fraction);
        log::debug!(
            "Scoring {} documents against {} classifications (corpus size {}, depth {})",
            data.len(),
            self.classes.len(),
            corpus.len(),
            depth
        );

        let mut winners = Vec::with_capacity(data.len());
        for (idx, document) in data.iter().enumerate() {
            let instance = self.instance(document, &corpus);
            match best_score(&self.classes, &instance, depth) {
                Some(score) => winners.push(score),
                None => {
                    log::warn!(
                        "Document {} ({} known terms) reached depth {} under no class",
                        idx,
                        instance.len(),
                        depth
                    );
                    return Err(WbnError::MaxDepthExceeded {
                        depth_fraction: self.config.depth_fraction,
                    });
                }
            }
        }

        Ok(winners)
    }

    /// Map class codes back to their labels; unknown codes yield `None`.
    pub fn reverse_encode(&self, codes: &[usize]) -> Vec<Option<String>> {
        self.encoder.decode(codes)
    }

    /// Normalized term counts of `document`, restricted to `corpus`.
    fn instance(&self, document: &DocumentData, corpus: &BTreeSet<&str>) -> Instance {
        let mut counts = term_counts(
            self.normalizer.as_ref(),
            document.terms(self.config.term_source),
        );
        counts.retain(|term, _| corpus.contains(term.as_str()));
        counts
    }
}

impl Default for WbnClassifier {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

impl TextClassifier for WbnClassifier {
    fn fit(
        &mut self,
        data: &[DocumentData],
        target: &[String],
    ) -> Result<&[Classification], WbnError> {
        WbnClassifier::fit(self, data, target)
    }

    fn predict(&mut self, data: &[DocumentData]) -> Result<Vec<usize>, WbnError> {
        WbnClassifier::predict(self, data)
    }

    fn reverse_encode(&self, codes: &[usize]) -> Vec<Option<String>> {
        WbnClassifier::reverse_encode(self, codes)
    }

    fn name(&self) -> &str {
        "wbn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NormalizerKind, TermSource};
    use crate::preprocessing::IdentityNormalizer;

    fn sample() -> (Vec<DocumentData>, Vec<String>) {
        let data = vec![
            DocumentData::new(["hello", "world", "program"]).with_keywords(["hello", "program"]),
            DocumentData::new(["foo", "bar", "baz", "boo"]).with_keywords(["bar", "baz"]),
        ];
        let target = vec!["program".to_string(), "variable".to_string()];
        (data, target)
    }

    fn identity_model() -> WbnClassifier {
        WbnClassifier::with_normalizer(ModelConfig::default(), Box::new(IdentityNormalizer))
    }

    #[test]
    fn fit_builds_one_classification_per_label() {
        let (data, target) = sample();
        let mut model = identity_model();
        let classes = model.fit(&data, &target).unwrap();

        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].class_label, "program");
        assert_eq!(classes[0].edge_count(), 3);
        assert_eq!(classes[1].class_label, "variable");
        assert_eq!(classes[1].edge_count(), 6);
    }

    #[test]
    fn predict_selects_variable_for_its_own_tokens() {
        let (data, target) = sample();
        let mut model = identity_model();
        model.fit(&data, &target).unwrap();

        let codes = model.predict(&data[1..]).unwrap();
        assert_eq!(model.reverse_encode(&codes), vec![Some("variable".to_string())]);
        assert_eq!(model.prediction_log().len(), 1);
    }

    #[test]
    fn failed_batch_leaves_prediction_log_untouched() {
        let (data, target) = sample();
        let mut model = identity_model();
        model.fit(&data, &target).unwrap();

        let batch = vec![data[0].clone(), DocumentData::new(["nothing", "known"])];
        let err = model.predict(&batch).unwrap_err();
        assert_eq!(err, WbnError::MaxDepthExceeded { depth_fraction: 0.05 });
        assert!(model.prediction_log().is_empty());
    }

    #[test]
    fn unfitted_model_predicts_nothing() {
        let mut model = identity_model();
        assert!(!model.is_fitted());
        assert_eq!(model.predict(&[]).unwrap(), Vec::<usize>::new());

        let err = model.predict(&[DocumentData::new(["foo", "bar"])]).unwrap_err();
        assert!(matches!(err, WbnError::MaxDepthExceeded { .. }));

        let (data, target) = sample();
        model.fit(&data, &target).unwrap();
        assert!(model.is_fitted());
    }

    #[test]
    fn mismatched_fit_keeps_previous_model() {
        let (data, target) = sample();
        let mut model = identity_model();
        model.fit(&data, &target).unwrap();

        let err = model.fit(&data, &target[..1]).unwrap_err();
        assert_eq!(err, WbnError::InstanceCount { data: 2, target: 1 });
        assert_eq!(model.classifications().len(), 2);
    }

    #[test]
    fn keyword_source_uses_keywords() {
        let (data, target) = sample();
        let config = ModelConfig::default()
            .with_term_source(TermSource::Keywords)
            .with_normalizer(NormalizerKind::Identity);
        let mut model = WbnClassifier::new(config);
        let classes = model.fit(&data, &target).unwrap();

        let corpus: Vec<&str> = classes[1].corpus.iter().map(String::as_str).collect();
        assert_eq!(corpus, vec!["bar", "baz"]);
        assert_eq!(model.global_corpus().len(), 4);
    }

    #[test]
    fn trait_object_delegates() {
        let (data, target) = sample();
        let mut model: Box<dyn TextClassifier> = Box::new(identity_model());
        assert_eq!(model.name(), "wbn");
        assert_eq!(model.fit(&data, &target).unwrap().len(), 2);
        assert_eq!(model.predict(&data[1..]).unwrap(), vec![1]);
    }
}
