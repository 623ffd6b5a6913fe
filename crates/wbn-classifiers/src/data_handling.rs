//! Data structures for training and inference documents.
//!
//! `DocumentData` is the unit the model consumes: a token list plus an
//! optional list of extracted keywords. `Document` pairs it with an optional
//! class label and `Documents` offers the parallel `data`/`target` views that
//! `fit` expects, along with a reproducible train/test split.
use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::TermSource;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentData {
    pub tokens: Vec<String>,
    /// Keywords extracted upstream, when available.
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

impl DocumentData {
    pub fn new<S: Into<String>>(tokens: impl IntoIterator<Item = S>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            keywords: None,
        }
    }

    pub fn with_keywords<S: Into<String>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Raw (un-normalized) terms selected by `source`.
    pub fn terms(&self, source: TermSource) -> Box<dyn Iterator<Item = &str> + '_> {
        let tokens = self.tokens.iter().map(String::as_str);
        match (source, self.keywords.as_ref()) {
            (TermSource::Tokens, _) | (TermSource::Keywords, None) => Box::new(tokens),
            (TermSource::Keywords, Some(keywords)) => Box::new(keywords.iter().map(String::as_str)),
            (TermSource::Both, Some(keywords)) => {
                Box::new(tokens.chain(keywords.iter().map(String::as_str)))
            }
            (TermSource::Both, None) => Box::new(tokens),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub data: DocumentData,
    /// Class label; `None` for documents that are only predicted.
    pub target: Option<String>,
}

impl Document {
    pub fn new(data: DocumentData, target: impl Into<String>) -> Self {
        Self {
            data,
            target: Some(target.into()),
        }
    }

    pub fn unlabeled(data: DocumentData) -> Self {
        Self { data, target: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Documents {
    documents: Vec<Document>,
}

impl Documents {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Document payloads in order.
    pub fn data(&self) -> Vec<DocumentData> {
        self.documents.iter().map(|d| d.data.clone()).collect()
    }

    /// Labels in order. Unlabeled documents are skipped, so callers that need
    /// a value per document should check `is_fully_labeled` first.
    pub fn target(&self) -> Vec<String> {
        self.documents
            .iter()
            .filter_map(|d| d.target.clone())
            .collect()
    }

    pub fn is_fully_labeled(&self) -> bool {
        self.documents.iter().all(|d| d.target.is_some())
    }

    /// Number of documents per label.
    pub fn label_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for label in self.documents.iter().filter_map(|d| d.target.as_ref()) {
            *counts.entry(label.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn log_summary(&self) {
        log::info!(
            "Documents: {} total, {} labeled, {} distinct labels",
            self.len(),
            self.documents.iter().filter(|d| d.target.is_some()).count(),
            self.label_counts().len()
        );
    }

    /// Shuffle with a fixed seed and split into `(train, test)`.
    ///
    /// `train_fraction` is clamped to `[0, 1]`; the train set receives
    /// `floor(len * train_fraction)` documents.
    pub fn train_test_split(&self, train_fraction: f32, seed: u64) -> (Documents, Documents) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut indices: Vec<usize> = (0..self.documents.len()).collect();
        indices.shuffle(&mut rng);

        let fraction = train_fraction.clamp(0.0, 1.0);
        let n_train = (self.documents.len() as f32 * fraction) as usize;

        let (train_idx, test_idx) = indices.split_at(n_train);
        (self.select(train_idx), self.select(test_idx))
    }

    fn select(&self, indices: &[usize]) -> Documents {
        Documents::new(indices.iter().map(|&i| self.documents[i].clone()).collect())
    }
}

impl From<Vec<Document>> for Documents {
    fn from(documents: Vec<Document>) -> Self {
        Self::new(documents)
    }
}

impl FromIterator<Document> for Documents {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Documents {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

impl<'a> IntoIterator for &'a Documents {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(tokens: &[&str], label: &str) -> Document {
        Document::new(DocumentData::new(tokens.iter().copied()), label)
    }

    #[test]
    fn term_source_selects_terms() {
        let data = DocumentData::new(["hello", "world"]).with_keywords(["hello"]);
        let tokens: Vec<&str> = data.terms(TermSource::Tokens).collect();
        let keywords: Vec<&str> = data.terms(TermSource::Keywords).collect();
        let both: Vec<&str> = data.terms(TermSource::Both).collect();

        assert_eq!(tokens, vec!["hello", "world"]);
        assert_eq!(keywords, vec!["hello"]);
        assert_eq!(both, vec!["hello", "world", "hello"]);
    }

    #[test]
    fn keywords_fall_back_to_tokens() {
        let data = DocumentData::new(["foo", "bar"]);
        let terms: Vec<&str> = data.terms(TermSource::Keywords).collect();
        assert_eq!(terms, vec!["foo", "bar"]);
    }

    #[test]
    fn data_and_target_are_parallel() {
        let docs = Documents::new(vec![doc(&["a"], "x"), doc(&["b"], "y")]);
        assert_eq!(docs.data().len(), 2);
        assert_eq!(docs.target(), vec!["x".to_string(), "y".to_string()]);
        assert!(docs.is_fully_labeled());
    }

    #[test]
    fn split_is_reproducible_and_partitions() {
        let docs: Documents = (0..10)
            .map(|i| doc(&["t"], &format!("label_{}", i % 3)))
            .collect();

        let (train_a, test_a) = docs.train_test_split(0.8, 7);
        let (train_b, test_b) = docs.train_test_split(0.8, 7);

        assert_eq!(train_a.len(), 8);
        assert_eq!(test_a.len(), 2);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
    }

    #[test]
    fn label_counts_skip_unlabeled() {
        let mut docs = Documents::new(vec![doc(&["a"], "x"), doc(&["b"], "x")]);
        docs.push(Document::unlabeled(DocumentData::new(["c"])));
        let counts = docs.label_counts();
        assert_eq!(counts.get("x"), Some(&2));
        assert_eq!(counts.len(), 1);
        assert!(!docs.is_fully_labeled());
    }
}
