//! Graph builder: folds normalized documents into per-class term statistics
//! and turns them into a fully connected directed term-pair graph.
use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::NodeIndex;

use super::classification::{Attribute, Classification, TermGraph};

/// Terms are combined pairwise.
pub const COMBINATION_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TermStats {
    /// Occurrences across all class documents.
    count: usize,
    /// Class documents containing the term.
    presence: usize,
}

/// Running statistics for one class during fit.
#[derive(Debug, Clone, Default)]
pub struct ClassAccumulator {
    terms: BTreeMap<String, TermStats>,
    documents: usize,
}

impl ClassAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one document's term counts in. A term adds at most one to its
    /// presence however often it occurs in the document.
    pub fn add_document(&mut self, counts: &BTreeMap<String, usize>) {
        self.documents += 1;
        for (term, &count) in counts {
            let stats = self.terms.entry(term.clone()).or_default();
            stats.count += count;
            stats.presence += 1;
        }
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn total_occurrences(&self) -> usize {
        self.terms.values().map(|stats| stats.count).sum()
    }

    /// One attribute per distinct term, in lexicographic term order.
    pub fn attributes(&self) -> Vec<Attribute> {
        let total = self.total_occurrences();
        self.terms
            .iter()
            .map(|(term, stats)| {
                let weight = if total == 0 {
                    0.0
                } else {
                    stats.count as f64 / total as f64
                };
                Attribute::new(
                    term.clone(),
                    weight,
                    stats.presence,
                    self.documents - stats.presence,
                )
            })
            .collect()
    }

    pub fn corpus(&self) -> BTreeSet<String> {
        self.terms.keys().cloned().collect()
    }

    pub fn into_classification(self, class_label: impl Into<String>, class_code: usize) -> Classification {
        let corpus = self.corpus();
        let graph = build_graph(self.attributes());
        Classification {
            graph,
            class_label: class_label.into(),
            class_code,
            corpus,
        }
    }
}

/// Connect every unordered pair of attributes with one directed edge,
/// pointing from the earlier attribute to the later one.
///
/// Fewer than `COMBINATION_SIZE` attributes form no pair, so the graph is
/// left empty.
pub fn build_graph(attributes: Vec<Attribute>) -> TermGraph {
    let n = attributes.len();
    if n < COMBINATION_SIZE {
        return TermGraph::new();
    }

    let mut graph = TermGraph::with_capacity(n, n * (n - 1) / 2);
    let nodes: Vec<NodeIndex> = attributes
        .into_iter()
        .map(|attr| graph.add_node(attr))
        .collect();

    for (i, &parent) in nodes.iter().enumerate() {
        for &child in nodes.iter().skip(i + 1) {
            graph.add_edge(parent, child, ());
        }
    }

    graph
}
