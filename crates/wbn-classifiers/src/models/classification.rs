use std::collections::BTreeSet;
use std::fmt;

use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;

/// Statistics of one term within one class.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub word: String,
    /// Term count divided by the total number of term occurrences in the class.
    pub weight: f64,
    /// Class documents containing the term.
    pub positive: usize,
    /// Class documents not containing the term.
    pub negative: usize,
}

impl Attribute {
    pub fn new(word: impl Into<String>, weight: f64, positive: usize, negative: usize) -> Self {
        Self {
            word: word.into(),
            weight,
            positive,
            negative,
        }
    }

    /// Number of training documents of the class.
    pub fn total(&self) -> usize {
        self.positive + self.negative
    }

    /// Share of class documents containing the term.
    pub fn presence_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.positive as f64 / total as f64,
        }
    }

    /// Presence rate boosted by the term's frequency weight. One factor of
    /// an edge score.
    pub fn evidence(&self) -> f64 {
        self.presence_rate() * (1.0 + self.weight)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "<{}:{}:[{}:{}]>",
            self.word, self.weight, self.positive, self.negative
        )
    }
}

/// Directed term-pair graph of one class.
pub type TermGraph = DiGraph<Attribute, ()>;

/// One class's fitted graph together with its local corpus.
#[derive(Debug, Clone)]
pub struct Classification {
    pub graph: TermGraph,
    pub class_label: String,
    pub class_code: usize,
    /// Distinct normalized terms seen in the class's training documents.
    pub corpus: BTreeSet<String>,
}

impl Classification {
    /// `(parent, child)` attribute pairs in edge insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&Attribute, &Attribute)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (&self.graph[edge.source()], &self.graph[edge.target()]))
    }

    /// Attribute of `word`, if the term takes part in at least one edge.
    pub fn attribute(&self, word: &str) -> Option<&Attribute> {
        self.graph.node_weights().find(|attr| attr.word == word)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Winning evidence of one class against one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationScore {
    pub class_code: usize,
    /// Product of the selected edge scores. A ranking value, not a calibrated
    /// probability; it may exceed 1.
    pub probability: f64,
    pub edges: Vec<(Attribute, Attribute)>,
}
