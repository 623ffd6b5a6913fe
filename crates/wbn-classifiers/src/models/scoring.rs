//! Evaluator: edge scoring and depth-limited aggregation of class graphs
//! against one document instance.
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::classification::{Attribute, Classification, ClassificationScore};

/// Term counts of a normalized, corpus-filtered document.
pub type Instance = BTreeMap<String, usize>;

/// Joint evidence of an edge for `instance`.
///
/// Zero when either endpoint term is absent from the instance.
pub fn edge_score(parent: &Attribute, child: &Attribute, instance: &Instance) -> f64 {
    if !instance.contains_key(parent.word.as_str()) || !instance.contains_key(child.word.as_str()) {
        return 0.0;
    }
    parent.evidence() * child.evidence()
}

/// Number of top edges aggregated per class: `corpus_size * depth_fraction`
/// rounded half to even, and at least one.
pub fn compute_depth(corpus_size: usize, depth_fraction: f64) -> usize {
    let depth = (corpus_size as f64 * depth_fraction).round_ties_even();
    if depth.is_finite() && depth >= 1.0 {
        depth as usize
    } else {
        1
    }
}

/// Score one class against `instance`.
///
/// Returns `None` when fewer than `depth` edges have a nonzero score.
/// Otherwise the top `depth` edge scores are multiplied together.
pub fn score_classification(
    classification: &Classification,
    instance: &Instance,
    depth: usize,
) -> Option<ClassificationScore> {
    let mut scored: Vec<(f64, &Attribute, &Attribute)> = classification
        .edges()
        .filter_map(|(parent, child)| {
            let score = edge_score(parent, child, instance);
            (score > 0.0).then_some((score, parent, child))
        })
        .collect();

    if scored.len() < depth {
        return None;
    }

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored.truncate(depth);

    let probability: f64 = scored.iter().map(|(score, _, _)| score).product();
    Some(ClassificationScore {
        class_code: classification.class_code,
        probability,
        edges: scored
            .into_iter()
            .map(|(_, parent, child)| (parent.clone(), child.clone()))
            .collect(),
    })
}

/// Highest-probability class score; the first maximum wins ties.
pub fn best_score(
    classifications: &[Classification],
    instance: &Instance,
    depth: usize,
) -> Option<ClassificationScore> {
    let mut best: Option<ClassificationScore> = None;
    for classification in classifications {
        let Some(candidate) = score_classification(classification, instance, depth) else {
            log::trace!(
                "Class '{}' has fewer than {} scored edges",
                classification.class_label,
                depth
            );
            continue;
        };
        log::trace!(
            "Class '{}' scored {:.6}",
            classification.class_label,
            candidate.probability
        );
        match &best {
            Some(current) if candidate.probability <= current.probability => {}
            _ => best = Some(candidate),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::graph::ClassAccumulator;

    fn instance(terms: &[&str]) -> Instance {
        terms.iter().map(|t| (t.to_string(), 1)).collect()
    }

    fn classification(label: &str, code: usize, docs: &[&[&str]]) -> Classification {
        let mut acc = ClassAccumulator::new();
        for doc in docs {
            let counts: BTreeMap<String, usize> = doc.iter().map(|t| (t.to_string(), 1)).collect();
            acc.add_document(&counts);
        }
        acc.into_classification(label, code)
    }

    #[test]
    fn edge_score_is_zero_when_endpoint_missing() {
        let parent = Attribute::new("foo", 0.25, 1, 0);
        let child = Attribute::new("bar", 0.25, 1, 0);
        assert_eq!(edge_score(&parent, &child, &instance(&["foo"])), 0.0);
        assert_eq!(edge_score(&parent, &child, &instance(&["bar"])), 0.0);
        assert_eq!(edge_score(&parent, &child, &instance(&[])), 0.0);
    }

    #[test]
    fn edge_score_multiplies_endpoint_evidence() {
        let parent = Attribute::new("foo", 0.25, 1, 0);
        let child = Attribute::new("bar", 0.5, 1, 1);
        let score = edge_score(&parent, &child, &instance(&["foo", "bar"]));
        // (1/1 * 1.25) * (1/2 * 1.5)
        assert!((score - 0.9375).abs() < 1e-12);
    }

    #[test]
    fn depth_rounds_and_clamps() {
        assert_eq!(compute_depth(20, 0.05), 1);
        assert_eq!(compute_depth(100, 0.05), 5);
        assert_eq!(compute_depth(7, 0.05), 1);
        assert_eq!(compute_depth(0, 0.05), 1);
        assert_eq!(compute_depth(10, 0.25), 2);
        assert_eq!(compute_depth(10, 0.36), 4);
    }

    #[test]
    fn small_corpus_still_requires_one_real_edge() {
        // 7 terms at 0.05 rounds to 0; an empty product would score 1.0
        // for every class and hand the win to the first one.
        let depth = compute_depth(7, 0.05);
        assert_eq!(depth, 1);

        let program = classification("program", 0, &[&["hello", "world", "program"]]);
        let variable = classification("variable", 1, &[&["foo", "bar", "baz", "boo"]]);
        assert!(score_classification(&program, &instance(&["foo", "bar"]), depth).is_none());

        let classes = vec![program, variable];
        let best = best_score(&classes, &instance(&["foo", "bar", "baz", "boo"]), depth).unwrap();
        assert_eq!(best.class_code, 1);
        assert_eq!(best.edges.len(), 1);

        assert!(best_score(&classes, &instance(&["foo", "hello"]), depth).is_none());
    }

    #[test]
    fn class_without_enough_edges_is_skipped() {
        let class = classification("variable", 1, &[&["foo", "bar", "baz", "boo"]]);
        assert!(score_classification(&class, &instance(&["foo", "bar"]), 2).is_none());

        let score = score_classification(&class, &instance(&["foo", "bar"]), 1).unwrap();
        assert_eq!(score.class_code, 1);
        assert_eq!(score.edges.len(), 1);
        assert!((score.probability - 1.5625).abs() < 1e-12);
    }

    #[test]
    fn product_uses_top_edges_only() {
        // "a" appears in both documents, "b" and "c" in one each.
        let class = classification("x", 0, &[&["a", "b"], &["a", "c"]]);
        let score = score_classification(&class, &instance(&["a", "b", "c"]), 1).unwrap();

        let (parent, child) = &score.edges[0];
        let words = (parent.word.as_str(), child.word.as_str());
        assert!(words == ("a", "b") || words == ("a", "c"));

        let all = score_classification(&class, &instance(&["a", "b", "c"]), 3).unwrap();
        assert_eq!(all.edges.len(), 3);
        assert!(all.probability < score.probability);
    }

    #[test]
    fn best_score_prefers_highest_then_first() {
        let program = classification("program", 0, &[&["hello", "world", "program"]]);
        let variable = classification("variable", 1, &[&["foo", "bar", "baz", "boo"]]);
        let twin = classification("variable_twin", 2, &[&["foo", "bar", "baz", "boo"]]);
        let classes = vec![program, variable, twin];

        let best = best_score(&classes, &instance(&["foo", "bar", "baz", "boo"]), 1).unwrap();
        assert_eq!(best.class_code, 1);

        assert!(best_score(&classes, &instance(&["unseen"]), 1).is_none());
    }
}
