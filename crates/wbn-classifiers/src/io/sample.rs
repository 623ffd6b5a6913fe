//! Built-in two-document sample corpus.
use crate::data_handling::{Document, DocumentData, Documents};

/// Two labeled documents: a "program" greeting and a "variable" placeholder list.
pub fn sample_documents() -> Documents {
    Documents::new(vec![
        Document::new(
            DocumentData::new(["hello", "world", "program"]).with_keywords(["hello", "program"]),
            "program",
        ),
        Document::new(
            DocumentData::new(["foo", "bar", "baz", "boo"]).with_keywords(["bar", "baz"]),
            "variable",
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_labeled_and_balanced() {
        let docs = sample_documents();
        assert_eq!(docs.len(), 2);
        assert!(docs.is_fully_labeled());
        assert_eq!(docs.label_counts().len(), 2);
    }
}
