use std::collections::{BTreeMap, BTreeSet};

/// Bidirectional mapping between class labels and dense integer codes.
///
/// Codes are assigned `0..K` in lexicographic label order so that the same
/// training labels always produce the same encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelEncoder {
    forward: BTreeMap<String, usize>,
    backward: BTreeMap<usize, String>,
}

impl LabelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tables from the distinct labels in `labels`, replacing any
    /// previous encoding. Returns whether any label was encoded.
    pub fn encode<S: AsRef<str>>(&mut self, labels: &[S]) -> bool {
        self.clear();
        let distinct: BTreeSet<&str> = labels.iter().map(|label| label.as_ref()).collect();
        for (code, label) in distinct.into_iter().enumerate() {
            self.forward.insert(label.to_string(), code);
            self.backward.insert(code, label.to_string());
        }
        !self.forward.is_empty()
    }

    /// Look up each code; unknown codes decode to `None`.
    pub fn decode(&self, codes: &[usize]) -> Vec<Option<String>> {
        codes
            .iter()
            .map(|code| self.backward.get(code).cloned())
            .collect()
    }

    pub fn code_of(&self, label: &str) -> Option<usize> {
        self.forward.get(label).copied()
    }

    pub fn label_of(&self, code: usize) -> Option<&str> {
        self.backward.get(&code).map(String::as_str)
    }

    /// Labels in code order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.backward.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.backward.clear();
    }
}
