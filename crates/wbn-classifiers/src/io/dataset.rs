//! Dataset readers producing `Documents`.
//!
//! Two layouts are supported:
//!
//! * JSON: parallel `data` and `target` arrays. Each `data` entry is either
//!   `[tokens, keywords]`, a bare token list, or an object with `tokens` and
//!   optional `keywords` fields. `target` may be omitted for unlabeled input.
//! * Delimited text (TSV/CSV) with a header row: a text column that is
//!   tokenized, an optional label column, and an optional keyword column.
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use serde::Deserialize;

use crate::data_handling::{Document, DocumentData, Documents};
use crate::preprocessing::tokenize;
use crate::validation::validate;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Pair(Vec<String>, Vec<String>),
    Tokens(Vec<String>),
    Record(DocumentData),
}

impl From<RawEntry> for DocumentData {
    fn from(entry: RawEntry) -> Self {
        match entry {
            RawEntry::Pair(tokens, keywords) => DocumentData::new(tokens).with_keywords(keywords),
            RawEntry::Tokens(tokens) => DocumentData::new(tokens),
            RawEntry::Record(data) => data,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDataset {
    data: Vec<RawEntry>,
    #[serde(default)]
    target: Vec<String>,
}

/// Read a JSON dataset file.
pub fn read_json_dataset<P: AsRef<Path>>(path: P) -> Result<Documents> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open dataset: {}", path.as_ref().display()))?;
    let raw: RawDataset = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse dataset: {}", path.as_ref().display()))?;
    documents_from_raw(raw)
}

/// Parse a JSON dataset held in memory.
pub fn parse_json_dataset(content: &str) -> Result<Documents> {
    let raw: RawDataset = serde_json::from_str(content).context("Failed to parse dataset")?;
    documents_from_raw(raw)
}

fn documents_from_raw(raw: RawDataset) -> Result<Documents> {
    if raw.target.is_empty() {
        return Ok(raw
            .data
            .into_iter()
            .map(|entry| Document::unlabeled(entry.into()))
            .collect());
    }

    validate(&raw.data, &raw.target)?;
    Ok(raw
        .data
        .into_iter()
        .zip(raw.target)
        .map(|(entry, target)| Document::new(entry.into(), target))
        .collect())
}

/// Configuration for reading delimited (TSV/CSV) datasets.
#[derive(Debug, Clone)]
pub struct TsvReaderConfig {
    /// Column holding class labels. Rows are unlabeled when it is absent.
    pub label_column: String,
    /// Column holding the raw document text.
    pub text_column: String,
    /// Optional column holding pre-extracted keywords.
    pub keywords_column: Option<String>,
    pub keyword_separator: char,
    pub delimiter: u8,
    /// Treat `"` as a quote character. Off for TSV, where cells hold free
    /// text and a stray quote would otherwise swallow the following rows.
    pub quoting: bool,
}

impl Default for TsvReaderConfig {
    fn default() -> Self {
        Self {
            label_column: "label".to_string(),
            text_column: "text".to_string(),
            keywords_column: Some("keywords".to_string()),
            keyword_separator: ',',
            delimiter: b'\t',
            quoting: false,
        }
    }
}

impl TsvReaderConfig {
    pub fn csv() -> Self {
        Self {
            delimiter: b',',
            keyword_separator: ';',
            quoting: true,
            ..Self::default()
        }
    }
}

/// Read a tab-separated dataset using the default column names.
pub fn read_tsv_dataset<P: AsRef<Path>>(path: P) -> Result<Documents> {
    read_delimited_dataset(path, &TsvReaderConfig::default())
}

/// Read a delimited dataset using a custom configuration.
pub fn read_delimited_dataset<P: AsRef<Path>>(path: P, config: &TsvReaderConfig) -> Result<Documents> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .quoting(config.quoting)
        .has_headers(true)
        .flexible(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open dataset: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read dataset header row")?
        .clone();

    let text_idx = find_column(&headers, &config.text_column)
        .ok_or_else(|| anyhow!("Missing text column '{}'", config.text_column))?;
    let label_idx = find_column(&headers, &config.label_column);
    let keywords_idx = config
        .keywords_column
        .as_deref()
        .and_then(|name| find_column(&headers, name));

    if label_idx.is_none() {
        log::debug!(
            "No '{}' column in {}; reading unlabeled documents",
            config.label_column,
            path.as_ref().display()
        );
    }

    let mut documents = Documents::default();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let text = record
            .get(text_idx)
            .ok_or_else(|| anyhow!("Missing text value at row {}", row_idx + 1))?;
        let mut data = DocumentData::new(tokenize(text));

        if let Some(keywords) = keywords_idx.and_then(|idx| record.get(idx)) {
            let keywords = split_keywords(keywords, config.keyword_separator);
            if !keywords.is_empty() {
                data = data.with_keywords(keywords);
            }
        }

        let document = match label_idx {
            Some(idx) => {
                let label = record
                    .get(idx)
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .ok_or_else(|| anyhow!("Missing label value at row {}", row_idx + 1))?;
                Document::new(data, label)
            }
            None => Document::unlabeled(data),
        };
        documents.push(document);
    }

    Ok(documents)
}

/// Read a dataset, picking the layout from the file extension
/// (`.json`, `.tsv`, `.csv`).
pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<Documents> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    match ext.as_deref() {
        Some("json") => read_json_dataset(path),
        Some("tsv") => read_tsv_dataset(path),
        Some("csv") => read_delimited_dataset(path, &TsvReaderConfig::csv()),
        _ => anyhow::bail!(
            "Dataset must have a .json, .tsv or .csv extension: {}",
            path.as_ref().display()
        ),
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn split_keywords(value: &str, separator: char) -> Vec<String> {
    let mut seen = HashSet::new();
    value
        .split(separator)
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .filter(|keyword| seen.insert(keyword.clone()))
        .collect()
}
