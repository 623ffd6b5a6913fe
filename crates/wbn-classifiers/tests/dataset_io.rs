use std::fs;

use tempfile::tempdir;
use wbn_classifiers::io::{
    read_dataset, read_delimited_dataset, read_json_dataset, read_tsv_dataset, TsvReaderConfig,
};
use wbn_classifiers::WbnClassifier;

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[test]
fn json_dataset_fits_a_model() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("train.json");
    fs::write(
        &path,
        r#"{
            "data": [
                [["hello", "world", "program"], ["hello", "program"]],
                [["foo", "bar", "baz", "boo"], ["bar", "baz"]]
            ],
            "target": ["program", "variable"]
        }"#,
    )
    .unwrap();

    let docs = read_json_dataset(&path).unwrap();
    assert_eq!(docs.len(), 2);
    assert!(docs.is_fully_labeled());

    let mut model = WbnClassifier::default();
    assert_eq!(model.fit(&docs.data(), &docs.target()).unwrap().len(), 2);
}

#[test]
fn malformed_json_reports_the_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let err = read_json_dataset(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.json"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = read_json_dataset(dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to open dataset"));
}

// ---------------------------------------------------------------------------
// Delimited
// ---------------------------------------------------------------------------

#[test]
fn tsv_dataset_tokenizes_text_and_splits_keywords() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("train.tsv");
    fs::write(
        &path,
        "label\ttext\tkeywords\n\
         program\tHello world, a program!\thello,program\n\
         variable\tfoo bar baz boo\t\n",
    )
    .unwrap();

    let docs = read_dataset(&path).unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs.target(), vec!["program", "variable"]);

    let data = docs.data();
    assert_eq!(data[0].tokens, vec!["hello", "world", "a", "program"]);
    assert_eq!(
        data[0].keywords,
        Some(vec!["hello".to_string(), "program".to_string()])
    );
    assert_eq!(data[1].keywords, None);
}

#[test]
fn tsv_without_label_column_is_unlabeled() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("input.tsv");
    fs::write(&path, "text\nfoo bar\nhello world\n").unwrap();

    let docs = read_dataset(&path).unwrap();
    assert_eq!(docs.len(), 2);
    assert!(!docs.is_fully_labeled());
    assert!(docs.target().is_empty());
}

#[test]
fn tsv_stray_quote_does_not_merge_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reviews.tsv");
    fs::write(
        &path,
        "label\ttext\npos\t\"great movie\nneg\tawful plot\nneg\tboring film\n",
    )
    .unwrap();

    let docs = read_tsv_dataset(&path).unwrap();
    assert_eq!(docs.len(), 3);
    assert_eq!(docs.target(), vec!["pos", "neg", "neg"]);
    assert_eq!(docs.data()[0].tokens, vec!["great", "movie"]);
    assert_eq!(docs.data()[2].tokens, vec!["boring", "film"]);
}

#[test]
fn csv_keeps_quoted_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("train.csv");
    fs::write(
        &path,
        "label,text\nnews,\"Rates rise, markets fall\"\nsports,late goal\n",
    )
    .unwrap();

    let docs = read_dataset(&path).unwrap();
    assert_eq!(docs.target(), vec!["news", "sports"]);
    assert_eq!(docs.data()[0].tokens, vec!["rates", "rise", "markets", "fall"]);
}

#[test]
fn csv_uses_custom_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("train.csv");
    fs::write(&path, "Category,Body\nsports,Goal scored late\n").unwrap();

    let config = TsvReaderConfig {
        label_column: "category".to_string(),
        text_column: "body".to_string(),
        keywords_column: None,
        ..TsvReaderConfig::csv()
    };
    let docs = read_delimited_dataset(&path, &config).unwrap();
    assert_eq!(docs.target(), vec!["sports"]);
    assert_eq!(docs.data()[0].tokens, vec!["goal", "scored", "late"]);
}

#[test]
fn missing_text_column_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.tsv");
    fs::write(&path, "label\tbody\nx\tfoo\n").unwrap();

    let err = read_dataset(&path).unwrap_err();
    assert!(err.to_string().contains("Missing text column 'text'"));
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("train.txt");
    fs::write(&path, "anything").unwrap();

    assert!(read_dataset(&path).is_err());
}
