use std::path::Path;

use anyhow::Result;

/// Dataset files must exist and carry a `.json`, `.tsv` or `.csv` extension.
pub fn validate_dataset_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("json") | Some("tsv") | Some("csv") => {}
        _ => anyhow::bail!(
            "Dataset must have a .json, .tsv or .csv extension: {}",
            path.display()
        ),
    }

    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }

    Ok(())
}
