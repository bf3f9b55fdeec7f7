use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::CliResult;

/// Read a loan, schedule or request document and deserialise it.
pub fn read_json<T: DeserializeOwned>(path: &str) -> CliResult<T> {
    let (location, contents) = read_document(path)?;
    tracing::debug!(path = %location.display(), bytes = contents.len(), "read input document");
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", location.display(), e).into())
}

/// Read a document without committing to a shape yet.
pub fn read_json_value(path: &str) -> CliResult<Value> {
    read_json(path)
}

fn read_document(path: &str) -> CliResult<(PathBuf, String)> {
    let location = resolve_path(path)?;
    let contents = fs::read_to_string(&location)
        .map_err(|e| format!("Failed to read '{}': {}", location.display(), e))?;
    Ok((location, contents))
}

fn resolve_path(path: &str) -> CliResult<PathBuf> {
    let p = Path::new(path);
    let location = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !location.is_file() {
        return Err(format!("Input file not found: {}", location.display()).into());
    }
    Ok(location)
}
