use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use super::DataProvider;
use crate::model::entities::Dataset;

/// Loads a workspace export from a JSON file.
///
/// The file is an object with any of the keys `accounts`, `clients`,
/// `automations`, `recurring_jobs` and `reminders`, each holding an array of
/// rows. Missing keys load as empty lists.
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataProvider for JsonFileProvider {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_rows(&self) -> Result<Dataset> {
        let bytes = fs::read(&self.path)
            .with_context(|| format!("failed to read dataset: {}", self.path.display()))?;
        parse_dataset(&bytes)
            .with_context(|| format!("failed to parse dataset JSON: {}", self.path.display()))
    }
}

fn parse_dataset(bytes: &[u8]) -> Result<Dataset> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        bail!("expected a JSON object at the top level");
    }
    Ok(serde_json::from_value(value)?)
}
