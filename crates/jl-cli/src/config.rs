//! `--config` file: category table, matrix options and label vocabularies.

use anyhow::{Context, Result};
use jl_label::{
    CategorySpec, CategoryTable, DEFAULT_MATRIX_SIZE, LabelSet, MatrixOptions, OutputNaming,
    SelectionSpec,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Ordered category table.
    #[serde(default = "default_categories")]
    pub categories: Vec<CategorySpec>,

    #[serde(default)]
    pub matrix: MatrixConfig,

    /// Vocabulary selecting histograms for `label-matrix`.
    #[serde(default = "SelectionSpec::matrix_default")]
    pub matrix_selection: SelectionSpec,

    /// Vocabulary grouping objects for `split`.
    #[serde(default = "SelectionSpec::split_default")]
    pub split_selection: SelectionSpec,

    #[serde(default)]
    pub split_naming: OutputNaming,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatrixConfig {
    /// Categories per axis.
    #[serde(default = "default_matrix_size")]
    pub size: usize,
    /// Normalize sources to unit area before mapping.
    #[serde(default = "default_true")]
    pub normalize: bool,
}

fn default_categories() -> Vec<CategorySpec> {
    CategoryTable::jet_flavours().specs()
}

fn default_matrix_size() -> usize {
    DEFAULT_MATRIX_SIZE
}

fn default_true() -> bool {
    true
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self { size: default_matrix_size(), normalize: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            matrix: MatrixConfig::default(),
            matrix_selection: SelectionSpec::matrix_default(),
            split_selection: SelectionSpec::split_default(),
            split_naming: OutputNaming::default(),
        }
    }
}

impl Config {
    pub fn category_table(&self) -> Result<CategoryTable> {
        Ok(CategoryTable::new(self.categories.clone())?)
    }

    pub fn matrix_options(&self) -> MatrixOptions {
        MatrixOptions { size: self.matrix.size, normalize: self.matrix.normalize }
    }

    pub fn matrix_labels(&self) -> Result<LabelSet> {
        self.matrix_selection.build().context("invalid matrix_selection")
    }

    pub fn split_labels(&self) -> Result<LabelSet> {
        self.split_selection.build().context("invalid split_selection")
    }
}

/// Read a YAML or JSON (by `.json` extension) config; `None` gives the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read config {}", path.display()))?;
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    let cfg: Config = if ext == "json" {
        serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse config JSON {}", path.display()))?
    } else {
        serde_yaml_ng::from_slice(&bytes)
            .with_context(|| format!("failed to parse config YAML {}", path.display()))?
    };
    tracing::info!(path = %path.display(), categories = cfg.categories.len(), "config loaded");
    Ok(cfg)
}
