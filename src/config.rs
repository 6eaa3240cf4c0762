//! Configuration file support for vector generation.
//!
//! Settings are read from TOML; every field has a default so a partial (or
//! missing) file is valid. Command-line flags override file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::format::OutputFormat;
use crate::hash::HashFunction;
use crate::VALIDATOR_TREE_DEPTH;

const DEFAULT_LEAF_COUNT: usize = 16;
const DEFAULT_OUTPUT_FILE: &str = "zkfocil_test_values.json";

/// Configuration for the vector generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Path length the circuit expects; shorter proofs are zero-padded.
    #[serde(default = "default_tree_depth")]
    pub depth: usize,
    #[serde(default = "default_leaf_count")]
    pub leaf_count: usize,
    #[serde(default)]
    pub hash: HashFunction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_output_file")]
    pub json_file: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Seed for reproducible random inputs; unseeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            depth: VALIDATOR_TREE_DEPTH,
            leaf_count: DEFAULT_LEAF_COUNT,
            hash: HashFunction::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            json_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

fn default_tree_depth() -> usize {
    VALIDATOR_TREE_DEPTH
}

fn default_leaf_count() -> usize {
    DEFAULT_LEAF_COUNT
}

fn default_output_file() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn load_from_file_or_default(path: &Path) -> Self {
        Self::load_from_file(path).unwrap_or_default()
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}
