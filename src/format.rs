//! Text encodings of a [`TestVector`] for the circuit side.
//!
//! `test` emits array literals to paste into a circuit test; `toml` emits a
//! prover input file. The two disagree on index bits on purpose: the literal
//! block uses native booleans, the TOML file quoted `"0"`/`"1"` strings, which
//! is what each consumer currently reads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::hash::Digest;
use crate::types::TestVector;
use crate::utils::byte_literals;

/// Selects the textual encoding; never affects computed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Test,
    Toml,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown output format '{0}', expected 'test' or 'toml'")]
pub struct UnknownOutputFormat(String);

impl FromStr for OutputFormat {
    type Err = UnknownOutputFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" => Ok(OutputFormat::Test),
            "toml" => Ok(OutputFormat::Toml),
            other => Err(UnknownOutputFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Test => f.write_str("test"),
            OutputFormat::Toml => f.write_str("toml"),
        }
    }
}

impl OutputFormat {
    /// Renders `vector` in this format.
    ///
    /// # Errors
    /// Only the TOML encoding can fail, if serialization fails.
    pub fn render(&self, vector: &TestVector) -> Result<String, toml::ser::Error> {
        match self {
            OutputFormat::Test => Ok(render_test(vector)),
            OutputFormat::Toml => render_toml(vector),
        }
    }
}

fn array_literal(bytes: &[u8]) -> String {
    format!("[{}]", byte_literals(bytes).collect::<Vec<_>>().join(", "))
}

/// Array-literal block for embedding in circuit test source.
///
/// # Arguments
/// * `vector` - The vector to print
///
/// # Returns
/// One `let` binding per circuit input, followed by the expected key image
/// coordinates. Index bits are printed as native booleans.
#[must_use]
pub fn render_test(vector: &TestVector) -> String {
    let path = vector
        .merkle_path
        .iter()
        .map(|node| format!("    {},", array_literal(node)))
        .collect::<Vec<_>>()
        .join("\n");
    let indices = vector
        .index_bits
        .iter()
        .map(bool::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let lines = [
        "// Test Input Values".to_string(),
        format!("let secret_key_bytes = {};", array_literal(&vector.secret_key)),
        format!("let block_params = {};", array_literal(&vector.block_params)),
        format!("let validator_root = {};", array_literal(&vector.validator_root)),
        format!("let validator_merkle_path = [\n{path}\n];"),
        format!("let validator_merkle_indices = [{indices}];"),
        String::new(),
        "// Expected Results".to_string(),
        "// Key Image".to_string(),
        format!(
            "let expected_key_image_x_bytes = {};",
            array_literal(&vector.key_image.x)
        ),
        format!(
            "let expected_key_image_y_bytes = {};",
            array_literal(&vector.key_image.y)
        ),
    ];

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Prover input file layout. Field order is the order keys are written in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProverInputs {
    pub secret_key_bytes: Vec<String>,
    pub block_params: Vec<String>,
    pub validator_root: Vec<String>,
    pub validator_merkle_path: Vec<Vec<String>>,
    pub validator_merkle_indices: Vec<String>,
    pub expected_key_image_x_bytes: Vec<String>,
    pub expected_key_image_y_bytes: Vec<String>,
}

fn hex_byte_strings(bytes: &[u8]) -> Vec<String> {
    byte_literals(bytes).collect()
}

impl From<&TestVector> for ProverInputs {
    fn from(vector: &TestVector) -> Self {
        Self {
            secret_key_bytes: hex_byte_strings(&vector.secret_key),
            block_params: hex_byte_strings(&vector.block_params),
            validator_root: hex_byte_strings(&vector.validator_root),
            validator_merkle_path: vector
                .merkle_path
                .iter()
                .map(|node: &Digest| hex_byte_strings(node))
                .collect(),
            validator_merkle_indices: vector
                .index_bits
                .iter()
                .map(|&bit| if bit { "1" } else { "0" }.to_string())
                .collect(),
            expected_key_image_x_bytes: hex_byte_strings(&vector.key_image.x),
            expected_key_image_y_bytes: hex_byte_strings(&vector.key_image.y),
        }
    }
}

/// Key-value block for circuit input files.
///
/// # Errors
/// Returns the serializer error if TOML encoding fails.
pub fn render_toml(vector: &TestVector) -> Result<String, toml::ser::Error> {
    toml::to_string(&ProverInputs::from(vector))
}
