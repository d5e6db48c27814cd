//! JSON documents emitted by the generator.

use std::path::{Path, PathBuf};

use ark_bn254::Fr;
use merkle_trees::field::to_hex;
use merkle_trees::MerklePath;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::compose::Forest;
use crate::error::GeneratorError;

/// Forest summary with field elements as `0x`-prefixed 32-byte hex strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestOutput {
    #[serde(rename = "hLevel")]
    pub h_level: u32,
    #[serde(rename = "lLevel")]
    pub l_level: u32,
    #[serde(rename = "preimage")]
    pub pre_image: u64,
    pub root: String,
    pub branches: Vec<String>,
}

impl From<&Forest> for ForestOutput {
    fn from(forest: &Forest) -> Self {
        Self {
            h_level: forest.config.h_level,
            l_level: forest.config.l_level,
            pre_image: forest.config.pre_image,
            root: to_hex(forest.root),
            branches: forest.branches.iter().copied().map(to_hex).collect(),
        }
    }
}

impl ForestOutput {
    /// Pretty JSON with four-space indentation.
    pub fn to_pretty_json(&self) -> Result<String, GeneratorError> {
        to_pretty_json(self)
    }

    /// Write the document to `dir/file_name`, returning the path written.
    pub fn write_to(&self, dir: &Path, file_name: &str) -> Result<PathBuf, GeneratorError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(file_name);
        std::fs::write(&path, self.to_pretty_json()?)?;
        Ok(path)
    }
}

/// Merkle path for one SMT key, with the verification outcome.
#[derive(Clone, Debug, Serialize)]
pub struct SmtProofOutput {
    pub depth: usize,
    pub key: String,
    #[serde(with = "merkle_trees::field::serde_hex")]
    pub leaf: Fr,
    #[serde(with = "merkle_trees::field::serde_hex")]
    pub root: Fr,
    pub path: MerklePath,
    pub verified: bool,
}

impl SmtProofOutput {
    pub fn to_pretty_json(&self) -> Result<String, GeneratorError> {
        to_pretty_json(self)
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, GeneratorError> {
    let mut bytes = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut bytes, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(bytes)?)
}
