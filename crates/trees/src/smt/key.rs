//! Bit-string keys addressing SMT leaves.

use std::fmt;

use thiserror::Error;

/// Reasons a key string is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("expected {expected} bits, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("character {found:?} at position {position} is not a binary digit")]
    NonBinary { position: usize, found: char },
}

/// A validated key: exactly `depth` bits, most significant (root level) first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key {
    bits: Vec<bool>,
}

impl Key {
    /// Parse a string of `'0'`/`'1'` characters of length `depth`.
    pub fn parse(key: &str, depth: usize) -> Result<Self, KeyError> {
        let actual = key.chars().count();
        if actual != depth {
            return Err(KeyError::Length {
                expected: depth,
                actual,
            });
        }

        let bits = key
            .chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(KeyError::NonBinary { position, found }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { bits })
    }

    /// Key for leaf `index` in a tree of the given depth.
    ///
    /// Only the low `depth` bits of `index` are used.
    pub fn from_index(index: u64, depth: usize) -> Self {
        let bits = (0..depth)
            .rev()
            .map(|shift| shift < 64 && (index >> shift) & 1 == 1)
            .collect();
        Self { bits }
    }

    /// Path bits from the root down: `false` = left, `true` = right.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Binary representation of `index`, left-padded with zeros to `depth` characters.
pub fn padded_binary_key(index: u64, depth: usize) -> String {
    format!("{index:0depth$b}")
}
