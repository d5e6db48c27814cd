//! Native Poseidon hashing backed by `light-poseidon`.

use std::fmt;

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher as _};

use crate::error::Error;

/// Reusable Poseidon hasher.
///
/// Building a circom parameter set is far more expensive than a single
/// permutation, so instances are kept around for the lifetime of the hasher.
/// The two-input set is loaded up front; the one-input set on first use,
/// since tree hashing only ever needs pairs. Other arities are built on demand.
pub struct FieldHasher {
    single: Option<Poseidon<Fr>>,
    pair: Poseidon<Fr>,
}

impl FieldHasher {
    /// Create a hasher with the two-input parameter set loaded.
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            single: None,
            pair: circom(2)?,
        })
    }

    /// Hash a single field element: `H([input])`.
    pub fn hash_one(&mut self, input: Fr) -> Result<Fr, Error> {
        let mut single = match self.single.take() {
            Some(single) => single,
            None => circom(1)?,
        };
        let hash = single
            .hash(&[input])
            .map_err(|e| Error::Hash(e.to_string()));
        self.single = Some(single);
        hash
    }

    /// Whether the one-input parameter set has been built yet.
    #[cfg(test)]
    pub(crate) fn has_single(&self) -> bool {
        self.single.is_some()
    }

    /// Hash two field elements in order: `H([left, right])`.
    pub fn hash_two(&mut self, left: Fr, right: Fr) -> Result<Fr, Error> {
        self.pair
            .hash(&[left, right])
            .map_err(|e| Error::Hash(e.to_string()))
    }

    /// Hash an ordered sequence of field elements.
    pub fn hash(&mut self, inputs: &[Fr]) -> Result<Fr, Error> {
        match inputs {
            [input] => self.hash_one(*input),
            [left, right] => self.hash_two(*left, *right),
            _ => circom(inputs.len())?
                .hash(inputs)
                .map_err(|e| Error::Hash(e.to_string())),
        }
    }
}

impl fmt::Debug for FieldHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHasher").finish_non_exhaustive()
    }
}

fn circom(inputs: usize) -> Result<Poseidon<Fr>, Error> {
    if inputs == 0 {
        return Err(Error::Hash("cannot hash an empty input".to_string()));
    }
    Poseidon::<Fr>::new_circom(inputs).map_err(|e| Error::Hash(e.to_string()))
}

/// Hash a single field element.
pub fn poseidon_hash(input: Fr) -> Result<Fr, Error> {
    circom(1)?
        .hash(&[input])
        .map_err(|e| Error::Hash(e.to_string()))
}

/// Hash two field elements.
pub fn poseidon_hash_two(a: Fr, b: Fr) -> Result<Fr, Error> {
    circom(2)?
        .hash(&[a, b])
        .map_err(|e| Error::Hash(e.to_string()))
}

/// Hash multiple field elements.
pub fn poseidon_hash_many(inputs: &[Fr]) -> Result<Fr, Error> {
    circom(inputs.len())?
        .hash(inputs)
        .map_err(|e| Error::Hash(e.to_string()))
}
