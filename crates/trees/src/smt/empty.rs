//! Canonical hashes of subtrees that contain no inserted leaves.

use ark_bn254::Fr;

use crate::error::Error;
use crate::poseidon::FieldHasher;

/// Empty-subtree hashes for every height up to a maximum.
///
/// `hashes[0] = H([0])` is the absent leaf and
/// `hashes[d] = H([hashes[d-1], hashes[d-1]])`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmptyHashes {
    hashes: Vec<Fr>,
}

impl EmptyHashes {
    /// Compute the table for heights `0..=max_depth`.
    pub fn new(max_depth: usize, hasher: &mut FieldHasher) -> Result<Self, Error> {
        let mut hashes = Vec::with_capacity(max_depth + 1);
        let mut current = hasher.hash_one(Fr::from(0u64))?;
        hashes.push(current);

        for _ in 0..max_depth {
            current = hasher.hash_two(current, current)?;
            hashes.push(current);
        }

        Ok(Self { hashes })
    }

    /// Hash of an empty subtree of height `depth`, if within the table.
    pub fn get(&self, depth: usize) -> Option<Fr> {
        self.hashes.get(depth).copied()
    }

    /// Largest height held by the table.
    pub fn max_depth(&self) -> usize {
        self.hashes.len() - 1
    }

    pub(crate) fn at(&self, depth: usize) -> Fr {
        self.hashes[depth]
    }
}

/// Recompute the empty-subtree hash for `depth` from scratch.
pub fn empty_hash(depth: usize) -> Result<Fr, Error> {
    let mut hasher = FieldHasher::new()?;
    let mut current = hasher.hash_one(Fr::from(0u64))?;
    for _ in 0..depth {
        current = hasher.hash_two(current, current)?;
    }
    Ok(current)
}

#[cfg(test)]
mod empty_tests {
    use super::*;
    use crate::field::from_decimal;

    #[test]
    fn test_table_matches_recomputation() {
        let mut hasher = FieldHasher::new().unwrap();
        let table = EmptyHashes::new(8, &mut hasher).unwrap();

        assert_eq!(table.max_depth(), 8);
        for depth in 0..=8 {
            assert_eq!(table.get(depth).unwrap(), empty_hash(depth).unwrap());
        }
        assert_eq!(table.get(9), None);
    }

    #[test]
    fn test_each_level_compresses_the_previous() {
        let mut hasher = FieldHasher::new().unwrap();
        let table = EmptyHashes::new(4, &mut hasher).unwrap();

        for depth in 1..=4 {
            let prev = table.at(depth - 1);
            assert_eq!(table.at(depth), hasher.hash_two(prev, prev).unwrap());
        }
    }

    #[test]
    fn test_depth_two_value() {
        let expected = from_decimal(
            "2186774891605521484511138647132707263205739024356090574223746683689524510919",
        )
        .unwrap();
        assert_eq!(empty_hash(2).unwrap(), expected);
    }
}
