//! Parallel composition of independent dense branches.
//!
//! Each branch is built on its own rayon worker with its own hasher; branch
//! roots are then committed by a top-level dense tree.

use ark_bn254::Fr;
use merkle_trees::DenseMerkleTree;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::ForestConfig;
use crate::error::GeneratorError;

/// Depth of each branch in [`branched_root`] (64 leaves per branch).
pub const DEFAULT_BRANCH_DEPTH: usize = 6;

/// Branch roots and the root committing to them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Forest {
    pub config: ForestConfig,
    pub branches: Vec<Fr>,
    pub root: Fr,
}

/// Roots of every branch in `config`, in branch order.
pub fn branch_roots(config: &ForestConfig) -> Result<Vec<Fr>, GeneratorError> {
    config.validate()?;
    let depth = config.l_level as usize;

    (0..config.branch_count())
        .into_par_iter()
        .map(|branch| -> Result<Fr, GeneratorError> {
            let start = config.start_index(branch)?;
            let tree = DenseMerkleTree::deterministic(depth, start)?;
            debug!(branch, start, "branch built");
            Ok(tree.root())
        })
        .collect()
}

/// Root of the dense tree whose leaves are `branches`.
pub fn forest_root(branches: &[Fr]) -> Result<Fr, GeneratorError> {
    Ok(DenseMerkleTree::from_leaves(branches.to_vec())?.root())
}

/// Build all branches for `config` and combine them.
pub fn build_forest(config: ForestConfig) -> Result<Forest, GeneratorError> {
    config.validate()?;
    info!(
        h_level = config.h_level,
        l_level = config.l_level,
        pre_image = config.pre_image,
        branches = config.branch_count(),
        "building forest"
    );

    let branches = branch_roots(&config)?;
    let root = forest_root(&branches)?;

    info!(root = %merkle_trees::field::to_hex(root), "forest built");
    Ok(Forest {
        config,
        branches,
        root,
    })
}

/// Root of a deterministic dense tree of `depth`, built as a tree of branches.
///
/// The leaves are split into `2^(depth - branch_depth)` branches of
/// `2^branch_depth` leaves built in parallel. Trees no deeper than
/// `branch_depth` are built as a single branch. The result equals
/// `DenseMerkleTree::deterministic(depth, start_index).root()`.
pub fn branched_root(
    depth: usize,
    start_index: u64,
    branch_depth: usize,
) -> Result<Fr, GeneratorError> {
    if depth > merkle_trees::MAX_DENSE_DEPTH {
        return Err(merkle_trees::Error::InvalidDepth {
            depth,
            max: merkle_trees::MAX_DENSE_DEPTH,
        }
        .into());
    }
    if depth <= branch_depth {
        return Ok(DenseMerkleTree::deterministic(depth, start_index)?.root());
    }

    let per_branch = 1u64 << branch_depth;
    let roots = (0..1usize << (depth - branch_depth))
        .into_par_iter()
        .map(|branch| -> Result<Fr, GeneratorError> {
            let start = (branch as u64)
                .checked_mul(per_branch)
                .and_then(|offset| offset.checked_add(start_index))
                .ok_or(GeneratorError::IndexOverflow(branch))?;
            Ok(DenseMerkleTree::deterministic(branch_depth, start)?.root())
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    forest_root(&roots)
}
