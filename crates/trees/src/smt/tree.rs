//! Sparse Merkle Tree native implementation.
//!
//! Nodes are materialized only along the paths of inserted keys. Every other
//! subtree stays virtual and contributes the empty-subtree hash for its height.

use std::collections::HashMap;
use std::fmt;

use ark_bn254::Fr;
use tracing::{debug, trace};

use super::empty::EmptyHashes;
use super::key::{Key, KeyError};
use super::proof::{verify_merkle_path, MerklePath, MerklePathItem};
use crate::error::Error;
use crate::poseidon::FieldHasher;

/// Largest supported tree depth (key length in bits).
pub const MAX_DEPTH: usize = 256;

/// Largest depth accepted by [`SparseMerkleTree::deterministic`], which
/// enumerates all `2^depth` keys.
pub const MAX_DETERMINISTIC_DEPTH: usize = 20;

/// A materialized tree node. Absent children are virtual.
#[derive(Clone, Debug)]
struct Node {
    data: Fr,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn new(data: Fr) -> Self {
        Self {
            data,
            left: None,
            right: None,
        }
    }
}

/// Sparse Merkle Tree keyed by bit strings of a fixed length.
///
/// Leaves hold the raw inserted value as their commitment, while absent
/// leaves commit to `H([0])`.
pub struct SparseMerkleTree {
    /// Key length and number of levels below the root
    depth: usize,

    /// Always present, even when nothing has been inserted
    root: Node,

    /// Explicitly inserted keys and their raw values
    leaves: HashMap<String, Fr>,

    /// Empty-subtree hashes for heights `0..=depth`
    empty: EmptyHashes,

    hasher: FieldHasher,
}

impl SparseMerkleTree {
    /// Create an empty tree whose root is the empty hash for `depth`.
    pub fn new(depth: usize) -> Result<Self, Error> {
        if depth == 0 || depth > MAX_DEPTH {
            return Err(Error::InvalidDepth {
                depth,
                max: MAX_DEPTH,
            });
        }

        let mut hasher = FieldHasher::new()?;
        let empty = EmptyHashes::new(depth, &mut hasher)?;
        let root = Node::new(empty.at(depth));

        Ok(Self {
            depth,
            root,
            leaves: HashMap::new(),
            empty,
            hasher,
        })
    }

    /// Create a tree where every key `i` in `[0, 2^depth)` holds the value `i`.
    pub fn deterministic(depth: usize) -> Result<Self, Error> {
        if depth > MAX_DETERMINISTIC_DEPTH {
            return Err(Error::InvalidDepth {
                depth,
                max: MAX_DETERMINISTIC_DEPTH,
            });
        }

        let mut tree = Self::new(depth)?;
        for index in 0..(1u64 << depth) {
            tree.insert_key(&Key::from_index(index, depth), Fr::from(index))?;
        }

        debug!(depth, leaves = tree.len(), "built deterministic sparse merkle tree");
        Ok(tree)
    }

    /// Set the value at `key` and recompute the commitments along its path.
    ///
    /// The key must be exactly `depth` characters of `'0'`/`'1'`. Inserting an
    /// existing key overwrites its value.
    pub fn insert(&mut self, key: &str, value: Fr) -> Result<(), Error> {
        let parsed = Key::parse(key, self.depth).map_err(|reason| Error::MalformedKey {
            key: key.to_string(),
            reason,
        })?;
        self.insert_key(&parsed, value)
    }

    /// Set the value at an already validated key.
    pub fn insert_key(&mut self, key: &Key, value: Fr) -> Result<(), Error> {
        if key.len() != self.depth {
            return Err(Error::MalformedKey {
                key: key.to_string(),
                reason: KeyError::Length {
                    expected: self.depth,
                    actual: key.len(),
                },
            });
        }

        insert_into(
            &mut self.root,
            key.bits(),
            value,
            self.depth,
            &self.empty,
            &mut self.hasher,
        )?;
        let key = key.to_string();
        trace!(%key, "inserted leaf");
        self.leaves.insert(key, value);
        Ok(())
    }

    /// Merkle path for an inserted key, ordered leaf to root.
    ///
    /// Only keys that were explicitly inserted can be proven.
    pub fn generate_merkle_path(&self, key: &str) -> Result<MerklePath, Error> {
        if !self.leaves.contains_key(key) {
            return Err(Error::KeyNotFound(key.to_string()));
        }
        let parsed = Key::parse(key, self.depth).map_err(|reason| Error::MalformedKey {
            key: key.to_string(),
            reason,
        })?;

        let mut items = Vec::with_capacity(self.depth);
        let mut current = Some(&self.root);

        for (level, &bit) in parsed.bits().iter().enumerate() {
            let child_height = self.depth - level - 1;
            let (next, sibling) = match current {
                Some(node) if bit => (node.right.as_deref(), node.left.as_deref()),
                Some(node) => (node.left.as_deref(), node.right.as_deref()),
                None => (None, None),
            };

            let sibling_hash = sibling.map_or(self.empty.at(child_height), |n| n.data);
            // Going left leaves the sibling on the right.
            items.push(MerklePathItem::new(sibling_hash, !bit));
            current = next;
        }

        items.reverse();
        Ok(MerklePath::new(items))
    }

    /// Verify a path for `leaf_value` against the current root.
    pub fn verify_path(&self, leaf_value: Fr, path: &MerklePath) -> bool {
        verify_merkle_path(leaf_value, path, self.root())
    }

    /// Current root commitment.
    pub fn root(&self) -> Fr {
        self.root.data
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Raw value recorded for `key`, if it was inserted.
    pub fn get(&self, key: &str) -> Option<Fr> {
        self.leaves.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.leaves.contains_key(key)
    }

    /// Number of inserted keys.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Empty-subtree hash for a subtree of height `level`.
    pub fn default_at_level(&self, level: usize) -> Option<Fr> {
        self.empty.get(level)
    }

    /// Materialized internal nodes whose commitment differs from
    /// `H([left or empty, right or empty])`, as `(height, bits from root)`.
    #[cfg(test)]
    pub(crate) fn inconsistent_nodes(&self) -> Vec<(usize, String)> {
        fn walk(
            node: &Node,
            height: usize,
            prefix: &mut String,
            empty: &EmptyHashes,
            hasher: &mut FieldHasher,
            bad: &mut Vec<(usize, String)>,
        ) {
            if height == 0 {
                return;
            }
            let child_height = height - 1;
            let left = node.left.as_ref().map_or(empty.at(child_height), |n| n.data);
            let right = node.right.as_ref().map_or(empty.at(child_height), |n| n.data);
            if hasher.hash_two(left, right).unwrap() != node.data {
                bad.push((height, prefix.clone()));
            }
            for (bit, child) in [('0', &node.left), ('1', &node.right)] {
                if let Some(child) = child {
                    prefix.push(bit);
                    walk(child, child_height, prefix, empty, hasher, bad);
                    prefix.pop();
                }
            }
        }

        let mut hasher = FieldHasher::new().unwrap();
        let mut bad = Vec::new();
        walk(&self.root, self.depth, &mut String::new(), &self.empty, &mut hasher, &mut bad);
        bad
    }

    /// Number of materialized nodes, root included.
    #[cfg(test)]
    pub(crate) fn materialized_nodes(&self) -> usize {
        fn count(node: &Node) -> usize {
            1 + node.left.as_deref().map_or(0, count) + node.right.as_deref().map_or(0, count)
        }
        count(&self.root)
    }
}

impl fmt::Debug for SparseMerkleTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseMerkleTree")
            .field("depth", &self.depth)
            .field("root", &self.root.data)
            .field("leaves", &self.leaves.len())
            .finish()
    }
}

/// Descend along `bits`, materializing the path, and rehash on the way back up.
///
/// `height` is the height of `node` above the leaf level.
fn insert_into(
    node: &mut Node,
    bits: &[bool],
    value: Fr,
    height: usize,
    empty: &EmptyHashes,
    hasher: &mut FieldHasher,
) -> Result<(), Error> {
    let Some((&bit, rest)) = bits.split_first() else {
        *node = Node::new(value);
        return Ok(());
    };

    let child_height = height - 1;
    let slot = if bit { &mut node.right } else { &mut node.left };
    let child = slot.get_or_insert_with(|| Box::new(Node::new(empty.at(child_height))));
    insert_into(child, rest, value, child_height, empty, hasher)?;

    let left = node.left.as_ref().map_or(empty.at(child_height), |n| n.data);
    let right = node.right.as_ref().map_or(empty.at(child_height), |n| n.data);
    node.data = hasher.hash_two(left, right)?;

    Ok(())
}

#[cfg(test)]
mod tree_tests {
    use super::*;
    use crate::smt::{empty_hash, padded_binary_key};

    #[test]
    fn test_empty_tree() {
        let tree = SparseMerkleTree::new(3).unwrap();

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.get("000"), None);
        assert_eq!(tree.root(), empty_hash(3).unwrap());
        assert_eq!(tree.materialized_nodes(), 1);
    }

    #[test]
    fn test_zero_depth_rejected() {
        assert!(matches!(
            SparseMerkleTree::new(0),
            Err(Error::InvalidDepth { depth: 0, .. })
        ));
        assert!(SparseMerkleTree::new(MAX_DEPTH + 1).is_err());
        assert!(SparseMerkleTree::deterministic(MAX_DETERMINISTIC_DEPTH + 1).is_err());
    }

    #[test]
    fn test_single_insert() {
        let mut tree = SparseMerkleTree::new(3).unwrap();

        let root1 = tree.root();
        tree.insert("000", Fr::from(5u64)).unwrap();
        let root2 = tree.root();

        assert_ne!(root1, root2, "Root should change after insert");
        assert_eq!(tree.get("000"), Some(Fr::from(5u64)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_insert_materializes_only_the_path() {
        let mut tree = SparseMerkleTree::new(16).unwrap();
        tree.insert(&padded_binary_key(12345, 16), Fr::from(1u64)).unwrap();

        // Root plus one node per level.
        assert_eq!(tree.materialized_nodes(), 17);
    }

    #[test]
    fn test_update_existing() {
        let mut tree = SparseMerkleTree::new(3).unwrap();

        tree.insert("010", Fr::from(100u64)).unwrap();
        let root1 = tree.root();

        tree.insert("010", Fr::from(150u64)).unwrap();
        let root2 = tree.root();

        assert_ne!(root1, root2, "Root should change after update");
        assert_eq!(tree.get("010"), Some(Fr::from(150u64)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_malformed_key_leaves_tree_untouched() {
        let mut tree = SparseMerkleTree::new(3).unwrap();
        let root = tree.root();

        assert!(matches!(
            tree.insert("01", Fr::from(1u64)),
            Err(Error::MalformedKey { .. })
        ));
        assert!(matches!(
            tree.insert("012", Fr::from(1u64)),
            Err(Error::MalformedKey { .. })
        ));
        assert_eq!(tree.root(), root);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_every_node_commits_to_children() {
        let tree = SparseMerkleTree::deterministic(3).unwrap();

        assert_eq!(tree.len(), 8);
        assert!(tree.inconsistent_nodes().is_empty());
    }

    #[test]
    fn test_scattered_inserts_keep_nodes_consistent() {
        let mut tree = SparseMerkleTree::new(5).unwrap();
        for (key, value) in [("00000", 3u64), ("10110", 7), ("01101", 11), ("11111", 13), ("10111", 17)] {
            tree.insert(key, Fr::from(value)).unwrap();
            assert!(tree.inconsistent_nodes().is_empty(), "after inserting {key}");
        }
        tree.insert("10110", Fr::from(19u64)).unwrap();

        assert!(tree.inconsistent_nodes().is_empty());
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_insert_key_matches_string_insert() {
        let mut by_key = SparseMerkleTree::new(4).unwrap();
        let mut by_str = SparseMerkleTree::new(4).unwrap();

        by_key.insert_key(&Key::from_index(6, 4), Fr::from(6u64)).unwrap();
        by_str.insert("0110", Fr::from(6u64)).unwrap();

        assert_eq!(by_key.root(), by_str.root());
        assert_eq!(by_key.get("0110"), Some(Fr::from(6u64)));
        assert!(matches!(
            by_key.insert_key(&Key::from_index(6, 3), Fr::from(1u64)),
            Err(Error::MalformedKey { .. })
        ));
    }

    #[test]
    fn test_order_independence() {
        let mut tree1 = SparseMerkleTree::new(4).unwrap();
        tree1.insert("0001", Fr::from(100u64)).unwrap();
        tree1.insert("1010", Fr::from(50u64)).unwrap();

        let mut tree2 = SparseMerkleTree::new(4).unwrap();
        tree2.insert("1010", Fr::from(50u64)).unwrap();
        tree2.insert("0001", Fr::from(100u64)).unwrap();

        assert_eq!(tree1.root(), tree2.root());
    }
}
