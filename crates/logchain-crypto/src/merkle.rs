use serde::{Deserialize, Serialize};

use logchain_types::Hash32;

use crate::hasher::combine;

/// Side of a sibling in a Merkle proof path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// One step of an inclusion proof: the sibling hash and which side it sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: Hash32,
    pub side: Side,
}

/// Binary Merkle tree over entry hashes.
///
/// Adjacent leaves pair left-to-right and combine with
/// `digest(left ++ right)`. A level with an odd node count promotes its last
/// node unchanged to the next level — the duplicated-parent rule is not used,
/// so a proof never contains a self-sibling and carry levels contribute no
/// proof step. A single leaf is its own root.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    root: Hash32,
    /// All nodes level by level. Level 0 = leaves, last level = [root].
    levels: Vec<Vec<Hash32>>,
}

impl MerkleTree {
    /// Build a tree from leaf hashes. An empty list produces a zero root.
    pub fn from_leaves(leaves: Vec<Hash32>) -> Self {
        if leaves.is_empty() {
            return Self {
                root: Hash32::zero(),
                levels: vec![],
            };
        }

        let mut levels: Vec<Vec<Hash32>> = vec![leaves.clone()];
        let mut current = leaves;

        while current.len() > 1 {
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                match pair {
                    [left, right] => next.push(combine(left, right)),
                    // Odd node carries forward unchanged.
                    [last] => next.push(*last),
                    _ => unreachable!("chunks(2) yields 1 or 2 nodes"),
                }
            }
            levels.push(next.clone());
            current = next;
        }

        let root = current[0];
        Self { root, levels }
    }

    /// The root hash of the tree.
    pub fn root(&self) -> Hash32 {
        self.root
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Generate an inclusion proof for the leaf at `offset`.
    ///
    /// Returns `None` when the offset is out of bounds. Levels where the
    /// target is the carried-forward odd node contribute no step.
    pub fn proof(&self, offset: usize) -> Option<MerkleProof> {
        if offset >= self.leaf_count() {
            return None;
        }

        let mut path = Vec::new();
        let mut idx = offset;

        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_idx = idx ^ 1;
            if sibling_idx < level.len() {
                let side = if idx % 2 == 0 { Side::Right } else { Side::Left };
                path.push(ProofStep {
                    sibling: level[sibling_idx],
                    side,
                });
            }
            idx /= 2;
        }

        Some(MerkleProof {
            leaf: self.levels[0][offset],
            leaf_offset: offset,
            path,
            root: self.root,
        })
    }
}

/// Merkle inclusion proof.
///
/// Lets a verifier recompute the batch root from one leaf and the recorded
/// sibling path, without seeing any other entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// The leaf being proven.
    pub leaf: Hash32,
    /// Zero-based offset of the leaf within the batch window.
    pub leaf_offset: usize,
    /// Sibling path from leaf toward root.
    pub path: Vec<ProofStep>,
    /// Root the path is expected to reproduce.
    pub root: Hash32,
}

impl MerkleProof {
    /// Recompute the root implied by the leaf and path.
    pub fn compute_root(&self) -> Hash32 {
        fold_path(self.leaf, &self.path)
    }

    /// Verify the proof against its embedded root.
    pub fn verify(&self) -> bool {
        self.compute_root() == self.root
    }
}

/// Walk a proof path upward from a leaf, combining per recorded side.
pub fn fold_path(leaf: Hash32, path: &[ProofStep]) -> Hash32 {
    let mut current = leaf;
    for step in path {
        current = match step.side {
            Side::Left => combine(&step.sibling, &current),
            Side::Right => combine(&current, &step.sibling),
        };
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::digest;
    use proptest::prelude::*;

    fn leaf(seed: u8) -> Hash32 {
        digest(&[seed])
    }

    #[test]
    fn empty_tree_has_zero_root() {
        let tree = MerkleTree::from_leaves(vec![]);
        assert!(tree.root().is_zero());
        assert_eq!(tree.leaf_count(), 0);
        assert!(tree.proof(0).is_none());
    }

    #[test]
    fn single_leaf_is_root() {
        let l = leaf(1);
        let tree = MerkleTree::from_leaves(vec![l]);
        assert_eq!(tree.root(), l);
        let proof = tree.proof(0).unwrap();
        assert!(proof.path.is_empty());
        assert!(proof.verify());
    }

    #[test]
    fn two_leaves_combine_left_to_right() {
        let (a, b) = (leaf(1), leaf(2));
        let tree = MerkleTree::from_leaves(vec![a, b]);
        assert_eq!(tree.root(), combine(&a, &b));
    }

    #[test]
    fn odd_leaf_carries_forward_unchanged() {
        let (a, b, c) = (leaf(1), leaf(2), leaf(3));
        let tree = MerkleTree::from_leaves(vec![a, b, c]);
        // Level 1 is [ab, c]; c is promoted as-is, never hashed with itself.
        assert_eq!(tree.root(), combine(&combine(&a, &b), &c));
    }

    #[test]
    fn carry_level_contributes_no_proof_step() {
        let tree = MerkleTree::from_leaves(vec![leaf(1), leaf(2), leaf(3)]);
        let proof = tree.proof(2).unwrap();
        assert_eq!(proof.path.len(), 1);
        assert_eq!(proof.path[0].side, Side::Left);
        assert!(proof.verify());
    }

    #[test]
    fn proof_verifies_for_all_leaves() {
        for count in 1..=16 {
            let leaves: Vec<Hash32> = (0..count).map(leaf).collect();
            let tree = MerkleTree::from_leaves(leaves.clone());
            for (offset, l) in leaves.iter().enumerate() {
                let proof = tree.proof(offset).expect("proof should exist");
                assert_eq!(proof.leaf, *l);
                assert_eq!(proof.leaf_offset, offset);
                assert!(proof.verify(), "leaf {offset} of {count} should verify");
            }
        }
    }

    #[test]
    fn proof_out_of_bounds_returns_none() {
        let tree = MerkleTree::from_leaves(vec![leaf(1), leaf(2)]);
        assert!(tree.proof(2).is_none());
    }

    #[test]
    fn tampered_leaf_fails_verification() {
        let tree = MerkleTree::from_leaves((0..4).map(leaf).collect());
        let mut proof = tree.proof(0).unwrap();
        proof.leaf = leaf(99);
        assert!(!proof.verify());
    }

    #[test]
    fn tampered_sibling_fails_verification() {
        let tree = MerkleTree::from_leaves((0..8).map(leaf).collect());
        let mut proof = tree.proof(3).unwrap();
        proof.path[1].sibling = leaf(200);
        assert!(!proof.verify());
    }

    #[test]
    fn power_of_two_proof_depth() {
        let tree = MerkleTree::from_leaves((0..8).map(leaf).collect());
        for offset in 0..8 {
            assert_eq!(tree.proof(offset).unwrap().path.len(), 3);
        }
    }

    #[test]
    fn deterministic_root() {
        let leaves: Vec<Hash32> = (0..10).map(leaf).collect();
        assert_eq!(
            MerkleTree::from_leaves(leaves.clone()).root(),
            MerkleTree::from_leaves(leaves).root()
        );
    }

    #[test]
    fn proof_serde_roundtrip() {
        let tree = MerkleTree::from_leaves((0..5).map(leaf).collect());
        let proof = tree.proof(4).unwrap();
        let json = serde_json::to_string(&proof).unwrap();
        let parsed: MerkleProof = serde_json::from_str(&json).unwrap();
        assert_eq!(proof, parsed);
        assert!(parsed.verify());
    }

    proptest! {
        #[test]
        fn every_leaf_proves_membership(seeds in proptest::collection::vec(any::<u8>(), 1..200)) {
            let leaves: Vec<Hash32> = seeds.iter().map(|s| digest(&[*s])).collect();
            let tree = MerkleTree::from_leaves(leaves);
            for offset in 0..tree.leaf_count() {
                let proof = tree.proof(offset).unwrap();
                prop_assert!(proof.verify());
            }
        }

        #[test]
        fn root_changes_when_any_leaf_changes(
            seeds in proptest::collection::vec(any::<u8>(), 2..64),
            flip in any::<usize>(),
        ) {
            let leaves: Vec<Hash32> = seeds.iter().map(|s| digest(&[*s])).collect();
            let base = MerkleTree::from_leaves(leaves.clone()).root();

            let target = flip % leaves.len();
            let mut altered = leaves;
            altered[target] = digest(&[seeds[target], 0xff]);
            let changed = MerkleTree::from_leaves(altered).root();
            prop_assert_ne!(base, changed);
        }
    }
}
