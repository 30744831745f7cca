//! Assignment of subtrees to workers

use super::Tree;

/// Node of `tree` whose subtree worker `rank` of `workers` is responsible for.
///
/// Workers are shared out recursively from `root`: the left child receives
/// `ceil(workers / 2)`, the right child `floor(workers / 2)`. A node reached
/// with a single worker, or a leaf reached with several, ends the descent and
/// takes the next rank of a counter shared by the whole walk.
///
/// When the tree has fewer split points than `workers`, a leaf reached with
/// several workers consumes only one rank and the highest ranks are left
/// without a node. Those ranks, and any `rank` not smaller than `workers`,
/// get `None`.
pub fn split_tree(tree: &Tree, root: usize, workers: usize, rank: usize) -> Option<usize> {
    partition(tree, root, workers).get(rank).copied()
}

/// Node assigned to every rank, indexed by rank.
///
/// The table is shorter than `workers` exactly when some ranks were left
/// without a node.
pub fn partition(tree: &Tree, root: usize, workers: usize) -> Vec<usize> {
    let mut nodes = Vec::with_capacity(workers);
    if workers > 0 {
        assign(tree, root, workers, &mut nodes);
    }
    debug_assert!(nodes.len() <= workers);
    nodes
}

/// Walk the tree from `node`, pushing one entry per partition leaf. The length
/// of `nodes` is the rank counter.
fn assign(tree: &Tree, node: usize, workers: usize, nodes: &mut Vec<usize>) {
    match tree.children(node) {
        Some((left, right)) if workers > 1 => {
            let left_workers = workers.div_ceil(2);
            assign(tree, left, left_workers, nodes);
            assign(tree, right, workers - left_workers, nodes);
        }
        _ => nodes.push(node),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::options::TreeOptions;
    use crate::points::PointSet;
    use crate::resample::Mask;
    use crate::tree::TreeBuilder;
    use crate::types::CorrelationType;

    fn line_tree(npoints: usize, leaf_size: usize) -> Tree {
        let mut options = TreeOptions::new(CorrelationType::Auto3d);
        options.set_leaf_size(leaf_size);
        let mut set = PointSet::new(3);
        for i in 0..npoints {
            set.push(&[i as f64, 0.0, 0.0], 1.0);
        }
        TreeBuilder::new(&options, &Mask::empty()).build(set).unwrap()
    }

    #[test]
    fn test_single_worker_gets_root() {
        let tree = line_tree(10, 1);
        assert_eq!(split_tree(&tree, tree.root(), 1, 0), Some(0));
        assert_eq!(split_tree(&tree, tree.root(), 1, 1), None);
    }

    #[test]
    fn test_power_of_two_workers() {
        let tree = line_tree(16, 1);
        let nodes = partition(&tree, tree.root(), 4);
        assert_eq!(nodes.len(), 4);
        for &node in &nodes {
            assert_eq!(tree.node(node).count, 4);
        }
        // Ranks follow the left to right order of the subtrees
        for pair in nodes.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_odd_workers_favour_left() {
        let tree = line_tree(16, 1);
        let counts: Vec<usize> = partition(&tree, tree.root(), 5)
            .iter()
            .map(|&node| tree.node(node).count)
            .collect();
        // 5 -> (3, 2) -> ((2, 1), (1, 1))
        assert_eq!(counts, vec![2, 2, 4, 4, 4]);
    }

    #[test]
    fn test_small_tree_leaves_ranks_without_node() {
        // Two leaves, each reached with two workers, take one rank each
        let tree = line_tree(2, 1);
        assert_eq!(partition(&tree, tree.root(), 4), vec![1, 2]);
        assert_eq!(split_tree(&tree, tree.root(), 4, 1), Some(2));
        assert_eq!(split_tree(&tree, tree.root(), 4, 2), None);
        assert_eq!(split_tree(&tree, tree.root(), 4, 3), None);
    }

    #[test]
    fn test_shared_leaf_does_not_shift_later_ranks() {
        // Root 0 -> leaf 1 (one point) and node 2 -> leaves 3 and 4
        let tree = line_tree(3, 1);
        assert_eq!(tree.children(2), Some((3, 4)));

        let nodes: Vec<Option<usize>> = (0..4)
            .map(|rank| split_tree(&tree, tree.root(), 4, rank))
            .collect();
        assert_eq!(nodes, vec![Some(1), Some(3), Some(4), None]);
    }

    #[test]
    fn test_every_rank_agrees() {
        let tree = line_tree(12, 1);
        let nodes = partition(&tree, tree.root(), 3);
        for (rank, &node) in nodes.iter().enumerate() {
            assert_eq!(split_tree(&tree, tree.root(), 3, rank), Some(node));
        }
    }
}
