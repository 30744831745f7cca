//! Node counting

/// Number of nodes in a tree over `npoints` points with at most `leaf_size`
/// points per leaf.
///
/// Nodes holding more than `leaf_size` points are split into halves of
/// `npoints / 2` and `npoints - npoints / 2` points, exactly as the builder
/// splits them.
pub fn count_nodes(npoints: usize, leaf_size: usize) -> usize {
    if npoints <= leaf_size {
        return 1;
    }
    let half = npoints / 2;
    if npoints % 2 == 0 {
        1 + 2 * count_nodes(half, leaf_size)
    } else {
        1 + count_nodes(half, leaf_size) + count_nodes(npoints - half, leaf_size)
    }
}
