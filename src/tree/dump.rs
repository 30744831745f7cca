//! Plain-text tree dumps

use super::Tree;
use crate::types::Result;
use itertools::Itertools;
use std::io::Write;

impl Tree {
    /// Write one line per emitted node, walking the tree in pre-order from `index`.
    ///
    /// Nodes whose weighted count exceeds `threshold` are descended into,
    /// other nodes and all leaves are written as their centroid coordinates,
    /// their resampling weights and `rank`.
    pub fn write_leaves<W: Write>(
        &self,
        writer: &mut W,
        index: usize,
        threshold: f64,
        rank: usize,
    ) -> Result<()> {
        let node = self.node(index);
        match node.children() {
            Some((left, right)) if node.weighted_count > threshold => {
                self.write_leaves(writer, left, threshold, rank)?;
                self.write_leaves(writer, right, threshold, rank)?;
            }
            _ => {
                let coordinates = node.centroid[..self.dim]
                    .iter()
                    .map(|x| format!("{x:.6}"))
                    .join(" ");
                let weights = self.weights(index).iter().join(" ");
                if weights.is_empty() {
                    writeln!(writer, "{coordinates} {rank}")?;
                } else {
                    writeln!(writer, "{coordinates} {weights} {rank}")?;
                }
            }
        }
        Ok(())
    }
}
