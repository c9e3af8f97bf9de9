/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Location of the components affected by a change of a graph.
//!
//! The PageRank of a node depends only on the nodes from which it can be
//! reached. When a graph is modified by adding and removing arcs, the rank of
//! a node can change only if the node can be reached from a node whose
//! incoming contributions changed. Those are the targets of added or removed
//! arcs, the successors of a node whose outdegree changed, as the rank of
//! that node is now split in a different number of parts, and the nodes that
//! became or stopped being dead ends, as a dead end is handled as if it had
//! a loop.
//!
//! Reachability is computed on the condensation of the _old_ graph, which
//! is the graph on which the previous ranks were computed. Paths of the new
//! graph using new arcs are covered, too, as the target of each new arc is
//! itself a starting point.

use crate::decomposition::Decomposition;
use crate::traits::RandomAccessGraph;

/// The components of a graph affected by a change, followed by the
/// unaffected ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffectedComponents {
    indices: Box<[usize]>,
    num_affected: usize,
}

impl AffectedComponents {
    /// Returns all component indices: first the affected ones, then the
    /// unaffected ones, both in increasing order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the number of affected components.
    pub fn num_affected(&self) -> usize {
        self.num_affected
    }

    /// Returns the affected components in increasing order.
    pub fn affected(&self) -> &[usize] {
        &self.indices[..self.num_affected]
    }

    /// Returns the unaffected components in increasing order.
    pub fn unaffected(&self) -> &[usize] {
        &self.indices[self.num_affected..]
    }
}

/// Fills `buffer` with the sorted successors of `node`.
fn sorted_successors(graph: &impl RandomAccessGraph, node: usize, buffer: &mut Vec<usize>) {
    buffer.clear();
    buffer.extend(graph.successors(node));
    buffer.sort_unstable();
}

/// Returns the components affected by the transition from an old graph to a
/// new graph with the same nodes.
///
/// The decomposition must be that of the old graph.
///
/// # Panics
///
/// Panics if the graphs, their transposes and the decomposition do not have
/// the same number of nodes.
pub fn affected_components(
    old: impl RandomAccessGraph,
    old_transpose: impl RandomAccessGraph,
    new: impl RandomAccessGraph,
    new_transpose: impl RandomAccessGraph,
    decomposition: &Decomposition,
) -> AffectedComponents {
    let num_nodes = old.num_nodes();
    assert_eq!(
        num_nodes,
        new.num_nodes(),
        "The old graph has {} nodes, but the new graph has {} nodes",
        num_nodes,
        new.num_nodes()
    );
    assert_eq!(num_nodes, old_transpose.num_nodes());
    assert_eq!(num_nodes, new_transpose.num_nodes());
    decomposition.check_num_nodes(num_nodes);

    let components = decomposition.sccs().components();
    let num_components = decomposition.sccs().num_components();
    let mut affected = vec![false; num_components];
    let mut stack = Vec::new();
    let mut mark = |component: usize, stack: &mut Vec<usize>| {
        if !affected[component] {
            affected[component] = true;
            stack.push(component);
        }
    };

    let (mut old_buf, mut new_buf) = (Vec::new(), Vec::new());
    let mut changed_nodes = 0;
    for node in 0..num_nodes {
        let mut changed = false;
        // Different predecessors
        sorted_successors(&old_transpose, node, &mut old_buf);
        sorted_successors(&new_transpose, node, &mut new_buf);
        if old_buf != new_buf {
            mark(components[node], &mut stack);
            changed = true;
        }
        // Different successors: all contributions of the node change
        sorted_successors(&old, node, &mut old_buf);
        sorted_successors(&new, node, &mut new_buf);
        if old_buf != new_buf {
            for &succ in old_buf.iter().chain(new_buf.iter()) {
                mark(components[succ], &mut stack);
            }
            // Dead ends behave as if they had a loop
            if old_buf.is_empty() || new_buf.is_empty() {
                mark(components[node], &mut stack);
            }
            changed = true;
        }
        changed_nodes += changed as usize;
    }

    // Everything reachable from a starting component is affected
    let block = decomposition.block();
    while let Some(component) = stack.pop() {
        for &succ in block.successors_of(component) {
            mark(succ, &mut stack);
        }
    }

    let mut indices = Vec::with_capacity(num_components);
    indices.extend((0..num_components).filter(|&c| affected[c]));
    let num_affected = indices.len();
    indices.extend((0..num_components).filter(|&c| !affected[c]));

    log::info!(
        "{} changed nodes, {} affected components out of {}",
        changed_nodes,
        num_affected,
        num_components
    );

    AffectedComponents {
        indices: indices.into_boxed_slice(),
        num_affected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::vec_graph::VecGraph;
    use crate::transform::transpose;
    use dsi_progress_logger::no_logging;

    fn affected(old: &VecGraph, new: &VecGraph) -> AffectedComponents {
        let decomposition = Decomposition::new(old, no_logging![]);
        affected_components(old, &transpose(old), new, &transpose(new), &decomposition)
    }

    #[test]
    fn test_unchanged() {
        let graph = VecGraph::from_arcs([(0, 1), (1, 0), (1, 2)]);
        let affected = affected(&graph, &graph);
        assert_eq!(affected.num_affected(), 0);
        assert_eq!(affected.unaffected().len(), 2);
    }

    #[test]
    fn test_reachability() {
        // 0 → 1 → 2 → 3, 4 → 3
        let old = VecGraph::from_arcs([(0, 1), (1, 2), (2, 3), (4, 3)]);
        let mut new = old.clone();
        new.add_arc(4, 1);
        let affected = affected(&old, &new);
        let decomposition = Decomposition::new(&old, no_logging![]);
        let components = decomposition.sccs().components();
        // 1 gains a predecessor, and 3 loses part of the rank of 4
        let mut nodes = (0..5)
            .filter(|&node| affected.affected().contains(&components[node]))
            .collect::<Vec<_>>();
        nodes.sort_unstable();
        assert_eq!(nodes, vec![1, 2, 3]);
        assert_eq!(affected.indices().len(), 5);
    }

    #[test]
    fn test_removed_arc() {
        let old = VecGraph::from_arcs([(0, 1), (1, 2), (2, 2)]);
        let mut new = old.clone();
        assert!(new.remove_arc(0, 1));
        // 0 becomes a dead end, and 1 loses a predecessor
        assert_eq!(affected(&old, &new).num_affected(), 3);
    }

    #[test]
    #[should_panic]
    fn test_different_nodes() {
        let old = VecGraph::from_arcs([(0, 1)]);
        let new = VecGraph::from_arcs([(0, 1), (1, 2)]);
        affected(&old, &new);
    }
}
