/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graphs::vec_graph::VecGraph;
use crate::traits::RandomAccessGraph;

/// Returns the dead ends of a graph, that is, the nodes without successors,
/// in increasing order.
pub fn dead_ends(graph: &impl RandomAccessGraph) -> Vec<usize> {
    (0..graph.num_nodes())
        .filter(|&node| graph.outdegree(node) == 0)
        .collect()
}

/// Returns whether a graph has dead ends.
pub fn has_dead_ends(graph: &impl RandomAccessGraph) -> bool {
    (0..graph.num_nodes()).any(|node| graph.outdegree(node) == 0)
}

/// Adds a loop to every dead end of a graph and returns the number of loops
/// added.
///
/// After this transformation the graph has no dead ends, and PageRank with
/// [`DeadEnds::SelfLoop`](crate::rank::DeadEnds::SelfLoop) computed on the
/// original graph coincides with PageRank computed on the transformed one.
pub fn add_self_loops_to_dead_ends(graph: &mut VecGraph) -> usize {
    let dead_ends = dead_ends(graph);
    for &node in &dead_ends {
        graph.add_arc(node, node);
    }
    log::debug!("Added {} loops to dead ends", dead_ends.len());
    dead_ends.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_loops() {
        let mut g = VecGraph::from_arcs([(0, 1), (1, 2)]);
        g.add_node(3);
        assert_eq!(dead_ends(&g), vec![2, 3]);
        assert!(has_dead_ends(&g));
        assert_eq!(add_self_loops_to_dead_ends(&mut g), 2);
        assert!(!has_dead_ends(&g));
        assert!(g.has_arc(2, 2));
        assert_eq!(add_self_loops_to_dead_ends(&mut g), 0);
    }
}
