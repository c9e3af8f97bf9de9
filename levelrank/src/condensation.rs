/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Condensation (block) graphs.
//!
//! The condensation of a graph has one node for each strongly connected
//! component, and an arc from component *a* to component *b* ≠ *a* if some
//! node of *a* has a successor in *b*. The condensation is always acyclic.

use crate::graphs::csr_graph::CsrGraph;
use crate::sccs::Sccs;
use crate::traits::RandomAccessGraph;
use dsi_progress_logger::ProgressLog;
use rayon::slice::ParallelSliceMut;

/// Returns the condensation of a graph with respect to its strongly
/// connected components.
///
/// Each arc between components appears once, and the successors of each
/// component are sorted.
pub fn condensation(graph: impl RandomAccessGraph, sccs: &Sccs, pl: &mut impl ProgressLog) -> CsrGraph {
    let num_nodes = graph.num_nodes();
    assert_eq!(
        num_nodes,
        sccs.num_nodes(),
        "The graph has {} nodes, but the components are defined on {} nodes",
        num_nodes,
        sccs.num_nodes()
    );
    let components = sccs.components();

    pl.item_name("node");
    pl.expected_updates(Some(num_nodes));
    pl.start("Computing the condensation...");

    let mut arcs = Vec::new();
    for node in 0..num_nodes {
        let src = components[node];
        for succ in graph.successors(node) {
            let dst = components[succ];
            if src != dst {
                arcs.push((src, dst));
            }
        }
        pl.light_update();
    }
    arcs.par_sort_unstable();
    arcs.dedup();

    pl.done();
    log::debug!(
        "Condensation: {} components, {} arcs",
        sccs.num_components(),
        arcs.len()
    );

    CsrGraph::from_arc_list(sccs.num_components(), &arcs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::vec_graph::VecGraph;
    use crate::sccs::tarjan;
    use dsi_progress_logger::no_logging;

    #[test]
    fn test_condensation() {
        // {0, 1} → {2, 3} → {4}, {0, 1} → {4}
        let graph = VecGraph::from_arcs([(0, 1), (1, 0), (1, 2), (0, 3), (2, 3), (3, 2), (3, 4), (0, 4)]);
        let sccs = tarjan(&graph, no_logging![]);
        assert_eq!(sccs.num_components(), 3);
        let block = condensation(&graph, &sccs, no_logging![]);
        let c = sccs.components();
        assert_eq!(block.num_nodes(), 3);
        assert_eq!(block.num_arcs(), 3);
        assert!(block.has_arc(c[0], c[2]));
        assert!(block.has_arc(c[2], c[4]));
        assert!(block.has_arc(c[0], c[4]));
        for x in 0..3 {
            assert!(!block.has_arc(x, x));
        }
    }
}
