/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Reusable component structure of a graph.

use crate::condensation::condensation;
use crate::graphs::csr_graph::CsrGraph;
use crate::sccs::{Sccs, tarjan};
use crate::traits::RandomAccessGraph;
use crate::transform::transpose;
use dsi_progress_logger::ProgressLog;

/// The strongly connected components of a graph, together with its
/// condensation and the transpose of the condensation.
///
/// Computing this structure is the most expensive preliminary step of
/// level-wise PageRank. It can be built once and passed to several
/// computations on the same graph: for example, to a static computation and
/// then to a [dynamic update](crate::rank::levelwise::pagerank_levelwise_dynamic)
/// whose old graph is the same graph. It must be rebuilt whenever the graph
/// changes structurally.
#[derive(Debug, Clone)]
pub struct Decomposition {
    sccs: Sccs,
    block: CsrGraph,
    block_transpose: CsrGraph,
}

impl Decomposition {
    /// Computes the decomposition of a graph.
    pub fn new(graph: impl RandomAccessGraph, pl: &mut impl ProgressLog) -> Self {
        let sccs = tarjan(&graph, pl);
        let block = condensation(&graph, &sccs, pl);
        let block_transpose = transpose(&block);
        log::info!(
            "{} nodes, {} components, {} arcs between components",
            graph.num_nodes(),
            sccs.num_components(),
            block.num_arcs()
        );
        Self {
            sccs,
            block,
            block_transpose,
        }
    }

    /// Returns the strongly connected components.
    pub fn sccs(&self) -> &Sccs {
        &self.sccs
    }

    /// Returns the condensation.
    pub fn block(&self) -> &CsrGraph {
        &self.block
    }

    /// Returns the transpose of the condensation.
    pub fn block_transpose(&self) -> &CsrGraph {
        &self.block_transpose
    }

    /// Returns the number of nodes of the decomposed graph.
    pub fn num_nodes(&self) -> usize {
        self.sccs.num_nodes()
    }

    /// Checks that this decomposition can describe a graph with the given
    /// number of nodes.
    ///
    /// # Panics
    ///
    /// Panics if the number of nodes differs.
    pub(crate) fn check_num_nodes(&self, num_nodes: usize) {
        assert_eq!(
            self.num_nodes(),
            num_nodes,
            "The decomposition has {} nodes, but the graph has {} nodes",
            self.num_nodes(),
            num_nodes
        );
    }
}
