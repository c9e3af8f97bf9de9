/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graphs::csr_graph::CsrGraph;
use crate::traits::RandomAccessGraph;

/// Returns the transpose of the provided graph as a [`CsrGraph`].
///
/// The successors of each node of the transpose (i.e., the predecessors of
/// the node in the original graph) are sorted.
pub fn transpose(graph: &impl RandomAccessGraph) -> CsrGraph {
    let num_nodes = graph.num_nodes();
    let mut dcf = vec![0; num_nodes + 1];
    for src in 0..num_nodes {
        for dst in graph.successors(src) {
            dcf[dst + 1] += 1;
        }
    }
    for i in 0..num_nodes {
        dcf[i + 1] += dcf[i];
    }
    let mut pos = dcf.clone();
    let mut preds = vec![0; dcf[num_nodes]];
    // Scanning sources in increasing order yields sorted predecessor lists
    for src in 0..num_nodes {
        for dst in graph.successors(src) {
            preds[pos[dst]] = src;
            pos[dst] += 1;
        }
    }
    CsrGraph::from_parts(dcf.into(), preds.into())
}

/// The transpose of a graph, annotated with the outdegrees of the nodes in
/// the original graph.
///
/// Pull-based PageRank iterates on the predecessors of a node, but it
/// distributes the rank of each predecessor by its outdegree in the original
/// graph, which is not available in the transpose: this structure stores it
/// alongside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransposeWithOutdegrees {
    transpose: CsrGraph,
    outdegrees: Box<[usize]>,
}

impl TransposeWithOutdegrees {
    /// Returns the transpose.
    pub fn transpose(&self) -> &CsrGraph {
        &self.transpose
    }

    /// Returns the outdegree of each node in the original graph.
    pub fn outdegrees(&self) -> &[usize] {
        &self.outdegrees
    }
}

impl RandomAccessGraph for TransposeWithOutdegrees {
    type Successors<'succ> = <CsrGraph as RandomAccessGraph>::Successors<'succ>;

    #[inline(always)]
    fn num_nodes(&self) -> usize {
        self.transpose.num_nodes()
    }

    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        self.transpose.num_arcs()
    }

    #[inline(always)]
    fn successors(&self, node: usize) -> Self::Successors<'_> {
        self.transpose.successors(node)
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        self.transpose.outdegree(node)
    }
}

/// Returns the transpose of the provided graph together with the outdegrees
/// of its nodes.
pub fn transpose_with_outdegrees(graph: &impl RandomAccessGraph) -> TransposeWithOutdegrees {
    let outdegrees = (0..graph.num_nodes())
        .map(|node| graph.outdegree(node))
        .collect();
    TransposeWithOutdegrees {
        transpose: transpose(graph),
        outdegrees,
    }
}

#[cfg(test)]
#[allow(trivial_casts)]
mod tests {
    use super::*;
    use crate::graphs::vec_graph::VecGraph;

    #[test]
    fn test_transpose() {
        let g = VecGraph::from_arcs([(0, 1), (0, 2), (1, 2), (2, 0), (3, 0)]);
        let t = transpose(&g);
        assert_eq!(t.num_nodes(), 4);
        assert_eq!(t.num_arcs(), 5);
        assert_eq!(t.successors_of(0), &[2, 3]);
        assert_eq!(t.successors_of(2), &[0, 1]);
        assert_eq!(t.successors_of(3), &[] as &[usize]);
        // Transposing twice yields the original graph
        assert_eq!(VecGraph::from_graph(&transpose(&t)), g);
    }

    #[test]
    fn test_outdegrees() {
        let g = VecGraph::from_arcs([(0, 1), (0, 2), (1, 2), (2, 0), (3, 0)]);
        let t = transpose_with_outdegrees(&g);
        assert_eq!(t.outdegrees(), &[2, 1, 1, 1]);
        assert_eq!(t.outdegree(0), 2);
    }
}
