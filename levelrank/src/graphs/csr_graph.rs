/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::RandomAccessGraph;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// An immutable compressed sparse-row graph.
///
/// It is a graph representation that stores the degree-cumulative function
/// (DCF) and the successors in two boxed slices. The DCF is a sequence of
/// offsets that indicates the start of the successors of each node in the
/// graph, so the successors of node *x* are `successors[dcf[x]..dcf[x + 1]]`.
///
/// The raw slices are available through [`dcf`](CsrGraph::dcf) and
/// [`successors_slice`](CsrGraph::successors_slice): parallel algorithms
/// access them directly.
pub struct CsrGraph {
    dcf: Box<[usize]>,
    successors: Box<[usize]>,
}

impl core::default::Default for CsrGraph {
    fn default() -> Self {
        Self {
            dcf: vec![0].into(),
            successors: vec![].into(),
        }
    }
}

impl CsrGraph {
    /// Creates an empty CSR graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new CSR graph from the given degree-cumulative function and
    /// successors.
    ///
    /// # Panics
    ///
    /// Panics if the degree-cumulative function is empty, is not monotone, or
    /// is not coherent with the successors.
    pub fn from_parts(dcf: Box<[usize]>, successors: Box<[usize]>) -> Self {
        assert!(!dcf.is_empty(), "The degree-cumulative function is empty");
        assert_eq!(dcf[0], 0, "The degree-cumulative function must start at 0");
        assert!(
            dcf.windows(2).all(|w| w[0] <= w[1]),
            "The degree-cumulative function is not monotone"
        );
        assert_eq!(
            dcf[dcf.len() - 1],
            successors.len(),
            "The degree-cumulative function is not coherent with the successors"
        );
        Self { dcf, successors }
    }

    /// Creates a new CSR graph from a [`RandomAccessGraph`].
    pub fn from_graph(graph: &impl RandomAccessGraph) -> Self {
        let num_nodes = graph.num_nodes();
        let mut dcf = Vec::with_capacity(num_nodes + 1);
        dcf.push(0);
        let mut successors = Vec::with_capacity(graph.num_arcs() as usize);
        for node in 0..num_nodes {
            successors.extend(graph.successors(node));
            dcf.push(successors.len());
        }
        Self {
            dcf: dcf.into(),
            successors: successors.into(),
        }
    }

    /// Creates a new CSR graph with `num_nodes` nodes from a list of arcs.
    ///
    /// Arcs are bucketed by source with a counting sort, so successors of a
    /// node appear in the order in which they are listed. Duplicates are not
    /// removed.
    pub fn from_arc_list(num_nodes: usize, arcs: &[(usize, usize)]) -> Self {
        let mut dcf = vec![0; num_nodes + 1];
        for &(src, _) in arcs {
            dcf[src + 1] += 1;
        }
        for i in 0..num_nodes {
            dcf[i + 1] += dcf[i];
        }
        let mut pos = dcf.clone();
        let mut successors = vec![0; arcs.len()];
        for &(src, dst) in arcs {
            successors[pos[src]] = dst;
            pos[src] += 1;
        }
        Self {
            dcf: dcf.into(),
            successors: successors.into(),
        }
    }

    /// Returns the degree-cumulative function.
    pub fn dcf(&self) -> &[usize] {
        &self.dcf
    }

    /// Returns the concatenation of the successor lists of all nodes.
    pub fn successors_slice(&self) -> &[usize] {
        &self.successors
    }

    /// Returns the successors of a node as a slice.
    #[inline(always)]
    pub fn successors_of(&self, node: usize) -> &[usize] {
        &self.successors[self.dcf[node]..self.dcf[node + 1]]
    }

    pub fn into_inner(self) -> (Box<[usize]>, Box<[usize]>) {
        (self.dcf, self.successors)
    }
}

impl RandomAccessGraph for CsrGraph {
    type Successors<'succ> = std::iter::Copied<std::slice::Iter<'succ, usize>>;

    #[inline(always)]
    fn num_nodes(&self) -> usize {
        self.dcf.len() - 1
    }

    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        self.successors.len() as u64
    }

    #[inline(always)]
    fn successors(&self, node: usize) -> Self::Successors<'_> {
        self.successors_of(node).iter().copied()
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        self.dcf[node + 1] - self.dcf[node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::vec_graph::VecGraph;

    #[test]
    fn test_from_graph() {
        let g = VecGraph::from_arcs([(0, 1), (0, 2), (2, 0), (3, 3)]);
        let csr = CsrGraph::from_graph(&g);
        assert_eq!(csr.num_nodes(), 4);
        assert_eq!(csr.num_arcs(), 4);
        assert_eq!(csr.dcf(), &[0, 2, 2, 3, 4]);
        assert_eq!(csr.successors_of(0), &[1, 2]);
        assert_eq!(csr.outdegree(1), 0);
        assert!(csr.has_arc(3, 3));
    }

    #[test]
    fn test_from_arc_list() {
        let csr = CsrGraph::from_arc_list(3, &[(2, 0), (0, 1), (2, 1)]);
        assert_eq!(csr.dcf(), &[0, 1, 1, 3]);
        assert_eq!(csr.successors_of(2), &[0, 1]);
    }

    #[test]
    fn test_empty() {
        let csr = CsrGraph::new();
        assert_eq!(csr.num_nodes(), 0);
        assert_eq!(csr.num_arcs(), 0);
    }

    #[test]
    #[should_panic]
    fn test_incoherent_parts() {
        CsrGraph::from_parts(vec![0, 2].into(), vec![1].into());
    }
}
