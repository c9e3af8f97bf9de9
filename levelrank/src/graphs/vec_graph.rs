/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::RandomAccessGraph;

/// A mutable [`RandomAccessGraph`] implementation based on a vector of
/// vectors.
///
/// Successors are kept sorted and without duplicates, so adding an arc that
/// already exists has no effect. This is the natural representation for
/// graphs that change over time: old and new versions of a graph used for
/// [dynamic updates](crate::rank::levelwise::pagerank_levelwise_dynamic) are
/// usually two [`VecGraph`]s, one a modified clone of the other.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VecGraph {
    /// The number of arcs in the graph.
    num_arcs: u64,
    /// For each node, its sorted list of successors.
    succ: Vec<Vec<usize>>,
}

impl VecGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty graph with `n` nodes.
    pub fn empty(n: usize) -> Self {
        Self {
            num_arcs: 0,
            succ: Vec::from_iter((0..n).map(|_| Vec::new())),
        }
    }

    /// Creates a new graph from an iterator of arcs.
    ///
    /// The number of nodes is one plus the largest node appearing in an arc.
    pub fn from_arcs(arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut g = Self::new();
        g.add_arcs(arcs);
        g
    }

    /// Adds an isolated node to the graph and returns true if it is a new
    /// node.
    ///
    /// All nodes with smaller index that do not exist yet are added, too.
    pub fn add_node(&mut self, node: usize) -> bool {
        let len = self.succ.len();
        self.succ.extend((len..=node).map(|_| Vec::new()));
        len <= node
    }

    /// Adds an arc to the graph and returns true if the arc was not already
    /// present.
    ///
    /// # Panics
    ///
    /// This method will panic if one of the given nodes is greater or equal
    /// than the number of nodes in the graph.
    pub fn add_arc(&mut self, u: usize, v: usize) -> bool {
        let max = u.max(v);
        if max >= self.succ.len() {
            panic!(
                "Node {} does not exist (the graph has {} nodes)",
                max,
                self.succ.len(),
            );
        }
        let succ = &mut self.succ[u];
        match succ.binary_search(&v) {
            Ok(_) => false,
            Err(pos) => {
                succ.insert(pos, v);
                self.num_arcs += 1;
                true
            }
        }
    }

    /// Removes an arc from the graph and returns true if the arc was present.
    pub fn remove_arc(&mut self, u: usize, v: usize) -> bool {
        let Some(succ) = self.succ.get_mut(u) else {
            return false;
        };
        match succ.binary_search(&v) {
            Ok(pos) => {
                succ.remove(pos);
                self.num_arcs -= 1;
                true
            }
            Err(_) => false,
        }
    }

    /// Adds arcs from an iterator, adding the necessary nodes.
    pub fn add_arcs(&mut self, arcs: impl IntoIterator<Item = (usize, usize)>) -> &mut Self {
        for (u, v) in arcs {
            self.add_node(u.max(v));
            self.add_arc(u, v);
        }
        self
    }

    /// Returns the sorted successors of a node as a slice.
    pub fn successors_slice(&self, node: usize) -> &[usize] {
        &self.succ[node]
    }

    /// Copies an arbitrary [`RandomAccessGraph`] into a new [`VecGraph`].
    pub fn from_graph(graph: &impl RandomAccessGraph) -> Self {
        let mut g = Self::empty(graph.num_nodes());
        for node in 0..graph.num_nodes() {
            for succ in graph.successors(node) {
                g.add_arc(node, succ);
            }
        }
        g
    }
}

impl RandomAccessGraph for VecGraph {
    type Successors<'succ> = std::iter::Copied<std::slice::Iter<'succ, usize>>;

    #[inline(always)]
    fn num_nodes(&self) -> usize {
        self.succ.len()
    }

    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        self.num_arcs
    }

    #[inline(always)]
    fn successors(&self, node: usize) -> Self::Successors<'_> {
        self.succ[node].iter().copied()
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        self.succ[node].len()
    }

    fn has_arc(&self, src: usize, dst: usize) -> bool {
        self.succ[src].binary_search(&dst).is_ok()
    }
}
