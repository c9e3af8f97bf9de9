/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Strongly connected components.
//!
//! Components are computed with [Tarjan's algorithm](tarjan), which is
//! deterministic: the same graph always yields the same numbering of the
//! components.
//!
//! # Examples
//! ```
//! use dsi_progress_logger::no_logging;
//! use levelrank::graphs::vec_graph::VecGraph;
//! use levelrank::sccs::*;
//!
//! let graph = VecGraph::from_arcs([(0, 1), (1, 2), (2, 0), (1, 3)]);
//! let sccs = tarjan(&graph, no_logging![]);
//!
//! assert_eq!(sccs.num_components(), 2);
//! assert_eq!(sccs.compute_sizes(), vec![1, 3].into_boxed_slice());
//! assert_eq!(sccs.members(), vec![vec![3], vec![0, 1, 2]]);
//! ```

mod tarjan;
pub use tarjan::*;

/// Strongly connected components.
///
/// An instance of this structure stores the [index of the
/// component](Sccs::components) of each node. Components are numbered from 0 to
/// [`num_components`](Sccs::num_components).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sccs {
    num_components: usize,
    components: Box<[usize]>,
}

impl Sccs {
    pub fn new(num_components: usize, components: Box<[usize]>) -> Self {
        debug_assert!(components.iter().all(|&c| c < num_components));
        Sccs {
            num_components,
            components,
        }
    }

    /// Returns the number of strongly connected components.
    pub fn num_components(&self) -> usize {
        self.num_components
    }

    /// Returns a slice containing, for each node, the index of the component
    /// it belongs to.
    #[inline(always)]
    pub fn components(&self) -> &[usize] {
        &self.components
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.components.len()
    }

    /// Returns the sizes of all components.
    pub fn compute_sizes(&self) -> Box<[usize]> {
        let mut sizes = vec![0; self.num_components()];
        for &node_component in self.components() {
            sizes[node_component] += 1;
        }
        sizes.into_boxed_slice()
    }

    /// Returns, for each component, the list of its nodes in increasing
    /// order.
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut members = self
            .compute_sizes()
            .iter()
            .map(|&size| Vec::with_capacity(size))
            .collect::<Vec<_>>();
        for (node, &component) in self.components.iter().enumerate() {
            members[component].push(node);
        }
        members
    }
}
