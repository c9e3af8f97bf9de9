/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Topological levels of a condensation.
//!
//! The level of a component is the length of the longest path reaching it in
//! the condensation: components without predecessors have level zero, and
//! every other component has level one plus the maximum level of its
//! predecessors. Thus, all predecessors of a component lie in previous
//! levels, and there are no arcs between components of the same level.

use crate::sccs::Sccs;
use crate::traits::RandomAccessGraph;
use std::collections::VecDeque;

/// Returns the level of each node of an acyclic graph, given the graph and
/// its transpose.
///
/// # Panics
///
/// Panics if the graph is not acyclic.
pub fn level_indices(block: impl RandomAccessGraph, block_transpose: impl RandomAccessGraph) -> Box<[usize]> {
    let num_nodes = block.num_nodes();
    assert_eq!(num_nodes, block_transpose.num_nodes());
    let mut levels = vec![0; num_nodes].into_boxed_slice();
    let mut pending = (0..num_nodes)
        .map(|node| block_transpose.outdegree(node))
        .collect::<Vec<_>>();
    let mut queue = (0..num_nodes)
        .filter(|&node| pending[node] == 0)
        .collect::<VecDeque<_>>();
    let mut visited = 0;

    while let Some(node) = queue.pop_front() {
        visited += 1;
        for succ in block.successors(node) {
            levels[succ] = levels[succ].max(levels[node] + 1);
            pending[succ] -= 1;
            if pending[succ] == 0 {
                queue.push_back(succ);
            }
        }
    }

    assert_eq!(visited, num_nodes, "The graph is not acyclic");
    levels
}

/// Returns the number of levels, given the levels of the components.
pub fn num_levels(levels: &[usize]) -> usize {
    levels.iter().max().map_or(0, |&max| max + 1)
}

/// Returns the nodes of a graph grouped by the level of their component, in
/// level order.
///
/// Inside a group, components appear by increasing index, and the nodes of a
/// component appear in increasing order. The output depends only on the
/// graph, so repeated calls yield the same groups.
pub fn grouped_by_level(
    sccs: &Sccs,
    block: impl RandomAccessGraph,
    block_transpose: impl RandomAccessGraph,
) -> Vec<Vec<usize>> {
    let levels = level_indices(block, block_transpose);
    let mut groups = vec![Vec::new(); num_levels(&levels)];
    for (component, members) in sccs.members().into_iter().enumerate() {
        groups[levels[component]].extend(members);
    }
    log::debug!("{} levels", groups.len());
    groups
}
