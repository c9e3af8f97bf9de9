/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::Sccs;
use crate::traits::RandomAccessGraph;
use dsi_progress_logger::ProgressLog;

const UNVISITED: usize = usize::MAX;

/// Tarjan's algorithm for strongly connected components.
///
/// The visit is iterative, so there is no limit on the depth of the graph.
/// Components are numbered in the order in which they are completed: as a
/// consequence, if there is an arc from component *a* to component *b* ≠ *a*,
/// then *b* < *a*.
pub fn tarjan(graph: impl RandomAccessGraph, pl: &mut impl ProgressLog) -> Sccs {
    let num_nodes = graph.num_nodes();
    pl.item_name("node");
    pl.expected_updates(Some(num_nodes));
    pl.start("Computing strongly connected components...");

    let mut index = vec![UNVISITED; num_nodes];
    let mut low_link = vec![0; num_nodes];
    let mut on_stack = vec![false; num_nodes];
    let mut components = vec![0; num_nodes].into_boxed_slice();
    let mut component_stack = Vec::with_capacity(16);
    let mut visit_stack = Vec::with_capacity(16);
    let mut next_index = 0;
    let mut number_of_components = 0;

    for root in 0..num_nodes {
        if index[root] != UNVISITED {
            continue;
        }
        index[root] = next_index;
        low_link[root] = next_index;
        next_index += 1;
        on_stack[root] = true;
        component_stack.push(root);
        visit_stack.push((root, graph.successors(root).into_iter()));
        pl.light_update();

        while let Some((node, succ)) = visit_stack.last_mut() {
            let node = *node;
            match succ.next() {
                Some(succ) if index[succ] == UNVISITED => {
                    index[succ] = next_index;
                    low_link[succ] = next_index;
                    next_index += 1;
                    on_stack[succ] = true;
                    component_stack.push(succ);
                    visit_stack.push((succ, graph.successors(succ).into_iter()));
                    pl.light_update();
                }
                Some(succ) => {
                    // Arcs to emitted components are ignored
                    if on_stack[succ] {
                        low_link[node] = low_link[node].min(index[succ]);
                    }
                }
                None => {
                    visit_stack.pop();
                    if let Some((parent, _)) = visit_stack.last() {
                        low_link[*parent] = low_link[*parent].min(low_link[node]);
                    }
                    if low_link[node] == index[node] {
                        while let Some(comp_node) = component_stack.pop() {
                            on_stack[comp_node] = false;
                            components[comp_node] = number_of_components;
                            if comp_node == node {
                                break;
                            }
                        }
                        number_of_components += 1;
                    }
                }
            }
        }
    }

    pl.done();
    Sccs::new(number_of_components, components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::vec_graph::VecGraph;
    use dsi_progress_logger::no_logging;

    #[test]
    fn test_cycle_with_tail() {
        let graph = VecGraph::from_arcs([(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)]);
        let sccs = tarjan(&graph, no_logging![]);
        assert_eq!(sccs.num_components(), 3);
        assert_eq!(sccs.components(), &[2, 2, 2, 1, 0]);
    }

    #[test]
    fn test_long_path() {
        // Deep enough to overflow a recursive implementation
        let n = 200_000;
        let graph = VecGraph::from_arcs((0..n - 1).map(|x| (x, x + 1)));
        let sccs = tarjan(&graph, no_logging![]);
        assert_eq!(sccs.num_components(), n);
        assert_eq!(sccs.components()[0], n - 1);
        assert_eq!(sccs.components()[n - 1], 0);
    }
}
