/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use dsi_progress_logger::no_logging;
use levelrank::levels::num_levels;
use levelrank::prelude::*;

/// Returns the nodes reachable from `node`.
fn reachable(graph: &VecGraph, node: usize) -> Vec<bool> {
    let mut seen = vec![false; graph.num_nodes()];
    let mut stack = vec![node];
    seen[node] = true;
    while let Some(node) = stack.pop() {
        for succ in graph.successors(node) {
            if !seen[succ] {
                seen[succ] = true;
                stack.push(succ);
            }
        }
    }
    seen
}

#[test]
fn test_er() -> Result<()> {
    for (n, p) in [(10, 0.1), (50, 0.03), (80, 0.02)] {
        for seed in 0..3 {
            let graph = ErdosRenyi::new(n, p, seed).generate();
            let sccs = tarjan(&graph, no_logging![]);
            let reach = (0..n).map(|node| reachable(&graph, node)).collect::<Vec<_>>();
            for x in 0..n {
                for y in 0..n {
                    assert_eq!(
                        sccs.components()[x] == sccs.components()[y],
                        reach[x][y] && reach[y][x]
                    );
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_condensation() -> Result<()> {
    let graph = ErdosRenyi::new(100, 0.015, 2).generate();
    let sccs = tarjan(&graph, no_logging![]);
    let block = condensation(&graph, &sccs, no_logging![]);
    assert_eq!(block.num_nodes(), sccs.num_components());

    let components = sccs.components();
    for node in 0..100 {
        for succ in graph.successors(node) {
            let (a, b) = (components[node], components[succ]);
            if a != b {
                // Components are numbered in reverse topological order
                assert!(b < a);
                assert!(block.has_arc(a, b));
            }
        }
    }
    for component in 0..block.num_nodes() {
        assert!(!block.has_arc(component, component));
    }

    let levels = level_indices(&block, &transpose(&block));
    assert!(num_levels(&levels) <= sccs.num_components());
    for component in 0..block.num_nodes() {
        for succ in block.successors(component) {
            assert!(levels[succ] > levels[component]);
        }
    }
    Ok(())
}

#[test]
fn test_grouped_by_level() -> Result<()> {
    // 0 ⇄ 1 → 2, 3 → 2, 2 → 4
    let graph = VecGraph::from_arcs([(0, 1), (1, 0), (1, 2), (3, 2), (2, 4)]);
    let decomposition = Decomposition::new(&graph, no_logging![]);
    let groups = grouped_by_level(
        decomposition.sccs(),
        decomposition.block(),
        decomposition.block_transpose(),
    );
    assert_eq!(groups.len(), 3);
    let mut first = groups[0].clone();
    first.sort_unstable();
    assert_eq!(first, vec![0, 1, 3]);
    assert_eq!(groups[1], vec![2]);
    assert_eq!(groups[2], vec![4]);
    Ok(())
}
