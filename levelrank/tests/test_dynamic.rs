/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use dsi_progress_logger::no_logging;
use levelrank::prelude::*;

fn options() -> PageRankOptions {
    let mut options = PageRankOptions::default();
    options.tolerance(1E-12);
    options
}

fn l_inf_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Returns a graph made of `k` disjoint directed cycles of length `p`;
/// cycle *i* contains the nodes *ip* . . *ip* + *p*.
fn cycles(k: usize, p: usize) -> VecGraph {
    let mut graph = VecGraph::empty(k * p);
    for i in 0..k {
        for d in 0..p {
            graph.add_arc(i * p + d, i * p + (d + 1) % p);
        }
    }
    graph
}

#[test]
fn test_unchanged_graph() -> Result<()> {
    let graph = ErdosRenyi::new(100, 0.02, 0).generate();
    let previous = pagerank_levelwise_from_graph(&graph, None, &options(), None);

    let decomposition = Decomposition::new(&graph, no_logging![]);
    let transpose = transpose(&graph);
    assert!(dynamic_levelwise_plan(&graph, &transpose, &graph, &transpose, &decomposition).is_none());

    let result = pagerank_levelwise_dynamic_from_graphs(
        &graph,
        &graph,
        Some(previous.ranks()),
        &options(),
        Some(&decomposition),
    );
    assert_eq!(result.ranks(), previous.ranks());
    assert_eq!(result.iterations(), 0);
    Ok(())
}

#[test]
fn test_arc_between_components() -> Result<()> {
    let (k, p) = (100, 10);
    let old = cycles(k, p);
    let previous = pagerank_levelwise_from_graph(&old, None, &options(), None);

    // Connect cycle 3 to cycle 7
    let mut new = old.clone();
    assert!(new.add_arc(3 * p, 7 * p));

    let decomposition = Decomposition::new(&old, no_logging![]);
    let plan = dynamic_levelwise_plan(
        &old,
        &transpose(&old),
        &new,
        &transpose(&new),
        &decomposition,
    )
    .unwrap();
    // Cycle 3 changes its outdegree, cycle 7 gains a predecessor
    assert_eq!(plan.num_processed(), 2 * p);
    assert_eq!(plan.num_skipped(), (k - 2) * p);
    assert_eq!(plan.steps().last(), Some(&LevelStep::Skip((k - 2) * p)));

    let result = pagerank_levelwise_dynamic_from_graphs(
        &old,
        &new,
        Some(previous.ranks()),
        &options(),
        Some(&decomposition),
    );

    // Untouched ranks are carried over bit for bit
    for node in (0..k * p).filter(|&node| !(3 * p..4 * p).contains(&node) && !(7 * p..8 * p).contains(&node)) {
        assert_eq!(result.ranks()[node].to_bits(), previous.ranks()[node].to_bits());
    }

    // The result is that of a static computation
    let expected = pagerank_levelwise_from_graph(&new, None, &options(), None);
    assert!(l_inf_distance(result.ranks(), expected.ranks()) < 1E-9);
    assert!(result.ranks()[7 * p] > previous.ranks()[7 * p]);
    Ok(())
}

#[test]
fn test_random_updates() -> Result<()> {
    for seed in 0..5 {
        let old = ErdosRenyi::new(200, 0.006, seed).generate();
        let previous = pagerank_levelwise_from_graph(&old, None, &options(), None);

        let mut new = old.clone();
        let other = ErdosRenyi::new(200, 0.0005, seed + 100).generate();
        for node in 0..200 {
            for succ in other.successors(node) {
                new.add_arc(node, succ);
            }
        }
        // Remove some arcs, too
        for node in (0..200).step_by(37) {
            let succ = old.successors(node).into_iter().next();
            if let Some(succ) = succ {
                new.remove_arc(node, succ);
            }
        }

        let result =
            pagerank_levelwise_dynamic_from_graphs(&old, &new, Some(previous.ranks()), &options(), None);
        let expected = pagerank_levelwise_from_graph(&new, None, &options(), None);
        let distance = l_inf_distance(result.ranks(), expected.ranks());
        assert!(distance < 1E-9, "seed {seed}: ℓ∞ distance {distance}");
    }
    Ok(())
}

#[test]
fn test_ordered_updates() -> Result<()> {
    let mut ordered = options();
    ordered.update_order(UpdateOrder::Ordered);
    for seed in 0..3 {
        let old = ErdosRenyi::new(200, 0.006, seed).generate();
        let previous = pagerank_levelwise_from_graph(&old, None, &ordered, None);
        let mut new = old.clone();
        new.add_arc(seed as usize, 150 + seed as usize);
        new.add_arc(100, 50);

        let result =
            pagerank_levelwise_dynamic_from_graphs(&old, &new, Some(previous.ranks()), &ordered, None);
        let expected = pagerank_levelwise_from_graph(&new, None, &options(), None);
        let distance = l_inf_distance(result.ranks(), expected.ranks());
        assert!(distance < 1E-9, "seed {seed}: ℓ∞ distance {distance}");
    }
    Ok(())
}

#[test]
fn test_backward_arc() -> Result<()> {
    // 0 → 1 → 2 → 3 → 4: five levels
    let old = VecGraph::from_arcs([(0, 1), (1, 2), (2, 3), (3, 4), (4, 4)]);
    let previous = pagerank_levelwise_from_graph(&old, None, &options(), None);
    // 3 → 1 creates a new component {1, 2, 3}
    let mut new = old.clone();
    new.add_arc(3, 1);

    let decomposition = Decomposition::new(&old, no_logging![]);
    let plan = dynamic_levelwise_plan(
        &old,
        &transpose(&old),
        &new,
        &transpose(&new),
        &decomposition,
    )
    .unwrap();
    // Levels of 1, 2 and 3 are merged, 4 is processed afterwards, 0 is skipped
    assert_eq!(plan.order(), &[1, 2, 3, 4, 0]);
    assert_eq!(
        plan.steps(),
        &[
            LevelStep::Process(3),
            LevelStep::Process(1),
            LevelStep::Skip(1)
        ]
    );

    let result = pagerank_levelwise_dynamic_from_graphs(
        &old,
        &new,
        Some(previous.ranks()),
        &options(),
        Some(&decomposition),
    );
    let expected = pagerank_levelwise_from_graph(&new, None, &options(), None);
    assert!(l_inf_distance(result.ranks(), expected.ranks()) < 1E-9);
    assert_eq!(result.ranks()[0].to_bits(), previous.ranks()[0].to_bits());
    Ok(())
}

#[test]
fn test_all_affected() -> Result<()> {
    // A new arc into the only source affects every node
    let old = VecGraph::from_arcs([(0, 1), (1, 2), (2, 2)]);
    let previous = pagerank_levelwise_from_graph(&old, None, &options(), None);
    let mut new = old.clone();
    new.add_arc(2, 0);

    let decomposition = Decomposition::new(&old, no_logging![]);
    let plan = dynamic_levelwise_plan(
        &old,
        &transpose(&old),
        &new,
        &transpose(&new),
        &decomposition,
    )
    .unwrap();
    // No skip, and a single level as the new graph is strongly connected
    assert_eq!(plan.order(), &[0, 1, 2]);
    assert_eq!(plan.steps(), &[LevelStep::Process(3)]);

    let result = pagerank_levelwise_dynamic_from_graphs(
        &old,
        &new,
        Some(previous.ranks()),
        &options(),
        Some(&decomposition),
    );
    let expected = pagerank_levelwise_from_graph(&new, None, &options(), None);
    assert!(l_inf_distance(result.ranks(), expected.ranks()) < 1E-9);
    Ok(())
}

#[test]
fn test_empty() {
    let graph = VecGraph::empty(0);
    let result = pagerank_levelwise_dynamic_from_graphs(&graph, &graph, None, &options(), None);
    assert!(result.ranks().is_empty());
}

#[cfg_attr(feature = "slow_tests", test)]
#[cfg_attr(not(feature = "slow_tests"), allow(dead_code))]
fn test_large_update() -> Result<()> {
    env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Info)
        .try_init()?;
    let n = 100_000;
    let mut old = ErdosRenyi::new(n, 1.5 / n as f64, 0).generate();
    add_self_loops_to_dead_ends(&mut old);
    let decomposition = Decomposition::new(&old, no_logging![]);
    let previous = pagerank_levelwise_from_graph(&old, None, &options(), Some(&decomposition));

    let mut new = old.clone();
    for node in (0..n).step_by(10_007) {
        new.add_arc(node, (node * 7 + 1) % n);
    }
    let result = pagerank_levelwise_dynamic_from_graphs(
        &old,
        &new,
        Some(previous.ranks()),
        &options(),
        Some(&decomposition),
    );
    let expected = pagerank_levelwise_from_graph(&new, None, &options(), None);
    assert!(l_inf_distance(result.ranks(), expected.ranks()) < 1E-9);
    Ok(())
}
