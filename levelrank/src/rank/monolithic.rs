/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parallel power iteration on a range of nodes.
//!
//! The [step](monolithic_step) of this module is the building block of all
//! strategies: it iterates on a contiguous range of positions of a
//! [renumbered transpose](super::driver::Traversal) until the error between
//! successive approximations is below the tolerance, reading the ranks of
//! nodes outside the range from the settled
//! [rank buffer](super::buffers::RankBuffers).
//!
//! Each iteration is a _Jacobi_ iteration, parallelized with Rayon:
//!
//! 1. the contribution *cᵤ* = *rᵤ* · *fᵤ* of each node *u* of the range is
//!    computed from the settled ranks **r**, where *fᵤ* is α / *d*(*u*);
//! 2. the new rank of each node *v* of the range is computed as
//!    *aᵥ* = τ + ∑_(*u* → *v*) *cᵤ*, where τ is the teleportation term;
//! 3. the error ‖**a** − **r**‖ restricted to the range is computed, and the
//!    roles of the buffers are exchanged unless the computation must stop.
//!
//! If the [update order](UpdateOrder) is [ordered](UpdateOrder::Ordered),
//! each iteration is instead a _Gauss–Seidel_ iteration: ranks and
//! contributions are updated in place in the settled buffer, so a node reads
//! the contributions of nodes already updated in the same iteration, and
//! the roles of the buffers are never exchanged.
//!
//! The teleportation term τ is (1 − α) / *n*, plus, if
//! [dead ends teleport](DeadEnds::Teleport), α / *n* times the rank of all
//! dead ends. If [dead ends have a loop](DeadEnds::SelfLoop), the
//! contribution of a dead end is α *rᵥ*, and it is added to its own rank.
//!
//! The [whole-graph strategy](pagerank_monolithic) is a single step on all
//! nodes.

use super::buffers::RankBuffers;
use super::driver::{IterationParams, Traversal, run_driver};
use super::preds::{MaxIter, PredParams, Tolerance};
use super::{
    DeadEnds, LevelStep, PageRankOptions, PageRankResult, ToleranceScaling, UpdateOrder,
};
use crate::traits::RandomAccessGraph;
use crate::transform::{TransposeWithOutdegrees, transpose_with_outdegrees};
use kahan::KahanSum;
use predicates::prelude::*;
use rayon::prelude::*;
use std::ops::Range;
use sync_cell_slice::SyncSlice;

const MIN_LEN: usize = 1024;

/// Returns the sum of the ranks of dead ends.
fn dead_end_rank(traversal: &Traversal, ranks: &[f64]) -> f64 {
    (0..traversal.num_nodes())
        .into_par_iter()
        .with_min_len(MIN_LEN)
        .filter(|&pos| traversal.is_dead_end(pos))
        .fold(KahanSum::<f64>::new, |sum, pos| sum + ranks[pos])
        .reduce(KahanSum::<f64>::new, |sum0, sum1| sum0 + sum1)
        .sum()
}

/// Returns the teleportation term given the settled ranks.
fn teleport(traversal: &Traversal, ranks: &[f64], params: &IterationParams) -> f64 {
    let inv_n = 1.0 / params.num_nodes as f64;
    match params.dead_ends {
        DeadEnds::SelfLoop => (1.0 - params.alpha) * inv_n,
        DeadEnds::Teleport => {
            (1.0 - params.alpha) * inv_n + params.alpha * inv_n * dead_end_rank(traversal, ranks)
        }
    }
}

/// Returns the rank flowing into the node at position `pos`, given a function
/// returning the contribution of a position.
#[inline(always)]
fn inflow(
    traversal: &Traversal,
    pos: usize,
    self_loops: bool,
    contribution: impl Fn(usize) -> f64,
) -> f64 {
    let mut sigma = KahanSum::<f64>::new();
    for &pred in traversal.predecessors(pos) {
        sigma += contribution(pred);
    }
    if self_loops && traversal.is_dead_end(pos) {
        sigma += contribution(pos);
    }
    sigma.sum()
}

/// Returns the ℓ₁ or ℓ∞ norm of the given differences, depending on
/// `scaling`.
fn error(deltas: impl ParallelIterator<Item = f64>, scaling: ToleranceScaling) -> f64 {
    match scaling {
        ToleranceScaling::LevelProportional => deltas
            .fold(KahanSum::<f64>::new, |sum, delta| sum + delta)
            .reduce(KahanSum::<f64>::new, |sum0, sum1| sum0 + sum1)
            .sum(),
        ToleranceScaling::Global => deltas.reduce(|| 0.0, f64::max),
    }
}

/// Writes new ranks of `range` to the slot being written, reading the
/// settled slot, and returns the error.
fn unordered_iteration(
    buffers: &mut RankBuffers,
    contributions: &mut [f64],
    factors: &[f64],
    traversal: &Traversal,
    range: Range<usize>,
    params: &IterationParams,
) -> f64 {
    let (write, read) = buffers.split();
    let teleport = teleport(traversal, read, params);
    let self_loops = params.dead_ends == DeadEnds::SelfLoop;

    contributions[range.clone()]
        .par_iter_mut()
        .with_min_len(MIN_LEN)
        .zip(read[range.clone()].par_iter())
        .zip(factors[range.clone()].par_iter())
        .for_each(|((c, &rank), &factor)| *c = rank * factor);

    let c = &*contributions;
    let start = range.start;
    write[range.clone()]
        .par_iter_mut()
        .with_min_len(MIN_LEN)
        .enumerate()
        .for_each(|(i, rank)| {
            *rank = teleport + inflow(traversal, start + i, self_loops, |pred| c[pred]);
        });

    error(
        write[range.clone()]
            .par_iter()
            .with_min_len(MIN_LEN)
            .zip(read[range].par_iter())
            .map(|(&new, &old)| (new - old).abs()),
        params.scaling,
    )
}

/// Updates the ranks of `range` in place in the settled slot, and returns
/// the error.
fn ordered_iteration(
    buffers: &mut RankBuffers,
    contributions: &mut [f64],
    factors: &[f64],
    traversal: &Traversal,
    range: Range<usize>,
    params: &IterationParams,
) -> f64 {
    let teleport = teleport(traversal, buffers.settled(), params);
    let self_loops = params.dead_ends == DeadEnds::SelfLoop;
    let ranks = buffers.settled_mut();

    contributions[range.clone()]
        .par_iter_mut()
        .with_min_len(MIN_LEN)
        .zip(ranks[range.clone()].par_iter())
        .zip(factors[range.clone()].par_iter())
        .for_each(|((c, &rank), &factor)| *c = rank * factor);

    let ranks = ranks.as_sync_slice();
    let c = contributions.as_sync_slice();
    error(
        range.into_par_iter().with_min_len(MIN_LEN).map(|pos| {
            // SAFETY: each position is written by a single thread. Reads of
            // contributions of other positions are benign data races
            // (Gauss-Seidel semantics).
            let rank = teleport
                + inflow(traversal, pos, self_loops, |pred| unsafe { c[pred].get() });
            unsafe {
                let delta = (rank - ranks[pos].get()).abs();
                ranks[pos].set(rank);
                c[pos].set(rank * factors[pos]);
                delta
            }
        }),
        params.scaling,
    )
}

/// Iterates on `count` positions starting at `start` until convergence, and
/// returns the number of iterations performed.
///
/// The computation stops when the error is below `params.tolerance` (the
/// error is the ℓ₁ norm of the difference between successive approximations
/// if `params.scaling` is [`ToleranceScaling::LevelProportional`], the ℓ∞
/// norm otherwise), or when `params.max_iter` iterations have been performed.
/// If `params.max_iter` is zero, or the range is empty, nothing is done.
///
/// Iterations are [unordered or ordered](UpdateOrder) depending on
/// `params.update_order`.
///
/// On return, both slots of `buffers` contain the final ranks of the range,
/// and `contributions` contains the corresponding contributions.
pub fn monolithic_step(
    buffers: &mut RankBuffers,
    contributions: &mut [f64],
    factors: &[f64],
    traversal: &Traversal,
    start: usize,
    count: usize,
    params: &IterationParams,
) -> usize {
    if count == 0 || params.max_iter == 0 {
        return 0;
    }
    let range = start..start + count;
    let predicate = Tolerance::new_unchecked(params.tolerance).or(MaxIter::from(params.max_iter));
    let mut iteration = 0;

    loop {
        let error = match params.update_order {
            UpdateOrder::Unordered => unordered_iteration(
                buffers,
                contributions,
                factors,
                traversal,
                range.clone(),
                params,
            ),
            UpdateOrder::Ordered => ordered_iteration(
                buffers,
                contributions,
                factors,
                traversal,
                range.clone(),
                params,
            ),
        };

        iteration += 1;
        log::trace!("Iteration {iteration} on [{start} . . {}): error {error}", start + count);
        if predicate.eval(&PredParams { iteration, error }) {
            break;
        }
        if params.update_order == UpdateOrder::Unordered {
            buffers.swap_roles();
        }
    }

    match params.update_order {
        UpdateOrder::Unordered => buffers.settle(range, contributions, factors),
        UpdateOrder::Ordered => buffers.settle_in_place(range),
    }
    iteration
}

/// Performs a single [step](monolithic_step) on all the nodes covered by
/// `plan` starting at `start`, disregarding the subdivision of the plan.
///
/// This is the loop of the [whole-graph strategy](pagerank_monolithic).
pub fn monolithic_loop(
    buffers: &mut RankBuffers,
    contributions: &mut [f64],
    factors: &[f64],
    traversal: &Traversal,
    start: usize,
    plan: &[LevelStep],
    params: &IterationParams,
) -> usize {
    let count = plan.iter().map(LevelStep::len).sum();
    monolithic_step(
        buffers,
        contributions,
        factors,
        traversal,
        start,
        count,
        params,
    )
}

/// Computes PageRank by iterating on all nodes at once.
///
/// This strategy supports all [dead-end policies](DeadEnds), and in
/// particular it is the strategy to use for graphs with dead ends whose rank
/// must [teleport](DeadEnds::Teleport).
///
/// # Examples
///
/// ```
/// use levelrank::prelude::*;
///
/// // 2 is a dead end
/// let graph = VecGraph::from_arcs([(0, 1), (1, 0), (1, 2)]);
/// let transpose = transpose_with_outdegrees(&graph);
/// let mut options = PageRankOptions::default();
/// options.tolerance(1E-10).dead_ends(DeadEnds::Teleport);
/// let result = pagerank_monolithic(&transpose, None, &options);
/// assert!((result.ranks().iter().sum::<f64>() - 1.0).abs() < 1E-6);
/// ```
pub fn pagerank_monolithic(
    transpose: &TransposeWithOutdegrees,
    initial: Option<&[f64]>,
    options: &PageRankOptions,
) -> PageRankResult {
    let num_nodes = transpose.num_nodes();
    if num_nodes == 0 {
        return PageRankResult::initial(0, initial);
    }
    let order = (0..num_nodes).collect::<Vec<_>>();
    run_driver(
        transpose,
        &order,
        0,
        &[LevelStep::Process(num_nodes)],
        monolithic_loop,
        initial,
        options,
    )
}

/// Computes PageRank by iterating on all nodes at once, building the
/// transpose of the graph.
pub fn pagerank_monolithic_from_graph(
    graph: &impl RandomAccessGraph,
    initial: Option<&[f64]>,
    options: &PageRankOptions,
) -> PageRankResult {
    pagerank_monolithic(&transpose_with_outdegrees(graph), initial, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::vec_graph::VecGraph;

    fn options() -> PageRankOptions {
        let mut options = PageRankOptions::default();
        options.tolerance(1E-12);
        options
    }

    #[test]
    fn test_cycle() {
        let graph = VecGraph::from_arcs([(0, 1), (1, 2), (2, 0)]);
        let result = pagerank_monolithic_from_graph(&graph, None, &options());
        for &rank in result.ranks() {
            assert!((rank - 1.0 / 3.0).abs() < 1E-12);
        }
        // The uniform distribution is already the fixed point
        assert_eq!(result.iterations(), 1);
    }

    #[test]
    fn test_teleport() {
        // 0 → 1, 1 is a dead end. With uniform redistribution, the fixed
        // point is r₀ = (1 − α)/2 + α r₁/2, r₁ = (1 − α)/2 + α (r₀ + r₁/2).
        let graph = VecGraph::from_arcs([(0, 1)]);
        let mut options = options();
        options.dead_ends(DeadEnds::Teleport);
        let result = pagerank_monolithic_from_graph(&graph, None, &options);
        let alpha = 0.85;
        let r0 = 1.0 / (2.0 + alpha);
        assert!((result.ranks()[0] - r0).abs() < 1E-9);
        assert!((result.ranks()[1] - (1.0 - r0)).abs() < 1E-9);
    }

    #[test]
    fn test_ordered_teleport() {
        let graph = VecGraph::from_arcs([(0, 1)]);
        let mut options = options();
        options
            .dead_ends(DeadEnds::Teleport)
            .update_order(UpdateOrder::Ordered);
        let result = pagerank_monolithic_from_graph(&graph, None, &options);
        let r0 = 1.0 / (2.0 + 0.85);
        assert!((result.ranks()[0] - r0).abs() < 1E-9);
        assert!((result.ranks()[1] - (1.0 - r0)).abs() < 1E-9);
    }

    #[test]
    fn test_ordered_sweep() {
        // 0 → 1 → 2 ⇄ 3: after one ordered sweep 0 and 1 are final
        let graph = VecGraph::from_arcs([(0, 1), (1, 2), (2, 3), (3, 2)]);
        let mut options = options();
        options.update_order(UpdateOrder::Ordered).max_iter(1);
        let result = pagerank_monolithic_from_graph(&graph, None, &options);
        let a = 0.15 / 4.0;
        assert_eq!(result.iterations(), 1);
        assert!((result.ranks()[0] - a).abs() < 1E-15);
        assert!((result.ranks()[1] - (a + 0.85 * a)).abs() < 1E-15);
    }

    #[test]
    fn test_max_iter() {
        let graph = VecGraph::from_arcs([(0, 1), (1, 2), (2, 0), (0, 2)]);
        let mut options = options();
        options.max_iter(2);
        let result = pagerank_monolithic_from_graph(&graph, None, &options);
        assert_eq!(result.iterations(), 2);
        options.max_iter(0);
        let result = pagerank_monolithic_from_graph(&graph, None, &options);
        assert_eq!(result.iterations(), 0);
        assert_eq!(result.ranks(), &[1.0 / 3.0; 3]);
    }

    #[test]
    fn test_empty() {
        let graph = VecGraph::empty(0);
        let result = pagerank_monolithic_from_graph(&graph, None, &options());
        assert!(result.ranks().is_empty());
    }
}
