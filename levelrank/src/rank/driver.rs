/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Iteration driver.
//!
//! The driver renumbers the nodes of a graph following an _order_, so that
//! position *i* of every vector it allocates refers to node `order[i]`, and
//! then invokes a _loop_ that executes a plan of [`LevelStep`]s on the
//! renumbered graph. Since each step refers to the next contiguous range of
//! positions, a loop never needs to know about the renumbering.

use super::buffers::RankBuffers;
use super::{DeadEnds, LevelStep, PageRankOptions, PageRankResult, ToleranceScaling, UpdateOrder};
use crate::transform::TransposeWithOutdegrees;
use crate::traits::RandomAccessGraph;
use crate::utils::{gather, invert_permutation, scatter};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// The transpose of a graph renumbered following an order.
///
/// All node identifiers, both those passed to the methods and those returned
/// by [`predecessors`](Self::predecessors), are positions in the order.
#[derive(Debug, Clone)]
pub struct Traversal {
    offsets: Box<[usize]>,
    predecessors: Box<[usize]>,
    outdegrees: Box<[usize]>,
}

impl Traversal {
    /// Renumbers the transpose of a graph following `order`.
    ///
    /// # Panics
    ///
    /// Panics if `order` is not a permutation of the nodes.
    pub fn new(transpose: &TransposeWithOutdegrees, order: &[usize]) -> Self {
        let num_nodes = transpose.num_nodes();
        assert_eq!(
            order.len(),
            num_nodes,
            "The order has {} elements, but the graph has {} nodes",
            order.len(),
            num_nodes
        );
        let position = invert_permutation(order);
        let mut offsets = Vec::with_capacity(num_nodes + 1);
        let mut predecessors = Vec::with_capacity(transpose.num_arcs() as usize);
        offsets.push(0);
        for &node in order {
            predecessors.extend(transpose.successors(node).into_iter().map(|pred| position[pred]));
            offsets.push(predecessors.len());
        }
        Self {
            offsets: offsets.into_boxed_slice(),
            predecessors: predecessors.into_boxed_slice(),
            outdegrees: gather(transpose.outdegrees(), order),
        }
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.outdegrees.len()
    }

    /// Returns the predecessors of the node at the given position.
    #[inline(always)]
    pub fn predecessors(&self, pos: usize) -> &[usize] {
        &self.predecessors[self.offsets[pos]..self.offsets[pos + 1]]
    }

    /// Returns the outdegree in the original graph of the node at the given
    /// position.
    #[inline(always)]
    pub fn outdegree(&self, pos: usize) -> usize {
        self.outdegrees[pos]
    }

    /// Returns whether the node at the given position has no successors.
    #[inline(always)]
    pub fn is_dead_end(&self, pos: usize) -> bool {
        self.outdegrees[pos] == 0
    }

    /// Returns the offsets of the predecessor lists.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Returns whether some node is a dead end.
    pub fn has_dead_ends(&self) -> bool {
        self.outdegrees.par_iter().any(|&d| d == 0)
    }
}

/// The parameters of an iteration, as passed by the driver to loops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationParams {
    /// The number of nodes of the whole graph.
    pub num_nodes: usize,
    /// The damping factor.
    pub alpha: f64,
    /// The global tolerance.
    pub tolerance: f64,
    /// The maximum number of iterations of each pass.
    pub max_iter: usize,
    /// How the tolerance of each pass is derived.
    pub scaling: ToleranceScaling,
    /// How dead ends are handled.
    pub dead_ends: DeadEnds,
    /// How ranks are updated during an iteration.
    pub update_order: UpdateOrder,
}

impl IterationParams {
    /// Returns the parameters of a computation on a graph with `num_nodes` nodes.
    pub fn new(num_nodes: usize, options: &PageRankOptions) -> Self {
        Self {
            num_nodes,
            alpha: options.alpha_value(),
            tolerance: options.tolerance_value(),
            max_iter: options.max_iter_value(),
            scaling: options.scaling_value(),
            dead_ends: options.dead_ends_value(),
            update_order: options.update_order_value(),
        }
    }
}

/// Returns the factor by which the rank of each node is multiplied to obtain
/// the contribution it sends to each of its successors.
fn factors(traversal: &Traversal, alpha: f64, dead_ends: DeadEnds) -> Box<[f64]> {
    (0..traversal.num_nodes())
        .into_par_iter()
        .with_min_len(1024)
        .map(|pos| match traversal.outdegree(pos) {
            0 => match dead_ends {
                // As if there were a loop
                DeadEnds::SelfLoop => alpha,
                DeadEnds::Teleport => 0.0,
            },
            d => alpha / d as f64,
        })
        .collect::<Vec<_>>()
        .into_boxed_slice()
}

/// Runs a PageRank loop on a graph renumbered following an order.
///
/// The driver
/// - renumbers the transpose following `order`;
/// - fills the [rank buffers](RankBuffers) with the initial ranks, if
///   provided, or with the uniform distribution, renumbered;
/// - computes the contribution factors and the initial contributions of all
///   nodes, so that nodes skipped by the plan contribute their initial rank;
/// - invokes `loop_fn` with the buffers, the contributions, the factors, the
///   renumbered transpose, `start` and `plan`, [repeating](PageRankOptions::repeat)
///   the invocation (from the same initial state) as requested;
/// - returns the settled ranks in the original numbering, the number of
///   iterations returned by the last invocation of `loop_fn`, and the mean
///   running time of the invocations.
///
/// # Panics
///
/// Panics if `order` is not a permutation of the nodes, or if the length of
/// the initial ranks is not the number of nodes.
#[allow(clippy::too_many_arguments)]
pub fn run_driver<F>(
    transpose: &TransposeWithOutdegrees,
    order: &[usize],
    start: usize,
    plan: &[LevelStep],
    mut loop_fn: F,
    initial: Option<&[f64]>,
    options: &PageRankOptions,
) -> PageRankResult
where
    F: FnMut(
        &mut RankBuffers,
        &mut [f64],
        &[f64],
        &Traversal,
        usize,
        &[LevelStep],
        &IterationParams,
    ) -> usize,
{
    let num_nodes = transpose.num_nodes();
    let initial = PageRankResult::initial(num_nodes, initial).into_ranks();
    if num_nodes == 0 {
        return PageRankResult::new(initial, 0, Duration::ZERO);
    }
    let planned = plan.iter().map(LevelStep::len).sum::<usize>();
    assert!(
        start + planned <= num_nodes,
        "The plan covers {planned} nodes from position {start}, but the graph has {num_nodes} nodes"
    );

    let traversal = Traversal::new(transpose, order);
    let params = IterationParams::new(num_nodes, options);
    let factors = factors(&traversal, params.alpha, params.dead_ends);
    let initial = gather(&initial, order);
    let initial_contributions = initial
        .par_iter()
        .with_min_len(1024)
        .zip(factors.par_iter())
        .map(|(&rank, &factor)| rank * factor)
        .collect::<Vec<_>>();

    log::info!("Alpha: {}", params.alpha);
    log::info!("Tolerance: {} ({})", params.tolerance, params.scaling);
    log::info!("Dead ends: {}", params.dead_ends);
    log::debug!("Plan: {} steps", plan.len());

    let mut buffers = RankBuffers::new(&initial);
    let mut contributions = initial_contributions.clone();
    let mut iterations = 0;
    let mut elapsed = Duration::ZERO;
    for repetition in 0..options.repeat_value() {
        if repetition > 0 {
            buffers.reset(&initial);
            contributions.copy_from_slice(&initial_contributions);
        }
        let start_time = Instant::now();
        iterations = loop_fn(
            &mut buffers,
            &mut contributions[..],
            &factors[..],
            &traversal,
            start,
            plan,
            &params,
        );
        elapsed += start_time.elapsed();
    }
    let time = elapsed / options.repeat_value() as u32;
    log::info!("Completed in {:?}, {} iterations", time, iterations);

    PageRankResult::new(scatter(buffers.settled(), order), iterations, time)
}
