/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! PageRank computation.
//!
//! All computations in this module are _pull-based_: the rank of a node is
//! computed from the ranks of its predecessors, so they need the transpose of
//! the graph, [annotated](crate::transform::TransposeWithOutdegrees) with the
//! outdegrees of the original graph. Given the damping factor α and *n*
//! nodes, each iteration computes
//!
//! > *aᵥ* = (1 − α) / *n* + ∑_(*u* → *v*) α *rᵤ* / *d*(*u*)
//!
//! from the previous approximation **r**, where *d*(*u*) is the outdegree of
//! *u*. How dead ends (nodes with *d*(*u*) = 0) are handled is selected by
//! [`DeadEnds`].
//!
//! The computation is organized by an [iteration driver](driver) that
//! relabels the nodes following an _order_ and executes a _plan_, that is, a
//! sequence of [`LevelStep`]s, each processing or skipping a contiguous
//! range of nodes in that order. The [level-wise](levelwise) strategy uses an
//! order and a plan derived from the strongly connected components of the
//! graph; the [monolithic](monolithic) strategy processes all nodes at once.

use std::time::Duration;

pub mod buffers;
pub mod driver;
pub mod levelwise;
pub mod monolithic;
pub mod preds;

pub mod prelude {
    pub use super::buffers::RankBuffers;
    pub use super::driver::{IterationParams, Traversal, run_driver};
    pub use super::levelwise::*;
    pub use super::monolithic::{
        monolithic_loop, monolithic_step, pagerank_monolithic, pagerank_monolithic_from_graph,
    };
    pub use super::{
        DeadEnds, LevelStep, PageRankOptions, PageRankResult, ToleranceScaling, UpdateOrder,
    };
}

/// How the convergence tolerance of a pass over a range of nodes is derived
/// from the global tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ToleranceScaling {
    /// The error of a pass over *k* of the *n* nodes is the ℓ₁ norm of the
    /// difference between successive approximations, and the tolerance is
    /// scaled to *E*·*k*/*n*, so that the ℓ₁ errors of all levels add up to
    /// at most *E*. This is the default.
    #[default]
    LevelProportional,
    /// The error of a pass is the ℓ∞ norm of the difference between
    /// successive approximations, which does not depend on the number of
    /// nodes, and the tolerance is *E* for all passes.
    Global,
}

impl std::fmt::Display for ToleranceScaling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToleranceScaling::LevelProportional => f.write_str("level-proportional (ℓ₁)"),
            ToleranceScaling::Global => f.write_str("global (ℓ∞)"),
        }
    }
}

/// How dead ends (nodes without successors) are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeadEnds {
    /// A dead end behaves as if it had a loop, keeping the damped part of
    /// its rank. Mass flows only along arcs, so ranks can be computed level
    /// by level. The result is the same as that obtained by
    /// [adding loops](crate::transform::add_self_loops_to_dead_ends) to dead
    /// ends. This is the default.
    #[default]
    SelfLoop,
    /// The damped rank of dead ends is redistributed uniformly to all nodes.
    /// This couples every node with every dead end, so the
    /// [level-wise](levelwise) strategy refuses to run: use the
    /// [monolithic](monolithic::pagerank_monolithic) strategy instead.
    Teleport,
}

impl std::fmt::Display for DeadEnds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeadEnds::SelfLoop => f.write_str("self loop"),
            DeadEnds::Teleport => f.write_str("teleport"),
        }
    }
}

/// How the ranks of a range of nodes are updated during an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateOrder {
    /// Jacobi iteration: all new ranks are computed from the ranks of the
    /// previous iteration, and written to the other rank buffer. The result
    /// does not depend on the number of threads. This is the default.
    #[default]
    Unordered,
    /// Gauss–Seidel iteration: ranks are updated in place, so a node may
    /// read ranks already updated during the same iteration. It usually
    /// needs fewer iterations, but since threads update disjoint ranges
    /// concurrently, which updated ranks are read depends on scheduling.
    Ordered,
}

impl std::fmt::Display for UpdateOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateOrder::Unordered => f.write_str("unordered (Jacobi)"),
            UpdateOrder::Ordered => f.write_str("ordered (Gauss–Seidel)"),
        }
    }
}

/// A step of a level plan.
///
/// A plan is a sequence of steps, each referring to the next contiguous range
/// of nodes in the order used by the [driver](driver::run_driver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelStep {
    /// Iterate the given number of nodes until convergence.
    Process(usize),
    /// Skip the given number of nodes, whose ranks are already correct and
    /// must be left untouched.
    Skip(usize),
}

impl LevelStep {
    /// Returns the number of nodes the step refers to.
    pub fn len(&self) -> usize {
        match *self {
            LevelStep::Process(n) | LevelStep::Skip(n) => n,
        }
    }

    /// Returns true if the step refers to no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Options of a PageRank computation.
///
/// Options are set via chainable setters:
/// ```
/// use levelrank::rank::{PageRankOptions, ToleranceScaling};
///
/// let mut options = PageRankOptions::default();
/// options.alpha(0.9).tolerance(1E-9).scaling(ToleranceScaling::Global);
/// assert_eq!(options.max_iter_value(), PageRankOptions::DEFAULT_MAX_ITER);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRankOptions {
    alpha: f64,
    tolerance: f64,
    max_iter: usize,
    scaling: ToleranceScaling,
    dead_ends: DeadEnds,
    update_order: UpdateOrder,
    repeat: usize,
}

impl Default for PageRankOptions {
    fn default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            tolerance: Self::DEFAULT_TOLERANCE,
            max_iter: Self::DEFAULT_MAX_ITER,
            scaling: ToleranceScaling::default(),
            dead_ends: DeadEnds::default(),
            update_order: UpdateOrder::default(),
            repeat: 1,
        }
    }
}

impl PageRankOptions {
    pub const DEFAULT_ALPHA: f64 = 0.85;
    pub const DEFAULT_TOLERANCE: f64 = 1E-6;
    pub const DEFAULT_MAX_ITER: usize = 500;

    /// Sets the damping factor α.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not in the interval [0 . . 1).
    pub fn alpha(&mut self, alpha: f64) -> &mut Self {
        assert!(
            // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
            (0.0..1.0).contains(&alpha),
            "The damping factor must be in [0 . . 1), got {alpha}"
        );
        self.alpha = alpha;
        self
    }

    /// Sets the global convergence tolerance.
    pub fn tolerance(&mut self, tolerance: f64) -> &mut Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of iterations of each pass.
    pub fn max_iter(&mut self, max_iter: usize) -> &mut Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the [tolerance scaling](ToleranceScaling).
    pub fn scaling(&mut self, scaling: ToleranceScaling) -> &mut Self {
        self.scaling = scaling;
        self
    }

    /// Sets how [dead ends](DeadEnds) are handled.
    pub fn dead_ends(&mut self, dead_ends: DeadEnds) -> &mut Self {
        self.dead_ends = dead_ends;
        self
    }

    /// Sets the [update order](UpdateOrder).
    pub fn update_order(&mut self, update_order: UpdateOrder) -> &mut Self {
        self.update_order = update_order;
        self
    }

    /// Sets how many times the computation is repeated to measure its
    /// running time.
    ///
    /// # Panics
    ///
    /// Panics if `repeat` is zero.
    pub fn repeat(&mut self, repeat: usize) -> &mut Self {
        assert!(repeat > 0, "The number of repetitions must be positive");
        self.repeat = repeat;
        self
    }

    pub fn alpha_value(&self) -> f64 {
        self.alpha
    }

    pub fn tolerance_value(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iter_value(&self) -> usize {
        self.max_iter
    }

    pub fn scaling_value(&self) -> ToleranceScaling {
        self.scaling
    }

    pub fn dead_ends_value(&self) -> DeadEnds {
        self.dead_ends
    }

    pub fn update_order_value(&self) -> UpdateOrder {
        self.update_order
    }

    pub fn repeat_value(&self) -> usize {
        self.repeat
    }
}

/// The result of a PageRank computation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRankResult {
    ranks: Box<[f64]>,
    iterations: usize,
    time: Duration,
}

impl PageRankResult {
    pub fn new(ranks: Box<[f64]>, iterations: usize, time: Duration) -> Self {
        Self {
            ranks,
            iterations,
            time,
        }
    }

    /// Returns the trivial result for a graph with `num_nodes` nodes: the
    /// initial ranks, if provided, or the uniform distribution, with no
    /// iterations and no elapsed time.
    ///
    /// # Panics
    ///
    /// Panics if the length of the initial ranks is not `num_nodes`.
    pub fn initial(num_nodes: usize, initial: Option<&[f64]>) -> Self {
        let ranks = match initial {
            Some(initial) => {
                assert_eq!(
                    initial.len(),
                    num_nodes,
                    "Initial rank vector length ({}) does not match the number of nodes ({num_nodes})",
                    initial.len()
                );
                initial.into()
            }
            None => vec![1.0 / num_nodes as f64; num_nodes].into_boxed_slice(),
        };
        Self::new(ranks, 0, Duration::ZERO)
    }

    /// Returns the rank vector.
    pub fn ranks(&self) -> &[f64] {
        &self.ranks
    }

    /// Returns the number of iterations, averaged over the levels weighted by
    /// their size.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns the time spent iterating (the mean time, if the computation
    /// was repeated).
    pub fn time(&self) -> Duration {
        self.time
    }

    /// Returns the rank vector, consuming the result.
    pub fn into_ranks(self) -> Box<[f64]> {
        self.ranks
    }
}
