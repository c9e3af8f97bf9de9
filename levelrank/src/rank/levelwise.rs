/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Level-wise PageRank.
//!
//! The rank of a node depends only on the ranks of the nodes that can reach
//! it. Thus, if we [decompose](crate::decomposition::Decomposition) a graph
//! in strongly connected components and arrange the components in
//! [levels](crate::levels), so that all arcs entering a component come from
//! components in previous levels, we can compute the ranks level by level:
//! each level is iterated until convergence, reading the ranks of previous
//! levels, which are already final.
//!
//! The computation is described by a [`LevelPlan`]: an order of the nodes in
//! which the nodes of each level are contiguous, and a sequence of
//! [`LevelStep`]s, one per level. The [loop](levelwise_loop) executes the
//! plan one level at a time, using all available threads _inside_ each
//! level. Levels are never processed in parallel, as each level needs the
//! final ranks of the previous ones.
//!
//! Each level is iterated with the [update order](super::UpdateOrder) of the
//! options: either Jacobi iterations on two buffers, or in-place
//! Gauss–Seidel iterations.
//!
//! # Dynamic graphs
//!
//! When a graph changes, only the ranks of nodes that can be reached from a
//! change may change. The [dynamic entry point](pagerank_levelwise_dynamic)
//! locates the [affected components](crate::dynamic::affected_components)
//! using the decomposition of the old graph, and builds a plan that
//! processes them level by level and [skips](LevelStep::Skip) all other
//! nodes, whose ranks are carried over unchanged from the initial ranks.
//!
//! The levels of the old graph may be invalidated by the new arcs: if a new
//! arc goes from an affected component in a level to an affected component
//! in a previous level, all levels between the two are merged and iterated
//! jointly.
//!
//! # Dead ends
//!
//! Level-wise computation is possible only if rank flows exclusively along
//! arcs, so dead ends must be handled as if they had a
//! [loop](super::DeadEnds::SelfLoop). If the graph has dead ends and they
//! [teleport](super::DeadEnds::Teleport), the loop refuses to run and
//! returns the initial ranks with zero iterations: use the
//! [whole-graph strategy](super::monolithic::pagerank_monolithic) instead.

use super::buffers::RankBuffers;
use super::driver::{IterationParams, Traversal, run_driver};
use super::monolithic::monolithic_step;
use super::{DeadEnds, LevelStep, PageRankOptions, PageRankResult, ToleranceScaling};
use crate::decomposition::Decomposition;
use crate::dynamic::affected_components;
use crate::levels::{grouped_by_level, level_indices};
use crate::traits::RandomAccessGraph;
use crate::transform::{TransposeWithOutdegrees, transpose_with_outdegrees};
use dsi_progress_logger::no_logging;
use itertools::Itertools;
use std::borrow::Cow;

/// Executes a plan level by level, and returns the number of iterations,
/// averaged over the processed levels weighted by their size.
///
/// Each [`Process`](LevelStep::Process) step is a
/// [step](monolithic_step) on the nodes of the level, with the tolerance
/// scaled by the fraction of nodes in the level if `params.scaling` is
/// [`ToleranceScaling::LevelProportional`]; each [`Skip`](LevelStep::Skip)
/// step leaves the ranks of the skipped nodes untouched. The roles of the
/// rank buffers are exchanged after each level.
///
/// If the graph has dead ends and they [teleport](DeadEnds::Teleport),
/// nothing is done and zero is returned.
pub fn levelwise_loop(
    buffers: &mut RankBuffers,
    contributions: &mut [f64],
    factors: &[f64],
    traversal: &Traversal,
    start: usize,
    plan: &[LevelStep],
    params: &IterationParams,
) -> usize {
    if params.dead_ends == DeadEnds::Teleport && traversal.has_dead_ends() {
        log::warn!("Level-wise PageRank does not support teleporting dead ends");
        return 0;
    }

    let num_nodes = params.num_nodes as f64;
    let mut pos = start;
    let mut iterations = 0.0;
    for &step in plan {
        match step {
            LevelStep::Skip(count) => pos += count,
            LevelStep::Process(count) => {
                let tolerance = match params.scaling {
                    ToleranceScaling::LevelProportional => {
                        params.tolerance * count as f64 / num_nodes
                    }
                    ToleranceScaling::Global => params.tolerance,
                };
                let level_params = IterationParams {
                    tolerance,
                    ..*params
                };
                let level_iterations = monolithic_step(
                    buffers,
                    contributions,
                    factors,
                    traversal,
                    pos,
                    count,
                    &level_params,
                );
                log::debug!(
                    "Level of {count} nodes at position {pos}: {level_iterations} iterations"
                );
                iterations += level_iterations as f64 * count as f64 / num_nodes;
                pos += count;
                buffers.swap_roles();
            }
        }
    }
    iterations.round() as usize
}

/// An order of the nodes of a graph, and a plan to execute on the nodes in
/// that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelPlan {
    order: Box<[usize]>,
    steps: Vec<LevelStep>,
}

impl LevelPlan {
    /// Returns the order of the nodes.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Returns the steps of the plan.
    pub fn steps(&self) -> &[LevelStep] {
        &self.steps
    }

    /// Returns the number of nodes processed by the plan.
    pub fn num_processed(&self) -> usize {
        self.steps
            .iter()
            .filter_map(|step| match *step {
                LevelStep::Process(count) => Some(count),
                LevelStep::Skip(_) => None,
            })
            .sum()
    }

    /// Returns the number of nodes skipped by the plan.
    pub fn num_skipped(&self) -> usize {
        self.steps.iter().map(LevelStep::len).sum::<usize>() - self.num_processed()
    }
}

/// Returns the plan processing all levels of a decomposed graph.
///
/// The plan depends only on the decomposition, so the same graph always
/// yields the same plan.
pub fn levelwise_plan(decomposition: &Decomposition) -> LevelPlan {
    let groups = grouped_by_level(
        decomposition.sccs(),
        decomposition.block(),
        decomposition.block_transpose(),
    );
    LevelPlan {
        steps: groups
            .iter()
            .map(|group| LevelStep::Process(group.len()))
            .collect(),
        order: groups.into_iter().flatten().collect(),
    }
}

/// Merges runs of consecutive groups so that no arc goes from a group to a
/// previous one.
///
/// `backward` contains pairs (*i*, *j*), with *i* < *j*, meaning that there
/// is an arc from group *j* to group *i*. Returns the ranges of groups to
/// merge.
fn merge_groups(
    num_groups: usize,
    backward: impl IntoIterator<Item = (usize, usize)>,
) -> Vec<std::ops::Range<usize>> {
    let mut reach = (0..num_groups).collect::<Vec<_>>();
    for (i, j) in backward {
        reach[i] = reach[i].max(j);
    }
    let mut merged = Vec::new();
    let mut first = 0;
    while first < num_groups {
        let mut end = reach[first];
        let mut group = first;
        while group <= end {
            end = end.max(reach[group]);
            group += 1;
        }
        merged.push(first..end + 1);
        first = end + 1;
    }
    merged
}

/// Returns the plan updating the ranks of a graph after a change, or `None`
/// if no rank can change.
///
/// The decomposition must be that of the old graph. The plan processes the
/// [affected components](affected_components), grouped by their level in
/// the old graph (and merging levels as needed, see the
/// [module documentation](self)), and then skips all other nodes.
///
/// # Panics
///
/// Panics if the graphs or the decomposition do not have the same number of
/// nodes.
pub fn dynamic_levelwise_plan(
    old: impl RandomAccessGraph,
    old_transpose: impl RandomAccessGraph,
    new: impl RandomAccessGraph,
    new_transpose: impl RandomAccessGraph,
    decomposition: &Decomposition,
) -> Option<LevelPlan> {
    let affected = affected_components(&old, old_transpose, &new, new_transpose, decomposition);
    if affected.num_affected() == 0 {
        return None;
    }

    let levels = level_indices(decomposition.block(), decomposition.block_transpose());
    let chunks = affected
        .affected()
        .iter()
        .copied()
        .sorted_by_key(|&component| levels[component])
        .chunk_by(|&component| levels[component]);
    let mut groups = Vec::new();
    for (_level, components) in &chunks {
        groups.push(components.collect::<Vec<_>>());
    }

    let num_components = decomposition.sccs().num_components();
    let mut group_of = vec![usize::MAX; num_components];
    for (index, group) in groups.iter().enumerate() {
        for &component in group {
            group_of[component] = index;
        }
    }

    // Arcs of the new graph breaking the order of the groups
    let components = decomposition.sccs().components();
    let mut backward = Vec::new();
    for node in 0..new.num_nodes() {
        let src_group = group_of[components[node]];
        if src_group == usize::MAX {
            continue;
        }
        for succ in new.successors(node) {
            let dst_group = group_of[components[succ]];
            if dst_group != usize::MAX && dst_group < src_group {
                backward.push((dst_group, src_group));
            }
        }
    }
    let merged = merge_groups(groups.len(), backward);
    if merged.len() < groups.len() {
        log::info!(
            "New arcs merged {} levels into {}",
            groups.len(),
            merged.len()
        );
    }

    let members = decomposition.sccs().members();
    let mut order = Vec::with_capacity(new.num_nodes());
    let mut steps = Vec::with_capacity(merged.len() + 1);
    for range in merged {
        let len = order.len();
        for component in groups[range].iter().flatten() {
            order.extend_from_slice(&members[*component]);
        }
        steps.push(LevelStep::Process(order.len() - len));
    }
    let len = order.len();
    for &component in affected.unaffected() {
        order.extend_from_slice(&members[component]);
    }
    if order.len() > len {
        steps.push(LevelStep::Skip(order.len() - len));
    }

    Some(LevelPlan {
        order: order.into_boxed_slice(),
        steps,
    })
}

/// Returns the given decomposition, after checking it, or computes it.
fn decomposition_of<'a>(
    graph: impl RandomAccessGraph,
    decomposition: Option<&'a Decomposition>,
) -> Cow<'a, Decomposition> {
    match decomposition {
        Some(decomposition) => {
            decomposition.check_num_nodes(graph.num_nodes());
            Cow::Borrowed(decomposition)
        }
        None => Cow::Owned(Decomposition::new(graph, no_logging![])),
    }
}

/// Computes PageRank level by level.
///
/// `transpose` must be the [transpose](transpose_with_outdegrees) of
/// `graph`. The ranks are initialized with `initial`, if provided, or with
/// the uniform distribution. If `decomposition` is provided, it must be the
/// decomposition of `graph`, and it will be used instead of computing a new
/// one.
///
/// # Panics
///
/// Panics if the graph, its transpose, the initial ranks and the
/// decomposition do not have the same number of nodes.
pub fn pagerank_levelwise(
    graph: impl RandomAccessGraph,
    transpose: &TransposeWithOutdegrees,
    initial: Option<&[f64]>,
    options: &PageRankOptions,
    decomposition: Option<&Decomposition>,
) -> PageRankResult {
    let num_nodes = transpose.num_nodes();
    assert_eq!(
        graph.num_nodes(),
        num_nodes,
        "The graph has {} nodes, but its transpose has {} nodes",
        graph.num_nodes(),
        num_nodes
    );
    if num_nodes == 0 {
        return PageRankResult::initial(0, initial);
    }

    let decomposition = decomposition_of(graph, decomposition);
    let plan = levelwise_plan(&decomposition);
    log::info!("{} levels", plan.steps().len());
    run_driver(
        transpose,
        plan.order(),
        0,
        plan.steps(),
        levelwise_loop,
        initial,
        options,
    )
}

/// Computes PageRank level by level, building the transpose of the graph.
///
/// See [`pagerank_levelwise`].
pub fn pagerank_levelwise_from_graph(
    graph: &impl RandomAccessGraph,
    initial: Option<&[f64]>,
    options: &PageRankOptions,
    decomposition: Option<&Decomposition>,
) -> PageRankResult {
    pagerank_levelwise(
        graph,
        &transpose_with_outdegrees(graph),
        initial,
        options,
        decomposition,
    )
}

/// Updates PageRank after a change of a graph, recomputing level by level
/// only the ranks that may change.
///
/// `old` and `new` must have the same nodes, `old_transpose` and
/// `new_transpose` must be their [transposes](transpose_with_outdegrees),
/// and `initial` should be the ranks of the old graph: the ranks of all
/// nodes that cannot be reached from a change are copied from `initial`. If
/// `decomposition` is provided, it must be the decomposition of the _old_
/// graph.
///
/// If no rank can change, the initial ranks are returned with zero
/// iterations.
///
/// # Panics
///
/// Panics if the graphs, their transposes, the initial ranks and the
/// decomposition do not have the same number of nodes.
pub fn pagerank_levelwise_dynamic(
    old: impl RandomAccessGraph,
    old_transpose: &TransposeWithOutdegrees,
    new: impl RandomAccessGraph,
    new_transpose: &TransposeWithOutdegrees,
    initial: Option<&[f64]>,
    options: &PageRankOptions,
    decomposition: Option<&Decomposition>,
) -> PageRankResult {
    let num_nodes = new_transpose.num_nodes();
    if num_nodes == 0 {
        return PageRankResult::initial(0, initial);
    }

    let decomposition = decomposition_of(&old, decomposition);
    match dynamic_levelwise_plan(old, old_transpose, new, new_transpose, &decomposition) {
        None => {
            log::info!("No affected components");
            PageRankResult::initial(num_nodes, initial)
        }
        Some(plan) => {
            log::info!(
                "{} nodes to process in {} levels, {} nodes to skip",
                plan.num_processed(),
                plan.steps().len(),
                plan.num_skipped()
            );
            run_driver(
                new_transpose,
                plan.order(),
                0,
                plan.steps(),
                levelwise_loop,
                initial,
                options,
            )
        }
    }
}

/// Updates PageRank after a change of a graph, building the transposes of
/// the graphs.
///
/// See [`pagerank_levelwise_dynamic`].
pub fn pagerank_levelwise_dynamic_from_graphs(
    old: &impl RandomAccessGraph,
    new: &impl RandomAccessGraph,
    initial: Option<&[f64]>,
    options: &PageRankOptions,
    decomposition: Option<&Decomposition>,
) -> PageRankResult {
    pagerank_levelwise_dynamic(
        old,
        &transpose_with_outdegrees(old),
        new,
        &transpose_with_outdegrees(new),
        initial,
        options,
        decomposition,
    )
}
