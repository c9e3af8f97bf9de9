/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{InitialArgs, OutputArgs, load_graph, store_result};
use crate::{ArcsArgs, GlobalArgs, PageRankArgs, get_thread_pool};
use anyhow::{Result, ensure};
use clap::Parser;
use dsi_progress_logger::{ProgressLog, progress_logger};
use levelrank::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dynamic",
    about = "Updates PageRank after a change of a graph, recomputing only the ranks that can change. The initial ranks should be those of the old graph; if missing, they are computed level by level.",
    long_about = None
)]
pub struct CliArgs {
    /// The list of arcs of the graph before the change.
    pub old: PathBuf,

    /// The list of arcs of the graph after the change.
    pub new: PathBuf,

    #[clap(flatten)]
    pub arcs_args: ArcsArgs,

    #[clap(flatten)]
    pub initial: InitialArgs,

    #[clap(flatten)]
    pub pagerank: PageRankArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let options = args.pagerank.options()?;
    let thread_pool = get_thread_pool(args.pagerank.num_threads.num_threads)?;
    let old = load_graph(&global_args, &args.old, &args.arcs_args)?;
    let new = load_graph(&global_args, &args.new, &args.arcs_args)?;
    ensure!(
        old.num_nodes() == new.num_nodes(),
        "The old graph has {} nodes, but the new graph has {} nodes (you can use --num-nodes to add isolated nodes)",
        old.num_nodes(),
        new.num_nodes()
    );
    ensure!(
        options.dead_ends_value() == DeadEnds::SelfLoop
            || !(has_dead_ends(&old) || has_dead_ends(&new)),
        "The graphs have dead ends: dynamic computation requires them to be handled as self loops"
    );
    let initial = args.initial.load(old.num_nodes())?;

    let result = thread_pool.install(|| {
        let mut pl = progress_logger![];
        if let Some(log_interval) = global_args.log_interval {
            pl.log_interval(log_interval);
        }
        let decomposition = Decomposition::new(&old, &mut pl);
        let old_transpose = transpose_with_outdegrees(&old);
        let new_transpose = transpose_with_outdegrees(&new);

        let initial = match initial {
            Some(initial) => initial.into_boxed_slice(),
            None => {
                log::info!("Computing the ranks of the old graph...");
                pagerank_levelwise(&old, &old_transpose, None, &options, Some(&decomposition))
                    .into_ranks()
            }
        };

        pagerank_levelwise_dynamic(
            &old,
            &old_transpose,
            &new,
            &new_transpose,
            Some(&initial[..]),
            &options,
            Some(&decomposition),
        )
    });

    store_result(&result, &args.output)
}
