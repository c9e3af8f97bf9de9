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
    name = "levelwise",
    about = "Computes PageRank level by level on the condensation of a graph.",
    long_about = None
)]
pub struct CliArgs {
    /// The list of arcs of the graph.
    pub arcs: PathBuf,

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
    let graph = load_graph(&global_args, &args.arcs, &args.arcs_args)?;
    ensure!(
        options.dead_ends_value() == DeadEnds::SelfLoop || !has_dead_ends(&graph),
        "The graph has dead ends: level-wise computation requires them to be handled as self loops (use the monolithic command to make them teleport)"
    );
    let initial = args.initial.load(graph.num_nodes())?;

    let result = thread_pool.install(|| {
        let mut pl = progress_logger![];
        if let Some(log_interval) = global_args.log_interval {
            pl.log_interval(log_interval);
        }
        let decomposition = Decomposition::new(&graph, &mut pl);
        let transpose = transpose_with_outdegrees(&graph);
        pagerank_levelwise(
            &graph,
            &transpose,
            initial.as_deref(),
            &options,
            Some(&decomposition),
        )
    });

    store_result(&result, &args.output)
}
