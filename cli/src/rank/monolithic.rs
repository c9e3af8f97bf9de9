/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{InitialArgs, OutputArgs, load_graph, store_result};
use crate::{ArcsArgs, GlobalArgs, PageRankArgs, get_thread_pool};
use anyhow::Result;
use clap::Parser;
use levelrank::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "monolithic",
    about = "Computes PageRank iterating on the whole graph at once.",
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
    let initial = args.initial.load(graph.num_nodes())?;

    let result = thread_pool.install(|| {
        let transpose = transpose_with_outdegrees(&graph);
        pagerank_monolithic(&transpose, initial.as_deref(), &options)
    });

    store_result(&result, &args.output)
}
