/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */
use crate::{ArcsArgs, GlobalArgs, IntVectorFormat, load_arcs};
use anyhow::Result;
use clap::Parser;
use dsi_progress_logger::{ProgressLog, progress_logger};
use levelrank::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sccs")]
/// Computes the strongly connected components of a graph given as a list of
/// arcs, and optionally their sizes and the level of each component in the
/// condensation.
pub struct CliArgs {
    /// The list of arcs of the graph.
    pub arcs: PathBuf,

    #[clap(flatten)]
    pub arcs_args: ArcsArgs,

    #[arg(short, long)]
    /// Where to store the component of each node.
    pub output: PathBuf,

    #[arg(short, long)]
    /// Where to store the size of each component.
    pub sizes: Option<PathBuf>,

    #[arg(short, long)]
    /// Where to store the level of each component (the length of a longest
    /// path reaching it in the condensation).
    pub levels: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = IntVectorFormat::Ascii)]
    /// The storage format for components, component sizes and levels.
    pub fmt: IntVectorFormat,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    log::info!("Loading the graph from {}", args.arcs.display());
    let graph = load_arcs(&global_args, &args.arcs, &args.arcs_args)?;

    let mut pl = progress_logger![];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let decomposition = Decomposition::new(&graph, &mut pl);
    let sccs = decomposition.sccs();
    log::info!(
        "Found {} strongly connected components",
        sccs.num_components()
    );

    if let Some(sizes_path) = &args.sizes {
        log::info!("Computing the sizes of the components");
        args.fmt.store(sizes_path, &sccs.compute_sizes())?;
    }

    if let Some(levels_path) = &args.levels {
        let levels = level_indices(decomposition.block(), decomposition.block_transpose());
        log::info!("The condensation has {} levels", num_levels(&levels));
        args.fmt.store(levels_path, &levels)?;
    }

    args.fmt.store(&args.output, sccs.components())
}
