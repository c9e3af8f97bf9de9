/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::{ArcsArgs, FloatVectorFormat, GlobalArgs};
use anyhow::{Result, ensure};
use clap::{Args, Subcommand};
use levelrank::prelude::*;
use std::path::{Path, PathBuf};

pub mod dynamic;
pub mod levelwise;
pub mod monolithic;

#[derive(Subcommand, Debug)]
#[command(name = "rank")]
/// Computes PageRank.
pub enum SubCommands {
    #[clap(name = "levelwise", visible_alias = "lw")]
    Levelwise(levelwise::CliArgs),
    #[clap(name = "dynamic", visible_alias = "dyn")]
    Dynamic(dynamic::CliArgs),
    #[clap(name = "monolithic", visible_alias = "mono")]
    Monolithic(monolithic::CliArgs),
}

/// Shared CLI arguments for storing a rank vector.
#[derive(Args, Debug)]
pub struct OutputArgs {
    #[arg(short, long)]
    /// Where to store the rank vector.
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = FloatVectorFormat::Ascii)]
    /// The output format for the rank vector.
    pub fmt: FloatVectorFormat,

    #[arg(long)]
    /// Decimal digits for text output formats.
    pub precision: Option<usize>,
}

/// Shared CLI arguments for reading an initial rank vector.
#[derive(Args, Debug)]
pub struct InitialArgs {
    #[arg(long)]
    /// Path to the initial ranks; if missing, the uniform distribution is
    /// used.
    pub initial: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FloatVectorFormat::Ascii)]
    /// The input format of the initial ranks.
    pub initial_fmt: FloatVectorFormat,
}

impl InitialArgs {
    /// Loads the initial ranks, if any, checking that their number matches
    /// the number of nodes.
    pub fn load(&self, num_nodes: usize) -> Result<Option<Vec<f64>>> {
        let Some(path) = &self.initial else {
            return Ok(None);
        };
        let initial = self.initial_fmt.load(path)?;
        ensure!(
            initial.len() == num_nodes,
            "The initial ranks in {} have {} entries, but the graph has {} nodes",
            path.display(),
            initial.len(),
            num_nodes
        );
        Ok(Some(initial))
    }
}

pub(crate) fn load_graph(global_args: &GlobalArgs, path: &Path, args: &ArcsArgs) -> Result<VecGraph> {
    log::info!("Loading the graph from {}", path.display());
    crate::load_arcs(global_args, path, args)
}

pub(crate) fn store_result(result: &PageRankResult, args: &OutputArgs) -> Result<()> {
    log::info!(
        "Completed after {} iterations in {:?}",
        result.iterations(),
        result.time()
    );
    log::info!(
        "Storing the rank vector ({} entries) in {}",
        result.ranks().len(),
        args.output.display()
    );
    args.fmt.store(&args.output, result.ranks(), args.precision)
}

pub fn main(global_args: GlobalArgs, subcommand: SubCommands) -> Result<()> {
    match subcommand {
        SubCommands::Levelwise(args) => levelwise::main(global_args, args),
        SubCommands::Dynamic(args) => dynamic::main(global_args, args),
        SubCommands::Monolithic(args) => monolithic::main(global_args, args),
    }
}
