/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */
use crate::{GlobalArgs, create_parent_dir};
use anyhow::{Context, Result, ensure};
use clap::Parser;
use levelrank::prelude::*;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "random")]
/// Generates an Erdős–Rényi random graph and stores it as a list of arcs.
pub struct CliArgs {
    /// The number of nodes.
    pub num_nodes: usize,

    /// The probability of each arc.
    pub p: f64,

    #[arg(long, default_value_t = 0)]
    /// The seed of the pseudorandom number generator.
    pub seed: u64,

    #[arg(short, long)]
    /// Where to store the list of arcs.
    pub output: PathBuf,

    #[arg(long, default_value_t = '\t')]
    /// The column separator.
    pub separator: char,
}

pub fn main(_global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&args.p),
        "The arc probability must be in [0 . . 1], got {}",
        args.p
    );
    let graph = ErdosRenyi::new(args.num_nodes, args.p, args.seed).generate();
    log::info!(
        "Generated a graph with {} nodes and {} arcs",
        graph.num_nodes(),
        graph.num_arcs()
    );

    create_parent_dir(&args.output)?;
    let file = std::fs::File::create(&args.output)
        .with_context(|| format!("Could not create {}", args.output.display()))?;
    let mut file = BufWriter::new(file);
    for node in 0..graph.num_nodes() {
        for &succ in graph.successors_slice(node) {
            writeln!(file, "{node}{}{succ}", args.separator)
                .with_context(|| format!("Could not write to {}", args.output.display()))?;
        }
    }
    file.flush()
        .with_context(|| format!("Could not write to {}", args.output.display()))?;
    Ok(())
}
