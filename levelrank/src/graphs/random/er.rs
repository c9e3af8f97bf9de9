/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graphs::vec_graph::VecGraph;
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Erdös-Rényi random graphs.
///
/// The Erdös-Rényi random graph model is a simple model for generating random
/// graphs. It is parameterized by the number of nodes `n` and the probability
/// `p` of an arc between any two nodes. In this implementation, loops are never
/// included.
///
/// Generation is quadratic in `n`, and it is deterministic for a given seed.
#[derive(Debug, Clone)]
pub struct ErdosRenyi {
    n: usize,
    p: f64,
    seed: u64,
}

impl ErdosRenyi {
    /// Creates a new Erdös-Rényi random graph, given the number of
    /// nodes, the probability of an edge between any two nodes, and a
    /// seed for the [pseudorandom number generator](SmallRng).
    pub fn new(n: usize, p: f64, seed: u64) -> Self {
        assert!((0.0..=1.0).contains(&p), "p must be in [0..1]");
        Self { n, p, seed }
    }

    /// Generates the graph.
    pub fn generate(&self) -> VecGraph {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut g = VecGraph::empty(self.n);
        for x in 0..self.n {
            for y in 0..self.n {
                if x != y && rng.random_bool(self.p) {
                    g.add_arc(x, y);
                }
            }
        }
        g
    }
}

impl From<ErdosRenyi> for VecGraph {
    fn from(er: ErdosRenyi) -> Self {
        er.generate()
    }
}
