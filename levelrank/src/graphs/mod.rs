/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Graph implementations.

pub mod csr_graph;
pub mod random;
pub mod vec_graph;

pub mod prelude {
    pub use super::csr_graph::CsrGraph;
    pub use super::random::ErdosRenyi;
    pub use super::vec_graph::VecGraph;
}
