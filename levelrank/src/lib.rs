/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

pub mod condensation;
pub mod decomposition;
pub mod dynamic;
pub mod graphs;
pub mod levels;
pub mod rank;
pub mod sccs;
pub mod traits;
pub mod transform;
pub mod utils;

/// Prelude module to import everything from this crate.
pub mod prelude {
    pub use crate::condensation::condensation;
    pub use crate::decomposition::Decomposition;
    pub use crate::dynamic::{AffectedComponents, affected_components};
    pub use crate::graphs::prelude::*;
    pub use crate::levels::{grouped_by_level, level_indices, num_levels};
    pub use crate::rank::prelude::*;
    pub use crate::sccs::{Sccs, tarjan};
    pub use crate::traits::*;
    pub use crate::transform::*;
}
