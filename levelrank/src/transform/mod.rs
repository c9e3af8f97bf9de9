/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Transformations from a graph into another graph.

mod dead_ends;
pub use dead_ends::*;

mod transpose;
pub use transpose::*;
