/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Double buffering of rank vectors.

use rayon::prelude::*;
use std::ops::Range;

/// Two rank vectors with exchangeable roles.
///
/// At any time one slot is _settled_, and it is read by an iteration, while
/// the other one is written. After each iteration the roles are exchanged
/// using [`swap_roles`](Self::swap_roles), so the values just computed become
/// the input of the next iteration. Both slots have the same length, that
/// is, the number of nodes of the graph.
///
/// When a pass over a range of nodes is complete, [`settle`](Self::settle)
/// copies the final values of the range to both slots, so that later passes
/// read them irrespective of the current roles.
///
/// Ordered (Gauss–Seidel) passes do not exchange roles: they update the
/// settled slot in place through [`settled_mut`](Self::settled_mut), and
/// then propagate the final values with
/// [`settle_in_place`](Self::settle_in_place).
#[derive(Debug, Clone, PartialEq)]
pub struct RankBuffers {
    slots: [Box<[f64]>; 2],
    settled: usize,
}

impl RankBuffers {
    /// Creates buffers whose slots both contain the given values.
    pub fn new(initial: &[f64]) -> Self {
        Self {
            slots: [initial.into(), initial.into()],
            settled: 0,
        }
    }

    /// Resets both slots to the given values.
    ///
    /// # Panics
    ///
    /// Panics if the length of `initial` is not the length of the buffers.
    pub fn reset(&mut self, initial: &[f64]) {
        for slot in &mut self.slots {
            slot.copy_from_slice(initial);
        }
        self.settled = 0;
    }

    pub fn len(&self) -> usize {
        self.slots[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the settled slot.
    pub fn settled(&self) -> &[f64] {
        &self.slots[self.settled]
    }

    /// Returns the settled slot for in-place updates.
    pub fn settled_mut(&mut self) -> &mut [f64] {
        &mut self.slots[self.settled]
    }

    /// Returns the slot being written, followed by the settled slot.
    pub fn split(&mut self) -> (&mut [f64], &[f64]) {
        let [first, second] = &mut self.slots;
        if self.settled == 0 {
            (&mut second[..], &first[..])
        } else {
            (&mut first[..], &second[..])
        }
    }

    /// Exchanges the roles of the two slots.
    pub fn swap_roles(&mut self) {
        self.settled ^= 1;
    }

    /// Copies the values of the nodes in `range` from the slot being written
    /// to the settled slot, and updates their contributions.
    ///
    /// `contributions[v]` is the product of the rank of `v` and `factors[v]`,
    /// that is, the rank that each successor of `v` receives from it.
    pub fn settle(&mut self, range: Range<usize>, contributions: &mut [f64], factors: &[f64]) {
        let (write, read) = self.split_mut();
        let values = &write[range.clone()];
        read[range.clone()].copy_from_slice(values);
        contributions[range.clone()]
            .par_iter_mut()
            .with_min_len(1024)
            .zip(values.par_iter())
            .zip(factors[range].par_iter())
            .for_each(|((c, &value), &factor)| *c = value * factor);
    }

    /// Copies the values of the nodes in `range` from the settled slot to the
    /// slot being written.
    ///
    /// This is the counterpart of [`settle`](Self::settle) for passes that
    /// updated the settled slot in place, and thus already kept the
    /// contributions current.
    pub fn settle_in_place(&mut self, range: Range<usize>) {
        let (write, read) = self.split_mut();
        write[range.clone()].copy_from_slice(&read[range]);
    }

    fn split_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        let [first, second] = &mut self.slots;
        if self.settled == 0 {
            (&mut second[..], &mut first[..])
        } else {
            (&mut first[..], &mut second[..])
        }
    }
}
