/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Miscellaneous utilities.

use rayon::prelude::*;

/// Returns the inverse of a permutation.
///
/// # Panics
///
/// Panics if `perm` is not a permutation of [0 . . `perm.len()`).
pub fn invert_permutation(perm: &[usize]) -> Box<[usize]> {
    let mut inv_perm = vec![usize::MAX; perm.len()].into_boxed_slice();
    for (i, &x) in perm.iter().enumerate() {
        assert!(
            x < perm.len() && inv_perm[x] == usize::MAX,
            "Element {x} at position {i} is out of range or duplicated"
        );
        inv_perm[x] = i;
    }
    inv_perm
}

/// Returns `values` permuted so that position *i* of the result contains
/// `values[order[i]]`.
pub fn gather<T: Copy + Send + Sync>(values: &[T], order: &[usize]) -> Box<[T]> {
    order
        .par_iter()
        .with_min_len(1024)
        .map(|&x| values[x])
        .collect::<Vec<_>>()
        .into_boxed_slice()
}

/// Writes the elements of `values` back to their original positions, that
/// is, writes `values[i]` at position `order[i]` of the result.
///
/// This is the inverse operation of [`gather`].
pub fn scatter<T: Copy + Default>(values: &[T], order: &[usize]) -> Box<[T]> {
    assert_eq!(values.len(), order.len());
    let mut result = vec![T::default(); values.len()].into_boxed_slice();
    for (&x, &value) in order.iter().zip(values) {
        result[x] = value;
    }
    result
}
