/*
coloring.rs

Copyright 2025 Hervé Quatremain

This file is part of Tribar.

Tribar is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Tribar is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Tribar. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Color assignment: distribute the colorable slots over the selected
//! colors so that each color total is a multiple of 3.
//!
//! The colorable slots are the plain block cells plus the pipe contents.
//! When the slot total itself is not a multiple of 3, a perfect assignment
//! is impossible; the remainder then goes to the **last** selected color,
//! and every other color keeps a multiple of 3. The block count is never
//! adjusted to absorb the remainder.

use log::debug;

use super::board::Color;

/// Compute the per-color slot quotas.
///
/// Each quota is a multiple of 3, except that the division remainder (0, 1,
/// or 2 slots) is added to the last color. With `force_even` the quotas are
/// allocated in groups of 6 so that every quota except possibly the last is
/// even as well; symmetric layouts on even-width boards need this, because
/// there every color paints mirrored cell pairs.
///
/// The quotas always sum to `slots` exactly.
pub fn color_quotas(colors: &[Color], slots: usize, force_even: bool) -> Vec<(Color, usize)> {
    assert!(!colors.is_empty(), "no colors selected");

    let group_size: usize = if force_even { 6 } else { 3 };
    let groups: usize = slots / group_size;
    let remainder: usize = slots - groups * group_size;

    let base: usize = groups / colors.len();
    let extra: usize = groups % colors.len();

    let mut quotas: Vec<(Color, usize)> = colors
        .iter()
        .enumerate()
        .map(|(i, &color)| {
            let g: usize = if i < extra { base + 1 } else { base };
            (color, g * group_size)
        })
        .collect();

    if remainder > 0 {
        let last: &mut (Color, usize) = quotas.last_mut().expect("colors is not empty");
        last.1 += remainder;
        debug!(
            "color quotas: {remainder} remainder slot(s) assigned to {}",
            last.0
        );
    }
    quotas
}

/// Expand quotas into a flat pool of colors, one entry per slot.
///
/// The caller shuffles the pool before painting cells with it.
pub fn color_pool(quotas: &[(Color, usize)]) -> Vec<Color> {
    let mut pool: Vec<Color> = Vec::with_capacity(quotas.iter().map(|q| q.1).sum());
    for &(color, quota) in quotas {
        pool.extend(std::iter::repeat_n(color, quota));
    }
    pool
}

/// Split each color quota into mirrored-pair units and single-slot units.
///
/// A symmetric layout paints mirrored cell pairs with one color decision (2
/// slots), while center-column cells and pipe contents are single slots.
/// `pairs` and `singles` are the available unit counts; their weighted sum
/// must equal the quota total.
///
/// Return `(color, pair_units, single_units)` per color, or None when the
/// quotas cannot be expressed with the available units (for example an odd
/// quota with no single slot left).
pub fn split_quotas_for_symmetry(
    quotas: &[(Color, usize)],
    pairs: usize,
    singles: usize,
) -> Option<Vec<(Color, usize, usize)>> {
    let total: usize = quotas.iter().map(|q| q.1).sum();
    assert_eq!(total, 2 * pairs + singles, "unit total mismatch");

    let mut pairs_left: usize = pairs;
    let mut singles_left: usize = singles;
    let mut split: Vec<(Color, usize, usize)> = Vec::with_capacity(quotas.len());

    // Taking as many pairs as possible preserves the scarcer single slots
    // for the colors that need them for parity.
    for &(color, quota) in quotas {
        let pair_units: usize = pairs_left.min(quota / 2);
        let single_units: usize = quota - 2 * pair_units;
        if single_units > singles_left {
            debug!(
                "symmetric split failed: {color} needs {single_units} singles, {singles_left} left"
            );
            return None;
        }
        pairs_left -= pair_units;
        singles_left -= single_units;
        split.push((color, pair_units, single_units));
    }
    Some(split)
}
