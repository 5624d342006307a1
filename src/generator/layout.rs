/*
layout.rs

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

//! Block layout: choose which grid cells become blocks.
//!
//! The random strategy grows a connected region from a random seed cell by
//! claiming random frontier cells, so a disconnected block can never be
//! placed.
//! The symmetric strategy grows only the left half of the board (plus the
//! center column on odd widths), then mirrors the region on the right half.
//! The seed sits on the innermost column, which guarantees that the mirrored
//! halves touch.

use log::debug;
use rand::Rng;

/// 4-directional neighborhood.
const DIRS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Claim exactly `cells_needed` connected cells on a `width` x `height`
/// grid.
///
/// Return the claimed positions, or None when the request cannot be
/// satisfied (more cells than the grid holds).
pub fn random_layout(
    width: usize,
    height: usize,
    cells_needed: usize,
    rng: &mut impl Rng,
) -> Option<Vec<(usize, usize)>> {
    if cells_needed == 0 {
        return Some(Vec::new());
    }
    if cells_needed > width * height {
        return None;
    }

    let mut claimed: Vec<Vec<bool>> = vec![vec![false; width]; height];
    let mut positions: Vec<(usize, usize)> = Vec::with_capacity(cells_needed);
    let mut frontier: Vec<(usize, usize)> = Vec::new();

    let seed: (usize, usize) = (rng.random_range(0..width), rng.random_range(0..height));
    debug!("random layout: seed = {seed:?}, cells needed = {cells_needed}");
    claim(seed, width, height, &mut claimed, &mut positions, &mut frontier);

    while positions.len() < cells_needed {
        if frontier.is_empty() {
            // The connected region filled every reachable cell. With a
            // single region growing on an empty grid this cannot trigger
            // before the whole grid is claimed.
            debug!("random layout: frontier exhausted at {} cells", positions.len());
            return None;
        }
        let i: usize = rng.random_range(0..frontier.len());
        let candidate: (usize, usize) = frontier.swap_remove(i);
        if claimed[candidate.1][candidate.0] {
            continue;
        }
        claim(candidate, width, height, &mut claimed, &mut positions, &mut frontier);
    }
    Some(positions)
}

/// Claim exactly `cells_needed` cells forming a vertically mirrored,
/// connected region.
///
/// Only the left half (plus the center column on odd widths) is grown; the
/// claimed cells are then mirrored across the vertical axis. Off-center
/// cells therefore weigh 2 and center-column cells weigh 1 toward
/// `cells_needed`.
///
/// Return None when the exact count cannot be reached: an odd count on an
/// even-width board, a count larger than the grid, or a growth that cannot
/// finish on the center column. The caller is expected to retry.
pub fn symmetric_layout(
    width: usize,
    height: usize,
    cells_needed: usize,
    rng: &mut impl Rng,
) -> Option<Vec<(usize, usize)>> {
    if cells_needed == 0 {
        return Some(Vec::new());
    }
    if cells_needed > width * height {
        return None;
    }

    let half_width: usize = width.div_ceil(2);
    let has_center: bool = width % 2 == 1;
    let center_x: usize = width / 2;

    if !has_center && cells_needed % 2 == 1 {
        debug!("symmetric layout: odd cell count on an even-width board");
        return None;
    }

    let mut claimed: Vec<Vec<bool>> = vec![vec![false; half_width]; height];
    let mut left: Vec<(usize, usize)> = Vec::new();
    let mut frontier: Vec<(usize, usize)> = Vec::new();
    let mut weight: usize = 0;

    let cell_weight = |x: usize| -> usize {
        if has_center && x == center_x { 1 } else { 2 }
    };

    // Seed on the innermost column so that the mirrored halves always touch:
    // the center column is its own mirror, and on even widths the mirror of
    // column width/2 - 1 is the horizontally adjacent column width/2.
    let seed: (usize, usize) = (half_width - 1, rng.random_range(0..height));
    debug!("symmetric layout: seed = {seed:?}, cells needed = {cells_needed}");
    weight += cell_weight(seed.0);
    claim(seed, half_width, height, &mut claimed, &mut left, &mut frontier);
    if weight > cells_needed {
        return None;
    }

    while weight < cells_needed {
        let remaining: usize = cells_needed - weight;
        // With one cell left to claim, only a center-column cell fits.
        let candidates: Vec<usize> = frontier
            .iter()
            .enumerate()
            .filter(|&(_, &(x, y))| !claimed[y][x] && cell_weight(x) <= remaining)
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            debug!("symmetric layout: no eligible frontier cell with {remaining} remaining");
            return None;
        }
        let i: usize = candidates[rng.random_range(0..candidates.len())];
        let candidate: (usize, usize) = frontier.swap_remove(i);
        weight += cell_weight(candidate.0);
        claim(candidate, half_width, height, &mut claimed, &mut left, &mut frontier);
    }

    // Mirror the left half on the right half.
    let mut positions: Vec<(usize, usize)> = Vec::with_capacity(cells_needed);
    for &(x, y) in &left {
        positions.push((x, y));
        let mirror_x: usize = width - 1 - x;
        if mirror_x != x {
            positions.push((mirror_x, y));
        }
    }
    Some(positions)
}

/// Claim a cell and push its unclaimed neighbors on the frontier.
fn claim(
    cell: (usize, usize),
    width: usize,
    height: usize,
    claimed: &mut [Vec<bool>],
    positions: &mut Vec<(usize, usize)>,
    frontier: &mut Vec<(usize, usize)>,
) {
    claimed[cell.1][cell.0] = true;
    positions.push(cell);
    for (dx, dy) in DIRS {
        let nx: isize = cell.0 as isize + dx;
        let ny: isize = cell.1 as isize + dy;
        if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
            continue;
        }
        if !claimed[ny as usize][nx as usize] {
            frontier.push((nx as usize, ny as usize));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::board::{Board, Cell, Color};
    use crate::generator::connectivity::is_single_component;

    fn board_with_blocks(width: usize, height: usize, positions: &[(usize, usize)]) -> Board {
        let mut board: Board = Board::new(width, height);
        for &(x, y) in positions {
            board.set(x, y, Cell::block(Color::Red));
        }
        board
    }

    #[test]
    fn random_layout_claims_the_exact_count_connected() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let positions: Vec<(usize, usize)> =
                random_layout(9, 10, 27, &mut rng).expect("layout must succeed");
            assert_eq!(positions.len(), 27);
            let board: Board = board_with_blocks(9, 10, &positions);
            assert_eq!(board.num_blocks(), 27);
            assert!(is_single_component(&board));
        }
    }

    #[test]
    fn random_layout_can_fill_the_whole_grid() {
        let mut rng = rand::rng();
        let positions: Vec<(usize, usize)> = random_layout(4, 4, 16, &mut rng).unwrap();
        assert_eq!(positions.len(), 16);
    }

    #[test]
    fn random_layout_rejects_an_oversized_request() {
        let mut rng = rand::rng();
        assert!(random_layout(3, 3, 10, &mut rng).is_none());
    }

    /// A single growth attempt may legitimately fail; retry as the engine
    /// does.
    fn symmetric_with_retries(
        width: usize,
        height: usize,
        cells: usize,
        rng: &mut impl rand::Rng,
    ) -> Option<Vec<(usize, usize)>> {
        (0..40).find_map(|_| symmetric_layout(width, height, cells, rng))
    }

    #[test]
    fn symmetric_layout_is_mirrored_and_connected() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let positions: Vec<(usize, usize)> = symmetric_with_retries(9, 10, 27, &mut rng)
                .expect("symmetric layout must succeed on an odd width");
            assert_eq!(positions.len(), 27);
            let board: Board = board_with_blocks(9, 10, &positions);
            assert!(is_single_component(&board));
            for y in 0..10 {
                for x in 0..4 {
                    assert_eq!(
                        board.get(x, y).kind,
                        board.get(8 - x, y).kind,
                        "mirror mismatch at ({x}, {y})"
                    );
                }
            }
        }
    }

    #[test]
    fn symmetric_layout_even_width_needs_an_even_count() {
        let mut rng = rand::rng();
        assert!(symmetric_layout(8, 8, 27, &mut rng).is_none());
        let positions: Vec<(usize, usize)> = symmetric_with_retries(8, 8, 26, &mut rng).unwrap();
        assert_eq!(positions.len(), 26);
        let board: Board = board_with_blocks(8, 8, &positions);
        assert!(is_single_component(&board));
    }
}
