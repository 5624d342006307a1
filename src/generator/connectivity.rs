/*
connectivity.rs

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

//! Connectivity analysis over block cells.
//!
//! The engine uses [`is_single_component`] to validate generated layouts.
//! The board editor uses the other functions for drag-based group movement:
//! it discovers the group under the pointer with [`connected_group`], tests
//! a move with [`can_relocate`], applies it with [`relocate`], and snaps a
//! drop near the pointer with [`nearest_valid_offset`].

use log::debug;
use std::collections::VecDeque;

use super::board::{Board, Cell, CellKind};

/// 4-directional neighborhood.
const DIRS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Search radius for [`nearest_valid_offset`].
const MAX_RING_RADIUS: isize = 3;

/// Bounding box of a group of positions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GroupBounds {
    pub min_x: usize,
    pub max_x: usize,
    pub min_y: usize,
    pub max_y: usize,
}

/// Return the 4-connected group of block cells containing `(x, y)`, in
/// breadth-first discovery order.
///
/// Starting from a non-block cell returns an empty group. Out-of-range
/// coordinates are a programmer error and panic.
pub fn connected_group(board: &Board, x: usize, y: usize) -> Vec<(usize, usize)> {
    assert!(
        board.in_bounds(x as isize, y as isize),
        "start position out of range"
    );
    if !board.get(x, y).is_block() {
        return Vec::new();
    }

    let mut visited: Vec<Vec<bool>> = vec![vec![false; board.width()]; board.height()];
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    let mut group: Vec<(usize, usize)> = Vec::new();

    visited[y][x] = true;
    queue.push_back((x, y));
    group.push((x, y));

    while let Some((cx, cy)) = queue.pop_front() {
        for (dx, dy) in DIRS {
            let nx: isize = cx as isize + dx;
            let ny: isize = cy as isize + dy;
            if !board.in_bounds(nx, ny) {
                continue;
            }
            let nxu: usize = nx as usize;
            let nyu: usize = ny as usize;
            if visited[nyu][nxu] || !board.get(nxu, nyu).is_block() {
                continue;
            }
            visited[nyu][nxu] = true;
            queue.push_back((nxu, nyu));
            group.push((nxu, nyu));
        }
    }
    group
}

/// Whether all the block cells on the board form a single 4-connected
/// component.
///
/// A board without any block cell is considered a single component.
pub fn is_single_component(board: &Board) -> bool {
    let blocks: Vec<(usize, usize)> = board.block_positions();
    match blocks.first() {
        Some(&(x, y)) => connected_group(board, x, y).len() == blocks.len(),
        None => true,
    }
}

/// Return the bounding box of the group, or None for an empty group.
pub fn group_bounds(group: &[(usize, usize)]) -> Option<GroupBounds> {
    let first: &(usize, usize) = group.first()?;
    let mut bounds: GroupBounds = GroupBounds {
        min_x: first.0,
        max_x: first.0,
        min_y: first.1,
        max_y: first.1,
    };
    for &(x, y) in group {
        bounds.min_x = bounds.min_x.min(x);
        bounds.max_x = bounds.max_x.max(x);
        bounds.min_y = bounds.min_y.min(y);
        bounds.max_y = bounds.max_y.max(y);
    }
    Some(bounds)
}

/// Whether the group can be translated by `(dx, dy)`.
///
/// Every translated position must stay in bounds and land on a cell that is
/// either empty or part of the moving group itself.
pub fn can_relocate(board: &Board, group: &[(usize, usize)], dx: isize, dy: isize) -> bool {
    for &(x, y) in group {
        let nx: isize = x as isize + dx;
        let ny: isize = y as isize + dy;
        if !board.in_bounds(nx, ny) {
            return false;
        }
        let target: &Cell = board.get(nx as usize, ny as usize);
        if target.kind != CellKind::Empty && !group.contains(&(nx as usize, ny as usize)) {
            return false;
        }
    }
    true
}

/// Return a board with the group translated by `(dx, dy)`.
///
/// The move is all or nothing: when [`can_relocate`] rejects the offset, the
/// returned board is an unmodified clone of the input. Cell payloads
/// (colors and elements) travel with their cells.
pub fn relocate(board: &Board, group: &[(usize, usize)], dx: isize, dy: isize) -> Board {
    let mut moved: Board = board.clone();
    if !can_relocate(board, group, dx, dy) {
        debug!("relocate rejected: offset ({dx}, {dy}) for {} cells", group.len());
        return moved;
    }

    // Save the payloads, clear all the old positions, then place at the new
    // positions. Clearing first keeps overlapping moves correct.
    let cells: Vec<Cell> = group.iter().map(|&(x, y)| board.get(x, y).clone()).collect();
    for &(x, y) in group {
        moved.set(x, y, Cell::empty());
    }
    for (&(x, y), cell) in group.iter().zip(cells) {
        let nx: usize = (x as isize + dx) as usize;
        let ny: usize = (y as isize + dy) as usize;
        moved.set(nx, ny, cell);
    }
    moved
}

/// Find an offset that brings the group near the target position.
///
/// The direct offset, which aligns the top-left corner of the group bounding
/// box with `(target_x, target_y)`, is tried first. When the direct offset
/// is not feasible, square rings of radius 1 to 3 around it are searched,
/// perimeter cells only, and the first feasible offset wins. Return None
/// when nothing within radius 3 is feasible or the group is empty.
pub fn nearest_valid_offset(
    board: &Board,
    group: &[(usize, usize)],
    target_x: usize,
    target_y: usize,
) -> Option<(isize, isize)> {
    let bounds: GroupBounds = group_bounds(group)?;
    let direct_dx: isize = target_x as isize - bounds.min_x as isize;
    let direct_dy: isize = target_y as isize - bounds.min_y as isize;

    if can_relocate(board, group, direct_dx, direct_dy) {
        return Some((direct_dx, direct_dy));
    }

    for radius in 1..=MAX_RING_RADIUS {
        for ry in -radius..=radius {
            for rx in -radius..=radius {
                // Perimeter cells of the ring only
                if rx.abs() != radius && ry.abs() != radius {
                    continue;
                }
                let dx: isize = direct_dx + rx;
                let dy: isize = direct_dy + ry;
                if can_relocate(board, group, dx, dy) {
                    debug!("nearest offset found at ring radius {radius}: ({dx}, {dy})");
                    return Some((dx, dy));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::board::Color;

    /// Build a board from an ASCII sketch: '#' is a block, '.' is empty.
    fn board_from_sketch(rows: &[&str]) -> Board {
        let mut board: Board = Board::new(rows[0].len(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    board.set(x, y, Cell::block(Color::Red));
                }
            }
        }
        board
    }

    #[test]
    fn group_from_non_block_cell_is_empty() {
        let board: Board = board_from_sketch(&["##.", "...", ".##"]);
        assert!(connected_group(&board, 2, 0).is_empty());
    }

    #[test]
    fn group_covers_connected_blocks_only() {
        let board: Board = board_from_sketch(&["##.", "#..", ".##"]);
        let group: Vec<(usize, usize)> = connected_group(&board, 0, 0);
        assert_eq!(group.len(), 3);
        assert!(group.contains(&(0, 0)));
        assert!(group.contains(&(1, 0)));
        assert!(group.contains(&(0, 1)));
    }

    #[test]
    fn single_component_detection() {
        assert!(is_single_component(&board_from_sketch(&["###", ".#.", ".#."])));
        assert!(!is_single_component(&board_from_sketch(&["#..", "...", "..#"])));
        assert!(is_single_component(&board_from_sketch(&["...", "...", "..."])));
    }

    #[test]
    fn bounds_of_a_group() {
        let board: Board = board_from_sketch(&[".#.", ".##", "..."]);
        let group: Vec<(usize, usize)> = connected_group(&board, 1, 0);
        let bounds: GroupBounds = group_bounds(&group).unwrap();
        assert_eq!(bounds.min_x, 1);
        assert_eq!(bounds.max_x, 2);
        assert_eq!(bounds.min_y, 0);
        assert_eq!(bounds.max_y, 1);
        assert!(group_bounds(&[]).is_none());
    }

    #[test]
    fn relocation_feasibility() {
        let board: Board = board_from_sketch(&["##.", "...", "..#"]);
        let group: Vec<(usize, usize)> = connected_group(&board, 0, 0);
        // Down into empty space
        assert!(can_relocate(&board, &group, 0, 1));
        // Out of bounds
        assert!(!can_relocate(&board, &group, -1, 0));
        // Onto the other block
        assert!(!can_relocate(&board, &group, 1, 2));
        // Overlapping itself is fine
        assert!(can_relocate(&board, &group, 1, 0));
    }

    #[test]
    fn relocate_moves_payloads_atomically() {
        let mut board: Board = Board::new(3, 3);
        board.set(0, 0, Cell::block(Color::Red));
        board.set(1, 0, Cell::block(Color::Blue));
        let group: Vec<(usize, usize)> = vec![(0, 0), (1, 0)];

        let moved: Board = relocate(&board, &group, 1, 1);
        assert_eq!(moved.get(0, 0).kind, CellKind::Empty);
        assert_eq!(moved.get(1, 0).kind, CellKind::Empty);
        assert_eq!(moved.get(1, 1).color, Some(Color::Red));
        assert_eq!(moved.get(2, 1).color, Some(Color::Blue));
    }

    #[test]
    fn rejected_relocate_returns_the_board_unchanged() {
        let board: Board = board_from_sketch(&["##.", "...", "..."]);
        let group: Vec<(usize, usize)> = connected_group(&board, 0, 0);
        let moved: Board = relocate(&board, &group, 5, 0);
        assert_eq!(moved, board);
    }

    #[test]
    fn relocate_with_zero_offset_is_a_noop() {
        let board: Board = board_from_sketch(&[".#.", "###", "..."]);
        let group: Vec<(usize, usize)> = connected_group(&board, 1, 0);
        let moved: Board = relocate(&board, &group, 0, 0);
        assert_eq!(moved, board);
    }

    #[test]
    fn nearest_offset_prefers_the_direct_move() {
        let board: Board = board_from_sketch(&["#....", ".....", "....."]);
        let group: Vec<(usize, usize)> = vec![(0, 0)];
        assert_eq!(nearest_valid_offset(&board, &group, 3, 1), Some((3, 1)));
    }

    #[test]
    fn nearest_offset_falls_back_to_a_ring() {
        // Target cell occupied: a radius-1 ring cell must win.
        let board: Board = board_from_sketch(&["#..#.", ".....", "....."]);
        let group: Vec<(usize, usize)> = vec![(0, 0)];
        let offset: (isize, isize) = nearest_valid_offset(&board, &group, 3, 0).unwrap();
        assert_ne!(offset, (3, 0));
        assert!(can_relocate(&board, &group, offset.0, offset.1));
        assert!((offset.0 - 3).abs() <= 1 && offset.1.abs() <= 1);
    }

    #[test]
    fn nearest_offset_gives_up_beyond_radius_three() {
        // The only empty cell, at (1, 0), is outside every ring around the
        // direct offset toward (5, 0), so the search comes up empty.
        let board: Board = board_from_sketch(&[
            "#.#######",
            "#########",
            "#########",
            "#########",
        ]);
        let group: Vec<(usize, usize)> = vec![(0, 0)];
        assert_eq!(nearest_valid_offset(&board, &group, 5, 0), None);
    }
}
