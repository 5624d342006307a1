/*
elements.rs

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

//! Special element placement.
//!
//! Structural elements (pipe, lock/key, pull pin) claim layout cells and
//! turn them into uncolored structural blocks. They are placed before color
//! assignment, so the colorable cells are known afterwards.
//! Attachment elements (barrel, ice, bomb, moving) decorate plain colored
//! blocks and are placed after color assignment.
//!
//! In symmetric mode structural elements are restricted to the center
//! column: an off-axis uncolored cell would break the mirror rule, because
//! its mirror keeps a color. Attachments keep the cell color and may sit
//! anywhere.

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use super::board::{Board, Cell, CellKind, Direction, Element, ElementKind};
use super::level_config::{GenerationMode, LevelConfig};

/// Largest pull pin corridor.
const MAX_GATE_SIZE: u8 = 3;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum PlacementError {
    /// No eligible position left for an instance of the element kind.
    NoEligiblePosition(ElementKind),
}

/// Place the structural elements on a board whose layout cells are still
/// uncolored blocks.
///
/// `pipe_sizes` holds the content size chosen for each requested pipe; the
/// contents themselves are filled during color assignment.
///
/// # Errors
///
/// Return [`PlacementError::NoEligiblePosition`] naming the first element
/// kind that cannot be placed on this layout. The caller may retry with a
/// fresh layout.
pub fn place_structural(
    board: &mut Board,
    config: &LevelConfig,
    pipe_sizes: &[usize],
    rng: &mut impl Rng,
) -> Result<(), PlacementError> {
    let mut used: HashSet<(usize, usize)> = HashSet::new();
    let mut corridors: HashSet<(usize, usize)> = HashSet::new();

    place_pipes(board, config, pipe_sizes, &mut used, rng)?;
    place_pull_pins(board, config, &mut used, &mut corridors, rng)?;
    place_locks(board, config, &mut used, rng)?;
    Ok(())
}

/// Positions that structural elements may claim.
///
/// In symmetric mode only the center column qualifies; on an even width
/// there is no center column and the list is empty.
fn structural_candidates(
    board: &Board,
    config: &LevelConfig,
    used: &HashSet<(usize, usize)>,
) -> Vec<(usize, usize)> {
    board
        .block_positions()
        .into_iter()
        .filter(|&(x, y)| {
            if used.contains(&(x, y)) || board.get(x, y).element.is_some() {
                return false;
            }
            match config.generation_mode {
                GenerationMode::Random => true,
                GenerationMode::Symmetric => {
                    config.width % 2 == 1 && x == config.width / 2
                }
            }
        })
        .collect()
}

fn place_pipes(
    board: &mut Board,
    config: &LevelConfig,
    pipe_sizes: &[usize],
    used: &mut HashSet<(usize, usize)>,
    rng: &mut impl Rng,
) -> Result<(), PlacementError> {
    for &size in pipe_sizes {
        let mut candidates: Vec<(usize, usize)> = structural_candidates(board, config, used);
        candidates.shuffle(rng);

        let mut placed: bool = false;
        for (x, y) in candidates {
            // The pipe mouth needs an empty in-bounds cell to release into.
            let mut directions: Vec<Direction> = Direction::ALL
                .iter()
                .copied()
                .filter(|d| {
                    let (dx, dy) = d.delta();
                    let nx: isize = x as isize + dx;
                    let ny: isize = y as isize + dy;
                    board.in_bounds(nx, ny)
                        && board.get(nx as usize, ny as usize).kind == CellKind::Empty
                })
                .collect();
            if directions.is_empty() {
                continue;
            }
            directions.shuffle(rng);
            let direction: Direction = directions[0];
            debug!("pipe at ({x}, {y}), direction {direction:?}, size {size}");
            board.set(
                x,
                y,
                Cell::structural(Element::Pipe {
                    direction,
                    size,
                    contents: Vec::with_capacity(size),
                }),
            );
            used.insert((x, y));
            placed = true;
            break;
        }
        if !placed {
            debug!("no eligible pipe position");
            return Err(PlacementError::NoEligiblePosition(ElementKind::Pipe));
        }
    }
    Ok(())
}

fn place_pull_pins(
    board: &mut Board,
    config: &LevelConfig,
    used: &mut HashSet<(usize, usize)>,
    corridors: &mut HashSet<(usize, usize)>,
    rng: &mut impl Rng,
) -> Result<(), PlacementError> {
    for _ in 0..config.requested(ElementKind::PullPin) {
        let mut candidates: Vec<(usize, usize)> = structural_candidates(board, config, used);
        candidates.shuffle(rng);

        let mut placed: bool = false;
        'cells: for (x, y) in candidates {
            let mut directions: Vec<Direction> = Direction::ALL.to_vec();
            directions.shuffle(rng);
            for direction in directions {
                // Length of the free corridor in this direction, capped at
                // the largest gate. Corridor cells must be empty and not
                // already reserved by another pin.
                let (dx, dy) = direction.delta();
                let mut run: u8 = 0;
                while run < MAX_GATE_SIZE {
                    let nx: isize = x as isize + dx * (run as isize + 1);
                    let ny: isize = y as isize + dy * (run as isize + 1);
                    if !board.in_bounds(nx, ny) {
                        break;
                    }
                    let pos: (usize, usize) = (nx as usize, ny as usize);
                    if board.get(pos.0, pos.1).kind != CellKind::Empty
                        || corridors.contains(&pos)
                    {
                        break;
                    }
                    run += 1;
                }
                if run == 0 {
                    continue;
                }
                let gate_size: u8 = rng.random_range(1..=run);
                debug!("pull pin at ({x}, {y}), direction {direction:?}, gate {gate_size}");
                board.set(
                    x,
                    y,
                    Cell::structural(Element::PullPin {
                        direction,
                        gate_size,
                    }),
                );
                used.insert((x, y));
                for i in 1..=gate_size as isize {
                    corridors.insert(((x as isize + dx * i) as usize, (y as isize + dy * i) as usize));
                }
                placed = true;
                break 'cells;
            }
        }
        if !placed {
            debug!("no eligible pull pin position");
            return Err(PlacementError::NoEligiblePosition(ElementKind::PullPin));
        }
    }
    Ok(())
}

fn place_locks(
    board: &mut Board,
    config: &LevelConfig,
    used: &mut HashSet<(usize, usize)>,
    rng: &mut impl Rng,
) -> Result<(), PlacementError> {
    for pair in 1..=config.requested(ElementKind::BlockLock) as u32 {
        let mut candidates: Vec<(usize, usize)> = structural_candidates(board, config, used);
        if candidates.len() < 2 {
            debug!("no eligible lock/key positions for pair {pair}");
            return Err(PlacementError::NoEligiblePosition(ElementKind::BlockLock));
        }
        candidates.shuffle(rng);
        let lock_pos: (usize, usize) = candidates[0];
        let key_pos: (usize, usize) = candidates[1];
        debug!("lock pair {pair}: lock at {lock_pos:?}, key at {key_pos:?}");
        board.set(lock_pos.0, lock_pos.1, Cell::structural(Element::Lock { pair }));
        board.set(key_pos.0, key_pos.1, Cell::structural(Element::Key { pair }));
        used.insert(lock_pos);
        used.insert(key_pos);
    }
    Ok(())
}

/// Attach the decoration elements to plain colored blocks.
///
/// Each instance takes a distinct plain block; the cell keeps its color.
///
/// # Errors
///
/// Return [`PlacementError::NoEligiblePosition`] when the plain blocks run
/// out before every requested instance is attached.
pub fn place_attachments(
    board: &mut Board,
    config: &LevelConfig,
    rng: &mut impl Rng,
) -> Result<(), PlacementError> {
    let mut candidates: Vec<(usize, usize)> = board
        .block_positions()
        .into_iter()
        .filter(|&(x, y)| board.get(x, y).is_plain_block())
        .collect();
    candidates.shuffle(rng);

    let requests: [(ElementKind, usize); 4] = [
        (ElementKind::Barrel, config.requested(ElementKind::Barrel)),
        (ElementKind::Ice, config.requested(ElementKind::Ice)),
        (ElementKind::Bomb, config.requested(ElementKind::Bomb)),
        (ElementKind::Moving, config.requested(ElementKind::Moving)),
    ];

    for (kind, count) in requests {
        for _ in 0..count {
            let Some((x, y)) = candidates.pop() else {
                debug!("no plain block left for {kind}");
                return Err(PlacementError::NoEligiblePosition(kind));
            };
            let element: Element = match kind {
                ElementKind::Barrel => Element::Barrel,
                ElementKind::Ice => Element::Ice {
                    uses: rng.random_range(1..=3),
                },
                ElementKind::Bomb => Element::Bomb {
                    uses: rng.random_range(1..=3),
                },
                ElementKind::Moving => Element::Moving {
                    direction: Direction::ALL[rng.random_range(0..Direction::ALL.len())],
                    distance: rng.random_range(1..=3),
                },
                _ => unreachable!("not an attachment kind"),
            };
            debug!("{kind} attached at ({x}, {y})");
            board.get_mut(x, y).element = Some(element);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::board::Color;

    /// A 5x5 board with a 3x3 block of blocks in the middle.
    fn centered_board() -> (Board, LevelConfig) {
        let mut board: Board = Board::new(5, 5);
        for y in 1..4 {
            for x in 1..4 {
                board.set(x, y, Cell::block(Color::Red));
            }
        }
        let config: LevelConfig = LevelConfig::new(5, 5, 9, &[Color::Red]);
        (board, config)
    }

    fn count_kind(board: &Board, kind: ElementKind) -> usize {
        board
            .rows()
            .flatten()
            .filter(|c| c.element.as_ref().is_some_and(|e| e.kind() == kind))
            .count()
    }

    #[test]
    fn pipes_point_at_empty_cells() {
        let (mut board, mut config) = centered_board();
        config.request_element(ElementKind::Pipe, 2);
        let mut rng = rand::rng();
        place_structural(&mut board, &config, &[3, 3], &mut rng).unwrap();

        assert_eq!(count_kind(&board, ElementKind::Pipe), 2);
        for y in 0..5 {
            for x in 0..5 {
                if let Some(Element::Pipe { direction, .. }) = &board.get(x, y).element {
                    let (dx, dy) = direction.delta();
                    let cell: &Cell = board.get((x as isize + dx) as usize, (y as isize + dy) as usize);
                    assert_eq!(cell.kind, CellKind::Empty);
                }
            }
        }
    }

    #[test]
    fn lock_pairs_are_correlated() {
        let (mut board, mut config) = centered_board();
        config.request_element(ElementKind::BlockLock, 2);
        let mut rng = rand::rng();
        place_structural(&mut board, &config, &[], &mut rng).unwrap();

        assert_eq!(count_kind(&board, ElementKind::BlockLock), 2);
        assert_eq!(count_kind(&board, ElementKind::Key), 2);
        for pair in 1..=2u32 {
            let locks: usize = board
                .rows()
                .flatten()
                .filter(|c| c.element == Some(Element::Lock { pair }))
                .count();
            let keys: usize = board
                .rows()
                .flatten()
                .filter(|c| c.element == Some(Element::Key { pair }))
                .count();
            assert_eq!(locks, 1);
            assert_eq!(keys, 1);
        }
    }

    #[test]
    fn pull_pin_corridor_is_empty() {
        let (mut board, mut config) = centered_board();
        config.request_element(ElementKind::PullPin, 1);
        let mut rng = rand::rng();
        place_structural(&mut board, &config, &[], &mut rng).unwrap();

        let mut found: bool = false;
        for y in 0..5 {
            for x in 0..5 {
                if let Some(Element::PullPin {
                    direction,
                    gate_size,
                }) = &board.get(x, y).element
                {
                    found = true;
                    let (dx, dy) = direction.delta();
                    for i in 1..=*gate_size as isize {
                        let cell: &Cell =
                            board.get((x as isize + dx * i) as usize, (y as isize + dy * i) as usize);
                        assert_eq!(cell.kind, CellKind::Empty);
                    }
                }
            }
        }
        assert!(found);
    }

    #[test]
    fn structural_placement_fails_without_eligible_cells() {
        // A full board has no empty neighbor for any pipe mouth.
        let mut board: Board = Board::new(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                board.set(x, y, Cell::block(Color::Red));
            }
        }
        let mut config: LevelConfig = LevelConfig::new(3, 3, 9, &[Color::Red]);
        config.request_element(ElementKind::Pipe, 1);
        let mut rng = rand::rng();
        assert_eq!(
            place_structural(&mut board, &config, &[3], &mut rng),
            Err(PlacementError::NoEligiblePosition(ElementKind::Pipe))
        );
    }

    #[test]
    fn symmetric_mode_keeps_structural_elements_on_the_center_column() {
        let mut board: Board = Board::new(5, 5);
        for y in 0..5 {
            for x in 1..4 {
                board.set(x, y, Cell::block(Color::Red));
            }
        }
        let mut config: LevelConfig = LevelConfig::new(5, 5, 15, &[Color::Red]);
        config.generation_mode = GenerationMode::Symmetric;
        config.request_element(ElementKind::BlockLock, 1);
        let mut rng = rand::rng();
        place_structural(&mut board, &config, &[], &mut rng).unwrap();

        for y in 0..5 {
            for x in 0..5 {
                if board.get(x, y).element.is_some() {
                    assert_eq!(x, 2, "structural element off the center column");
                }
            }
        }
    }

    #[test]
    fn attachments_keep_the_cell_color() {
        let (mut board, mut config) = centered_board();
        config.request_element(ElementKind::Ice, 2);
        config.request_element(ElementKind::Bomb, 1);
        let mut rng = rand::rng();
        place_attachments(&mut board, &config, &mut rng).unwrap();

        assert_eq!(count_kind(&board, ElementKind::Ice), 2);
        assert_eq!(count_kind(&board, ElementKind::Bomb), 1);
        for cell in board.rows().flatten() {
            if cell.element.is_some() {
                assert!(cell.is_colored_block());
            }
        }
    }

    #[test]
    fn attachments_fail_when_plain_blocks_run_out() {
        let mut board: Board = Board::new(3, 3);
        board.set(0, 0, Cell::block(Color::Red));
        let mut config: LevelConfig = LevelConfig::new(3, 3, 1, &[Color::Red]);
        config.request_element(ElementKind::Barrel, 2);
        let mut rng = rand::rng();
        assert_eq!(
            place_attachments(&mut board, &config, &mut rng),
            Err(PlacementError::NoEligiblePosition(ElementKind::Barrel))
        );
    }
}
