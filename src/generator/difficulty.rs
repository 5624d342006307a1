/*
difficulty.rs

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

//! Difficulty scoring and solvability.
//!
//! The difficulty score is a pure function of the board area, the color
//! count, the difficulty tier, and the point weight of everything placed on
//! the board:
//!
//! ```text
//! raw   = 0.15 * area + 5 * (colors - 1) + blocks + element_points + tier
//! score = 100 * raw / (raw + 60)
//! ```
//!
//! `blocks` counts every block-consuming slot at 1 point (plain blocks,
//! pipe contents, lock and key cells); `element_points` adds the per-kind
//! weight of each placed element instance; `tier` is 0, 10, or 20. The
//! normalization bounds the score to `0..100` and keeps it strictly
//! monotone in every term.

use std::collections::HashMap;

use super::board::{Board, Color, Element, ElementKind};
use super::level_config::{Difficulty, LevelConfig};

/// Normalization knee: a raw difficulty of 60 maps to a score of 50.
const SCORE_KNEE: f32 = 60.0;

/// Fixed difficulty weight of an element kind.
///
/// These weights are tuning data, not engine logic.
pub fn element_weight(kind: ElementKind) -> u32 {
    match kind {
        ElementKind::Pipe => 2,
        ElementKind::Barrel => 3,
        ElementKind::Ice => 2,
        ElementKind::BlockLock => 5,
        ElementKind::Key => 0,
        ElementKind::PullPin => 4,
        ElementKind::Bomb => 8,
        ElementKind::Moving => 3,
    }
}

/// Flat bonus of the difficulty tier.
fn tier_bonus(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Normal => 0.0,
        Difficulty::Hard => 10.0,
        Difficulty::SuperHard => 20.0,
    }
}

/// Count every block-consuming slot: plain colored blocks, pipe contents,
/// and lock and key cells.
pub fn counted_blocks(board: &Board) -> usize {
    let mut count: usize = 0;
    for row in board.rows() {
        for cell in row {
            if cell.is_colored_block() {
                count += 1;
            }
            match &cell.element {
                Some(Element::Pipe { contents, .. }) => count += contents.len(),
                Some(Element::Lock { .. }) | Some(Element::Key { .. }) => count += 1,
                _ => (),
            }
        }
    }
    count
}

/// Compute the difficulty score of a generated board, in `0..100`.
pub fn difficulty_score(config: &LevelConfig, board: &Board) -> f32 {
    let mut element_points: f32 = 0.0;
    for row in board.rows() {
        for cell in row {
            if let Some(element) = &cell.element {
                element_points += element_weight(element.kind()) as f32;
            }
        }
    }

    let raw: f32 = 0.15 * config.area() as f32
        + 5.0 * (config.color_count.saturating_sub(1)) as f32
        + counted_blocks(board) as f32
        + element_points
        + tier_bonus(config.difficulty);
    100.0 * raw / (raw + SCORE_KNEE)
}

/// Feasibility check for the matching rule.
///
/// A board is reported solvable when:
/// - every color total (plain blocks plus pipe contents) is a multiple of
///   3, so every block can eventually be consumed as part of a bar;
/// - every lock pair number matches exactly one lock and one key, so no
///   lock can stay closed forever;
/// - every pipe holds exactly `size` contents with `size >= 1`.
///
/// An unsolvable board is data, not an error: the caller decides whether to
/// reject it.
pub fn is_solvable(board: &Board) -> bool {
    let mut color_totals: HashMap<Color, usize> = HashMap::new();
    let mut locks: HashMap<u32, usize> = HashMap::new();
    let mut keys: HashMap<u32, usize> = HashMap::new();

    for row in board.rows() {
        for cell in row {
            if let Some(color) = cell.color {
                *color_totals.entry(color).or_insert(0) += 1;
            }
            match &cell.element {
                Some(Element::Pipe {
                    size, contents, ..
                }) => {
                    if *size == 0 || contents.len() != *size {
                        return false;
                    }
                    for &color in contents {
                        *color_totals.entry(color).or_insert(0) += 1;
                    }
                }
                Some(Element::Lock { pair }) => *locks.entry(*pair).or_insert(0) += 1,
                Some(Element::Key { pair }) => *keys.entry(*pair).or_insert(0) += 1,
                _ => (),
            }
        }
    }

    if color_totals.values().any(|&total| total % 3 != 0) {
        return false;
    }
    if locks.len() != keys.len() {
        return false;
    }
    locks
        .iter()
        .all(|(pair, &count)| count == 1 && keys.get(pair) == Some(&1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::board::{Cell, Direction};

    fn base_config() -> LevelConfig {
        LevelConfig::new(9, 10, 27, &[Color::Red, Color::Blue, Color::Green])
    }

    fn board_with_plain_blocks(count: usize) -> Board {
        let mut board: Board = Board::new(9, 10);
        for i in 0..count {
            board.set(i % 9, i / 9, Cell::block(Color::Red));
        }
        board
    }

    #[test]
    fn score_stays_in_range() {
        let config: LevelConfig = base_config();
        let score: f32 = difficulty_score(&config, &board_with_plain_blocks(27));
        assert!(score > 0.0 && score < 100.0);
    }

    #[test]
    fn score_grows_with_element_weight() {
        let config: LevelConfig = base_config();
        let plain: Board = board_with_plain_blocks(27);

        let mut with_bomb: Board = plain.clone();
        let mut cell: Cell = with_bomb.get(0, 0).clone();
        cell.element = Some(Element::Bomb { uses: 1 });
        with_bomb.set(0, 0, cell);

        assert!(difficulty_score(&config, &with_bomb) > difficulty_score(&config, &plain));
    }

    #[test]
    fn score_grows_with_the_tier() {
        let board: Board = board_with_plain_blocks(27);
        let mut config: LevelConfig = base_config();
        let normal: f32 = difficulty_score(&config, &board);
        config.difficulty = Difficulty::SuperHard;
        assert!(difficulty_score(&config, &board) > normal);
    }

    #[test]
    fn counted_blocks_includes_pipe_contents_and_lock_cells() {
        let mut board: Board = board_with_plain_blocks(3);
        board.set(
            5,
            5,
            Cell::structural(Element::Pipe {
                direction: Direction::Up,
                size: 3,
                contents: vec![Color::Blue; 3],
            }),
        );
        board.set(6, 5, Cell::structural(Element::Lock { pair: 1 }));
        board.set(7, 5, Cell::structural(Element::Key { pair: 1 }));
        assert_eq!(counted_blocks(&board), 8);
    }

    #[test]
    fn solvable_requires_divisible_colors() {
        assert!(is_solvable(&board_with_plain_blocks(27)));
        assert!(!is_solvable(&board_with_plain_blocks(26)));
    }

    #[test]
    fn solvable_requires_complete_lock_pairs() {
        let mut board: Board = board_with_plain_blocks(3);
        board.set(8, 9, Cell::structural(Element::Lock { pair: 1 }));
        assert!(!is_solvable(&board));

        board.set(7, 9, Cell::structural(Element::Key { pair: 1 }));
        assert!(is_solvable(&board));
    }

    #[test]
    fn solvable_requires_well_formed_pipes() {
        let mut board: Board = board_with_plain_blocks(3);
        board.set(
            4,
            4,
            Cell::structural(Element::Pipe {
                direction: Direction::Down,
                size: 3,
                contents: vec![Color::Green; 2],
            }),
        );
        assert!(!is_solvable(&board));
    }
}
