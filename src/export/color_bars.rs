/*
color_bars.rs

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

//! Color-bar sequence analytics.
//!
//! A bar is a group of exactly 3 same-color blocks, the atomic unit
//! consumed by gameplay. [`color_bar_sequence`] scans the board in
//! row-major order (pipe contents are visited at their pipe cell, in queue
//! order) and partitions each color's occurrences into bars in discovery
//! order: every third occurrence of a color completes a bar, and the bar
//! indexes ascend across the whole scan, not per color.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::generator::board::{Board, Color, Element};
use crate::generator::engine::GeneratedLevel;

use super::bar_orders::BarOrders;

/// One bar of the sequence.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBar {
    /// Position of the bar in the sequence, ascending from 0.
    pub index: usize,

    /// Color of the three blocks forming the bar.
    pub color: Color,
}

/// Total occurrence count of one color.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCount {
    pub color: Color,
    pub count: usize,
}

/// The color-bar summary of a level.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ColorBarSequence {
    /// Bars in sequence order.
    pub bars: Vec<ColorBar>,

    /// Total number of block-consuming color occurrences (plain blocks plus
    /// pipe contents).
    pub total_blocks: usize,

    /// Number of complete bars. Equal to `total_blocks / 3` whenever every
    /// color total is a multiple of 3.
    pub total_bars: usize,

    /// Per-color totals, in color discovery order.
    pub color_summary: Vec<ColorCount>,

    /// Fraction of the grid occupied by block-consuming content:
    /// `total_blocks / (width * height)`.
    pub efficiency: f32,
}

/// Compute the color-bar sequence of a level.
pub fn color_bar_sequence(level: &GeneratedLevel) -> ColorBarSequence {
    sequence_board(&level.board)
}

/// Compute the color-bar sequence, honoring a custom bar ordering for this
/// level if the context holds one.
///
/// The custom ordering is a color preference list: bars are stably
/// reordered so that the preferred colors come first, in list order;
/// bars of unlisted colors follow in discovery order. Bar indexes are
/// reassigned so they stay ascending.
pub fn color_bar_sequence_with_orders(
    level: &GeneratedLevel,
    orders: &BarOrders,
) -> ColorBarSequence {
    let mut sequence: ColorBarSequence = sequence_board(&level.board);
    if let Some(order) = orders.get(&level.id) {
        let rank = |color: Color| -> usize {
            order
                .iter()
                .position(|&c| c == color)
                .unwrap_or(order.len())
        };
        sequence.bars.sort_by_key(|bar| (rank(bar.color), bar.index));
        for (i, bar) in sequence.bars.iter_mut().enumerate() {
            bar.index = i;
        }
    }
    sequence
}

/// Row-major scan of the board.
fn sequence_board(board: &Board) -> ColorBarSequence {
    let mut counts: HashMap<Color, usize> = HashMap::new();
    let mut discovery: Vec<Color> = Vec::new();
    let mut bars: Vec<ColorBar> = Vec::new();
    let mut total_blocks: usize = 0;

    let record = |color: Color,
                  counts: &mut HashMap<Color, usize>,
                  discovery: &mut Vec<Color>,
                  bars: &mut Vec<ColorBar>| {
        let count: &mut usize = counts.entry(color).or_insert_with(|| {
            discovery.push(color);
            0
        });
        *count += 1;
        if *count % 3 == 0 {
            bars.push(ColorBar {
                index: bars.len(),
                color,
            });
        }
    };

    for row in board.rows() {
        for cell in row {
            if let Some(color) = cell.color {
                total_blocks += 1;
                record(color, &mut counts, &mut discovery, &mut bars);
            }
            if let Some(Element::Pipe { contents, .. }) = &cell.element {
                for &color in contents {
                    total_blocks += 1;
                    record(color, &mut counts, &mut discovery, &mut bars);
                }
            }
        }
    }

    let area: usize = board.width() * board.height();
    let efficiency: f32 = if area == 0 {
        0.0
    } else {
        total_blocks as f32 / area as f32
    };

    ColorBarSequence {
        total_bars: bars.len(),
        bars,
        total_blocks,
        color_summary: discovery
            .iter()
            .map(|&color| ColorCount {
                color,
                count: counts[&color],
            })
            .collect(),
        efficiency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::board::{Cell, Direction};

    fn board_with_colors(colors: &[Color]) -> Board {
        let mut board: Board = Board::new(colors.len(), 1);
        for (x, &color) in colors.iter().enumerate() {
            board.set(x, 0, Cell::block(color));
        }
        board
    }

    #[test]
    fn empty_board_yields_zeros() {
        let sequence: ColorBarSequence = sequence_board(&Board::new(4, 4));
        assert_eq!(sequence.total_blocks, 0);
        assert_eq!(sequence.total_bars, 0);
        assert!(sequence.bars.is_empty());
        assert!(sequence.color_summary.is_empty());
        assert_eq!(sequence.efficiency, 0.0);
    }

    #[test]
    fn bars_complete_on_every_third_occurrence() {
        use Color::{Blue, Red};
        // Scan order: R R B R B B -> Red completes at position 3,
        // Blue at position 5.
        let board: Board = board_with_colors(&[Red, Red, Blue, Red, Blue, Blue]);
        let sequence: ColorBarSequence = sequence_board(&board);

        assert_eq!(sequence.total_blocks, 6);
        assert_eq!(sequence.total_bars, 2);
        assert_eq!(
            sequence.bars,
            vec![
                ColorBar { index: 0, color: Red },
                ColorBar { index: 1, color: Blue },
            ]
        );
        assert_eq!(sequence.total_bars * 3, sequence.total_blocks);
    }

    #[test]
    fn pipe_contents_count_at_the_pipe_cell() {
        let mut board: Board = Board::new(2, 1);
        board.set(
            0,
            0,
            Cell::structural(Element::Pipe {
                direction: Direction::Right,
                size: 3,
                contents: vec![Color::Green; 3],
            }),
        );
        let sequence: ColorBarSequence = sequence_board(&board);
        assert_eq!(sequence.total_blocks, 3);
        assert_eq!(sequence.total_bars, 1);
        assert_eq!(sequence.color_summary.len(), 1);
        assert_eq!(sequence.color_summary[0].count, 3);
    }

    #[test]
    fn summary_keeps_discovery_order() {
        use Color::{Blue, Green, Red};
        let board: Board = board_with_colors(&[Green, Red, Blue, Green, Red, Blue]);
        let sequence: ColorBarSequence = sequence_board(&board);
        let order: Vec<Color> = sequence.color_summary.iter().map(|c| c.color).collect();
        assert_eq!(order, vec![Green, Red, Blue]);
    }

    #[test]
    fn efficiency_is_the_packing_ratio() {
        use Color::Red;
        let board: Board = board_with_colors(&[Red, Red, Red]);
        let sequence: ColorBarSequence = sequence_board(&board);
        assert_eq!(sequence.efficiency, 1.0);
    }
}
