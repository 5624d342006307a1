/*
board.rs

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

//! Grid model: colors, elements, cells, and the board matrix.
//!
//! A board is a `height` x `width` matrix of [`Cell`] objects, stored row
//! major, so cell `(x, y)` lives at row `y`, column `x`.
//! A cell is either empty, a block, or a wall.
//! Blocks carry an optional [`Color`] and an optional [`Element`].
//! Each element kind owns its payload through the [`Element`] variants, so a
//! pipe cannot carry a lock pair number and a lock cannot carry pipe
//! contents.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::FromRepr;

/// Block colors.
///
/// A configuration selects an ordered subset of these colors; the board only
/// ever uses selected colors.
#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum,
    FromRepr,
)]
#[repr(i32)]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
    Cyan,
}

impl Color {
    /// All the colors, in their canonical order.
    pub const ALL: [Color; 8] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Purple,
        Color::Orange,
        Color::Pink,
        Color::Cyan,
    ];

    /// Return the lowercase color name used in text exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Orange => "orange",
            Color::Pink => "pink",
            Color::Cyan => "cyan",
        }
    }

    /// Return the color for an export name, or None for an unknown name.
    pub fn from_name(name: &str) -> Option<Self> {
        Color::ALL.iter().copied().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a directional element (pipe mouth, pull pin corridor,
/// moving block travel).
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, FromRepr)]
#[repr(i32)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All the directions.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Return the `(dx, dy)` grid delta for the direction. `Up` decreases
    /// `y` because the board is stored with row 0 at the top.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Return the lowercase direction name used in text exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Return the direction for an export name, or None for an unknown name.
    pub fn from_name(name: &str) -> Option<Self> {
        Direction::ALL.iter().copied().find(|d| d.as_str() == name)
    }
}

/// Kind tag for the special behaviors that can be attached to a cell.
///
/// Configurations request instance counts per kind. `Key` cannot be
/// requested directly: a key is always placed together with its lock.
#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum,
)]
pub enum ElementKind {
    Pipe,
    Barrel,
    Ice,
    BlockLock,
    Key,
    PullPin,
    Bomb,
    Moving,
}

impl ElementKind {
    /// Return the lowercase kind name used in text exports.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Pipe => "pipe",
            ElementKind::Barrel => "barrel",
            ElementKind::Ice => "ice",
            ElementKind::BlockLock => "lock",
            ElementKind::Key => "key",
            ElementKind::PullPin => "pullpin",
            ElementKind::Bomb => "bomb",
            ElementKind::Moving => "moving",
        }
    }

    /// Return the kind for an export name, or None for an unknown name.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            ElementKind::Pipe,
            ElementKind::Barrel,
            ElementKind::Ice,
            ElementKind::BlockLock,
            ElementKind::Key,
            ElementKind::PullPin,
            ElementKind::Bomb,
            ElementKind::Moving,
        ]
        .iter()
        .copied()
        .find(|k| k.as_str() == name)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Special behavior attached to a cell, with the payload of its kind.
///
/// - `Pipe` is a structural cell that releases an ordered queue of colored
///   blocks in its direction. The queue colors count toward the color
///   divisibility rule, the pipe cell itself does not.
/// - `Lock` and `Key` are two correlated structural cells; the pair number
///   matches a lock with its single key.
/// - `PullPin` opens a corridor of `gate_size` empty cells in its direction
///   when triggered.
/// - `Barrel`, `Ice`, `Bomb`, and `Moving` attach to an already colored
///   block without removing its color.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum Element {
    Pipe {
        direction: Direction,
        size: usize,
        contents: Vec<Color>,
    },
    Barrel,
    Ice {
        uses: u8,
    },
    Lock {
        pair: u32,
    },
    Key {
        pair: u32,
    },
    PullPin {
        direction: Direction,
        gate_size: u8,
    },
    Bomb {
        uses: u8,
    },
    Moving {
        direction: Direction,
        distance: u8,
    },
}

impl Element {
    /// Return the kind tag of the element.
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Pipe { .. } => ElementKind::Pipe,
            Element::Barrel => ElementKind::Barrel,
            Element::Ice { .. } => ElementKind::Ice,
            Element::Lock { .. } => ElementKind::BlockLock,
            Element::Key { .. } => ElementKind::Key,
            Element::PullPin { .. } => ElementKind::PullPin,
            Element::Bomb { .. } => ElementKind::Bomb,
            Element::Moving { .. } => ElementKind::Moving,
        }
    }

    /// Whether the element turns its cell into an uncolored structural cell.
    ///
    /// Structural cells are still blocks for the connectivity rule, but they
    /// do not carry a color of their own.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Element::Pipe { .. }
                | Element::Lock { .. }
                | Element::Key { .. }
                | Element::PullPin { .. }
        )
    }
}

/// Base type of a cell.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CellKind {
    #[default]
    Empty,
    Block,
    Wall,
}

impl CellKind {
    /// Return the lowercase kind name used in text exports.
    pub fn as_str(self) -> &'static str {
        match self {
            CellKind::Empty => "empty",
            CellKind::Block => "block",
            CellKind::Wall => "wall",
        }
    }

    /// Return the kind for an export name, or None for an unknown name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "empty" => Some(CellKind::Empty),
            "block" => Some(CellKind::Block),
            "wall" => Some(CellKind::Wall),
            _ => None,
        }
    }
}

/// One board cell.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// Base type of the cell.
    pub kind: CellKind,

    /// Block color. Present only for playable blocks; structural element
    /// cells (pipe, lock, key, pull pin) have no color.
    pub color: Option<Color>,

    /// Special behavior attached to the cell.
    pub element: Option<Element>,
}

impl Cell {
    /// Create an empty cell.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a plain colored block.
    pub fn block(color: Color) -> Self {
        Self {
            kind: CellKind::Block,
            color: Some(color),
            element: None,
        }
    }

    /// Create an uncolored structural block carrying the given element.
    pub fn structural(element: Element) -> Self {
        Self {
            kind: CellKind::Block,
            color: None,
            element: Some(element),
        }
    }

    /// Whether the cell is a block of any sort.
    pub fn is_block(&self) -> bool {
        self.kind == CellKind::Block
    }

    /// Whether the cell is a colored playable block (an attachment element
    /// such as a barrel does not change this).
    pub fn is_colored_block(&self) -> bool {
        self.kind == CellKind::Block && self.color.is_some()
    }

    /// Whether the cell is a colored block without any element.
    pub fn is_plain_block(&self) -> bool {
        self.is_colored_block() && self.element.is_none()
    }
}

/// The board matrix.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,

    /// Cells in row-major order: `cells[y][x]`.
    cells: Vec<Vec<Cell>>,
}

impl Board {
    /// Create an all-empty board with the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![Cell::empty(); width]; height],
        }
    }

    /// Create a board from a cell matrix.
    ///
    /// A ragged matrix is a programmer error and panics.
    pub fn from_cells(cells: Vec<Vec<Cell>>) -> Self {
        let height: usize = cells.len();
        let width: usize = cells.first().map_or(0, Vec::len);
        assert!(
            cells.iter().all(|row| row.len() == width),
            "ragged board rows"
        );
        Self {
            width,
            height,
            cells,
        }
    }

    /// Board width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Board height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the signed coordinates are inside the board.
    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    /// Return the cell at `(x, y)`.
    ///
    /// Out-of-range coordinates are a programmer error and panic.
    pub fn get(&self, x: usize, y: usize) -> &Cell {
        &self.cells[y][x]
    }

    /// Return a mutable reference to the cell at `(x, y)`.
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        &mut self.cells[y][x]
    }

    /// Replace the cell at `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[y][x] = cell;
    }

    /// Iterate over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &Vec<Cell>> {
        self.cells.iter()
    }

    /// Return the positions of all the block cells, in row-major order.
    pub fn block_positions(&self) -> Vec<(usize, usize)> {
        let mut positions: Vec<(usize, usize)> = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[y][x].is_block() {
                    positions.push((x, y));
                }
            }
        }
        positions
    }

    /// Count the block cells.
    pub fn num_blocks(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|c| c.is_block()).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_names_roundtrip() {
        for color in Color::ALL {
            assert_eq!(Color::from_name(color.as_str()), Some(color));
        }
        assert_eq!(Color::from_name("magenta"), None);
    }

    #[test]
    fn direction_deltas_are_unit_vectors() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.delta();
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
    }

    #[test]
    fn structural_elements_are_flagged() {
        assert!(
            Element::Pipe {
                direction: Direction::Up,
                size: 3,
                contents: vec![Color::Red; 3],
            }
            .is_structural()
        );
        assert!(Element::Lock { pair: 1 }.is_structural());
        assert!(Element::Key { pair: 1 }.is_structural());
        assert!(
            Element::PullPin {
                direction: Direction::Left,
                gate_size: 2,
            }
            .is_structural()
        );
        assert!(!Element::Barrel.is_structural());
        assert!(!Element::Ice { uses: 1 }.is_structural());
        assert!(!Element::Bomb { uses: 1 }.is_structural());
        assert!(
            !Element::Moving {
                direction: Direction::Down,
                distance: 1,
            }
            .is_structural()
        );
    }

    #[test]
    fn board_dimensions_and_access() {
        let mut board: Board = Board::new(4, 3);
        assert_eq!(board.width(), 4);
        assert_eq!(board.height(), 3);
        assert!(board.in_bounds(3, 2));
        assert!(!board.in_bounds(4, 0));
        assert!(!board.in_bounds(-1, 0));

        board.set(1, 2, Cell::block(Color::Green));
        assert!(board.get(1, 2).is_plain_block());
        assert_eq!(board.num_blocks(), 1);
        assert_eq!(board.block_positions(), vec![(1, 2)]);
    }

    #[test]
    #[should_panic(expected = "ragged board rows")]
    fn ragged_rows_panic() {
        Board::from_cells(vec![vec![Cell::empty(); 3], vec![Cell::empty(); 2]]);
    }
}
