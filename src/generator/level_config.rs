/*
level_config.rs

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

//! Level configuration: the structural parameters that drive a generation
//! call, and the container targets shipped with a generated level.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use strum_macros::FromRepr;

use super::board::{CellKind, Color, ElementKind};

/// Level difficulty tier.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialOrd,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    FromRepr,
    Default,
)]
#[repr(i32)]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
    SuperHard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Difficulty::Normal => write!(f, "normal"),
            Difficulty::Hard => write!(f, "hard"),
            Difficulty::SuperHard => write!(f, "super-hard"),
        }
    }
}

/// How the block layout is produced.
///
/// In `Symmetric` mode only the left half of the board (plus the center
/// column on odd widths) is generated, and the result is mirrored on the
/// right half.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    FromRepr,
    Default,
)]
#[repr(i32)]
pub enum GenerationMode {
    #[default]
    Random,
    Symmetric,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerationMode::Random => write!(f, "random"),
            GenerationMode::Symmetric => write!(f, "symmetric"),
        }
    }
}

/// Structural parameters for one generation call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LevelConfig {
    /// Board width in cells.
    pub width: usize,

    /// Board height in cells.
    pub height: usize,

    /// Target number of block-consuming slots: plain colored blocks, pipe
    /// contents, and lock and key cells.
    pub block_count: usize,

    /// Number of selected colors. Must equal `selected_colors.len()`.
    pub color_count: usize,

    /// Ordered set of colors that the board may use.
    pub selected_colors: Vec<Color>,

    /// Optional presentation-only mapping from a color to a display value.
    /// The engine never reads this field.
    pub color_mapping: Option<HashMap<Color, String>>,

    /// Layout mode.
    pub generation_mode: GenerationMode,

    /// Requested special element instance counts per kind.
    pub elements: BTreeMap<ElementKind, usize>,

    /// Difficulty tier.
    pub difficulty: Difficulty,
}

impl LevelConfig {
    /// Create a configuration with no special elements, random layout, and
    /// normal difficulty.
    pub fn new(width: usize, height: usize, block_count: usize, colors: &[Color]) -> Self {
        Self {
            width,
            height,
            block_count,
            color_count: colors.len(),
            selected_colors: colors.to_vec(),
            color_mapping: None,
            generation_mode: GenerationMode::Random,
            elements: BTreeMap::new(),
            difficulty: Difficulty::Normal,
        }
    }

    /// Request `count` instances of the given element kind.
    ///
    /// A zero count removes the request.
    pub fn request_element(&mut self, kind: ElementKind, count: usize) {
        if count == 0 {
            self.elements.remove(&kind);
        } else {
            self.elements.insert(kind, count);
        }
    }

    /// Return the requested instance count for the given element kind.
    pub fn requested(&self, kind: ElementKind) -> usize {
        self.elements.get(&kind).copied().unwrap_or(0)
    }

    /// Number of requested attachment elements (barrel, ice, bomb, moving).
    /// Each attaches to a distinct plain colored block.
    pub fn attachment_count(&self) -> usize {
        self.requested(ElementKind::Barrel)
            + self.requested(ElementKind::Ice)
            + self.requested(ElementKind::Bomb)
            + self.requested(ElementKind::Moving)
    }

    /// Board area in cells.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// One slot of a container.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContainerSlot {
    /// Block color expected in the slot.
    pub color: Color,

    /// Cell kind of the block consumed into the slot.
    pub kind: CellKind,
}

/// A collection target consumed by gameplay.
///
/// Generation ships containers empty; gameplay fills them with collected
/// bars.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Container identifier, unique within a level.
    pub id: u32,

    /// Number of slots.
    pub capacity: usize,

    /// Ordered contents.
    pub contents: Vec<ContainerSlot>,
}

impl Container {
    /// Create an empty container.
    pub fn new(id: u32, capacity: usize) -> Self {
        Self {
            id,
            capacity,
            contents: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_requests_can_be_added_and_removed() {
        let mut config: LevelConfig =
            LevelConfig::new(9, 10, 27, &[Color::Red, Color::Blue, Color::Green]);
        assert_eq!(config.requested(ElementKind::Pipe), 0);

        config.request_element(ElementKind::Pipe, 2);
        assert_eq!(config.requested(ElementKind::Pipe), 2);

        config.request_element(ElementKind::Pipe, 0);
        assert_eq!(config.requested(ElementKind::Pipe), 0);
        assert!(config.elements.is_empty());
    }

    #[test]
    fn attachment_count_sums_the_attachment_kinds() {
        let mut config: LevelConfig = LevelConfig::new(5, 5, 12, &[Color::Red]);
        config.request_element(ElementKind::Ice, 2);
        config.request_element(ElementKind::Bomb, 1);
        config.request_element(ElementKind::Pipe, 3);
        assert_eq!(config.attachment_count(), 3);
    }
}
