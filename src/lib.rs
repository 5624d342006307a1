/*
lib.rs

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

//! Tribar generates playable grid boards for a match-three-style game.
//!
//! The [`generator`] module builds boards that satisfy the structural
//! invariants (connectivity, exact element counts, color divisibility), the
//! [`export`] module turns generated levels into deterministic
//! serializations, and the [`saver`] module persists levels as JSON files.

pub mod cli_options;
pub mod config;
pub mod export;
pub mod generator;
pub mod saver;

pub use generator::board::{Board, Cell, CellKind, Color, Direction, Element, ElementKind};
pub use generator::engine::{
    BoardGenerator, GeneratedLevel, GenerationError, generate, validate_invariants,
};
pub use generator::fallback::{GeneratorChain, LevelGenerator};
pub use generator::level_config::{Container, Difficulty, GenerationMode, LevelConfig};
