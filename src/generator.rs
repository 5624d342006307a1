/*
generator.rs

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

//! Generate playable match-three boards.
//!
//! A caller fills a [`level_config::LevelConfig`] with the structural
//! parameters of the wanted board: dimensions, block count, selected
//! colors, layout mode, special element counts, and difficulty tier.
//! The [`engine::generate`] function (or a reusable
//! [`engine::BoardGenerator`] object) then produces an
//! [`engine::GeneratedLevel`] that satisfies the structural invariants:
//!
//! * the block cells form a single 4-connected group;
//! * every color total, pipe contents included, is a multiple of 3, so that
//!   each color can be consumed as bars of three;
//! * every requested element is placed exactly as many times as requested,
//!   with one key per lock;
//! * in symmetric mode the board mirrors across its vertical axis.
//!
//! Generation is randomized and retried internally; when a configuration
//! cannot be satisfied the engine returns a typed
//! [`engine::GenerationError`] instead of a partial board.
//! Callers that want to chain an alternative generator after the engine
//! (for example an AI-based one) build a [`fallback::GeneratorChain`].
//!
//! The [`connectivity`] module doubles as the support of the interactive
//! editor: it discovers the block group under the pointer and computes
//! feasible group relocations.

pub mod board;
pub mod coloring;
pub mod connectivity;
pub mod difficulty;
pub mod elements;
pub mod engine;
pub mod fallback;
pub mod layout;
pub mod level_config;
