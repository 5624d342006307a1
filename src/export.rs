/*
export.rs

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

//! Export normalization.
//!
//! Deterministic serializations of a generated level for the history and
//! export services: [`flat_rows`] produces one delimited record per cell,
//! and [`color_bars`] derives the color-bar sequence analytics. The core
//! knows nothing about storage keys, collections, or transport; it only
//! produces the data.

pub mod bar_orders;
pub mod color_bars;
pub mod flat_rows;
