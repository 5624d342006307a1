/*
bar_orders.rs

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

//! Session-scoped custom bar orderings.
//!
//! A user may reorder the bars of a level in the editor. The ordering is
//! kept in a [`BarOrders`] context object keyed by level id, owned by the
//! session (or request) that needs it and passed explicitly to
//! [`crate::export::color_bars::color_bar_sequence_with_orders`]. The
//! generation and export core holds no process-wide state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::generator::board::Color;

/// Custom bar orderings keyed by level id.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BarOrders {
    orders: HashMap<String, Vec<Color>>,
}

impl BarOrders {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the color preference list for a level, replacing any previous
    /// one.
    pub fn set(&mut self, level_id: &str, order: Vec<Color>) {
        self.orders.insert(level_id.to_string(), order);
    }

    /// Return the color preference list for a level, if any.
    pub fn get(&self, level_id: &str) -> Option<&[Color]> {
        self.orders.get(level_id).map(Vec::as_slice)
    }

    /// Drop the ordering for a level.
    pub fn remove(&mut self, level_id: &str) {
        self.orders.remove(level_id);
    }

    /// Whether no ordering is stored.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_are_kept_per_level() {
        let mut orders: BarOrders = BarOrders::new();
        assert!(orders.is_empty());

        orders.set("level-1", vec![Color::Blue, Color::Red]);
        orders.set("level-2", vec![Color::Green]);
        assert_eq!(orders.get("level-1"), Some(&[Color::Blue, Color::Red][..]));
        assert_eq!(orders.get("level-3"), None);

        orders.remove("level-1");
        assert_eq!(orders.get("level-1"), None);
        assert!(!orders.is_empty());
    }
}
