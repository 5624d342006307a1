/*
fallback.rs

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

//! Generator strategies.
//!
//! Callers that want a fallback when the core engine reports an infeasible
//! placement build a [`GeneratorChain`]: an explicit ordered list of
//! [`LevelGenerator`] strategies tried in sequence. Each strategy returns a
//! typed result; there is no exception-style control flow between them.
//! An alternative AI-based generator plugs in as another [`LevelGenerator`]
//! implementation with the identical configuration and level shapes.

use log::debug;

use super::engine::{BoardGenerator, GeneratedLevel, GenerationError};
use super::level_config::LevelConfig;

/// A level generation strategy.
pub trait LevelGenerator {
    /// Strategy name, for logs and diagnostics.
    fn name(&self) -> &str;

    /// Generate a level for the configuration.
    fn generate(&mut self, config: &LevelConfig) -> Result<GeneratedLevel, GenerationError>;
}

impl LevelGenerator for BoardGenerator {
    fn name(&self) -> &str {
        "engine"
    }

    fn generate(&mut self, config: &LevelConfig) -> Result<GeneratedLevel, GenerationError> {
        BoardGenerator::generate(self, config)
    }
}

/// Ordered list of generator strategies.
pub struct GeneratorChain {
    generators: Vec<Box<dyn LevelGenerator>>,
}

impl Default for GeneratorChain {
    fn default() -> Self {
        Self::with_engine()
    }
}

impl GeneratorChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            generators: Vec::new(),
        }
    }

    /// Create a chain holding only the core engine.
    pub fn with_engine() -> Self {
        let mut chain: GeneratorChain = Self::new();
        chain.push(Box::new(BoardGenerator::new()));
        chain
    }

    /// Append a strategy at the end of the chain.
    pub fn push(&mut self, generator: Box<dyn LevelGenerator>) {
        self.generators.push(generator);
    }

    /// Number of strategies in the chain.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Whether the chain holds no strategy.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Try the strategies in order and return the first success.
    ///
    /// An [`GenerationError::InvalidConfiguration`] stops the chain
    /// immediately: an arithmetically impossible input cannot be satisfied
    /// by any strategy. The other failures fall through to the next
    /// strategy; the last failure is returned when every strategy failed.
    ///
    /// # Errors
    ///
    /// [`GenerationError::ConnectivityFailure`] on an empty chain.
    pub fn generate(&mut self, config: &LevelConfig) -> Result<GeneratedLevel, GenerationError> {
        let mut last_error: GenerationError = GenerationError::ConnectivityFailure;

        for generator in &mut self.generators {
            debug!("trying generator \"{}\"", generator.name());
            match generator.generate(config) {
                Ok(level) => return Ok(level),
                Err(e @ GenerationError::InvalidConfiguration(_)) => return Err(e),
                Err(e) => {
                    debug!("generator \"{}\" failed: {e}", generator.name());
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::board::{Color, ElementKind};

    /// Strategy that always fails with the given error.
    struct FailingGenerator(GenerationError);

    impl LevelGenerator for FailingGenerator {
        fn name(&self) -> &str {
            "failing"
        }

        fn generate(&mut self, _: &LevelConfig) -> Result<GeneratedLevel, GenerationError> {
            Err(self.0.clone())
        }
    }

    #[test]
    fn the_first_successful_strategy_wins() {
        let mut chain: GeneratorChain = GeneratorChain::new();
        chain.push(Box::new(FailingGenerator(GenerationError::ConnectivityFailure)));
        chain.push(Box::new(BoardGenerator::new()));

        let config: LevelConfig =
            LevelConfig::new(9, 10, 27, &[Color::Red, Color::Blue, Color::Green]);
        assert!(chain.generate(&config).is_ok());
    }

    #[test]
    fn the_last_failure_is_reported() {
        let mut chain: GeneratorChain = GeneratorChain::new();
        chain.push(Box::new(FailingGenerator(GenerationError::ConnectivityFailure)));
        chain.push(Box::new(FailingGenerator(GenerationError::PlacementInfeasible(
            ElementKind::Pipe,
        ))));

        let config: LevelConfig = LevelConfig::new(9, 10, 27, &[Color::Red]);
        assert_eq!(
            chain.generate(&config),
            Err(GenerationError::PlacementInfeasible(ElementKind::Pipe))
        );
    }

    #[test]
    fn invalid_configuration_short_circuits() {
        let mut chain: GeneratorChain = GeneratorChain::new();
        chain.push(Box::new(BoardGenerator::new()));
        chain.push(Box::new(FailingGenerator(GenerationError::ConnectivityFailure)));

        // Impossible input: more blocks than cells.
        let config: LevelConfig = LevelConfig::new(3, 3, 10, &[Color::Red]);
        assert!(matches!(
            chain.generate(&config),
            Err(GenerationError::InvalidConfiguration(_))
        ));
    }
}
