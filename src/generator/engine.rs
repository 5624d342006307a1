/*
engine.rs

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

//! The board generation engine.
//!
//! [`BoardGenerator::generate`] turns a [`LevelConfig`] into a
//! [`GeneratedLevel`] in five phases: block layout, structural element
//! placement, color assignment, attachment placement, and validation with
//! scoring.
//! Layout-dependent failures (a disconnected mirror, an element with no
//! eligible position on this particular layout) are retried with a fresh
//! layout a bounded number of times; arithmetic impossibilities fail
//! immediately with [`GenerationError::InvalidConfiguration`].
//!
//! The engine is pure: no shared state survives a call, and concurrent
//! callers with distinct configurations are safe.

use chrono::{DateTime, Utc};
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::time::Instant;

use super::board::{Board, Cell, CellKind, Color, Element, ElementKind};
use super::coloring;
use super::connectivity::is_single_component;
use super::difficulty::{counted_blocks, difficulty_score, is_solvable};
use super::elements::{self, PlacementError};
use super::layout;
use super::level_config::{Container, GenerationMode, LevelConfig};

/// Layout attempts before the engine gives up on a configuration.
const MAX_LAYOUT_ATTEMPTS: usize = 40;

/// Pipe content size the engine aims for when the block budget allows it.
const PREFERRED_PIPE_SIZE: usize = 3;

/// Slot capacity of every generated container.
const CONTAINER_CAPACITY: usize = 7;

/// Type of errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// The configuration violates basic arithmetic feasibility. Not
    /// retryable: the caller must change the input.
    InvalidConfiguration(String),

    /// The named element kind could not be placed within the retry budget.
    /// Not retryable by the engine: the caller may relax the configuration
    /// or delegate to a fallback generator.
    PlacementInfeasible(ElementKind),

    /// The layout could not be made single-component within the retry
    /// budget.
    ConnectivityFailure,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerationError::InvalidConfiguration(msg) => {
                write!(f, "invalid configuration: {msg}")
            }
            GenerationError::PlacementInfeasible(kind) => {
                write!(f, "no eligible position for element kind \"{kind}\"")
            }
            GenerationError::ConnectivityFailure => {
                write!(f, "could not produce a single connected block group")
            }
        }
    }
}

impl Error for GenerationError {}

/// A fully generated level.
///
/// The level is immutable from the engine's perspective. An editor may
/// mutate a cloned board, after which the structural invariants are no
/// longer guaranteed; [`validate_invariants`] re-checks them before the
/// board is exported or fed back into generation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GeneratedLevel {
    /// Identifier, unique per generation call.
    pub id: String,

    /// Echo of the input configuration.
    pub config: LevelConfig,

    /// The generated board.
    pub board: Board,

    /// Collection targets, one per selected color, shipped empty.
    pub containers: Vec<Container>,

    /// Difficulty score in `0..100`.
    pub difficulty_score: f32,

    /// Result of the solvability feasibility check. An unsolvable level is
    /// still structurally valid; the caller decides whether to keep it.
    pub solvable: bool,

    /// Generation time.
    pub timestamp: DateTime<Utc>,

    /// Free-text note about how the level was produced.
    pub rationale: Option<String>,
}

/// Cell accounting derived from a configuration.
struct CellBudget {
    /// Content size per requested pipe.
    pipe_sizes: Vec<usize>,

    /// Number of plain colored block cells.
    plain: usize,

    /// Number of grid cells the layout must claim.
    claim: usize,
}

/// The board generator.
///
/// The object can be reused for several generation calls; after each call
/// it exposes the number of layout attempts and the duration of the last
/// generation.
pub struct BoardGenerator {
    /// Number of layout attempts used by the last generation.
    pub iteration: usize,

    /// Duration in seconds of the last generation.
    pub duration: f32,

    /// Time when the last generation started.
    start: Instant,
}

impl Default for BoardGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardGenerator {
    /// Create the object.
    pub fn new() -> Self {
        Self {
            iteration: 0,
            duration: 0.0,
            start: Instant::now(),
        }
    }

    /// Generate a level for the given configuration.
    ///
    /// # Errors
    ///
    /// [`GenerationError::InvalidConfiguration`] when the input is
    /// arithmetically infeasible,
    /// [`GenerationError::PlacementInfeasible`] when an element kind found
    /// no eligible position within the retry budget, and
    /// [`GenerationError::ConnectivityFailure`] when no single-component
    /// layout was found within the retry budget.
    pub fn generate(&mut self, config: &LevelConfig) -> Result<GeneratedLevel, GenerationError> {
        self.iteration = 0;
        self.duration = 0.0;
        self.start = Instant::now();

        validate_config(config)?;
        let budget: CellBudget = plan_budget(config)?;
        debug!(
            "budget: plain = {}, claim = {}, pipe sizes = {:?}",
            budget.plain, budget.claim, budget.pipe_sizes
        );

        let mut rng = rand::rng();
        let result: Result<GeneratedLevel, GenerationError> =
            self.run_attempts(config, &budget, &mut rng);
        self.duration = self.start.elapsed().as_secs_f32();
        debug!(
            "Iterations = {}  Duration = {}",
            self.iteration, self.duration
        );
        result
    }

    /// Run the layout/placement/coloring attempts.
    fn run_attempts(
        &mut self,
        config: &LevelConfig,
        budget: &CellBudget,
        rng: &mut impl Rng,
    ) -> Result<GeneratedLevel, GenerationError> {
        // When every attempt died on element placement, the failure is
        // reported as infeasible placement rather than as a connectivity
        // problem.
        let mut last_placement: Option<ElementKind> = None;

        for attempt in 1..=MAX_LAYOUT_ATTEMPTS {
            self.iteration = attempt;
            debug!("== layout attempt {attempt}");

            let positions: Option<Vec<(usize, usize)>> = match config.generation_mode {
                GenerationMode::Random => {
                    layout::random_layout(config.width, config.height, budget.claim, rng)
                }
                GenerationMode::Symmetric => {
                    layout::symmetric_layout(config.width, config.height, budget.claim, rng)
                }
            };
            let Some(positions) = positions else {
                continue;
            };

            let mut board: Board = Board::new(config.width, config.height);
            for &(x, y) in &positions {
                board.set(
                    x,
                    y,
                    Cell {
                        kind: CellKind::Block,
                        color: None,
                        element: None,
                    },
                );
            }
            if !is_single_component(&board) {
                debug!("    layout rejected: not a single component");
                continue;
            }

            match elements::place_structural(&mut board, config, &budget.pipe_sizes, rng) {
                Ok(()) => (),
                Err(PlacementError::NoEligiblePosition(kind)) => {
                    debug!("    structural placement failed for {kind}");
                    last_placement = Some(kind);
                    continue;
                }
            }

            if !assign_colors(&mut board, config, budget, rng) {
                debug!("    color assignment failed on this layout");
                continue;
            }

            match elements::place_attachments(&mut board, config, rng) {
                Ok(()) => (),
                Err(PlacementError::NoEligiblePosition(kind)) => {
                    debug!("    attachment placement failed for {kind}");
                    last_placement = Some(kind);
                    continue;
                }
            }

            if !validate_invariants(config, &board) {
                debug!("    final validation rejected the board");
                continue;
            }

            return Ok(self.assemble(config, board, attempt, rng));
        }

        match last_placement {
            Some(kind) => Err(GenerationError::PlacementInfeasible(kind)),
            None => Err(GenerationError::ConnectivityFailure),
        }
    }

    /// Build the [`GeneratedLevel`] around a validated board.
    fn assemble(
        &self,
        config: &LevelConfig,
        board: Board,
        attempts: usize,
        rng: &mut impl Rng,
    ) -> GeneratedLevel {
        let timestamp: DateTime<Utc> = Utc::now();
        let id: String = format!(
            "level-{}-{:08x}",
            timestamp.timestamp_millis(),
            rng.random::<u32>()
        );
        let containers: Vec<Container> = (1..=config.color_count as u32)
            .map(|i| Container::new(i, CONTAINER_CAPACITY))
            .collect();
        let score: f32 = difficulty_score(config, &board);
        let solvable: bool = is_solvable(&board);

        GeneratedLevel {
            id,
            config: config.clone(),
            board,
            containers,
            difficulty_score: score,
            solvable,
            timestamp,
            rationale: Some(format!(
                "{} layout accepted after {} attempt(s)",
                config.generation_mode, attempts
            )),
        }
    }
}

/// Generate a level with a one-shot [`BoardGenerator`].
pub fn generate(config: &LevelConfig) -> Result<GeneratedLevel, GenerationError> {
    BoardGenerator::new().generate(config)
}

/// Reject configurations that no layout could ever satisfy.
fn validate_config(config: &LevelConfig) -> Result<(), GenerationError> {
    let invalid = |msg: &str| Err(GenerationError::InvalidConfiguration(msg.to_string()));

    if config.width == 0 || config.height == 0 {
        return invalid("board dimensions must be at least 1x1");
    }
    if config.block_count > config.area() {
        return invalid("block count exceeds the board area");
    }
    if config.color_count == 0 {
        return invalid("at least one color must be selected");
    }
    if config.color_count != config.selected_colors.len() {
        return invalid("color count does not match the selected colors");
    }
    let mut seen: Vec<Color> = Vec::with_capacity(config.color_count);
    for &color in &config.selected_colors {
        if seen.contains(&color) {
            return invalid("duplicate selected color");
        }
        seen.push(color);
    }
    if config.requested(ElementKind::Key) > 0 {
        return invalid("keys are placed together with their locks and cannot be requested");
    }

    let pipes: usize = config.requested(ElementKind::Pipe);
    let locks: usize = config.requested(ElementKind::BlockLock);
    let consumed: usize = pipes + 2 * locks + config.attachment_count();
    if consumed > config.block_count {
        return invalid("element block consumption exceeds the block count");
    }
    Ok(())
}

/// Choose the pipe content sizes and derive the cell accounting.
fn plan_budget(config: &LevelConfig) -> Result<CellBudget, GenerationError> {
    let pipes: usize = config.requested(ElementKind::Pipe);
    let pins: usize = config.requested(ElementKind::PullPin);
    let locks: usize = config.requested(ElementKind::BlockLock);
    let attachments: usize = config.attachment_count();
    let area: usize = config.area();

    // Total pipe contents may range from one per pipe up to the block
    // budget left after the locks and the attachment hosts.
    let hi: usize = config.block_count - 2 * locks - attachments;
    // The claim is block_count - contents + pipes + pins; the grid bounds
    // it from above.
    let lo_fit: usize = (config.block_count + pipes + pins).saturating_sub(area);
    let lo: usize = lo_fit.max(pipes);

    let mut total: usize = if pipes == 0 {
        if lo_fit > 0 {
            return Err(GenerationError::InvalidConfiguration(
                "blocks and structural cells do not fit the board area".to_string(),
            ));
        }
        0
    } else {
        if lo > hi {
            return Err(GenerationError::InvalidConfiguration(
                "pipe contents cannot fit the block budget".to_string(),
            ));
        }
        (PREFERRED_PIPE_SIZE * pipes).clamp(lo, hi)
    };

    // On an even-width symmetric board every claimed cell is mirrored, so
    // the claim must be even. Pipe contents are the only adjustable term.
    if config.generation_mode == GenerationMode::Symmetric && config.width % 2 == 0 {
        let claim: usize = config.block_count - total + pipes + pins;
        if claim % 2 == 1 {
            if pipes > 0 && total + 1 <= hi {
                total += 1;
            } else if pipes > 0 && total > lo {
                total -= 1;
            } else {
                return Err(GenerationError::InvalidConfiguration(
                    "symmetric mode on an even width needs an even cell count".to_string(),
                ));
            }
        }
    }

    let plain: usize = config.block_count - total - 2 * locks;
    let claim: usize = plain + pipes + pins + 2 * locks;

    // Spread the total over the pipes, one extra content for the first
    // `total % pipes` of them.
    let mut pipe_sizes: Vec<usize> = Vec::with_capacity(pipes);
    if pipes > 0 {
        let base: usize = total / pipes;
        let extra: usize = total % pipes;
        for i in 0..pipes {
            pipe_sizes.push(if i < extra { base + 1 } else { base });
        }
    }

    Ok(CellBudget {
        pipe_sizes,
        plain,
        claim,
    })
}

/// Assign colors to the plain cells and the pipe contents.
///
/// Return false when the quotas cannot be realized on this layout (only
/// possible in symmetric mode); the caller retries with a fresh layout.
fn assign_colors(
    board: &mut Board,
    config: &LevelConfig,
    budget: &CellBudget,
    rng: &mut impl Rng,
) -> bool {
    let contents_total: usize = budget.pipe_sizes.iter().sum();
    let slots: usize = budget.plain + contents_total;
    if slots == 0 {
        return true;
    }

    let plain_cells: Vec<(usize, usize)> = board
        .block_positions()
        .into_iter()
        .filter(|&(x, y)| board.get(x, y).element.is_none())
        .collect();

    match config.generation_mode {
        GenerationMode::Random => {
            let quotas: Vec<(Color, usize)> =
                coloring::color_quotas(&config.selected_colors, slots, false);
            let mut pool: Vec<Color> = coloring::color_pool(&quotas);
            pool.shuffle(rng);

            for &(x, y) in &plain_cells {
                board.get_mut(x, y).color = pool.pop();
            }
            fill_pipe_contents(board, &mut pool);
            debug_assert!(pool.is_empty());
            true
        }
        GenerationMode::Symmetric => {
            // Mirrored plain cells are colored in pairs; center-column
            // cells and pipe contents are single slots.
            let mut pairs: Vec<(usize, usize)> = Vec::new();
            let mut centers: Vec<(usize, usize)> = Vec::new();
            for &(x, y) in &plain_cells {
                let mirror_x: usize = config.width - 1 - x;
                if x < mirror_x {
                    pairs.push((x, y));
                } else if x == mirror_x {
                    centers.push((x, y));
                }
            }
            let singles: usize = centers.len() + contents_total;

            let quotas: Vec<(Color, usize)> =
                coloring::color_quotas(&config.selected_colors, slots, singles == 0);
            let mut split: Option<Vec<(Color, usize, usize)>> =
                coloring::split_quotas_for_symmetry(&quotas, pairs.len(), singles);
            if split.is_none() {
                // Quotas in groups of 6 need fewer single slots for parity.
                let even_quotas: Vec<(Color, usize)> =
                    coloring::color_quotas(&config.selected_colors, slots, true);
                split = coloring::split_quotas_for_symmetry(&even_quotas, pairs.len(), singles);
            }
            let Some(split) = split else {
                return false;
            };

            let mut pair_pool: Vec<Color> = Vec::with_capacity(pairs.len());
            let mut single_pool: Vec<Color> = Vec::with_capacity(singles);
            for &(color, pair_units, single_units) in &split {
                pair_pool.extend(std::iter::repeat_n(color, pair_units));
                single_pool.extend(std::iter::repeat_n(color, single_units));
            }
            pair_pool.shuffle(rng);
            single_pool.shuffle(rng);

            for &(x, y) in &pairs {
                let color: Option<Color> = pair_pool.pop();
                board.get_mut(x, y).color = color;
                board.get_mut(config.width - 1 - x, y).color = color;
            }
            for &(x, y) in &centers {
                board.get_mut(x, y).color = single_pool.pop();
            }
            fill_pipe_contents(board, &mut single_pool);
            debug_assert!(pair_pool.is_empty() && single_pool.is_empty());
            true
        }
    }
}

/// Fill every pipe's contents from the color pool, in row-major pipe order.
fn fill_pipe_contents(board: &mut Board, pool: &mut Vec<Color>) {
    let pipe_positions: Vec<(usize, usize)> = board
        .block_positions()
        .into_iter()
        .filter(|&(x, y)| {
            matches!(&board.get(x, y).element, Some(Element::Pipe { .. }))
        })
        .collect();

    for (x, y) in pipe_positions {
        if let Some(Element::Pipe { size, contents, .. }) = &mut board.get_mut(x, y).element {
            for _ in 0..*size {
                if let Some(color) = pool.pop() {
                    contents.push(color);
                }
            }
        }
    }
}

/// Check the structural invariants of a board against its configuration.
///
/// The engine runs this on every candidate board before returning it; the
/// editor layer runs it again on boards it mutated, before they are
/// exported or fed back into generation.
pub fn validate_invariants(config: &LevelConfig, board: &Board) -> bool {
    // I1: exact dimensions
    if board.width() != config.width || board.height() != config.height {
        return false;
    }

    // I2: block accounting
    if counted_blocks(board) != config.block_count {
        return false;
    }

    // I3: per-color divisibility, whenever the slot total allows it at all
    let locks: usize = config.requested(ElementKind::BlockLock);
    let colorable: usize = config.block_count.saturating_sub(2 * locks);
    if colorable % 3 == 0 {
        let mut totals: HashMap<Color, usize> = HashMap::new();
        for cell in board.rows().flatten() {
            if let Some(color) = cell.color {
                *totals.entry(color).or_insert(0) += 1;
            }
            if let Some(Element::Pipe { contents, .. }) = &cell.element {
                for &color in contents {
                    *totals.entry(color).or_insert(0) += 1;
                }
            }
        }
        if totals.values().any(|&total| total % 3 != 0) {
            return false;
        }
    }

    // I4: exact element instance counts, one key per lock
    let mut counts: HashMap<ElementKind, usize> = HashMap::new();
    for cell in board.rows().flatten() {
        if let Some(element) = &cell.element {
            *counts.entry(element.kind()).or_insert(0) += 1;
        }
    }
    for (&kind, &requested) in &config.elements {
        if counts.get(&kind).copied().unwrap_or(0) != requested {
            return false;
        }
    }
    if counts.get(&ElementKind::Key).copied().unwrap_or(0)
        != counts.get(&ElementKind::BlockLock).copied().unwrap_or(0)
    {
        return false;
    }

    // I5: single component
    if !is_single_component(board) {
        return false;
    }

    // I6: vertical mirror in symmetric mode
    if config.generation_mode == GenerationMode::Symmetric {
        for y in 0..config.height {
            for x in 0..config.width / 2 {
                let cell: &Cell = board.get(x, y);
                let mirror: &Cell = board.get(config.width - 1 - x, y);
                if cell.kind != mirror.kind || cell.color != mirror.color {
                    return false;
                }
            }
        }
    }
    true
}
