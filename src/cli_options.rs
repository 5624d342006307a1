/*
cli_options.rs

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

//! Process command-line options.
//!
//! These options are intended for level designers. Tribar generates random
//! boards from structural parameters and prints them in one of the export
//! formats, so designers can paste the result into their level files or
//! archive it as JSON.
//!
//! # Examples
//!
//! List the available colors and difficulty levels:
//!
//! ```text
//! $ tribar --ls
//! Colors: red blue green yellow purple orange pink cyan
//! Difficulty levels: normal hard super-hard
//! ```
//!
//! Generate two 9x10 boards with 27 blocks, two pipes, and one lock pair,
//! and print the flat row export:
//!
//! ```text
//! $ tribar -c 2 --pipes 2 --locks 1 --export rows
//! ```

use clap::{Parser, ValueEnum};
use log::debug;
use std::env;
use std::path::PathBuf;

use crate::config::COPYRIGHT_NOTICE;
use crate::export::color_bars::{self, ColorBarSequence};
use crate::export::flat_rows;
use crate::generator::board::{Color, ElementKind};
use crate::generator::engine::{GeneratedLevel, GenerationError};
use crate::generator::fallback::GeneratorChain;
use crate::generator::level_config::{Difficulty, GenerationMode, LevelConfig};
use crate::saver::level::SaverLevel;

/// Export formats.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    /// Flat delimited cell records, one line per board row.
    Rows,

    /// Color-bar sequence summary.
    Bars,

    /// Full level as JSON.
    Json,
}

/// Generate random Tribar boards for level designers.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// List the available colors and difficulty levels
    #[arg(short, long, default_value_t = false)]
    ls: bool,

    /// Board width in cells
    #[arg(short = 'W', long, default_value_t = 9)]
    width: usize,

    /// Board height in cells
    #[arg(short = 'H', long, default_value_t = 10)]
    height: usize,

    /// Number of blocks to place
    #[arg(short, long, default_value_t = 27)]
    blocks: usize,

    /// Number of colors to use, taken in order from the color list
    #[arg(short = 'n', long, default_value_t = 3)]
    colors: usize,

    /// Layout mode
    #[arg(value_enum, short, long, default_value_t = GenerationMode::Random)]
    mode: GenerationMode,

    /// Difficulty level
    #[arg(value_enum, short = 'f', long, default_value_t = Difficulty::Normal)]
    difficulty: Difficulty,

    /// Number of pipes
    #[arg(long, default_value_t = 0)]
    pipes: usize,

    /// Number of lock/key pairs
    #[arg(long, default_value_t = 0)]
    locks: usize,

    /// Number of pull pins
    #[arg(long, default_value_t = 0)]
    pins: usize,

    /// Number of ice blocks
    #[arg(long, default_value_t = 0)]
    ice: usize,

    /// Number of bombs
    #[arg(long, default_value_t = 0)]
    bombs: usize,

    /// Number of moving blocks
    #[arg(long, default_value_t = 0)]
    moving: usize,

    /// Number of barrels
    #[arg(long, default_value_t = 0)]
    barrels: usize,

    /// Number of levels to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Export format to print for each generated level
    #[arg(value_enum, short, long, default_value_t = ExportFormat::Rows)]
    export: ExportFormat,

    /// Save the last generated level to this JSON file
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// Print some statistics after generating the levels
    #[arg(short = 'S', long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Build the level configuration from the command-line options.
fn build_config(args: &Args) -> LevelConfig {
    let color_count: usize = args.colors.clamp(1, Color::ALL.len());
    let mut config: LevelConfig = LevelConfig::new(
        args.width,
        args.height,
        args.blocks,
        &Color::ALL[..color_count],
    );
    config.generation_mode = args.mode;
    config.difficulty = args.difficulty;
    config.request_element(ElementKind::Pipe, args.pipes);
    config.request_element(ElementKind::BlockLock, args.locks);
    config.request_element(ElementKind::PullPin, args.pins);
    config.request_element(ElementKind::Ice, args.ice);
    config.request_element(ElementKind::Bomb, args.bombs);
    config.request_element(ElementKind::Moving, args.moving);
    config.request_element(ElementKind::Barrel, args.barrels);
    config
}

/// Print one generated level in the requested format.
fn print_level(level: &GeneratedLevel, format: ExportFormat) {
    match format {
        ExportFormat::Rows => {
            for row in flat_rows::to_flat_rows(&level.board) {
                println!("{row}");
            }
        }
        ExportFormat::Bars => {
            let sequence: ColorBarSequence = color_bars::color_bar_sequence(level);
            println!(
                "blocks = {}  bars = {}  efficiency = {:.3}",
                sequence.total_blocks, sequence.total_bars, sequence.efficiency
            );
            for entry in &sequence.color_summary {
                println!("  {} x {}", entry.color, entry.count);
            }
            for bar in &sequence.bars {
                println!("  bar {} = {}", bar.index, bar.color);
            }
        }
        ExportFormat::Json => match serde_json::to_string_pretty(level) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Cannot serialize the level: {e}"),
        },
    }
}

/// Parse and process command-line options. Return the process exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        println!("DEBUG");
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    //
    // List the colors and the difficulty levels
    //
    if args.ls {
        let names: Vec<&str> = Color::ALL.iter().map(|c| c.as_str()).collect();
        println!("Colors: {}", names.join(" "));
        println!("Difficulty levels: normal hard super-hard");
        return 0;
    }

    let config: LevelConfig = build_config(&args);
    let mut chain: GeneratorChain = GeneratorChain::with_engine();

    let mut total: f32 = 0.0;
    let mut max: f32 = 0.0;
    let mut errors: usize = 0;
    let mut last_level: Option<GeneratedLevel> = None;
    let mut i: usize = 0;

    while i < args.count {
        debug!("Iteration {i}");

        match chain.generate(&config) {
            Ok(level) => {
                println!(
                    "# {}  score = {:.1}  solvable = {}",
                    level.id, level.difficulty_score, level.solvable
                );
                print_level(&level, args.export);
                total += level.difficulty_score;
                if level.difficulty_score > max {
                    max = level.difficulty_score;
                }
                last_level = Some(level);
                i += 1;
            }
            Err(e @ GenerationError::InvalidConfiguration(_)) => {
                // Not retryable: changing the input is up to the user.
                eprintln!("Error: {e}");
                return 1;
            }
            Err(e) => {
                errors += 1;
                debug!("ERROR generating level: {e}");
                if errors >= args.count * 10 {
                    eprintln!("Error: {e}");
                    return 1;
                }
            }
        }
    }

    if args.summary {
        println!(
            "
            levels = {}
            errors = {}
         avg score = {}
         max score = {}",
            args.count,
            errors,
            total / args.count.max(1) as f32,
            max
        );
    }

    if let Some(path) = args.save {
        if let Some(level) = &last_level {
            let saver: SaverLevel = SaverLevel::new(path);
            match saver.save_level(level) {
                Ok(()) => println!("Saved {}", level.id),
                Err(e) => {
                    eprintln!("Cannot save the level: {e}");
                    return 1;
                }
            }
        }
    }
    0
}
