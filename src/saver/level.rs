/*
level.rs

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

//! Save and restore a generated level as a JSON file.
//!
//! The saved object is a serialization of the
//! [`crate::generator::engine::GeneratedLevel`] object in JSON format by
//! using [`serde`]. Level designers save a generated board to disk, edit or
//! inspect it later, and restore it without regenerating.

use log::debug;
use std::error::Error;
use std::fs::{File, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use crate::generator::engine::GeneratedLevel;

/// Object to save and restore a generated level.
pub struct SaverLevel {
    /// Absolute path to the save file.
    save_file: PathBuf,
}

impl SaverLevel {
    /// Create a [`SaverLevel`] object.
    ///
    /// The provided [`PathBuf`] is the path of the JSON file to read and
    /// write.
    pub fn new(save_file: PathBuf) -> Self {
        debug!("Level save file: {save_file:?}");
        SaverLevel { save_file }
    }

    /// Retrieve the saved [`GeneratedLevel`] object.
    ///
    /// Return the [`GeneratedLevel`] object or None if there is no saved
    /// level.
    pub fn get_level(&self) -> Result<Option<GeneratedLevel>, Box<dyn Error>> {
        let file: File;
        match File::open(&self.save_file) {
            Ok(f) => file = f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(None),
                _ => return Err(Box::new(error)),
            },
        }
        let reader: BufReader<File> = BufReader::new(file);
        let level: GeneratedLevel = serde_json::from_reader(reader)?;
        Ok(Some(level))
    }

    /// Save the provided [`GeneratedLevel`] object.
    pub fn save_level(&self, level: &GeneratedLevel) -> Result<(), Box<dyn Error>> {
        let file: File = File::create(&self.save_file)?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        serde_json::to_writer(&mut writer, level)?;
        writer.flush()?;
        Ok(())
    }

    /// Delete the saved level.
    pub fn delete_save(&self) {
        let _ = remove_file(&self.save_file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::board::Color;
    use crate::generator::engine::generate;
    use crate::generator::level_config::LevelConfig;
    use std::env;

    #[test]
    fn save_and_restore_roundtrip() {
        let config: LevelConfig =
            LevelConfig::new(6, 6, 12, &[Color::Red, Color::Blue, Color::Green]);
        let level: GeneratedLevel = generate(&config).unwrap();

        let mut path: PathBuf = env::temp_dir();
        path.push(format!("tribar-saver-test-{}.json", level.id));
        let saver: SaverLevel = SaverLevel::new(path);

        saver.save_level(&level).expect("save must succeed");
        let restored: GeneratedLevel = saver
            .get_level()
            .expect("load must succeed")
            .expect("a level must be present");
        assert_eq!(restored, level);

        saver.delete_save();
        assert!(saver.get_level().unwrap().is_none());
    }

    #[test]
    fn missing_file_yields_none() {
        let mut path: PathBuf = env::temp_dir();
        path.push("tribar-saver-test-missing.json");
        let saver: SaverLevel = SaverLevel::new(path);
        saver.delete_save();
        assert!(saver.get_level().unwrap().is_none());
    }
}
