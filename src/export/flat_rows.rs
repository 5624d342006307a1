/*
flat_rows.rs

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

//! Flat row export.
//!
//! [`to_flat_rows`] serializes a board into one delimited string per board
//! row: cell records joined by `|`, and inside a record the fields joined
//! by `,` in a fixed order:
//!
//! ```text
//! kind , color , element , direction , size , contents , pair , gate , uses , distance
//! ```
//!
//! An absent field serializes as the explicit `-` null marker, never by
//! omission, so every record has the same column count across the whole
//! export. Pipe contents are joined with `+` inside their field. The
//! delimiter characters (`\`, `,`, `|`, `+`) and a literal `-` are
//! backslash-escaped inside field values, so a row always stays a valid
//! single delimited record.
//!
//! [`parse_flat_rows`] reverses the serialization field by field; the
//! round trip loses no information for any element-specific field.

use std::error::Error;
use std::fmt;

use crate::generator::board::{Board, Cell, CellKind, Color, Direction, Element, ElementKind};

/// Number of fields in a cell record.
const FIELDS_PER_CELL: usize = 10;

/// The null marker for absent fields.
const NULL_MARKER: &str = "-";

/// Type of errors raised when parsing a flat row export.
#[derive(Debug, PartialEq)]
pub enum FlatRowsError {
    /// A record does not have exactly [`FIELDS_PER_CELL`] fields.
    WrongFieldCount(usize),

    /// A field holds a token that does not belong to its domain.
    UnknownToken(String),

    /// The rows do not all have the same number of records.
    RaggedRows,
}

impl fmt::Display for FlatRowsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FlatRowsError::WrongFieldCount(n) => {
                write!(f, "cell record with {n} fields instead of {FIELDS_PER_CELL}")
            }
            FlatRowsError::UnknownToken(token) => write!(f, "unknown token \"{token}\""),
            FlatRowsError::RaggedRows => write!(f, "rows with different record counts"),
        }
    }
}

impl Error for FlatRowsError {}

/// Serialize the board into one delimited string per board row.
pub fn to_flat_rows(board: &Board) -> Vec<String> {
    board
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| cell_record(cell).join(","))
                .collect::<Vec<String>>()
                .join("|")
        })
        .collect()
}

/// Rebuild a board from its flat row export.
///
/// # Errors
///
/// Return a [`FlatRowsError`] for malformed input: wrong field counts,
/// unknown tokens, or rows of different lengths.
pub fn parse_flat_rows(rows: &[String]) -> Result<Board, FlatRowsError> {
    let mut cells: Vec<Vec<Cell>> = Vec::with_capacity(rows.len());
    let mut width: Option<usize> = None;

    for row in rows {
        let records: Vec<String> = split_escaped(row, '|');
        match width {
            Some(w) if w != records.len() => return Err(FlatRowsError::RaggedRows),
            None => width = Some(records.len()),
            _ => (),
        }
        let mut row_cells: Vec<Cell> = Vec::with_capacity(records.len());
        for record in &records {
            row_cells.push(parse_record(record)?);
        }
        cells.push(row_cells);
    }
    Ok(Board::from_cells(cells))
}

/// Serialize one cell into its fixed field list.
fn cell_record(cell: &Cell) -> [String; FIELDS_PER_CELL] {
    let mut fields: [String; FIELDS_PER_CELL] = std::array::from_fn(|_| NULL_MARKER.to_string());

    fields[0] = escape_field(cell.kind.as_str());
    if let Some(color) = cell.color {
        fields[1] = escape_field(color.as_str());
    }
    match &cell.element {
        None => (),
        Some(element) => {
            fields[2] = escape_field(element.kind().as_str());
            match element {
                Element::Pipe {
                    direction,
                    size,
                    contents,
                } => {
                    fields[3] = escape_field(direction.as_str());
                    fields[4] = size.to_string();
                    fields[5] = contents
                        .iter()
                        .map(|c| escape_field(c.as_str()))
                        .collect::<Vec<String>>()
                        .join("+");
                }
                Element::Barrel => (),
                Element::Ice { uses } => fields[8] = uses.to_string(),
                Element::Lock { pair } | Element::Key { pair } => fields[6] = pair.to_string(),
                Element::PullPin {
                    direction,
                    gate_size,
                } => {
                    fields[3] = escape_field(direction.as_str());
                    fields[7] = gate_size.to_string();
                }
                Element::Bomb { uses } => fields[8] = uses.to_string(),
                Element::Moving {
                    direction,
                    distance,
                } => {
                    fields[3] = escape_field(direction.as_str());
                    fields[9] = distance.to_string();
                }
            }
        }
    }
    fields
}

/// Parse one cell record back into a cell.
fn parse_record(record: &str) -> Result<Cell, FlatRowsError> {
    let fields: Vec<String> = split_escaped(record, ',');
    if fields.len() != FIELDS_PER_CELL {
        return Err(FlatRowsError::WrongFieldCount(fields.len()));
    }

    let unknown = |s: &str| FlatRowsError::UnknownToken(s.to_string());

    let kind_token: String = unescape_field(&fields[0]);
    let kind: CellKind = CellKind::from_name(&kind_token).ok_or_else(|| unknown(&kind_token))?;

    let color: Option<Color> = match fields[1].as_str() {
        NULL_MARKER => None,
        raw => {
            let token: String = unescape_field(raw);
            Some(Color::from_name(&token).ok_or_else(|| unknown(&token))?)
        }
    };

    let element: Option<Element> = match fields[2].as_str() {
        NULL_MARKER => None,
        raw => {
            let token: String = unescape_field(raw);
            let element_kind: ElementKind =
                ElementKind::from_name(&token).ok_or_else(|| unknown(&token))?;
            Some(parse_element(element_kind, &fields)?)
        }
    };

    Ok(Cell {
        kind,
        color,
        element,
    })
}

/// Parse the element payload fields for the given kind.
fn parse_element(kind: ElementKind, fields: &[String]) -> Result<Element, FlatRowsError> {
    let unknown = |s: &str| FlatRowsError::UnknownToken(s.to_string());

    let direction = |raw: &str| -> Result<Direction, FlatRowsError> {
        let token: String = unescape_field(raw);
        Direction::from_name(&token).ok_or_else(|| unknown(&token))
    };
    let number = |raw: &str| -> Result<usize, FlatRowsError> {
        raw.parse::<usize>().map_err(|_| unknown(raw))
    };

    match kind {
        ElementKind::Pipe => {
            let contents: Vec<Color> = if fields[5].is_empty() {
                Vec::new()
            } else {
                split_escaped(&fields[5], '+')
                    .iter()
                    .map(|raw| {
                        let token: String = unescape_field(raw);
                        Color::from_name(&token).ok_or_else(|| unknown(&token))
                    })
                    .collect::<Result<Vec<Color>, FlatRowsError>>()?
            };
            Ok(Element::Pipe {
                direction: direction(&fields[3])?,
                size: number(&fields[4])?,
                contents,
            })
        }
        ElementKind::Barrel => Ok(Element::Barrel),
        ElementKind::Ice => Ok(Element::Ice {
            uses: number(&fields[8])? as u8,
        }),
        ElementKind::BlockLock => Ok(Element::Lock {
            pair: number(&fields[6])? as u32,
        }),
        ElementKind::Key => Ok(Element::Key {
            pair: number(&fields[6])? as u32,
        }),
        ElementKind::PullPin => Ok(Element::PullPin {
            direction: direction(&fields[3])?,
            gate_size: number(&fields[7])? as u8,
        }),
        ElementKind::Bomb => Ok(Element::Bomb {
            uses: number(&fields[8])? as u8,
        }),
        ElementKind::Moving => Ok(Element::Moving {
            direction: direction(&fields[3])?,
            distance: number(&fields[9])? as u8,
        }),
    }
}

/// Backslash-escape the delimiter characters and a literal null marker.
fn escape_field(value: &str) -> String {
    let mut escaped: String = String::with_capacity(value.len());
    if value == NULL_MARKER {
        escaped.push('\\');
        escaped.push_str(value);
        return escaped;
    }
    for ch in value.chars() {
        if matches!(ch, '\\' | ',' | '|' | '+') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Reverse [`escape_field`].
fn unescape_field(value: &str) -> String {
    let mut out: String = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Split on the delimiter, honoring backslash escapes.
fn split_escaped(value: &str, delimiter: char) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut current: String = String::new();
    let mut escaped: bool = false;

    for ch in value.chars() {
        if escaped {
            current.push('\\');
            current.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == delimiter {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    if escaped {
        current.push('\\');
    }
    parts.push(current);
    parts
}
