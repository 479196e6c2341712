/*
 * error.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Duke.
 *
 * Duke is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This file is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this file.  If not, see <http://www.gnu.org/licenses/>.
 */

//! JSON decode/encode errors.

use std::fmt;

use thiserror::Error;

/// The six shapes a JSON value can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Boolean,
    Number,
    Null,
    String,
    Object,
    Array,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Boolean => "boolean",
            Shape::Number => "number",
            Shape::Null => "null",
            Shape::String => "string",
            Shape::Object => "object",
            Shape::Array => "array",
        };
        f.write_str(name)
    }
}

/// Position within the input text for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Byte offset from the start of the input.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Location {
    /// Compute line and column for a byte offset into `text`.
    pub(crate) fn at(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let mut line = 1;
        let mut line_start = 0;
        for (i, b) in text.as_bytes()[..offset].iter().enumerate() {
            if *b == b'\n' {
                line += 1;
                line_start = i + 1;
            }
        }
        let column = text
            .get(line_start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(offset - line_start)
            + 1;
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Error during JSON decoding or encoding. Every variant is fatal to the current call.
#[derive(Debug, Error)]
pub enum JsonError {
    /// Malformed input text.
    #[error("{message} at {location}")]
    Parse { message: String, location: Location },

    /// A handler was given a value shape it does not accept.
    #[error("expected {expected}, found {actual}")]
    UnsupportedShape { expected: String, actual: Shape },

    /// An object handler finished without seeing a field it requires.
    #[error("missing required field \"{field}\"")]
    MissingField { field: String },

    /// Domain validation failed while building a value.
    #[error("{message}")]
    Invalid { message: String },

    /// No writer was registered for the runtime type of a value being encoded.
    #[error("no JSON writer registered for type {type_name}")]
    UnregisteredType { type_name: &'static str },

    /// NaN and the infinities have no JSON representation.
    #[error("cannot encode non-finite number {0}")]
    NonFiniteNumber(f64),
}

impl JsonError {
    pub(crate) fn parse(message: impl Into<String>, location: Location) -> Self {
        JsonError::Parse {
            message: message.into(),
            location,
        }
    }

    pub fn unsupported(expected: impl Into<String>, actual: Shape) -> Self {
        JsonError::UnsupportedShape {
            expected: expected.into(),
            actual,
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        JsonError::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        JsonError::Invalid {
            message: message.into(),
        }
    }

    /// Location of a parse error, if this is one.
    pub fn location(&self) -> Option<Location> {
        match self {
            JsonError::Parse { location, .. } => Some(*location),
            _ => None,
        }
    }
}

/// Unwrap an accumulated field at `handle_end()`, failing with `MissingField` if it was never seen.
pub fn required<T>(field: &str, value: Option<T>) -> Result<T, JsonError> {
    value.ok_or_else(|| JsonError::missing_field(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_counts_lines_and_chars() {
        let text = "{\n  \"é\": x}";
        let offset = text.find('x').unwrap();
        let loc = Location::at(text, offset);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 8);
        assert_eq!(loc.offset, offset);
    }

    #[test]
    fn messages() {
        let e = JsonError::unsupported("string", Shape::Number);
        assert_eq!(e.to_string(), "expected string, found number");
        let e = required::<bool>("description", None).unwrap_err();
        assert_eq!(e.to_string(), "missing required field \"description\"");
        let e = JsonError::parse("unexpected '}'", Location::at("{\"a\": }", 6));
        assert_eq!(e.to_string(), "unexpected '}' at line 1, column 7");
    }
}
