/*
 * indent.rs
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

//! Indentation config for pretty-printed JSON output.

use bytes::{BufMut, BytesMut};

/// Indentation character and count per nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentConfig {
    indent_char: char,
    indent_count: usize,
}

impl IndentConfig {
    /// `indent_char` must be ' ' or '\t'; `indent_count` must be positive.
    pub fn new(indent_char: char, indent_count: usize) -> Option<Self> {
        if (indent_char != ' ' && indent_char != '\t') || indent_count == 0 {
            return None;
        }
        Some(Self {
            indent_char,
            indent_count,
        })
    }

    pub fn tabs() -> Self {
        Self {
            indent_char: '\t',
            indent_count: 1,
        }
    }

    pub fn spaces(count: usize) -> Self {
        Self {
            indent_char: ' ',
            indent_count: count.max(1),
        }
    }

    /// Append a newline followed by the indent for `depth`.
    pub(crate) fn newline(&self, buf: &mut BytesMut, depth: usize) {
        buf.put_u8(b'\n');
        // Both allowed indent chars are single-byte.
        buf.put_bytes(self.indent_char as u8, self.indent_count * depth);
    }
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self::spaces(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_other_chars() {
        assert!(IndentConfig::new('x', 2).is_none());
        assert!(IndentConfig::new(' ', 0).is_none());
        assert_eq!(IndentConfig::new(' ', 2), Some(IndentConfig::default()));
    }

    #[test]
    fn newline_per_depth() {
        let mut buf = BytesMut::new();
        IndentConfig::tabs().newline(&mut buf, 2);
        IndentConfig::spaces(3).newline(&mut buf, 1);
        assert_eq!(&buf[..], b"\n\t\t\n   ");
    }
}
