/*
 * parser.rs
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

//! Recursive-descent JSON reader driving typed handlers.
//!
//! The reader is the only code that looks at raw text. At each value it asks the current
//! [`ValueHandler`] for the matching capability; for containers it feeds each field or
//! element to the handler's accumulator through a [`Receiver`], then returns whatever
//! `handle_end()` produced. The first malformed token aborts the whole decode.

use crate::json::builders::Ignore;
use crate::json::error::{JsonError, Location};
use crate::json::handler::ValueHandler;

const BOM: &str = "\u{feff}";

/// Reader limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed nesting of objects and arrays.
    pub max_depth: usize,
}

impl ParseOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// The next JSON value in the input. Consumed by exactly one `receive()`; a receiver that is
/// dropped unused makes the reader skip the value.
pub struct Receiver<'r, 'a> {
    reader: &'r mut Reader<'a>,
}

impl Receiver<'_, '_> {
    /// Decode the value with `handler`.
    pub fn receive<H: ValueHandler + ?Sized>(self, handler: &H) -> Result<H::Output, JsonError> {
        self.reader.pending = false;
        self.reader.read_value(handler)
    }

    /// Read past the value without building anything. The value must still be well-formed.
    pub fn skip(self) -> Result<(), JsonError> {
        self.receive(&Ignore)
    }
}

/// Decode one JSON document from `text` with `handler`.
pub fn decode<H: ValueHandler + ?Sized>(text: &str, handler: &H) -> Result<H::Output, JsonError> {
    decode_with(text, &ParseOptions::default(), handler)
}

/// Decode one JSON document from UTF-8 bytes.
pub fn decode_slice<H: ValueHandler + ?Sized>(
    bytes: &[u8],
    handler: &H,
) -> Result<H::Output, JsonError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => decode(text, handler),
        Err(e) => {
            let valid = std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default();
            let err = JsonError::parse("invalid UTF-8", Location::at(valid, valid.len()));
            log::debug!("JSON decode failed: {}", err);
            Err(err)
        }
    }
}

/// Decode one JSON document from `text` with explicit reader limits.
pub fn decode_with<H: ValueHandler + ?Sized>(
    text: &str,
    options: &ParseOptions,
    handler: &H,
) -> Result<H::Output, JsonError> {
    log::trace!("decoding {} bytes of JSON", text.len());
    let mut reader = Reader::new(text, options);
    let result = reader.read_document(handler);
    if let Err(ref e) = result {
        log::debug!("JSON decode failed: {}", e);
    }
    result
}

/// Scan state over one input document.
pub(crate) struct Reader<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
    max_depth: usize,
    /// A receiver was handed to a handler and has not been consumed.
    pending: bool,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str, options: &ParseOptions) -> Self {
        Self {
            text,
            pos: 0,
            depth: 0,
            max_depth: options.max_depth,
            pending: false,
        }
    }

    fn read_document<H: ValueHandler + ?Sized>(
        &mut self,
        handler: &H,
    ) -> Result<H::Output, JsonError> {
        if self.text.starts_with(BOM) {
            self.pos = BOM.len();
        }
        let value = self.read_value(handler)?;
        self.skip_whitespace();
        if self.pos < self.text.len() {
            return Err(self.error("trailing characters after JSON value"));
        }
        Ok(value)
    }

    fn read_value<H: ValueHandler + ?Sized>(
        &mut self,
        handler: &H,
    ) -> Result<H::Output, JsonError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'{') => self.read_object(handler),
            Some(b'[') => self.read_array(handler),
            Some(b'"') => {
                let s = self.read_string()?;
                handler.handle_string(s)
            }
            Some(b't') => {
                self.read_literal("true")?;
                handler.handle_boolean(true)
            }
            Some(b'f') => {
                self.read_literal("false")?;
                handler.handle_boolean(false)
            }
            Some(b'n') => {
                self.read_literal("null")?;
                handler.handle_null()
            }
            Some(b'-' | b'0'..=b'9') => {
                let n = self.read_number()?;
                handler.handle_number(n)
            }
            Some(_) => Err(self.unexpected()),
        }
    }

    fn read_object<H: ValueHandler + ?Sized>(
        &mut self,
        handler: &H,
    ) -> Result<H::Output, JsonError> {
        self.enter()?;
        let mut object = handler.handle_object()?;
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.depth -= 1;
            return object.handle_end();
        }
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'"') => {}
                Some(b'}') => return Err(self.error("trailing comma before '}'")),
                Some(_) => return Err(self.error("expected string key")),
                None => return Err(self.error("unexpected end of input")),
            }
            let name = self.read_string()?;
            self.skip_whitespace();
            self.expect(b':')?;
            self.pending = true;
            object.handle_field(name, Receiver { reader: self })?;
            if self.pending {
                self.pending = false;
                self.read_value(&Ignore)?;
            }
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.error("expected ',' or '}'")),
                None => return Err(self.error("unclosed object")),
            }
        }
        self.depth -= 1;
        object.handle_end()
    }

    fn read_array<H: ValueHandler + ?Sized>(
        &mut self,
        handler: &H,
    ) -> Result<H::Output, JsonError> {
        self.enter()?;
        let mut array = handler.handle_array()?;
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.depth -= 1;
            return array.handle_end();
        }
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b']') {
                return Err(self.error("trailing comma before ']'"));
            }
            self.pending = true;
            array.handle_element(Receiver { reader: self })?;
            if self.pending {
                self.pending = false;
                self.read_value(&Ignore)?;
            }
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.error("expected ',' or ']'")),
                None => return Err(self.error("unclosed array")),
            }
        }
        self.depth -= 1;
        array.handle_end()
    }

    /// Step over an opening bracket, enforcing the nesting limit.
    fn enter(&mut self) -> Result<(), JsonError> {
        if self.depth >= self.max_depth {
            return Err(self.error(format!("nesting deeper than {} levels", self.max_depth)));
        }
        self.depth += 1;
        self.pos += 1;
        Ok(())
    }

    /// Read a string starting at the opening quote, decoding escapes.
    fn read_string(&mut self) -> Result<String, JsonError> {
        let open = self.pos;
        self.pos += 1;
        let text = self.text;
        let bytes = text.as_bytes();
        let mut out = String::new();
        let mut run = self.pos;
        loop {
            let Some(&b) = bytes.get(self.pos) else {
                return Err(self.error_at("unterminated string", open));
            };
            match b {
                b'"' => {
                    out.push_str(&text[run..self.pos]);
                    self.pos += 1;
                    return Ok(out);
                }
                b'\\' => {
                    out.push_str(&text[run..self.pos]);
                    self.pos += 1;
                    let ch = self.read_escape()?;
                    out.push(ch);
                    run = self.pos;
                }
                0x00..=0x1f => return Err(self.error("control character in string")),
                _ => self.pos += 1,
            }
        }
    }

    /// Decode the escape after a backslash.
    fn read_escape(&mut self) -> Result<char, JsonError> {
        let Some(&c) = self.text.as_bytes().get(self.pos) else {
            return Err(self.error("unterminated string"));
        };
        self.pos += 1;
        Ok(match c {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => {
                let start = self.pos - 2;
                let unit = self.read_hex4()?;
                match unit {
                    0xd800..=0xdbff => {
                        if !self.text[self.pos..].starts_with("\\u") {
                            return Err(self.error_at("unpaired surrogate in \\u escape", start));
                        }
                        self.pos += 2;
                        let low = self.read_hex4()?;
                        if !(0xdc00..=0xdfff).contains(&low) {
                            return Err(self.error_at("unpaired surrogate in \\u escape", start));
                        }
                        let code = 0x10000 + ((unit - 0xd800) << 10) + (low - 0xdc00);
                        char::from_u32(code)
                            .ok_or_else(|| self.error_at("invalid Unicode code point", start))?
                    }
                    0xdc00..=0xdfff => {
                        return Err(self.error_at("unpaired surrogate in \\u escape", start));
                    }
                    _ => char::from_u32(unit)
                        .ok_or_else(|| self.error_at("invalid Unicode code point", start))?,
                }
            }
            _ => {
                self.pos -= 1;
                let shown = self.text[self.pos..].chars().next().unwrap_or('?');
                return Err(self.error(format!("invalid escape: \\{}", shown)));
            }
        })
    }

    fn read_hex4(&mut self) -> Result<u32, JsonError> {
        let hex = self
            .text
            .get(self.pos..self.pos + 4)
            .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error("invalid \\u escape"))?;
        let unit = u32::from_str_radix(hex, 16).map_err(|_| self.error("invalid \\u escape"))?;
        self.pos += 4;
        Ok(unit)
    }

    fn read_literal(&mut self, word: &str) -> Result<(), JsonError> {
        if self.text[self.pos..].starts_with(word) {
            self.pos += word.len();
            Ok(())
        } else {
            Err(self.error("invalid literal"))
        }
    }

    /// Read a number per the JSON grammar. Integers and fractions both come back as `f64`.
    fn read_number(&mut self) -> Result<f64, JsonError> {
        let start = self.pos;
        let text = self.text;
        let bytes = text.as_bytes();
        let digit_at = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);
        let mut i = self.pos;
        if bytes[i] == b'-' {
            i += 1;
        }
        match bytes.get(i) {
            Some(b'0') => {
                i += 1;
                if digit_at(i) {
                    return Err(self.error_at("numbers cannot have leading zeros", start));
                }
            }
            Some(b'1'..=b'9') => {
                while digit_at(i) {
                    i += 1;
                }
            }
            _ => return Err(self.error_at("invalid number", start)),
        }
        if bytes.get(i) == Some(&b'.') {
            i += 1;
            if !digit_at(i) {
                return Err(self.error_at("decimal point must be followed by digit", start));
            }
            while digit_at(i) {
                i += 1;
            }
        }
        if matches!(bytes.get(i), Some(b'e' | b'E')) {
            i += 1;
            if matches!(bytes.get(i), Some(b'+' | b'-')) {
                i += 1;
            }
            if !digit_at(i) {
                return Err(self.error_at("exponent must have digit", start));
            }
            while digit_at(i) {
                i += 1;
            }
        }
        let n: f64 = text[start..i]
            .parse()
            .map_err(|_| self.error_at("invalid number", start))?;
        if !n.is_finite() {
            return Err(self.error_at("number out of range", start));
        }
        self.pos = i;
        Ok(n)
    }

    fn expect(&mut self, b: u8) -> Result<(), JsonError> {
        if self.peek() == Some(b) {
            self.pos += 1;
            Ok(())
        } else if self.peek().is_none() {
            Err(self.error("unexpected end of input"))
        } else {
            Err(self.error(format!("expected '{}'", b as char)))
        }
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.text.as_bytes();
        while matches!(bytes.get(self.pos), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn unexpected(&self) -> JsonError {
        match self.text[self.pos..].chars().next() {
            Some(c) => self.error(format!("unexpected '{}'", c)),
            None => self.error("unexpected end of input"),
        }
    }

    fn error(&self, message: impl Into<String>) -> JsonError {
        self.error_at(message, self.pos)
    }

    fn error_at(&self, message: impl Into<String>, offset: usize) -> JsonError {
        JsonError::parse(message, Location::at(self.text, offset))
    }
}
