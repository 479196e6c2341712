/*
 * handler.rs
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

//! Typed handlers for JSON values. The reader asks a handler how to interpret each value
//! as it is scanned; handlers build typed output directly, with no intermediate tree.

use crate::json::builders::MapValue;
use crate::json::error::{JsonError, Shape};
use crate::json::parser::Receiver;

/// Interprets one JSON value as a `Self::Output`.
///
/// Each capability corresponds to one JSON shape. A handler implements only the shapes it
/// accepts; the defaults fail with [`JsonError::UnsupportedShape`]. Container capabilities
/// are asked for as soon as the opening bracket is seen, before any content is read.
pub trait ValueHandler {
    type Output;

    /// What this handler accepts, for error messages.
    fn expecting(&self) -> &str {
        "a different value"
    }

    fn handle_boolean(&self, _value: bool) -> Result<Self::Output, JsonError> {
        Err(JsonError::unsupported(self.expecting(), Shape::Boolean))
    }

    fn handle_number(&self, _value: f64) -> Result<Self::Output, JsonError> {
        Err(JsonError::unsupported(self.expecting(), Shape::Number))
    }

    fn handle_null(&self) -> Result<Self::Output, JsonError> {
        Err(JsonError::unsupported(self.expecting(), Shape::Null))
    }

    fn handle_string(&self, _value: String) -> Result<Self::Output, JsonError> {
        Err(JsonError::unsupported(self.expecting(), Shape::String))
    }

    /// Start a new object. The returned accumulator sees every field, then `handle_end()`.
    fn handle_object<'h>(
        &'h self,
    ) -> Result<Box<dyn ObjectHandler<Output = Self::Output> + 'h>, JsonError> {
        Err(JsonError::unsupported(self.expecting(), Shape::Object))
    }

    /// Start a new array. The returned accumulator sees every element, then `handle_end()`.
    fn handle_array<'h>(
        &'h self,
    ) -> Result<Box<dyn ArrayHandler<Output = Self::Output> + 'h>, JsonError> {
        Err(JsonError::unsupported(self.expecting(), Shape::Array))
    }

    /// Convert every value this handler produces with `f`, which may reject it.
    fn map<U, F>(self, f: F) -> MapValue<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> Result<U, JsonError>,
    {
        MapValue::new(self, f)
    }
}

/// Accumulates the fields of one JSON object.
///
/// `handle_field` is called once per key, in input order. A handler that does not pull
/// the field's value from the receiver ignores it; the reader skips it. `handle_end`
/// consumes the accumulator and may fail if required fields were never seen.
pub trait ObjectHandler {
    type Output;

    fn handle_field(&mut self, name: String, value: Receiver<'_, '_>) -> Result<(), JsonError>;

    fn handle_end(self: Box<Self>) -> Result<Self::Output, JsonError>;
}

/// Accumulates the elements of one JSON array, in input order.
pub trait ArrayHandler {
    type Output;

    fn handle_element(&mut self, value: Receiver<'_, '_>) -> Result<(), JsonError>;

    fn handle_end(self: Box<Self>) -> Result<Self::Output, JsonError>;
}

impl<H: ValueHandler + ?Sized> ValueHandler for &H {
    type Output = H::Output;

    fn expecting(&self) -> &str {
        (**self).expecting()
    }

    fn handle_boolean(&self, value: bool) -> Result<Self::Output, JsonError> {
        (**self).handle_boolean(value)
    }

    fn handle_number(&self, value: f64) -> Result<Self::Output, JsonError> {
        (**self).handle_number(value)
    }

    fn handle_null(&self) -> Result<Self::Output, JsonError> {
        (**self).handle_null()
    }

    fn handle_string(&self, value: String) -> Result<Self::Output, JsonError> {
        (**self).handle_string(value)
    }

    fn handle_object<'h>(
        &'h self,
    ) -> Result<Box<dyn ObjectHandler<Output = Self::Output> + 'h>, JsonError> {
        (**self).handle_object()
    }

    fn handle_array<'h>(
        &'h self,
    ) -> Result<Box<dyn ArrayHandler<Output = Self::Output> + 'h>, JsonError> {
        (**self).handle_array()
    }
}

impl<O: ObjectHandler + ?Sized> ObjectHandler for Box<O> {
    type Output = O::Output;

    fn handle_field(&mut self, name: String, value: Receiver<'_, '_>) -> Result<(), JsonError> {
        (**self).handle_field(name, value)
    }

    fn handle_end(self: Box<Self>) -> Result<Self::Output, JsonError> {
        O::handle_end(*self)
    }
}

impl<A: ArrayHandler + ?Sized> ArrayHandler for Box<A> {
    type Output = A::Output;

    fn handle_element(&mut self, value: Receiver<'_, '_>) -> Result<(), JsonError> {
        (**self).handle_element(value)
    }

    fn handle_end(self: Box<Self>) -> Result<Self::Output, JsonError> {
        A::handle_end(*self)
    }
}
