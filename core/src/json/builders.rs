/*
 * builders.rs
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

//! Stock handlers: primitives, maps, lists, dynamic values, and combinators over them.

use crate::json::error::JsonError;
use crate::json::handler::{ArrayHandler, ObjectHandler, ValueHandler};
use crate::json::parser::Receiver;
use crate::json::value::{Map, Value};

// ── Primitives ───────────────────────────────────────────────────────

/// Accepts `true` / `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanValue;

impl ValueHandler for BooleanValue {
    type Output = bool;

    fn expecting(&self) -> &str {
        "boolean"
    }

    fn handle_boolean(&self, value: bool) -> Result<bool, JsonError> {
        Ok(value)
    }
}

/// Accepts any number.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberValue;

impl ValueHandler for NumberValue {
    type Output = f64;

    fn expecting(&self) -> &str {
        "number"
    }

    fn handle_number(&self, value: f64) -> Result<f64, JsonError> {
        Ok(value)
    }
}

/// Accepts a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringValue;

impl ValueHandler for StringValue {
    type Output = String;

    fn expecting(&self) -> &str {
        "string"
    }

    fn handle_string(&self, value: String) -> Result<String, JsonError> {
        Ok(value)
    }
}

// ── Dynamic values ───────────────────────────────────────────────────

/// Accepts every shape, producing a [`Value`]. Containers recurse into [`map_of`] / [`list_of`]
/// over `AnyValue` itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyValue;

impl ValueHandler for AnyValue {
    type Output = Value;

    fn expecting(&self) -> &str {
        "any value"
    }

    fn handle_boolean(&self, value: bool) -> Result<Value, JsonError> {
        Ok(Value::Bool(value))
    }

    fn handle_number(&self, value: f64) -> Result<Value, JsonError> {
        Ok(Value::Number(value))
    }

    fn handle_null(&self) -> Result<Value, JsonError> {
        Ok(Value::Null)
    }

    fn handle_string(&self, value: String) -> Result<Value, JsonError> {
        Ok(Value::String(value))
    }

    fn handle_object<'h>(
        &'h self,
    ) -> Result<Box<dyn ObjectHandler<Output = Value> + 'h>, JsonError> {
        Ok(Box::new(Mapped {
            inner: MapBuilder::new(self),
            f: |map: Map<Value>| -> Result<Value, JsonError> { Ok(Value::Object(map)) },
        }))
    }

    fn handle_array<'h>(&'h self) -> Result<Box<dyn ArrayHandler<Output = Value> + 'h>, JsonError> {
        Ok(Box::new(Mapped {
            inner: ListBuilder::new(self),
            f: |items: Vec<Value>| -> Result<Value, JsonError> { Ok(Value::Array(items)) },
        }))
    }
}

/// Accepts any value and discards it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ignore;

struct IgnoreContainer;

impl ValueHandler for Ignore {
    type Output = ();

    fn expecting(&self) -> &str {
        "any value"
    }

    fn handle_boolean(&self, _value: bool) -> Result<(), JsonError> {
        Ok(())
    }

    fn handle_number(&self, _value: f64) -> Result<(), JsonError> {
        Ok(())
    }

    fn handle_null(&self) -> Result<(), JsonError> {
        Ok(())
    }

    fn handle_string(&self, _value: String) -> Result<(), JsonError> {
        Ok(())
    }

    fn handle_object<'h>(&'h self) -> Result<Box<dyn ObjectHandler<Output = ()> + 'h>, JsonError> {
        Ok(Box::new(IgnoreContainer))
    }

    fn handle_array<'h>(&'h self) -> Result<Box<dyn ArrayHandler<Output = ()> + 'h>, JsonError> {
        Ok(Box::new(IgnoreContainer))
    }
}

impl ObjectHandler for IgnoreContainer {
    type Output = ();

    fn handle_field(&mut self, _name: String, value: Receiver<'_, '_>) -> Result<(), JsonError> {
        value.skip()
    }

    fn handle_end(self: Box<Self>) -> Result<(), JsonError> {
        Ok(())
    }
}

impl ArrayHandler for IgnoreContainer {
    type Output = ();

    fn handle_element(&mut self, value: Receiver<'_, '_>) -> Result<(), JsonError> {
        value.skip()
    }

    fn handle_end(self: Box<Self>) -> Result<(), JsonError> {
        Ok(())
    }
}

// ── Maps and lists ───────────────────────────────────────────────────

/// Handler for an object whose every field is decoded by `element`.
pub fn map_of<H: ValueHandler>(element: H) -> MapOf<H> {
    MapOf { element }
}

/// Handler for an array whose every element is decoded by `element`.
pub fn list_of<H: ValueHandler>(element: H) -> ListOf<H> {
    ListOf { element }
}

#[derive(Debug, Clone, Copy)]
pub struct MapOf<H> {
    element: H,
}

impl<H: ValueHandler> ValueHandler for MapOf<H> {
    type Output = Map<H::Output>;

    fn expecting(&self) -> &str {
        "object"
    }

    fn handle_object<'h>(
        &'h self,
    ) -> Result<Box<dyn ObjectHandler<Output = Self::Output> + 'h>, JsonError> {
        Ok(Box::new(MapBuilder::new(&self.element)))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListOf<H> {
    element: H,
}

impl<H: ValueHandler> ValueHandler for ListOf<H> {
    type Output = Vec<H::Output>;

    fn expecting(&self) -> &str {
        "array"
    }

    fn handle_array<'h>(
        &'h self,
    ) -> Result<Box<dyn ArrayHandler<Output = Self::Output> + 'h>, JsonError> {
        Ok(Box::new(ListBuilder::new(&self.element)))
    }
}

/// Object accumulator behind [`map_of`]. A repeated key keeps its first position and the
/// last value.
pub struct MapBuilder<'h, H: ValueHandler + ?Sized> {
    element: &'h H,
    map: Map<H::Output>,
}

impl<'h, H: ValueHandler + ?Sized> MapBuilder<'h, H> {
    pub fn new(element: &'h H) -> Self {
        Self {
            element,
            map: Map::new(),
        }
    }
}

impl<H: ValueHandler + ?Sized> ObjectHandler for MapBuilder<'_, H> {
    type Output = Map<H::Output>;

    fn handle_field(&mut self, name: String, value: Receiver<'_, '_>) -> Result<(), JsonError> {
        let decoded = value.receive(self.element)?;
        self.map.insert(name, decoded);
        Ok(())
    }

    fn handle_end(self: Box<Self>) -> Result<Self::Output, JsonError> {
        Ok(self.map)
    }
}

/// Array accumulator behind [`list_of`].
pub struct ListBuilder<'h, H: ValueHandler + ?Sized> {
    element: &'h H,
    items: Vec<H::Output>,
}

impl<'h, H: ValueHandler + ?Sized> ListBuilder<'h, H> {
    pub fn new(element: &'h H) -> Self {
        Self {
            element,
            items: Vec::new(),
        }
    }
}

impl<H: ValueHandler + ?Sized> ArrayHandler for ListBuilder<'_, H> {
    type Output = Vec<H::Output>;

    fn handle_element(&mut self, value: Receiver<'_, '_>) -> Result<(), JsonError> {
        let decoded = value.receive(self.element)?;
        self.items.push(decoded);
        Ok(())
    }

    fn handle_end(self: Box<Self>) -> Result<Self::Output, JsonError> {
        Ok(self.items)
    }
}

// ── Combinators ──────────────────────────────────────────────────────

/// Handler returned by [`ValueHandler::map`].
#[derive(Debug, Clone, Copy)]
pub struct MapValue<H, F> {
    inner: H,
    f: F,
}

impl<H, F> MapValue<H, F> {
    pub(crate) fn new(inner: H, f: F) -> Self {
        Self { inner, f }
    }
}

impl<H, F, U> ValueHandler for MapValue<H, F>
where
    H: ValueHandler,
    F: Fn(H::Output) -> Result<U, JsonError>,
{
    type Output = U;

    fn expecting(&self) -> &str {
        self.inner.expecting()
    }

    fn handle_boolean(&self, value: bool) -> Result<U, JsonError> {
        (self.f)(self.inner.handle_boolean(value)?)
    }

    fn handle_number(&self, value: f64) -> Result<U, JsonError> {
        (self.f)(self.inner.handle_number(value)?)
    }

    fn handle_null(&self) -> Result<U, JsonError> {
        (self.f)(self.inner.handle_null()?)
    }

    fn handle_string(&self, value: String) -> Result<U, JsonError> {
        (self.f)(self.inner.handle_string(value)?)
    }

    fn handle_object<'h>(&'h self) -> Result<Box<dyn ObjectHandler<Output = U> + 'h>, JsonError> {
        Ok(Box::new(Mapped {
            inner: self.inner.handle_object()?,
            f: &self.f,
        }))
    }

    fn handle_array<'h>(&'h self) -> Result<Box<dyn ArrayHandler<Output = U> + 'h>, JsonError> {
        Ok(Box::new(Mapped {
            inner: self.inner.handle_array()?,
            f: &self.f,
        }))
    }
}

/// Decode `null` as `None`, anything else through `inner`.
pub fn nullable<H: ValueHandler>(inner: H) -> Nullable<H> {
    Nullable { inner }
}

#[derive(Debug, Clone, Copy)]
pub struct Nullable<H> {
    inner: H,
}

impl<H: ValueHandler> ValueHandler for Nullable<H> {
    type Output = Option<H::Output>;

    fn expecting(&self) -> &str {
        self.inner.expecting()
    }

    fn handle_boolean(&self, value: bool) -> Result<Self::Output, JsonError> {
        self.inner.handle_boolean(value).map(Some)
    }

    fn handle_number(&self, value: f64) -> Result<Self::Output, JsonError> {
        self.inner.handle_number(value).map(Some)
    }

    fn handle_null(&self) -> Result<Self::Output, JsonError> {
        Ok(None)
    }

    fn handle_string(&self, value: String) -> Result<Self::Output, JsonError> {
        self.inner.handle_string(value).map(Some)
    }

    fn handle_object<'h>(
        &'h self,
    ) -> Result<Box<dyn ObjectHandler<Output = Self::Output> + 'h>, JsonError> {
        Ok(Box::new(Mapped {
            inner: self.inner.handle_object()?,
            f: |value: H::Output| -> Result<Option<H::Output>, JsonError> { Ok(Some(value)) },
        }))
    }

    fn handle_array<'h>(
        &'h self,
    ) -> Result<Box<dyn ArrayHandler<Output = Self::Output> + 'h>, JsonError> {
        Ok(Box::new(Mapped {
            inner: self.inner.handle_array()?,
            f: |value: H::Output| -> Result<Option<H::Output>, JsonError> { Ok(Some(value)) },
        }))
    }
}

/// Container accumulator whose finished value is passed through `f`.
struct Mapped<A, F> {
    inner: A,
    f: F,
}

impl<A, F, U> ObjectHandler for Mapped<A, F>
where
    A: ObjectHandler,
    F: Fn(A::Output) -> Result<U, JsonError>,
{
    type Output = U;

    fn handle_field(&mut self, name: String, value: Receiver<'_, '_>) -> Result<(), JsonError> {
        self.inner.handle_field(name, value)
    }

    fn handle_end(self: Box<Self>) -> Result<U, JsonError> {
        let Mapped { inner, f } = *self;
        f(A::handle_end(Box::new(inner))?)
    }
}

impl<A, F, U> ArrayHandler for Mapped<A, F>
where
    A: ArrayHandler,
    F: Fn(A::Output) -> Result<U, JsonError>,
{
    type Output = U;

    fn handle_element(&mut self, value: Receiver<'_, '_>) -> Result<(), JsonError> {
        self.inner.handle_element(value)
    }

    fn handle_end(self: Box<Self>) -> Result<U, JsonError> {
        let Mapped { inner, f } = *self;
        f(A::handle_end(Box::new(inner))?)
    }
}
