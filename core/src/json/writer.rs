/*
 * writer.rs
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

//! Streaming JSON writer with scoped contexts, output in a BytesMut (bytes crate).
//!
//! Values are written through contexts rather than raw start/end calls:
//! a [`ValueContext`] is one value slot, [`ObjectContext`] and [`ArrayContext`] are the
//! insides of a container opened by `write_object` / `write_array` and closed when the
//! populate callback returns. Typed values go through the built-in primitive rules or the
//! [`Registry`].

use std::any::Any;

use bytes::{BufMut, BytesMut};

use crate::json::error::JsonError;
use crate::json::indent::IndentConfig;
use crate::json::registry::Registry;
use crate::json::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,       // before the root value
    AfterValue, // after a value, next needs a comma
    AfterKey,   // after key and colon
    InArray,    // just opened, still empty
    InObject,
}

/// JSON writer that appends to a BytesMut.
pub struct JsonWriter<'r> {
    buf: BytesMut,
    indent: Option<IndentConfig>,
    state: State,
    depth: usize,
    registry: &'r Registry,
}

impl JsonWriter<'static> {
    /// Compact writer using the global registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::global())
    }

    /// Pretty-printing writer using the global registry.
    pub fn with_indent(indent: IndentConfig) -> Self {
        Self::new().indent(indent)
    }
}

impl Default for JsonWriter<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> JsonWriter<'r> {
    pub fn with_registry(registry: &'r Registry) -> Self {
        Self {
            buf: BytesMut::with_capacity(1024),
            indent: None,
            state: State::Init,
            depth: 0,
            registry,
        }
    }

    pub fn indent(mut self, indent: IndentConfig) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn buffer(&self) -> &BytesMut {
        &self.buf
    }

    /// Take the buffer, leaving the writer empty and ready for another document.
    pub fn take_buffer(&mut self) -> BytesMut {
        self.state = State::Init;
        self.depth = 0;
        std::mem::take(&mut self.buf)
    }

    pub fn into_string(self) -> Result<String, JsonError> {
        String::from_utf8(Vec::from(self.buf)).map_err(|e| JsonError::invalid(e.to_string()))
    }

    /// Write the document's single root value.
    pub fn write_root<F>(&mut self, populate: F) -> Result<(), JsonError>
    where
        F: FnOnce(ValueContext<'_, 'r>) -> Result<(), JsonError>,
    {
        if self.state != State::Init {
            return Err(JsonError::invalid("a JSON document holds a single root value"));
        }
        populate(ValueContext {
            writer: self,
            key: None,
        })?;
        if self.state == State::Init {
            return Err(JsonError::invalid("no JSON value was written"));
        }
        log::trace!("encoded {} bytes of JSON", self.buf.len());
        Ok(())
    }

    fn value_separator(&mut self) {
        match self.state {
            State::AfterValue => {
                self.buf.put_u8(b',');
                if let Some(ref ind) = self.indent {
                    ind.newline(&mut self.buf, self.depth);
                }
            }
            State::InArray | State::InObject => {
                if let Some(ref ind) = self.indent {
                    ind.newline(&mut self.buf, self.depth);
                }
            }
            State::Init | State::AfterKey => {}
        }
    }

    fn start_object(&mut self) {
        self.value_separator();
        self.buf.put_u8(b'{');
        self.state = State::InObject;
        self.depth += 1;
    }

    fn end_object(&mut self) {
        self.depth -= 1;
        if self.state != State::InObject {
            if let Some(ref ind) = self.indent {
                ind.newline(&mut self.buf, self.depth);
            }
        }
        self.buf.put_u8(b'}');
        self.state = State::AfterValue;
    }

    fn start_array(&mut self) {
        self.value_separator();
        self.buf.put_u8(b'[');
        self.state = State::InArray;
        self.depth += 1;
    }

    fn end_array(&mut self) {
        self.depth -= 1;
        if self.state != State::InArray {
            if let Some(ref ind) = self.indent {
                ind.newline(&mut self.buf, self.depth);
            }
        }
        self.buf.put_u8(b']');
        self.state = State::AfterValue;
    }

    fn key(&mut self, key: &str) {
        self.value_separator();
        write_escaped_string(&mut self.buf, key);
        self.buf.put_u8(b':');
        if self.indent.is_some() {
            self.buf.put_u8(b' ');
        }
        self.state = State::AfterKey;
    }

    fn string(&mut self, value: &str) {
        self.value_separator();
        write_escaped_string(&mut self.buf, value);
        self.state = State::AfterValue;
    }

    fn number(&mut self, value: f64) {
        self.value_separator();
        self.buf.extend_from_slice(format_number(value).as_bytes());
        self.state = State::AfterValue;
    }

    fn bool(&mut self, value: bool) {
        self.value_separator();
        self.buf.put_slice(if value { b"true" } else { b"false" });
        self.state = State::AfterValue;
    }

    fn null(&mut self) {
        self.value_separator();
        self.buf.put_slice(b"null");
        self.state = State::AfterValue;
    }
}

/// Slot for exactly one value: the root, an object field, or an array element.
/// A field's key is written only together with its value.
pub struct ValueContext<'w, 'r> {
    writer: &'w mut JsonWriter<'r>,
    key: Option<&'w str>,
}

impl<'w, 'r> ValueContext<'w, 'r> {
    fn open(self) -> &'w mut JsonWriter<'r> {
        if let Some(key) = self.key {
            self.writer.key(key);
        }
        self.writer
    }

    pub fn write_null(self) {
        self.open().null();
    }

    pub fn write_bool(self, value: bool) {
        self.open().bool(value);
    }

    /// Fails for NaN and infinities, which JSON cannot represent.
    pub fn write_number(self, value: f64) -> Result<(), JsonError> {
        if !value.is_finite() {
            return Err(JsonError::NonFiniteNumber(value));
        }
        self.open().number(value);
        Ok(())
    }

    pub fn write_str(self, value: &str) {
        self.open().string(value);
    }

    /// Write an object whose fields are emitted by `populate`. The object is closed when
    /// `populate` returns, whether or not it succeeded.
    pub fn write_object<F>(self, populate: F) -> Result<(), JsonError>
    where
        F: FnOnce(&mut ObjectContext<'_, 'r>) -> Result<(), JsonError>,
    {
        let writer = self.open();
        writer.start_object();
        let result = populate(&mut ObjectContext { writer: &mut *writer });
        writer.end_object();
        result
    }

    /// Write an array whose elements are emitted by `populate`.
    pub fn write_array<F>(self, populate: F) -> Result<(), JsonError>
    where
        F: FnOnce(&mut ArrayContext<'_, 'r>) -> Result<(), JsonError>,
    {
        let writer = self.open();
        writer.start_array();
        let result = populate(&mut ArrayContext { writer: &mut *writer });
        writer.end_array();
        result
    }

    /// Write any value: JSON primitives (`bool`, numeric types, `String`, `&'static str`, `()`
    /// as null, [`Value`]) directly, anything else through the registry.
    pub fn write_value<V: Any>(self, value: &V) -> Result<(), JsonError> {
        let any = value as &dyn Any;
        if let Some(v) = any.downcast_ref::<Value>() {
            return self.write_dynamic(v);
        }
        if let Some(b) = any.downcast_ref::<bool>() {
            self.write_bool(*b);
            return Ok(());
        }
        if let Some(s) = any.downcast_ref::<String>() {
            self.write_str(s);
            return Ok(());
        }
        if let Some(s) = any.downcast_ref::<&'static str>() {
            self.write_str(s);
            return Ok(());
        }
        if let Some(n) = as_number(any) {
            return self.write_number(n);
        }
        if any.is::<()>() {
            self.write_null();
            return Ok(());
        }
        let writer = self.writer.registry.lookup::<V>()?;
        writer.write(self, any)
    }

    /// Write a dynamic [`Value`], recursing into its containers.
    pub fn write_dynamic(self, value: &Value) -> Result<(), JsonError> {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(b) => self.write_bool(*b),
            Value::Number(n) => return self.write_number(*n),
            Value::String(s) => self.write_str(s),
            Value::Array(items) => {
                return self.write_array(|arr| {
                    for item in items {
                        arr.element().write_dynamic(item)?;
                    }
                    Ok(())
                });
            }
            Value::Object(map) => {
                return self.write_object(|obj| {
                    for (name, item) in map {
                        obj.field(name).write_dynamic(item)?;
                    }
                    Ok(())
                });
            }
        }
        Ok(())
    }
}

/// Inside of an object being written. Fields appear in call order.
pub struct ObjectContext<'w, 'r> {
    writer: &'w mut JsonWriter<'r>,
}

impl<'r> ObjectContext<'_, 'r> {
    /// Value slot for the field `name`.
    pub fn field<'c>(&'c mut self, name: &'c str) -> ValueContext<'c, 'r> {
        ValueContext {
            writer: &mut *self.writer,
            key: Some(name),
        }
    }

    pub fn write_field<V: Any>(&mut self, name: &str, value: &V) -> Result<(), JsonError> {
        self.field(name).write_value(value)
    }
}

/// Inside of an array being written. Elements appear in call order.
pub struct ArrayContext<'w, 'r> {
    writer: &'w mut JsonWriter<'r>,
}

impl<'r> ArrayContext<'_, 'r> {
    /// Value slot for the next element.
    pub fn element(&mut self) -> ValueContext<'_, 'r> {
        ValueContext {
            writer: &mut *self.writer,
            key: None,
        }
    }

    pub fn write_element<V: Any>(&mut self, value: &V) -> Result<(), JsonError> {
        self.element().write_value(value)
    }
}

/// Encode one document with the global registry, compact.
pub fn encode<F>(populate: F) -> Result<String, JsonError>
where
    F: FnOnce(ValueContext<'_, 'static>) -> Result<(), JsonError>,
{
    let mut writer = JsonWriter::new();
    writer.write_root(populate)?;
    writer.into_string()
}

/// Encode one document with the global registry, indented.
pub fn encode_pretty<F>(indent: IndentConfig, populate: F) -> Result<String, JsonError>
where
    F: FnOnce(ValueContext<'_, 'static>) -> Result<(), JsonError>,
{
    let mut writer = JsonWriter::with_indent(indent);
    writer.write_root(populate)?;
    writer.into_string()
}

/// Encode a single value (primitive or registered type) as a compact document.
pub fn to_string<V: Any>(value: &V) -> Result<String, JsonError> {
    encode(|ctx| ctx.write_value(value))
}

fn as_number(any: &dyn Any) -> Option<f64> {
    macro_rules! try_numeric {
        ($($t:ty),*) => {
            $(
                if let Some(n) = any.downcast_ref::<$t>() {
                    return Some(*n as f64);
                }
            )*
        };
    }
    try_numeric!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
    None
}

/// Integral values print without a fraction; everything else in shortest round-trip form.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:?}", value)
    }
}

fn write_escaped_string(buf: &mut BytesMut, s: &str) {
    buf.put_u8(b'"');
    let bytes = s.as_bytes();
    let mut run = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let escape: &[u8] = match b {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            0x08 => b"\\b",
            0x0c => b"\\f",
            0x00..=0x1f => {
                buf.extend_from_slice(&bytes[run..i]);
                buf.extend_from_slice(format!("\\u{:04x}", b).as_bytes());
                run = i + 1;
                continue;
            }
            _ => continue,
        };
        buf.extend_from_slice(&bytes[run..i]);
        buf.extend_from_slice(escape);
        run = i + 1;
    }
    buf.extend_from_slice(&bytes[run..]);
    buf.put_u8(b'"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::value::Map;

    fn compact<F>(populate: F) -> Result<String, JsonError>
    where
        F: FnOnce(ValueContext<'_, '_>) -> Result<(), JsonError>,
    {
        let registry = Registry::new();
        let mut writer = JsonWriter::with_registry(&registry);
        writer.write_root(populate)?;
        writer.into_string()
    }

    #[test]
    fn nested_scopes_close_in_order() {
        let out = compact(|ctx| {
            ctx.write_object(|obj| {
                obj.write_field("name", &"duke")?;
                obj.field("tags").write_array(|arr| {
                    arr.write_element(&1u8)?;
                    arr.element().write_object(|inner| inner.write_field("ok", &true))?;
                    arr.element().write_array(|_| Ok(()))
                })?;
                obj.field("none").write_null();
                obj.field("empty").write_object(|_| Ok(()))
            })
        })
        .unwrap();
        assert_eq!(out, r#"{"name":"duke","tags":[1,{"ok":true},[]],"none":null,"empty":{}}"#);
    }

    #[test]
    fn pretty_output() {
        let registry = Registry::new();
        let mut writer = JsonWriter::with_registry(&registry).indent(IndentConfig::spaces(2));
        writer
            .write_root(|ctx| {
                ctx.write_object(|obj| {
                    obj.write_field("a", &1.5)?;
                    obj.field("b").write_array(|arr| {
                        arr.write_element(&"x")?;
                        arr.write_element(&"y")
                    })?;
                    obj.field("c").write_array(|_| Ok(()))
                })
            })
            .unwrap();
        assert_eq!(
            writer.into_string().unwrap(),
            "{\n  \"a\": 1.5,\n  \"b\": [\n    \"x\",\n    \"y\"\n  ],\n  \"c\": []\n}"
        );
    }

    #[test]
    fn escapes_strings() {
        let out = compact(|ctx| {
            ctx.write_str("q\"b\\n\nt\tc\u{1}é");
            Ok(())
        })
        .unwrap();
        assert_eq!(out, "\"q\\\"b\\\\n\\nt\\tc\\u0001é\"");
    }

    #[test]
    fn numbers() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(1e300), "1e300");
        assert_eq!(format_number(-2.5e-8), "-2.5e-8");
        let err = compact(|ctx| ctx.write_number(f64::NAN)).unwrap_err();
        assert!(matches!(err, JsonError::NonFiniteNumber(_)));
        assert_eq!(compact(|ctx| ctx.write_value(&42i64)).unwrap(), "42");
    }

    #[test]
    fn dynamic_values_keep_field_order() {
        let mut map = Map::new();
        map.insert("z".to_string(), Value::from(1.0));
        map.insert("a".to_string(), Value::Array(vec![Value::Null, Value::from("s")]));
        let out = compact(|ctx| ctx.write_value(&Value::Object(map))).unwrap();
        assert_eq!(out, r#"{"z":1,"a":[null,"s"]}"#);
    }

    #[test]
    fn unit_is_null() {
        assert_eq!(compact(|ctx| ctx.write_value(&())).unwrap(), "null");
    }

    #[test]
    fn unregistered_type_fails() {
        struct Opaque;
        let err = compact(|ctx| ctx.write_object(|obj| obj.write_field("x", &Opaque))).unwrap_err();
        assert!(matches!(err, JsonError::UnregisteredType { .. }));
    }

    #[test]
    fn single_root_value() {
        let registry = Registry::new();
        let mut writer = JsonWriter::with_registry(&registry);
        assert!(writer.write_root(|_| Ok(())).is_err());
        writer.write_root(|ctx| ctx.write_value(&1)).unwrap();
        assert!(writer.write_root(|ctx| ctx.write_value(&2)).is_err());
        assert_eq!(&writer.take_buffer()[..], b"1");
        writer.write_root(|ctx| ctx.write_value(&2)).unwrap();
        assert_eq!(&writer.buffer()[..], b"2");
    }

    #[test]
    fn into_string_after_take_buffer() {
        let registry = Registry::new();
        let mut writer = JsonWriter::with_registry(&registry);
        writer.write_root(|ctx| ctx.write_value(&"first")).unwrap();
        writer.take_buffer();
        writer
            .write_root(|ctx| ctx.write_array(|arr| arr.write_element(&"[✓] é")))
            .unwrap();
        assert_eq!(writer.into_string().unwrap(), "[\"[✓] é\"]");
    }
}
