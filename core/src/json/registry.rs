/*
 * registry.rs
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

//! Type → writer table used by [`JsonWriter`](crate::json::JsonWriter) to encode values
//! that are not JSON primitives.
//!
//! Types register a writer function once, during their initialization step, before any
//! value of the type is encoded. Entries are never removed. Lookups match the exact
//! runtime type; there is no fallback to other types.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::OnceCell;

use crate::json::error::JsonError;
use crate::json::writer::ValueContext;

/// Writes one `T` into the value slot it is given.
pub type WriteFn<T> = fn(ValueContext<'_, '_>, &T) -> Result<(), JsonError>;

/// Type-erased registered writer.
pub trait DynWriter: Send + Sync {
    /// Name of the type this writer was registered for.
    fn type_name(&self) -> &'static str;

    /// Write `value`, which must be of the registered type.
    fn write(&self, ctx: ValueContext<'_, '_>, value: &dyn Any) -> Result<(), JsonError>;
}

struct TypedWriter<T> {
    write: WriteFn<T>,
}

impl<T: Any> DynWriter for TypedWriter<T> {
    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn write(&self, ctx: ValueContext<'_, '_>, value: &dyn Any) -> Result<(), JsonError> {
        match value.downcast_ref::<T>() {
            Some(value) => (self.write)(ctx, value),
            None => Err(JsonError::UnregisteredType {
                type_name: type_name::<T>(),
            }),
        }
    }
}

struct Entry {
    /// Address of the registered function, to tell re-registration from replacement.
    addr: usize,
    writer: Arc<dyn DynWriter>,
}

/// Mapping from runtime type to writer function. Safe to share between threads.
pub struct Registry {
    writers: RwLock<HashMap<TypeId, Entry>>,
}

impl Registry {
    /// An empty registry, independent of the global one.
    pub fn new() -> Self {
        Self {
            writers: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry, used by writers unless another one is supplied.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceCell<Registry> = OnceCell::new();
        GLOBAL.get_or_init(Registry::new)
    }

    /// Bind `write` to `T`. Registering the same function again changes nothing; registering a
    /// different one replaces it (last registration wins).
    pub fn register<T: Any>(&self, write: WriteFn<T>) {
        let addr = write as usize;
        let mut writers = self.writers.write().unwrap_or_else(|e| e.into_inner());
        match writers.get(&TypeId::of::<T>()) {
            Some(entry) if entry.addr == addr => return,
            Some(_) => log::warn!("replacing JSON writer for {}", type_name::<T>()),
            None => log::debug!("registered JSON writer for {}", type_name::<T>()),
        }
        writers.insert(
            TypeId::of::<T>(),
            Entry {
                addr,
                writer: Arc::new(TypedWriter { write }),
            },
        );
    }

    pub fn is_registered<T: Any + ?Sized>(&self) -> bool {
        let writers = self.writers.read().unwrap_or_else(|e| e.into_inner());
        writers.contains_key(&TypeId::of::<T>())
    }

    /// Writer for `T`, or `UnregisteredType`. The lock is released before this returns, so the
    /// writer may itself look up nested types.
    pub fn lookup<T: Any + ?Sized>(&self) -> Result<Arc<dyn DynWriter>, JsonError> {
        let writers = self.writers.read().unwrap_or_else(|e| e.into_inner());
        writers
            .get(&TypeId::of::<T>())
            .map(|entry| Arc::clone(&entry.writer))
            .ok_or(JsonError::UnregisteredType {
                type_name: type_name::<T>(),
            })
    }

    pub fn len(&self) -> usize {
        self.writers.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::writer::JsonWriter;

    struct Point {
        x: f64,
        y: f64,
    }

    fn write_point(ctx: ValueContext<'_, '_>, p: &Point) -> Result<(), JsonError> {
        ctx.write_array(|arr| {
            arr.write_element(&p.x)?;
            arr.write_element(&p.y)
        })
    }

    fn write_point_as_object(ctx: ValueContext<'_, '_>, p: &Point) -> Result<(), JsonError> {
        ctx.write_object(|obj| {
            obj.write_field("x", &p.x)?;
            obj.write_field("y", &p.y)
        })
    }

    fn encode_point(registry: &Registry, p: &Point) -> Result<String, JsonError> {
        let mut writer = JsonWriter::with_registry(registry);
        writer.write_root(|ctx| ctx.write_value(p))?;
        writer.into_string()
    }

    #[test]
    fn unregistered_then_registered() {
        let registry = Registry::new();
        let p = Point { x: 1.0, y: -2.5 };
        match encode_point(&registry, &p) {
            Err(JsonError::UnregisteredType { type_name }) => assert!(type_name.ends_with("Point")),
            other => panic!("expected UnregisteredType, got {:?}", other),
        }
        registry.register(write_point);
        assert!(registry.is_registered::<Point>());
        assert_eq!(encode_point(&registry, &p).unwrap(), "[1,-2.5]");
        registry.register(write_point);
        assert_eq!(registry.len(), 1);
        assert_eq!(encode_point(&registry, &p).unwrap(), "[1,-2.5]");
    }

    #[test]
    fn last_registration_wins() {
        let registry = Registry::new();
        registry.register(write_point);
        registry.register(write_point_as_object);
        let p = Point { x: 0.5, y: 3.0 };
        assert_eq!(encode_point(&registry, &p).unwrap(), r#"{"x":0.5,"y":3}"#);
    }

    #[test]
    fn lookup_reports_type_name() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        let err = registry.lookup::<Point>().err().unwrap();
        assert!(err.to_string().contains("Point"));
        registry.register(write_point);
        assert!(registry.lookup::<Point>().unwrap().type_name().ends_with("Point"));
    }

    struct Label(&'static str);

    fn write_label(ctx: ValueContext<'_, '_>, l: &Label) -> Result<(), JsonError> {
        ctx.write_str(l.0);
        Ok(())
    }

    #[test]
    fn concurrent_register_and_lookup() {
        let registry = Registry::new();
        registry.register(write_point);
        std::thread::scope(|s| {
            for i in 0..4 {
                let registry = &registry;
                s.spawn(move || {
                    for _ in 0..100 {
                        if i % 2 == 0 {
                            registry.register(write_point);
                            registry.register(write_label);
                        }
                        let p = Point { x: 1.0, y: 2.0 };
                        assert_eq!(encode_point(registry, &p).unwrap(), "[1,2]");
                        if let Ok(writer) = registry.lookup::<Label>() {
                            assert!(writer.type_name().ends_with("Label"));
                        }
                    }
                });
            }
        });
        assert_eq!(registry.len(), 2);
        let mut writer = JsonWriter::with_registry(&registry);
        writer.write_root(|ctx| ctx.write_value(&Label("done"))).unwrap();
        assert_eq!(writer.into_string().unwrap(), "\"done\"");
    }
}
