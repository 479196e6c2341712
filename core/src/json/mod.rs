/*
 * mod.rs
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

//! Typed streaming JSON: handlers build values directly while the text is scanned, and a
//! registry of per-type writers encodes them back. No DOM in between, no reflection.

mod builders;
mod error;
mod handler;
mod indent;
mod parser;
mod registry;
mod value;
mod writer;

pub use builders::{
    list_of, map_of, nullable, AnyValue, BooleanValue, Ignore, ListBuilder, ListOf, MapBuilder,
    MapOf, MapValue, Nullable, NumberValue, StringValue,
};
pub use error::{required, JsonError, Location, Shape};
pub use handler::{ArrayHandler, ObjectHandler, ValueHandler};
pub use indent::IndentConfig;
pub use parser::{decode, decode_slice, decode_with, ParseOptions, Receiver};
pub use registry::{DynWriter, Registry, WriteFn};
pub use value::{Map, Value};
pub use writer::{
    encode, encode_pretty, to_string, ArrayContext, JsonWriter, ObjectContext, ValueContext,
};
