// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::buffer::{Reader, Writer};
use crate::config::Config;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::formatter_cache::FormatterCache;
use crate::serializer::{Formatter, Serializer};
use crate::types::RefMode;
use std::rc::Rc;

/// Entry point for encoding and decoding object graphs.
///
/// A `Knot` owns its configuration and the cache of wrapping formatters for
/// the reference types it has seen. Every call gets fresh identity tables, so
/// ids never leak between two top-level values.
///
/// `Knot` is neither `Send` nor `Sync`: create one per thread.
///
/// # Examples
///
/// Shared references keep their identity:
///
/// ```rust
/// use knot_core::Knot;
/// use std::rc::Rc;
///
/// let knot = Knot::dedup();
/// let text: Rc<str> = Rc::from("hello");
/// let bytes = knot.serialize(&vec![text.clone(), text]).unwrap();
/// let decoded: Vec<Rc<str>> = knot.deserialize(&bytes).unwrap();
/// assert!(Rc::ptr_eq(&decoded[0], &decoded[1]));
/// ```
///
/// Custom configuration:
///
/// ```rust
/// use knot_core::{Knot, RefMode};
///
/// let knot = Knot::default().ref_mode(RefMode::Dedup).max_depth(64);
/// assert_eq!(knot.get_config().max_depth(), 64);
/// ```
#[derive(Default)]
pub struct Knot {
    config: Config,
    formatter_cache: FormatterCache,
}

impl Knot {
    /// A `Knot` that deduplicates shared references and rejects cycles.
    pub fn dedup() -> Self {
        Knot::default().ref_mode(RefMode::Dedup)
    }

    /// A `Knot` that deduplicates shared references and round-trips cycles.
    pub fn cycle_safe() -> Self {
        Knot::default().ref_mode(RefMode::CycleSafe)
    }

    /// Sets the reference codec. Formatters cached so far are dropped.
    pub fn ref_mode(mut self, ref_mode: RefMode) -> Self {
        self.config.ref_mode = ref_mode;
        self.formatter_cache = FormatterCache::default();
        self
    }

    /// Sets the maximum nesting depth of structs and referenced objects.
    ///
    /// Both encode and decode fail with [`Error::DepthExceed`] past this
    /// limit instead of exhausting the stack.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    pub fn get_formatter_cache(&self) -> &FormatterCache {
        &self.formatter_cache
    }

    /// The formatter used for standalone values of `T`: the inner formatter
    /// for value types, the cached wrapping formatter for reference types.
    pub fn formatter_for<T: Serializer>(&self) -> Rc<dyn Formatter<T>> {
        T::knot_formatter(self)
    }

    pub fn serialize<T: Serializer>(&self, record: &T) -> Result<Vec<u8>, Error> {
        let mut writer = Writer::with_capacity(T::knot_reserved_space());
        self.serialize_into(record, &mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Appends the encoding of `record` to `writer`, returning the number of
    /// bytes written.
    pub fn serialize_into<T: Serializer>(
        &self,
        record: &T,
        writer: &mut Writer,
    ) -> Result<usize, Error> {
        let start = writer.len();
        let mut context = WriteContext::new(self, writer);
        record.knot_write(&mut context)?;
        let written = context.writer.len() - start;
        tracing::trace!(
            type_name = std::any::type_name::<T>(),
            bytes = written,
            objects = context.ref_writer.len(),
            "serialized"
        );
        Ok(written)
    }

    /// Decodes one `T` that must span all of `bf`.
    pub fn deserialize<T: Serializer>(&self, bf: &[u8]) -> Result<T, Error> {
        let mut context = ReadContext::new(self, Reader::new(bf));
        let value = T::knot_read(&mut context)?;
        let remaining = context.reader.remaining();
        if remaining != 0 {
            return Err(Error::invalid_data(format!(
                "{remaining} trailing bytes after `{}`",
                std::any::type_name::<T>()
            )));
        }
        Ok(value)
    }

    /// Decodes one `T` from the front of `reader`, leaving the cursor after it.
    pub fn deserialize_from<T: Serializer>(&self, reader: &mut Reader) -> Result<T, Error> {
        let mut context = ReadContext::new(self, Reader::new(reader.slice_after_cursor()));
        let value = T::knot_read(&mut context)?;
        reader.skip(context.reader.get_cursor())?;
        Ok(value)
    }
}
