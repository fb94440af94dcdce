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

//! Identity tables for both sides of the wire.
//!
//! Ids are never transmitted for first occurrences: writer and reader assign
//! them in the same encounter order, so the n-th object the writer registers
//! is the n-th slot the reader reserves. Only repeated occurrences travel, as
//! a back-reference record carrying that shared id.

use crate::buffer::{varuint_len, Reader, Writer};
use crate::error::Error;
use crate::types::{TypeId, REF_EXT_TYPE};
use std::any::Any;
use std::collections::{HashMap, HashSet};

/// Reference writer for tracking object identity during serialization.
///
/// Maps the address of each `Rc` allocation to the id it received when first
/// seen. Value equality plays no part: two distinct allocations holding equal
/// values get distinct ids.
///
/// # Examples
///
/// ```rust
/// use knot_core::buffer::Writer;
/// use knot_core::resolver::ref_resolver::RefWriter;
/// use std::rc::Rc;
///
/// let mut ref_writer = RefWriter::new();
/// let mut writer = Writer::default();
/// let rc = Rc::new(42);
/// let ptr = Rc::as_ptr(&rc) as usize;
///
/// // First encounter: the caller serializes the object itself
/// assert!(!ref_writer.try_write_ref(&mut writer, ptr));
/// // Second encounter: a back-reference was written
/// assert!(ref_writer.try_write_ref(&mut writer, ptr));
/// ```
#[derive(Default)]
pub struct RefWriter {
    /// Maps pointer addresses to reference IDs
    refs: HashMap<usize, u32>,
    /// Next reference ID to assign
    next_ref_id: u32,
    /// Objects whose encode has started but not finished
    in_flight: HashSet<usize>,
}

impl RefWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `ptr` and whether it was assigned by this call.
    pub fn assign_or_lookup(&mut self, ptr: usize) -> (u32, bool) {
        if let Some(&ref_id) = self.refs.get(&ptr) {
            return (ref_id, false);
        }
        let ref_id = self.next_ref_id;
        self.next_ref_id += 1;
        self.refs.insert(ptr, ref_id);
        (ref_id, true)
    }

    /// Writes a back-reference if `ptr` was seen before, otherwise assigns it
    /// the next id and returns `false` so the caller encodes the object.
    pub fn try_write_ref(&mut self, writer: &mut Writer, ptr: usize) -> bool {
        let (ref_id, is_new) = self.assign_or_lookup(ptr);
        if !is_new {
            Self::write_ref(writer, ref_id);
        }
        !is_new
    }

    /// Writes the back-reference record for `ref_id`.
    pub fn write_ref(writer: &mut Writer, ref_id: u32) {
        writer.write_u8(TypeId::EXT.as_u8());
        writer.write_i8(REF_EXT_TYPE);
        writer.write_varuint32(varuint_len(ref_id as u64) as u32);
        writer.write_varuint32(ref_id);
    }

    /// Marks `ptr` as being encoded. Returns `false` when it already was,
    /// which means the graph loops back onto an unfinished object.
    pub fn enter(&mut self, ptr: usize) -> bool {
        self.in_flight.insert(ptr)
    }

    pub fn leave(&mut self, ptr: usize) {
        self.in_flight.remove(&ptr);
    }

    pub fn is_in_flight(&self, ptr: usize) -> bool {
        self.in_flight.contains(&ptr)
    }

    /// Number of objects registered so far.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

/// State of one id on the decode side.
pub enum RefSlot {
    /// Id claimed, object not available yet.
    Reserved,
    Materialized(Box<dyn Any>),
}

/// What the next value on the wire is, as far as identity is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefHeader {
    Null,
    Ref(u32),
    /// A full value follows, encoded by the inner serializer.
    Value,
}

/// Reference reader for resolving back-references during deserialization.
///
/// An append-only arena of [`RefSlot`]s indexed by id. Decoders capture the
/// `Rc` handles stored here, never raw pointers.
///
/// # Examples
///
/// ```rust
/// use knot_core::resolver::ref_resolver::RefReader;
/// use std::rc::Rc;
///
/// let mut ref_reader = RefReader::new();
/// let rc = Rc::new(42);
///
/// let ref_id = ref_reader.reserve_slot().unwrap();
/// ref_reader.materialize(ref_id, rc.clone()).unwrap();
///
/// let retrieved: Rc<i32> = ref_reader.resolve(ref_id).unwrap();
/// assert!(Rc::ptr_eq(&rc, &retrieved));
/// ```
#[derive(Default)]
pub struct RefReader {
    slots: Vec<RefSlot>,
}

impl RefReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a reserved slot and returns its id.
    pub fn reserve_slot(&mut self) -> Result<u32, Error> {
        let ref_id = u32::try_from(self.slots.len())
            .map_err(|_| Error::invalid_ref("Too many referenced objects in one stream"))?;
        self.slots.push(RefSlot::Reserved);
        Ok(ref_id)
    }

    /// Fills a reserved slot. Each id can be materialized once.
    pub fn materialize<R: 'static>(&mut self, ref_id: u32, value: R) -> Result<(), Error> {
        match self.slots.get_mut(ref_id as usize) {
            Some(slot @ RefSlot::Reserved) => {
                *slot = RefSlot::Materialized(Box::new(value));
                Ok(())
            }
            Some(RefSlot::Materialized(_)) => Err(Error::invalid_ref(format!(
                "Reference {ref_id} is already materialized"
            ))),
            None => Err(Error::invalid_ref(format!(
                "Reference {ref_id} was never reserved"
            ))),
        }
    }

    /// Reserves a slot and materializes it with `value` at once.
    pub fn register<R: 'static>(&mut self, value: R) -> Result<u32, Error> {
        let ref_id = self.reserve_slot()?;
        self.materialize(ref_id, value)?;
        Ok(ref_id)
    }

    /// Returns a handle to the object stored under `ref_id`.
    pub fn resolve<R: Clone + 'static>(&self, ref_id: u32) -> Result<R, Error> {
        match self.slots.get(ref_id as usize) {
            Some(RefSlot::Materialized(value)) => {
                value.downcast_ref::<R>().cloned().ok_or_else(|| {
                    Error::invalid_ref(format!(
                        "Reference {ref_id} does not hold a `{}`",
                        std::any::type_name::<R>()
                    ))
                })
            }
            Some(RefSlot::Reserved) => {
                tracing::debug!(ref_id, "back-reference to an object still being decoded");
                Err(Error::pending_ref(format!(
                    "Unexpected null element for reference {ref_id}: dependency cycle \
                     while decoding `{}`",
                    std::any::type_name::<R>()
                )))
            }
            None => Err(Error::invalid_ref(format!(
                "Reference {ref_id} out of range, {} objects decoded so far",
                self.slots.len()
            ))),
        }
    }

    /// Inspects the next value. A nil marker or a back-reference record is
    /// consumed; a plain value is left in place for the inner serializer.
    pub fn read_ref_header(&self, reader: &mut Reader) -> Result<RefHeader, Error> {
        let head = reader.peek_u8()?;
        if head == TypeId::NONE.as_u8() {
            reader.read_u8()?;
            return Ok(RefHeader::Null);
        }
        if head != TypeId::EXT.as_u8() || reader.remaining() < 2 {
            return Ok(RefHeader::Value);
        }
        if reader.slice_after_cursor()[1] as i8 != REF_EXT_TYPE {
            // some other extension, owned by the inner format
            return Ok(RefHeader::Value);
        }
        reader.skip(2)?;
        let payload_len = reader.read_varuint32()? as usize;
        let start = reader.get_cursor();
        let ref_id = reader.read_varuint32()?;
        if reader.get_cursor() - start != payload_len {
            return Err(Error::invalid_ref(format!(
                "Back-reference payload declares {payload_len} bytes but the id spans {}",
                reader.get_cursor() - start
            )));
        }
        Ok(RefHeader::Ref(ref_id))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
