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

//! Serializers for the reference types.
//!
//! Every `Rc` below carries identity: encoding the same allocation twice in
//! one call produces one copy plus a back-reference, and decoding restores a
//! single allocation shared by all its holders.
//!
//! | type               | decoded as                                 |
//! |--------------------|--------------------------------------------|
//! | [`Shared<T>`]      | placeholder, promoted once `T` is complete |
//! | `Rc<str>`          | leaf value                                 |
//! | [`SharedArray<T>`] | fixed-length array allocated up front      |
//! | `Rc<Grid<T>>`      | registered after its elements              |
//!
//! ```rust
//! use knot_core::{shared, Knot, Shared};
//!
//! let knot = Knot::default();
//! let a: Shared<i32> = shared(7);
//! let bytes = knot.serialize(&vec![a.clone(), a.clone()]).unwrap();
//! let decoded: Vec<Shared<i32>> = knot.deserialize(&bytes).unwrap();
//! assert!(std::rc::Rc::ptr_eq(&decoded[0], &decoded[1]));
//! ```

use crate::buffer::wire_len;
use crate::codec::{read_shared, shared_formatter, write_shared, SharedRef};
use crate::ensure;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::grid::Grid;
use crate::serializer::list::{peek_list_len, read_list};
use crate::serializer::{KnotDefault, Serializer};
use crate::types::{RefKind, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

/// A shared, mutable object. The only reference type that can close a cycle
/// through one of its own fields.
pub type Shared<T> = Rc<RefCell<T>>;

/// A shared single-dimensional array with mutable elements.
pub type SharedArray<T> = Rc<[RefCell<T>]>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

pub fn shared_array<T>(values: impl IntoIterator<Item = T>) -> SharedArray<T> {
    values.into_iter().map(RefCell::new).collect()
}

// Reference types never encode themselves directly: they look up the wrapping
// formatter of the `Knot` running the call.
macro_rules! shared_ref_dispatch {
    () => {
        fn knot_write(&self, context: &mut WriteContext) -> Result<(), Error> {
            write_shared(self, context)
        }

        fn knot_read(context: &mut ReadContext) -> Result<Self, Error> {
            read_shared(context)
        }

        fn knot_formatter(knot: &crate::knot::Knot) -> Rc<dyn crate::serializer::Formatter<Self>> {
            shared_formatter::<Self>(knot)
        }
    };
}

#[cold]
fn borrow_error<T: ?Sized + 'static>(err: impl std::fmt::Display) -> Error {
    Error::invalid_data(format!(
        "`{}` is mutably borrowed: {err}",
        std::any::type_name::<T>()
    ))
}

impl<T: Serializer + KnotDefault> Serializer for Rc<RefCell<T>> {
    shared_ref_dispatch!();

    fn knot_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        let value = self.try_borrow().map_err(borrow_error::<Self>)?;
        value.knot_write_data(context)
    }

    fn knot_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        T::knot_read_data(context).map(shared)
    }

    fn knot_reserved_space() -> usize {
        T::knot_reserved_space()
    }

    fn knot_static_type_id() -> TypeId {
        T::knot_static_type_id()
    }
}

impl<T: Serializer + KnotDefault> SharedRef for Rc<RefCell<T>> {
    const KIND: RefKind = RefKind::Placeholder;
    type Referent = T;

    fn identity(&self) -> usize {
        Rc::as_ptr(self) as *const () as usize
    }

    fn write_referent(&self, context: &mut WriteContext) -> Result<(), Error> {
        let value = self.try_borrow().map_err(borrow_error::<Self>)?;
        value.knot_write(context)
    }

    fn read_referent(context: &mut ReadContext) -> Result<T, Error> {
        T::knot_read(context)
    }

    fn wrap(referent: T) -> Self {
        shared(referent)
    }

    fn reserve(_context: &mut ReadContext) -> Result<Self, Error> {
        Ok(shared(T::knot_default()))
    }

    fn promote(&self, referent: T) -> Result<(), Error> {
        let mut slot = self.try_borrow_mut().map_err(borrow_error::<Self>)?;
        *slot = referent;
        Ok(())
    }
}

impl<T: KnotDefault> KnotDefault for Rc<RefCell<T>> {
    fn knot_default() -> Self {
        shared(T::knot_default())
    }
}

impl Serializer for Rc<str> {
    shared_ref_dispatch!();

    fn knot_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_utf8_string(self)
    }

    fn knot_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        String::knot_read_data(context).map(Rc::from)
    }

    fn knot_reserved_space() -> usize {
        String::knot_reserved_space()
    }

    fn knot_static_type_id() -> TypeId {
        TypeId::STRING
    }
}

impl SharedRef for Rc<str> {
    const KIND: RefKind = RefKind::Leaf;
    type Referent = String;

    fn identity(&self) -> usize {
        Rc::as_ptr(self) as *const () as usize
    }

    fn write_referent(&self, context: &mut WriteContext) -> Result<(), Error> {
        Self::knot_write_type_info(context);
        self.knot_write_data(context)
    }

    fn read_referent(context: &mut ReadContext) -> Result<String, Error> {
        String::knot_read(context)
    }

    fn wrap(referent: String) -> Self {
        Rc::from(referent)
    }
}

impl KnotDefault for Rc<str> {
    fn knot_default() -> Self {
        Rc::from("")
    }
}

impl<T: Serializer + KnotDefault> Serializer for Rc<[RefCell<T>]> {
    shared_ref_dispatch!();

    fn knot_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_varuint32(wire_len(self.len())?);
        for cell in self.iter() {
            let value = cell.try_borrow().map_err(borrow_error::<Self>)?;
            value.knot_write(context)?;
        }
        Ok(())
    }

    fn knot_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        read_list::<T>(context).map(shared_array)
    }

    fn knot_reserved_space() -> usize {
        std::mem::size_of::<u32>() + 1
    }

    fn knot_static_type_id() -> TypeId {
        TypeId::LIST
    }
}

impl<T: Serializer + KnotDefault> SharedRef for Rc<[RefCell<T>]> {
    const KIND: RefKind = RefKind::FixedSize;
    type Referent = Vec<T>;

    fn identity(&self) -> usize {
        Rc::as_ptr(self) as *const () as usize
    }

    fn write_referent(&self, context: &mut WriteContext) -> Result<(), Error> {
        Self::knot_write_type_info(context);
        self.knot_write_data(context)
    }

    fn read_referent(context: &mut ReadContext) -> Result<Vec<T>, Error> {
        Vec::<T>::knot_read(context)
    }

    fn wrap(referent: Vec<T>) -> Self {
        shared_array(referent)
    }

    fn reserve(context: &mut ReadContext) -> Result<Self, Error> {
        let len = peek_list_len(&context.reader)?;
        Ok((0..len).map(|_| RefCell::new(T::knot_default())).collect())
    }

    fn promote(&self, referent: Vec<T>) -> Result<(), Error> {
        ensure!(
            referent.len() == self.len(),
            Error::malformed_length(format!(
                "Array declared {} elements but decoded {}",
                self.len(),
                referent.len()
            ))
        );
        for (cell, value) in self.iter().zip(referent) {
            *cell.try_borrow_mut().map_err(borrow_error::<Self>)? = value;
        }
        Ok(())
    }
}

impl<T> KnotDefault for Rc<[RefCell<T>]> {
    fn knot_default() -> Self {
        Rc::from(Vec::new())
    }
}

impl<T: Serializer> Serializer for Rc<Grid<T>> {
    shared_ref_dispatch!();

    fn knot_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        (**self).knot_write_data(context)
    }

    fn knot_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        Grid::<T>::knot_read_data(context).map(Rc::new)
    }

    fn knot_reserved_space() -> usize {
        Grid::<T>::knot_reserved_space()
    }

    fn knot_static_type_id() -> TypeId {
        TypeId::GRID
    }
}

impl<T: Serializer> SharedRef for Rc<Grid<T>> {
    const KIND: RefKind = RefKind::Deferred;
    type Referent = Grid<T>;

    fn identity(&self) -> usize {
        Rc::as_ptr(self) as *const () as usize
    }

    fn write_referent(&self, context: &mut WriteContext) -> Result<(), Error> {
        (**self).knot_write(context)
    }

    fn read_referent(context: &mut ReadContext) -> Result<Grid<T>, Error> {
        Grid::<T>::knot_read(context)
    }

    fn wrap(referent: Grid<T>) -> Self {
        Rc::new(referent)
    }
}

impl<T> KnotDefault for Rc<Grid<T>> {
    fn knot_default() -> Self {
        Rc::new(Grid::default())
    }
}
