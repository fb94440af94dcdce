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

use crate::error::Error;
use crate::knot::Knot;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::util::read_basic_type_info;
use crate::types::TypeId;
use std::marker::PhantomData;
use std::rc::Rc;

/// Value used to fill a placeholder before its real contents are decoded.
pub trait KnotDefault: Sized {
    fn knot_default() -> Self;
}

// No blanket impl for `T: Default`: it would overlap with the impls for the
// reference types, whose defaults must allocate.

pub trait Serializer: 'static {
    /// Entry point of the serialization: type header, then data.
    ///
    /// Serializers for `Option`, `Box` and the reference types override this.
    fn knot_write(&self, context: &mut WriteContext) -> Result<(), Error>
    where
        Self: Sized,
    {
        Self::knot_write_type_info(context);
        self.knot_write_data(context)
    }

    /// Write the data into the buffer. Need to be implemented.
    fn knot_write_data(&self, context: &mut WriteContext) -> Result<(), Error>;

    #[inline(always)]
    fn knot_write_type_info(context: &mut WriteContext)
    where
        Self: Sized,
    {
        context
            .writer
            .write_u8(Self::knot_static_type_id().as_u8());
    }

    /// Entry point of deserialization.
    fn knot_read(context: &mut ReadContext) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::knot_read_type_info(context)?;
        Self::knot_read_data(context)
    }

    fn knot_read_data(context: &mut ReadContext) -> Result<Self, Error>
    where
        Self: Sized;

    #[inline(always)]
    fn knot_read_type_info(context: &mut ReadContext) -> Result<(), Error>
    where
        Self: Sized,
    {
        read_basic_type_info::<Self>(context)
    }

    fn knot_static_type_id() -> TypeId
    where
        Self: Sized;

    /// The formatter that encodes standalone values of this type.
    ///
    /// Value types get a fresh [`InnerFormatter`]. Reference types override
    /// this to hand out the identity tracking formatter cached on `knot`.
    fn knot_formatter(knot: &Knot) -> Rc<dyn Formatter<Self>>
    where
        Self: Sized,
    {
        let _ = knot;
        Rc::new(InnerFormatter::<Self>::new())
    }

    /// Capacity hint for the output buffer.
    #[inline(always)]
    fn knot_reserved_space() -> usize
    where
        Self: Sized,
    {
        0
    }
}

/// Encodes an optional `T`, writing the nil marker for `None`.
///
/// The same shape is shared by the inner formatter of value types and the
/// wrapping formatters of reference types, so callers cannot tell them apart.
pub trait Formatter<T> {
    fn write(&self, value: Option<&T>, context: &mut WriteContext) -> Result<(), Error>;

    fn read(&self, context: &mut ReadContext) -> Result<Option<T>, Error>;
}

/// Formatter for value types: no identity, straight to the [`Serializer`].
pub struct InnerFormatter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> InnerFormatter<T> {
    pub fn new() -> Self {
        InnerFormatter {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for InnerFormatter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serializer> Formatter<T> for InnerFormatter<T> {
    fn write(&self, value: Option<&T>, context: &mut WriteContext) -> Result<(), Error> {
        match value {
            Some(value) => value.knot_write(context),
            None => {
                context.writer.write_u8(TypeId::NONE.as_u8());
                Ok(())
            }
        }
    }

    fn read(&self, context: &mut ReadContext) -> Result<Option<T>, Error> {
        if context.reader.peek_u8()? == TypeId::NONE.as_u8() {
            context.reader.read_u8()?;
            return Ok(None);
        }
        T::knot_read(context).map(Some)
    }
}
