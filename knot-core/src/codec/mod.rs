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

//! Identity tracking formatters for reference types.
//!
//! Both codecs wrap the inner [`Serializer`] of a referent. The first
//! occurrence of an object is encoded in full and assigned the next id; every
//! later occurrence becomes a back-reference record carrying that id. They
//! differ in how an object becomes resolvable while it is being decoded:
//!
//! - [`DedupFormatter`] registers an object only once it is complete, so a
//!   back-reference to an ancestor fails. Its encoder rejects such graphs up
//!   front.
//! - [`CycleSafeFormatter`] registers a placeholder before decoding the
//!   contents and promotes it afterwards, which lets descendants point back
//!   at it.

pub mod cycle_safe;
pub mod dedup;

pub use cycle_safe::CycleSafeFormatter;
pub use dedup::DedupFormatter;

use crate::bail;
use crate::error::Error;
use crate::knot::Knot;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::ref_resolver::RefHeader;
use crate::serializer::{Formatter, Serializer};
use crate::types::{RefKind, RefMode, TypeId};
use std::rc::Rc;

/// A handle to a shared, identity-bearing object.
///
/// Implemented by the `Rc` based types in [`crate::serializer::shared`]. The
/// wrapping formatters only talk to reference types through this trait.
pub trait SharedRef: Serializer + Clone + Sized {
    /// How the cycle-safe decoder obtains an identity for a new object.
    const KIND: RefKind;

    /// The owned value decoded by the inner serializer.
    type Referent;

    /// Address of the shared allocation.
    fn identity(&self) -> usize;

    /// Full inner encoding of the pointee, header included.
    fn write_referent(&self, context: &mut WriteContext) -> Result<(), Error>;

    fn read_referent(context: &mut ReadContext) -> Result<Self::Referent, Error>;

    fn wrap(referent: Self::Referent) -> Self;

    /// Allocates the object that will receive the referent. Only called for
    /// [`RefKind::Placeholder`] and [`RefKind::FixedSize`].
    fn reserve(context: &mut ReadContext) -> Result<Self, Error> {
        let _ = context;
        bail!(
            "`{}` cannot be allocated ahead of its contents",
            std::any::type_name::<Self>()
        )
    }

    /// Moves a decoded referent into an object returned by [`SharedRef::reserve`],
    /// keeping its identity.
    fn promote(&self, referent: Self::Referent) -> Result<(), Error> {
        let _ = referent;
        bail!("`{}` cannot be promoted", std::any::type_name::<Self>())
    }
}

/// The wrapping formatter for `R`, created once per [`Knot`].
pub fn shared_formatter<R: SharedRef>(knot: &Knot) -> Rc<dyn Formatter<R>> {
    let ref_mode = knot.get_config().ref_mode();
    knot.get_formatter_cache().get_or_insert_with::<R>(|| {
        let formatter: Rc<dyn Formatter<R>> = match ref_mode {
            RefMode::Dedup => Rc::new(DedupFormatter::<R>::new()),
            RefMode::CycleSafe => Rc::new(CycleSafeFormatter::<R>::new()),
        };
        formatter
    })
}

/// `Serializer::knot_write` of every reference type.
pub fn write_shared<R: SharedRef>(value: &R, context: &mut WriteContext) -> Result<(), Error> {
    let formatter = context.get_knot().formatter_for::<R>();
    formatter.write(Some(value), context)
}

/// `Serializer::knot_read` of every reference type. A nil marker is an error
/// here, optional references are read through `Option<R>`.
pub fn read_shared<R: SharedRef>(context: &mut ReadContext) -> Result<R, Error> {
    let formatter = context.get_knot().formatter_for::<R>();
    formatter.read(context)?.ok_or_else(|| {
        Error::invalid_data(format!(
            "Unexpected nil for non-optional `{}`",
            std::any::type_name::<R>()
        ))
    })
}

/// Encode side shared by both codecs.
///
/// With `reject_cycles`, meeting an object whose own encode has not finished
/// fails with [`Error::CyclicReference`] instead of writing a back-reference.
pub(crate) fn write_tracked<R: SharedRef>(
    value: Option<&R>,
    context: &mut WriteContext,
    reject_cycles: bool,
) -> Result<(), Error> {
    let Some(value) = value else {
        context.writer.write_u8(TypeId::NONE.as_u8());
        return Ok(());
    };
    let ptr = value.identity();
    if reject_cycles && context.ref_writer.is_in_flight(ptr) {
        tracing::debug!(
            type_name = std::any::type_name::<R>(),
            "rejecting cyclic reference"
        );
        return Err(Error::cyclic_reference::<R>());
    }
    if context.ref_writer.try_write_ref(context.writer, ptr) {
        return Ok(());
    }
    context.inc_depth()?;
    let entered = context.ref_writer.enter(ptr);
    // an object already in flight was assigned an id and never gets here
    debug_assert!(entered, "object entered twice while being encoded");
    let result = value.write_referent(context);
    context.ref_writer.leave(ptr);
    context.dec_depth();
    result
}

/// Decode side shared by both codecs: handles the nil marker and
/// back-references, and runs `read_value` for a new object.
pub(crate) fn read_tracked<'de, 'bf, R: SharedRef>(
    context: &mut ReadContext<'de, 'bf>,
    read_value: impl FnOnce(&mut ReadContext<'de, 'bf>) -> Result<R, Error>,
) -> Result<Option<R>, Error> {
    match context.ref_reader.read_ref_header(&mut context.reader)? {
        RefHeader::Null => Ok(None),
        RefHeader::Ref(ref_id) => context.ref_reader.resolve::<R>(ref_id).map(Some),
        RefHeader::Value => {
            context.inc_depth()?;
            let result = read_value(context);
            context.dec_depth();
            result.map(Some)
        }
    }
}

/// Reserves the next id, decodes the referent and only then makes the object
/// resolvable. A back-reference to it from within its own contents fails.
pub(crate) fn read_registered<R: SharedRef>(context: &mut ReadContext) -> Result<R, Error> {
    let ref_id = context.ref_reader.reserve_slot()?;
    let referent = R::read_referent(context)?;
    let value = R::wrap(referent);
    context.ref_reader.materialize(ref_id, value.clone())?;
    Ok(value)
}
