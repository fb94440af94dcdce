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

use crate::codec::{read_registered, read_tracked, write_tracked, SharedRef};
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::Formatter;
use crate::types::RefKind;
use std::marker::PhantomData;

/// Dedup plus support for objects that reference an ancestor still being
/// decoded.
///
/// How a new object is decoded depends on [`SharedRef::KIND`]:
///
/// - `Placeholder`: a default-valued object is registered under the next id,
///   the contents are decoded as an independent value, then moved into the
///   placeholder. Back-references met in between resolve to the placeholder.
/// - `FixedSize`: the element count is peeked, an array of that length is
///   registered, elements are decoded and copied in one by one.
/// - `Leaf`: cannot contain references, decoded then registered.
/// - `Deferred`: handled like [`crate::codec::DedupFormatter`], including
///   cycle rejection on encode.
pub struct CycleSafeFormatter<R> {
    _marker: PhantomData<fn() -> R>,
}

impl<R> CycleSafeFormatter<R> {
    pub fn new() -> Self {
        CycleSafeFormatter {
            _marker: PhantomData,
        }
    }
}

impl<R> Default for CycleSafeFormatter<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SharedRef> Formatter<R> for CycleSafeFormatter<R> {
    fn write(&self, value: Option<&R>, context: &mut WriteContext) -> Result<(), Error> {
        write_tracked(value, context, R::KIND == RefKind::Deferred)
    }

    fn read(&self, context: &mut ReadContext) -> Result<Option<R>, Error> {
        match R::KIND {
            RefKind::Placeholder | RefKind::FixedSize => read_tracked(context, read_promoted::<R>),
            RefKind::Leaf | RefKind::Deferred => read_tracked(context, read_registered::<R>),
        }
    }
}

fn read_promoted<R: SharedRef>(context: &mut ReadContext) -> Result<R, Error> {
    let placeholder = R::reserve(context)?;
    context.ref_reader.register(placeholder.clone())?;
    let referent = R::read_referent(context)?;
    placeholder.promote(referent)?;
    Ok(placeholder)
}
