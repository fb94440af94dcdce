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

use crate::buffer::{wire_len, Reader};
use crate::ensure;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::util::read_len;
use crate::serializer::{KnotDefault, Serializer};
use crate::types::TypeId;

/// Writes `len` followed by every element with its own header.
pub fn write_list<'a, T, I>(
    len: usize,
    items: I,
    context: &mut WriteContext,
) -> Result<(), Error>
where
    T: Serializer + 'a,
    I: IntoIterator<Item = &'a T>,
{
    context.writer.write_varuint32(wire_len(len)?);
    for item in items {
        item.knot_write(context)?;
    }
    Ok(())
}

pub fn read_list<T: Serializer>(context: &mut ReadContext) -> Result<Vec<T>, Error> {
    let len = read_len(&mut context.reader)?;
    let mut vec = Vec::with_capacity(len);
    for _ in 0..len {
        vec.push(T::knot_read(context)?);
    }
    Ok(vec)
}

/// Element count of the list starting at the cursor, without consuming it.
pub fn peek_list_len(reader: &Reader) -> Result<usize, Error> {
    let header = reader.peek_u8()?;
    ensure!(
        header == TypeId::LIST.as_u8(),
        Error::type_mismatch(TypeId::LIST.as_u8(), header)
    );
    let (len, width) = reader.peek_varuint32_at(1)?;
    let len = len as usize;
    ensure!(
        len <= reader.remaining() - 1 - width,
        Error::malformed_length(format!(
            "Declared list length {len} exceeds the remaining input"
        ))
    );
    Ok(len)
}

impl<T: Serializer> Serializer for Vec<T> {
    fn knot_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        write_list(self.len(), self.iter(), context)
    }

    fn knot_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        read_list(context)
    }

    fn knot_reserved_space() -> usize {
        std::mem::size_of::<u32>() + 1
    }

    fn knot_static_type_id() -> TypeId {
        TypeId::LIST
    }
}

impl<T> KnotDefault for Vec<T> {
    fn knot_default() -> Self {
        Vec::new()
    }
}
