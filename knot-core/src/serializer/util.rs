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

use crate::buffer::Reader;
use crate::ensure;
use crate::error::Error;
use crate::resolver::context::ReadContext;
use crate::serializer::Serializer;
use crate::types::{TypeId, REF_EXT_TYPE};

/// Consumes the one-byte header and checks it against `T`'s static type id.
#[inline(always)]
pub fn read_basic_type_info<T: Serializer>(context: &mut ReadContext) -> Result<(), Error> {
    let expected = T::knot_static_type_id();
    let actual = context.reader.read_u8()?;
    if actual == expected.as_u8() {
        return Ok(());
    }
    Err(mismatch::<T>(&context.reader, expected, actual))
}

#[cold]
fn mismatch<T: 'static>(reader: &Reader, expected: TypeId, actual: u8) -> Error {
    if actual == TypeId::NONE.as_u8() {
        return Error::invalid_data(format!(
            "Unexpected nil for non-optional `{}`",
            std::any::type_name::<T>()
        ));
    }
    if actual == TypeId::EXT.as_u8() && reader.peek_u8().ok() == Some(REF_EXT_TYPE as u8) {
        return Error::invalid_ref(format!(
            "Back-reference found where a `{}` value was expected",
            std::any::type_name::<T>()
        ));
    }
    Error::enhance_type_error::<T>(Error::type_mismatch(expected.as_u8(), actual))
}

/// Reads a declared element count and rejects counts the remaining input
/// cannot possibly hold, every element taking at least its header byte.
pub fn read_len(reader: &mut Reader) -> Result<usize, Error> {
    let len = reader.read_varuint32()? as usize;
    check_len(reader, len)?;
    Ok(len)
}

pub fn check_len(reader: &Reader, len: usize) -> Result<(), Error> {
    ensure!(
        len <= reader.remaining(),
        Error::malformed_length(format!(
            "Declared length {len} exceeds the {} remaining bytes",
            reader.remaining()
        ))
    );
    Ok(())
}
