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
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{KnotDefault, Serializer};
use crate::types::TypeId;

// `None` is the nil marker. `Some` is exactly the encoding of the inner value,
// so an `Option` around a reference type still goes through its formatter.
impl<T: Serializer> Serializer for Option<T> {
    fn knot_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        match self {
            Some(v) => v.knot_write(context),
            None => {
                context.writer.write_u8(TypeId::NONE.as_u8());
                Ok(())
            }
        }
    }

    fn knot_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        match self {
            Some(v) => v.knot_write_data(context),
            None => Err(Error::invalid_data(
                "Option::None has no data, write it with its header",
            )),
        }
    }

    fn knot_read(context: &mut ReadContext) -> Result<Self, Error> {
        if context.reader.peek_u8()? == TypeId::NONE.as_u8() {
            context.reader.read_u8()?;
            return Ok(None);
        }
        T::knot_read(context).map(Some)
    }

    fn knot_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        T::knot_read_data(context).map(Some)
    }

    fn knot_reserved_space() -> usize {
        T::knot_reserved_space()
    }

    fn knot_static_type_id() -> TypeId {
        T::knot_static_type_id()
    }
}

impl<T> KnotDefault for Option<T> {
    fn knot_default() -> Self {
        None
    }
}
