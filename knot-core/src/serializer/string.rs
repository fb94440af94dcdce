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
use crate::serializer::util::check_len;
use crate::serializer::{KnotDefault, Serializer};
use crate::types::TypeId;

impl Serializer for String {
    #[inline(always)]
    fn knot_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        context.writer.write_utf8_string(self)
    }

    #[inline(always)]
    fn knot_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        let len = context.reader.peek_varuint32_at(0)?.0 as usize;
        check_len(&context.reader, len)?;
        context.reader.read_utf8_string()
    }

    #[inline(always)]
    fn knot_reserved_space() -> usize {
        std::mem::size_of::<u32>() + 1
    }

    #[inline(always)]
    fn knot_static_type_id() -> TypeId {
        TypeId::STRING
    }
}

impl KnotDefault for String {
    #[inline(always)]
    fn knot_default() -> Self {
        String::new()
    }
}
