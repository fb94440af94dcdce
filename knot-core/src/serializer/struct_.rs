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

//! Runtime support for `#[derive(KnotObject)]`.
//!
//! A struct is `STRUCT`, its field count, then every field in declaration
//! order. Each struct level counts against the context's depth limit.

use crate::ensure;
use crate::error::Error;
use crate::resolver::context::{ReadContext, WriteContext};

#[inline(always)]
pub fn write_struct<'se>(
    context: &mut WriteContext<'se>,
    field_count: u32,
    write_fields: impl FnOnce(&mut WriteContext<'se>) -> Result<(), Error>,
) -> Result<(), Error> {
    context.writer.write_varuint32(field_count);
    context.inc_depth()?;
    let result = write_fields(context);
    context.dec_depth();
    result
}

#[inline(always)]
pub fn read_struct<'de, 'bf, T: 'static>(
    context: &mut ReadContext<'de, 'bf>,
    field_count: u32,
    read_fields: impl FnOnce(&mut ReadContext<'de, 'bf>) -> Result<T, Error>,
) -> Result<T, Error> {
    let actual = context.reader.read_varuint32()?;
    ensure!(
        actual == field_count,
        Error::invalid_data(format!(
            "`{}` has {field_count} fields, stream declares {actual}",
            std::any::type_name::<T>()
        ))
    );
    context.inc_depth()?;
    let result = read_fields(context);
    context.dec_depth();
    result
}
