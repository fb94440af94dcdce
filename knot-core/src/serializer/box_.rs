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

// Boxes are owned, not shared: no identity, the inner value is encoded inline.
impl<T: Serializer> Serializer for Box<T> {
    fn knot_write(&self, context: &mut WriteContext) -> Result<(), Error> {
        T::knot_write(self.as_ref(), context)
    }

    fn knot_write_data(&self, context: &mut WriteContext) -> Result<(), Error> {
        T::knot_write_data(self.as_ref(), context)
    }

    fn knot_read(context: &mut ReadContext) -> Result<Self, Error> {
        T::knot_read(context).map(Box::new)
    }

    fn knot_read_data(context: &mut ReadContext) -> Result<Self, Error> {
        T::knot_read_data(context).map(Box::new)
    }

    fn knot_reserved_space() -> usize {
        T::knot_reserved_space()
    }

    fn knot_static_type_id() -> TypeId {
        T::knot_static_type_id()
    }
}

impl<T: KnotDefault> KnotDefault for Box<T> {
    fn knot_default() -> Self {
        Box::new(T::knot_default())
    }
}
