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
use std::marker::PhantomData;

/// Collapses repeated references into back-references and rejects true
/// cycles.
///
/// On encode an object is in flight from the moment its contents start until
/// they are done; reaching it again in that window is a cycle and fails with
/// [`Error::CyclicReference`]. On decode an object becomes resolvable only
/// after its contents are decoded, so a stream that loops back to an
/// unfinished object fails with [`Error::PendingRef`].
pub struct DedupFormatter<R> {
    _marker: PhantomData<fn() -> R>,
}

impl<R> DedupFormatter<R> {
    pub fn new() -> Self {
        DedupFormatter {
            _marker: PhantomData,
        }
    }
}

impl<R> Default for DedupFormatter<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SharedRef> Formatter<R> for DedupFormatter<R> {
    fn write(&self, value: Option<&R>, context: &mut WriteContext) -> Result<(), Error> {
        write_tracked(value, context, true)
    }

    fn read(&self, context: &mut ReadContext) -> Result<Option<R>, Error> {
        read_tracked(context, read_registered::<R>)
    }
}
