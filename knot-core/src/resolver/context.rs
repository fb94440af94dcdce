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

use crate::buffer::{Reader, Writer};
use crate::error::Error;
use crate::knot::Knot;
use crate::resolver::ref_resolver::{RefReader, RefWriter};

/// Per-call encode state: the output buffer, the identity table and the
/// nesting depth.
pub struct WriteContext<'se> {
    pub writer: &'se mut Writer,
    knot: &'se Knot,
    pub ref_writer: RefWriter,
    max_depth: u32,
    current_depth: u32,
}

impl<'se> WriteContext<'se> {
    pub fn new(knot: &'se Knot, writer: &'se mut Writer) -> WriteContext<'se> {
        WriteContext {
            writer,
            knot,
            ref_writer: RefWriter::new(),
            max_depth: knot.get_config().max_depth(),
            current_depth: 0,
        }
    }

    #[inline(always)]
    pub fn get_knot(&self) -> &'se Knot {
        self.knot
    }

    pub fn current_depth(&self) -> u32 {
        self.current_depth
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.max_depth {
            return Err(depth_exceeded(self.max_depth, self.current_depth));
        }
        Ok(())
    }

    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}

/// Per-call decode state. Mirrors [`WriteContext`].
pub struct ReadContext<'de, 'bf: 'de> {
    pub reader: Reader<'bf>,
    knot: &'de Knot,
    pub ref_reader: RefReader,
    max_depth: u32,
    current_depth: u32,
}

impl<'de, 'bf: 'de> ReadContext<'de, 'bf> {
    pub fn new(knot: &'de Knot, reader: Reader<'bf>) -> ReadContext<'de, 'bf> {
        ReadContext {
            reader,
            knot,
            ref_reader: RefReader::new(),
            max_depth: knot.get_config().max_depth(),
            current_depth: 0,
        }
    }

    #[inline(always)]
    pub fn get_knot(&self) -> &'de Knot {
        self.knot
    }

    pub fn current_depth(&self) -> u32 {
        self.current_depth
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.max_depth {
            return Err(depth_exceeded(self.max_depth, self.current_depth));
        }
        Ok(())
    }

    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}

#[cold]
fn depth_exceeded(max_depth: u32, current_depth: u32) -> Error {
    tracing::debug!(max_depth, current_depth, "object graph too deep");
    Error::depth_exceed(format!(
        "Maximum object nesting depth ({max_depth}) exceeded. Current depth: {current_depth}. \
         Consider increasing max_depth if this is expected."
    ))
}
