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

use crate::types::RefMode;

/// Configuration for knot serialization.
///
/// Owned by [`crate::Knot`] and copied into every `WriteContext`/`ReadContext`
/// so both sides of a call agree on the limits.
#[derive(Clone, Debug)]
pub struct Config {
    /// Which reference codec wraps `Rc` based types.
    pub ref_mode: RefMode,
    /// Maximum nesting of objects and references before a call fails with
    /// [`crate::error::Error::DepthExceed`].
    pub max_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ref_mode: RefMode::default(),
            max_depth: 256,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn ref_mode(&self) -> RefMode {
        self.ref_mode
    }

    #[inline(always)]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
