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

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// One-byte header in front of every encoded value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[allow(non_camel_case_types)]
#[repr(u8)]
pub enum TypeId {
    /// The nil marker, written for absent references.
    NONE = 0,
    BOOL = 1,
    INT8 = 2,
    INT16 = 3,
    VAR_INT32 = 5,
    VAR_INT64 = 7,
    FLOAT32 = 10,
    FLOAT64 = 11,
    STRING = 12,
    STRUCT = 15,
    /// Extension record: ext type (i8), varuint payload length, payload.
    EXT = 19,
    LIST = 21,
    /// Rank-2 array: varuint stride, varuint flat length, elements.
    GRID = 30,
    U8 = 64,
    U16 = 65,
    VAR_U32 = 68,
    VAR_U64 = 69,
}

impl TypeId {
    #[inline(always)]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Extension type reserved for back-reference records. The payload is the
/// varuint id of an object already assigned on this wire.
pub const REF_EXT_TYPE: i8 = 0x7F;

/// Selects which reference-tracking codec wraps the reference types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefMode {
    /// Shared references are written once and back-referenced afterwards.
    /// True cycles are rejected.
    Dedup,
    /// Like [`RefMode::Dedup`], and objects may reference an ancestor that is
    /// still being decoded.
    #[default]
    CycleSafe,
}

/// How a reference type obtains its identity while being decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefKind {
    /// Holds no nested references; decoded directly, then registered.
    Leaf,
    /// Fixed-length storage allocated from the peeked length before any
    /// element is decoded.
    FixedSize,
    /// A default placeholder is registered up front and promoted once the
    /// complete value has been decoded.
    Placeholder,
    /// Registered only after its decode finished, cycles through it fail.
    Deferred,
}
