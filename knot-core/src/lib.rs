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

//! # Knot Core
//!
//! Reference identity and cycle support for a compact tagged binary format.
//!
//! A plain tree serializer duplicates every object reachable twice and never
//! terminates on a cycle. Knot intercepts every reference typed value, keeps
//! an identity table on each side of the wire, and replaces repeated
//! occurrences with back-reference records.
//!
//! ## Architecture
//!
//! - **`knot`**: entry point ([`Knot`]), owns config and formatter cache
//! - **`buffer`**: byte cursor with varint support
//! - **`serializer`**: inner format for value types, plus the reference types
//! - **`codec`**: the dedup-only and cycle-safe wrapping formatters
//! - **`resolver`**: identity tables, per-call contexts, formatter cache
//! - **`types`**: wire type ids and reference modes
//! - **`error`**: error type and helper macros
//!
//! ## Reference modes
//!
//! - [`RefMode::Dedup`]: shared objects are encoded once. An object graph
//!   with a true cycle fails to encode with [`Error::CyclicReference`].
//! - [`RefMode::CycleSafe`] (default): additionally, a [`Shared`] object may be
//!   referenced from inside its own contents.
//!
//! ```rust
//! use knot_core::{shared, Knot, Shared};
//! use std::rc::Rc;
//!
//! let knot = Knot::cycle_safe();
//! let list = vec![shared(1), shared(2)];
//! let bytes = knot.serialize(&list).unwrap();
//! let decoded: Vec<Shared<i32>> = knot.deserialize(&bytes).unwrap();
//! assert_eq!(*decoded[1].borrow(), 2);
//! assert!(!Rc::ptr_eq(&decoded[0], &decoded[1]));
//! ```

pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod knot;
pub mod resolver;
pub mod serializer;
pub mod types;

pub use crate::codec::SharedRef;
pub use crate::config::Config;
pub use crate::error::Error;
pub use crate::knot::Knot;
pub use crate::resolver::context::{ReadContext, WriteContext};
pub use crate::serializer::grid::Grid;
pub use crate::serializer::shared::{shared, shared_array, Shared, SharedArray};
pub use crate::serializer::{Formatter, InnerFormatter, KnotDefault, Serializer};
pub use crate::types::{RefKind, RefMode};
