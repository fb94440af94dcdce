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

//! # Knot
//!
//! Binary object serialization that preserves shared references and
//! round-trips cyclic object graphs.
//!
//! ```rust
//! use knot::{shared, Knot, KnotObject, Shared};
//!
//! #[derive(KnotObject)]
//! struct Node {
//!     value: i32,
//!     next: Option<Shared<Node>>,
//! }
//!
//! fn main() -> Result<(), knot::Error> {
//!     let a = shared(Node { value: 1, next: None });
//!     let b = shared(Node { value: 2, next: Some(a.clone()) });
//!     a.borrow_mut().next = Some(b.clone());
//!
//!     let knot = Knot::cycle_safe();
//!     let bytes = knot.serialize(&a)?;
//!     let decoded: Shared<Node> = knot.deserialize(&bytes)?;
//!     let second = decoded.borrow().next.clone().unwrap();
//!     let back = second.borrow().next.clone().unwrap();
//!     assert!(std::rc::Rc::ptr_eq(&decoded, &back));
//!     assert_eq!(second.borrow().value, 2);
//!
//!     // break both cycles so the nodes are freed
//!     a.borrow_mut().next = None;
//!     decoded.borrow_mut().next = None;
//!     Ok(())
//! }
//! ```
//!
//! The derive macro expands to paths under `knot_core`, so crates deriving
//! `KnotObject` depend on `knot-core` as well.

pub use knot_core::{
    error::Error, shared, shared_array, types::RefKind, types::RefMode, Formatter, Grid, Knot,
    KnotDefault, Serializer, Shared, SharedArray,
};
pub use knot_derive::KnotObject;
