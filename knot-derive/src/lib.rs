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

//! # Knot Derive Macros
//!
//! ### `#[derive(KnotObject)]`
//!
//! Implements `Serializer` and `KnotDefault` for a struct with named fields,
//! unnamed fields, or no fields. Fields are encoded in declaration order.
//!
//! ```rust,ignore
//! use knot_core::Shared;
//! use knot_derive::KnotObject;
//!
//! #[derive(KnotObject)]
//! struct Node {
//!     value: i32,
//!     next: Option<Shared<Node>>,
//! }
//!
//! #[derive(KnotObject)]
//! struct Pair(String, u64);
//! ```
//!
//! A type that implements `KnotDefault` by hand opts out of the generated
//! one with `#[knot(no_default)]`.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod object;
mod util;

pub(crate) struct KnotAttrs {
    pub generate_default: bool,
}

fn parse_attrs(input: &DeriveInput) -> syn::Result<KnotAttrs> {
    let mut attrs = KnotAttrs {
        generate_default: true,
    };
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("knot")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("no_default") {
                attrs.generate_default = false;
                Ok(())
            } else {
                Err(meta.error("unsupported knot attribute"))
            }
        })?;
    }
    Ok(attrs)
}

/// Derive macro for object serialization.
///
/// Generates the `Serializer` implementation: a `STRUCT` header, the field
/// count, then each field through its own serializer. Shared reference
/// fields keep their identity through the reference codec of the `Knot`
/// running the call.
#[proc_macro_derive(KnotObject, attributes(knot))]
pub fn proc_macro_derive_knot_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let result = parse_attrs(&input).and_then(|attrs| object::derive_serializer(&input, attrs));
    match result {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
