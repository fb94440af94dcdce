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

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Field, Fields, Index};

/// A struct field together with how to reach it.
pub struct SourceField<'a> {
    pub field: &'a Field,
    pub index: usize,
    pub is_tuple_struct: bool,
}

impl<'a> SourceField<'a> {
    /// `self.name` or `self.0`.
    pub fn access(&self) -> TokenStream {
        match &self.field.ident {
            Some(ident) => quote! { self.#ident },
            None => {
                let index = Index::from(self.index);
                quote! { self.#index }
            }
        }
    }

    /// Local variable holding the decoded value.
    pub fn local(&self) -> proc_macro2::Ident {
        format_ident!("_f{}", self.index)
    }

    /// Generate field initialization syntax for struct construction.
    /// - tuple struct: just the value
    /// - named struct: `field_name: value`
    pub fn field_init(&self, value: TokenStream) -> TokenStream {
        match &self.field.ident {
            Some(ident) if !self.is_tuple_struct => quote! { #ident: #value },
            _ => value,
        }
    }
}

/// Fields in declaration order, which is also their wire order.
pub fn source_fields(fields: &Fields) -> Vec<SourceField<'_>> {
    let is_tuple_struct = matches!(fields, Fields::Unnamed(_));
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| SourceField {
            field,
            index,
            is_tuple_struct,
        })
        .collect()
}

/// Generate Self construction syntax.
/// - unit struct: `Self`
/// - tuple struct: `Self(field0, field1, ...)`
/// - named struct: `Self { field0, field1, ... }`
pub fn self_construction(fields: &Fields, field_inits: &[TokenStream]) -> TokenStream {
    match fields {
        Fields::Unit => quote! { Self },
        Fields::Unnamed(_) => quote! { Self( #(#field_inits),* ) },
        Fields::Named(_) => quote! { Self { #(#field_inits),* } },
    }
}

/// Name of the context parameter of the per-field closure. Unused when there
/// are no fields.
pub fn closure_arg(source_fields: &[SourceField<'_>]) -> proc_macro2::Ident {
    if source_fields.is_empty() {
        format_ident!("_context")
    } else {
        format_ident!("context")
    }
}
