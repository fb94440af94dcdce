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

use crate::util::{closure_arg, self_construction, SourceField};
use proc_macro2::TokenStream;
use quote::quote;
use syn::Fields;

pub fn gen_read_data(fields: &Fields, source_fields: &[SourceField<'_>]) -> TokenStream {
    let field_count = source_fields.len() as u32;
    let read_fields = source_fields.iter().map(|sf| {
        let ty = &sf.field.ty;
        let local = sf.local();
        quote! {
            let #local = <#ty as knot_core::Serializer>::knot_read(context)?;
        }
    });
    let field_inits: Vec<TokenStream> = source_fields
        .iter()
        .map(|sf| {
            let local = sf.local();
            sf.field_init(quote! { #local })
        })
        .collect();
    let construction = self_construction(fields, &field_inits);
    let context = closure_arg(source_fields);
    quote! {
        fn knot_read_data(context: &mut knot_core::ReadContext) -> Result<Self, knot_core::Error> {
            knot_core::serializer::struct_::read_struct(context, #field_count, |#context| {
                #(#read_fields)*
                Ok(#construction)
            })
        }
    }
}

pub fn gen_default(fields: &Fields, source_fields: &[SourceField<'_>]) -> TokenStream {
    let field_inits: Vec<TokenStream> = source_fields
        .iter()
        .map(|sf| {
            let ty = &sf.field.ty;
            sf.field_init(quote! { <#ty as knot_core::KnotDefault>::knot_default() })
        })
        .collect();
    let construction = self_construction(fields, &field_inits);
    quote! {
        fn knot_default() -> Self {
            #construction
        }
    }
}
