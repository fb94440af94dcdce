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

use crate::util::{closure_arg, SourceField};
use proc_macro2::TokenStream;
use quote::quote;

pub fn gen_write_data(source_fields: &[SourceField<'_>]) -> TokenStream {
    let field_count = source_fields.len() as u32;
    let write_fields = source_fields.iter().map(|sf| {
        let ty = &sf.field.ty;
        let access = sf.access();
        quote! {
            <#ty as knot_core::Serializer>::knot_write(&#access, context)?;
        }
    });
    let context = closure_arg(source_fields);
    quote! {
        fn knot_write_data(&self, context: &mut knot_core::WriteContext) -> Result<(), knot_core::Error> {
            knot_core::serializer::struct_::write_struct(context, #field_count, |#context| {
                #(#write_fields)*
                Ok(())
            })
        }
    }
}

pub fn gen_reserved_space(source_fields: &[SourceField<'_>]) -> TokenStream {
    // header, field count, then at least one byte per field; field types are
    // not consulted because a struct may contain itself
    let space = 2 + source_fields.len();
    quote! {
        #[inline(always)]
        fn knot_reserved_space() -> usize {
            #space
        }
    }
}
