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

use crate::object::{read, write};
use crate::util::source_fields;
use crate::KnotAttrs;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, Data, DeriveInput, Generics};

/// Every type parameter must itself be encodable and default-constructible.
fn add_trait_bounds(mut generics: Generics) -> Generics {
    let type_params: Vec<_> = generics
        .type_params()
        .map(|tp| tp.ident.clone())
        .collect();
    let where_clause = generics.make_where_clause();
    for ident in type_params {
        where_clause.predicates.push(parse_quote! {
            #ident: knot_core::Serializer + knot_core::KnotDefault
        });
    }
    generics
}

pub fn derive_serializer(ast: &DeriveInput, attrs: KnotAttrs) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    let fields = match &ast.data {
        Data::Struct(s) => &s.fields,
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "KnotObject can only be derived for structs",
            ))
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(name, "Union is not supported"));
        }
    };
    let source_fields = source_fields(fields);

    let generics = add_trait_bounds(ast.generics.clone());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let write_data_ts = write::gen_write_data(&source_fields);
    let reserved_space_ts = write::gen_reserved_space(&source_fields);
    let read_data_ts = read::gen_read_data(fields, &source_fields);

    let default_impl = if attrs.generate_default {
        let default_ts = read::gen_default(fields, &source_fields);
        quote! {
            impl #impl_generics knot_core::KnotDefault for #name #ty_generics #where_clause {
                #default_ts
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl #impl_generics knot_core::Serializer for #name #ty_generics #where_clause {
            #write_data_ts

            #read_data_ts

            #reserved_space_ts

            #[inline(always)]
            fn knot_static_type_id() -> knot_core::types::TypeId {
                knot_core::types::TypeId::STRUCT
            }
        }

        #default_impl
    })
}
