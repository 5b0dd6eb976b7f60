// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Item, parse_macro_input};

/// Attribute that accepts any arguments and leaves the annotated item untouched.
///
/// Stands in for `tracing::instrument` when the `tracing` feature of `jpeglite` is disabled,
/// so that `#[instrument(level = "debug", skip_all, err)]` keeps compiling.
#[proc_macro_attribute]
pub fn noop(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as Item);
    quote! { #item }.into()
}
