//! Record derive macro implementation

use crate::attrs;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    if !matches!(input.data, Data::Struct(_)) {
        return Err(syn::Error::new_spanned(
            &input,
            "Record can only be derived for structs",
        ));
    }

    let table =
        attrs::table_name(&input.attrs)?.unwrap_or_else(|| name.to_string().to_lowercase());

    Ok(quote! {
        impl #impl_generics ::quickquery::Record for #name #ty_generics #where_clause {
            const TABLE: &'static str = #table;
        }
    })
}
