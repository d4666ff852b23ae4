//! FromRow derive macro implementation

use crate::attrs;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result, Type};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "FromRow can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "FromRow can only be derived for structs",
            ));
        }
    };

    let mut field_extracts = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let field_attrs = attrs::field_attrs(&field.attrs)?;
        let column_name = field_attrs
            .column
            .unwrap_or_else(|| field_name.to_string());

        let read = if field_attrs.epoch_millis {
            epoch_millis_getter(&field.ty, &column_name)?
        } else {
            quote! { row.get(#column_name)? }
        };
        field_extracts.push(quote! { #field_name: #read });
    }

    Ok(quote! {
        impl #impl_generics ::quickquery::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &::quickquery::ResultRow) -> ::quickquery::DataAccessResult<Self> {
                Ok(Self {
                    #(#field_extracts),*
                })
            }
        }
    })
}

/// `BIGINT` epoch millis read back as `NaiveDateTime` (local wall clock) or `DateTime<Local>`.
fn epoch_millis_getter(ty: &Type, column_name: &str) -> Result<TokenStream> {
    let last = match ty {
        Type::Path(p) if p.qself.is_none() => p.path.segments.last(),
        _ => None,
    };
    match last.map(|s| s.ident.to_string()).as_deref() {
        Some("NaiveDateTime") => Ok(quote! { row.get_local_datetime_millis(#column_name)? }),
        Some("DateTime") => Ok(quote! { row.get_zoned_datetime_millis(#column_name)? }),
        _ => Err(syn::Error::new_spanned(
            ty,
            "epoch_millis fields must be `NaiveDateTime` or `DateTime<Local>`",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_use_generic_get() {
        let input: DeriveInput = syn::parse_quote! {
            struct Person { name: String, #[qq(column = "years")] age: i32 }
        };
        let out = expand(input).unwrap().to_string();
        assert!(out.contains("name : row . get (\"name\") ?"), "{out}");
        assert!(out.contains("age : row . get (\"years\") ?"), "{out}");
    }

    #[test]
    fn epoch_millis_fields_convert_from_bigint() {
        let input: DeriveInput = syn::parse_quote! {
            struct Point {
                #[qq(epoch_millis)]
                local_at: NaiveDateTime,
                #[qq(column = "zoned", epoch_millis)]
                zoned_at: chrono::DateTime<chrono::Local>,
            }
        };
        let out = expand(input).unwrap().to_string();
        assert!(out.contains("row . get_local_datetime_millis (\"local_at\") ?"), "{out}");
        assert!(out.contains("row . get_zoned_datetime_millis (\"zoned\") ?"), "{out}");
    }

    #[test]
    fn epoch_millis_on_other_types_is_rejected() {
        let input: DeriveInput = syn::parse_quote! {
            struct Point { #[qq(epoch_millis)] at: i64 }
        };
        assert!(expand(input).is_err());
    }

    #[test]
    fn tuple_structs_are_rejected() {
        let input: DeriveInput = syn::parse_quote! {
            struct Pair(String, i32);
        };
        assert!(expand(input).is_err());
    }
}
