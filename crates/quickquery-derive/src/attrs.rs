//! `#[qq(...)]` attribute parsing shared by the derives.

use syn::{Attribute, LitStr, Result};

/// Struct-level `#[qq(table = "...")]`.
pub fn table_name(attrs: &[Attribute]) -> Result<Option<String>> {
    let mut table = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("qq")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let lit: LitStr = meta.value()?.parse()?;
                table = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported qq attribute, expected `table`"))
            }
        })?;
    }
    Ok(table)
}

/// Field-level `#[qq(column = "...", epoch_millis)]`.
#[derive(Default)]
pub struct FieldAttrs {
    pub column: Option<String>,
    pub epoch_millis: bool,
}

pub fn field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("qq")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let lit: LitStr = meta.value()?.parse()?;
                parsed.column = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("epoch_millis") {
                parsed.epoch_millis = true;
                Ok(())
            } else {
                Err(meta.error(
                    "unsupported qq attribute, expected `column` or `epoch_millis`",
                ))
            }
        })?;
    }
    Ok(parsed)
}
