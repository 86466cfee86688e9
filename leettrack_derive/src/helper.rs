use syn::{Attribute, Data, Fields, FieldsNamed, Meta};

pub fn extract_fields(data: &Data) -> &FieldsNamed {
    match *data {
        Data::Struct(ref data) => match data.fields {
            Fields::Named(ref fields) => fields,
            _ => panic!("all fields must be named."),
        },
        _ => panic!("struct expected, but got other item."),
    }
}

/// Returns true when the field carries `#[field_list(skip)]`.
pub fn is_skipped(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        if !attr.path().is_ident("field_list") {
            return false;
        }
        match &attr.meta {
            Meta::List(list) => list
                .parse_args::<syn::Ident>()
                .map(|ident| ident == "skip")
                .unwrap_or(false),
            _ => false,
        }
    })
}
