mod field_list;
mod helper;

use field_list::impl_field_list;
use proc_macro::TokenStream;

#[proc_macro_derive(FieldList, attributes(field_list))]
pub fn derive_field_list(input: TokenStream) -> TokenStream {
    impl_field_list(input.into()).into()
}
