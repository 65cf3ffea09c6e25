extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{Expr, ItemStruct, Lit, Meta, parse_macro_input};

/// Characters a cookie name may contain besides ASCII letters and digits
const NAME_SYMBOLS: &str = "!#$%&'*+-.^_`|~";

/// Implements `CookieName` for a struct: `#[cookie(name = "...")]`.
///
/// The name is checked at compile time. Prefixes (`__Secure-`, `__Host-`) are configured
/// on the cookie type, not written into the name.
#[proc_macro_attribute]
pub fn cookie(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);

    let parsed_attr = parse_macro_input!(attr as Meta);

    if !parsed_attr.path().is_ident("name") {
        return syn::Error::new_spanned(
            parsed_attr.path().get_ident(),
            "Expected `name` parameter: #[cookie(name = \"...\")]",
        )
        .into_compile_error()
        .into();
    }

    let name = match &parsed_attr {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(expr) => match &expr.lit {
                Lit::Str(lit_str) => Some(lit_str.clone()),
                _ => None,
            },
            _ => None,
        },
        _ => None,
    };

    let Some(name) = name else {
        return syn::Error::new_spanned(
            &parsed_attr,
            "Expected a string literal: #[cookie(name = \"...\")]",
        )
        .into_compile_error()
        .into();
    };

    let cookie_name = name.value();
    let valid = !cookie_name.is_empty()
        && cookie_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || NAME_SYMBOLS.contains(c));

    if !valid {
        return syn::Error::new_spanned(
            &name,
            format!(
                "`{cookie_name}` is not a valid cookie name, use ASCII letters, digits or `{NAME_SYMBOLS}`"
            ),
        )
        .into_compile_error()
        .into();
    }

    let cookie_struct = &input.ident;

    let expanded = quote! {
        #input

        impl CookieName for #cookie_struct {
            const COOKIE_NAME: &'static str = #cookie_name;
        }
    };

    expanded.into()
}
