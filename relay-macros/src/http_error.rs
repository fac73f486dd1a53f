use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, Ident, Lit, Token};

/// Parsed `#[http_error(code, "message")]` of one variant.
struct VariantSpec {
    ident: Ident,
    code: TokenStream,
    message: Option<String>,
    fields: Fields,
}

pub(crate) fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let Data::Enum(data_enum) = input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "HttpError can only be derived for enums",
        ));
    };

    let mut specs = Vec::new();
    for variant in data_enum.variants {
        if let Some((code, message)) = parse_attrs(&variant.attrs)? {
            specs.push(VariantSpec {
                ident: variant.ident,
                code,
                message,
                fields: variant.fields,
            });
        }
    }

    let code_arms = specs.iter().map(|spec| {
        let pattern = wildcard_pattern(spec);
        let code = &spec.code;
        quote! { #pattern => #code, }
    });
    let message_arms = specs.iter().map(message_arm);

    // Variants without an attribute map to a bare 500.
    Ok(quote! {
        impl #name {
            #[allow(unreachable_patterns)]
            pub fn http_code(&self) -> http::StatusCode {
                match self {
                    #(#code_arms)*
                    _ => http::StatusCode::INTERNAL_SERVER_ERROR,
                }
            }

            #[allow(unreachable_patterns)]
            pub fn http_message(&self) -> String {
                match self {
                    #(#message_arms)*
                    _ => String::from("Internal Server Error"),
                }
            }
        }
    })
}

fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Option<(TokenStream, Option<String>)>> {
    let Some(attr) = attrs.iter().find(|a| a.path().is_ident("http_error")) else {
        return Ok(None);
    };
    let list = attr.meta.require_list()?;
    let args = Punctuated::<Expr, Token![,]>::parse_terminated.parse2(list.tokens.clone())?;
    let mut args = args.into_iter();

    let code = match args.next() {
        Some(Expr::Path(path)) => {
            let code = &path.path;
            quote! { http::StatusCode::#code }
        }
        Some(Expr::Lit(lit)) => match &lit.lit {
            Lit::Int(int) => {
                let value = int.base10_parse::<u16>()?;
                if !(100..=999).contains(&value) {
                    return Err(syn::Error::new_spanned(int, "status code must be in 100..=999"));
                }
                quote! {
                    match http::StatusCode::from_u16(#value) {
                        Ok(code) => code,
                        Err(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
                    }
                }
            }
            other => return Err(syn::Error::new_spanned(other, "expected a status code")),
        },
        Some(other) => return Err(syn::Error::new_spanned(other, "expected a status code")),
        None => {
            return Err(syn::Error::new_spanned(
                attr,
                "http_error requires a status code",
            ))
        }
    };

    let message = match args.next() {
        Some(Expr::Lit(lit)) => match lit.lit {
            Lit::Str(s) => Some(s.value()),
            other => return Err(syn::Error::new_spanned(other, "expected a string literal")),
        },
        Some(other) => return Err(syn::Error::new_spanned(other, "expected a string literal")),
        None => None,
    };

    if let Some(extra) = args.next() {
        return Err(syn::Error::new_spanned(extra, "unexpected http_error argument"));
    }

    Ok(Some((code, message)))
}

fn wildcard_pattern(spec: &VariantSpec) -> TokenStream {
    let ident = &spec.ident;
    match spec.fields {
        Fields::Unit => quote! { Self::#ident },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Named(_) => quote! { Self::#ident { .. } },
    }
}

fn message_arm(spec: &VariantSpec) -> TokenStream {
    let Some(msg) = &spec.message else {
        let pattern = wildcard_pattern(spec);
        return quote! { #pattern => self.to_string(), };
    };

    let ident = &spec.ident;
    match &spec.fields {
        Fields::Unit => quote! { Self::#ident => #msg.to_string(), },
        Fields::Unnamed(fields) => {
            let bindings: Vec<Ident> = (0..fields.unnamed.len())
                .map(|i| format_ident!("__self_{}", i))
                .collect();
            let msg = prefix_numbers_in_braces(msg);
            quote! {
                #[allow(unused_variables)]
                Self::#ident(#(#bindings),*) => format!(#msg),
            }
        }
        Fields::Named(fields) => {
            let names: Vec<&Ident> = fields.named.iter().filter_map(|f| f.ident.as_ref()).collect();
            quote! {
                #[allow(unused_variables)]
                Self::#ident { #(#names),* } => format!(#msg),
            }
        }
    }
}

/// Rewrites `{0}` into `{__self_0}` so tuple fields can be captured by name.
fn prefix_numbers_in_braces(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut inside_braces = false;
    let mut at_start = false;

    for c in input.chars() {
        match c {
            '{' => {
                inside_braces = true;
                at_start = true;
                result.push(c);
            }
            '}' => {
                inside_braces = false;
                result.push(c);
            }
            c if inside_braces && at_start && c.is_ascii_digit() => {
                result.push_str("__self_");
                result.push(c);
                at_start = false;
            }
            c => {
                at_start = false;
                result.push(c);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::prefix_numbers_in_braces;

    #[test]
    fn prefixes_positional_placeholders() {
        assert_eq!(prefix_numbers_in_braces("a {0} b {1}"), "a {__self_0} b {__self_1}");
    }

    #[test]
    fn keeps_format_specs() {
        assert_eq!(prefix_numbers_in_braces("{0:>5}"), "{__self_0:>5}");
        assert_eq!(prefix_numbers_in_braces("{name}"), "{name}");
    }
}
