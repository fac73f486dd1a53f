extern crate proc_macro;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod http_error;

/// Derive macro for mapping error variants to an HTTP status and a user-facing message
///
/// Add `#[http_error(...)]` to each variant that should map to a response.
///
/// `http_error` accepts one or two arguments
/// - status code (required)
/// - http error message (optional)
///
/// ### Status Code
///
/// May be a `StatusCode` constant (e.g. `BAD_REQUEST`) or a number (e.g. `400`).
/// Numbers outside `100..=999` are rejected at compile time.
///
/// The `StatusCode` value is returned by `http_code()`.
///
/// ### HTTP Error Message
///
/// A string literal with basic interpolation:
/// - Tuple variants interpolate indices: `"first arg {0}, second arg {1}"`
/// - Struct variants interpolate field names: `"message field = {message}"`
///
/// Without a message the `Display` implementation is used, so a `thiserror`
/// message doubles as the response text unless the variant needs to hide its
/// details from the caller.
///
/// The message is returned by `http_message()`.
///
/// ### Example
///
/// ```rust,ignore
/// #[derive(Debug, thiserror::Error, relay_macros::HttpError)]
/// enum Error {
///     #[error("{0}")]
///     #[http_error(BAD_REQUEST)]
///     Validation(ValidationErrors),
///
///     #[error("rate limited")]
///     #[http_error(429, "Too many requests, please try again later.")]
///     RateLimited,
///
///     // Hide transport details from the caller
///     #[error("mail error: {0}")]
///     #[http_error(INTERNAL_SERVER_ERROR, "Failed to send email. Please try again later.")]
///     Mail(#[from] MailError),
/// }
/// ```
#[proc_macro_derive(HttpError, attributes(http_error))]
pub fn http_error_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    http_error::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
