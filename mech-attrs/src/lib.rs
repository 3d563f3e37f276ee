mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the [`ErrorKind`] trait for the given struct.
///
/// The information of the error is provided with the `error` attribute by adding the
/// corresponding tags to it:
/// ```
/// use mech_attrs::ErrorKind;
/// use mech_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(
///     category = Model,
///     message = format!("no base named `{}`", name),
///     help = "bases must be created before they are used",
/// )]
/// pub struct MissingBase {
///     name: String,
/// }
/// ```
///
/// The following tags are available:
///
/// | Tag        | Description                                                                   |
/// | ---------- | ----------------------------------------------------------------------------- |
/// | `category` | Required. One of `Model`, `Composition` or `Atomization`.                     |
/// | `message`  | Required. The message displayed at the top of the error.                      |
/// | `help`     | Optional help text for the error, describing what the user can do to fix it.  |
///
/// `message` and `help` accept an expression that should evaluate to something string-like. For
/// structs with named fields, the expression is evaluated with the members of the struct in
/// scope, so they can be used in the expression (tuple structs are not supported).
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    quote! {
        impl ErrorKind for #name {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            #target
        }
    }.into()
}
