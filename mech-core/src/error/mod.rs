//! The error kinds raised by the engine.
//!
//! Every kind is its own struct deriving [`ErrorKind`](mech_error::ErrorKind), grouped by the
//! [`Category`](mech_error::Category) it belongs to. Operations return the type-erased
//! [`Error`](mech_error::Error); callers can recover the concrete kind with
//! [`Error::downcast_ref`](mech_error::Error::downcast_ref).

pub mod atomization;
pub mod composition;
pub mod model;

pub use mech_error::{Category, Error, ErrorKind};

/// Formats a list of suggestions as `did you mean ..?` help text.
pub(crate) fn did_you_mean(what: &str, suggestions: &[String]) -> String {
    match suggestions {
        [] => format!("check the spelling, or create the {} first", what),
        [one] => format!("did you mean the {} `{}`?", what, one),
        many => format!(
            "did you mean one of these {}s? {}",
            what,
            many.iter()
                .map(|name| format!("`{}`", name))
                .collect::<Vec<_>>()
                .join(", "),
        ),
    }
}
