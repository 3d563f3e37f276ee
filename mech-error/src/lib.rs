//! Contains the common [`ErrorKind`] trait used by all errors raised while building or querying
//! a multibody model, and the [`Error`] type that carries them.
//!
//! Errors fall into one of three [`Category`]s. None of them is recoverable locally: they all
//! indicate a malformed model or a misuse of the API, so they are reported straight back to the
//! caller.

extern crate self as mech_error;

use ariadne::{Report, ReportKind, Source};
use std::{any::Any, fmt::{self, Debug, Display}, ops::Range};

/// The broad class an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// The model graph was queried for something it does not contain, or in a way its structure
    /// does not allow (missing names, nodes in disjoint trees, removal of nodes still in use).
    Model,

    /// Per-edge data could not be composed, for example a rotation angle that cannot be
    /// differentiated.
    Composition,

    /// The atom table is inconsistent, for example a dependency cycle between atoms.
    Atomization,
}

impl Category {
    /// A short code identifying the category in reports.
    pub fn code(&self) -> &'static str {
        match self {
            Category::Model => "model",
            Category::Composition => "composition",
            Category::Atomization => "atomization",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Model => write!(f, "model error"),
            Category::Composition => write!(f, "composition error"),
            Category::Atomization => write!(f, "atomization error"),
        }
    }
}

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send {
    /// Returns the error as [`Any`], so that callers can downcast it to its concrete type.
    fn as_any(&self) -> &dyn Any;

    /// The category of this error.
    fn category(&self) -> Category;

    /// The message displayed at the top of the error.
    fn message(&self) -> String;

    /// Optional help text describing what the user can do to fix the error.
    fn help(&self) -> Option<String> {
        None
    }

    /// Builds the report for this error.
    fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        let mut builder = Report::build(ReportKind::Error, src_id, 0)
            .with_code(self.category().code())
            .with_message(self.message());

        if let Some(help) = self.help() {
            builder.set_help(help);
        }

        builder.finish()
    }
}

/// An error raised by the engine.
#[derive(Debug)]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: impl ErrorKind + 'static) -> Self {
        Self { kind: Box::new(kind) }
    }

    /// The category of the underlying error kind.
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Returns true if the underlying error kind is a `T`.
    pub fn is<T: ErrorKind + 'static>(&self) -> bool {
        self.kind.as_any().is::<T>()
    }

    /// Returns the underlying error kind if it is a `T`.
    pub fn downcast_ref<T: ErrorKind + 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id)
    }

    /// Report this error to stderr.
    ///
    /// The `ariadne` crate's [`Report`] type does not have a `Display` implementation, so we can
    /// only use its `eprint` method to print to stderr.
    pub fn report_to_stderr(&self, src_id: &str) -> std::io::Result<()> {
        self.build_report(src_id).eprint((src_id, Source::from("")))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category(), self.kind.message())
    }
}

impl std::error::Error for Error {}

impl<T: ErrorKind + 'static> From<T> for Error {
    fn from(kind: T) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use mech_attrs::ErrorKind;
    use pretty_assertions::assert_eq;
    use super::*;

    #[derive(Debug, ErrorKind)]
    #[error(
        category = Model,
        message = format!("no point named `{}`", name),
        help = "create the point before referring to it",
    )]
    struct MissingPoint {
        name: String,
    }

    #[derive(Debug, ErrorKind)]
    #[error(category = Atomization, message = "the atom table contains a cycle")]
    struct Cycle;

    #[test]
    fn derived_fields_are_in_scope() {
        let err = Error::new(MissingPoint { name: "P2".to_string() });
        assert_eq!(err.category(), Category::Model);
        assert_eq!(err.kind.message(), "no point named `P2`");
        assert_eq!(err.kind.help().as_deref(), Some("create the point before referring to it"));
        assert_eq!(err.to_string(), "model error: no point named `P2`");
    }

    #[test]
    fn downcast() {
        let err: Error = Cycle.into();
        assert!(err.is::<Cycle>());
        assert!(!err.is::<MissingPoint>());
        assert!(err.downcast_ref::<Cycle>().is_some());
        assert_eq!(err.kind.help(), None);
    }

    #[test]
    fn report_contains_message() {
        let err = Error::new(MissingPoint { name: "P2".to_string() });
        let mut out = Vec::new();
        err.build_report("model")
            .write(("model", Source::from("")), &mut out)
            .unwrap();
        let text = String::from_utf8(strip_ansi_escapes::strip(out)).unwrap();
        assert!(text.contains("no point named `P2`"));
        assert!(text.contains("model"));
    }
}
