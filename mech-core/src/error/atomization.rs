//! Errors caused by an inconsistent atom table.

use mech_attrs::ErrorKind;
use mech_error::ErrorKind;

/// The definitions of some atoms refer to each other.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Atomization,
    message = format!("`atom{}` depends on itself", atom),
    help = "atoms created by `atomize` are acyclic; check the definitions passed to `redefine`",
)]
pub struct DependencyCycle {
    /// An atom on the cycle.
    pub atom: u32,
}

/// An expression refers to an atom that is not in the table.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Atomization,
    message = format!("`atom{}` is not in the atom table", atom),
    help = "the atom was removed, or the expression was atomized with another table",
)]
pub struct UnknownAtom {
    /// The index of the missing atom.
    pub atom: u32,
}

/// An atom cannot be removed while another atom's definition refers to it.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Atomization,
    message = format!("cannot remove `atom{}`, the definition of `atom{}` refers to it", atom, dependant),
)]
pub struct AtomInUse {
    /// The atom to remove.
    pub atom: u32,

    /// A live atom depending on it.
    pub dependant: u32,
}
