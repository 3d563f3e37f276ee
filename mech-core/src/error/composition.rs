//! Errors caused by per-edge data that cannot be composed.

use mech_attrs::ErrorKind;
use mech_error::ErrorKind;

/// A quantity needed a time derivative that cannot be computed symbolically.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Composition,
    message = format!("cannot differentiate `{}`: {}", expr, reason),
    help = "kinematic data must be built from differentiable functions, and atomized values must be unatomized first",
)]
pub struct Undifferentiable {
    /// The expression being differentiated.
    pub expr: String,

    /// Why the derivative failed.
    pub reason: String,
}

/// The rotation axis of a base is not a unit vector.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Composition,
    message = format!("the rotation axis of the base `{}` is not a unit vector (its squared norm is `{}`)", base, norm),
    help = "normalize the axis before creating the base",
)]
pub struct NonUnitAxis {
    /// The name of the base being created.
    pub base: String,

    /// The simplified squared norm of the axis.
    pub norm: String,
}

/// Wrenches (or a wrench and a twist) are applied at different points.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Composition,
    message = format!("`{}` is applied at `{}`, but `{}` is applied at `{}`", left, left_point, right, right_point),
    help = format!("transport one of them to the other's point first, for example with `at_point(.., {})`", left_point),
)]
pub struct MismatchedPoints {
    /// The name of the left operand.
    pub left: String,

    /// The application point of the left operand.
    pub left_point: String,

    /// The name of the right operand.
    pub right: String,

    /// The application point of the right operand.
    pub right_point: String,
}

/// A wrench does not act on any solid, so its generalized force is undefined.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Composition,
    message = format!("the wrench `{}` does not act on a solid", wrench),
    help = "set the solid the wrench acts on",
)]
pub struct MissingSolid {
    /// The name of the wrench.
    pub wrench: String,
}
