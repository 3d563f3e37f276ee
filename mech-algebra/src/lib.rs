//! Exact symbolic algebra for multibody kinematics.
//!
//! This crate provides the building blocks that the kinematic composition engine in `mech-core`
//! works with:
//!
//! - [`Expr`], an immutable, cheaply clonable expression tree kept in canonical form, so that
//!   structurally equal expressions hash and compare equal;
//! - [`Matrix`], dense matrices of expressions for rotations, vectors and jacobians;
//! - symbolic [`derivative`]s;
//! - a rule-based [`simplify`]er that knows about distribution and the pythagorean identity;
//! - numerical evaluation through [`Ctxt`], used to check symbolic results.
//!
//! # Example
//!
//! ```
//! use mech_algebra::{derivative, simplify, Expr};
//!
//! let theta = Expr::symbol("theta");
//! let l = Expr::symbol("l");
//!
//! // x = l cos(theta), y = l sin(theta)
//! let x = &l * Expr::cos(theta.clone());
//! let y = &l * Expr::sin(theta.clone());
//! assert_eq!(simplify(&(x.pow(2) + y.pow(2))), l.pow(2));
//!
//! assert_eq!(derivative(&x, "theta").unwrap(), -(&l * Expr::sin(theta)));
//! ```

pub mod derivative;
pub mod eval;
pub mod expr;
pub mod matrix;
pub mod primitive;
pub mod simplify;
pub mod step_collector;

pub use derivative::{derivative, SymbolicDerivativeError};
pub use eval::{Ctxt, EvalError};
pub use expr::{Expr, Primary};
pub use matrix::Matrix;
pub use simplify::{simplify, simplify_with, simplify_with_steps};
pub use step_collector::StepCollector;
