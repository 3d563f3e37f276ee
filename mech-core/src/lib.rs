//! Symbolic kinematics and dynamics of multibody systems.
//!
//! A multibody system is described by a [`Model`]: a tree of bases (orientations), a tree of
//! points (positions), and frames and solids built from them. Every node stores only its
//! relation to the previous node in its tree: a rotation about an axis for a base, a position
//! vector for a point. The kinematic quantities between any two nodes are then composed along
//! the path joining them:
//!
//! - [`Model::rotation_matrix`], [`Model::angular_velocity`] and [`Model::angular_acceleration`]
//!   between two bases;
//! - [`Model::position_vector`] between two points, and [`Model::velocity_vector`] and
//!   [`Model::acceleration_vector`] of a point relative to a frame.
//!
//! Results are symbolic [`Expr`](mech_algebra::Expr)essions which quickly grow large. An
//! [`AtomTable`] eliminates their common subexpressions, replacing them with numbered atoms
//! that can be evaluated once, in the order given by [`AtomTable::collect_atoms`].
//!
//! Forces and moments are grouped into [`Wrench`]es, which can be transported between points
//! and projected onto the coordinate velocities with [`Model::generalized_force`].
//!
//! # Example
//!
//! ```
//! use mech_algebra::Expr;
//! use mech_core::{Model, Vector3D};
//!
//! let mut model = Model::new();
//! let theta = model.new_coordinate("theta").unwrap();
//! let l = model.new_parameter("l").unwrap();
//!
//! // a rod of length l turning about z
//! let b = model.new_base("B", model.xyz(), [0, 0, 1], theta.q()).unwrap();
//! let tip = model.new_point("P", model.origin(), Vector3D::new(b, l.clone(), 0, 0)).unwrap();
//!
//! let v = model.velocity_vector(model.abs(), tip).unwrap();
//! let v = model.in_base(&v, b).unwrap().simplify();
//! assert_eq!(v, Vector3D::new(b, 0, theta.dq() * l, 0));
//! ```

pub mod atom;
pub mod error;
pub mod kinematics;
pub mod model;
pub mod settings;
pub mod symbols;
pub mod wrench;

pub use atom::{Atom, AtomId, AtomStep, AtomTable, Atomize};
pub use error::{Category, Error, ErrorKind};
pub use kinematics::Twist;
pub use model::{
    Base,
    BaseId,
    Frame,
    FrameId,
    Model,
    Point,
    PointId,
    Solid,
    SolidId,
    Tensor3D,
    Vector3D,
    WrenchId,
};
pub use settings::{Gravity, Settings};
pub use symbols::{Coordinate, SymbolKind, SymbolRegistry};
pub use wrench::{Wrench, WrenchKind};
