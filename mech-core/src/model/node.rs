use mech_algebra::{Expr, Matrix};
use super::{
    arena::Node,
    id::{BaseId, FrameId, PointId, SolidId},
    vector::{Tensor3D, Vector3D},
};

/// An orientation in space, defined by a rotation of its previous base.
#[derive(Debug, Clone, PartialEq)]
pub struct Base {
    pub(crate) name: String,
    pub(crate) previous: Option<BaseId>,
    pub(crate) axis: Matrix,
    pub(crate) angle: Expr,
    pub(crate) rotation: Matrix,
}

impl Base {
    /// Creates a root base, which has no previous base.
    pub(crate) fn root(name: &str) -> Self {
        Self {
            name: name.to_string(),
            previous: None,
            axis: Matrix::column([Expr::zero(), Expr::zero(), Expr::one()]),
            angle: Expr::zero(),
            rotation: Matrix::identity(3),
        }
    }

    /// Creates the base obtained by rotating `previous` by `angle` about the unit `axis`, whose
    /// components are given in `previous`.
    ///
    /// The rotation matrix follows Rodrigues' formula, `R = cos(a) I + sin(a) [u]x + (1 - cos(a)) u uᵀ`.
    pub(crate) fn rotated(name: &str, previous: BaseId, axis: Matrix, angle: Expr) -> Self {
        let (c, s) = (Expr::cos(angle.clone()), Expr::sin(angle.clone()));
        let outer = &axis * &axis.transpose();
        let rotation = &(&Matrix::identity(3).scale(&c) + &axis.skew().scale(&s))
            + &outer.scale(&(Expr::one() - &c));
        Self {
            name: name.to_string(),
            previous: Some(previous),
            axis,
            angle,
            rotation,
        }
    }

    /// The name of the base.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base this one is defined relative to, `None` for a root base.
    pub fn previous(&self) -> Option<BaseId> {
        self.previous
    }

    /// The unit rotation axis, with components in the previous base.
    pub fn axis(&self) -> &Matrix {
        &self.axis
    }

    /// The rotation angle, usually a function of the coordinates.
    pub fn angle(&self) -> &Expr {
        &self.angle
    }

    /// The matrix mapping components in this base to components in the previous base.
    pub fn rotation_matrix(&self) -> &Matrix {
        &self.rotation
    }
}

impl Node for Base {
    type Id = BaseId;
    const KIND: &'static str = "base";

    fn name(&self) -> &str {
        &self.name
    }
}

/// A point in space, defined by its position relative to its previous point.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub(crate) name: String,
    pub(crate) previous: Option<PointId>,
    pub(crate) position: Vector3D,
}

impl Point {
    /// The name of the point.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The point this one is defined relative to, `None` for a root point.
    pub fn previous(&self) -> Option<PointId> {
        self.previous
    }

    /// The vector from the previous point to this one.
    pub fn position(&self) -> &Vector3D {
        &self.position
    }
}

impl Node for Point {
    type Id = PointId;
    const KIND: &'static str = "point";

    fn name(&self) -> &str {
        &self.name
    }
}

/// A reference frame: a point and a base. Velocities and accelerations are measured relative to a
/// frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub(crate) name: String,
    pub(crate) point: PointId,
    pub(crate) base: BaseId,
}

impl Frame {
    /// The name of the frame.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The origin of the frame.
    pub fn point(&self) -> PointId {
        self.point
    }

    /// The orientation of the frame.
    pub fn base(&self) -> BaseId {
        self.base
    }
}

impl Node for Frame {
    type Id = FrameId;
    const KIND: &'static str = "frame";

    fn name(&self) -> &str {
        &self.name
    }
}

/// A rigid body: a frame attached to the body, with its mass properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub(crate) name: String,
    pub(crate) frame: FrameId,
    pub(crate) point: PointId,
    pub(crate) base: BaseId,
    pub(crate) mass: Expr,
    pub(crate) center_of_mass: PointId,
    pub(crate) inertia: Tensor3D,
}

impl Solid {
    /// The name of the solid, also the name of its frame.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The frame attached to the solid.
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    /// The reference point of the solid.
    pub fn point(&self) -> PointId {
        self.point
    }

    /// The base attached to the solid.
    pub fn base(&self) -> BaseId {
        self.base
    }

    /// The mass of the solid.
    pub fn mass(&self) -> &Expr {
        &self.mass
    }

    /// The centre of mass, the point `<name>_G`.
    pub fn center_of_mass(&self) -> PointId {
        self.center_of_mass
    }

    /// The inertia tensor about the centre of mass.
    pub fn inertia(&self) -> &Tensor3D {
        &self.inertia
    }
}

impl Node for Solid {
    type Id = SolidId;
    const KIND: &'static str = "solid";

    fn name(&self) -> &str {
        &self.name
    }
}
