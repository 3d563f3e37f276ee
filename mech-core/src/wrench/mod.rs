//! Wrenches: a force and a moment applied at a point.
//!
//! Wrench arithmetic follows the same rule as the rest of the engine: nothing is moved
//! implicitly. Two wrenches can only be added if they are applied at the same point; use
//! [`Model::at_point`] to transport one of them first.

mod dynamics;

use crate::{
    error::{composition::MismatchedPoints, Error},
    model::{arena::Node, Model, PointId, SolidId, Vector3D, WrenchId},
};
use mech_algebra::Expr;
use std::fmt;

/// Where a wrench comes from. [`Model::generalized_forces`] sums the registered wrenches of one
/// kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrenchKind {
    /// Applied by the outside world: actuators, contact, drag.
    External,

    /// Applied by a constitutive element between two solids, such as a spring or a damper.
    Constitutive,

    /// The reaction of a joint, usually written with joint unknowns.
    Joint,

    /// The weight of a solid.
    Gravity,

    /// The d'Alembert inertia wrench of a solid.
    Inertia,
}

impl fmt::Display for WrenchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrenchKind::External => write!(f, "external"),
            WrenchKind::Constitutive => write!(f, "constitutive"),
            WrenchKind::Joint => write!(f, "joint"),
            WrenchKind::Gravity => write!(f, "gravity"),
            WrenchKind::Inertia => write!(f, "inertia"),
        }
    }
}

/// A force and a moment applied at a point.
///
/// A wrench may act on a solid, and the opposite wrench may act on a reaction solid (for
/// example the two solids connected by a spring).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrench {
    name: String,
    force: Vector3D,
    moment: Vector3D,
    point: PointId,
    solid: Option<SolidId>,
    reaction: Option<SolidId>,
    kind: WrenchKind,
}

impl Wrench {
    /// Creates a wrench that does not act on any solid yet.
    pub fn new(
        name: impl Into<String>,
        force: Vector3D,
        moment: Vector3D,
        point: PointId,
        kind: WrenchKind,
    ) -> Self {
        Self {
            name: name.into(),
            force,
            moment,
            point,
            solid: None,
            reaction: None,
            kind,
        }
    }

    /// Sets the solid the wrench acts on.
    pub fn on(mut self, solid: SolidId) -> Self {
        self.solid = Some(solid);
        self
    }

    /// Sets the solid the opposite wrench acts on.
    pub fn with_reaction(mut self, reaction: SolidId) -> Self {
        self.reaction = Some(reaction);
        self
    }

    /// Copies the wrench with other force and moment vectors.
    pub(crate) fn with_vectors(&self, force: Vector3D, moment: Vector3D) -> Self {
        Self { force, moment, ..self.clone() }
    }

    /// The name of the wrench.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The force.
    pub fn force(&self) -> &Vector3D {
        &self.force
    }

    /// The moment about the application point.
    pub fn moment(&self) -> &Vector3D {
        &self.moment
    }

    /// The application point.
    pub fn point(&self) -> PointId {
        self.point
    }

    /// The solid the wrench acts on.
    pub fn solid(&self) -> Option<SolidId> {
        self.solid
    }

    /// The solid the opposite wrench acts on.
    pub fn reaction(&self) -> Option<SolidId> {
        self.reaction
    }

    /// The kind of the wrench.
    pub fn kind(&self) -> WrenchKind {
        self.kind
    }

    /// Multiplies the force and the moment by `factor`.
    pub fn scaled(&self, factor: &Expr) -> Self {
        self.with_vectors(self.force.scaled(factor), self.moment.scaled(factor))
    }
}

impl std::ops::Neg for &Wrench {
    type Output = Wrench;

    fn neg(self) -> Wrench {
        Wrench {
            name: format!("-{}", self.name),
            ..self.with_vectors(-&self.force, -&self.moment)
        }
    }
}

impl fmt::Display for Wrench {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: F = {}, M = {}", self.name, self.force, self.moment)
    }
}

impl Node for Wrench {
    type Id = WrenchId;
    const KIND: &'static str = "wrench";

    fn name(&self) -> &str {
        &self.name
    }
}

impl Model {
    /// Fails with [`MismatchedPoints`] unless both operands are applied at the same point.
    pub(crate) fn check_same_point(
        &self,
        left: (&str, PointId),
        right: (&str, PointId),
    ) -> Result<(), Error> {
        if left.1 == right.1 {
            return Ok(());
        }
        Err(MismatchedPoints {
            left: left.0.to_string(),
            left_point: self.get_point(left.1)?.name().to_string(),
            right: right.0.to_string(),
            right_point: self.get_point(right.1)?.name().to_string(),
        }.into())
    }

    /// Transports a wrench to the point `q`: the force is unchanged, and the moment becomes
    /// `M + r × F` with `r` the vector from `q` to the application point. The moment stays
    /// expressed in its own base.
    pub fn at_point(&self, wrench: &Wrench, q: PointId) -> Result<Wrench, Error> {
        let r = self.position_vector(q, wrench.point)?;
        let r = self.in_base(&r, wrench.moment.base())?;
        let transport = self.cross(&r, &wrench.force)?;
        let moment = self.add_vectors(&wrench.moment, &transport)?;
        Ok(Wrench {
            point: q,
            ..wrench.with_vectors(wrench.force.clone(), moment)
        })
    }

    /// `a + b`, for two wrenches applied at the same point. The vectors are expressed in the
    /// bases of `a`; the other attributes are those of `a`.
    pub fn add_wrenches(&self, a: &Wrench, b: &Wrench) -> Result<Wrench, Error> {
        self.check_same_point((&a.name, a.point), (&b.name, b.point))?;
        Ok(Wrench {
            name: format!("{} + {}", a.name, b.name),
            ..a.with_vectors(
                self.add_vectors(&a.force, &b.force)?,
                self.add_vectors(&a.moment, &b.moment)?,
            )
        })
    }

    /// `a - b`, for two wrenches applied at the same point.
    pub fn sub_wrenches(&self, a: &Wrench, b: &Wrench) -> Result<Wrench, Error> {
        self.check_same_point((&a.name, a.point), (&b.name, b.point))?;
        Ok(Wrench {
            name: format!("{} - {}", a.name, b.name),
            ..a.with_vectors(
                self.sub_vectors(&a.force, &b.force)?,
                self.sub_vectors(&a.moment, &b.moment)?,
            )
        })
    }
}
