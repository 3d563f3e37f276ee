//! Wrenches derived from the model: weights, inertia wrenches, and their projection onto the
//! coordinate velocities.

use crate::{
    error::{composition::MissingSolid, Error},
    kinematics::{differentiate, Twist},
    model::{Model, SolidId, Vector3D},
};
use mech_algebra::{Expr, Matrix};
use super::{Wrench, WrenchKind};

impl Model {
    /// The weight of a solid, `F = ∓ m g z` in `xyz` applied at its centre of mass, with the sign
    /// given by [`Settings::gravity`](crate::Settings::gravity). The wrench is named
    /// `<solid>_gravity` and acts on the solid.
    pub fn gravity_wrench(&self, s: SolidId) -> Result<Wrench, Error> {
        let solid = self.get_solid(s)?;
        let sign = Expr::number(self.settings().gravity.sign());
        let weight = sign * solid.mass() * self.gravity();
        Ok(Wrench::new(
            format!("{}_gravity", solid.name()),
            Vector3D::new(self.xyz(), 0, 0, weight),
            Vector3D::zero(self.xyz()),
            solid.center_of_mass(),
            WrenchKind::Gravity,
        ).on(s))
    }

    /// The d'Alembert inertia wrench of a solid, applied at its centre of mass `G`, and named
    /// `<solid>_inertia`.
    ///
    /// The force is `-m a_G`, with the acceleration of `G` relative to the absolute frame
    /// expressed in `xyz`. The moment is `-(I α + ω × I ω)`, with `ω` and `α` the absolute
    /// angular velocity and acceleration of the solid, computed in the base of the inertia
    /// tensor. That base must be attached to the solid.
    pub fn inertia_wrench(&self, s: SolidId) -> Result<Wrench, Error> {
        let solid = self.get_solid(s)?;
        let inertia = solid.inertia();
        let inertia_base = inertia.base();

        let acceleration = self.acceleration_vector(self.abs(), solid.center_of_mass())?;
        let force = -&acceleration.scaled(solid.mass());

        let omega = self.angular_velocity(self.xyz(), solid.base())?;
        let omega = self.in_base(&omega, inertia_base)?;
        let alpha = self.angular_acceleration(self.xyz(), solid.base())?;
        let alpha = self.in_base(&alpha, inertia_base)?;

        let (omega, alpha) = (omega.components(), alpha.components());
        let gyroscopic = omega.cross(&inertia.apply(omega));
        let moment = -&(&inertia.apply(alpha) + &gyroscopic);

        Ok(Wrench::new(
            format!("{}_inertia", solid.name()),
            force,
            Vector3D::from_matrix(inertia_base, moment),
            solid.center_of_mass(),
            WrenchKind::Inertia,
        ).on(s))
    }

    /// The power of a wrench on a twist, `F · v + M · ω`. Both must be taken at the same point.
    pub fn power(&self, wrench: &Wrench, twist: &Twist) -> Result<Expr, Error> {
        self.check_same_point((wrench.name(), wrench.point()), ("the twist", twist.point))?;
        Ok(self.dot(wrench.force(), &twist.linear)? + self.dot(wrench.moment(), &twist.angular)?)
    }

    /// The partial derivatives of the twist of a solid with respect to every coordinate velocity.
    fn partial_twists(&self, s: SolidId) -> Result<Vec<Twist>, Error> {
        let twist = self.twist(s)?;
        self.symbols()
            .coordinates()
            .iter()
            .map(|coordinate| {
                let partial = |v: &Vector3D| v.try_map(|c| differentiate(c, &coordinate.velocity));
                Ok::<_, Error>(Twist {
                    angular: partial(&twist.angular)?,
                    linear: partial(&twist.linear)?,
                    point: twist.point,
                })
            })
            .collect()
    }

    /// The projection of a wrench on the partial twists of a solid, transporting the wrench to
    /// the point of the solid first.
    fn project(&self, wrench: &Wrench, s: SolidId) -> Result<Vec<Expr>, Error> {
        let wrench = self.at_point(wrench, self.get_solid(s)?.point())?;
        self.partial_twists(s)?
            .iter()
            .map(|partial| self.power(&wrench, partial))
            .collect()
    }

    /// The generalized force of a wrench: a column with one entry per coordinate, in
    /// registration order,
    ///
    /// `Q_k = W · ∂twist_S/∂dq_k - W · ∂twist_R/∂dq_k`
    ///
    /// where `S` is the solid the wrench acts on and `R` its reaction solid, if any.
    pub fn generalized_force(&self, wrench: &Wrench) -> Result<Matrix, Error> {
        let Some(solid) = wrench.solid() else {
            return Err(MissingSolid { wrench: wrench.name().to_string() }.into());
        };
        let mut q = Matrix::column(self.project(wrench, solid)?);
        if let Some(reaction) = wrench.reaction() {
            q = &q - &Matrix::column(self.project(wrench, reaction)?);
        }
        Ok(q)
    }

    /// The sum of the generalized forces of every registered wrench of the given kind.
    pub fn generalized_forces(&self, kind: WrenchKind) -> Result<Matrix, Error> {
        let mut sum = Matrix::zeros(self.symbols().coordinates().len(), 1);
        for (_, wrench) in self.wrenches().filter(|(_, wrench)| wrench.kind() == kind) {
            sum = &sum + &self.generalized_force(wrench)?;
        }
        Ok(sum)
    }
}
