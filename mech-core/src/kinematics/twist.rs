use crate::{
    error::Error,
    model::{Model, PointId, SolidId, Vector3D},
};
use std::fmt;

/// The velocity state of a rigid body: its angular velocity, and the linear velocity of one of its
/// points. Both vectors are expressed in the absolute base.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Twist {
    /// The angular velocity of the body.
    pub angular: Vector3D,

    /// The velocity of `point`.
    pub linear: Vector3D,

    /// The point whose velocity is `linear`.
    pub point: PointId,
}

impl fmt::Display for Twist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ω = {}, v = {}", self.angular, self.linear)
    }
}

impl Model {
    /// The twist of a solid relative to the absolute frame, taken at the point of the solid.
    pub fn twist(&self, s: SolidId) -> Result<Twist, Error> {
        let solid = self.get_solid(s)?;
        Ok(Twist {
            angular: self.angular_velocity(self.xyz(), solid.base())?,
            linear: self.velocity_vector(self.abs(), solid.point())?,
            point: solid.point(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::model::Tensor3D;
    use mech_algebra::Expr;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn twist_of_a_pendulum() {
        let mut model = Model::new();
        let theta = model.new_coordinate("theta").unwrap();
        let b = model.new_base("B", model.xyz(), [0, 0, 1], theta.q()).unwrap();
        let solid = model.new_solid(
            "S",
            model.origin(),
            b,
            Expr::symbol("m"),
            Vector3D::new(b, Expr::symbol("l"), 0, 0),
            Tensor3D::diagonal(b, 0, 0, 0),
        ).unwrap();

        let twist = model.twist(solid).unwrap();
        assert_eq!(twist.angular, Vector3D::new(model.xyz(), 0, 0, theta.dq()));
        assert!(twist.linear.is_zero());
        assert_eq!(twist.point, model.origin());
    }
}
