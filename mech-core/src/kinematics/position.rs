//! Positions, velocities and accelerations of points.

use super::BaseFold;
use crate::{
    error::Error,
    model::{tree::Step, FrameId, Model, PointId, SolidId, Vector3D},
};
use mech_algebra::Matrix;

impl Model {
    /// The position vector of the point `q` relative to the point `p`, the vector from `p` to `q`.
    ///
    /// The result is expressed in the base of the first edge vector on the path from `p` to `q`,
    /// or in `xyz` if `p` and `q` are the same point. Fails if the points are in different trees.
    pub fn position_vector(&self, p: PointId, q: PointId) -> Result<Vector3D, Error> {
        self.get_point(p)?;
        self.get_point(q)?;

        let path = self.point_path(p, q)?;
        let Some(first) = path.first() else {
            return Ok(Vector3D::zero(self.xyz()));
        };
        let (Step::Up(x) | Step::Down(x)) = *first;
        let result_base = self.get_point(x)?.position().base();

        let mut fold = BaseFold::new(self, result_base)?;
        let mut sum = Matrix::zeros(3, 1);
        for step in path {
            let (x, up) = match step {
                Step::Up(x) => (x, true),
                Step::Down(x) => (x, false),
            };
            let edge = self.get_point(x)?.position();
            let r = fold.rotation(edge.base())? * edge.components();
            sum = if up { &sum - &r } else { &sum + &r };
        }
        Ok(Vector3D::from_matrix(result_base, sum))
    }

    /// The velocity of the point `q` relative to the frame `f`: the time derivative, as seen from
    /// the base of `f`, of the position of `q` relative to the point of `f`. Expressed in the base
    /// of `f`.
    ///
    /// Each edge from the point of `f` to `q` contributes the derivative in the base of `f` of
    /// its position vector (see [`Model::derivative_in_base`]).
    pub fn velocity_vector(&self, f: FrameId, q: PointId) -> Result<Vector3D, Error> {
        let frame = self.get_frame(f)?;
        self.get_point(q)?;

        let mut fold = BaseFold::new(self, frame.base())?;
        let mut sum = Matrix::zeros(3, 1);
        for step in self.point_path(frame.point(), q)? {
            let (x, up) = match step {
                Step::Up(x) => (x, true),
                Step::Down(x) => (x, false),
            };
            let dr = self.derivative_along(self.get_point(x)?.position(), &mut fold)?;
            sum = if up { &sum - dr.components() } else { &sum + dr.components() };
        }
        Ok(Vector3D::from_matrix(frame.base(), sum))
    }

    /// The acceleration of the point `q` relative to the frame `f`, expressed in the base of `f`.
    ///
    /// This is the time derivative of the components of [`Model::velocity_vector`], which are
    /// already expressed in the base of `f`, so the transport, centripetal and Coriolis terms all
    /// come out of the differentiation.
    pub fn acceleration_vector(&self, f: FrameId, q: PointId) -> Result<Vector3D, Error> {
        let v = self.velocity_vector(f, q)?;
        Ok(Vector3D::from_matrix(v.base(), self.dt_matrix(v.components())?))
    }

    /// The velocity relative to the frame `f` of the point of the solid `s` that coincides with
    /// `q`: `v(f, S) + ω × r(S → q)`, with `S` the point of the solid. Expressed in the base of
    /// `f`.
    pub fn velocity_vector_on_solid(&self, f: FrameId, q: PointId, s: SolidId) -> Result<Vector3D, Error> {
        let frame_base = self.get_frame(f)?.base();
        let solid = self.get_solid(s)?;

        let v = self.velocity_vector(f, solid.point())?;
        let omega = self.angular_velocity(frame_base, solid.base())?;
        let r = self.in_base(&self.position_vector(solid.point(), q)?, frame_base)?;
        let transport = omega.components().cross(r.components());
        Ok(Vector3D::from_matrix(frame_base, v.components() + &transport))
    }

    /// The acceleration relative to the frame `f` of the point of the solid `s` that coincides
    /// with `q`: `a(f, S) + α × r + ω × (ω × r)`, with `S` the point of the solid and `r` the
    /// vector from `S` to `q`. Expressed in the base of `f`.
    pub fn acceleration_vector_on_solid(&self, f: FrameId, q: PointId, s: SolidId) -> Result<Vector3D, Error> {
        let frame_base = self.get_frame(f)?.base();
        let solid = self.get_solid(s)?;

        let a = self.acceleration_vector(f, solid.point())?;
        let omega = self.angular_velocity(frame_base, solid.base())?;
        let alpha = self.angular_acceleration(frame_base, solid.base())?;
        let r = self.in_base(&self.position_vector(solid.point(), q)?, frame_base)?;

        let (omega, alpha, r) = (omega.components(), alpha.components(), r.components());
        let tangential = alpha.cross(r);
        let centripetal = omega.cross(&omega.cross(r));
        Ok(Vector3D::from_matrix(frame_base, &(a.components() + &tangential) + &centripetal))
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::model::DisjointTrees, model::{BaseId, Tensor3D}};
    use assert_float_eq::assert_float_absolute_eq;
    use mech_algebra::{Ctxt, Expr};
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> Expr {
        Expr::symbol(name)
    }

    /// A slider along the x axis of a spinning base.
    fn slider() -> (Model, BaseId, PointId) {
        let mut model = Model::new();
        model.new_coordinate("a").unwrap();
        model.new_coordinate("s").unwrap();
        let b = model.new_base("B", model.xyz(), [0, 0, 1], sym("a")).unwrap();
        let p = model.new_point("P", model.origin(), Vector3D::new(b, sym("s"), 0, 0)).unwrap();
        (model, b, p)
    }

    #[test]
    fn identity_cases() {
        let (model, _, p) = slider();
        assert_eq!(model.position_vector(p, p).unwrap(), Vector3D::zero(model.xyz()));
        assert!(model.velocity_vector(model.abs(), model.origin()).unwrap().is_zero());
    }

    #[test]
    fn position_back_and_forth() {
        let (model, b, p) = slider();
        assert_eq!(model.position_vector(model.origin(), p).unwrap(), Vector3D::new(b, sym("s"), 0, 0));
        assert_eq!(model.position_vector(p, model.origin()).unwrap(), Vector3D::new(b, -sym("s"), 0, 0));
    }

    #[test]
    fn disjoint_points() {
        let (mut model, _, p) = slider();
        let other = model.new_root_point("Q").unwrap();
        assert!(model.position_vector(p, other).unwrap_err().is::<DisjointTrees>());
    }

    #[test]
    fn slider_velocity_has_relative_and_transport_terms() {
        let (mut model, b, p) = slider();
        let f = model.new_frame("F", model.origin(), b).unwrap();

        // seen from the spinning base, the slider only moves along x
        assert_eq!(model.velocity_vector(f, p).unwrap(), Vector3D::new(b, sym("ds"), 0, 0));

        // seen from the absolute frame, there is also ω × r = da s y
        let v = model.velocity_vector(model.abs(), p).unwrap();
        let v = model.in_base(&v, b).unwrap().simplify();
        assert_eq!(v, Vector3D::new(b, sym("ds"), sym("da") * sym("s"), 0));
    }

    #[test]
    fn slider_acceleration_has_coriolis_and_centripetal_terms() {
        let (model, b, p) = slider();
        let a = model.acceleration_vector(model.abs(), p).unwrap();
        let a = model.in_base(&a, b).unwrap().simplify();
        // (dds - s da^2, s dda + 2 ds da, 0) in the spinning base
        let (s, ds, da) = (sym("s"), sym("ds"), sym("da"));
        assert_eq!(a, Vector3D::new(
            b,
            sym("dds") - &s * da.pow(2),
            &s * sym("dda") + Expr::number(2) * &ds * &da,
            0,
        ));
    }

    #[test]
    fn long_planar_chain() {
        // six links of length l, link i turning by qi about z relative to link i - 1
        let mut model = Model::new();
        let l = model.new_parameter("l").unwrap();
        let (mut base, mut point) = (model.xyz(), model.origin());
        for i in 1..=6 {
            let q = model.new_coordinate(&format!("q{}", i)).unwrap();
            base = model.new_base(&format!("B{}", i), base, [0, 0, 1], q.q()).unwrap();
            point = model.new_point(&format!("P{}", i), point, Vector3D::new(base, l.clone(), 0, 0)).unwrap();
        }

        let mut ctxt = Ctxt::new();
        let (q, dq) = ([0.3, -0.7, 1.1, 0.2, -0.4, 0.9], [1.0, 0.5, -2.0, 0.25, 1.5, -0.75]);
        ctxt.add_var("l", 0.6);
        for i in 0..6 {
            ctxt.add_var(&format!("q{}", i + 1), q[i]);
            ctxt.add_var(&format!("dq{}", i + 1), dq[i]);
        }

        // the angle of link i is the sum of the first i coordinates
        let (mut angle, mut rate) = (0.0, 0.0);
        let (mut position, mut velocity) = ([0.0; 2], [0.0; 2]);
        for i in 0..6 {
            angle += q[i];
            rate += dq[i];
            position[0] += 0.6 * f64::cos(angle);
            position[1] += 0.6 * f64::sin(angle);
            velocity[0] -= 0.6 * rate * f64::sin(angle);
            velocity[1] += 0.6 * rate * f64::cos(angle);
        }

        let r = model.position_vector(model.origin(), point).unwrap();
        let r = model.in_base(&r, model.xyz()).unwrap();
        let v = model.velocity_vector(model.abs(), point).unwrap();
        assert_eq!(v.base(), model.xyz());
        for (entry, expected) in r.components().iter().zip([position[0], position[1], 0.0]) {
            assert_float_absolute_eq!(entry.eval(&ctxt).unwrap(), expected, 1e-12);
        }
        for (entry, expected) in v.components().iter().zip([velocity[0], velocity[1], 0.0]) {
            assert_float_absolute_eq!(entry.eval(&ctxt).unwrap(), expected, 1e-12);
        }
    }

    #[test]
    fn point_attached_to_a_solid() {
        let (mut model, b, p) = slider();
        let tip = model.new_point("T", p, Vector3D::new(b, 0, sym("h"), 0)).unwrap();
        let solid = model.new_solid("S", p, b, sym("m"), Vector3D::zero(b), Tensor3D::diagonal(b, 0, 0, 0)).unwrap();

        // T is fixed on S, so both ways of computing its velocity agree
        let direct = model.velocity_vector(model.abs(), tip).unwrap();
        let on_solid = model.velocity_vector_on_solid(model.abs(), tip, solid).unwrap();
        assert_eq!(model.sub_vectors(&direct, &on_solid).unwrap().simplify(), Vector3D::zero(model.xyz()));

        let direct = model.acceleration_vector(model.abs(), tip).unwrap();
        let on_solid = model.acceleration_vector_on_solid(model.abs(), tip, solid).unwrap();
        let difference = model.sub_vectors(&direct, &on_solid).unwrap();
        assert_eq!(difference.map(|c| c.expand()).simplify(), Vector3D::zero(model.xyz()));
    }
}
