//! Changes of base, and vector arithmetic between vectors expressed in different bases.

use super::BaseFold;
use crate::{
    error::{composition::Undifferentiable, Error},
    model::{BaseId, Model, Tensor3D, Vector3D},
    symbols::SymbolKind,
};
use mech_algebra::{Expr, Matrix};

impl Model {
    /// Re-expresses a vector in the base `b`.
    pub fn in_base(&self, v: &Vector3D, b: BaseId) -> Result<Vector3D, Error> {
        if v.base() == b {
            self.get_base(b)?;
            return Ok(v.clone());
        }
        let r = self.rotation_matrix(b, v.base())?;
        Ok(Vector3D::from_matrix(b, &r * v.components()))
    }

    /// Re-expresses a tensor in the base `b`, `T' = R T Rᵀ`.
    pub fn tensor_in_base(&self, t: &Tensor3D, b: BaseId) -> Result<Tensor3D, Error> {
        if t.base() == b {
            self.get_base(b)?;
            return Ok(t.clone());
        }
        let r = self.rotation_matrix(b, t.base())?;
        Ok(Tensor3D::new(b, &(&r * t.components()) * &r.transpose()))
    }

    /// The time derivative of a vector as seen from the base `b`, expressed in `b`.
    ///
    /// With `β` the base of `v`, this is the transport theorem
    /// `Dt(v, b) = R dt(v_β) + ω × (R v_β)`, where `R` is the rotation matrix between `b` and `β`
    /// and `ω` the angular velocity of `β` relative to `b`.
    pub fn derivative_in_base(&self, v: &Vector3D, b: BaseId) -> Result<Vector3D, Error> {
        self.derivative_along(v, &mut BaseFold::new(self, b)?)
    }

    /// [`Model::derivative_in_base`] into the starting base of `fold`, reusing the rotations and
    /// angular velocities it already holds.
    pub(crate) fn derivative_along(&self, v: &Vector3D, fold: &mut BaseFold) -> Result<Vector3D, Error> {
        let b = fold.start();
        let r = fold.rotation(v.base())?.clone();
        let rotated_derivative = &r * &self.dt_matrix(v.components())?;
        if v.base() == b {
            return Ok(Vector3D::from_matrix(b, rotated_derivative));
        }

        let omega = fold.angular_velocity(v.base())?;
        let transport = omega.cross(&(&r * v.components()));
        Ok(Vector3D::from_matrix(b, &rotated_derivative + &transport))
    }

    /// `a + b`, expressed in the base of `a`.
    pub fn add_vectors(&self, a: &Vector3D, b: &Vector3D) -> Result<Vector3D, Error> {
        let b = self.in_base(b, a.base())?;
        Ok(Vector3D::from_matrix(a.base(), a.components() + b.components()))
    }

    /// `a - b`, expressed in the base of `a`.
    pub fn sub_vectors(&self, a: &Vector3D, b: &Vector3D) -> Result<Vector3D, Error> {
        let b = self.in_base(b, a.base())?;
        Ok(Vector3D::from_matrix(a.base(), a.components() - b.components()))
    }

    /// `a × b`, expressed in the base of `a`.
    pub fn cross(&self, a: &Vector3D, b: &Vector3D) -> Result<Vector3D, Error> {
        let b = self.in_base(b, a.base())?;
        Ok(Vector3D::from_matrix(a.base(), a.components().cross(b.components())))
    }

    /// `a · b`.
    pub fn dot(&self, a: &Vector3D, b: &Vector3D) -> Result<Expr, Error> {
        let b = self.in_base(b, a.base())?;
        Ok(a.components().dot(b.components()))
    }

    /// The jacobian of the entries of `exprs` (in row-major order) with respect to every
    /// registered symbol of the given kind, in registration order.
    pub fn jacobian(&self, exprs: &Matrix, kind: SymbolKind) -> Result<Matrix, Error> {
        let names = self.symbols().of_kind(kind);
        let names = names.iter().map(|name| &**name).collect::<Vec<_>>();
        exprs.jacobian(&names).map_err(|err| Undifferentiable {
            expr: exprs.to_string(),
            reason: err.to_string(),
        }.into())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> Expr {
        Expr::symbol(name)
    }

    fn spinning_base() -> (Model, BaseId) {
        let mut model = Model::new();
        model.new_coordinate("a").unwrap();
        let b = model.new_base("B", model.xyz(), [0, 0, 1], sym("a")).unwrap();
        (model, b)
    }

    #[test]
    fn change_of_base_round_trip() {
        let (model, b) = spinning_base();
        let v = Vector3D::new(b, sym("l"), 0, 0);
        let in_xyz = model.in_base(&v, model.xyz()).unwrap();
        assert_eq!(in_xyz, Vector3D::new(model.xyz(), sym("l") * Expr::cos(sym("a")), sym("l") * Expr::sin(sym("a")), 0));
        assert_eq!(model.in_base(&in_xyz, b).unwrap().simplify(), v);
    }

    #[test]
    fn transport_theorem_for_a_fixed_vector() {
        // a vector fixed in a spinning base moves with velocity ω × r
        let (model, b) = spinning_base();
        let v = Vector3D::new(b, sym("l"), 0, 0);
        let dv = model.derivative_in_base(&v, model.xyz()).unwrap();
        let (ca, sa) = (Expr::cos(sym("a")), Expr::sin(sym("a")));
        assert_eq!(dv, Vector3D::new(
            model.xyz(),
            -(sym("da") * sym("l") * sa),
            sym("da") * sym("l") * ca,
            0,
        ));
        assert!(model.derivative_in_base(&v, b).unwrap().is_zero());
    }

    #[test]
    fn arithmetic_across_bases() {
        let (model, b) = spinning_base();
        let x = Vector3D::new(model.xyz(), 1, 0, 0);
        let y_b = Vector3D::new(b, 0, 1, 0);
        let sum = model.add_vectors(&x, &y_b).unwrap();
        assert_eq!(sum, Vector3D::new(model.xyz(), Expr::one() - Expr::sin(sym("a")), Expr::cos(sym("a")), 0));
        assert_eq!(model.dot(&x, &y_b).unwrap(), -Expr::sin(sym("a")));
        assert_eq!(model.cross(&x, &x).unwrap(), Vector3D::zero(model.xyz()));
        assert!(model.sub_vectors(&y_b, &y_b).unwrap().is_zero());
    }

    #[test]
    fn inertia_tensor_in_another_base() {
        let (model, b) = spinning_base();
        let t = Tensor3D::diagonal(b, sym("I1"), sym("I1"), sym("I3"));
        // axisymmetric about the rotation axis, so it does not change
        assert_eq!(model.tensor_in_base(&t, model.xyz()).unwrap().components().simplify(), t.components().clone());
    }

    #[test]
    fn jacobian_over_velocities() {
        let (mut model, _) = spinning_base();
        model.new_coordinate("s").unwrap();
        let exprs = Matrix::column([sym("da") * sym("s"), sym("ds").pow(2)]);
        assert_eq!(
            model.jacobian(&exprs, SymbolKind::Velocity).unwrap(),
            Matrix::from_rows(vec![
                vec![sym("s"), Expr::zero()],
                vec![Expr::zero(), Expr::number(2) * sym("ds")],
            ]),
        );
    }
}
