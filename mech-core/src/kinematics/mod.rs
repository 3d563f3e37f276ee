//! The kinematic composition engine.
//!
//! Every quantity between two nodes is computed the same way: [`tree_path`] finds the edges from
//! the first node up to the lowest common ancestor and down to the second node, then the per-edge
//! data attached to the nodes is folded along that path. Walking an edge from child to ancestor
//! uses the inverse of its transform (the transpose of a rotation, the opposite of a position or
//! angular velocity).
//!
//! "Between A and B" always means "the quantity of B relative to A", expressed in A's base unless
//! stated otherwise.
//!
//! [`tree_path`]: crate::model::tree::tree_path

mod fold;
mod position;
mod twist;
mod vectors;

pub(crate) use fold::BaseFold;
pub use twist::Twist;

use crate::{
    error::{composition::Undifferentiable, Error},
    model::{BaseId, Model, Tensor3D, Vector3D},
};
use mech_algebra::{derivative, Expr, Matrix};

/// Differentiates `expr` with respect to the symbol `with`, reporting failures as
/// [`Undifferentiable`].
pub(crate) fn differentiate(expr: &Expr, with: &str) -> Result<Expr, Error> {
    derivative(expr, with).map_err(|err| Undifferentiable {
        expr: expr.to_string(),
        reason: err.to_string(),
    }.into())
}

impl Model {
    /// The total time derivative of an expression.
    ///
    /// Coordinates (and auxiliary coordinates) are chained to their velocities, and velocities to
    /// their accelerations. Accelerations and inputs have no registered derivative, so they are
    /// treated as constants; any other symbol is a constant too.
    pub fn dt(&self, expr: &Expr) -> Result<Expr, Error> {
        let symbols = self.symbols();
        let mut terms = vec![differentiate(expr, symbols.time_name())?];
        for coordinate in symbols.coordinates().iter().chain(symbols.aux_coordinates()) {
            terms.push(differentiate(expr, &coordinate.position)? * coordinate.dq());
            terms.push(differentiate(expr, &coordinate.velocity)? * coordinate.ddq());
        }
        Ok(Expr::sum(terms))
    }

    /// The total time derivative of every entry of a matrix.
    pub fn dt_matrix(&self, matrix: &Matrix) -> Result<Matrix, Error> {
        matrix.try_map(|entry| self.dt(entry))
    }

    /// The rotation matrix between two bases: it maps components in `b` to components in `a`.
    ///
    /// Fails if the bases are in different trees.
    pub fn rotation_matrix(&self, a: BaseId, b: BaseId) -> Result<Matrix, Error> {
        BaseFold::new(self, a)?.rotation(b).cloned()
    }

    /// The angular velocity of the base `b` relative to the base `a`, expressed in `a`.
    ///
    /// Each edge of the path contributes the derivative of its angle about its axis, rotated into
    /// `a` by the rotation accumulated before reaching that edge.
    pub fn angular_velocity(&self, a: BaseId, b: BaseId) -> Result<Vector3D, Error> {
        let omega = BaseFold::new(self, a)?.angular_velocity(b)?.clone();
        Ok(Vector3D::from_matrix(a, omega))
    }

    /// The angular acceleration of the base `b` relative to the base `a`, expressed in `a`.
    ///
    /// This is the time derivative of the components of [`Model::angular_velocity`]. As those
    /// components are expressed in `a`, the derivative includes the cross terms between the
    /// angular velocities of successive edges.
    pub fn angular_acceleration(&self, a: BaseId, b: BaseId) -> Result<Vector3D, Error> {
        let omega = self.angular_velocity(a, b)?;
        Ok(Vector3D::from_matrix(a, self.dt_matrix(omega.components())?))
    }

    /// The angular velocity tensor of `b` relative to `a`, the skew-symmetric matrix `[ω]x` such
    /// that `[ω]x v = ω × v`, expressed in `a`.
    pub fn angular_velocity_tensor(&self, a: BaseId, b: BaseId) -> Result<Tensor3D, Error> {
        let omega = self.angular_velocity(a, b)?;
        Ok(Tensor3D::new(a, omega.components().skew()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use mech_algebra::simplify;
    use super::*;

    fn sym(name: &str) -> Expr {
        Expr::symbol(name)
    }

    #[test]
    fn dt_chains_through_coordinates() {
        let mut model = Model::new();
        model.new_coordinate("q").unwrap();
        let l = model.new_parameter("l").unwrap();
        let expr = &l * Expr::sin(sym("q")) + sym("t").pow(2) + sym("dq");
        assert_eq!(
            model.dt(&expr).unwrap(),
            &l * Expr::cos(sym("q")) * sym("dq") + Expr::number(2) * sym("t") + sym("ddq"),
        );
        assert_eq!(model.dt(&sym("ddq")).unwrap(), Expr::zero());
    }

    #[test]
    fn dt_of_atoms_fails() {
        let model = Model::new();
        let err = model.dt(&Expr::atom(0)).unwrap_err();
        assert!(err.is::<Undifferentiable>());
    }

    #[test]
    fn rotation_through_common_ancestor() {
        let mut model = Model::new();
        let (a, b) = (sym("a"), sym("b"));
        let ba = model.new_base("A", model.xyz(), [0, 0, 1], a.clone()).unwrap();
        let bb = model.new_base("B", model.xyz(), [0, 0, 1], b.clone()).unwrap();

        // a rotation by b - a about z
        let r = model.rotation_matrix(ba, bb).unwrap().simplify();
        let expected = model.rotation_matrix(model.xyz(), bb).unwrap();
        let expected = &model.rotation_matrix(ba, model.xyz()).unwrap() * &expected;
        assert_eq!(r, expected.simplify());
        assert_eq!(r[(2, 2)], Expr::one());
        assert_eq!(
            simplify(&(&r[(0, 0)] - (Expr::cos(a.clone()) * Expr::cos(b.clone()) + Expr::sin(a) * Expr::sin(b)))),
            Expr::zero(),
        );
    }

    #[test]
    fn angular_velocity_of_sibling_bases() {
        let mut model = Model::new();
        model.new_coordinate("a").unwrap();
        model.new_coordinate("b").unwrap();
        let ba = model.new_base("A", model.xyz(), [0, 0, 1], sym("a")).unwrap();
        let bb = model.new_base("B", model.xyz(), [0, 0, 1], sym("b")).unwrap();
        let omega = model.angular_velocity(ba, bb).unwrap();
        assert_eq!(omega, Vector3D::new(ba, 0, 0, sym("db") - sym("da")));
        assert!(model.angular_acceleration(ba, ba).unwrap().is_zero());
    }

    #[test]
    fn angular_acceleration_includes_cross_terms() {
        // B1 spins about z, B2 spins about the x axis of B1
        let mut model = Model::new();
        model.new_coordinate("a").unwrap();
        model.new_coordinate("b").unwrap();
        let b1 = model.new_base("B1", model.xyz(), [0, 0, 1], sym("a")).unwrap();
        let b2 = model.new_base("B2", b1, [1, 0, 0], sym("b")).unwrap();
        let alpha = model.angular_acceleration(model.xyz(), b2).unwrap();

        // ω1 × ω2 = da z × db (cos a, sin a, 0) = da db (-sin a, cos a, 0)
        let (ca, sa) = (Expr::cos(sym("a")), Expr::sin(sym("a")));
        let (da, db) = (sym("da"), sym("db"));
        let expected = Vector3D::new(
            model.xyz(),
            sym("ddb") * &ca - &da * &db * &sa,
            sym("ddb") * &sa + &da * &db * &ca,
            sym("dda"),
        );
        assert_eq!(alpha, expected);
    }

    #[test]
    fn angular_velocity_tensor_is_skew() {
        let mut model = Model::new();
        model.new_coordinate("a").unwrap();
        let b = model.new_base("B", model.xyz(), [0, 0, 1], sym("a")).unwrap();
        let tensor = model.angular_velocity_tensor(model.xyz(), b).unwrap();
        assert_eq!(tensor.components()[(0, 1)], -sym("da"));
        assert_eq!(tensor.components()[(1, 0)], sym("da"));
    }
}
