//! Kinematics of a planar two-link arm, checked against the textbook formulas.

use assert_float_eq::assert_float_absolute_eq;
use mech_algebra::{Ctxt, Expr, Matrix};
use mech_core::{BaseId, Model, PointId, Vector3D};
use pretty_assertions::assert_eq;

struct Arm {
    model: Model,
    b1: BaseId,
    b2: BaseId,
    elbow: PointId,
    tip: PointId,
}

/// Link 1 turns by `theta1` about z, link 2 turns by `theta2` relative to link 1.
fn arm() -> Arm {
    let mut model = Model::new();
    let theta1 = model.new_coordinate("theta1").unwrap();
    let theta2 = model.new_coordinate("theta2").unwrap();
    let l1 = model.new_parameter("l1").unwrap();
    let l2 = model.new_parameter("l2").unwrap();

    let b1 = model.new_base("B1", model.xyz(), [0, 0, 1], theta1.q()).unwrap();
    let b2 = model.new_base("B2", b1, [0, 0, 1], theta2.q()).unwrap();
    let elbow = model.new_point("P1", model.origin(), Vector3D::new(b1, l1, 0, 0)).unwrap();
    let tip = model.new_point("P2", elbow, Vector3D::new(b2, l2, 0, 0)).unwrap();
    Arm { model, b1, b2, elbow, tip }
}

const THETA1: f64 = 0.3;
const THETA2: f64 = -1.1;
const L1: f64 = 2.0;
const L2: f64 = 0.5;

fn ctxt() -> Ctxt {
    let mut ctxt = Ctxt::new();
    ctxt.add_var("theta1", THETA1);
    ctxt.add_var("theta2", THETA2);
    ctxt.add_var("l1", L1);
    ctxt.add_var("l2", L2);
    ctxt
}

fn eval(expr: &Expr) -> f64 {
    expr.eval(&ctxt()).unwrap()
}

fn assert_matrix_close(actual: &Matrix, expected: &[f64]) {
    assert_eq!(actual.iter().count(), expected.len());
    for (actual, expected) in actual.iter().zip(expected) {
        assert_float_absolute_eq!(eval(actual), *expected, 1e-12);
    }
}

fn rz(theta: &str) -> Matrix {
    let (c, s) = (Expr::cos(Expr::symbol(theta)), Expr::sin(Expr::symbol(theta)));
    Matrix::from_rows(vec![
        vec![c.clone(), -&s, Expr::zero()],
        vec![s, c, Expr::zero()],
        vec![Expr::zero(), Expr::zero(), Expr::one()],
    ])
}

#[test]
fn identities() {
    let Arm { model, b2, tip, .. } = arm();
    assert_eq!(model.rotation_matrix(b2, b2).unwrap(), Matrix::identity(3));
    assert!(model.position_vector(tip, tip).unwrap().is_zero());
    assert!(model.angular_velocity(b2, b2).unwrap().is_zero());
}

#[test]
fn rotation_is_the_product_of_z_rotations() {
    let Arm { model, b2, .. } = arm();
    let r = model.rotation_matrix(model.xyz(), b2).unwrap();
    assert_eq!(r.simplify(), (&rz("theta1") * &rz("theta2")).simplify());

    let (c, s) = ((THETA1 + THETA2).cos(), (THETA1 + THETA2).sin());
    assert_matrix_close(&r, &[c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn inverse_rotation_is_the_transpose() {
    let Arm { model, b1, b2, .. } = arm();
    let forward = model.rotation_matrix(model.xyz(), b2).unwrap();
    let backward = model.rotation_matrix(b2, model.xyz()).unwrap();
    assert_eq!(backward.simplify(), forward.transpose().simplify());
    assert_matrix_close(&(&forward * &backward), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    // between siblings of the common ancestor too
    let r = &model.rotation_matrix(b1, b2).unwrap() * &model.rotation_matrix(b2, b1).unwrap();
    assert_matrix_close(&r, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn forward_kinematics() {
    let Arm { model, tip, .. } = arm();
    let p = model.position_vector(model.origin(), tip).unwrap();
    let p = model.in_base(&p, model.xyz()).unwrap();
    assert_matrix_close(p.components(), &[
        L1 * THETA1.cos() + L2 * (THETA1 + THETA2).cos(),
        L1 * THETA1.sin() + L2 * (THETA1 + THETA2).sin(),
        0.0,
    ]);
}

#[test]
fn positions_add_along_the_chain() {
    let Arm { model, elbow, tip, .. } = arm();
    let whole = model.position_vector(model.origin(), tip).unwrap();
    let first = model.position_vector(model.origin(), elbow).unwrap();
    let second = model.position_vector(elbow, tip).unwrap();

    let sum = model.add_vectors(&first, &second).unwrap();
    let difference = model.sub_vectors(&whole, &sum).unwrap();
    assert_matrix_close(difference.components(), &[0.0, 0.0, 0.0]);
}

#[test]
fn angular_velocity_adds_up() {
    let Arm { model, b1, b2, .. } = arm();
    let omega = model.angular_velocity(model.xyz(), b2).unwrap().simplify();
    assert_eq!(omega, Vector3D::new(model.xyz(), 0, 0, Expr::symbol("dtheta1") + Expr::symbol("dtheta2")));

    let relative = model.angular_velocity(b1, b2).unwrap().simplify();
    assert_eq!(relative, Vector3D::new(b1, 0, 0, Expr::symbol("dtheta2")));

    let inverse = model.angular_velocity(b2, model.xyz()).unwrap().simplify();
    assert_eq!(inverse, Vector3D::new(b2, 0, 0, -Expr::symbol("dtheta1") - Expr::symbol("dtheta2")));
}

#[test]
fn tip_velocity() {
    let Arm { model, tip, .. } = arm();
    let v = model.velocity_vector(model.abs(), tip).unwrap();
    let v = model.in_base(&v, model.xyz()).unwrap();

    let mut ctxt = ctxt();
    let (dtheta1, dtheta2) = (0.7, -0.2);
    ctxt.add_var("dtheta1", dtheta1);
    ctxt.add_var("dtheta2", dtheta2);
    let expected = [
        -L1 * THETA1.sin() * dtheta1 - L2 * (THETA1 + THETA2).sin() * (dtheta1 + dtheta2),
        L1 * THETA1.cos() * dtheta1 + L2 * (THETA1 + THETA2).cos() * (dtheta1 + dtheta2),
        0.0,
    ];
    for (actual, expected) in v.components().iter().zip(expected) {
        assert_float_absolute_eq!(actual.eval(&ctxt).unwrap(), expected, 1e-12);
    }
}
