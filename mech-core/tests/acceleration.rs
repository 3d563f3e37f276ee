//! Accelerations obtained by differentiation agree with the composition of accelerations.

use assert_float_eq::assert_float_absolute_eq;
use mech_algebra::{Ctxt, Expr, Matrix};
use mech_core::{Model, Vector3D};
use pretty_assertions::assert_eq;

fn ctxt() -> Ctxt {
    let mut ctxt = Ctxt::new();
    for (name, value) in [
        ("a", 0.3), ("da", -1.2), ("dda", 0.4),
        ("b", 1.1), ("db", 0.9), ("ddb", -2.0),
        ("s", 0.7), ("ds", 0.25), ("dds", 1.5),
        ("h", 2.0),
    ] {
        ctxt.add_var(name, value);
    }
    ctxt
}

fn eval(m: &Matrix) -> Vec<f64> {
    let ctxt = ctxt();
    m.iter().map(|entry| entry.eval(&ctxt).unwrap()).collect()
}

/// `a_P = a_Q + α × r + ω × (ω × r) + 2 ω × v_rel + a_rel`, for a slider `P` moving along the
/// y axis of a base that spins about z and tilts about x, mounted at `Q` on an arm.
#[test]
fn coriolis_and_centripetal_terms() {
    let mut model = Model::new();
    let a = model.new_coordinate("a").unwrap();
    let b = model.new_coordinate("b").unwrap();
    let s = model.new_coordinate("s").unwrap();
    let h = model.new_parameter("h").unwrap();

    let b1 = model.new_base("B1", model.xyz(), [0, 0, 1], a.q()).unwrap();
    let b2 = model.new_base("B2", b1, [1, 0, 0], b.q()).unwrap();
    let q = model.new_point("Q", model.origin(), Vector3D::new(b1, h, 0, 0)).unwrap();
    let p = model.new_point("P", q, Vector3D::new(b2, 0, s.q(), 0)).unwrap();
    let moving = model.new_frame("F", q, b2).unwrap();
    let xyz = model.xyz();

    let direct = model.acceleration_vector(model.abs(), p).unwrap();
    let direct = model.in_base(&direct, xyz).unwrap();

    let a_q = model.acceleration_vector(model.abs(), q).unwrap();
    let omega = model.angular_velocity(xyz, b2).unwrap();
    let alpha = model.angular_acceleration(xyz, b2).unwrap();
    let r = model.in_base(&model.position_vector(q, p).unwrap(), xyz).unwrap();
    let v_rel = model.in_base(&model.velocity_vector(moving, p).unwrap(), xyz).unwrap();
    let a_rel = model.in_base(&model.acceleration_vector(moving, p).unwrap(), xyz).unwrap();

    let (omega, alpha, r) = (omega.components(), alpha.components(), r.components());
    let two = Expr::number(2);
    let composed = [
        model.in_base(&a_q, xyz).unwrap().components().clone(),
        alpha.cross(r),
        omega.cross(&omega.cross(r)),
        omega.cross(v_rel.components()).scale(&two),
        a_rel.components().clone(),
    ]
    .iter()
    .fold(Matrix::zeros(3, 1), |sum, term| &sum + term);

    for (direct, composed) in eval(direct.components()).into_iter().zip(eval(&composed)) {
        assert_float_absolute_eq!(direct, composed, 1e-10);
    }
}

/// The relative acceleration in a frame is only the second derivative of the coordinates.
#[test]
fn relative_acceleration_of_a_slider() {
    let mut model = Model::new();
    let a = model.new_coordinate("a").unwrap();
    let s = model.new_coordinate("s").unwrap();
    let b1 = model.new_base("B1", model.xyz(), [0, 0, 1], a.q()).unwrap();
    let p = model.new_point("P", model.origin(), Vector3D::new(b1, s.q(), 0, 0)).unwrap();
    let moving = model.new_frame("F", model.origin(), b1).unwrap();

    let a_rel = model.acceleration_vector(moving, p).unwrap();
    assert_eq!(a_rel, Vector3D::new(b1, s.ddq(), 0, 0));
}
