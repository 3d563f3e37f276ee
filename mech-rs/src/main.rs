//! Derives the equations of motion of a double pendulum and prints them.
//!
//! The pendulum swings in the `xz` plane, hanging along `-z`. The program prints the velocity of
//! the tip and the generalized inertia and gravity forces. Common subexpressions are printed
//! first as `atomN = ...` lines, in the order they must be computed.
//!
//! Pass `--plain` to print the expressions without atomization.

use mech_algebra::Matrix;
use mech_core::{AtomTable, Model, PointId, Settings, Tensor3D, Vector3D, WrenchKind};
use mech_error::Error;

/// Builds the double pendulum, returning the model and the tip of the second link.
fn double_pendulum(settings: Settings) -> Result<(Model, PointId), Error> {
    let mut model = Model::with_settings(settings);
    let theta1 = model.new_coordinate("theta1")?;
    let theta2 = model.new_coordinate("theta2")?;
    let (l1, l2) = (model.new_parameter("l1")?, model.new_parameter("l2")?);
    let (m1, m2) = (model.new_parameter("m1")?, model.new_parameter("m2")?);

    let b1 = model.new_base("B1", model.xyz(), [0, 1, 0], theta1.q())?;
    let b2 = model.new_base("B2", b1, [0, 1, 0], theta2.q())?;
    let elbow = model.new_point("P1", model.origin(), Vector3D::new(b1, 0, 0, -&l1))?;
    let tip = model.new_point("P2", elbow, Vector3D::new(b2, 0, 0, -&l2))?;

    // point masses at the end of each link
    let link1 = model.new_solid(
        "S1",
        model.origin(),
        b1,
        m1,
        Vector3D::new(b1, 0, 0, -l1),
        Tensor3D::diagonal(b1, 0, 0, 0),
    )?;
    let link2 = model.new_solid(
        "S2",
        elbow,
        b2,
        m2,
        Vector3D::new(b2, 0, 0, -l2),
        Tensor3D::diagonal(b2, 0, 0, 0),
    )?;

    for solid in [link1, link2] {
        let weight = model.gravity_wrench(solid)?;
        let inertia = model.inertia_wrench(solid)?;
        model.new_wrench(weight)?;
        model.new_wrench(inertia)?;
    }
    Ok((model, tip))
}

/// Prints `name[i] = ...` for every entry of a column.
fn print_column(name: &str, column: &Matrix) {
    for (i, entry) in column.iter().enumerate() {
        println!("{}[{}] = {}", name, i, entry);
    }
}

fn run(settings: Settings) -> Result<(), Error> {
    let (model, tip) = double_pendulum(settings)?;

    let velocity = model.velocity_vector(model.abs(), tip)?;
    let velocity = model.in_base(&velocity, model.xyz())?.simplify();
    let inertia = model.generalized_forces(WrenchKind::Inertia)?.simplify();
    let gravity = model.generalized_forces(WrenchKind::Gravity)?.simplify();

    let mut table: AtomTable = model.atom_table();
    model.exclude_accelerations(&mut table);
    let results = table.atomize(&vec![velocity.components().clone(), inertia, gravity]);

    for id in table.collect_atoms(&results)? {
        if let Some(atom) = table.get(id) {
            println!("{} = {}", atom.symbol(), atom.expression());
        }
    }
    for (name, column) in ["v_tip", "Q_inertia", "Q_gravity"].into_iter().zip(&results) {
        print_column(name, column);
    }
    Ok(())
}

fn main() {
    let plain = std::env::args().skip(1).any(|arg| arg == "--plain");
    let settings = Settings::default().atomization(!plain);

    if let Err(err) = run(settings) {
        // nothing left to do if stderr is gone
        let _ = err.report_to_stderr("mech-rs");
        std::process::exit(1);
    }
}
