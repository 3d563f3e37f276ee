//! Rotations and angular velocities from one base to many others.

use crate::{
    error::Error,
    model::{tree::Step, BaseId, Model},
};
use mech_algebra::Matrix;
use std::collections::HashMap;

/// The rotation matrices and angular velocities between a fixed base and other bases of its tree,
/// folded along the paths and kept for every base reached on the way.
///
/// All the paths leaving the same base share their prefixes, so asking for every base of a chain
/// costs one matrix product per edge of the chain.
pub(crate) struct BaseFold<'m> {
    model: &'m Model,
    from: BaseId,
    rotations: HashMap<BaseId, Matrix>,
    angular_velocities: HashMap<BaseId, Matrix>,
}

impl<'m> BaseFold<'m> {
    /// Starts folding from the base `from`.
    pub fn new(model: &'m Model, from: BaseId) -> Result<Self, Error> {
        model.get_base(from)?;
        Ok(Self {
            model,
            from,
            rotations: HashMap::from([(from, Matrix::identity(3))]),
            angular_velocities: HashMap::from([(from, Matrix::zeros(3, 1))]),
        })
    }

    pub fn start(&self) -> BaseId {
        self.from
    }

    /// The rotation matrix mapping components in `to` to components in the starting base.
    pub fn rotation(&mut self, to: BaseId) -> Result<&Matrix, Error> {
        if !self.rotations.contains_key(&to) {
            self.walk(to, false)?;
        }
        let (model, from) = (self.model, self.from);
        self.rotations.get(&to).ok_or_else(|| model.disjoint_bases(from, to))
    }

    /// The components, in the starting base, of the angular velocity of `to` relative to the
    /// starting base.
    pub fn angular_velocity(&mut self, to: BaseId) -> Result<&Matrix, Error> {
        if !self.angular_velocities.contains_key(&to) {
            self.walk(to, true)?;
        }
        let (model, from) = (self.model, self.from);
        self.angular_velocities.get(&to).ok_or_else(|| model.disjoint_bases(from, to))
    }

    /// Fills the entries of every base on the path to `to` that are not known yet.
    ///
    /// Each edge contributes the derivative of its angle about its axis, rotated into the starting
    /// base by the rotation accumulated before the edge. Walking an edge upwards uses the transpose
    /// of its rotation and the opposite of its angular velocity.
    fn walk(&mut self, to: BaseId, with_angular_velocity: bool) -> Result<(), Error> {
        let (model, from) = (self.model, self.from);
        model.get_base(to)?;

        let mut current = from;
        for step in model.base_path(from, to)? {
            let (x, up) = match step {
                Step::Up(x) => (x, true),
                Step::Down(x) => (x, false),
            };
            let base = model.get_base(x)?;
            let next = if up {
                base.previous().ok_or_else(|| model.disjoint_bases(from, to))?
            } else {
                x
            };
            let acc = self.rotations.get(&current).ok_or_else(|| model.disjoint_bases(from, to))?;

            if with_angular_velocity && !self.angular_velocities.contains_key(&next) {
                let omega = self.angular_velocities.get(&current)
                    .ok_or_else(|| model.disjoint_bases(from, to))?;
                let contribution = acc * &base.axis().scale(&model.dt(base.angle())?);
                let omega = if up { omega - &contribution } else { omega + &contribution };
                self.angular_velocities.insert(next, omega);
            }
            if !self.rotations.contains_key(&next) {
                let rotation = if up {
                    acc * &base.rotation_matrix().transpose()
                } else {
                    acc * base.rotation_matrix()
                };
                self.rotations.insert(next, rotation);
            }
            current = next;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use mech_algebra::Ctxt;
    use pretty_assertions::assert_eq;
    use super::*;

    /// `xyz -> B1 -> ... -> B6`, where `Bi` turns by `qi` about the z axis of the previous base for
    /// odd `i` and about its x axis for even `i`.
    fn chain() -> (Model, Vec<BaseId>) {
        let mut model = Model::new();
        let mut bases = vec![model.xyz()];
        for i in 1..=6 {
            let q = model.new_coordinate(&format!("q{}", i)).unwrap();
            let previous = *bases.last().unwrap();
            let axis = if i % 2 == 0 { [1, 0, 0] } else { [0, 0, 1] };
            bases.push(model.new_base(&format!("B{}", i), previous, axis, q.q()).unwrap());
        }
        (model, bases)
    }

    #[test]
    fn one_walk_fills_the_whole_chain() {
        let (model, bases) = chain();
        let mut fold = BaseFold::new(&model, model.xyz()).unwrap();
        fold.rotation(bases[6]).unwrap();
        assert_eq!(fold.rotations.len(), 7);
        assert_eq!(fold.angular_velocities.len(), 1);

        // every prefix is the product of the rotations of its edges
        let mut expected = Matrix::identity(3);
        for base in &bases[1..] {
            expected = &expected * model.get_base(*base).unwrap().rotation_matrix();
            assert_eq!(fold.rotation(*base).unwrap(), &expected);
        }
        assert_eq!(fold.rotations.len(), 7);
    }

    #[test]
    fn walking_up_and_across() {
        let (mut model, bases) = chain();
        let q = model.new_coordinate("p").unwrap();
        let side = model.new_base("S", bases[2], [0, 0, 1], q.q()).unwrap();

        let mut fold = BaseFold::new(&model, bases[4]).unwrap();
        for to in [model.xyz(), bases[1], side, bases[6]] {
            let rotation = fold.rotation(to).unwrap().clone();
            assert_eq!(rotation, model.rotation_matrix(bases[4], to).unwrap());
            let omega = fold.angular_velocity(to).unwrap().clone();
            assert_eq!(&omega, model.angular_velocity(bases[4], to).unwrap().components());
        }
    }

    #[test]
    fn angular_velocity_of_the_last_link() {
        let (model, bases) = chain();
        let mut fold = BaseFold::new(&model, model.xyz()).unwrap();
        let omega = fold.angular_velocity(bases[6]).unwrap().clone();
        assert_eq!(fold.angular_velocities.len(), 7);

        let mut ctxt = Ctxt::new();
        let (q, dq) = ([0.3, -0.7, 1.1, 0.2, -0.4, 0.9], [1.0, 0.5, -2.0, 0.25, 1.5, -0.75]);
        for i in 0..6 {
            ctxt.add_var(&format!("q{}", i + 1), q[i]);
            ctxt.add_var(&format!("dq{}", i + 1), dq[i]);
        }

        // sum of the rotated axes, computed with plain numbers
        let mut rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let mut expected = [0.0; 3];
        for i in 0..6 {
            let axis = if i % 2 == 1 { [1.0, 0.0, 0.0] } else { [0.0, 0.0, 1.0] };
            for row in 0..3 {
                expected[row] += dq[i] * (0..3).map(|k| rotation[row][k] * axis[k]).sum::<f64>();
            }
            let (c, s) = (q[i].cos(), q[i].sin());
            let edge = if i % 2 == 1 {
                [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]]
            } else {
                [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]
            };
            let mut next = [[0.0; 3]; 3];
            for row in 0..3 {
                for col in 0..3 {
                    next[row][col] = (0..3).map(|k| rotation[row][k] * edge[k][col]).sum();
                }
            }
            rotation = next;
        }

        for (entry, expected) in omega.iter().zip(expected) {
            assert_float_absolute_eq!(entry.eval(&ctxt).unwrap(), expected, 1e-12);
        }
    }
}
