use crate::{
    kinematics::Twist,
    model::{Tensor3D, Vector3D},
    wrench::Wrench,
};
use mech_algebra::{Expr, Matrix};

/// A value made of expressions, which an [`AtomTable`](super::AtomTable) can atomize and
/// unatomize as a whole.
///
/// Everything else about the value (bases, points, names) is carried over unchanged.
pub trait Atomize: Sized + Clone {
    /// Rebuilds the value with `f` applied to each of its expressions, in a fixed order.
    fn try_map_exprs<E>(&self, f: &mut dyn FnMut(&Expr) -> Result<Expr, E>) -> Result<Self, E>;

    /// The expressions of the value, in the same order as [`Atomize::try_map_exprs`].
    fn exprs(&self) -> Vec<&Expr>;
}

impl Atomize for Expr {
    fn try_map_exprs<E>(&self, f: &mut dyn FnMut(&Expr) -> Result<Expr, E>) -> Result<Self, E> {
        f(self)
    }

    fn exprs(&self) -> Vec<&Expr> {
        vec![self]
    }
}

impl Atomize for Matrix {
    fn try_map_exprs<E>(&self, f: &mut dyn FnMut(&Expr) -> Result<Expr, E>) -> Result<Self, E> {
        self.try_map(f)
    }

    fn exprs(&self) -> Vec<&Expr> {
        self.iter().collect()
    }
}

impl Atomize for Vector3D {
    fn try_map_exprs<E>(&self, f: &mut dyn FnMut(&Expr) -> Result<Expr, E>) -> Result<Self, E> {
        self.try_map(f)
    }

    fn exprs(&self) -> Vec<&Expr> {
        self.components().exprs()
    }
}

impl Atomize for Tensor3D {
    fn try_map_exprs<E>(&self, f: &mut dyn FnMut(&Expr) -> Result<Expr, E>) -> Result<Self, E> {
        self.try_map(f)
    }

    fn exprs(&self) -> Vec<&Expr> {
        self.components().exprs()
    }
}

impl Atomize for Twist {
    fn try_map_exprs<E>(&self, f: &mut dyn FnMut(&Expr) -> Result<Expr, E>) -> Result<Self, E> {
        Ok(Twist {
            angular: self.angular.try_map_exprs(f)?,
            linear: self.linear.try_map_exprs(f)?,
            point: self.point,
        })
    }

    fn exprs(&self) -> Vec<&Expr> {
        let mut exprs = self.angular.exprs();
        exprs.extend(self.linear.exprs());
        exprs
    }
}

impl Atomize for Wrench {
    fn try_map_exprs<E>(&self, f: &mut dyn FnMut(&Expr) -> Result<Expr, E>) -> Result<Self, E> {
        let force = self.force().try_map_exprs(f)?;
        let moment = self.moment().try_map_exprs(f)?;
        Ok(self.with_vectors(force, moment))
    }

    fn exprs(&self) -> Vec<&Expr> {
        let mut exprs = self.force().exprs();
        exprs.extend(self.moment().exprs());
        exprs
    }
}

impl<T: Atomize> Atomize for Vec<T> {
    fn try_map_exprs<E>(&self, f: &mut dyn FnMut(&Expr) -> Result<Expr, E>) -> Result<Self, E> {
        self.iter().map(|item| item.try_map_exprs(f)).collect()
    }

    fn exprs(&self) -> Vec<&Expr> {
        self.iter().flat_map(Atomize::exprs).collect()
    }
}
