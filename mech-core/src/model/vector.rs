use mech_algebra::{Expr, Matrix};
use std::fmt;
use super::id::BaseId;

/// A 3-D vector: its components, and the base they are expressed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vector3D {
    components: Matrix,
    base: BaseId,
}

impl Vector3D {
    /// Creates a vector from its three components in `base`.
    pub fn new(base: BaseId, x: impl Into<Expr>, y: impl Into<Expr>, z: impl Into<Expr>) -> Self {
        Self {
            components: Matrix::column([x.into(), y.into(), z.into()]),
            base,
        }
    }

    /// The zero vector of `base`.
    pub fn zero(base: BaseId) -> Self {
        Self::new(base, 0, 0, 0)
    }

    /// Wraps a 3×1 column of components. Panics if the matrix is not 3×1.
    pub fn from_matrix(base: BaseId, components: Matrix) -> Self {
        assert!(
            components.num_rows() == 3 && components.num_cols() == 1,
            "a vector needs a 3×1 matrix of components",
        );
        Self { components, base }
    }

    /// The base the components are expressed in.
    pub fn base(&self) -> BaseId {
        self.base
    }

    /// The components as a 3×1 column.
    pub fn components(&self) -> &Matrix {
        &self.components
    }

    /// The `x` component.
    pub fn x(&self) -> &Expr {
        &self.components[(0, 0)]
    }

    /// The `y` component.
    pub fn y(&self) -> &Expr {
        &self.components[(1, 0)]
    }

    /// The `z` component.
    pub fn z(&self) -> &Expr {
        &self.components[(2, 0)]
    }

    /// Returns true if every component is zero.
    pub fn is_zero(&self) -> bool {
        self.components.is_zero()
    }

    /// Applies `f` to every component, keeping the base.
    pub fn map(&self, f: impl FnMut(&Expr) -> Expr) -> Self {
        Self::from_matrix(self.base, self.components.map(f))
    }

    /// Applies the fallible `f` to every component, keeping the base.
    pub fn try_map<E>(&self, f: impl FnMut(&Expr) -> Result<Expr, E>) -> Result<Self, E> {
        Ok(Self::from_matrix(self.base, self.components.try_map(f)?))
    }

    /// Multiplies every component by `factor`.
    pub fn scaled(&self, factor: &Expr) -> Self {
        self.map(|c| c * factor)
    }

    /// Simplifies every component.
    pub fn simplify(&self) -> Self {
        Self::from_matrix(self.base, self.components.simplify())
    }
}

impl std::ops::Neg for &Vector3D {
    type Output = Vector3D;

    fn neg(self) -> Vector3D {
        self.map(|c| -c)
    }
}

impl fmt::Display for Vector3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x(), self.y(), self.z())
    }
}

/// A 3×3 tensor, such as an inertia tensor: its components, and the base they are expressed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tensor3D {
    components: Matrix,
    base: BaseId,
}

impl Tensor3D {
    /// Wraps a 3×3 matrix of components. Panics if the matrix is not 3×3.
    pub fn new(base: BaseId, components: Matrix) -> Self {
        assert!(
            components.num_rows() == 3 && components.num_cols() == 3,
            "a tensor needs a 3×3 matrix of components",
        );
        Self { components, base }
    }

    /// The diagonal tensor with the given principal values.
    pub fn diagonal(base: BaseId, xx: impl Into<Expr>, yy: impl Into<Expr>, zz: impl Into<Expr>) -> Self {
        let mut components = Matrix::zeros(3, 3);
        components[(0, 0)] = xx.into();
        components[(1, 1)] = yy.into();
        components[(2, 2)] = zz.into();
        Self { components, base }
    }

    /// The base the components are expressed in.
    pub fn base(&self) -> BaseId {
        self.base
    }

    /// The components.
    pub fn components(&self) -> &Matrix {
        &self.components
    }

    /// Applies the fallible `f` to every component, keeping the base.
    pub fn try_map<E>(&self, f: impl FnMut(&Expr) -> Result<Expr, E>) -> Result<Self, E> {
        Ok(Self::new(self.base, self.components.try_map(f)?))
    }

    /// Applies the tensor to a vector given in the same base.
    pub fn apply(&self, v: &Matrix) -> Matrix {
        &self.components * v
    }
}
