//! Dense matrices of expressions.
//!
//! Matrices are small (3×3 rotations, 3×1 vectors, jacobians over a handful of coordinates), so
//! they are stored densely in row-major order. Shape mismatches in arithmetic are programming
//! errors and panic, like out-of-bounds indexing does.

use crate::{
    derivative::{derivative, SymbolicDerivativeError},
    expr::Expr,
    simplify::simplify,
};
use std::{fmt, ops::{Add, Index, IndexMut, Mul, Neg, Sub}};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dense matrix of expressions stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix {
    /// Matrix entries in row-major order.
    data: Vec<Expr>,
    /// Number of rows.
    num_rows: usize,
    /// Number of columns.
    num_cols: usize,
}

impl Matrix {
    /// Creates a new matrix filled with zeros.
    #[must_use]
    pub fn zeros(num_rows: usize, num_cols: usize) -> Self {
        Self {
            data: vec![Expr::zero(); num_rows * num_cols],
            num_rows,
            num_cols,
        }
    }

    /// Creates an identity matrix.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = Expr::one();
        }
        m
    }

    /// Creates a matrix from its rows. Every row must have the same length.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<Expr>>) -> Self {
        if rows.is_empty() {
            return Self::zeros(0, 0);
        }
        let num_rows = rows.len();
        let num_cols = rows[0].len();
        let data: Vec<Expr> = rows.into_iter().flatten().collect();
        assert_eq!(data.len(), num_rows * num_cols, "rows of different lengths");
        Self {
            data,
            num_rows,
            num_cols,
        }
    }

    /// Creates a column vector.
    #[must_use]
    pub fn column(entries: impl IntoIterator<Item = Expr>) -> Self {
        let data = entries.into_iter().collect::<Vec<_>>();
        Self {
            num_rows: data.len(),
            num_cols: 1,
            data,
        }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Returns a reference to the entry at (row, col).
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&Expr> {
        if row < self.num_rows && col < self.num_cols {
            Some(&self.data[row * self.num_cols + col])
        } else {
            None
        }
    }

    /// Returns a slice of the specified row.
    #[must_use]
    pub fn row(&self, row: usize) -> &[Expr] {
        let start = row * self.num_cols;
        &self.data[start..start + self.num_cols]
    }

    /// Iterates over the entries in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, Expr> {
        self.data.iter()
    }

    /// Returns true if every entry is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(Expr::is_zero)
    }

    /// Returns the transpose of the matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.num_cols, self.num_rows);
        for row in 0..self.num_rows {
            for col in 0..self.num_cols {
                out[(col, row)] = self[(row, col)].clone();
            }
        }
        out
    }

    /// Applies `f` to every entry.
    #[must_use]
    pub fn map(&self, f: impl FnMut(&Expr) -> Expr) -> Self {
        Self {
            data: self.data.iter().map(f).collect(),
            num_rows: self.num_rows,
            num_cols: self.num_cols,
        }
    }

    /// Applies the fallible `f` to every entry.
    pub fn try_map<E>(&self, f: impl FnMut(&Expr) -> Result<Expr, E>) -> Result<Self, E> {
        Ok(Self {
            data: self.data.iter().map(f).collect::<Result<_, _>>()?,
            num_rows: self.num_rows,
            num_cols: self.num_cols,
        })
    }

    /// Multiplies every entry by `factor`.
    #[must_use]
    pub fn scale(&self, factor: &Expr) -> Self {
        self.map(|entry| entry * factor)
    }

    /// Expands every entry.
    #[must_use]
    pub fn expand(&self) -> Self {
        self.map(Expr::expand)
    }

    /// Simplifies every entry.
    #[must_use]
    pub fn simplify(&self) -> Self {
        self.map(simplify)
    }

    /// Substitutes the symbol `name` with `value` in every entry.
    #[must_use]
    pub fn subs(&self, name: &str, value: &Expr) -> Self {
        self.map(|entry| entry.subs(name, value))
    }

    /// Differentiates every entry with respect to the symbol `with`.
    pub fn derivative(&self, with: &str) -> Result<Self, SymbolicDerivativeError> {
        self.try_map(|entry| derivative(entry, with))
    }

    /// The jacobian of the entries of this matrix, read in row-major order, with respect to the
    /// given symbols: entry `(i, j)` is the derivative of entry `i` with respect to `vars[j]`.
    pub fn jacobian(&self, vars: &[&str]) -> Result<Self, SymbolicDerivativeError> {
        let rows = self.data.iter()
            .map(|entry| vars.iter().map(|var| derivative(entry, var)).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        if rows.is_empty() {
            return Ok(Self::zeros(0, vars.len()));
        }
        Ok(Self::from_rows(rows))
    }

    /// The dot product of two vectors with the same number of entries.
    #[must_use]
    pub fn dot(&self, rhs: &Matrix) -> Expr {
        assert_eq!(self.data.len(), rhs.data.len(), "dot product of vectors of different lengths");
        Expr::sum(self.data.iter().zip(rhs.data.iter()).map(|(a, b)| a * b).collect::<Vec<_>>())
    }

    /// The cross product of two 3×1 column vectors.
    #[must_use]
    pub fn cross(&self, rhs: &Matrix) -> Matrix {
        assert!(self.is_vector3() && rhs.is_vector3(), "cross product of non 3×1 vectors");
        let (a, b) = (&self.data, &rhs.data);
        Matrix::column([
            &a[1] * &b[2] - &a[2] * &b[1],
            &a[2] * &b[0] - &a[0] * &b[2],
            &a[0] * &b[1] - &a[1] * &b[0],
        ])
    }

    /// The skew-symmetric matrix `[v]x` of a 3×1 column vector, such that `[v]x * w = v × w`.
    #[must_use]
    pub fn skew(&self) -> Matrix {
        assert!(self.is_vector3(), "skew matrix of a non 3×1 vector");
        let v = &self.data;
        Matrix::from_rows(vec![
            vec![Expr::zero(), -&v[2], v[1].clone()],
            vec![v[2].clone(), Expr::zero(), -&v[0]],
            vec![-&v[1], v[0].clone(), Expr::zero()],
        ])
    }

    fn is_vector3(&self) -> bool {
        self.num_rows == 3 && self.num_cols == 1
    }

    fn zip_with(&self, rhs: &Matrix, f: impl Fn(&Expr, &Expr) -> Expr) -> Matrix {
        assert_eq!(
            (self.num_rows, self.num_cols),
            (rhs.num_rows, rhs.num_cols),
            "element-wise operation on matrices of different shapes",
        );
        Matrix {
            data: self.data.iter().zip(rhs.data.iter()).map(|(a, b)| f(a, b)).collect(),
            num_rows: self.num_rows,
            num_cols: self.num_cols,
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Expr;

    fn index(&self, (row, col): (usize, usize)) -> &Expr {
        assert!(row < self.num_rows && col < self.num_cols, "matrix index out of bounds");
        &self.data[row * self.num_cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Expr {
        assert!(row < self.num_rows && col < self.num_cols, "matrix index out of bounds");
        &mut self.data[row * self.num_cols + col]
    }
}

impl Add for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: &Matrix) -> Matrix {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: &Matrix) -> Matrix {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Neg for &Matrix {
    type Output = Matrix;

    fn neg(self) -> Matrix {
        self.map(|entry| -entry)
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.num_cols, rhs.num_rows, "matrix product of incompatible shapes");
        let mut out = Matrix::zeros(self.num_rows, rhs.num_cols);
        for row in 0..self.num_rows {
            for col in 0..rhs.num_cols {
                out[(row, col)] = Expr::sum(
                    (0..self.num_cols)
                        .map(|k| &self[(row, k)] * &rhs[(k, col)])
                        .collect::<Vec<_>>(),
                );
            }
        }
        out
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for row in 0..self.num_rows {
            if row > 0 {
                write!(f, "; ")?;
            }
            let mut iter = self.row(row).iter();
            if let Some(entry) = iter.next() {
                write!(f, "{}", entry)?;
                for entry in iter {
                    write!(f, ", {}", entry)?;
                }
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn rot_z(angle: &Expr) -> Matrix {
        let (c, s) = (Expr::cos(angle.clone()), Expr::sin(angle.clone()));
        Matrix::from_rows(vec![
            vec![c.clone(), -&s, Expr::zero()],
            vec![s, c, Expr::zero()],
            vec![Expr::zero(), Expr::zero(), Expr::one()],
        ])
    }

    #[test]
    fn identity_is_neutral() {
        let r = rot_z(&Expr::symbol("a"));
        assert_eq!(&Matrix::identity(3) * &r, r);
        assert_eq!(&r * &Matrix::identity(3), r);
    }

    #[test]
    fn rotation_times_transpose_simplifies_to_identity() {
        let r = &rot_z(&Expr::symbol("a")) * &rot_z(&Expr::symbol("b"));
        assert_eq!((&r * &r.transpose()).simplify(), Matrix::identity(3));
    }

    #[test]
    fn cross_product_and_skew_agree() {
        let v = Matrix::column([Expr::symbol("x"), Expr::symbol("y"), Expr::symbol("z")]);
        let w = Matrix::column([Expr::symbol("u"), Expr::number(2), Expr::zero()]);
        assert_eq!(&v.skew() * &w, v.cross(&w));
        assert!(v.cross(&v).is_zero());
        assert_eq!(v.dot(&w), Expr::symbol("u") * Expr::symbol("x") + Expr::number(2) * Expr::symbol("y"));
    }

    #[test]
    fn jacobian() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        let f = Matrix::column([&x * &y, Expr::sin(x.clone())]);
        assert_eq!(
            f.jacobian(&["x", "y"]).unwrap(),
            Matrix::from_rows(vec![
                vec![y.clone(), x.clone()],
                vec![Expr::cos(x.clone()), Expr::zero()],
            ]),
        );
    }
}
