//! Arithmetic operators. Every operator returns its result in canonical form.

use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};
use super::{build::negate, Expr};

macro_rules! impl_binary {
    ($trait:ident, $method:ident, |$lhs:ident, $rhs:ident| $body:expr) => {
        impl $trait<Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                let ($lhs, $rhs) = (&self, &rhs);
                $body
            }
        }

        impl $trait<&Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                let ($lhs, $rhs) = (&self, rhs);
                $body
            }
        }

        impl $trait<Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                let ($lhs, $rhs) = (self, &rhs);
                $body
            }
        }

        impl $trait<&Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                let ($lhs, $rhs) = (self, rhs);
                $body
            }
        }
    };
}

impl_binary!(Add, add, |lhs, rhs| Expr::sum([lhs.clone(), rhs.clone()]));
impl_binary!(Sub, sub, |lhs, rhs| Expr::sum([lhs.clone(), negate(rhs)]));
impl_binary!(Mul, mul, |lhs, rhs| Expr::product([lhs.clone(), rhs.clone()]));
impl_binary!(Div, div, |lhs, rhs| Expr::product([lhs.clone(), rhs.pow(-1)]));

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        negate(&self)
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        negate(self)
    }
}

impl AddAssign<&Expr> for Expr {
    fn add_assign(&mut self, rhs: &Expr) {
        *self = &*self + rhs;
    }
}

impl AddAssign<Expr> for Expr {
    fn add_assign(&mut self, rhs: Expr) {
        *self = &*self + rhs;
    }
}

impl SubAssign<&Expr> for Expr {
    fn sub_assign(&mut self, rhs: &Expr) {
        *self = &*self - rhs;
    }
}

impl SubAssign<Expr> for Expr {
    fn sub_assign(&mut self, rhs: Expr) {
        *self = &*self - rhs;
    }
}

impl MulAssign<&Expr> for Expr {
    fn mul_assign(&mut self, rhs: &Expr) {
        *self = &*self * rhs;
    }
}

impl MulAssign<Expr> for Expr {
    fn mul_assign(&mut self, rhs: Expr) {
        *self = &*self * rhs;
    }
}

impl std::iter::Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Self {
        Expr::sum(iter)
    }
}

impl std::iter::Product for Expr {
    fn product<I: Iterator<Item = Expr>>(iter: I) -> Self {
        Expr::product(iter)
    }
}
