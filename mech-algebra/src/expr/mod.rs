//! An immutable representation of mathematical expressions in canonical form.
//!
//! [`Expr`] is a tree whose children are shared behind [`Arc`]s, so cloning an expression is
//! cheap and expressions can be freely passed between threads. The tree is **flattened**: the
//! expression `x + (y + z)` is a single [`Expr::Add`] node with three children.
//!
//! # Canonical form
//!
//! Every constructor in this module ([`Expr::sum`], [`Expr::product`], [`Expr::pow`],
//! [`Expr::call`], and the arithmetic operators) returns its result in canonical form:
//!
//! - numbers are exact [`Rational`]s, folded together wherever they meet;
//! - like terms and like factors are combined (`a + a = 2a`, `a * a^2 = a^3`);
//! - the terms of a sum and the factors of a product are sorted, with the numeric coefficient
//!   of a product always first;
//! - trivial identities are applied (`a + 0`, `a * 1`, `a * 0`, `a^0`, `a^1`, `1^a`,
//!   `sin(0)`, `cos(-x)`, ...).
//!
//! Because of this, the derived [`PartialEq`], [`Eq`], [`Hash`] and [`Ord`] implementations are
//! structural, yet two expressions that only differ by the order of commutative operands compare
//! equal: `a + b` and `b + a` build the very same tree. This is the property that lets callers
//! use expressions as keys of hash maps to detect repeated subexpressions.
//!
//! Canonical form is **not** a full simplifier. `(a + b)^2` and `a^2 + 2ab + b^2` are different
//! trees, as are `sin(x)^2 + cos(x)^2` and `1`; see [`Expr::expand`] and
//! [`simplify`](crate::simplify()) for those.
//!
//! # Raw rebuilding
//!
//! [`Expr::rebuild_with`] and [`Expr::try_rebuild_with`] replace the children of a node without
//! normalizing the result (children are only re-sorted). They exist for transformations that must
//! be exactly invertible, such as replacing subexpressions with placeholder atoms and back.

mod build;
mod fmt;
mod iter;
mod ops;

pub use iter::ExprIter;

use once_cell::sync::Lazy;
use rug::Rational;
use std::{collections::BTreeSet, convert::Infallible, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub(crate) static ZERO: Lazy<Expr> = Lazy::new(|| Expr::Primary(Primary::Number(Rational::new())));
pub(crate) static ONE: Lazy<Expr> = Lazy::new(|| Expr::Primary(Primary::Number(Rational::from(1))));
pub(crate) static MINUS_ONE: Lazy<Expr> = Lazy::new(|| Expr::Primary(Primary::Number(Rational::from(-1))));

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primary {
    /// An exact rational number, such as `2` or `-1/3`.
    Number(Rational),

    /// A variable, such as `x` or `theta1`.
    Symbol(Arc<str>),

    /// The placeholder symbol standing for a tabulated subexpression.
    Atom(u32),

    /// A function call, such as `sin(x)`.
    Call(Arc<str>, Arc<[Expr]>),
}

/// A mathematical expression in canonical form.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Arc<[Expr]>),

    /// Multiple factors multiplied together.
    Mul(Arc<[Expr]>),

    /// An expression raised to a power.
    Exp(Arc<Expr>, Arc<Expr>),
}

impl Default for Expr {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Self::number(n)
    }
}

impl From<Rational> for Expr {
    fn from(n: Rational) -> Self {
        Self::Primary(Primary::Number(n))
    }
}

impl From<&str> for Expr {
    fn from(name: &str) -> Self {
        Self::symbol(name)
    }
}

impl Expr {
    /// Creates a number.
    pub fn number<T>(n: T) -> Self
    where
        Rational: From<T>,
    {
        Self::Primary(Primary::Number(Rational::from(n)))
    }

    /// Creates the number `num / den`. The denominator must not be zero.
    pub fn ratio(num: i64, den: i64) -> Self {
        Self::Primary(Primary::Number(crate::primitive::ratio(num, den)))
    }

    /// Creates a symbol with the given name.
    pub fn symbol(name: impl Into<Arc<str>>) -> Self {
        Self::Primary(Primary::Symbol(name.into()))
    }

    /// Creates the placeholder symbol of the atom with the given index.
    pub fn atom(index: u32) -> Self {
        Self::Primary(Primary::Atom(index))
    }

    /// The number `0`.
    pub fn zero() -> Self {
        ZERO.clone()
    }

    /// The number `1`.
    pub fn one() -> Self {
        ONE.clone()
    }

    /// If the expression is a number, returns a reference to it.
    pub fn as_number(&self) -> Option<&Rational> {
        match self {
            Self::Primary(Primary::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// If the expression is a symbol, returns its name.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// If the expression is an atom placeholder, returns its index.
    pub fn as_atom(&self) -> Option<u32> {
        match self {
            Self::Primary(Primary::Atom(index)) => Some(*index),
            _ => None,
        }
    }

    /// Returns true if the expression is a number.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Primary(Primary::Number(_)))
    }

    /// Returns true if the expression is the number `0`.
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(|n| *n == 0)
    }

    /// Returns true if the expression is the number `1`.
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(|n| *n == 1)
    }

    /// Returns true if the expression is a leaf of the tree (a number, symbol or atom).
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Self::Primary(Primary::Number(_) | Primary::Symbol(_) | Primary::Atom(_))
        )
    }

    /// Splits the expression into its numeric coefficient and the remaining factors.
    ///
    /// `3xy` splits into `(3, xy)`, `x` into `(1, x)` and `5` into `(5, 1)`.
    pub fn split_coefficient(&self) -> (Rational, Expr) {
        match self {
            Self::Primary(Primary::Number(n)) => (n.clone(), Self::one()),
            Self::Mul(factors) => match factors.first().and_then(Expr::as_number) {
                Some(n) => {
                    let rest = &factors[1..];
                    let rest = if rest.len() == 1 {
                        rest[0].clone()
                    } else {
                        Self::Mul(rest.into())
                    };
                    (n.clone(), rest)
                },
                None => (Rational::from(1), self.clone()),
            },
            _ => (Rational::from(1), self.clone()),
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first). Arguments of function calls are visited before the call itself.
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// The number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.post_order_iter().count()
    }

    /// Returns the set of symbol names appearing in the expression.
    pub fn symbols(&self) -> BTreeSet<Arc<str>> {
        self.post_order_iter()
            .filter_map(|expr| match expr {
                Self::Primary(Primary::Symbol(sym)) => Some(sym.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns true if the expression contains the given symbol.
    pub fn contains_symbol(&self, name: &str) -> bool {
        self.post_order_iter().any(|expr| expr.as_symbol() == Some(name))
    }

    /// Returns the atom placeholders in the expression, in order of first appearance.
    pub fn atoms(&self) -> Vec<u32> {
        let mut seen = BTreeSet::new();
        self.post_order_iter()
            .filter_map(Expr::as_atom)
            .filter(|index| seen.insert(*index))
            .collect()
    }

    /// Returns true if the expression contains at least one atom placeholder.
    pub fn has_atoms(&self) -> bool {
        self.post_order_iter().any(|expr| expr.as_atom().is_some())
    }

    /// Replaces the children of this node with the result of `f` applied to each one, **without**
    /// normalizing the result. The terms of a sum and the factors of a product are re-sorted, the
    /// arguments of a call keep their order. Leaves are returned unchanged.
    pub fn rebuild_with(&self, mut f: impl FnMut(&Expr) -> Expr) -> Expr {
        match self.try_rebuild_with(|child| Ok::<_, Infallible>(f(child))) {
            Ok(expr) => expr,
            Err(never) => match never {},
        }
    }

    /// Fallible version of [`Expr::rebuild_with`].
    pub fn try_rebuild_with<E>(
        &self,
        mut f: impl FnMut(&Expr) -> Result<Expr, E>,
    ) -> Result<Expr, E> {
        Ok(match self {
            Self::Primary(Primary::Call(name, args)) => {
                let args = args.iter().map(&mut f).collect::<Result<Vec<_>, _>>()?;
                Self::Primary(Primary::Call(name.clone(), args.into()))
            },
            Self::Primary(_) => self.clone(),
            Self::Add(terms) => {
                let mut terms = terms.iter().map(&mut f).collect::<Result<Vec<_>, _>>()?;
                terms.sort();
                Self::Add(terms.into())
            },
            Self::Mul(factors) => {
                let mut factors = factors.iter().map(&mut f).collect::<Result<Vec<_>, _>>()?;
                factors.sort();
                Self::Mul(factors.into())
            },
            Self::Exp(base, exp) => Self::Exp(Arc::new(f(base)?), Arc::new(f(exp)?)),
        })
    }

    /// Rebuilds the expression bottom-up in canonical form, replacing every [`Primary`] for which
    /// `f` returns `Some`.
    ///
    /// Function calls are offered to `f` before their arguments are visited.
    pub fn substitute<F>(&self, f: &mut F) -> Expr
    where
        F: FnMut(&Primary) -> Option<Expr>,
    {
        match self {
            Self::Primary(primary) => {
                if let Some(replacement) = f(primary) {
                    return replacement;
                }
                match primary {
                    Primary::Call(name, args) => {
                        let args = args.iter().map(|arg| arg.substitute(f)).collect::<Vec<_>>();
                        Self::call(name, args)
                    },
                    _ => self.clone(),
                }
            },
            Self::Add(terms) => Self::sum(terms.iter().map(|term| term.substitute(f)).collect::<Vec<_>>()),
            Self::Mul(factors) => Self::product(factors.iter().map(|factor| factor.substitute(f)).collect::<Vec<_>>()),
            Self::Exp(base, exp) => base.substitute(f).pow(exp.substitute(f)),
        }
    }

    /// Substitutes every occurrence of the symbol `name` with `value`.
    pub fn subs(&self, name: &str, value: &Expr) -> Expr {
        self.substitute(&mut |primary| match primary {
            Primary::Symbol(sym) if &**sym == name => Some(value.clone()),
            _ => None,
        })
    }

    /// Expands the expression by distributing products over sums and positive integer powers of
    /// sums, recursively.
    pub fn expand(&self) -> Expr {
        match self {
            Self::Primary(Primary::Call(name, args)) => {
                Self::call(name, args.iter().map(Expr::expand).collect::<Vec<_>>())
            },
            Self::Primary(_) => self.clone(),
            Self::Add(terms) => Self::sum(terms.iter().map(Expr::expand).collect::<Vec<_>>()),
            Self::Mul(factors) => distribute(factors.iter().map(Expr::expand).collect()),
            Self::Exp(base, exp) => {
                let base = base.expand();
                let exp = exp.expand();
                match (&base, exp.as_number().and_then(crate::primitive::small_int)) {
                    (Self::Add(_), Some(n)) if n >= 2 => distribute(vec![base; n as usize]),
                    _ => base.pow(exp),
                }
            },
        }
    }
}

/// Multiplies the given factors together, distributing the product over every factor that is a
/// sum. The result is a sum of products in which no factor is a sum.
pub(crate) fn distribute(factors: Vec<Expr>) -> Expr {
    let mut terms = vec![Expr::one()];
    for factor in factors {
        terms = match &factor {
            Expr::Add(factor_terms) => terms.iter()
                .flat_map(|term| factor_terms.iter().map(move |other| term * other))
                .collect(),
            _ => terms.iter().map(|term| term * &factor).collect(),
        };
    }
    Expr::sum(terms)
}
