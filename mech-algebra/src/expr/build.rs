//! Normalizing constructors.

use crate::primitive::small_int;
use rug::{ops::Pow, Rational};
use std::{collections::BTreeMap, sync::Arc};
use super::{Expr, Primary, MINUS_ONE};

/// Multiplies `rest` (which must not be a number) by the coefficient `coeff`.
fn scaled(rest: Expr, coeff: Rational) -> Expr {
    if coeff == 1 {
        return rest;
    }
    let coeff = Expr::Primary(Primary::Number(coeff));
    match rest {
        Expr::Mul(factors) => {
            let mut out = Vec::with_capacity(factors.len() + 1);
            out.push(coeff);
            out.extend(factors.iter().cloned());
            Expr::Mul(out.into())
        },
        other => Expr::Mul(vec![coeff, other].into()),
    }
}

/// Collects terms of a sum, flattening nested sums.
#[derive(Default)]
struct SumBuilder {
    constant: Rational,
    terms: BTreeMap<Expr, Rational>,
}

impl SumBuilder {
    fn add(&mut self, term: &Expr) {
        match term {
            Expr::Primary(Primary::Number(n)) => self.constant += n,
            Expr::Add(terms) => terms.iter().for_each(|term| self.add(term)),
            _ => {
                let (coeff, rest) = term.split_coefficient();
                *self.terms.entry(rest).or_default() += coeff;
            },
        }
    }

    fn build(self) -> Expr {
        let mut out = self.terms
            .into_iter()
            .filter(|(_, coeff)| *coeff != 0)
            .map(|(rest, coeff)| scaled(rest, coeff))
            .collect::<Vec<_>>();
        if self.constant != 0 {
            out.push(Expr::Primary(Primary::Number(self.constant)));
        }

        match out.len() {
            0 => Expr::zero(),
            1 => out.swap_remove(0),
            _ => {
                out.sort();
                Expr::Add(out.into())
            },
        }
    }
}

/// Collects factors of a product, flattening nested products and grouping equal bases.
struct MulBuilder {
    coeff: Rational,
    bases: BTreeMap<Expr, Vec<Expr>>,
}

impl Default for MulBuilder {
    fn default() -> Self {
        Self { coeff: Rational::from(1), bases: BTreeMap::new() }
    }
}

impl MulBuilder {
    fn mult(&mut self, factor: &Expr) {
        match factor {
            Expr::Primary(Primary::Number(n)) => self.coeff *= n,
            Expr::Mul(factors) => factors.iter().for_each(|factor| self.mult(factor)),
            Expr::Exp(base, exp) => self.bases
                .entry((**base).clone())
                .or_default()
                .push((**exp).clone()),
            other => self.bases.entry(other.clone()).or_default().push(Expr::one()),
        }
    }

    fn build(self) -> Expr {
        if self.coeff == 0 {
            return Expr::zero();
        }

        let mut coeff = self.coeff;
        let mut out = Vec::with_capacity(self.bases.len() + 1);
        let mut regroup = false;
        for (base, exps) in self.bases {
            let exp = Expr::sum(exps);
            match base.pow(exp) {
                Expr::Primary(Primary::Number(n)) => coeff *= n,
                factor @ Expr::Mul(_) => {
                    // a power distributed over a product; its factors must be grouped again
                    regroup = true;
                    out.push(factor);
                },
                factor => out.push(factor),
            }
        }

        if regroup {
            let mut builder = MulBuilder { coeff, bases: BTreeMap::new() };
            out.iter().for_each(|factor| builder.mult(factor));
            return builder.build();
        }

        if coeff == 0 {
            return Expr::zero();
        }
        out.sort();
        if coeff != 1 {
            out.insert(0, Expr::Primary(Primary::Number(coeff)));
        }

        match out.len() {
            0 => Expr::one(),
            1 => out.swap_remove(0),
            _ => Expr::Mul(out.into()),
        }
    }
}

impl Expr {
    /// Adds the given terms together.
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Expr {
        let mut builder = SumBuilder::default();
        terms.into_iter().for_each(|term| builder.add(&term));
        builder.build()
    }

    /// Multiplies the given factors together.
    pub fn product(factors: impl IntoIterator<Item = Expr>) -> Expr {
        let mut builder = MulBuilder::default();
        factors.into_iter().for_each(|factor| builder.mult(&factor));
        builder.build()
    }

    /// Raises the expression to the given power.
    pub fn pow(&self, exp: impl Into<Expr>) -> Expr {
        let exp = exp.into();
        if exp.is_zero() {
            return Expr::one();
        }
        if exp.is_one() || self.is_one() {
            return self.clone();
        }

        let int_exp = exp.as_number().and_then(small_int);
        match (self, int_exp) {
            (Expr::Primary(Primary::Number(base)), Some(n)) => {
                if *base == 0 && n < 0 {
                    return Expr::Exp(Arc::new(self.clone()), Arc::new(exp));
                }
                Expr::Primary(Primary::Number(Rational::from(base.pow(n))))
            },
            (Expr::Primary(Primary::Number(base)), None) if *base == 0 => {
                if exp.as_number().is_some_and(|n| *n > 0) {
                    Expr::zero()
                } else {
                    Expr::Exp(Arc::new(self.clone()), Arc::new(exp))
                }
            },
            (Expr::Exp(inner_base, inner_exp), Some(_)) => {
                inner_base.pow(Expr::product([(**inner_exp).clone(), exp]))
            },
            (Expr::Mul(factors), Some(_)) => {
                Expr::product(factors.iter().map(|factor| factor.pow(exp.clone())).collect::<Vec<_>>())
            },
            _ => Expr::Exp(Arc::new(self.clone()), Arc::new(exp)),
        }
    }

    /// The square root of the expression, `x^(1/2)`.
    pub fn sqrt(&self) -> Expr {
        self.pow(Expr::ratio(1, 2))
    }

    /// Creates a call to the function `name`, applying the identities that hold for the known
    /// functions of one argument.
    pub fn call(name: &str, args: impl IntoIterator<Item = Expr>) -> Expr {
        let args = args.into_iter().collect::<Vec<_>>();
        if let [arg] = args.as_slice() {
            if let Some(expr) = eval_known(name, arg) {
                return expr;
            }
        }
        Expr::Primary(Primary::Call(Arc::from(name), args.into()))
    }

    /// `sin(x)`
    pub fn sin(arg: impl Into<Expr>) -> Expr {
        Expr::call("sin", [arg.into()])
    }

    /// `cos(x)`
    pub fn cos(arg: impl Into<Expr>) -> Expr {
        Expr::call("cos", [arg.into()])
    }

    /// `tan(x)`
    pub fn tan(arg: impl Into<Expr>) -> Expr {
        Expr::call("tan", [arg.into()])
    }

    /// `exp(x)`
    pub fn exp(arg: impl Into<Expr>) -> Expr {
        Expr::call("exp", [arg.into()])
    }

    /// `ln(x)`
    pub fn ln(arg: impl Into<Expr>) -> Expr {
        Expr::call("ln", [arg.into()])
    }

    /// `atan(x)`
    pub fn atan(arg: impl Into<Expr>) -> Expr {
        Expr::call("atan", [arg.into()])
    }
}

/// Returns `Some(arg)` with the sign removed if `arg` has a negative coefficient.
fn strip_negation(arg: &Expr) -> Option<Expr> {
    if let Some(n) = arg.as_number() {
        return (*n < 0).then(|| Expr::from(Rational::from(-n)));
    }
    let (coeff, rest) = arg.split_coefficient();
    if coeff < 0 {
        Some(scaled(rest, -coeff))
    } else {
        None
    }
}

/// Evaluates a known function of one argument if an identity applies.
fn eval_known(name: &str, arg: &Expr) -> Option<Expr> {
    match name {
        "sin" | "tan" | "asin" | "atan" => {
            if arg.is_zero() {
                return Some(Expr::zero());
            }
            strip_negation(arg).map(|positive| -Expr::call(name, [positive]))
        },
        "cos" => {
            if arg.is_zero() {
                return Some(Expr::one());
            }
            strip_negation(arg).map(|positive| Expr::call(name, [positive]))
        },
        "exp" if arg.is_zero() => Some(Expr::one()),
        "ln" if arg.is_one() => Some(Expr::zero()),
        "sqrt" => Some(arg.sqrt()),
        _ => None,
    }
}

/// `-1 * x`
pub(super) fn negate(expr: &Expr) -> Expr {
    Expr::product([MINUS_ONE.clone(), expr.clone()])
}
