//! Symbolic differentiation.

mod function;

use crate::expr::{Expr, Primary};

/// Reasons a derivative could not be computed symbolically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolicDerivativeError {
    /// The function may be differentiable, but we do not support symbolically computing it.
    Unsupported(String),

    /// The provided sub-expression is not differentiable, for example an atom placeholder whose
    /// definition is not known here.
    Undifferentiable(Expr),
}

impl std::fmt::Display for SymbolicDerivativeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported(name) => write!(f, "the derivative of `{}` is not supported", name),
            Self::Undifferentiable(expr) => write!(f, "`{}` cannot be differentiated", expr),
        }
    }
}

/// `(f + g)' = f' + g'`
fn sum_rule(terms: &[Expr], with: &str) -> Result<Expr, SymbolicDerivativeError> {
    terms.iter()
        .map(|term| derivative(term, with))
        .collect::<Result<Vec<_>, _>>()
        .map(Expr::sum)
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
fn product_rule(factors: &[Expr], with: &str) -> Result<Expr, SymbolicDerivativeError> {
    let mut terms = Vec::with_capacity(factors.len());
    for (derivative_index, factor) in factors.iter().enumerate() {
        let d = derivative(factor, with)?;
        if d.is_zero() {
            continue;
        }

        let others = factors.iter()
            .enumerate()
            .filter(|(index, _)| *index != derivative_index)
            .map(|(_, other)| other.clone());
        terms.push(Expr::product(others.chain(std::iter::once(d))));
    }
    Ok(Expr::sum(terms))
}

/// `(f^g)'`
///
/// When `g` does not depend on the variable, this is the power rule `g f^(g - 1) f'`. Otherwise
/// the general rule `f^g (g' ln(f) + g f' / f)` is used.
fn power_rule(base: &Expr, exp: &Expr, with: &str) -> Result<Expr, SymbolicDerivativeError> {
    let base_derivative = derivative(base, with)?;
    let exp_derivative = derivative(exp, with)?;

    if exp_derivative.is_zero() {
        if base_derivative.is_zero() {
            return Ok(Expr::zero());
        }
        return Ok(Expr::product([
            exp.clone(),
            base.pow(exp - Expr::one()),
            base_derivative,
        ]));
    }

    Ok(base.pow(exp.clone()) * (
        exp_derivative * Expr::ln(base.clone())
            + exp * base_derivative / base
    ))
}

/// Computes the partial derivative of the given expression with respect to the symbol `with`.
/// Returns [`Err`] if the derivative could not be symbolically computed.
///
/// Subtrees that do not contain `with` differentiate to zero without being inspected further, so
/// calls to functions without a known derivative only fail when they depend on `with`.
pub fn derivative(f: &Expr, with: &str) -> Result<Expr, SymbolicDerivativeError> {
    match f {
        Expr::Primary(Primary::Number(_)) => Ok(Expr::zero()),
        Expr::Primary(Primary::Symbol(sym)) => {
            if &**sym == with {
                Ok(Expr::one())
            } else {
                Ok(Expr::zero())
            }
        },
        Expr::Primary(Primary::Atom(_)) => Err(SymbolicDerivativeError::Undifferentiable(f.clone())),
        _ if !f.contains_symbol(with) && !f.has_atoms() => Ok(Expr::zero()),
        Expr::Primary(Primary::Call(name, args)) => function::function_derivative(name, args, with),
        Expr::Add(terms) => sum_rule(terms, with),
        Expr::Mul(factors) => product_rule(factors, with),
        Expr::Exp(base, exp) => power_rule(base, exp, with),
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::eval::Ctxt;
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    /// Evaluates an expression at `x`.
    fn eval_x(e: &Expr, x: f64) -> f64 {
        let mut ctxt = Ctxt::new();
        ctxt.add_var("x", x);
        e.eval(&ctxt).unwrap()
    }

    /// Approximates the derivative of the expression at `x` with a central difference.
    fn finite_difference(e: &Expr, x: f64) -> f64 {
        const DX: f64 = 1e-6;
        (eval_x(e, x + DX) - eval_x(e, x - DX)) / (2.0 * DX)
    }

    fn test_for_function(function: &Expr, points: impl IntoIterator<Item = f64>) {
        let symbolic = derivative(function, "x").unwrap();
        for point in points {
            assert_float_absolute_eq!(eval_x(&symbolic, point), finite_difference(function, point), 1e-4);
        }
    }

    #[test]
    fn power_rule() {
        let f = x().pow(2) + x() + Expr::one();
        assert_eq!(derivative(&f, "x").unwrap(), Expr::number(2) * x() + Expr::one());
        test_for_function(&f, [0., 1., 2., 5., 8.]);
    }

    #[test]
    fn product_and_chain_rules() {
        let f = x() * Expr::sin(x().pow(2)) + Expr::cos(Expr::number(3) * x());
        test_for_function(&f, [-1.5, 0., 0.3, 2.]);
    }

    #[test]
    fn quotient_and_roots() {
        let f = Expr::sqrt(&(x().pow(2) + Expr::one())) / (x() + Expr::number(4));
        test_for_function(&f, [-1., 0.5, 3.]);
    }

    #[test]
    fn variable_exponent() {
        let f = Expr::number(2).pow(x()) + Expr::exp(Expr::tan(x()));
        test_for_function(&f, [-0.5, 0.1, 1.]);
    }

    #[test]
    fn partial_derivative() {
        let (x, y) = (x(), Expr::symbol("y"));
        let f = &x * &y + Expr::sin(y.clone());
        assert_eq!(derivative(&f, "x").unwrap(), y);
        assert_eq!(derivative(&f, "z").unwrap(), Expr::zero());
    }

    #[test]
    fn atoms_are_undifferentiable() {
        let f = Expr::atom(0) * x();
        assert_eq!(
            derivative(&f, "x"),
            Err(SymbolicDerivativeError::Undifferentiable(Expr::atom(0))),
        );
    }

    #[test]
    fn unsupported_function() {
        let f = Expr::call("gamma", [x()]);
        assert_eq!(derivative(&f, "x"), Err(SymbolicDerivativeError::Unsupported("gamma".to_string())));
        assert_eq!(derivative(&f, "y"), Ok(Expr::zero()));
    }
}
