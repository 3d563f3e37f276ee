//! Symbolic derivatives of the known functions, with the chain rule applied.

use crate::expr::Expr;
use super::{derivative, SymbolicDerivativeError};

/// Computes the derivative of a supported function and performs the chain rule.
pub(super) fn function_derivative(func: &str, args: &[Expr], with: &str) -> Result<Expr, SymbolicDerivativeError> {
    let [arg] = args else {
        return Err(SymbolicDerivativeError::Unsupported(func.to_string()));
    };

    let outer = match func {
        "sin" => Expr::cos(arg.clone()),
        "cos" => -Expr::sin(arg.clone()),
        // 1 + tan(u)^2
        "tan" => Expr::one() + Expr::tan(arg.clone()).pow(2),
        "exp" => Expr::exp(arg.clone()),
        "ln" => arg.pow(-1),
        "asin" => (Expr::one() - arg.pow(2)).pow(Expr::ratio(-1, 2)),
        "acos" => -(Expr::one() - arg.pow(2)).pow(Expr::ratio(-1, 2)),
        "atan" => (Expr::one() + arg.pow(2)).pow(-1),
        _ => return Err(SymbolicDerivativeError::Unsupported(func.to_string())),
    };

    let inner = derivative(arg, with)?;
    Ok(outer * inner)
}
