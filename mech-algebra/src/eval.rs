//! Numerical evaluation of expressions, mostly used to check symbolic results against numbers.

use crate::expr::{Expr, Primary};
use levenshtein::levenshtein;
use std::{collections::HashMap, f64::consts};

/// A context to use when evaluating an expression, containing the values of the variables and of
/// the atom placeholders that can appear within the expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Ctxt {
    /// The variables in the context.
    vars: HashMap<String, f64>,

    /// The values of atom placeholders.
    atoms: HashMap<u32, f64>,
}

impl Default for Ctxt {
    fn default() -> Self {
        Self {
            vars: HashMap::from([
                ("e".to_string(), consts::E),
                ("pi".to_string(), consts::PI),
                ("tau".to_string(), consts::TAU),
            ]),
            atoms: HashMap::new(),
        }
    }
}

impl Ctxt {
    /// Creates a new empty context.
    ///
    /// Unlike the [`Default`] implementation, the empty context does not define the constants `e`,
    /// `pi` and `tau`.
    pub fn new() -> Ctxt {
        Ctxt {
            vars: HashMap::new(),
            atoms: HashMap::new(),
        }
    }

    /// Add a variable to the context.
    pub fn add_var(&mut self, name: &str, value: f64) {
        self.vars.insert(name.to_string(), value);
    }

    /// Get the value of a variable in the context.
    pub fn get_var(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }

    /// Returns the variables in the context.
    pub fn get_vars(&self) -> &HashMap<String, f64> {
        &self.vars
    }

    /// Gives the atom placeholder with the given index a value.
    pub fn add_atom(&mut self, index: u32, value: f64) {
        self.atoms.insert(index, value);
    }

    /// Get the value of an atom placeholder.
    pub fn get_atom(&self, index: u32) -> Option<f64> {
        self.atoms.get(&index).copied()
    }

    /// Returns the names of variables in the context whose names are similar to the given name.
    pub fn get_similar_vars(&self, name: &str) -> Vec<&str> {
        let mut similar = self.vars.keys()
            .filter(|var| levenshtein(var, name) < 2)
            .map(String::as_str)
            .collect::<Vec<_>>();
        similar.sort_unstable();
        similar
    }
}

/// Reasons an expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A symbol has no value in the context.
    UndefinedVariable {
        /// The name of the symbol.
        name: String,

        /// Names of variables in the context that look like the missing one.
        suggestions: Vec<String>,
    },

    /// A function that the evaluator does not know.
    UnsupportedFunction(String),

    /// An atom placeholder has no value in the context.
    UnresolvedAtom(u32),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedVariable { name, suggestions } => {
                write!(f, "unknown variable `{}`", name)?;
                if !suggestions.is_empty() {
                    write!(f, " (did you mean {}?)", suggestions.iter()
                        .map(|s| format!("`{}`", s))
                        .collect::<Vec<_>>()
                        .join(", "))?;
                }
                Ok(())
            },
            Self::UnsupportedFunction(name) => write!(f, "cannot evaluate the function `{}`", name),
            Self::UnresolvedAtom(index) => write!(f, "`atom{}` has no value", index),
        }
    }
}

impl std::error::Error for EvalError {}

/// Evaluates a known function of one argument.
fn eval_func(name: &str, args: &[f64]) -> Result<f64, EvalError> {
    let [x] = args else {
        return Err(EvalError::UnsupportedFunction(name.to_string()));
    };
    Ok(match name {
        "sin" => x.sin(),
        "cos" => x.cos(),
        "tan" => x.tan(),
        "exp" => x.exp(),
        "ln" => x.ln(),
        "asin" => x.asin(),
        "acos" => x.acos(),
        "atan" => x.atan(),
        "sqrt" => x.sqrt(),
        "abs" => x.abs(),
        _ => return Err(EvalError::UnsupportedFunction(name.to_string())),
    })
}

impl Expr {
    /// Evaluates the expression to a floating point number using the values in the context.
    pub fn eval(&self, ctxt: &Ctxt) -> Result<f64, EvalError> {
        match self {
            Self::Primary(Primary::Number(n)) => Ok(n.to_f64()),
            Self::Primary(Primary::Symbol(name)) => ctxt.get_var(name)
                .ok_or_else(|| EvalError::UndefinedVariable {
                    name: name.to_string(),
                    suggestions: ctxt.get_similar_vars(name)
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                }),
            Self::Primary(Primary::Atom(index)) => ctxt.get_atom(*index)
                .ok_or(EvalError::UnresolvedAtom(*index)),
            Self::Primary(Primary::Call(name, args)) => {
                let args = args.iter()
                    .map(|arg| arg.eval(ctxt))
                    .collect::<Result<Vec<_>, _>>()?;
                eval_func(name, &args)
            },
            Self::Add(terms) => terms.iter().map(|term| term.eval(ctxt)).sum(),
            Self::Mul(factors) => factors.iter().map(|factor| factor.eval(ctxt)).product(),
            Self::Exp(base, exp) => Ok(base.eval(ctxt)?.powf(exp.eval(ctxt)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn evaluates_with_variables_and_atoms() {
        let mut ctxt = Ctxt::default();
        ctxt.add_var("x", 0.5);
        ctxt.add_atom(3, 2.0);
        let expr = Expr::sin(Expr::symbol("pi") * Expr::symbol("x")) * Expr::atom(3) + Expr::ratio(1, 4);
        assert_float_absolute_eq!(expr.eval(&ctxt).unwrap(), 2.25, 1e-12);
    }

    #[test]
    fn undefined_variable_suggests_similar_names() {
        let mut ctxt = Ctxt::new();
        ctxt.add_var("theta1", 1.0);
        ctxt.add_var("theta2", 1.0);
        ctxt.add_var("l", 1.0);
        let err = Expr::symbol("theta3").eval(&ctxt).unwrap_err();
        assert_eq!(err, EvalError::UndefinedVariable {
            name: "theta3".to_string(),
            suggestions: vec!["theta1".to_string(), "theta2".to_string()],
        });
    }

    #[test]
    fn missing_atom() {
        assert_eq!(Expr::atom(7).eval(&Ctxt::new()), Err(EvalError::UnresolvedAtom(7)));
    }
}
