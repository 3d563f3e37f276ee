use rug::Rational;
use std::fmt::{Display, Formatter, Result};
use super::{Expr, Primary};

impl Display for Primary {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Number(num) => {
                if *num.denom() == 1 {
                    write!(f, "{}", num.numer())
                } else {
                    write!(f, "{}/{}", num.numer(), num.denom())
                }
            },
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Atom(index) => write!(f, "atom{}", index),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

/// Binding strength used to decide where parentheses are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Add,
    Mul,
    Exp,
    Primary,
}

impl Expr {
    fn precedence(&self) -> Precedence {
        match self {
            Self::Primary(Primary::Number(n)) if *n < 0 || *n.denom() != 1 => Precedence::Add,
            Self::Primary(_) => Precedence::Primary,
            Self::Add(_) => Precedence::Add,
            Self::Mul(_) => Precedence::Mul,
            Self::Exp(..) => Precedence::Exp,
        }
    }
}

/// Writes `expr`, wrapped in parentheses if it binds weaker than `outer`.
fn write_operand(f: &mut Formatter<'_>, expr: &Expr, outer: Precedence) -> Result {
    if expr.precedence() <= outer {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

/// Writes a product given as a coefficient and the remaining factors.
fn write_product(f: &mut Formatter<'_>, coeff: &Rational, rest: &Expr) -> Result {
    if rest.is_one() {
        return write!(f, "{}", Primary::Number(coeff.clone()));
    }
    if *coeff == -1 {
        write!(f, "-")?;
    } else if *coeff != 1 {
        write_operand(f, &Expr::from(coeff.clone()), Precedence::Mul)?;
        write!(f, "*")?;
    }
    match rest {
        Expr::Mul(factors) => {
            let mut iter = factors.iter();
            if let Some(factor) = iter.next() {
                write_operand(f, factor, Precedence::Mul)?;
                for factor in iter {
                    write!(f, "*")?;
                    write_operand(f, factor, Precedence::Mul)?;
                }
            }
            Ok(())
        },
        other => write_operand(f, other, Precedence::Mul),
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    let (coeff, rest) = term.split_coefficient();
                    if i == 0 {
                        write_product(f, &coeff, &rest)?;
                    } else if coeff < 0 {
                        write!(f, " - ")?;
                        write_product(f, &Rational::from(-coeff), &rest)?;
                    } else {
                        write!(f, " + ")?;
                        write_product(f, &coeff, &rest)?;
                    }
                }
                Ok(())
            },
            Self::Mul(_) => {
                let (coeff, rest) = self.split_coefficient();
                write_product(f, &coeff, &rest)
            },
            Self::Exp(base, exp) => {
                write_operand(f, base, Precedence::Exp)?;
                write!(f, "^")?;
                write_operand(f, exp, Precedence::Exp)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn display() {
        let (a, b) = (Expr::symbol("a"), Expr::symbol("b"));
        assert_eq!((&a - Expr::number(2) * &b).to_string(), "a - 2*b");
        assert_eq!((&a + &b).pow(2).to_string(), "(a + b)^2");
        assert_eq!((-Expr::sin(a.clone()) * &b).to_string(), "-b*sin(a)");
        assert_eq!((Expr::ratio(1, 2) * &a).to_string(), "(1/2)*a");
        assert_eq!((Expr::atom(3) + Expr::number(1)).to_string(), "1 + atom3");
    }
}
