//! Module to simplify expressions.
//!
//! Canonical form already takes care of combining like terms and factors, so the rules in this
//! module are the ones that canonical form deliberately does not apply: distributing products
//! over sums, and trigonometric identities that only become visible after distribution.
//!
//! The rules are applied repeatedly, children first, until no more rules apply. Because
//! distribution can make an expression larger without enabling anything else, the result is only
//! kept if it is not more complex than the input, as measured by [`default_complexity`] or by the
//! function given to [`simplify_with`].

pub mod rules;
pub mod step;

use crate::{expr::{Expr, Primary}, step_collector::StepCollector};
use step::Step;

/// The default complexity heuristic function.
///
/// This function computes complexity using these simple rules:
///
/// - `complexity(number) = complexity(symbol) = complexity(atom) = 1`
/// - `complexity(call) = 1 + sum(complexity(args))`
/// - `complexity(add) = 3 + sum(complexity(terms))`
/// - `complexity(mul) = 2 + sum(complexity(factors))`
/// - `complexity(exp) = 1 + complexity(lhs) + complexity(rhs)`
pub fn default_complexity(expr: &Expr) -> usize {
    expr.post_order_iter()
        .map(|expr| match expr {
            Expr::Primary(_) => 1,
            Expr::Add(_) => 3,
            Expr::Mul(_) => 2,
            Expr::Exp(..) => 1,
        })
        .sum()
}

/// Base implementation of the simplification algorithm.
fn inner_simplify(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> (Expr, bool) {
    let mut expr = expr.clone();
    let mut changed_at_least_once = false;

    loop {
        let mut changed_in_this_pass = false;

        // begin with the expression's children, so the rules see simplified operands
        let mut simplify_child = |child: &Expr| {
            let (child, changed) = inner_simplify(child, step_collector);
            changed_in_this_pass |= changed;
            child
        };
        let rebuilt = match &expr {
            Expr::Primary(Primary::Call(name, args)) => {
                let args = args.iter().map(&mut simplify_child).collect::<Vec<_>>();
                Expr::call(name, args)
            },
            Expr::Primary(_) => expr.clone(),
            Expr::Add(terms) => Expr::sum(terms.iter().map(&mut simplify_child).collect::<Vec<_>>()),
            Expr::Mul(factors) => Expr::product(factors.iter().map(&mut simplify_child).collect::<Vec<_>>()),
            Expr::Exp(lhs, rhs) => {
                let lhs = simplify_child(lhs);
                let rhs = simplify_child(rhs);
                lhs.pow(rhs)
            },
        };
        expr = rebuilt;

        // then try to simplify this expression using all rules
        if let Some(new_expr) = rules::all(&expr, step_collector) {
            expr = new_expr;
            changed_in_this_pass = true;
        }

        if !changed_in_this_pass {
            break;
        }
        changed_at_least_once = true;
    }

    (expr, changed_at_least_once)
}

/// Simplifies with the given heuristic, keeping the input if the result is more complex.
fn simplify_inner_with<F>(
    expr: &Expr,
    complexity: F,
    step_collector: &mut dyn StepCollector<Step>,
) -> Expr
where
    F: Fn(&Expr) -> usize,
{
    let mut steps = Vec::new();
    let (simplified, changed) = inner_simplify(expr, &mut steps);
    if !changed || complexity(&simplified) > complexity(expr) {
        return expr.clone();
    }

    steps.into_iter().for_each(|step| step_collector.push(step));
    simplified
}

/// Simplify the given expression, using the default complexity heuristic function.
pub fn simplify(expr: &Expr) -> Expr {
    simplify_inner_with(expr, default_complexity, &mut ())
}

/// Simplify the given expression, using the given complexity heuristic function.
///
/// The complexity heuristic function should return a number that represents the complexity of the
/// given expression. The lower the number, the simpler the expression.
pub fn simplify_with<F>(expr: &Expr, complexity: F) -> Expr
where
    F: Fn(&Expr) -> usize,
{
    simplify_inner_with(expr, complexity, &mut ())
}

/// Simplify the given expression, using the default complexity heuristic function. The steps taken
/// by the simplifier are also returned, empty if the input was kept.
pub fn simplify_with_steps(expr: &Expr) -> (Expr, Vec<Step>) {
    let mut steps = Vec::new();
    let expr = simplify_inner_with(expr, default_complexity, &mut steps);
    (expr, steps)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> Expr {
        Expr::symbol(name)
    }

    #[test]
    fn pythagorean_identity() {
        let x = sym("x");
        let expr = Expr::sin(x.clone()).pow(2) + Expr::cos(x.clone()).pow(2);
        let (simplified, steps) = simplify_with_steps(&expr);
        assert_eq!(simplified, Expr::one());
        assert_eq!(steps, vec![Step::Pythagorean]);
    }

    #[test]
    fn pythagorean_identity_after_distribution() {
        let (x, l) = (sym("x"), sym("l"));
        let expr = &l * (Expr::sin(x.clone()).pow(2) + Expr::cos(x.clone()).pow(2)) - &l;
        assert_eq!(simplify(&expr), Expr::zero());
    }

    #[test]
    fn composed_rotation_norm() {
        // (c1 c2 - s1 s2)^2 + (c1 s2 + s1 c2)^2 = 1
        let (a, b) = (sym("a"), sym("b"));
        let (c1, s1) = (Expr::cos(a.clone()), Expr::sin(a.clone()));
        let (c2, s2) = (Expr::cos(b.clone()), Expr::sin(b.clone()));
        let first = &c1 * &c2 - &s1 * &s2;
        let second = &c1 * &s2 + &s1 * &c2;
        assert_eq!(simplify(&(first.pow(2) + second.pow(2))), Expr::one());
    }

    #[test]
    fn keeps_simpler_input() {
        let (a, b) = (sym("a"), sym("b"));
        let expr = (&a + &b).pow(2);
        let (simplified, steps) = simplify_with_steps(&expr);
        assert_eq!(simplified, expr);
        assert!(steps.is_empty());
    }

    #[test]
    fn custom_complexity_can_prefer_expansion() {
        let (a, b) = (sym("a"), sym("b"));
        let expr = &a * (&a + &b);
        // a constant heuristic never rejects the expansion
        let expanded = simplify_with(&expr, |_| 0);
        assert_eq!(expanded, a.pow(2) + &a * &b);
    }
}
