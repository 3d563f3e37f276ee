//! Simplification rules for trigonometric functions.

use crate::{
    expr::{Expr, Primary},
    simplify::step::Step,
    step_collector::StepCollector,
};
use std::iter::once;

/// For every factor of `term` of the form `func(u)^2`, returns `u` and the remaining factors.
fn squares<'a>(term: &'a Expr, func: &'a str) -> impl Iterator<Item = (Expr, Vec<Expr>)> + 'a {
    let factors = match term {
        Expr::Mul(factors) => &factors[..],
        other => std::slice::from_ref(other),
    };

    factors.iter().enumerate().filter_map(move |(index, factor)| {
        let Expr::Exp(base, exp) = factor else {
            return None;
        };
        if !exp.as_number().is_some_and(|n| *n == 2) {
            return None;
        }
        match &**base {
            Expr::Primary(Primary::Call(name, args)) if &**name == func && args.len() == 1 => {
                let others = factors.iter()
                    .enumerate()
                    .filter(|(other, _)| *other != index)
                    .map(|(_, factor)| factor.clone())
                    .collect();
                Some((args[0].clone(), others))
            },
            _ => None,
        }
    })
}

/// `a*sin(x)^2 + a*cos(x)^2 = a`
pub fn pythagorean(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let Expr::Add(terms) = expr else {
        return None;
    };

    let candidates = terms.iter()
        .enumerate()
        .flat_map(|(i, term)| squares(term, "sin").map(move |square| (i, square)));
    for (i, (arg, others)) in candidates {
        let partner = Expr::product(others.iter().cloned().chain(once(Expr::cos(arg).pow(2))));
        let Some(j) = terms.iter().position(|other| *other == partner) else {
            continue;
        };

        let reduced = Expr::product(others);
        let remaining = terms.iter()
            .enumerate()
            .filter(|(k, _)| *k != i && *k != j)
            .map(|(_, term)| term.clone());

        step_collector.push(Step::Pythagorean);
        return Some(Expr::sum(remaining.chain(once(reduced))));
    }

    None
}

/// Applies all trigonometric rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    pythagorean(expr, step_collector)
}
