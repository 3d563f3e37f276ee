//! Simplification rules related to the distributive property.

use crate::{
    expr::{distribute, Expr},
    primitive::small_int,
    simplify::step::Step,
    step_collector::StepCollector,
};

/// `a*(b+c) = a*b + a*c`
pub fn distributive_property(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let Expr::Mul(factors) = expr else {
        return None;
    };
    if !factors.iter().any(|factor| matches!(factor, Expr::Add(_))) {
        return None;
    }

    step_collector.push(Step::DistributiveProperty);
    Some(distribute(factors.to_vec()))
}

/// `(a+b)^n = (a+b)*(a+b)*...`, distributed, for integer `n >= 2`
pub fn distribute_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let Expr::Exp(base, exp) = expr else {
        return None;
    };
    if !matches!(&**base, Expr::Add(_)) {
        return None;
    }
    let n = exp.as_number().and_then(small_int).filter(|n| *n >= 2)?;

    step_collector.push(Step::DistributePower);
    Some(distribute(vec![(**base).clone(); n as usize]))
}

/// Applies all distribution rules.
///
/// Distribution may or may not reduce the complexity of the expression, since it can introduce
/// additional operations. However, it may be necessary for other rules to apply.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    distributive_property(expr, step_collector)
        .or_else(|| distribute_power(expr, step_collector))
}
