//! Implementation of the simplification rules.
//!
//! Each rule in this module is a function that takes the expression to simplify as an argument,
//! and returns `Some(expr)` with the simplified expression if the rule applies, or `None` if the
//! rule does not apply. A rule that returns `Some` must return an expression different from its
//! input.

pub mod distribute;
pub mod trigonometry;

use crate::step_collector::StepCollector;
use super::{Expr, step::Step};

/// Applies all rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    distribute::all(expr, step_collector)
        .or_else(|| trigonometry::all(expr, step_collector))
}
