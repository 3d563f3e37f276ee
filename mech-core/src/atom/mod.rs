//! Atomization: common subexpression elimination over symbolic results.
//!
//! An [`AtomTable`] replaces every non-trivial subexpression of the values given to
//! [`AtomTable::atomize`] with a placeholder atom `atomN`, recording the atom's definition in
//! terms of earlier atoms. Because [`Expr`] is kept in canonical form, subexpressions that only
//! differ by the order of commutative operands are the same subexpression, and get the same atom.
//! The table is shared by every value atomized with it, so subexpressions are shared across
//! equations.
//!
//! # Reference counts
//!
//! The reference count of an atom is the number of times [`AtomTable::atomize`] has met its
//! subexpression. A new atom starts at 1 and every later hit adds 1, so a subexpression used
//! twice in one equation, or atomized again with another equation, counts every use.
//!
//! [`AtomTable::release`] undoes one atomize call: it takes 1 off each atom once for every
//! occurrence in the released value and in the definitions those occurrences expand to. Atoms
//! are never removed implicitly: see [`AtomTable::remove`], [`AtomTable::remove_dead`] and
//! [`AtomTable::dead_constants`].
//!
//! # Example
//!
//! ```
//! use mech_algebra::Expr;
//! use mech_core::AtomTable;
//!
//! let (a, b) = (Expr::symbol("a"), Expr::symbol("b"));
//! let expr = (&a + &b).pow(2) + Expr::sin(&a + &b);
//!
//! let mut table = AtomTable::new();
//! let atomized = table.atomize(&expr);
//! assert_eq!(table.len(), 4);
//! assert_eq!(table.unatomize(&atomized).unwrap(), expr);
//!
//! for id in table.collect_atoms(&atomized).unwrap() {
//!     let atom = table.get(id).unwrap();
//!     println!("{} = {}", atom.symbol(), atom.expression());
//! }
//! ```

mod atomize;
mod step;

pub use atomize::Atomize;
pub use step::AtomStep;

use crate::{
    error::{
        atomization::{AtomInUse, DependencyCycle, UnknownAtom},
        Error,
    },
    model::Model,
    symbols::SymbolKind,
};
use mech_algebra::{Expr, Primary, StepCollector};
use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::Arc,
};

/// Identifies an atom. Its index is the atom's creation order and the number in its placeholder
/// symbol `atomN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(u32);

impl AtomId {
    /// The index of the atom.
    pub fn index(self) -> u32 {
        self.0
    }

    /// The placeholder symbol of the atom.
    pub fn symbol(self) -> Expr {
        Expr::atom(self.0)
    }
}

impl From<u32> for AtomId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "atom{}", self.0)
    }
}

/// A subexpression tabulated by an [`AtomTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    index: u32,
    expression: Expr,
    reference_count: usize,
    dependencies: Vec<AtomId>,
    is_constant: bool,
}

impl Atom {
    /// The index of the atom, its creation order.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The handle of the atom.
    pub fn id(&self) -> AtomId {
        AtomId(self.index)
    }

    /// The placeholder symbol standing for the atom, `atomN`.
    pub fn symbol(&self) -> Expr {
        Expr::atom(self.index)
    }

    /// The definition of the atom, in terms of earlier atoms.
    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    /// The number of times the subexpression of the atom has been atomized and not released.
    pub fn reference_count(&self) -> usize {
        self.reference_count
    }

    /// The atoms appearing in the definition, in order of first appearance.
    pub fn dependencies(&self) -> &[AtomId] {
        &self.dependencies
    }

    /// True if the definition contains no time-varying symbol, directly or through its
    /// dependencies.
    pub fn is_constant(&self) -> bool {
        self.is_constant
    }
}

/// Visit state of an atom during a depth-first walk of the dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// A table of atoms. See the [module-level documentation](self).
#[derive(Debug, Clone)]
pub struct AtomTable {
    atoms: Vec<Option<Atom>>,
    lookup: HashMap<Expr, u32>,
    excluded: HashSet<Arc<str>>,
    time_varying: HashSet<Arc<str>>,
    enabled: bool,
}

impl Default for AtomTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            atoms: Vec::new(),
            lookup: HashMap::new(),
            excluded: HashSet::new(),
            time_varying: HashSet::new(),
            enabled: true,
        }
    }

    /// Creates a table whose [`AtomTable::atomize`] returns its input unchanged.
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::new() }
    }

    /// Returns true if atomizing creates atoms.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the symbols that change over time, which decide whether new atoms are constant.
    pub fn set_time_varying<S: Into<Arc<str>>>(&mut self, symbols: impl IntoIterator<Item = S>) {
        self.time_varying = symbols.into_iter().map(Into::into).collect();
    }

    /// Removes every atom. The exclusion list and the time-varying symbols are kept, and indices
    /// start again from zero.
    pub fn clear(&mut self) {
        self.atoms.clear();
        self.lookup.clear();
    }

    /// Removes every atom and empties the exclusion list, for a new derivation session.
    pub fn reset(&mut self) {
        self.clear();
        self.excluded.clear();
    }

    /// Adds a symbol to the exclusion list: no atom will ever contain it.
    pub fn exclude(&mut self, symbol: &str) {
        self.excluded.insert(Arc::from(symbol));
    }

    /// Returns true if the symbol is in the exclusion list.
    pub fn is_excluded(&self, symbol: &str) -> bool {
        self.excluded.contains(symbol)
    }

    /// Returns the live atom with the given handle.
    pub fn get(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn live(&self, index: u32) -> Result<&Atom, Error> {
        self.get(AtomId(index)).ok_or_else(|| UnknownAtom { atom: index }.into())
    }

    fn live_mut(&mut self, index: u32) -> Option<&mut Atom> {
        self.atoms.get_mut(index as usize).and_then(Option::as_mut)
    }

    /// Iterates over the live atoms in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.atoms.iter().flatten()
    }

    /// The number of live atoms.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if there are no live atoms.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the subexpressions of every expression in `value` with atoms.
    pub fn atomize<T: Atomize>(&mut self, value: &T) -> T {
        self.atomize_inner(value, &mut ())
    }

    /// Like [`AtomTable::atomize`], also returning every atom created or reused, in order.
    pub fn atomize_with_steps<T: Atomize>(&mut self, value: &T) -> (T, Vec<AtomStep>) {
        let mut steps = Vec::new();
        let value = self.atomize_inner(value, &mut steps);
        (value, steps)
    }

    fn atomize_inner<T: Atomize>(&mut self, value: &T, steps: &mut dyn StepCollector<AtomStep>) -> T {
        if !self.enabled {
            return value.clone();
        }
        let result = value.try_map_exprs(&mut |expr| {
            Ok::<_, std::convert::Infallible>(self.atomize_node(expr, steps).0)
        });
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Atomizes one node bottom-up. Also returns whether the node contains an excluded symbol.
    fn atomize_node(&mut self, expr: &Expr, steps: &mut dyn StepCollector<AtomStep>) -> (Expr, bool) {
        match expr {
            Expr::Primary(Primary::Symbol(name)) => (expr.clone(), self.excluded.contains(name)),
            Expr::Primary(Primary::Number(_)) => (expr.clone(), false),
            Expr::Primary(Primary::Atom(_)) => {
                // an atom given back to the table is one more use of everything it stands for
                if let Ok(occurrences) = self.occurrences(expr) {
                    self.adjust_counts(&occurrences, 1, true);
                }
                (expr.clone(), false)
            },
            _ => {
                let mut excluded = false;
                let rebuilt = expr.rebuild_with(|child| {
                    let (child, child_excluded) = self.atomize_node(child, steps);
                    excluded |= child_excluded;
                    child
                });
                if excluded {
                    (rebuilt, true)
                } else {
                    (self.intern(rebuilt, steps), false)
                }
            },
        }
    }

    /// Returns the atom standing for `expr`, creating it if needed.
    fn intern(&mut self, expr: Expr, steps: &mut dyn StepCollector<AtomStep>) -> Expr {
        if let Some(&index) = self.lookup.get(&expr) {
            if let Some(atom) = self.live_mut(index) {
                atom.reference_count += 1;
                steps.push(AtomStep::Reused(AtomId(index)));
                return Expr::atom(index);
            }
        }

        let index = self.atoms.len() as u32;
        let dependencies = expr.atoms().into_iter().map(AtomId).collect::<Vec<_>>();
        let is_constant = self.is_constant_definition(&expr, &dependencies);
        self.lookup.insert(expr.clone(), index);
        self.atoms.push(Some(Atom {
            index,
            expression: expr,
            reference_count: 1,
            dependencies,
            is_constant,
        }));
        steps.push(AtomStep::Created(AtomId(index)));
        Expr::atom(index)
    }

    fn is_constant_definition(&self, expr: &Expr, dependencies: &[AtomId]) -> bool {
        expr.symbols().iter().all(|symbol| !self.time_varying.contains(symbol))
            && dependencies.iter().all(|dep| self.get(*dep).map_or(true, Atom::is_constant))
    }

    /// Replaces every atom in `value` with its definition, recursively, until no atom is left.
    /// This is the exact inverse of [`AtomTable::atomize`].
    ///
    /// Fails if an atom is not in the table, or if the definitions form a cycle.
    pub fn unatomize<T: Atomize>(&self, value: &T) -> Result<T, Error> {
        let mut memo = HashMap::new();
        let mut visiting = HashSet::new();
        value.try_map_exprs(&mut |expr| self.unatomize_expr(expr, &mut memo, &mut visiting))
    }

    fn unatomize_expr(
        &self,
        expr: &Expr,
        memo: &mut HashMap<u32, Expr>,
        visiting: &mut HashSet<u32>,
    ) -> Result<Expr, Error> {
        match expr {
            Expr::Primary(Primary::Atom(index)) => {
                if let Some(done) = memo.get(index) {
                    return Ok(done.clone());
                }
                let atom = self.live(*index)?;
                if !visiting.insert(*index) {
                    return Err(DependencyCycle { atom: *index }.into());
                }
                let expanded = self.unatomize_expr(&atom.expression, memo, visiting)?;
                visiting.remove(index);
                memo.insert(*index, expanded.clone());
                Ok(expanded)
            },
            _ if expr.is_leaf() => Ok(expr.clone()),
            _ => expr.try_rebuild_with(|child| self.unatomize_expr(child, memo, visiting)),
        }
    }

    /// Returns every atom `value` depends on, directly or through other atoms, ordered so that an
    /// atom always comes after the atoms it depends on.
    ///
    /// This is the order in which the atoms must be computed to evaluate `value`.
    pub fn collect_atoms<T: Atomize>(&self, value: &T) -> Result<Vec<AtomId>, Error> {
        let mut marks = HashMap::new();
        let mut order = Vec::new();
        for expr in value.exprs() {
            for index in expr.atoms() {
                self.visit(index, &mut marks, &mut order)?;
            }
        }
        Ok(order)
    }

    fn visit(&self, index: u32, marks: &mut HashMap<u32, Mark>, order: &mut Vec<AtomId>) -> Result<(), Error> {
        match marks.get(&index) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => return Err(DependencyCycle { atom: index }.into()),
            None => (),
        }

        let atom = self.live(index)?;
        marks.insert(index, Mark::InProgress);
        for dependency in &atom.dependencies {
            self.visit(dependency.0, marks, order)?;
        }
        marks.insert(index, Mark::Done);
        order.push(AtomId(index));
        Ok(())
    }

    /// Every atom occurrence in `expr` and, recursively, in the definitions of those atoms. This
    /// is one entry per hit the atomization of the expanded expression made.
    fn occurrences(&self, expr: &Expr) -> Result<Vec<u32>, Error> {
        let mut out = Vec::new();
        self.collect_occurrences(expr, &mut Vec::new(), &mut out)?;
        Ok(out)
    }

    fn collect_occurrences(&self, expr: &Expr, path: &mut Vec<u32>, out: &mut Vec<u32>) -> Result<(), Error> {
        for index in expr.post_order_iter().filter_map(Expr::as_atom) {
            let atom = self.live(index)?;
            if path.contains(&index) {
                return Err(DependencyCycle { atom: index }.into());
            }
            out.push(index);
            path.push(index);
            self.collect_occurrences(&atom.expression, path, out)?;
            path.pop();
        }
        Ok(())
    }

    /// Adds or takes `amount` off the count of every listed atom, once per entry.
    fn adjust_counts(&mut self, occurrences: &[u32], amount: usize, increment: bool) {
        for index in occurrences {
            if let Some(atom) = self.live_mut(*index) {
                atom.reference_count = if increment {
                    atom.reference_count + amount
                } else {
                    atom.reference_count.saturating_sub(amount)
                };
            }
        }
    }

    /// Undoes the counting done by the [`AtomTable::atomize`] call that returned `value`, once
    /// `value` is no longer used. Every atom loses 1 per occurrence in `value` or in the
    /// definitions those occurrences expand to. No atom is removed.
    ///
    /// Fails without changing any count if `value` refers to an atom that is not in the table, or
    /// if the definitions form a cycle.
    pub fn release<T: Atomize>(&mut self, value: &T) -> Result<(), Error> {
        let mut pending = Vec::new();
        for expr in value.exprs() {
            pending.extend(self.occurrences(expr)?);
        }
        self.adjust_counts(&pending, 1, false);
        Ok(())
    }

    fn first_dependant(&self, id: AtomId) -> Option<AtomId> {
        self.iter()
            .find(|atom| atom.index != id.0 && atom.dependencies.contains(&id))
            .map(Atom::id)
    }

    /// Removes an atom from the table, whatever its reference count.
    ///
    /// Fails if the atom is not in the table, or if the definition of another atom refers to it.
    pub fn remove(&mut self, id: AtomId) -> Result<Atom, Error> {
        self.live(id.0)?;
        if let Some(dependant) = self.first_dependant(id) {
            return Err(AtomInUse { atom: id.0, dependant: dependant.0 }.into());
        }

        let atom = self.atoms[id.0 as usize].take().ok_or(UnknownAtom { atom: id.0 })?;
        if self.lookup.get(&atom.expression) == Some(&id.0) {
            self.lookup.remove(&atom.expression);
        }
        Ok(atom)
    }

    /// Removes every atom with no references, including atoms whose last references were held by
    /// the removed atoms. Returns the removed atoms in creation order.
    pub fn remove_dead(&mut self) -> Vec<AtomId> {
        let mut removed = Vec::new();
        loop {
            let dead = self.iter()
                .filter(|atom| atom.reference_count == 0)
                .map(Atom::id)
                .filter(|id| self.first_dependant(*id).is_none())
                .collect::<Vec<_>>();
            if dead.is_empty() {
                break;
            }
            for id in dead {
                if self.remove(id).is_ok() {
                    removed.push(id);
                }
            }
        }
        removed.sort_unstable();
        removed
    }

    /// The atoms with no references whose definition is constant: the candidates a constant
    /// folding pass can evaluate once and drop.
    pub fn dead_constants(&self) -> Vec<AtomId> {
        self.iter()
            .filter(|atom| atom.reference_count == 0 && atom.is_constant)
            .map(Atom::id)
            .collect()
    }

    /// Replaces the definition of an atom, for example with a simplified equivalent.
    ///
    /// The uses counted by the atom move from the atoms of the old definition to those of the new
    /// one, so that [`AtomTable::release`] stays balanced. Nothing prevents the new definition
    /// from referring to the atom itself or to later atoms; such cycles are reported by
    /// [`AtomTable::unatomize`] and [`AtomTable::collect_atoms`].
    pub fn redefine(&mut self, id: AtomId, expression: Expr) -> Result<(), Error> {
        let current = self.live(id.0)?;
        let uses = current.reference_count;
        let old_occurrences = self.occurrences(&current.expression)?;
        let new_occurrences = self.occurrences(&expression)?;

        let dependencies = expression.atoms().into_iter().map(AtomId).collect::<Vec<_>>();
        let is_constant = self.is_constant_definition(&expression, &dependencies);
        let Some(atom) = self.live_mut(id.0) else {
            return Err(UnknownAtom { atom: id.0 }.into());
        };
        let old = std::mem::replace(&mut atom.expression, expression.clone());
        atom.dependencies = dependencies;
        atom.is_constant = is_constant;

        if self.lookup.get(&old) == Some(&id.0) {
            self.lookup.remove(&old);
        }
        self.lookup.entry(expression).or_insert(id.0);
        self.adjust_counts(&new_occurrences, uses, true);
        self.adjust_counts(&old_occurrences, uses, false);
        Ok(())
    }
}

impl Model {
    /// Creates an atom table for this model: enabled according to
    /// [`Settings::atomization`](crate::Settings::atomization), and knowing which registered
    /// symbols change over time.
    pub fn atom_table(&self) -> AtomTable {
        let mut table = if self.settings().atomization {
            AtomTable::new()
        } else {
            AtomTable::disabled()
        };
        table.set_time_varying(self.symbols().time_varying().cloned());
        table
    }

    fn exclude_kind(&self, table: &mut AtomTable, kinds: &[SymbolKind]) {
        for kind in kinds {
            for name in self.symbols().of_kind(*kind) {
                table.exclude(&name);
            }
        }
    }

    /// Keeps the coordinates (and auxiliary coordinates) out of every atom.
    pub fn exclude_coordinates(&self, table: &mut AtomTable) {
        self.exclude_kind(table, &[SymbolKind::Coordinate, SymbolKind::AuxCoordinate]);
    }

    /// Keeps the velocities (and auxiliary velocities) out of every atom.
    pub fn exclude_velocities(&self, table: &mut AtomTable) {
        self.exclude_kind(table, &[SymbolKind::Velocity, SymbolKind::AuxVelocity]);
    }

    /// Keeps the accelerations (and auxiliary accelerations) out of every atom.
    pub fn exclude_accelerations(&self, table: &mut AtomTable) {
        self.exclude_kind(table, &[SymbolKind::Acceleration, SymbolKind::AuxAcceleration]);
    }

    /// Keeps the joint unknowns out of every atom.
    pub fn exclude_joint_unknowns(&self, table: &mut AtomTable) {
        self.exclude_kind(table, &[SymbolKind::JointUnknown]);
    }

    /// Keeps the inputs out of every atom.
    pub fn exclude_inputs(&self, table: &mut AtomTable) {
        self.exclude_kind(table, &[SymbolKind::Input]);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> Expr {
        Expr::symbol(name)
    }

    fn square_plus_sine() -> Expr {
        let (a, b) = (sym("a"), sym("b"));
        (&a + &b) * (&a + &b) + Expr::sin(&a + &b)
    }

    #[test]
    fn round_trip() {
        let mut table = AtomTable::new();
        let exprs = vec![
            square_plus_sine(),
            sym("x") * Expr::cos(sym("y") - sym("x")).pow(3) / (sym("z") + Expr::number(2)),
            Expr::number(7),
            sym("q"),
        ];
        let atomized = table.atomize(&exprs);
        assert_eq!(table.unatomize(&atomized).unwrap(), exprs);
    }

    #[test]
    fn shared_subexpression_gets_one_atom() {
        let expr = square_plus_sine();
        let a_plus_b = sym("a") + sym("b");
        let mut table = AtomTable::new();

        // `a + b` is met twice per call: inside `(a + b)^2` and inside `sin(a + b)`
        let first = table.atomize(&expr);
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(AtomId(0)).unwrap().reference_count(), 2);

        let second = table.atomize(&expr);
        assert_eq!(first, second);
        assert_eq!(table.len(), 4);
        let atom = table.get(AtomId(0)).unwrap();
        assert_eq!(atom.expression(), &a_plus_b);
        assert_eq!(atom.reference_count(), 4);

        let counts = table.iter().map(Atom::reference_count).collect::<Vec<_>>();
        assert_eq!(counts, vec![4, 2, 2, 2]);
        let top = table.get(AtomId(3)).unwrap();
        assert_eq!(first, top.symbol());
        assert_eq!(top.reference_count(), 2);

        let order = table.collect_atoms(&first).unwrap();
        assert_eq!(order, vec![AtomId(0), AtomId(1), AtomId(2), AtomId(3)]);
    }

    #[test]
    fn steps_report_creation_and_reuse() {
        let mut table = AtomTable::new();
        let (_, steps) = table.atomize_with_steps(&square_plus_sine());
        assert_eq!(steps.iter().filter(|step| matches!(step, AtomStep::Created(_))).count(), 4);
        assert_eq!(steps.iter().filter(|step| matches!(step, AtomStep::Reused(_))).count(), 1);

        // the second time, every node is found again
        let (_, steps) = table.atomize_with_steps(&square_plus_sine());
        assert_eq!(steps.len(), 5);
        assert!(steps.iter().all(|step| matches!(step, AtomStep::Reused(_))));
        assert_eq!(steps.last(), Some(&AtomStep::Reused(AtomId(3))));
    }

    #[test]
    fn excluded_symbols_stay_literal() {
        let (q, l) = (sym("q"), sym("l"));
        let expr = &l * Expr::cos(q.clone()) + (&l + Expr::number(1)).pow(2);
        let mut table = AtomTable::new();
        table.exclude("q");
        let atomized = table.atomize(&expr);

        assert!(atomized.contains_symbol("q"));
        for atom in table.iter() {
            assert!(!atom.expression().contains_symbol("q"));
        }
        assert_eq!(table.unatomize(&atomized).unwrap(), expr);
    }

    #[test]
    fn disabled_table_is_the_identity() {
        let mut table = AtomTable::disabled();
        let expr = square_plus_sine();
        assert_eq!(table.atomize(&expr), expr);
        assert!(table.is_empty());
    }

    #[test]
    fn constancy() {
        let mut table = AtomTable::new();
        table.set_time_varying(["q"]);
        let atomized = table.atomize(&(Expr::sin(sym("q")) * (sym("l") + sym("m"))));
        let order = table.collect_atoms(&atomized).unwrap();
        let constant = order.iter()
            .map(|id| table.get(*id).unwrap())
            .map(|atom| (atom.expression().clone(), atom.is_constant()))
            .collect::<Vec<_>>();
        assert!(constant.contains(&(sym("l") + sym("m"), true)));
        assert!(constant.contains(&(Expr::sin(sym("q")), false)));
        assert!(!table.get(*order.last().unwrap()).unwrap().is_constant());
    }

    #[test]
    fn release_undoes_one_call_and_remove_dead() {
        let mut table = AtomTable::new();
        let expr = square_plus_sine();
        let first = table.atomize(&expr);
        let second = table.atomize(&expr);

        table.release(&first).unwrap();
        let counts = table.iter().map(Atom::reference_count).collect::<Vec<_>>();
        assert_eq!(counts, vec![2, 1, 1, 1]);
        assert!(table.remove_dead().is_empty());

        table.release(&second).unwrap();
        assert!(table.iter().all(|atom| atom.reference_count() == 0));
        assert_eq!(table.dead_constants().len(), 4);
        assert_eq!(table.remove_dead(), vec![AtomId(0), AtomId(1), AtomId(2), AtomId(3)]);
        assert!(table.is_empty());
    }

    #[test]
    fn atoms_given_back_count_their_whole_expansion() {
        let mut table = AtomTable::new();
        let atomized = table.atomize(&square_plus_sine());
        let again = table.atomize(&atomized);
        assert_eq!(again, atomized);

        let counts = table.iter().map(Atom::reference_count).collect::<Vec<_>>();
        assert_eq!(counts, vec![4, 2, 2, 2]);

        table.release(&atomized).unwrap();
        table.release(&again).unwrap();
        assert!(table.iter().all(|atom| atom.reference_count() == 0));
    }

    #[test]
    fn redefinition_moves_the_uses() {
        let mut table = AtomTable::new();
        let sine = Expr::sin(sym("a") + sym("b"));
        let first = table.atomize(&sine);
        let second = table.atomize(&sine);
        let product = table.atomize(&(sym("c") * sym("d")));
        assert_eq!(product, Expr::atom(2));

        // atom1 = sin(atom0) becomes sin(atom2), and its two uses go with it
        table.redefine(AtomId(1), Expr::sin(Expr::atom(2))).unwrap();
        let counts = table.iter().map(Atom::reference_count).collect::<Vec<_>>();
        assert_eq!(counts, vec![0, 2, 3]);
        assert_eq!(table.unatomize(&first).unwrap(), Expr::sin(sym("c") * sym("d")));

        for value in [&first, &second, &product] {
            table.release(value).unwrap();
        }
        assert!(table.iter().all(|atom| atom.reference_count() == 0));
        assert_eq!(table.remove_dead(), vec![AtomId(0), AtomId(1), AtomId(2)]);
    }

    #[test]
    fn remove_checks_dependants() {
        let mut table = AtomTable::new();
        let atomized = table.atomize(&square_plus_sine());
        let err = table.remove(AtomId(0)).unwrap_err();
        assert!(err.is::<AtomInUse>());

        // removing the top atom leaves its dependencies in place
        table.remove(AtomId(3)).unwrap();
        assert!(table.unatomize(&atomized).unwrap_err().is::<UnknownAtom>());
        assert!(table.release(&atomized).unwrap_err().is::<UnknownAtom>());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn redefinition_cycle_is_detected() {
        let mut table = AtomTable::new();
        let atomized = table.atomize(&square_plus_sine());
        table.redefine(AtomId(0), Expr::atom(3) + sym("a")).unwrap();
        assert!(table.collect_atoms(&atomized).unwrap_err().is::<DependencyCycle>());
        assert!(table.unatomize(&atomized).unwrap_err().is::<DependencyCycle>());
        assert!(table.redefine(AtomId(0), Expr::atom(99)).unwrap_err().is::<UnknownAtom>());
    }

    #[test]
    fn clear_and_reset() {
        let mut table = AtomTable::new();
        table.exclude("q");
        table.atomize(&square_plus_sine());
        table.clear();
        assert!(table.is_empty());
        assert!(table.is_excluded("q"));
        assert_eq!(table.atomize(&(sym("a") + sym("b"))), Expr::atom(0));

        table.reset();
        assert!(table.is_empty());
        assert!(!table.is_excluded("q"));
    }
}
