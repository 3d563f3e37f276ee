use super::AtomId;

/// What happened to a subexpression while atomizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomStep {
    /// The subexpression was seen for the first time; a new atom was created.
    Created(AtomId),

    /// The subexpression already had an atom, whose reference count was incremented.
    Reused(AtomId),
}
