#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The direction gravity acts in, along the `z` axis of the absolute base `xyz`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Gravity {
    /// Gravity pulls towards `-z`: the gravity force on a solid of mass `m` is `-m g z`.
    #[default]
    Down,

    /// Gravity pulls towards `+z`: the gravity force on a solid of mass `m` is `m g z`.
    Up,
}

impl Gravity {
    /// The sign of the `z` component of the gravity force.
    pub fn sign(self) -> i32 {
        match self {
            Gravity::Down => -1,
            Gravity::Up => 1,
        }
    }
}

/// Options a [`Model`](crate::Model) is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    /// The direction of gravity, used by [`Model::gravity_wrench`](crate::Model::gravity_wrench).
    ///
    /// The default value is [`Gravity::Down`].
    pub gravity: Gravity,

    /// Whether the atom tables created by [`Model::atom_table`](crate::Model::atom_table) replace
    /// subexpressions with atoms. When `false`, atomizing returns its input unchanged, which is
    /// useful to compare atomized and plain output.
    ///
    /// The default value is `true`.
    pub atomization: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity: Gravity::Down,
            atomization: true,
        }
    }
}

impl Settings {
    /// Sets the direction of gravity.
    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Enables or disables atomization.
    pub fn atomization(mut self, atomization: bool) -> Self {
        self.atomization = atomization;
        self
    }
}
