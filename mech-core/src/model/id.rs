//! Typed handles to the nodes of a [`Model`](crate::Model).
//!
//! A handle is a plain slot index into one of the model's arenas. Handles stay valid until the
//! node is removed; after that, every operation given the handle fails with
//! [`StaleHandle`](crate::error::model::StaleHandle).

/// Common interface of the typed handles.
pub trait Handle: Copy + Eq + std::fmt::Debug {
    /// Creates the handle to the given slot.
    fn from_index(index: usize) -> Self;

    /// The slot this handle points to.
    fn index(self) -> usize;
}

macro_rules! handle {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl Handle for $name {
            fn from_index(index: usize) -> Self {
                Self(index)
            }

            fn index(self) -> usize {
                self.0
            }
        }
    };
}

handle!(
    /// Handle to a [`Base`](super::Base).
    BaseId
);
handle!(
    /// Handle to a [`Point`](super::Point).
    PointId
);
handle!(
    /// Handle to a [`Frame`](super::Frame).
    FrameId
);
handle!(
    /// Handle to a [`Solid`](super::Solid).
    SolidId
);
handle!(
    /// Handle to a registered [`Wrench`](crate::Wrench).
    WrenchId
);
