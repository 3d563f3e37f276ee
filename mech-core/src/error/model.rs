//! Errors caused by the shape of the model graph.

use mech_attrs::ErrorKind;
use mech_error::ErrorKind;
use super::did_you_mean;

/// No node of the given kind has this name.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Model,
    message = format!("there is no {} named `{}`", kind, name),
    help = did_you_mean(kind, suggestions),
)]
pub struct NotFound {
    /// The kind of node that was looked up (`base`, `point`, ...).
    pub kind: &'static str,

    /// The name that was looked up.
    pub name: String,

    /// Names of existing nodes of the same kind that are similar to `name`.
    pub suggestions: Vec<String>,
}

/// Two nodes do not share a root, so no quantity relates them.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Model,
    message = format!("the {}s `{}` and `{}` are not in the same tree", kind, from, to),
    help = "every node must descend from a common root for its relative kinematics to exist",
)]
pub struct DisjointTrees {
    /// The kind of the nodes (`base` or `point`).
    pub kind: &'static str,

    /// The name of the first node.
    pub from: String,

    /// The name of the second node.
    pub to: String,
}

/// A node or symbol with this name already exists.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Model,
    message = format!("a {} named `{}` already exists", kind, name),
    help = "names are unique per kind of node, and symbol names are unique across the model",
)]
pub struct DuplicateName {
    /// The kind of the new node or symbol.
    pub kind: &'static str,

    /// The duplicated name.
    pub name: String,
}

/// A handle refers to a node that has been removed, or that belongs to another model.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Model,
    message = format!("the {} handle #{} does not refer to a live node", kind, index),
)]
pub struct StaleHandle {
    /// The kind of node the handle refers to.
    pub kind: &'static str,

    /// The slot the handle points to.
    pub index: usize,
}

/// A node cannot be removed while another node refers to it.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Model,
    message = format!("cannot remove the {} `{}`, it is used by the {}", kind, name, user),
    help = "remove the nodes that depend on it first",
)]
pub struct InUse {
    /// The kind of the node to remove.
    pub kind: &'static str,

    /// The name of the node to remove.
    pub name: String,

    /// Description of the first node found referring to it, such as "point `P1`".
    pub user: String,
}

/// The absolute base, origin point and absolute frame are never removed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    category = Model,
    message = format!("cannot remove the root {} `{}`", kind, name),
)]
pub struct RootRemoval {
    /// The kind of the root node.
    pub kind: &'static str,

    /// The name of the root node.
    pub name: String,
}
