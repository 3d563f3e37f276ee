use crate::error::{
    model::{DuplicateName, NotFound, StaleHandle},
    Error,
};
use levenshtein::levenshtein;
use std::collections::HashMap;
use super::id::Handle;

/// A node stored in an [`Arena`].
pub trait Node {
    /// The handle type of this kind of node.
    type Id: Handle;

    /// The kind of node, as used in error messages.
    const KIND: &'static str;

    /// The unique name of the node.
    fn name(&self) -> &str;
}

/// Owns every node of one kind. Removed nodes leave an empty slot behind, so handles to other
/// nodes are never invalidated.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T: Node> {
    slots: Vec<Option<T>>,
    names: HashMap<String, usize>,
}

impl<T: Node> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            names: HashMap::new(),
        }
    }
}

impl<T: Node> Arena<T> {
    /// Fails if a live node already has this name.
    pub fn check_name(&self, name: &str) -> Result<(), Error> {
        if self.names.contains_key(name) {
            return Err(DuplicateName { kind: T::KIND, name: name.to_string() }.into());
        }
        Ok(())
    }

    /// Inserts a node, failing if its name is taken.
    pub fn insert(&mut self, node: T) -> Result<T::Id, Error> {
        self.check_name(node.name())?;
        let index = self.slots.len();
        self.names.insert(node.name().to_string(), index);
        self.slots.push(Some(node));
        Ok(T::Id::from_index(index))
    }

    /// Inserts a node whose name is known to be free, such as the first node of an empty arena.
    pub(crate) fn push(&mut self, node: T) -> T::Id {
        debug_assert!(!self.names.contains_key(node.name()), "name {} is taken", node.name());
        let index = self.slots.len();
        self.names.insert(node.name().to_string(), index);
        self.slots.push(Some(node));
        T::Id::from_index(index)
    }

    pub fn get(&self, id: T::Id) -> Result<&T, Error> {
        self.slots.get(id.index())
            .and_then(Option::as_ref)
            .ok_or_else(|| StaleHandle { kind: T::KIND, index: id.index() }.into())
    }

    pub fn remove(&mut self, id: T::Id) -> Result<T, Error> {
        let node = self.slots.get_mut(id.index())
            .and_then(Option::take)
            .ok_or_else(|| Error::from(StaleHandle { kind: T::KIND, index: id.index() }))?;
        self.names.remove(node.name());
        Ok(node)
    }

    /// Finds a node by name. The error suggests similar names.
    pub fn lookup(&self, name: &str) -> Result<T::Id, Error> {
        match self.names.get(name) {
            Some(index) => Ok(T::Id::from_index(*index)),
            None => {
                let mut suggestions = self.names.keys()
                    .filter(|other| levenshtein(other, name) < 2)
                    .cloned()
                    .collect::<Vec<_>>();
                suggestions.sort_unstable();
                Err(NotFound { kind: T::KIND, name: name.to_string(), suggestions }.into())
            },
        }
    }

    /// Iterates over the live nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (T::Id, &T)> + '_ {
        self.slots.iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|node| (T::Id::from_index(index), node)))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
