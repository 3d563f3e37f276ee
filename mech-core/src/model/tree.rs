//! Paths between nodes of a tree of bases or points.

use crate::error::Error;

/// One edge of a path between two nodes. Each edge is identified by its child node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step<I> {
    /// The edge from the node to its previous node, walked from child to ancestor.
    Up(I),

    /// The edge from the previous node to the node, walked from ancestor to child.
    Down(I),
}

/// Returns the chain `node, previous(node), ..., root`.
fn root_chain<I: Copy>(
    node: I,
    previous: &impl Fn(I) -> Result<Option<I>, Error>,
) -> Result<Vec<I>, Error> {
    let mut chain = vec![node];
    let mut current = node;
    while let Some(next) = previous(current)? {
        chain.push(next);
        current = next;
    }
    Ok(chain)
}

/// Finds the path from `from` to `to` through their lowest common ancestor: first the edges from
/// `from` up to the ancestor, then the edges from the ancestor down to `to`.
///
/// Returns `None` if the nodes are in different trees, and an empty path if they are the same
/// node.
pub(crate) fn tree_path<I: Copy + Eq>(
    from: I,
    to: I,
    previous: impl Fn(I) -> Result<Option<I>, Error>,
) -> Result<Option<Vec<Step<I>>>, Error> {
    if from == to {
        return Ok(Some(Vec::new()));
    }

    let mut up = root_chain(from, &previous)?;
    let mut down = root_chain(to, &previous)?;
    if up.last() != down.last() {
        return Ok(None);
    }

    // drop the common part of both chains, the last dropped node is the common ancestor
    while up.len() >= 2 && down.len() >= 2 && up[up.len() - 2] == down[down.len() - 2] {
        up.pop();
        down.pop();
    }
    up.pop();
    down.pop();

    let mut path = up.into_iter().map(Step::Up).collect::<Vec<_>>();
    path.extend(down.into_iter().rev().map(Step::Down));
    Ok(Some(path))
}

/// Finds the lowest common ancestor of two nodes, or `None` if they are in different trees.
pub(crate) fn common_ancestor<I: Copy + Eq>(
    a: I,
    b: I,
    previous: impl Fn(I) -> Result<Option<I>, Error>,
) -> Result<Option<I>, Error> {
    let chain_a = root_chain(a, &previous)?;
    let chain_b = root_chain(b, &previous)?;
    Ok(chain_a.into_iter().find(|node| chain_b.contains(node)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    //     0
    //    / \
    //   1   3
    //   |   |
    //   2   4      5 (separate root)
    fn previous(node: usize) -> Result<Option<usize>, Error> {
        Ok([None, Some(0), Some(1), Some(0), Some(3), None][node])
    }

    #[test]
    fn same_node() {
        assert_eq!(tree_path(2, 2, previous).unwrap(), Some(vec![]));
    }

    #[test]
    fn ancestor_chain() {
        assert_eq!(tree_path(0, 2, previous).unwrap(), Some(vec![Step::Down(1), Step::Down(2)]));
        assert_eq!(tree_path(2, 0, previous).unwrap(), Some(vec![Step::Up(2), Step::Up(1)]));
    }

    #[test]
    fn through_common_ancestor() {
        assert_eq!(
            tree_path(2, 4, previous).unwrap(),
            Some(vec![Step::Up(2), Step::Up(1), Step::Down(3), Step::Down(4)]),
        );
        assert_eq!(common_ancestor(2, 4, previous).unwrap(), Some(0));
        assert_eq!(common_ancestor(2, 1, previous).unwrap(), Some(1));
    }

    #[test]
    fn disjoint_trees() {
        assert_eq!(tree_path(2, 5, previous).unwrap(), None);
        assert_eq!(common_ancestor(5, 4, previous).unwrap(), None);
    }
}
