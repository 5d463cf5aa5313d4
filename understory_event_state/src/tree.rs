// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal view of the host's element tree.
//!
//! Outside-click detection and auto-update observation only need to walk from
//! a node up to the root, so the host provides a parent lookup and nothing
//! else. Walks are bounded by [`MAX_DEPTH`] so a malformed (cyclic) host tree
//! degrades to a wrong answer instead of a hang.

/// Upper bound on parent walks.
pub const MAX_DEPTH: usize = 4096;

/// Parent lookup over the host's element tree.
pub trait NodeTree<K> {
    /// Returns the parent of `node`, or `None` for a root or unknown node.
    fn parent_of(&self, node: &K) -> Option<K>;

    /// Returns `true` if `node` is attached to the document.
    ///
    /// Hosts that cannot detach nodes can keep the default.
    fn is_connected(&self, node: &K) -> bool {
        let _ = node;
        true
    }
}

impl<K, T: NodeTree<K> + ?Sized> NodeTree<K> for &T {
    fn parent_of(&self, node: &K) -> Option<K> {
        (**self).parent_of(node)
    }

    fn is_connected(&self, node: &K) -> bool {
        (**self).is_connected(node)
    }
}

/// Returns `true` if `node` is `ancestor` or one of its descendants.
///
/// Matches DOM `Node.contains`, which is inclusive.
pub fn contains<K, T>(tree: &T, ancestor: &K, node: &K) -> bool
where
    K: PartialEq + Clone,
    T: NodeTree<K> + ?Sized,
{
    if node == ancestor {
        return true;
    }
    ancestors(tree, node).any(|a| a == *ancestor)
}

/// Iterate the strict ancestors of `node`, nearest first.
pub fn ancestors<'a, K, T>(tree: &'a T, node: &K) -> Ancestors<'a, K, T>
where
    K: Clone,
    T: NodeTree<K> + ?Sized,
{
    Ancestors {
        tree,
        next: tree.parent_of(node),
        remaining: MAX_DEPTH,
    }
}

/// Iterator returned by [`ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a, K, T: ?Sized> {
    tree: &'a T,
    next: Option<K>,
    remaining: usize,
}

impl<K, T> Iterator for Ancestors<'_, K, T>
where
    K: Clone,
    T: NodeTree<K> + ?Sized,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next.take()?;
        self.next = self.tree.parent_of(&current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Parent table indexed by node id; `u32::MAX` marks a root.
    struct Table(Vec<u32>);

    impl NodeTree<u32> for Table {
        fn parent_of(&self, node: &u32) -> Option<u32> {
            self.0
                .get(*node as usize)
                .copied()
                .filter(|&p| p != u32::MAX)
        }
    }

    #[test]
    fn contains_is_inclusive_and_transitive() {
        // 0 ← 1 ← 2, and 3 is a separate root.
        let tree = Table(alloc::vec![u32::MAX, 0, 1, u32::MAX]);
        assert!(contains(&tree, &0, &0));
        assert!(contains(&tree, &0, &2));
        assert!(contains(&tree, &1, &2));
        assert!(!contains(&tree, &2, &0));
        assert!(!contains(&tree, &0, &3));
    }

    #[test]
    fn ancestors_nearest_first() {
        let tree = Table(alloc::vec![u32::MAX, 0, 1]);
        let chain: Vec<u32> = ancestors(&tree, &2).collect();
        assert_eq!(chain, alloc::vec![1, 0]);
        assert_eq!(ancestors(&tree, &0).count(), 0);
    }

    #[test]
    fn cyclic_tree_terminates() {
        // 0 and 1 are each other's parent.
        let tree = Table(alloc::vec![1, 0]);
        assert_eq!(ancestors(&tree, &0).count(), MAX_DEPTH);
        assert!(!contains(&tree, &5, &0));
    }
}
