use std::fmt;
use std::iter::FusedIterator;

use super::arena::{Arena, NodeIx};
use super::tree::Tree;

/// StkVec is used for stacks of node indices, length is maximum tree depth.
///
/// An AVL tree of height h holds at least F(h+3)-1 nodes, so with at most 2^32 nodes
/// the height is at most 44.
type StkVec<T> = arrayvec::ArrayVec<T, 48>;

/// An iterator over the elements of an [`AvlSet`](super::AvlSet), in ascending order.
///
/// This `struct` is created by [`AvlSet::iter`](super::AvlSet::iter).
pub struct Iter<'a, T> {
    arena: &'a Arena<T>,
    fwd_stk: StkVec<NodeIx>,
    bck_stk: StkVec<NodeIx>,
    len: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, len: usize) -> Self {
        let mut iter = Self {
            arena: &tree.arena,
            fwd_stk: StkVec::new(),
            bck_stk: StkVec::new(),
            len,
        };
        iter.push_left(tree.root);
        iter.push_right(tree.root);
        iter
    }

    fn push_left(&mut self, mut cur: Option<NodeIx>) {
        while let Some(ix) = cur {
            self.fwd_stk.push(ix);
            cur = self.arena[ix].left;
        }
    }

    fn push_right(&mut self, mut cur: Option<NodeIx>) {
        while let Some(ix) = cur {
            self.bck_stk.push(ix);
            cur = self.arena[ix].right;
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            fwd_stk: self.fwd_stk.clone(),
            bck_stk: self.bck_stk.clone(),
            len: self.len,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        let ix = self.fwd_stk.pop()?;
        let arena = self.arena;
        self.push_left(arena[ix].right);
        self.len -= 1;
        Some(&arena[ix].value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        let ix = self.bck_stk.pop()?;
        let arena = self.arena;
        self.push_right(arena[ix].left);
        self.len -= 1;
        Some(&arena[ix].value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

/// An owning iterator over the elements of an [`AvlSet`](super::AvlSet), in ascending order.
///
/// This `struct` is created by the `into_iter` method on [`AvlSet`](super::AvlSet).
#[derive(Debug)]
pub struct IntoIter<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(tree: Tree<T>) -> Self {
        Self {
            inner: tree.into_sorted_vec().into_iter(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}
