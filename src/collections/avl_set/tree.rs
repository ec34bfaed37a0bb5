use std::cmp::{max, Ordering};
use std::mem;

use super::arena::{Arena, Node, NodeIx};
use super::order::Order;

/// The tree engine: an arena of nodes plus the root index.
///
/// Every structural change (leaf insert, splice) is followed by a rebalance
/// climb from the point of change to the root, so the AVL invariant holds
/// whenever a public method returns.
#[derive(Clone, Debug)]
pub(crate) struct Tree<T> {
    pub arena: Arena<T>,
    pub root: Option<NodeIx>,
}

impl<T> Tree<T> {
    pub const fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            arena: Arena::with_capacity(n),
            root: None,
        }
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
    }

    /// Cached height of an optional subtree, an absent subtree has height -1.
    #[inline]
    pub fn height(&self, ix: Option<NodeIx>) -> i32 {
        match ix {
            Some(ix) => i32::from(self.arena[ix].height),
            None => -1,
        }
    }

    pub fn find<O: Order<T>>(&self, value: &T, order: &O) -> Option<NodeIx> {
        let mut cur = self.root;
        while let Some(ix) = cur {
            let node = &self.arena[ix];
            cur = match order.compare(value, &node.value) {
                Ordering::Equal => return Some(ix),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    pub fn first(&self) -> Option<NodeIx> {
        let mut ix = self.root?;
        while let Some(l) = self.arena[ix].left {
            ix = l;
        }
        Some(ix)
    }

    pub fn last(&self) -> Option<NodeIx> {
        let mut ix = self.root?;
        while let Some(r) = self.arena[ix].right {
            ix = r;
        }
        Some(ix)
    }

    /// Inserts `value` as a new leaf. If an equal element is present the tree is
    /// unchanged and `value` is given back with the node holding that element.
    pub fn insert<O: Order<T>>(&mut self, value: T, order: &O) -> Result<(), (NodeIx, T)> {
        let Some(mut ix) = self.root else {
            let ix = self.arena.alloc(Node::leaf(value, None));
            self.root = Some(ix);
            return Ok(());
        };
        let go_left = loop {
            let node = &self.arena[ix];
            let go_left = match order.compare(&value, &node.value) {
                Ordering::Equal => return Err((ix, value)),
                Ordering::Less => true,
                Ordering::Greater => false,
            };
            match if go_left { node.left } else { node.right } {
                Some(next) => ix = next,
                None => break go_left,
            }
        };
        let leaf = self.arena.alloc(Node::leaf(value, Some(ix)));
        if go_left {
            self.arena[ix].left = Some(leaf);
        } else {
            self.arena[ix].right = Some(leaf);
        }
        self.rebalance(ix);
        Ok(())
    }

    /// Removes the element equal to `value`, returning it.
    ///
    /// The node physically released is the in-order successor of the match when the
    /// match has a right subtree, otherwise the match itself. In the first case the
    /// successor's value is moved into the matched node.
    pub fn remove<O: Order<T>>(&mut self, value: &T, order: &O) -> Option<T> {
        let candidate = self.find(value, order)?;
        Some(self.remove_at(candidate))
    }

    pub fn remove_at(&mut self, candidate: NodeIx) -> T {
        // Right once, then left to the end.
        let mut n = candidate;
        if let Some(r) = self.arena[candidate].right {
            n = r;
            while let Some(l) = self.arena[n].left {
                n = l;
            }
        }

        let Node {
            left,
            right,
            parent,
            ..
        } = self.arena[n];
        let child = left.or(right);
        if let Some(c) = child {
            self.arena[c].parent = parent;
        }
        self.replace_child(parent, n, child);

        let removed = self.arena.free(n);
        let value = if n == candidate {
            removed
        } else {
            mem::replace(&mut self.arena[candidate].value, removed)
        };

        if let Some(p) = parent {
            self.rebalance(p);
        }
        value
    }

    /// Points the slot of `parent` that held `old` at `new`, or makes `new` the
    /// root when there is no parent.
    fn replace_child(&mut self, parent: Option<NodeIx>, old: NodeIx, new: Option<NodeIx>) {
        match parent {
            Some(p) => {
                let p = &mut self.arena[p];
                if p.left == Some(old) {
                    p.left = new;
                } else {
                    debug_assert!(p.right == Some(old));
                    p.right = new;
                }
            }
            None => self.root = new,
        }
    }

    fn set_balance(&mut self, ix: NodeIx) {
        let (left, right) = (self.arena[ix].left, self.arena[ix].right);
        let (hl, hr) = (self.height(left), self.height(right));
        let node = &mut self.arena[ix];
        node.height = (1 + max(hl, hr)) as u8;
        node.balance = (hr - hl) as i8;
    }

    /// Restores the AVL invariant from `ix` up to the root.
    fn rebalance(&mut self, mut ix: NodeIx) {
        loop {
            self.set_balance(ix);
            let top = match self.arena[ix].balance {
                -2 => self.fix_left_heavy(ix),
                2 => self.fix_right_heavy(ix),
                _ => ix,
            };
            match self.arena[top].parent {
                Some(p) => ix = p,
                None => {
                    self.root = Some(top);
                    return;
                }
            }
        }
    }

    fn fix_left_heavy(&mut self, ix: NodeIx) -> NodeIx {
        let Some(l) = self.arena[ix].left else {
            unreachable!("left-heavy node without a left child")
        };
        let node = &self.arena[l];
        if self.height(node.left) < self.height(node.right) {
            self.rotate_left(l);
        }
        self.rotate_right(ix)
    }

    fn fix_right_heavy(&mut self, ix: NodeIx) -> NodeIx {
        let Some(r) = self.arena[ix].right else {
            unreachable!("right-heavy node without a right child")
        };
        let node = &self.arena[r];
        if self.height(node.right) < self.height(node.left) {
            self.rotate_right(r);
        }
        self.rotate_left(ix)
    }

    /// Rotates `a` down to the left, its right child `b` takes its place. Returns `b`.
    fn rotate_left(&mut self, a: NodeIx) -> NodeIx {
        let Some(b) = self.arena[a].right else {
            unreachable!("left rotation without a right child")
        };
        let parent = self.arena[a].parent;
        let inner = self.arena[b].left;

        self.arena[a].right = inner;
        if let Some(i) = inner {
            self.arena[i].parent = Some(a);
        }
        self.arena[b].left = Some(a);
        self.arena[a].parent = Some(b);
        self.arena[b].parent = parent;
        self.replace_child(parent, a, Some(b));

        self.set_balance(a);
        self.set_balance(b);
        b
    }

    /// Rotates `a` down to the right, its left child `b` takes its place. Returns `b`.
    fn rotate_right(&mut self, a: NodeIx) -> NodeIx {
        let Some(b) = self.arena[a].left else {
            unreachable!("right rotation without a left child")
        };
        let parent = self.arena[a].parent;
        let inner = self.arena[b].right;

        self.arena[a].left = inner;
        if let Some(i) = inner {
            self.arena[i].parent = Some(a);
        }
        self.arena[b].right = Some(a);
        self.arena[a].parent = Some(b);
        self.arena[b].parent = parent;
        self.replace_child(parent, a, Some(b));

        self.set_balance(a);
        self.set_balance(b);
        b
    }

    /// Node indices in ascending order.
    pub fn inorder(&self) -> Vec<NodeIx> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        let mut cur = self.root;
        loop {
            while let Some(ix) = cur {
                stack.push(ix);
                cur = self.arena[ix].left;
            }
            let Some(ix) = stack.pop() else {
                return out;
            };
            out.push(ix);
            cur = self.arena[ix].right;
        }
    }

    /// Consumes the tree, returning its elements in ascending order.
    pub fn into_sorted_vec(self) -> Vec<T> {
        let order = self.inorder();
        self.arena.into_values(&order)
    }
}
