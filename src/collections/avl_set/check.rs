use std::cmp::{max, Ordering};
use std::fmt::Debug;

use super::arena::NodeIx;
use super::iter::Iter;
use super::order::Order;
use super::tree::Tree;
use crate::collections::InvariantError;

impl<T> Tree<T> {
    /// Full audit of links, cached heights, balance, length and order.
    pub fn validate<O: Order<T>>(&self, len: usize, order: &O) -> Result<(), InvariantError> {
        let mut count = 0;
        self.audit(self.root, None, 0, len, &mut count)?;
        if count != len {
            return Err(InvariantError::LenMismatch { len, count });
        }

        let mut prev: Option<&T> = None;
        for (position, value) in Iter::new(self, count).enumerate() {
            if let Some(prev) = prev {
                if order.compare(prev, value) != Ordering::Less {
                    return Err(InvariantError::OutOfOrder { position });
                }
            }
            prev = Some(value);
        }
        Ok(())
    }

    /// Returns the recomputed height of the subtree at `ix`.
    fn audit(
        &self,
        ix: Option<NodeIx>,
        parent: Option<NodeIx>,
        depth: usize,
        len: usize,
        count: &mut usize,
    ) -> Result<i32, InvariantError> {
        let Some(ix) = ix else {
            return Ok(-1);
        };
        let node = &self.arena[ix];
        if node.parent != parent {
            return Err(InvariantError::BrokenParent { depth });
        }
        *count += 1;
        if *count > len {
            return Err(InvariantError::LenMismatch { len, count: *count });
        }

        let hl = self.audit(node.left, Some(ix), depth + 1, len, count)?;
        let hr = self.audit(node.right, Some(ix), depth + 1, len, count)?;
        let computed = 1 + max(hl, hr);
        let cached = i32::from(node.height);
        if cached != computed {
            return Err(InvariantError::StaleHeight {
                depth,
                cached,
                computed,
            });
        }
        let balance = hr - hl;
        if i32::from(node.balance) != balance {
            return Err(InvariantError::StaleBalance {
                depth,
                cached: i32::from(node.balance),
                computed: balance,
            });
        }
        if balance.abs() > 1 {
            return Err(InvariantError::Unbalanced { depth, balance });
        }
        Ok(computed)
    }

    /// Renders the node structure, one element per line, left child first.
    /// A missing child whose sibling is present is shown as `∅`.
    pub fn dump(&self) -> String
    where
        T: Debug,
    {
        let mut out = String::new();
        if let Some(root) = self.root {
            self.dump_node(root, "", &mut out);
        }
        out
    }

    fn dump_node(&self, ix: NodeIx, tab: &str, out: &mut String)
    where
        T: Debug,
    {
        let node = &self.arena[ix];
        out.push_str(&format!("{:?}", node.value));
        if node.left.is_none() && node.right.is_none() {
            return;
        }
        for (child, is_last) in [(node.left, false), (node.right, true)] {
            out.push('\n');
            out.push_str(tab);
            out.push_str(if is_last { "└─ " } else { "├─ " });
            match child {
                Some(c) => {
                    let child_tab = format!("{tab}{}", if is_last { "   " } else { "│  " });
                    self.dump_node(c, &child_tab, out);
                }
                None => out.push('∅'),
            }
        }
    }
}
