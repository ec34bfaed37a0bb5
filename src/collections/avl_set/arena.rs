use std::ops::{Index, IndexMut};

/// In debug mode or feature unsafe-optim not enabled, same as assert! otherwise does nothing.
#[cfg(any(debug_assertions, not(feature = "unsafe-optim")))]
macro_rules! safe_assert {
    ( $cond: expr ) => {
        assert!($cond)
    };
}

/// In debug mode or feature unsafe-optim not enabled, same as assert! otherwise does nothing.
#[cfg(all(not(debug_assertions), feature = "unsafe-optim"))]
macro_rules! safe_assert {
    ( $cond: expr ) => {
        if !$cond {
            unsafe { std::hint::unreachable_unchecked() }
        }
    };
}

/// Index of a node slot in the [`Arena`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct NodeIx(u32);

impl NodeIx {
    #[inline]
    fn ix(self) -> usize {
        self.0 as usize
    }
}

/// A tree node. `left` and `right` are the owning links of the tree shape,
/// `parent` is only followed upwards when rebalancing.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub value: T,
    pub left: Option<NodeIx>,
    pub right: Option<NodeIx>,
    pub parent: Option<NodeIx>,
    /// Height of the subtree rooted here, a leaf has height 0.
    pub height: u8,
    /// height(right) - height(left).
    pub balance: i8,
}

impl<T> Node<T> {
    pub fn leaf(value: T, parent: Option<NodeIx>) -> Self {
        Self {
            value,
            left: None,
            right: None,
            parent,
            height: 0,
            balance: 0,
        }
    }
}

#[derive(Clone, Debug)]
enum Slot<T> {
    Occupied(Node<T>),
    /// Link to the next free slot.
    Vacant(Option<NodeIx>),
}

/// Node store. Slots released by [`Arena::free`] are reused by later allocations.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Option<NodeIx>,
}

impl<T> Arena<T> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: None,
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            slots: Vec::with_capacity(n),
            free: None,
        }
    }

    pub fn alloc(&mut self, node: Node<T>) -> NodeIx {
        match self.free {
            Some(ix) => {
                let slot = std::mem::replace(&mut self.slots[ix.ix()], Slot::Occupied(node));
                match slot {
                    Slot::Vacant(next) => self.free = next,
                    Slot::Occupied(_) => occupied_free_slot(),
                }
                ix
            }
            None => {
                let Ok(ix) = u32::try_from(self.slots.len()) else {
                    capacity_overflow()
                };
                self.slots.push(Slot::Occupied(node));
                NodeIx(ix)
            }
        }
    }

    /// Releases the slot and hands back the value it held.
    pub fn free(&mut self, ix: NodeIx) -> T {
        let slot = std::mem::replace(&mut self.slots[ix.ix()], Slot::Vacant(self.free));
        match slot {
            Slot::Occupied(node) => {
                self.free = Some(ix);
                node.value
            }
            Slot::Vacant(_) => vacant_slot(),
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
    }

    /// Moves the values out in the order given by `order`, consuming the arena.
    pub fn into_values(mut self, order: &[NodeIx]) -> Vec<T> {
        let mut values = Vec::with_capacity(order.len());
        for &ix in order {
            values.push(self.free(ix));
        }
        values
    }
}

impl<T> Index<NodeIx> for Arena<T> {
    type Output = Node<T>;

    #[inline]
    fn index(&self, ix: NodeIx) -> &Node<T> {
        safe_assert!(ix.ix() < self.slots.len());
        match unsafe { self.slots.get_unchecked(ix.ix()) } {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => vacant_slot(),
        }
    }
}

impl<T> IndexMut<NodeIx> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, ix: NodeIx) -> &mut Node<T> {
        safe_assert!(ix.ix() < self.slots.len());
        match unsafe { self.slots.get_unchecked_mut(ix.ix()) } {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => vacant_slot(),
        }
    }
}

#[cfg(any(debug_assertions, not(feature = "unsafe-optim")))]
#[cold]
fn vacant_slot() -> ! {
    panic!("node index refers to a vacant slot")
}

#[cfg(all(not(debug_assertions), feature = "unsafe-optim"))]
#[inline]
fn vacant_slot() -> ! {
    unsafe { std::hint::unreachable_unchecked() }
}

#[cold]
fn occupied_free_slot() -> ! {
    panic!("free list refers to an occupied slot")
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}
