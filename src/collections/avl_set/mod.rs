//! [`AvlSet`], an ordered set kept height balanced by AVL rotations.
//!
//! # Example
//!
//! ```
//!     use avlset::collections::AvlSet;
//!     let mut set = AvlSet::new();
//!     set.insert("England");
//!     set.insert("France");
//!     assert!(set.contains(&"France"));
//!     assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["England", "France"]);
//! ```
//!
//!# Features
//!
//! - `serde` : enables serialisation of [`AvlSet`] as a sorted sequence via serde crate.
//! - `unsafe-optim` : uses unchecked node access for extra optimisation.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::mem;

use crate::collections::InvariantError;

mod arena;
mod check;
mod iter;
mod order;
mod tree;

pub use iter::{IntoIter, Iter};
pub use order::{Comparator, Natural, Order};
use tree::Tree;

/// An ordered set based on an AVL tree.
///
/// General guide to implementation:
///
/// Nodes live in an arena and refer to each other by index. `left` and `right`
/// give the tree shape, `parent` is a back link used only to climb towards the
/// root when rebalancing after an insert or a removal.
///
/// The order of elements is given by the type parameter `O`, which is [`Natural`]
/// (the element's [`Ord`]) unless the set was created with
/// [`with_comparator`](AvlSet::with_comparator) or [`with_order`](AvlSet::with_order).
///
/// # Guide to methods
///
/// Set Creation: [`new`], [`with_capacity`], [`with_comparator`], [`with_order`]
///
/// Properties: [`len`], [`is_empty`], [`contains`], [`contains_all`], [`height`]
///
/// Insertion: [`insert`], [`replace`], [`add_all`]
///
/// Retrieve: [`get`], [`first`], [`last`]
///
/// Removal: [`remove`], [`take`], [`pop_first`], [`pop_last`], [`remove_all`]
///
/// Bulk: [`retain`], [`retain_all`], [`clear`]
///
/// Iterators: [`iter`]
///
/// Diagnostics: [`validate`], [`tree_dump`]
///
/// [`new`]: AvlSet::new
/// [`with_capacity`]: AvlSet::with_capacity
/// [`with_comparator`]: AvlSet::with_comparator
/// [`with_order`]: AvlSet::with_order
/// [`len`]: AvlSet::len
/// [`is_empty`]: AvlSet::is_empty
/// [`contains`]: AvlSet::contains
/// [`contains_all`]: AvlSet::contains_all
/// [`height`]: AvlSet::height
/// [`insert`]: AvlSet::insert
/// [`replace`]: AvlSet::replace
/// [`add_all`]: AvlSet::add_all
/// [`get`]: AvlSet::get
/// [`first`]: AvlSet::first
/// [`last`]: AvlSet::last
/// [`remove`]: AvlSet::remove
/// [`take`]: AvlSet::take
/// [`pop_first`]: AvlSet::pop_first
/// [`pop_last`]: AvlSet::pop_last
/// [`remove_all`]: AvlSet::remove_all
/// [`retain`]: AvlSet::retain
/// [`retain_all`]: AvlSet::retain_all
/// [`clear`]: AvlSet::clear
/// [`iter`]: AvlSet::iter
/// [`validate`]: AvlSet::validate
/// [`tree_dump`]: AvlSet::tree_dump
///
/// # Examples
///
/// ```
/// use avlset::collections::AvlSet;
///
/// let mut books = AvlSet::new();
///
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// if !books.contains(&"The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.",
///              books.len());
/// }
///
/// books.remove(&"The Odyssey");
///
/// for book in &books {
///     println!("{book}");
/// }
/// ```
///
/// A set with a custom order:
///
/// ```
/// use avlset::collections::AvlSet;
///
/// // Even numbers first, then odd numbers, each ascending.
/// let mut set = AvlSet::with_comparator(|a: &i32, b: &i32| {
///     (a % 2).cmp(&(b % 2)).then(a.cmp(b))
/// });
/// set.add_all(1..=8);
/// assert!(set.iter().eq([2, 4, 6, 8, 1, 3, 5, 7].iter()));
/// ```
pub struct AvlSet<T, O = Natural> {
    len: usize,
    tree: Tree<T>,
    order: O,
}

impl<T> AvlSet<T> {
    /// Returns a new, empty set ordered by `T`'s [`Ord`].
    ///
    /// # Example
    ///
    /// ```
    /// # #![allow(unused_mut)]
    /// use avlset::collections::AvlSet;
    ///
    /// let mut set: AvlSet<i32> = AvlSet::new();
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self::with_order(Natural)
    }

    /// Returns a new, empty set with room for `n` elements before the node store reallocates.
    #[must_use]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            len: 0,
            tree: Tree::with_capacity(n),
            order: Natural,
        }
    }
}

impl<T, F> AvlSet<T, Comparator<F>>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Returns a new, empty set ordered by the comparison function `f`.
    ///
    /// `f` must be a strict total order. Elements for which it returns
    /// [`Ordering::Equal`] are considered the same element.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut set = AvlSet::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// set.insert(1);
    /// set.insert(3);
    /// set.insert(2);
    /// assert!(set.iter().eq([3, 2, 1].iter()));
    /// ```
    #[must_use]
    pub fn with_comparator(f: F) -> Self {
        Self::with_order(Comparator::new(f))
    }
}

impl<T, O> AvlSet<T, O> {
    /// Returns a new, empty set ordered by `order`.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::avl_set::{AvlSet, Order};
    /// use std::cmp::Ordering;
    ///
    /// struct ByLen;
    /// impl Order<String> for ByLen {
    ///     fn compare(&self, a: &String, b: &String) -> Ordering {
    ///         a.len().cmp(&b.len())
    ///     }
    /// }
    ///
    /// let mut set = AvlSet::with_order(ByLen);
    /// assert!(set.insert("one".to_string()));
    /// assert!(!set.insert("two".to_string()));
    /// ```
    #[must_use]
    pub const fn with_order(order: O) -> Self {
        Self {
            len: 0,
            tree: Tree::new(),
            order,
        }
    }

    /// Returns the order the set was created with.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    /// use avlset::collections::avl_set::Order;
    /// use std::cmp::Ordering;
    ///
    /// let set = AvlSet::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// assert_eq!(set.order().compare(&1, &2), Ordering::Greater);
    /// ```
    pub fn order(&self) -> &O {
        &self.order
    }

    /// Returns number of elements in the set
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut v = AvlSet::new();
    /// assert_eq!(v.len(), 0);
    /// v.insert(1);
    /// assert_eq!(v.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Does the set have any elements
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut v = AvlSet::new();
    /// assert!(v.is_empty());
    /// v.insert(1);
    /// assert!(!v.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears the set, removing all elements.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut v = AvlSet::new();
    /// v.insert(1);
    /// v.clear();
    /// assert!(v.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.len = 0;
        self.tree.clear();
    }

    /// Height of the tree, `None` for an empty set. A single element has height 0.
    ///
    /// An AVL tree of `n` elements has height below `1.45 * log2(n + 2)`.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert_eq!(set.height(), None);
    /// set.add_all(1..=7);
    /// assert_eq!(set.height(), Some(2));
    /// ```
    #[must_use]
    pub fn height(&self) -> Option<usize> {
        self.tree.root.map(|r| usize::from(self.tree.arena[r].height))
    }

    /// Returns a reference to the first element in the set, if any.
    /// This element is always the minimum of all elements in the set.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert_eq!(set.first(), None);
    /// set.insert(2);
    /// set.insert(1);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.tree.first().map(|ix| &self.tree.arena[ix].value)
    }

    /// Returns a reference to the last element in the set, if any.
    /// This element is always the maximum of all elements in the set.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tree.last().map(|ix| &self.tree.arena[ix].value)
    }

    /// Removes the first element from the set and returns it, if any.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut set = AvlSet::from([2, 1]);
    /// assert_eq!(set.pop_first(), Some(1));
    /// assert_eq!(set.pop_first(), Some(2));
    /// assert_eq!(set.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<T> {
        let ix = self.tree.first()?;
        self.len -= 1;
        Some(self.tree.remove_at(ix))
    }

    /// Removes the last element from the set and returns it, if any.
    pub fn pop_last(&mut self) -> Option<T> {
        let ix = self.tree.last()?;
        self.len -= 1;
        Some(self.tree.remove_at(ix))
    }

    /// Gets an iterator that visits the elements in ascending order.
    ///
    /// The iterator reflects the set as it is when `iter` is called, so calling
    /// `iter` again after a change starts a fresh traversal.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let set = AvlSet::from([3, 1, 2]);
    /// let mut set_iter = set.iter();
    /// assert_eq!(set_iter.next(), Some(&1));
    /// assert_eq!(set_iter.next_back(), Some(&3));
    /// assert_eq!(set_iter.next(), Some(&2));
    /// assert_eq!(set_iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.tree, self.len)
    }

    /// Returns the elements in ascending order as a `Vec`.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Renders the tree structure for debugging, one element per line with the
    /// left child listed before the right child.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let set = AvlSet::from([1, 2, 3]);
    /// assert_eq!(set.tree_dump(), "2\n├─ 1\n└─ 3");
    /// ```
    pub fn tree_dump(&self) -> String
    where
        T: Debug,
    {
        self.tree.dump()
    }
}

impl<T, O: Order<T>> AvlSet<T, O> {
    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. If an equal element is already
    /// present the set is unchanged and `value` is dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert_eq!(set.insert(2), true);
    /// assert_eq!(set.insert(2), false);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let added = self.tree.insert(value, &self.order).is_ok();
        if added {
            self.len += 1;
        }
        added
    }

    /// Adds a value to the set, replacing the existing element, if any, that is
    /// equal to the value. Returns the replaced element.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(Vec::<i32>::new());
    ///
    /// assert_eq!(set.get(&vec![]).unwrap().capacity(), 0);
    /// set.replace(Vec::with_capacity(10));
    /// assert_eq!(set.get(&vec![]).unwrap().capacity(), 10);
    /// ```
    pub fn replace(&mut self, value: T) -> Option<T> {
        match self.tree.insert(value, &self.order) {
            Ok(()) => {
                self.len += 1;
                None
            }
            Err((ix, value)) => Some(mem::replace(&mut self.tree.arena[ix].value, value)),
        }
    }

    /// Returns `true` if the set contains an element equal to the value.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let set = AvlSet::from([1, 2, 3]);
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&4), false);
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        self.tree.find(value, &self.order).is_some()
    }

    /// Returns a reference to the element in the set, if any, that is equal to
    /// the value.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let set = AvlSet::from([1, 2, 3]);
    /// assert_eq!(set.get(&2), Some(&2));
    /// assert_eq!(set.get(&4), None);
    /// ```
    pub fn get(&self, value: &T) -> Option<&T> {
        self.tree
            .find(value, &self.order)
            .map(|ix| &self.tree.arena[ix].value)
    }

    /// Remove element from set, returns whether it was present.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    ///
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Remove and return element from set
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut set = AvlSet::from([1, 2, 3]);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// ```
    pub fn take(&mut self, value: &T) -> Option<T> {
        let removed = self.tree.remove(value, &self.order)?;
        self.len -= 1;
        Some(removed)
    }

    /// Returns `true` if every element of `batch` is in the set.
    /// An empty batch is contained in every set.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let set = AvlSet::from([1, 2, 3]);
    /// assert!(set.contains_all([1, 2]));
    /// assert!(!set.contains_all(&[1, 4]));
    /// ```
    pub fn contains_all<I>(&self, batch: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        batch
            .into_iter()
            .all(|v| self.contains(Borrow::<T>::borrow(&v)))
    }

    /// Inserts every element of `batch`. Returns `true` if at least one of them
    /// was newly added.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut set = AvlSet::from([1, 2, 3]);
    /// assert!(!set.add_all([1, 2, 3]));
    /// assert!(set.add_all([1, 2, 3, 4]));
    /// assert_eq!(set.len(), 4);
    /// ```
    pub fn add_all<I>(&mut self, batch: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut added = 0;
        for value in batch {
            if self.insert(value) {
                added += 1;
            }
        }
        added != 0
    }

    /// Removes every element of `batch`. Returns `true` if at least one of them
    /// was present.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut set = AvlSet::from([1, 2, 3]);
    /// assert!(set.remove_all([1, 2, 7]));
    /// assert!(!set.remove_all([1, 2]));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn remove_all<I>(&mut self, batch: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut removed = 0;
        for value in batch {
            if self.remove(Borrow::<T>::borrow(&value)) {
                removed += 1;
            }
        }
        removed != 0
    }

    /// Keeps only the elements that are also in `batch`, compared with the set's
    /// own order. Returns `true` if any element was removed.
    ///
    /// The set is rebuilt from the retained elements.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut set = AvlSet::from([1, 2, 3]);
    /// assert!(!set.retain_all([3, 2, 1]));
    /// assert!(set.retain_all([1, 2]));
    /// assert_eq!(set.to_vec(), [1, 2]);
    /// ```
    pub fn retain_all<I>(&mut self, batch: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut keep: Vec<I::Item> = batch.into_iter().collect();
        keep.sort_by(|a, b| {
            self.order
                .compare(Borrow::<T>::borrow(a), Borrow::<T>::borrow(b))
        });
        self.rebuild(|value, order| {
            keep.binary_search_by(|k| order.compare(Borrow::<T>::borrow(k), value))
                .is_ok()
        })
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all elements `e` for which `f(&e)` returns `false`.
    /// The elements are visited in ascending order. Returns `true` if any element
    /// was removed.
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let mut set = AvlSet::from([1, 2, 3, 4, 5, 6]);
    /// // Keep only the even numbers.
    /// set.retain(|&k| k % 2 == 0);
    /// assert!(set.iter().eq([2, 4, 6].iter()));
    /// ```
    pub fn retain<F>(&mut self, mut f: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.rebuild(|value, _| f(value))
    }

    /// Drops the tree and reinserts, in ascending order, the elements `keep` accepts.
    fn rebuild<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(&T, &O) -> bool,
    {
        let old_len = self.len;
        let tree = mem::replace(&mut self.tree, Tree::new());
        self.len = 0;
        for value in tree.into_sorted_vec() {
            if keep(&value, &self.order) {
                self.insert(value);
            }
        }
        self.len != old_len
    }

    /// Checks every invariant of the tree: order, balance, cached heights,
    /// parent links and length. Returns the first violation found.
    ///
    /// A set only fails validation if its order is not a strict total order
    /// (or has changed while elements were stored).
    ///
    /// # Example
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let set: AvlSet<u32> = (0..100).rev().collect();
    /// assert_eq!(set.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> Result<(), InvariantError> {
        self.tree.validate(self.len, &self.order)
    }

    #[cfg(test)]
    pub(crate) fn check(&self)
    where
        T: Debug,
    {
        if let Err(e) = self.validate() {
            panic!("{e}\n{}", self.tree.dump());
        }
    }
}

impl<T, O: Default> Default for AvlSet<T, O> {
    /// Creates an empty set.
    fn default() -> Self {
        Self::with_order(O::default())
    }
}

impl<T: Clone, O: Clone> Clone for AvlSet<T, O> {
    fn clone(&self) -> Self {
        Self {
            len: self.len,
            tree: self.tree.clone(),
            order: self.order.clone(),
        }
    }
}

impl<T: Debug, O> Debug for AvlSet<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Hash, O> Hash for AvlSet<T, O> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T: PartialEq, O> PartialEq for AvlSet<T, O> {
    fn eq(&self, other: &AvlSet<T, O>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, O> Eq for AvlSet<T, O> {}

impl<T: PartialOrd, O> PartialOrd for AvlSet<T, O> {
    fn partial_cmp(&self, other: &AvlSet<T, O>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, O> Ord for AvlSet<T, O> {
    fn cmp(&self, other: &AvlSet<T, O>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T, O> IntoIterator for AvlSet<T, O> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the set's contents in ascending order.
    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self.tree)
    }
}

impl<'a, T, O> IntoIterator for &'a AvlSet<T, O> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: Ord> FromIterator<T> for AvlSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> AvlSet<T> {
        let mut set = AvlSet::new();
        set.add_all(iter);
        set
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlSet<T> {
    /// Converts a `[T; N]` into an `AvlSet<T>`.
    ///
    /// ```
    /// use avlset::collections::AvlSet;
    ///
    /// let set1 = AvlSet::from([1, 2, 3, 4]);
    /// let set2: AvlSet<_> = [1, 2, 3, 4].into();
    /// assert_eq!(set1, set2);
    /// ```
    fn from(arr: [T; N]) -> Self {
        let mut set = AvlSet::with_capacity(N);
        set.add_all(arr);
        set
    }
}

impl<T, O: Order<T>> Extend<T> for AvlSet<T, O> {
    #[inline]
    fn extend<Iter: IntoIterator<Item = T>>(&mut self, iter: Iter) {
        iter.into_iter().for_each(move |elem| {
            self.insert(elem);
        });
    }
}

impl<'a, T: 'a + Copy, O: Order<T>> Extend<&'a T> for AvlSet<T, O> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

#[cfg(feature = "serde")]
use serde::{
    de::{SeqAccess, Visitor},
    ser::SerializeSeq,
    Deserialize, Deserializer, Serialize, Serializer,
};

#[cfg(feature = "serde")]
impl<T: Serialize, O> Serialize for AvlSet<T, O> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for v in self {
            seq.serialize_element(v)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct AvlSetVisitor<T, O> {
    marker: std::marker::PhantomData<fn() -> AvlSet<T, O>>,
}

#[cfg(feature = "serde")]
impl<'de, T, O> Visitor<'de> for AvlSetVisitor<T, O>
where
    T: Deserialize<'de>,
    O: Order<T> + Default,
{
    type Value = AvlSet<T, O>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of set elements")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut set = AvlSet::with_order(O::default());
        while let Some(v) = access.next_element()? {
            set.insert(v);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T, O> Deserialize<'de> for AvlSet<T, O>
where
    T: Deserialize<'de>,
    O: Order<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(AvlSetVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// Tests.

#[cfg(all(test, not(miri), feature = "cap"))]
#[global_allocator]
static ALLOCATOR: cap::Cap<std::alloc::System> =
    cap::Cap::new(std::alloc::System, usize::MAX);

#[cfg(test)]
fn print_memory() {
    #[cfg(all(test, not(miri), feature = "cap"))]
    println!("Memory allocated: {} bytes", ALLOCATOR.allocated());
}

/* mimalloc cannot be used with miri */
#[cfg(all(test, not(miri), not(feature = "cap")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(test)]
mod tests;
