use std::cmp::Ordering;
use std::fmt;

/// A total order over `T`, fixed for the lifetime of an [`AvlSet`](super::AvlSet).
///
/// Implementations must be a strict total order (antisymmetric, transitive, total).
/// An inconsistent order does not cause undefined behaviour, but the set may then
/// fail to find elements it holds, and [`AvlSet::validate`](super::AvlSet::validate)
/// will report the problem.
pub trait Order<T: ?Sized> {
    /// Compare `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The natural order of `T` given by its [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Order<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// An order given by a comparison closure.
///
/// # Example
///
/// ```
/// use avlset::collections::avl_set::{Comparator, Order};
///
/// let by_len = Comparator::new(|a: &&str, b: &&str| a.len().cmp(&b.len()));
/// assert!(by_len.compare(&"ab", &"abc").is_lt());
/// ```
#[derive(Clone, Copy)]
pub struct Comparator<F>(F);

impl<F> Comparator<F> {
    /// Wrap a comparison function.
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

impl<T: ?Sized, F> Order<T> for Comparator<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

impl<F> fmt::Debug for Comparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparator(..)")
    }
}
