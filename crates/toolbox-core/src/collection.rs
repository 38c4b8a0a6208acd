#![forbid(unsafe_code)]

//! Iterator helpers shared by the presentation adapters.

use std::collections::HashSet;
use std::hash::Hash;

/// Extension trait adding [`unique_by`](UniqueByExt::unique_by) to every
/// iterator.
pub trait UniqueByExt: Iterator + Sized {
    /// Yield only the first item for each distinct key, preserving order.
    ///
    /// ```
    /// use toolbox_core::UniqueByExt;
    ///
    /// let kinds: Vec<_> = ["title", "detail", "title", "toggle"]
    ///     .into_iter()
    ///     .unique_by(|kind| *kind)
    ///     .collect();
    /// assert_eq!(kinds, ["title", "detail", "toggle"]);
    /// ```
    fn unique_by<K, F>(self, key: F) -> UniqueBy<Self, K, F>
    where
        K: Hash + Eq,
        F: FnMut(&Self::Item) -> K,
    {
        UniqueBy {
            iter: self,
            seen: HashSet::new(),
            key,
        }
    }
}

impl<I: Iterator> UniqueByExt for I {}

/// Iterator returned by [`UniqueByExt::unique_by`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct UniqueBy<I, K, F> {
    iter: I,
    seen: HashSet<K>,
    key: F,
}

impl<I, K, F> Iterator for UniqueBy<I, K, F>
where
    I: Iterator,
    K: Hash + Eq,
    F: FnMut(&I::Item) -> K,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        for item in self.iter.by_ref() {
            if self.seen.insert((self.key)(&item)) {
                return Some(item);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.iter.size_hint();
        (0, upper)
    }
}

impl<I: std::fmt::Debug, K, F> std::fmt::Debug for UniqueBy<I, K, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniqueBy")
            .field("iter", &self.iter)
            .field("seen", &self.seen.len())
            .finish_non_exhaustive()
    }
}
