#![forbid(unsafe_code)]

//! Combining independent loadable states into one joint state.
//!
//! # Precedence
//!
//! ```text
//! Failed  >  InProgress  >  NotStarted  >  Succeeded
//! ```
//!
//! The joint state is the highest-ranked input state. Among several failures
//! the leftmost error (in argument / iteration order) wins. The result is
//! `Succeeded` only when every input succeeded, carrying the values in input
//! order.
//!
//! Every arity (tuples via [`Combine`], [`combine_all`] over iterators) folds
//! its inputs left to right through the same step, so precedence and
//! tie-breaking are identical at any arity.
//!
//! All inputs share one error type `E`; map mismatched errors into a common
//! type with [`Loadable::map_err`] first.

use super::Loadable;

/// Why a combination cannot (yet) succeed.
enum Blocker<E> {
    NotStarted,
    InProgress,
    Failed(E),
}

impl<E> Blocker<E> {
    const fn rank(&self) -> u8 {
        match self {
            Self::NotStarted => 1,
            Self::InProgress => 2,
            Self::Failed(_) => 3,
        }
    }

    fn into_loadable<T>(self) -> Loadable<T, E> {
        match self {
            Self::NotStarted => Loadable::NotStarted,
            Self::InProgress => Loadable::InProgress,
            Self::Failed(error) => Loadable::Failed(error),
        }
    }
}

/// Fold one input into the running blocker.
///
/// Returns the input's value if it succeeded. An earlier blocker is only
/// replaced by a strictly higher-ranked one, which makes the leftmost input
/// win ties.
fn absorb<T, E>(blocker: &mut Option<Blocker<E>>, input: Loadable<T, E>) -> Option<T> {
    let next = match input {
        Loadable::Succeeded(value) => return Some(value),
        Loadable::NotStarted => Blocker::NotStarted,
        Loadable::InProgress => Blocker::InProgress,
        Loadable::Failed(error) => Blocker::Failed(error),
    };
    if blocker
        .as_ref()
        .is_none_or(|current| current.rank() < next.rank())
    {
        *blocker = Some(next);
    }
    None
}

/// Combine any number of same-typed loadables.
///
/// An empty input is `Succeeded(vec![])`. Iteration stops at the first
/// failure, since nothing after it can change the result.
///
/// ```
/// use toolbox_core::{Loadable, combine_all};
///
/// let pages: Vec<Loadable<u32, String>> = vec![
///     Loadable::Succeeded(1),
///     Loadable::InProgress,
///     Loadable::Succeeded(3),
/// ];
/// assert_eq!(combine_all(pages), Loadable::InProgress);
/// ```
pub fn combine_all<T, E, I>(inputs: I) -> Loadable<Vec<T>, E>
where
    I: IntoIterator<Item = Loadable<T, E>>,
{
    let mut blocker = None;
    let mut values = Vec::new();
    for input in inputs {
        match absorb(&mut blocker, input) {
            Some(value) if blocker.is_none() => values.push(value),
            _ => {}
        }
        if matches!(blocker, Some(Blocker::Failed(_))) {
            break;
        }
    }
    match blocker {
        Some(blocker) => blocker.into_loadable(),
        None => Loadable::Succeeded(values),
    }
}

impl<T, E> FromIterator<Loadable<T, E>> for Loadable<Vec<T>, E> {
    fn from_iter<I: IntoIterator<Item = Loadable<T, E>>>(iter: I) -> Self {
        combine_all(iter)
    }
}

/// Combine a tuple of loadables sharing an error type.
///
/// Implemented for tuples of arity 2 through 8.
///
/// ```
/// use toolbox_core::{Combine, Loadable};
///
/// let user: Loadable<&str, ()> = Loadable::Succeeded("ada");
/// let avatar: Loadable<Vec<u8>, ()> = Loadable::Succeeded(vec![0xff]);
/// let count: Loadable<u32, ()> = Loadable::Succeeded(3);
/// assert_eq!(
///     (user, avatar, count).combine(),
///     Loadable::Succeeded(("ada", vec![0xff], 3))
/// );
/// ```
pub trait Combine {
    type Output;
    type Error;

    fn combine(self) -> Loadable<Self::Output, Self::Error>;
}

macro_rules! impl_combine_for_tuple {
    ($($ty:ident => $val:ident),+) => {
        impl<E, $($ty),+> Combine for ($(Loadable<$ty, E>,)+) {
            type Output = ($($ty,)+);
            type Error = E;

            fn combine(self) -> Loadable<Self::Output, E> {
                let ($($val,)+) = self;
                let mut blocker = None;
                $(let $val = absorb(&mut blocker, $val);)+
                match (blocker, $($val,)+) {
                    (None, $(Some($val),)+) => Loadable::Succeeded(($($val,)+)),
                    (Some(blocker), ..) => blocker.into_loadable(),
                    (None, ..) => unreachable!("a missing value always records a blocker"),
                }
            }
        }
    };
}

impl_combine_for_tuple!(A => a, B => b);
impl_combine_for_tuple!(A => a, B => b, C => c);
impl_combine_for_tuple!(A => a, B => b, C => c, D => d);
impl_combine_for_tuple!(A => a, B => b, C => c, D => d, F => f);
impl_combine_for_tuple!(A => a, B => b, C => c, D => d, F => f, G => g);
impl_combine_for_tuple!(A => a, B => b, C => c, D => d, F => f, G => g, H => h);
impl_combine_for_tuple!(A => a, B => b, C => c, D => d, F => f, G => g, H => h, I => i);

pub fn combine2<A, B, E>(a: Loadable<A, E>, b: Loadable<B, E>) -> Loadable<(A, B), E> {
    (a, b).combine()
}

pub fn combine3<A, B, C, E>(
    a: Loadable<A, E>,
    b: Loadable<B, E>,
    c: Loadable<C, E>,
) -> Loadable<(A, B, C), E> {
    (a, b, c).combine()
}

pub fn combine4<A, B, C, D, E>(
    a: Loadable<A, E>,
    b: Loadable<B, E>,
    c: Loadable<C, E>,
    d: Loadable<D, E>,
) -> Loadable<(A, B, C, D), E> {
    (a, b, c, d).combine()
}
