#![forbid(unsafe_code)]

//! Loading-state sum type.
//!
//! [`Loadable<T, E>`] classifies a snapshot of an asynchronously produced
//! value: not started, in progress, succeeded with a `T`, or failed with an
//! `E`. The type enforces no transition order; producers push whatever state
//! is current and consumers render from it.
//!
//! Failures are data, not control flow. Combining several loadables (see
//! [`combine`]) surfaces the leftmost failure and never aggregates errors; to
//! merge errors, map them into one value before wrapping it in `Failed`.

pub mod combine;

pub use combine::{Combine, combine_all, combine2, combine3, combine4};

use std::fmt;

/// Payload-free classification of a [`Loadable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadStatus {
    #[default]
    NotStarted,
    InProgress,
    Succeeded,
    Failed,
}

impl LoadStatus {
    /// Stable lowercase name, suitable for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Rank used when combining states: the highest rank wins.
    ///
    /// `Failed` > `InProgress` > `NotStarted` > `Succeeded`.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Succeeded => 0,
            Self::NotStarted => 1,
            Self::InProgress => 2,
            Self::Failed => 3,
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The state of an asynchronously produced value.
///
/// `PartialEq` compares payloads structurally, errors included. Use
/// [`equals_using`](Loadable::equals_using) to compare values with a custom
/// predicate while treating any two failures as equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "content")
)]
pub enum Loadable<T, E> {
    NotStarted,
    InProgress,
    Succeeded(T),
    Failed(E),
}

impl<T, E> Default for Loadable<T, E> {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl<T, E> From<Result<T, E>> for Loadable<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Succeeded(value),
            Err(error) => Self::Failed(error),
        }
    }
}

impl<T, E> Loadable<T, E> {
    #[must_use]
    pub const fn status(&self) -> LoadStatus {
        match self {
            Self::NotStarted => LoadStatus::NotStarted,
            Self::InProgress => LoadStatus::InProgress,
            Self::Succeeded(_) => LoadStatus::Succeeded,
            Self::Failed(_) => LoadStatus::Failed,
        }
    }

    #[must_use]
    pub const fn is_not_started(&self) -> bool {
        matches!(self, Self::NotStarted)
    }

    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    #[must_use]
    pub const fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The value, if succeeded.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    /// The error, if failed.
    #[must_use]
    pub const fn error(&self) -> Option<&E> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_error(self) -> Option<E> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_ref(&self) -> Loadable<&T, &E> {
        match self {
            Self::NotStarted => Loadable::NotStarted,
            Self::InProgress => Loadable::InProgress,
            Self::Succeeded(value) => Loadable::Succeeded(value),
            Self::Failed(error) => Loadable::Failed(error),
        }
    }

    /// Transform the value of a `Succeeded` state. Every other state passes
    /// through; a failure keeps its original error.
    pub fn map<V>(self, f: impl FnOnce(T) -> V) -> Loadable<V, E> {
        match self {
            Self::NotStarted => Loadable::NotStarted,
            Self::InProgress => Loadable::InProgress,
            Self::Succeeded(value) => Loadable::Succeeded(f(value)),
            Self::Failed(error) => Loadable::Failed(error),
        }
    }

    /// Transform the error of a `Failed` state. Every other state passes
    /// through.
    pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> Loadable<T, F> {
        match self {
            Self::NotStarted => Loadable::NotStarted,
            Self::InProgress => Loadable::InProgress,
            Self::Succeeded(value) => Loadable::Succeeded(value),
            Self::Failed(error) => Loadable::Failed(f(error)),
        }
    }

    /// Compare two states, using `compare` only when both succeeded.
    ///
    /// Two `NotStarted`, two `InProgress`, or two `Failed` states are equal
    /// regardless of their errors. Different variants are never equal.
    pub fn equals_using(&self, other: &Self, compare: impl FnOnce(&T, &T) -> bool) -> bool {
        match (self, other) {
            (Self::NotStarted, Self::NotStarted)
            | (Self::InProgress, Self::InProgress)
            | (Self::Failed(_), Self::Failed(_)) => true,
            (Self::Succeeded(lhs), Self::Succeeded(rhs)) => compare(lhs, rhs),
            _ => false,
        }
    }

    /// Pair this state with another under the usual combination precedence.
    /// Shorthand for [`combine2`].
    pub fn zip<U>(self, other: Loadable<U, E>) -> Loadable<(T, U), E> {
        combine2(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type L = Loadable<i32, &'static str>;

    #[test]
    fn default_is_not_started() {
        assert!(L::default().is_not_started());
        assert_eq!(L::default().status(), LoadStatus::NotStarted);
    }

    #[test]
    fn queries_match_variant() {
        let ok: L = Loadable::Succeeded(3);
        assert!(ok.is_succeeded());
        assert_eq!(ok.value(), Some(&3));
        assert_eq!(ok.error(), None);

        let err: L = Loadable::Failed("boom");
        assert!(err.is_failed());
        assert_eq!(err.error(), Some(&"boom"));
        assert_eq!(err.value(), None);

        let busy: L = Loadable::InProgress;
        assert!(busy.is_in_progress());
        assert!(!busy.is_succeeded());
        assert_eq!(busy.value(), None);
    }

    #[test]
    fn map_only_touches_success() {
        let ok: L = Loadable::Succeeded(2);
        assert_eq!(ok.map(|v| v * 10), Loadable::Succeeded(20));

        let not_started: L = Loadable::NotStarted;
        assert_eq!(not_started.map(|v| v * 10), Loadable::NotStarted);

        let busy: L = Loadable::InProgress;
        assert_eq!(busy.map(|v| v * 10), Loadable::InProgress);

        let err: L = Loadable::Failed("boom");
        assert_eq!(err.map(|v| v * 10), Loadable::Failed("boom"));
    }

    #[test]
    fn map_can_change_type() {
        let ok: L = Loadable::Succeeded(7);
        let mapped: Loadable<String, &str> = ok.map(|v| v.to_string());
        assert_eq!(mapped.value().map(String::as_str), Some("7"));
    }

    #[test]
    fn map_err_only_touches_failure() {
        let err: L = Loadable::Failed("boom");
        assert_eq!(err.map_err(str::len), Loadable::Failed(4));

        let ok: L = Loadable::Succeeded(1);
        assert_eq!(ok.map_err(str::len), Loadable::Succeeded(1));
    }

    #[test]
    fn equals_using_cases() {
        let eq = |a: &i32, b: &i32| a == b;
        let one: L = Loadable::Succeeded(1);

        assert!(one.equals_using(&Loadable::Succeeded(1), eq));
        assert!(!one.equals_using(&Loadable::Succeeded(2), eq));
        assert!(!one.equals_using(&Loadable::Failed("e"), eq));
        assert!(L::Failed("e1").equals_using(&Loadable::Failed("e2"), eq));
        assert!(L::NotStarted.equals_using(&Loadable::NotStarted, eq));
        assert!(L::InProgress.equals_using(&Loadable::InProgress, eq));
        assert!(!L::InProgress.equals_using(&Loadable::NotStarted, eq));
    }

    #[test]
    fn equals_using_custom_predicate() {
        let a: Loadable<f64, ()> = Loadable::Succeeded(1.0);
        let b: Loadable<f64, ()> = Loadable::Succeeded(1.0 + 1e-12);
        assert!(a.equals_using(&b, |x, y| (x - y).abs() < 1e-9));
    }

    #[test]
    fn from_result() {
        let ok: L = Ok(5).into();
        assert_eq!(ok, Loadable::Succeeded(5));
        let err: L = Err("nope").into();
        assert_eq!(err, Loadable::Failed("nope"));
    }

    #[test]
    fn as_ref_and_into() {
        let ok: Loadable<String, ()> = Loadable::Succeeded("x".to_string());
        assert_eq!(ok.as_ref().map(String::len), Loadable::Succeeded(1));
        assert_eq!(ok.into_value().as_deref(), Some("x"));

        let err: Loadable<(), String> = Loadable::Failed("bad".to_string());
        assert_eq!(err.into_error().as_deref(), Some("bad"));
    }

    #[test]
    fn status_precedence_order() {
        assert!(LoadStatus::Failed.precedence() > LoadStatus::InProgress.precedence());
        assert!(LoadStatus::InProgress.precedence() > LoadStatus::NotStarted.precedence());
        assert!(LoadStatus::NotStarted.precedence() > LoadStatus::Succeeded.precedence());
        assert_eq!(LoadStatus::InProgress.to_string(), "in_progress");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_is_adjacently_tagged() {
        let ok: Loadable<u8, String> = Loadable::Succeeded(3);
        assert_eq!(
            serde_json::to_string(&ok).unwrap(),
            r#"{"type":"Succeeded","content":3}"#
        );
        let idle: Loadable<u8, String> = serde_json::from_str(r#"{"type":"NotStarted"}"#).unwrap();
        assert!(idle.is_not_started());
        assert_eq!(
            serde_json::to_string(&LoadStatus::InProgress).unwrap(),
            r#""InProgress""#
        );
    }

    #[test]
    fn zip_is_combine2() {
        let a: L = Loadable::Succeeded(1);
        assert_eq!(a.zip(Loadable::Succeeded(2)), Loadable::Succeeded((1, 2)));
    }
}
