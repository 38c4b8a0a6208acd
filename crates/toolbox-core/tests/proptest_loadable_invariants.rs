//! Property-based invariant tests for loadable combination.
//!
//! 1. `combine_all` picks the highest-precedence state.
//! 2. Among failures, the leftmost error wins.
//! 3. Success carries every value in input order.
//! 4. Tuple combinators agree with `combine_all` on status and payload.
//! 5. `map` preserves status and never touches errors.
//! 6. `equals_using` agrees with status equality when the predicate is `==`.

use proptest::prelude::*;
use toolbox_core::{Combine, LoadStatus, Loadable, combine_all};

// ── Strategies ────────────────────────────────────────────────────────────

fn loadable_strategy() -> impl Strategy<Value = Loadable<u8, u16>> {
    prop_oneof![
        Just(Loadable::NotStarted),
        Just(Loadable::InProgress),
        any::<u8>().prop_map(Loadable::Succeeded),
        any::<u16>().prop_map(Loadable::Failed),
    ]
}

fn inputs_strategy(max_len: usize) -> impl Strategy<Value = Vec<Loadable<u8, u16>>> {
    proptest::collection::vec(loadable_strategy(), 0..=max_len)
}

// ── Reference model ───────────────────────────────────────────────────────

fn reference(inputs: &[Loadable<u8, u16>]) -> Loadable<Vec<u8>, u16> {
    if let Some(error) = inputs.iter().find_map(|l| l.error()) {
        return Loadable::Failed(*error);
    }
    if inputs.iter().any(Loadable::is_in_progress) {
        return Loadable::InProgress;
    }
    if inputs.iter().any(Loadable::is_not_started) {
        return Loadable::NotStarted;
    }
    Loadable::Succeeded(inputs.iter().filter_map(|l| l.value().copied()).collect())
}

proptest! {
    #[test]
    fn combine_all_matches_reference(inputs in inputs_strategy(12)) {
        prop_assert_eq!(combine_all(inputs.clone()), reference(&inputs));
    }

    #[test]
    fn combine_all_status_is_max_precedence(inputs in inputs_strategy(12)) {
        let expected = inputs
            .iter()
            .map(Loadable::status)
            .max_by_key(|s| s.precedence())
            .unwrap_or(LoadStatus::Succeeded);
        prop_assert_eq!(combine_all(inputs).status(), expected);
    }

    #[test]
    fn tuple2_agrees_with_combine_all(a in loadable_strategy(), b in loadable_strategy()) {
        let joined = (a.clone(), b.clone()).combine().map(|(x, y)| vec![x, y]);
        prop_assert_eq!(joined, combine_all(vec![a, b]));
    }

    #[test]
    fn tuple3_agrees_with_combine_all(
        a in loadable_strategy(),
        b in loadable_strategy(),
        c in loadable_strategy(),
    ) {
        let joined = (a.clone(), b.clone(), c.clone())
            .combine()
            .map(|(x, y, z)| vec![x, y, z]);
        prop_assert_eq!(joined, combine_all(vec![a, b, c]));
    }

    #[test]
    fn tuple4_agrees_with_combine_all(
        a in loadable_strategy(),
        b in loadable_strategy(),
        c in loadable_strategy(),
        d in loadable_strategy(),
    ) {
        let joined = (a.clone(), b.clone(), c.clone(), d.clone())
            .combine()
            .map(|(w, x, y, z)| vec![w, x, y, z]);
        prop_assert_eq!(joined, combine_all(vec![a, b, c, d]));
    }

    #[test]
    fn map_preserves_status(input in loadable_strategy()) {
        let status = input.status();
        let error = input.error().copied();
        let mapped = input.map(u32::from);
        prop_assert_eq!(mapped.status(), status);
        prop_assert_eq!(mapped.error().copied(), error);
    }

    #[test]
    fn equals_using_tracks_status(a in loadable_strategy(), b in loadable_strategy()) {
        let equal = a.equals_using(&b, |x, y| x == y);
        match (&a, &b) {
            (Loadable::Succeeded(x), Loadable::Succeeded(y)) => prop_assert_eq!(equal, x == y),
            _ => prop_assert_eq!(equal, a.status() == b.status()),
        }
    }
}
