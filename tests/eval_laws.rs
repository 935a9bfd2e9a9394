#![cfg(feature = "control")]
//! Property-based tests for Eval<A> laws.
//!
//! This module verifies that every evaluation strategy satisfies:
//!
//! - **Functor Laws**: identity and composition
//! - **Monad Laws**: left identity, right identity, associativity
//! - **Memoization**: memoize never changes the result
//! - **tail_rec_m**: agrees with a plain loop

use eval_trampoline::control::{Either, Eval};
use proptest::prelude::*;

/// Builds the same value through each constructor.
fn strategies(value: i32) -> Vec<Eval<i32>> {
    vec![
        Eval::now(value),
        Eval::later(move || value),
        Eval::always(move || value),
        Eval::defer(move || Eval::now(value)),
        Eval::defer(move || Eval::later(move || value)).map(|x| x),
        Eval::always(move || value).memoize(),
    ]
}

fn add_one(x: i32) -> Eval<i32> {
    Eval::later(move || x.wrapping_add(1))
}

fn double(x: i32) -> Eval<i32> {
    Eval::defer(move || Eval::now(x.wrapping_mul(2)))
}

// =============================================================================
// Functor Laws
// =============================================================================

proptest! {
    /// Identity: eval.map(|x| x) == eval
    #[test]
    fn prop_eval_functor_identity(value in any::<i32>()) {
        for eval in strategies(value) {
            prop_assert_eq!(eval.map(|x| x).value(), eval.value());
        }
    }
}

proptest! {
    /// Composition: eval.map(f).map(g) == eval.map(|x| g(f(x)))
    #[test]
    fn prop_eval_functor_composition(value in any::<i32>()) {
        let function1 = |x: i32| x.wrapping_add(1);
        let function2 = |x: i32| x.wrapping_mul(2);

        for eval in strategies(value) {
            let left = eval.map(function1).map(function2);
            let right = eval.map(move |x| function2(function1(x)));
            prop_assert_eq!(left.value(), right.value());
        }
    }
}

// =============================================================================
// Monad Laws
// =============================================================================

proptest! {
    /// Left Identity: Eval::now(a).flat_map(f) == f(a)
    #[test]
    fn prop_eval_monad_left_identity(value in any::<i32>()) {
        prop_assert_eq!(Eval::now(value).flat_map(add_one).value(), add_one(value).value());
        prop_assert_eq!(Eval::pure(value).flat_map(double).value(), double(value).value());
    }
}

proptest! {
    /// Right Identity: eval.flat_map(Eval::now) == eval
    #[test]
    fn prop_eval_monad_right_identity(value in any::<i32>()) {
        for eval in strategies(value) {
            prop_assert_eq!(eval.flat_map(Eval::now).value(), eval.value());
        }
    }
}

proptest! {
    /// Associativity: eval.flat_map(f).flat_map(g) == eval.flat_map(|x| f(x).flat_map(g))
    #[test]
    fn prop_eval_monad_associativity(value in any::<i32>()) {
        for eval in strategies(value) {
            let left = eval.flat_map(add_one).flat_map(double);
            let right = eval.flat_map(|x| add_one(x).flat_map(double));
            prop_assert_eq!(left.value(), right.value());
        }
    }
}

// =============================================================================
// Memoization
// =============================================================================

proptest! {
    /// memoize preserves the result of every strategy
    #[test]
    fn prop_eval_memoize_preserves_value(value in any::<i32>()) {
        for eval in strategies(value) {
            let composed = eval.flat_map(add_one);
            let memoized = composed.memoize();
            prop_assert_eq!(memoized.value(), composed.value());
            prop_assert!(memoized.is_evaluated());
        }
    }
}

proptest! {
    /// memoize is idempotent
    #[test]
    fn prop_eval_memoize_idempotent(value in any::<i32>()) {
        for eval in strategies(value) {
            let once = eval.map(|x| x).memoize();
            let twice = once.memoize();
            prop_assert!(Eval::ptr_eq(&once, &twice));
        }
    }
}

// =============================================================================
// Applicative / zip
// =============================================================================

proptest! {
    /// ap agrees with map
    #[test]
    fn prop_eval_ap_matches_map(value in any::<i32>(), offset in any::<i32>()) {
        let function = Eval::now(move |x: i32| x.wrapping_add(offset));
        prop_assert_eq!(
            Eval::now(value).ap(&function).value(),
            Eval::now(value).map(move |x| x.wrapping_add(offset)).value()
        );
    }
}

proptest! {
    /// zip pairs both results
    #[test]
    fn prop_eval_zip(left in any::<i32>(), right in any::<String>()) {
        let expected = (left, right.clone());
        let zipped = Eval::later(move || left).zip(&Eval::always(move || right.clone()));
        prop_assert_eq!(zipped.value(), expected);
    }
}

proptest! {
    /// replicate yields `count` copies
    #[test]
    fn prop_eval_replicate_length(value in any::<u8>(), count in 0usize..200) {
        let replicated = Eval::now(value).replicate(count).value();
        prop_assert_eq!(replicated, vec![value; count]);
    }
}

// =============================================================================
// tail_rec_m / iterate_right
// =============================================================================

proptest! {
    /// tail_rec_m(0, step to n) == Eval::now(n)
    #[test]
    fn prop_eval_tail_rec_m_counts_to_limit(limit in 0u32..5000) {
        let counted = Eval::tail_rec_m(0u32, move |index| {
            if index < limit {
                Eval::now(Either::Left(index + 1))
            } else {
                Eval::now(Either::Right(index))
            }
        });
        prop_assert_eq!(counted.value(), Eval::now(limit).value());
    }
}

proptest! {
    /// iterate_right agrees with Iterator::rfold
    #[test]
    fn prop_eval_iterate_right_matches_rfold(items in prop::collection::vec(any::<i64>(), 0..300)) {
        let expected = items
            .iter()
            .rfold(Vec::new(), |mut acc, item| {
                acc.push(*item);
                acc
            });
        let folded = Eval::iterate_right(items, Eval::now(Vec::new()), |item, rest| {
            rest.map(move |mut acc: Vec<i64>| {
                acc.push(item);
                acc
            })
        });
        prop_assert_eq!(folded.value(), expected);
    }
}
