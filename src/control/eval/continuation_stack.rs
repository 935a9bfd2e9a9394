//! The explicit call stack of the evaluation loop.
//!
//! Pending `run` steps are stored as type-erased arrows and resumed in LIFO
//! order: the most recently pushed continuation belongs to the innermost
//! bind and must see its value first.

use smallvec::SmallVec;

use super::trampoline::{Cursor, Value};

/// A type-erased continuation: receives the boxed intermediate value and
/// returns the next node to evaluate.
pub(super) type Arrow = Box<dyn FnOnce(Value) -> Cursor>;

/// Inline capacity; shallow compositions never touch the heap for their
/// continuation stack.
const CONTINUATION_INLINE_CAPACITY: usize = 8;

/// LIFO stack of pending continuations.
pub(super) struct ContinuationStack {
    arrows: SmallVec<[Arrow; CONTINUATION_INLINE_CAPACITY]>,
    deepest: usize,
}

impl ContinuationStack {
    #[inline]
    pub(super) fn new() -> Self {
        Self {
            arrows: SmallVec::new(),
            deepest: 0,
        }
    }

    #[inline]
    pub(super) fn push(&mut self, arrow: Arrow) {
        self.arrows.push(arrow);
        self.deepest = self.deepest.max(self.arrows.len());
    }

    #[inline]
    pub(super) fn pop(&mut self) -> Option<Arrow> {
        self.arrows.pop()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.arrows.len()
    }

    /// The largest number of continuations held at once.
    #[inline]
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(super) const fn deepest(&self) -> usize {
        self.deepest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn adding(amount: i32) -> Arrow {
        Box::new(move |input: Value| {
            let value = *input.downcast::<i32>().expect("expected i32");
            Cursor::Ready(Box::new(value + amount))
        })
    }

    fn ready_i32(cursor: Cursor) -> i32 {
        match cursor {
            Cursor::Ready(value) => *value.downcast::<i32>().expect("expected i32"),
            Cursor::Node(_) => panic!("expected a ready value"),
        }
    }

    #[rstest]
    fn continuation_stack_new_is_empty() {
        let mut stack = ContinuationStack::new();
        assert_eq!(stack.len(), 0);
        assert!(stack.pop().is_none());
    }

    #[rstest]
    fn continuation_stack_pops_in_lifo_order() {
        let mut stack = ContinuationStack::new();
        stack.push(adding(1));
        stack.push(adding(10));
        stack.push(adding(100));

        assert_eq!(ready_i32(stack.pop().unwrap()(Box::new(0_i32))), 100);
        assert_eq!(ready_i32(stack.pop().unwrap()(Box::new(0_i32))), 10);
        assert_eq!(ready_i32(stack.pop().unwrap()(Box::new(0_i32))), 1);
        assert!(stack.pop().is_none());
    }

    #[rstest]
    fn continuation_stack_tracks_deepest_point_past_inline_capacity() {
        let mut stack = ContinuationStack::new();
        for amount in 0..20 {
            stack.push(adding(amount));
        }
        for _ in 0..15 {
            stack.pop();
        }
        stack.push(adding(0));

        assert_eq!(stack.len(), 6);
        assert_eq!(stack.deepest(), 20);
    }
}
