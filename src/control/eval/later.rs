//! Memoization cells behind `Later` and memoized compositions.
//!
//! Both cells cache on success only. A thunk that panics leaves the cell
//! pending, so the next force runs it again.

use std::cell::{OnceCell, Ref, RefCell};
use std::rc::Rc;

use super::Thunk;
use super::teardown::Teardown;
use super::trampoline::Step;

/// The internal state of a [`LaterCell`].
enum LaterState<A> {
    /// Not forced yet (or every force so far panicked).
    Pending(Thunk<A>),
    /// Forced; the thunk has been released.
    Ready(A),
}

/// Storage of a `Later` node: a thunk run at most once.
pub(super) struct LaterCell<A> {
    state: RefCell<LaterState<A>>,
}

impl<A> LaterCell<A> {
    pub(super) fn new(thunk: Thunk<A>) -> Self {
        Self {
            state: RefCell::new(LaterState::Pending(thunk)),
        }
    }

    pub(super) fn is_ready(&self) -> bool {
        matches!(&*self.state.borrow(), LaterState::Ready(_))
    }

    /// Returns the cached value without forcing.
    pub(super) fn peek(&self) -> Option<Ref<'_, A>> {
        Ref::filter_map(self.state.borrow(), |state| match state {
            LaterState::Ready(value) => Some(value),
            LaterState::Pending(_) => None,
        })
        .ok()
    }
}

impl<A: Clone> LaterCell<A> {
    /// Returns the cached value, running the thunk first if needed.
    ///
    /// The borrow is released while the thunk runs, so a thunk may force
    /// other values (or panic) without poisoning the cell.
    pub(super) fn force(&self) -> A {
        let thunk = match &*self.state.borrow() {
            LaterState::Ready(value) => return value.clone(),
            LaterState::Pending(thunk) => Rc::clone(thunk),
        };

        let value = thunk();

        let mut state = self.state.borrow_mut();
        if let LaterState::Ready(existing) = &*state {
            // A re-entrant force finished first; keep its result.
            return existing.clone();
        }
        *state = LaterState::Ready(value.clone());
        value
    }
}

/// Storage of a memoized `Call`/`Compute`: the erased source node and a
/// cache shared with the trampoline's fill continuation.
pub(super) struct Memo<A> {
    source: Rc<dyn Step>,
    cache: Rc<OnceCell<A>>,
}

impl<A> Memo<A> {
    pub(super) fn new(source: Rc<dyn Step>) -> Self {
        Self {
            source,
            cache: Rc::new(OnceCell::new()),
        }
    }

    pub(super) fn source(&self) -> Rc<dyn Step> {
        Rc::clone(&self.source)
    }

    pub(super) fn cache(&self) -> Rc<OnceCell<A>> {
        Rc::clone(&self.cache)
    }

    pub(super) fn peek(&self) -> Option<&A> {
        self.cache.get()
    }

    pub(super) fn is_ready(&self) -> bool {
        self.cache.get().is_some()
    }

    pub(super) fn disown(&mut self, orphans: &mut Vec<Rc<dyn Teardown>>) {
        orphans.push(std::mem::replace::<Rc<dyn Step>>(&mut self.source, super::trampoline::inert()));
    }
}

impl<A: Clone> Memo<A> {
    pub(super) fn cached(&self) -> Option<A> {
        self.cache.get().cloned()
    }
}
