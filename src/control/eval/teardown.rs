//! Iterative destruction of `Eval` graphs.
//!
//! Destroying a node drops its closures, and a closure may own further `Eval`
//! handles (a `defer` thunk capturing the previous link of a chain, say).
//! Dropped naively that recurses once per link. Instead, while one drop is in
//! progress on a thread, every other uniquely owned node released along the
//! way is parked on a per-thread list and destroyed by the outermost drop in a
//! loop.

use std::cell::RefCell;
use std::rc::Rc;

/// A node whose owned children can be unlinked before it is destroyed.
pub(super) trait Teardown {
    /// Moves uniquely owned child nodes onto `orphans`.
    fn disown(&mut self, orphans: &mut Vec<Rc<dyn Teardown>>);
}

thread_local! {
    /// `Some` while a [`Drain`] is active on this thread.
    static PARKED: RefCell<Option<Vec<Rc<dyn Teardown>>>> = const { RefCell::new(None) };
}

/// Returns `true` if an outer drop is already destroying nodes on this thread.
pub(super) fn is_draining() -> bool {
    PARKED
        .try_with(|parked| parked.borrow().is_some())
        .unwrap_or(false)
}

/// Hands `node` to the active drain.
///
/// Callers check [`is_draining`] first. Without an active drain (or once
/// thread-local storage is gone) `node` is simply dropped.
pub(super) fn park(node: Rc<dyn Teardown>) {
    let _ = PARKED.try_with(move |parked| {
        if let Some(list) = parked.borrow_mut().as_mut() {
            list.push(node);
        }
    });
}

/// The outermost drop on a thread.
///
/// Parking is enabled from [`Drain::begin`] until the drain is dropped, also
/// when a destructor panics halfway.
pub(super) struct Drain {
    orphans: Vec<Rc<dyn Teardown>>,
}

impl Drain {
    pub(super) fn begin() -> Self {
        let _ = PARKED.try_with(|parked| *parked.borrow_mut() = Some(Vec::new()));
        Self {
            orphans: Vec::new(),
        }
    }

    pub(super) const fn orphans(&mut self) -> &mut Vec<Rc<dyn Teardown>> {
        &mut self.orphans
    }

    /// Destroys every orphan and everything parked meanwhile.
    pub(super) fn run(mut self) {
        loop {
            self.collect_parked();
            let Some(mut node) = self.orphans.pop() else {
                break;
            };
            if let Some(inner) = Rc::get_mut(&mut node) {
                inner.disown(&mut self.orphans);
            }
            drop(node);
        }
    }

    fn collect_parked(&mut self) {
        let orphans = &mut self.orphans;
        let _ = PARKED.try_with(|parked| {
            if let Some(list) = parked.borrow_mut().as_mut() {
                orphans.append(list);
            }
        });
    }
}

impl Drop for Drain {
    fn drop(&mut self) {
        let _ = PARKED.try_with(|parked| parked.borrow_mut().take());
    }
}
