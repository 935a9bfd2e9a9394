//! Bind links (`Compute` nodes) and `Call` collapsing.
//!
//! A bind link hides the intermediate type `S` of `source.flat_map(f)`:
//! `start` hands the trampoline the erased source, `run` takes the erased
//! intermediate value back, downcasts it to `S` and applies `f`.

use std::marker::PhantomData;
use std::rc::Rc;

use super::teardown::Teardown;
use super::trampoline::{Cursor, Step, Value, inert};
use super::{Eval, Node};

/// One link of a `flat_map` chain.
pub(super) trait Bind<A: 'static> {
    /// The computation whose result feeds [`Bind::run`].
    fn start(&self) -> Cursor;

    /// Continues with the value produced by [`Bind::start`].
    ///
    /// # Panics
    ///
    /// Panics if `value` is not of the type the link was built for, which
    /// would be a bug in the trampoline.
    fn run(&self, value: Value) -> Eval<A>;

    /// Hands owned child nodes over to the iterative destructor.
    fn disown(&mut self, orphans: &mut Vec<Rc<dyn Teardown>>);
}

/// Where a [`Chain`] gets its intermediate value from.
pub(super) enum Origin {
    /// Any node other than `Call`; the trampoline decomposes it.
    Node(Rc<dyn Step>),
    /// The thunk of a `Call` receiver, unwrapped one level on `start`.
    Deferred(Rc<dyn Fn() -> Cursor>),
}

/// The link built by `flat_map`.
pub(super) struct Chain<S, A, F> {
    origin: Origin,
    function: F,
    _phantom: PhantomData<fn(S) -> A>,
}

impl<S, A, F> Chain<S, A, F> {
    pub(super) const fn new(origin: Origin, function: F) -> Self {
        Self {
            origin,
            function,
            _phantom: PhantomData,
        }
    }
}

impl<S: 'static, A: 'static, F> Bind<A> for Chain<S, A, F>
where
    F: Fn(S) -> Eval<A>,
{
    fn start(&self) -> Cursor {
        match &self.origin {
            Origin::Node(node) => Cursor::Node(Rc::clone(node)),
            Origin::Deferred(thunk) => thunk(),
        }
    }

    fn run(&self, value: Value) -> Eval<A> {
        let value = *value
            .downcast::<S>()
            .expect("Type mismatch in bind continuation");
        (self.function)(value)
    }

    fn disown(&mut self, orphans: &mut Vec<Rc<dyn Teardown>>) {
        if let Origin::Node(node) = &mut self.origin {
            orphans.push(std::mem::replace::<Rc<dyn Step>>(node, inert()));
        }
    }
}

/// A link whose every result is passed through [`collapse`] again.
struct Collapsed<A: 'static> {
    inner: Rc<dyn Bind<A>>,
}

impl<A: Clone + 'static> Bind<A> for Collapsed<A> {
    fn start(&self) -> Cursor {
        self.inner.start()
    }

    fn run(&self, value: Value) -> Eval<A> {
        collapse(self.inner.run(value))
    }

    fn disown(&mut self, orphans: &mut Vec<Rc<dyn Teardown>>) {
        if let Some(inner) = Rc::get_mut(&mut self.inner) {
            inner.disown(orphans);
        }
    }
}

/// Unwraps leading `Call` nodes without recursing.
///
/// A `Compute` reached this way is rewrapped so that the `Eval` each of its
/// steps produces is collapsed as well.
pub(super) fn collapse<A: Clone + 'static>(eval: Eval<A>) -> Eval<A> {
    let mut current = eval;
    loop {
        let next = match &*current.node {
            Node::Call(thunk) => thunk(),
            Node::Compute(bind) => {
                let inner = Rc::clone(bind);
                return Eval::from_node(Node::Compute(Rc::new(Collapsed { inner })));
            }
            _ => break,
        };
        current = next;
    }
    current
}
