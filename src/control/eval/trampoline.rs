//! The evaluation loop.
//!
//! Every node is viewed through the object-safe [`Step`] trait, which erases
//! its result type. Forcing a composition then becomes a loop over a
//! [`Cursor`] and a [`ContinuationStack`]:
//!
//! - a `Compute` node has its `start` peeled. A left-nested `Compute` start
//!   pushes both `run` steps and continues with the inner start, which turns
//!   `((a >>= f) >>= g) >>= h` into the linear stack `[h, g, f]`.
//! - a `Call` node is replaced by the node its thunk returns.
//! - a leaf is forced and its value handed to the top continuation.
//!
//! Each iteration either shrinks the current node or pops a continuation, so
//! the loop terminates after a number of steps linear in the number of bind
//! links, using constant native stack.

use std::any::Any;
use std::rc::Rc;

use super::continuation_stack::{Arrow, ContinuationStack};
use super::teardown::Teardown;
use super::{Node, RELEASED};

/// An intermediate result crossing a type-erased boundary.
pub(super) type Value = Box<dyn Any>;

/// What the loop is currently looking at.
pub(super) enum Cursor {
    /// A node that still has to be inspected.
    Node(Rc<dyn Step>),
    /// An already produced value (a filled memo cell, a finished leaf).
    Ready(Value),
}

impl Cursor {
    fn shape(self) -> Shape {
        match self {
            Self::Node(node) => node.shape(),
            Self::Ready(value) => Shape::Ready(value),
        }
    }
}

/// One decomposition step of a node.
pub(super) enum Shape {
    /// A leaf, forced.
    Ready(Value),
    /// A `Call`, with its thunk already run.
    Defer(Cursor),
    /// A bind link.
    Compute { start: Cursor, run: Arrow },
    /// A memoized node whose cache is still empty. `fill` stores the value
    /// produced by `source` and passes it on.
    Memoize { source: Cursor, fill: Arrow },
}

/// The type-erased view of an `Eval` node.
pub(super) trait Step: Teardown {
    /// Decomposes the node. Leaves are forced by this call.
    fn shape(&self) -> Shape;
}

impl<A: Clone + 'static> Step for Node<A> {
    fn shape(&self) -> Shape {
        match self {
            Self::Now(value) => Shape::Ready(Box::new(value.clone())),
            Self::Later(cell) => Shape::Ready(Box::new(cell.force())),
            Self::Always(thunk) => Shape::Ready(Box::new(thunk())),
            Self::Call(thunk) => Shape::Defer(thunk().cursor()),
            Self::Compute(bind) => {
                let start = bind.start();
                let bind = Rc::clone(bind);
                Shape::Compute {
                    start,
                    run: Box::new(move |value: Value| bind.run(value).cursor()),
                }
            }
            Self::Memoize(memo) => match memo.cached() {
                Some(value) => Shape::Ready(Box::new(value)),
                None => {
                    let cache = memo.cache();
                    Shape::Memoize {
                        source: Cursor::Node(memo.source()),
                        fill: Box::new(move |value: Value| {
                            let value = *value
                                .downcast::<A>()
                                .expect("Type mismatch in memoized value");
                            #[cfg(feature = "tracing")]
                            tracing::trace!("memoized composition cached");
                            Cursor::Ready(Box::new(cache.get_or_init(|| value).clone()))
                        }),
                    }
                }
            },
            Self::Released => unreachable!("{RELEASED}"),
        }
    }
}

/// A node with no children, left behind in a link that is being torn down.
pub(super) fn inert() -> Rc<dyn Step> {
    Rc::new(Node::<()>::Now(()))
}

/// Forces `root` to completion.
///
/// # Panics
///
/// Propagates any panic raised by a thunk or continuation. Panics on an
/// internal type mismatch, which would be a bug in the bind links.
pub(super) fn evaluate<A: 'static>(root: Cursor) -> A {
    #[cfg(feature = "tracing")]
    let _span = tracing::trace_span!("eval.evaluate").entered();

    let mut current = root;
    let mut stack = ContinuationStack::new();
    let mut steps: usize = 0;

    let result = loop {
        steps += 1;
        match current.shape() {
            Shape::Compute { start, run } => match start.shape() {
                Shape::Compute {
                    start: inner_start,
                    run: inner_run,
                } => {
                    stack.push(run);
                    stack.push(inner_run);
                    current = inner_start;
                }
                Shape::Defer(next) => {
                    stack.push(run);
                    current = next;
                }
                Shape::Memoize { source, fill } => {
                    stack.push(run);
                    stack.push(fill);
                    current = source;
                }
                Shape::Ready(value) => current = run(value),
            },
            Shape::Defer(next) => current = next,
            Shape::Memoize { source, fill } => {
                stack.push(fill);
                current = source;
            }
            Shape::Ready(value) => match stack.pop() {
                Some(arrow) => current = arrow(value),
                None => break value,
            },
        }
    };

    report(steps, &stack);

    *result
        .downcast::<A>()
        .expect("Type mismatch in evaluated result")
}

#[cfg(feature = "tracing")]
fn report(steps: usize, stack: &ContinuationStack) {
    tracing::trace!(steps, deepest = stack.deepest(), "evaluation finished");
}

#[cfg(not(feature = "tracing"))]
const fn report(_steps: usize, _stack: &ContinuationStack) {}
