//! Stack-safe lazy evaluation.
//!
//! This module provides [`Eval<A>`], a computation producing an `A` whose
//! evaluation strategy is chosen at construction time:
//!
//! | constructor       | forced how often          |
//! |-------------------|---------------------------|
//! | [`Eval::now`]     | already computed          |
//! | [`Eval::later`]   | at most once, then cached |
//! | [`Eval::always`]  | on every `value()`        |
//! | [`Eval::defer`]   | on every `value()`, yields another `Eval` |
//!
//! `map` and `flat_map` only build a tree of bind links. [`Eval::value`]
//! walks that tree with an explicit continuation stack instead of the native
//! call stack, so arbitrarily deep compositions evaluate in constant stack
//! space.
//!
//! # Examples
//!
//! ```rust
//! use eval_trampoline::control::Eval;
//!
//! fn even(n: u64) -> Eval<bool> {
//!     if n == 0 { Eval::now(true) } else { Eval::defer(move || odd(n - 1)) }
//! }
//!
//! fn odd(n: u64) -> Eval<bool> {
//!     if n == 0 { Eval::now(false) } else { Eval::defer(move || even(n - 1)) }
//! }
//!
//! assert!(even(200_000).value());
//! ```
//!
//! # Threading
//!
//! `Eval` shares its nodes through `Rc` and is therefore neither `Send` nor
//! `Sync`. A `Later` node forced from several places on one thread still runs
//! its thunk at most once.

mod bind;
mod combinators;
mod continuation_stack;
mod later;
mod teardown;
mod trampoline;

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use super::error::EvalError;
use bind::{Bind, Chain, Origin};
use later::{LaterCell, Memo};
use teardown::{Drain, Teardown};
use trampoline::{Cursor, Step};

type Thunk<A> = Rc<dyn Fn() -> A>;

/// The shape of an `Eval` node.
///
/// Returned by [`Eval::kind`]. A memoized composition reports `Later`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalKind {
    /// An eagerly held value.
    Now,
    /// A lazily computed value that is cached after the first force.
    Later,
    /// A lazily computed value that is recomputed on every force.
    Always,
    /// A suspended step that yields another `Eval`.
    Call,
    /// A bind link produced by `map` / `flat_map`.
    Compute,
}

/// The node variants behind an `Eval` handle.
enum Node<A: 'static> {
    Now(A),
    Later(LaterCell<A>),
    Always(Thunk<A>),
    Call(Thunk<Eval<A>>),
    Compute(Rc<dyn Bind<A>>),
    Memoize(Memo<A>),
    /// Left behind by the destructor of the last handle; never observed.
    Released,
}

impl<A: 'static> Node<A> {
    /// Moves owned child nodes onto `orphans` so they can be dropped
    /// without recursing.
    fn detach_children(&mut self, orphans: &mut Vec<Rc<dyn Teardown>>) {
        match self {
            Self::Compute(bind) => {
                if let Some(bind) = Rc::get_mut(bind) {
                    bind.disown(orphans);
                }
            }
            Self::Memoize(memo) => memo.disown(orphans),
            Self::Now(_) | Self::Later(_) | Self::Always(_) | Self::Call(_) | Self::Released => {}
        }
    }
}

impl<A: 'static> Teardown for Node<A> {
    fn disown(&mut self, orphans: &mut Vec<Rc<dyn Teardown>>) {
        self.detach_children(orphans);
    }
}

const RELEASED: &str = "released Eval node observed through a live handle";

/// A lazily evaluated, stack-safe computation producing an `A`.
///
/// `Eval` is a cheap handle: cloning it shares the underlying node, so a
/// cloned `later` value still runs its thunk at most once.
///
/// # Laws
///
/// - **Left Identity**: `Eval::now(a).flat_map(f).value() == f(a).value()`
/// - **Right Identity**: `m.flat_map(Eval::now).value() == m.value()`
/// - **Associativity**: `m.flat_map(f).flat_map(g).value() == m.flat_map(|x| f(x).flat_map(g)).value()`
///
/// # Examples
///
/// ```rust
/// use eval_trampoline::control::Eval;
///
/// let answer = Eval::now(20)
///     .map(|x| x + 1)
///     .flat_map(|x| Eval::later(move || x * 2));
/// assert_eq!(answer.value(), 42);
/// ```
pub struct Eval<A: 'static> {
    node: Rc<Node<A>>,
}

static_assertions::assert_not_impl_any!(Eval<i32>: Send, Sync);

impl<A: 'static> Eval<A> {
    fn from_node(node: Node<A>) -> Self {
        Self {
            node: Rc::new(node),
        }
    }

    /// Returns `true` if both handles point at the same node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eval_trampoline::control::Eval;
    ///
    /// let later = Eval::later(|| 1);
    /// assert!(Eval::ptr_eq(&later, &later.memoize()));
    /// ```
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.node, &other.node)
    }

    /// Reports which kind of node this handle points at.
    pub fn kind(&self) -> EvalKind {
        match &*self.node {
            Node::Now(_) => EvalKind::Now,
            Node::Later(_) | Node::Memoize(_) => EvalKind::Later,
            Node::Always(_) => EvalKind::Always,
            Node::Call(_) => EvalKind::Call,
            Node::Compute(_) => EvalKind::Compute,
            Node::Released => unreachable!("{RELEASED}"),
        }
    }

    /// Returns `true` if forcing this value would not run any computation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eval_trampoline::control::Eval;
    ///
    /// let later = Eval::later(|| 42);
    /// assert!(!later.is_evaluated());
    /// later.value();
    /// assert!(later.is_evaluated());
    /// ```
    pub fn is_evaluated(&self) -> bool {
        match &*self.node {
            Node::Now(_) => true,
            Node::Later(cell) => cell.is_ready(),
            Node::Memoize(memo) => memo.is_ready(),
            Node::Always(_) | Node::Call(_) | Node::Compute(_) => false,
            Node::Released => unreachable!("{RELEASED}"),
        }
    }
}

impl<A: Clone + 'static> Eval<A> {
    /// Wraps an already computed value.
    #[inline]
    pub fn now(value: A) -> Self {
        Self::from_node(Node::Now(value))
    }

    /// Alias for [`Eval::now`].
    #[inline]
    pub fn pure(value: A) -> Self {
        Self::now(value)
    }

    /// Creates a value computed on first access and cached afterwards.
    ///
    /// If `thunk` panics nothing is cached and the next `value()` call runs
    /// it again.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eval_trampoline::control::Eval;
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// let calls = Rc::new(Cell::new(0));
    /// let counter = Rc::clone(&calls);
    /// let later = Eval::later(move || {
    ///     counter.set(counter.get() + 1);
    ///     "computed"
    /// });
    ///
    /// assert_eq!(calls.get(), 0);
    /// assert_eq!(later.value(), "computed");
    /// assert_eq!(later.value(), "computed");
    /// assert_eq!(calls.get(), 1);
    /// ```
    pub fn later<F>(thunk: F) -> Self
    where
        F: Fn() -> A + 'static,
    {
        Self::from_node(Node::Later(LaterCell::new(Rc::new(thunk))))
    }

    /// Creates a value recomputed on every access.
    pub fn always<F>(thunk: F) -> Self
    where
        F: Fn() -> A + 'static,
    {
        Self::from_node(Node::Always(Rc::new(thunk)))
    }

    /// Suspends the construction of another `Eval`.
    ///
    /// The thunk runs on every `value()` call of the result. Chains of
    /// nested `defer` are unwound iteratively, which makes `defer` the tool
    /// for writing recursive `Eval` producers.
    pub fn defer<F>(thunk: F) -> Self
    where
        F: Fn() -> Self + 'static,
    {
        Self::from_node(Node::Call(Rc::new(thunk)))
    }

    /// Creates a value that panics with `payload` when forced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eval_trampoline::control::Eval;
    ///
    /// let failing: Eval<u8> = Eval::raise("unreachable state");
    /// assert!(failing.try_value().is_err());
    /// ```
    pub fn raise<P>(payload: P) -> Self
    where
        P: Clone + Send + 'static,
    {
        Self::defer(move || std::panic::panic_any(payload.clone()))
    }

    /// Forces the computation and returns its result.
    ///
    /// Runs in constant native stack space regardless of how deeply the
    /// value was composed. A panic raised by any thunk or continuation
    /// propagates to the caller unchanged.
    pub fn value(&self) -> A {
        match &*self.node {
            Node::Now(value) => value.clone(),
            Node::Later(cell) => cell.force(),
            Node::Always(thunk) => thunk(),
            Node::Call(_) => trampoline::evaluate(bind::collapse(self.clone()).cursor()),
            Node::Memoize(memo) => memo
                .cached()
                .unwrap_or_else(|| trampoline::evaluate(self.cursor())),
            Node::Compute(_) => trampoline::evaluate(self.cursor()),
            Node::Released => unreachable!("{RELEASED}"),
        }
    }

    /// Forces the computation, reporting a panic as an [`EvalError`].
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Panicked`] if a thunk or continuation panicked.
    /// Memoized nodes touched by the failed run stay unfilled.
    pub fn try_value(&self) -> Result<A, EvalError> {
        catch_unwind(AssertUnwindSafe(|| self.value())).map_err(EvalError::from_panic)
    }

    /// Returns a version of this value that is computed at most once.
    ///
    /// - `now`, `later` and already memoized values are returned as is
    /// - `always` becomes a `later` sharing the same thunk
    /// - `defer` and composed values are wrapped so that the first `value()`
    ///   runs the full computation and caches it
    ///
    /// Nothing is forced by this call.
    pub fn memoize(&self) -> Self {
        match &*self.node {
            Node::Now(_) | Node::Later(_) | Node::Memoize(_) => self.clone(),
            Node::Always(thunk) => Self::from_node(Node::Later(LaterCell::new(Rc::clone(thunk)))),
            Node::Call(_) | Node::Compute(_) => Self::from_node(Node::Memoize(Memo::new(self.step()))),
            Node::Released => unreachable!("{RELEASED}"),
        }
    }

    /// Applies `function` to the result.
    ///
    /// `function` runs each time the result is forced; wrap the result in
    /// [`Eval::memoize`] to run it once.
    pub fn map<B, F>(&self, function: F) -> Eval<B>
    where
        B: Clone + 'static,
        F: Fn(A) -> B + 'static,
    {
        self.flat_map(move |value| Eval::now(function(value)))
    }

    /// Sequences a computation that depends on the result.
    ///
    /// Construction is O(1) and forces nothing.
    pub fn flat_map<B, F>(&self, function: F) -> Eval<B>
    where
        B: Clone + 'static,
        F: Fn(A) -> Eval<B> + 'static,
    {
        let origin = match &*self.node {
            Node::Call(thunk) => {
                let thunk = Rc::clone(thunk);
                Origin::Deferred(Rc::new(move || thunk().cursor()))
            }
            _ => Origin::Node(self.step()),
        };
        Eval::from_node(Node::Compute(Rc::new(Chain::new(origin, function))))
    }

    /// Alias for [`Eval::flat_map`].
    #[inline]
    pub fn and_then<B, F>(&self, function: F) -> Eval<B>
    where
        B: Clone + 'static,
        F: Fn(A) -> Eval<B> + 'static,
    {
        self.flat_map(function)
    }

    /// Runs this computation, discards its result and continues with `next`.
    pub fn then<B: Clone + 'static>(&self, next: Eval<B>) -> Eval<B> {
        self.flat_map(move |_| next.clone())
    }

    fn step(&self) -> Rc<dyn Step> {
        Rc::clone(&self.node) as Rc<dyn Step>
    }

    fn cursor(&self) -> Cursor {
        Cursor::Node(self.step())
    }
}

thread_local! {
    static UNIT: Eval<()> = Eval::now(());
    static TRUE: Eval<bool> = Eval::now(true);
    static FALSE: Eval<bool> = Eval::now(false);
    static ZERO: Eval<i32> = Eval::now(0);
    static ONE: Eval<i32> = Eval::now(1);
}

impl Eval<()> {
    /// The shared `Eval::now(())` instance of the current thread.
    pub fn unit() -> Self {
        UNIT.with(Self::clone)
    }
}

impl Eval<bool> {
    /// The shared `Eval::now(true)` instance of the current thread.
    pub fn true_value() -> Self {
        TRUE.with(Self::clone)
    }

    /// The shared `Eval::now(false)` instance of the current thread.
    pub fn false_value() -> Self {
        FALSE.with(Self::clone)
    }
}

impl Eval<i32> {
    /// The shared `Eval::now(0)` instance of the current thread.
    pub fn zero() -> Self {
        ZERO.with(Self::clone)
    }

    /// The shared `Eval::now(1)` instance of the current thread.
    pub fn one() -> Self {
        ONE.with(Self::clone)
    }
}

impl<A: 'static> Clone for Eval<A> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

// A long chain owns its links through a linear chain of `Rc`s, either
// directly (`Compute` sources) or through closures (`defer` thunks). The last
// handle of the outermost node takes the node apart inside a `Drain`; every
// node released while it runs is parked and destroyed by the same loop.
impl<A: 'static> Drop for Eval<A> {
    fn drop(&mut self) {
        let Some(node) = Rc::get_mut(&mut self.node) else {
            return;
        };
        if teardown::is_draining() {
            teardown::park(Rc::clone(&self.node) as Rc<dyn Teardown>);
            return;
        }
        let mut released = std::mem::replace(node, Node::Released);
        let mut drain = Drain::begin();
        released.detach_children(drain.orphans());
        drop(released);
        drain.run();
    }
}

impl<A: fmt::Debug + 'static> fmt::Debug for Eval<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.node {
            Node::Now(value) => formatter.debug_tuple("Eval::Now").field(value).finish(),
            Node::Later(cell) => match cell.peek() {
                Some(value) => formatter.debug_tuple("Eval::Later").field(&*value).finish(),
                None => formatter.debug_tuple("Eval::Later").field(&"<thunk>").finish(),
            },
            Node::Always(_) => formatter.debug_tuple("Eval::Always").field(&"<thunk>").finish(),
            Node::Call(_) => formatter.debug_tuple("Eval::Call").field(&"<thunk>").finish(),
            Node::Compute(_) => formatter.write_str("Eval::Compute(..)"),
            Node::Memoize(memo) => match memo.peek() {
                Some(value) => formatter.debug_tuple("Eval::Memoize").field(value).finish(),
                None => formatter.write_str("Eval::Memoize(..)"),
            },
            Node::Released => unreachable!("{RELEASED}"),
        }
    }
}
