//! Derived combinators on [`Eval`].
//!
//! Everything here is built from `flat_map`, `map`, `later` and `defer`, so
//! it inherits their laziness and stack safety.

use std::cell::RefCell;
use std::rc::Rc;

use super::Eval;
use crate::control::Either;

impl<A: Clone + 'static> Eval<A> {
    /// Applies `function` to this `Eval` itself, lazily and at most once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eval_trampoline::control::Eval;
    ///
    /// let source = Eval::now(20);
    /// let described = source.coflat_map(|eval| eval.value() + 1);
    /// assert_eq!(described.value(), 21);
    /// ```
    pub fn coflat_map<B, F>(&self, function: F) -> Eval<B>
    where
        B: Clone + 'static,
        F: Fn(&Self) -> B + 'static,
    {
        let this = self.clone();
        Eval::later(move || function(&this))
    }

    /// Applies the function produced by `functions` to this value.
    ///
    /// `functions` is evaluated first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eval_trampoline::control::Eval;
    ///
    /// let double = Eval::now(|x: i32| x * 2);
    /// assert_eq!(Eval::now(21).ap(&double).value(), 42);
    /// ```
    pub fn ap<B, F>(&self, functions: &Eval<F>) -> Eval<B>
    where
        B: Clone + 'static,
        F: Fn(A) -> B + Clone + 'static,
    {
        let this = self.clone();
        functions.flat_map(move |function| this.map(function))
    }

    /// Combines two results with `function`, evaluating `self` first.
    pub fn zip_with<B, C, F>(&self, other: &Eval<B>, function: F) -> Eval<C>
    where
        B: Clone + 'static,
        C: Clone + 'static,
        F: Fn(A, B) -> C + 'static,
    {
        let other = other.clone();
        let function = Rc::new(function);
        self.flat_map(move |a| {
            let function = Rc::clone(&function);
            other.map(move |b| function(a.clone(), b))
        })
    }

    /// Pairs two results, evaluating `self` first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eval_trampoline::control::Eval;
    ///
    /// let pair = Eval::now(1).zip(&Eval::later(|| "one"));
    /// assert_eq!(pair.value(), (1, "one"));
    /// ```
    pub fn zip<B>(&self, other: &Eval<B>) -> Eval<(A, B)>
    where
        B: Clone + 'static,
    {
        self.zip_with(other, |a, b| (a, b))
    }

    /// Combines three results with `function`, left to right.
    pub fn zip3<B, C, D, F>(&self, second: &Eval<B>, third: &Eval<C>, function: F) -> Eval<D>
    where
        B: Clone + 'static,
        C: Clone + 'static,
        D: Clone + 'static,
        F: Fn(A, B, C) -> D + 'static,
    {
        self.zip(second)
            .zip_with(third, move |(a, b), c| function(a, b, c))
    }

    /// Evaluates this value `count` times in sequence, collecting the
    /// results in order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eval_trampoline::control::Eval;
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// let ticks = Rc::new(Cell::new(0));
    /// let counter = Rc::clone(&ticks);
    /// let tick = Eval::always(move || {
    ///     counter.set(counter.get() + 1);
    ///     counter.get()
    /// });
    ///
    /// assert_eq!(tick.replicate(3).value(), vec![1, 2, 3]);
    /// assert_eq!(tick.replicate(0).value(), Vec::<i32>::new());
    /// ```
    pub fn replicate(&self, count: usize) -> Eval<Vec<A>> {
        let element = self.clone();
        // Each force collects into its own buffer.
        Eval::defer(move || {
            let buffer = Rc::new(RefCell::new(Vec::with_capacity(count)));
            let filled = (0..count).fold(Eval::unit(), |chain, _| {
                let element = element.clone();
                let buffer = Rc::clone(&buffer);
                chain.flat_map(move |()| {
                    let buffer = Rc::clone(&buffer);
                    element.map(move |item| buffer.borrow_mut().push(item))
                })
            });
            filled.map(move |()| buffer.take())
        })
    }

    /// Runs `step` until it returns `Either::Right`, feeding every
    /// `Either::Left` state back in.
    ///
    /// Each iteration is a new bind link resolved by the evaluation loop, so
    /// the number of iterations is not limited by the native stack.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eval_trampoline::control::{Either, Eval};
    ///
    /// let counted = Eval::tail_rec_m(0_u64, |index| {
    ///     if index < 500_000 {
    ///         Eval::now(Either::Left(index + 1))
    ///     } else {
    ///         Eval::now(Either::Right(index))
    ///     }
    /// });
    /// assert_eq!(counted.value(), 500_000);
    /// ```
    pub fn tail_rec_m<S, F>(initial: S, step: F) -> Self
    where
        S: Clone + 'static,
        F: Fn(S) -> Eval<Either<S, A>> + 'static,
    {
        fn iterate<S, A, F>(state: S, step: Rc<F>) -> Eval<A>
        where
            S: Clone + 'static,
            A: Clone + 'static,
            F: Fn(S) -> Eval<Either<S, A>> + 'static,
        {
            let next = Rc::clone(&step);
            step(state).flat_map(move |outcome| match outcome {
                Either::Left(state) => iterate(state, Rc::clone(&next)),
                Either::Right(value) => Eval::now(value),
            })
        }

        iterate(initial, Rc::new(step))
    }

    /// Lazily folds `items` from the right.
    ///
    /// `function` receives each item together with the not yet evaluated
    /// fold of the remaining items and may return without forcing it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eval_trampoline::control::Eval;
    ///
    /// let sum = Eval::iterate_right(1..=100_000_u64, Eval::now(0_u64), |item, rest| {
    ///     rest.map(move |total| total + item)
    /// });
    /// assert_eq!(sum.value(), 5_000_050_000);
    ///
    /// // Short-circuits: the fold past the first even number is never built.
    /// let first_even = Eval::iterate_right([1, 3, 4, 5], Eval::now(None), |item, rest| {
    ///     if item % 2 == 0 { Eval::now(Some(item)) } else { rest }
    /// });
    /// assert_eq!(first_even.value(), Some(4));
    /// ```
    pub fn iterate_right<I, F>(items: I, initial: Self, function: F) -> Self
    where
        I: IntoIterator,
        I::Item: Clone + 'static,
        F: Fn(I::Item, Self) -> Self + 'static,
    {
        fn fold_from<T, A, F>(items: Rc<[T]>, index: usize, initial: Eval<A>, function: Rc<F>) -> Eval<A>
        where
            T: Clone + 'static,
            A: Clone + 'static,
            F: Fn(T, Eval<A>) -> Eval<A> + 'static,
        {
            Eval::defer(move || match items.get(index) {
                Some(item) => {
                    let rest = fold_from(
                        Rc::clone(&items),
                        index + 1,
                        initial.clone(),
                        Rc::clone(&function),
                    );
                    function(item.clone(), rest)
                }
                None => initial.clone(),
            })
        }

        let items: Rc<[I::Item]> = items.into_iter().collect();
        fold_from(items, 0, initial, Rc::new(function))
    }
}
