//! Lazy evaluation and stack-safe composition.
//!
//! - [`Eval`]: a computation that is eager (`now`), memoized (`later`),
//!   repeated (`always`) or deferred (`defer`), composed with `map` and
//!   `flat_map` and forced with `value`
//! - [`Either`]: a value that can be one of two types (drives
//!   [`Eval::tail_rec_m`])
//! - [`EvalError`]: a panic captured by [`Eval::try_value`]
//!
//! # Examples
//!
//! ## Memoized vs. repeated evaluation
//!
//! ```rust
//! use eval_trampoline::control::Eval;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let calls = Rc::new(Cell::new(0));
//!
//! let counter = Rc::clone(&calls);
//! let later = Eval::later(move || {
//!     counter.set(counter.get() + 1);
//!     counter.get()
//! });
//! assert_eq!(later.value(), 1);
//! assert_eq!(later.value(), 1);
//!
//! let counter = Rc::clone(&calls);
//! let always = Eval::always(move || {
//!     counter.set(counter.get() + 1);
//!     counter.get()
//! });
//! assert_eq!(always.value(), 2);
//! assert_eq!(always.value(), 3);
//! ```
//!
//! ## Stack-safe looping
//!
//! ```rust
//! use eval_trampoline::control::{Either, Eval};
//!
//! let sum = Eval::tail_rec_m((0u64, 0u64), |(index, total)| {
//!     if index == 1_000_000 {
//!         Eval::now(Either::Right(total))
//!     } else {
//!         Eval::now(Either::Left((index + 1, total + index)))
//!     }
//! });
//! assert_eq!(sum.value(), 499_999_500_000);
//! ```

mod either;
mod error;
mod eval;

pub use either::Either;
pub use error::EvalError;
pub use eval::{Eval, EvalKind};
