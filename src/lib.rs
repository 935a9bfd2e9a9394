//! # eval-trampoline
//!
//! Stack-safe lazy evaluation for Rust.
//!
//! ## Overview
//!
//! The crate provides [`Eval`](control::Eval), a value whose computation
//! strategy is part of its type:
//!
//! - **Now**: already computed, held eagerly
//! - **Later**: computed on first access, then cached
//! - **Always**: recomputed on every access
//! - **Call** (`defer`): a suspended step that yields another `Eval`
//!
//! Values are composed with `map`/`flat_map` without running anything.
//! Forcing with `value()` drives the whole composition through an explicit
//! trampoline, so chains hundreds of thousands of binds deep never grow the
//! native call stack.
//!
//! ## Feature Flags
//!
//! - `control`: the `Eval` runtime and `Either` (enabled by default)
//! - `tracing`: `trace`-level instrumentation of the evaluation loop
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use eval_trampoline::prelude::*;
//!
//! fn count_up(n: u64) -> Eval<u64> {
//!     if n == 0 {
//!         Eval::now(0)
//!     } else {
//!         Eval::defer(move || count_up(n - 1)).map(|x| x + 1)
//!     }
//! }
//!
//! assert_eq!(count_up(100_000).value(), 100_000);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use eval_trampoline::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "control")]
    pub use crate::control::*;
}

#[cfg(feature = "control")]
pub mod control;
