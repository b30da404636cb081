//! A simple library for exception-style error handling and first-failure parallel joining of
//! thread-based tasks.
//!
//! (if you're looking for homogeneous parallel processing using an iterator-like interface, check
//! out [`rayon`] instead; if you're looking for running large numbers of I/O tasks concurrently,
//! you're probably better served by an `async` runtime)
//!
//! # Overview
//!
//! Rust code ordinarily propagates failures as values: `Result` returns, checked at every call
//! site with `?`. Inside a self-contained unit of work, this crate offers the other discipline:
//! a failure [`raise`]s an unwinding signal that aborts the unit immediately, and the unit's
//! boundary [`capture`]s the signal and hands it back to the caller as an ordinary [`Error`].
//!
//! The operations come in three groups:
//!
//! - **Escalation**: [`raise`] turns an [`Error`] into a signal; [`check`] and [`check_with`]
//!   unwrap a `Result`, raising its error. Multi-value results are tuples, so a single [`check`]
//!   covers them all.
//! - **Capture**: [`capture`] and [`capture_with`] run a body and return its raised failure as an
//!   `Err`, optionally decorated by an ordered [`Annotation`] chain. Raw `panic!` payloads are
//!   converted too; no failure is ever dropped on the way out.
//! - **Parallel join**: [`join`] (and the variadic [`join!`] macro) runs units of work on
//!   dedicated threads, captures each unit's failure in isolation, waits for every unit to
//!   finish, and re-raises the first failure in the caller's context.
//!
//! The two regimes compose: a unit of work passed to [`join`] typically ends in a [`check`], and
//! a [`join`] call is itself usually wrapped in a [`capture`] one level up.
//!
//! # Usage
//!
//! Unwrap fallible calls without per-call plumbing, catching all of them at the boundary:
//!
//! ```
//! use must::{capture, check};
//!
//! let sum = capture(|| {
//!     let a = check("20".parse::<i32>());
//!     let b = check("22".parse::<i32>());
//!     a + b
//! });
//! assert_eq!(sum.unwrap(), 42);
//! ```
//!
//! Annotate failures at the boundary while keeping the original cause testable:
//!
//! ```
//! use must::{annotate, capture_with, check};
//!
//! let res = capture_with([annotate("reading config")], || {
//!     check(std::fs::read_to_string("/does/not/exist"))
//! });
//! let err = res.unwrap_err();
//! assert!(format!("{err:#}").starts_with("reading config: "));
//! assert!(err.downcast_ref::<std::io::Error>().is_some());
//! ```
//!
//! Run independent units of work in parallel; one failure surfaces, all units run to completion:
//!
//! ```
//! use must::{capture, check, join};
//!
//! let inputs = ["1", "2", "x", "4"];
//! let err = capture(|| {
//!     join(inputs.map(|text| {
//!         move || {
//!             check(text.parse::<u32>());
//!         }
//!     }));
//! })
//! .unwrap_err();
//! assert!(err.downcast_ref::<std::num::ParseIntError>().is_some());
//! ```
//!
//! [`rayon`]: https://crates.io/crates/rayon
//! [`capture`]: capture()
//! [`check`]: check()
//! [`join`]: join()

mod capture;
mod check;
mod drop;
mod join;

pub use anyhow::{Error, Result};

pub use crate::capture::{annotate, capture, capture_with, Annotation};
pub use crate::check::{check, check_with, raise, ternary};
pub use crate::drop::{defer, with, Defer};
pub use crate::join::{join, JoinBuilder};
