//! Write-once asynchronous result cells.
//!
//! Three small primitives: [`Either`] is a disjoint-union result with an
//! error channel (`Left`) and a success channel (`Right`); [`Future`] is a
//! read-only cell that eventually holds an `Either`; [`Promise`] is the
//! write-once handle that produces it, exactly once, from anywhere in the
//! program.
//!
//! Consumers register callbacks or derive new futures before *or* after
//! completion; each callback fires exactly once with the correct payload
//! either way. A [`Future`] can also simply be `.await`ed, yielding the
//! completing `Either` or an [`Error`] when no result can ever arrive.
//!
//! There is no executor, no I/O and no timer in here: whatever schedules the
//! work calls `succeed`/`fail` on the promise, and delivery happens
//! synchronously on that caller's thread.
//!
//! # Examples
//!
//! ```
//! use future_cell::{Either, Promise};
//! use futures::executor::block_on;
//! use std::thread;
//!
//! let promise = Promise::<String, u32>::new();
//! let doubled = promise.future().map(|n| n * 2);
//!
//! let producer = thread::spawn(move || promise.succeed(21));
//! producer.join().expect("the producer thread has panicked");
//!
//! assert_eq!(block_on(doubled), Ok(Either::Right(42)));
//! ```

use thiserror::Error;

pub mod either;
pub mod future;
pub mod promise;

pub use crate::either::Either;
pub use crate::future::Future;
pub use crate::promise::Promise;

/// Why awaiting a [`Future`] can finish without a result.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Every write-capable handle was dropped while the future was still
    /// pending; it can never complete.
    #[error("promise dropped before completing its future")]
    PromiseDropped,
    /// The future was canceled; nothing will ever be delivered.
    #[error("future canceled")]
    Canceled,
}
