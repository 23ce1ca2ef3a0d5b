//! The write side: a handle that completes its future at most once.

use std::fmt;

use crate::either::Either;
use crate::future::{Completer, Future};

/// The write-capable owner of one [`Future`], exposing the mutating
/// operations the future itself keeps private.
///
/// A producer creates a `Promise`, hands [`future`](Promise::future) to
/// consumers, and later calls exactly one of
/// [`succeed`](Promise::succeed)/[`fail`](Promise::fail)/
/// [`complete`](Promise::complete). Completing twice is a silent no-op; the
/// first result sticks. Dropping the promise without completing wakes every
/// awaiting task with [`Error::PromiseDropped`](crate::Error::PromiseDropped),
/// unless a pending [`follow`](Promise::follow)/[`unless`](Promise::unless)
/// wiring still holds the write capability.
///
/// # Examples
///
/// ```
/// use future_cell::{Either, Promise};
/// use futures::executor::block_on;
/// use std::thread;
///
/// let promise = Promise::<String, u32>::new();
/// let future = promise.future();
/// let producer = thread::spawn(move || promise.succeed(42));
/// producer.join().expect("the producer thread has panicked");
/// assert_eq!(block_on(future), Ok(Either::Right(42)));
/// ```
pub struct Promise<E, S> {
    future: Future<E, S>,
    completer: Completer<E, S>,
}

impl<E, S> Promise<E, S>
where
    E: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// A promise over a fresh, pending future.
    pub fn new() -> Self {
        let future = Future::new();
        let completer = Completer::attach(&future);
        Promise { future, completer }
    }

    /// The read side, for handing to consumers.
    pub fn future(&self) -> Future<E, S> {
        self.future.clone()
    }

    /// Completes the future with `result`. No-op if already completed or
    /// canceled.
    pub fn complete(&self, result: Either<E, S>) {
        self.completer.complete(result);
    }

    /// Completes the future on the success channel.
    pub fn succeed(&self, value: S) {
        self.completer.succeed(value);
    }

    /// Completes the future on the error channel.
    pub fn fail(&self, err: E) {
        self.completer.fail(err);
    }

    /// Cancels the future: pending callbacks are discarded, nothing is ever
    /// delivered afterwards, and any later completion is a no-op.
    ///
    /// Cancellation is advisory towards the producer side: it does not stop
    /// whatever external work was asked to complete this promise.
    pub fn cancel(&self) {
        self.completer.cancel();
    }

    /// Wires `other`'s eventual result to complete this promise: a one-way
    /// bridge for delegating completion to another in-flight future.
    pub fn follow(&self, other: &Future<E, S>) {
        let completer = self.completer.clone();
        other.on_result(move |result| completer.complete(result));
    }

    /// If `other` ever succeeds, fails this promise with the error built
    /// from its success value. Lets an unrelated future preempt this one.
    pub fn unless<NE, NS>(
        &self,
        other: &Future<NE, NS>,
        error_builder: impl FnOnce(NS) -> E + Send + 'static,
    ) where
        NE: Clone + Send + 'static,
        NS: Clone + Send + 'static,
    {
        let completer = self.completer.clone();
        other.on_success(move |value| completer.fail(error_builder(value)));
    }

    pub(crate) fn completer(&self) -> Completer<E, S> {
        self.completer.clone()
    }
}

impl<E, S> Default for Promise<E, S>
where
    E: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E: fmt::Display, S: fmt::Display> fmt::Display for Promise<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Promise{{{}}}", self.future)
    }
}
