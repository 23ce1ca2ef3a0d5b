//! The read side: a write-once cell observed through callbacks, combinators
//! or `.await`.
//!
//! A [`Future`] is a cloneable handle onto shared state behind one mutex.
//! Completion, cancellation, callback registration and polling are all
//! serialized through that mutex; user closures are only ever invoked (and
//! discarded closures only ever dropped) with the lock released, so a
//! callback may itself register on or complete any future without
//! deadlocking.

use std::fmt;
use std::mem;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

use crate::either::Either;
use crate::promise::Promise;
use crate::Error;

/// A pending callback, tagged by the channel it cares about.
enum Callback<E, S> {
    Result(Box<dyn FnOnce(Either<E, S>) + Send>),
    Success(Box<dyn FnOnce(S) + Send>),
    Error(Box<dyn FnOnce(E) + Send>),
}

impl<E: Clone, S: Clone> Callback<E, S> {
    /// Runs the callback against a result, skipping it silently when the
    /// result landed on the other channel.
    fn invoke(self, result: &Either<E, S>) {
        match (self, result) {
            (Callback::Result(callback), result) => callback(result.clone()),
            (Callback::Success(callback), Either::Right(s)) => callback(s.clone()),
            (Callback::Error(callback), Either::Left(e)) => callback(e.clone()),
            _ => {}
        }
    }
}

struct Inner<E, S> {
    result: Option<Either<E, S>>,
    callbacks: Vec<Callback<E, S>>,
    canceled: bool,
    producers: usize,
    wakers: Vec<Waker>,
}

/// A value of type `S` that will exist in the future, or a failure of type
/// `E`.
///
/// Created empty by a [`Promise`], which keeps the mutating side to itself;
/// consumers observe the cell through accessors, register callbacks with
/// [`on_result`](Future::on_result) and friends, derive new futures with
/// [`map`](Future::map)/[`chain`](Future::chain), or `.await` it.
///
/// The cell is write-once: the first completion sticks and every later
/// attempt is a silent no-op. Callbacks registered before completion fire
/// exactly once, in registration order, on the completing thread; callbacks
/// registered after completion fire synchronously at registration. Payloads
/// are handed to each observer by clone, so `E` and `S` must be `Clone`.
///
/// # Examples
///
/// ```
/// use future_cell::{Either, Promise};
///
/// let promise = Promise::<String, u32>::new();
/// let future = promise.future();
/// future.on_success(|n| println!("got {n}"));
/// promise.succeed(42);
/// assert_eq!(future.result(), Some(Either::Right(42)));
/// ```
pub struct Future<E, S> {
    inner: Arc<Mutex<Inner<E, S>>>,
}

impl<E, S> Clone for Future<E, S> {
    fn clone(&self) -> Self {
        Future {
            inner: self.inner.clone(),
        }
    }
}

impl<E, S> Future<E, S> {
    pub(crate) fn new() -> Self {
        Future {
            inner: Arc::new(Mutex::new(Inner {
                result: None,
                callbacks: Vec::new(),
                canceled: false,
                producers: 0,
                wakers: Vec::new(),
            })),
        }
    }

    /// Whether a result has been stored.
    pub fn is_completed(&self) -> bool {
        self.inner.lock().unwrap().result.is_some()
    }

    /// Whether the stored result is on the success channel.
    pub fn is_succeeded(&self) -> bool {
        matches!(
            self.inner.lock().unwrap().result,
            Some(Either::Right(_))
        )
    }

    /// Whether the stored result is on the error channel.
    pub fn is_failed(&self) -> bool {
        matches!(self.inner.lock().unwrap().result, Some(Either::Left(_)))
    }

    /// Whether the future was canceled. Sticky once set.
    pub fn is_canceled(&self) -> bool {
        self.inner.lock().unwrap().canceled
    }
}

impl<E: Clone, S: Clone> Future<E, S> {
    /// The stored result, or `None` while pending.
    pub fn result(&self) -> Option<Either<E, S>> {
        self.inner.lock().unwrap().result.clone()
    }

    /// The success payload, or `None` if pending or failed.
    pub fn success(&self) -> Option<S> {
        match self.inner.lock().unwrap().result {
            Some(Either::Right(ref s)) => Some(s.clone()),
            _ => None,
        }
    }

    /// The error payload, or `None` if pending or succeeded.
    pub fn error(&self) -> Option<E> {
        match self.inner.lock().unwrap().result {
            Some(Either::Left(ref e)) => Some(e.clone()),
            _ => None,
        }
    }
}

impl<E, S> Future<E, S>
where
    E: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// Stores the result and drains the pending callbacks, first completion
    /// wins. No-op once completed or canceled.
    pub(crate) fn complete(&self, result: Either<E, S>) {
        let fired;
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.canceled || inner.result.is_some() {
                fired = None;
            } else {
                inner.result = Some(result.clone());
                fired = Some((
                    mem::take(&mut inner.callbacks),
                    mem::take(&mut inner.wakers),
                ));
            }
        }
        // lock released: callbacks may re-enter the library freely
        if let Some((callbacks, wakers)) = fired {
            for callback in callbacks {
                callback.invoke(&result);
            }
            for waker in wakers {
                waker.wake();
            }
        }
    }

    pub(crate) fn succeed(&self, value: S) {
        self.complete(Either::Right(value));
    }

    pub(crate) fn fail(&self, err: E) {
        self.complete(Either::Left(err));
    }

    /// Terminal: discards pending callbacks, suppresses all later delivery
    /// and turns any later `complete` into a no-op.
    pub(crate) fn cancel(&self) {
        let (callbacks, wakers) = {
            let mut inner = self.inner.lock().unwrap();
            inner.canceled = true;
            (
                mem::take(&mut inner.callbacks),
                mem::take(&mut inner.wakers),
            )
        };
        // discarded callbacks are dropped with the lock released
        drop(callbacks);
        for waker in wakers {
            waker.wake();
        }
    }

    fn register(&self, callback: Callback<E, S>) {
        let ready = {
            let mut inner = self.inner.lock().unwrap();
            if inner.canceled || (inner.result.is_none() && inner.producers == 0) {
                // canceled or abandoned: the callback can never fire
                Some((callback, None))
            } else if let Some(result) = inner.result.clone() {
                Some((callback, Some(result)))
            } else {
                inner.callbacks.push(callback);
                None
            }
        };
        if let Some((callback, result)) = ready {
            match result {
                Some(result) => callback.invoke(&result),
                None => drop(callback),
            }
        }
    }

    /// Registers a callback for the eventual result, whichever channel it
    /// lands on. Fires synchronously if the result is already in.
    ///
    /// Returns `&Self` so registrations can be chained.
    pub fn on_result(&self, callback: impl FnOnce(Either<E, S>) + Send + 'static) -> &Self {
        self.register(Callback::Result(Box::new(callback)));
        self
    }

    /// Like [`on_result`](Future::on_result), but only for the success
    /// channel; an error completion skips it silently.
    pub fn on_success(&self, callback: impl FnOnce(S) + Send + 'static) -> &Self {
        self.register(Callback::Success(Box::new(callback)));
        self
    }

    /// Like [`on_result`](Future::on_result), but only for the error
    /// channel; a success completion skips it silently.
    pub fn on_error(&self, callback: impl FnOnce(E) + Send + 'static) -> &Self {
        self.register(Callback::Error(Box::new(callback)));
        self
    }

    /// Derives a future that completes with the transformed success value,
    /// forwarding an error unchanged.
    pub fn map<NS>(&self, mapping: impl FnOnce(S) -> NS + Send + 'static) -> Future<E, NS>
    where
        NS: Clone + Send + 'static,
    {
        self.map_result(move |either| either.map(mapping))
    }

    /// The general transform: applies `mapping` to the completed `Either`
    /// and completes the derived future with its output.
    pub fn map_result<NE, NS>(
        &self,
        mapping: impl FnOnce(Either<E, S>) -> Either<NE, NS> + Send + 'static,
    ) -> Future<NE, NS>
    where
        NE: Clone + Send + 'static,
        NS: Clone + Send + 'static,
    {
        let derived = Promise::new();
        let completer = derived.completer();
        self.on_result(move |either| completer.complete(mapping(either)));
        derived.future()
    }

    /// Sequential composition: on success, runs `mapping` and forwards its
    /// future's eventual result; on error, short-circuits with the same
    /// error without running `mapping`.
    pub fn chain<NS>(
        &self,
        mapping: impl FnOnce(S) -> Future<E, NS> + Send + 'static,
    ) -> Future<E, NS>
    where
        NS: Clone + Send + 'static,
    {
        self.chain_result(move |either| match either {
            Either::Right(s) => mapping(s),
            Either::Left(e) => Future::failed(e),
        })
    }

    /// The unrestricted composition: `mapping` runs on every completion and
    /// its future's result is forwarded to the derived future.
    pub fn chain_result<NE, NS>(
        &self,
        mapping: impl FnOnce(Either<E, S>) -> Future<NE, NS> + Send + 'static,
    ) -> Future<NE, NS>
    where
        NE: Clone + Send + 'static,
        NS: Clone + Send + 'static,
    {
        let derived = Promise::new();
        let completer = derived.completer();
        self.on_result(move |either| {
            mapping(either).on_result(move |result| completer.complete(result));
        });
        derived.future()
    }

    /// Erases both payload types, keeping only which channel completed.
    /// Useful for "did this finish" signaling.
    pub fn void(&self) -> Future<(), ()> {
        self.map_result(Either::void)
    }

    /// A future that is already completed with `result`. Never pending.
    pub fn completed(result: Either<E, S>) -> Self {
        let future = Future::new();
        future.complete(result);
        future
    }

    /// A future that has already succeeded with `value`.
    pub fn succeeded(value: S) -> Self {
        Self::completed(Either::Right(value))
    }

    /// A future that has already failed with `err`.
    pub fn failed(err: E) -> Self {
        Self::completed(Either::Left(err))
    }

    /// Succeeds once every input has completed, success or error, with the
    /// inputs' results in input order. Never fails itself.
    ///
    /// # Panics
    ///
    /// Panics when `futures` is empty.
    pub fn all_result(futures: &[Future<E, S>]) -> Future<(), Vec<Either<E, S>>> {
        assert!(!futures.is_empty(), "all_result requires at least one future");

        let aggregate = Promise::new();
        let inputs: Arc<[Future<E, S>]> = futures.into();
        let remaining = Arc::new(AtomicUsize::new(inputs.len()));

        for future in futures {
            let completer = aggregate.completer();
            let inputs = inputs.clone();
            let remaining = remaining.clone();
            future.on_result(move |_| {
                if remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                    let results = inputs
                        .iter()
                        .map(|input| input.result().expect("every input has completed"))
                        .collect();
                    completer.succeed(results);
                }
            });
        }
        aggregate.future()
    }

    /// Succeeds with the ordered success values once every input has
    /// succeeded; the first input failure completes the aggregate with that
    /// error.
    ///
    /// # Panics
    ///
    /// Panics when `futures` is empty.
    pub fn all_success(futures: &[Future<E, S>]) -> Future<E, Vec<S>> {
        assert!(
            !futures.is_empty(),
            "all_success requires at least one future"
        );

        let aggregate = Promise::new();
        let inputs: Arc<[Future<E, S>]> = futures.into();
        let remaining = Arc::new(AtomicUsize::new(inputs.len()));

        for future in futures {
            let completer = aggregate.completer();
            let inputs = inputs.clone();
            let remaining = remaining.clone();
            future.on_success(move |_| {
                if remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                    let values = inputs
                        .iter()
                        .map(|input| input.success().expect("every input has succeeded"))
                        .collect();
                    completer.succeed(values);
                }
            });
            let completer = aggregate.completer();
            future.on_error(move |err| completer.fail(err));
        }
        aggregate.future()
    }

    /// Completes with the first result to arrive among the inputs, success
    /// or failure; write-once makes every later arrival a no-op.
    ///
    /// # Panics
    ///
    /// Panics when `futures` is empty.
    pub fn any(futures: &[Future<E, S>]) -> Future<E, S> {
        assert!(!futures.is_empty(), "any requires at least one future");

        let aggregate = Promise::new();
        for future in futures {
            let completer = aggregate.completer();
            future.on_success(move |value| completer.succeed(value));
            let completer = aggregate.completer();
            future.on_error(move |err| completer.fail(err));
        }
        aggregate.future()
    }
}

impl<E: fmt::Display, S: fmt::Display> fmt::Display for Future<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock().unwrap();
        match &inner.result {
            Some(result) => write!(f, "Future{{{}}}", result),
            None if inner.canceled => write!(f, "Future{{<canceled>}}"),
            None => write!(f, "Future{{<pending>}}"),
        }
    }
}

/// Awaiting yields the completing `Either`, or an [`Error`] when the future
/// was canceled or every write handle was dropped while it was pending.
impl<E: Clone, S: Clone> std::future::Future for Future<E, S> {
    type Output = Result<Either<E, S>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = self.inner.lock().unwrap();
        if inner.canceled {
            return Poll::Ready(Err(Error::Canceled));
        }
        if let Some(result) = inner.result.clone() {
            return Poll::Ready(Ok(result));
        }
        if inner.producers == 0 {
            return Poll::Ready(Err(Error::PromiseDropped));
        }
        if !inner.wakers.iter().any(|waker| waker.will_wake(cx.waker())) {
            inner.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

/// Crate-internal write capability over a future's cell.
///
/// Every live `Completer` counts as a producer: the owning [`Promise`] holds
/// one, and each pending `follow`/`unless`/combinator/aggregation wiring
/// holds a clone. When the last one drops while the future is still pending
/// and not canceled, the future is abandoned: pending callbacks are
/// discarded and awaiting tasks wake with [`Error::PromiseDropped`].
pub(crate) struct Completer<E, S> {
    future: Future<E, S>,
}

impl<E, S> Completer<E, S> {
    pub(crate) fn attach(future: &Future<E, S>) -> Self {
        future.inner.lock().unwrap().producers += 1;
        Completer {
            future: future.clone(),
        }
    }
}

impl<E, S> Clone for Completer<E, S> {
    fn clone(&self) -> Self {
        Completer::attach(&self.future)
    }
}

impl<E, S> Drop for Completer<E, S> {
    fn drop(&mut self) {
        let (callbacks, wakers) = {
            let mut inner = self.future.inner.lock().unwrap();
            inner.producers -= 1;
            if inner.producers == 0 && inner.result.is_none() && !inner.canceled {
                (
                    mem::take(&mut inner.callbacks),
                    mem::take(&mut inner.wakers),
                )
            } else {
                (Vec::new(), Vec::new())
            }
        };
        // discarded callbacks may themselves hold completers; drop unlocked
        drop(callbacks);
        for waker in wakers {
            waker.wake();
        }
    }
}

impl<E, S> Completer<E, S>
where
    E: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    pub(crate) fn complete(&self, result: Either<E, S>) {
        self.future.complete(result);
    }

    pub(crate) fn succeed(&self, value: S) {
        self.future.succeed(value);
    }

    pub(crate) fn fail(&self, err: E) {
        self.future.fail(err);
    }

    pub(crate) fn cancel(&self) {
        self.future.cancel();
    }
}
