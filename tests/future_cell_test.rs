#[cfg(test)]
mod tests {
    use future_cell::{Either, Error, Future, Promise};
    use futures::executor::block_on;
    use std::sync::mpsc::channel;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_completes_across_threads() {
        let promise = Promise::<String, i32>::new();
        let future = promise.future();

        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            promise.succeed(42);
        });

        assert_eq!(block_on(future), Ok(Either::Right(42)));
        producer.join().expect("The producer thread has panicked");
    }

    #[test]
    fn test_callback_delivers_on_the_completing_thread() {
        let promise = Promise::<String, i32>::new();
        let future = promise.future();
        let (tx, rx) = channel();
        future.on_success(move |value| tx.send(value).unwrap());

        let producer = thread::spawn(move || promise.succeed(7));

        assert_eq!(rx.recv().unwrap(), 7);
        producer.join().expect("The producer thread has panicked");
    }

    #[test]
    fn test_combinators_span_threads() {
        let promise = Promise::<String, i32>::new();
        let derived = promise
            .future()
            .map(|n| n * 2)
            .chain(|n| Future::succeeded(n + 1));

        let producer = thread::spawn(move || promise.succeed(10));

        assert_eq!(block_on(derived), Ok(Either::Right(21)));
        producer.join().expect("The producer thread has panicked");
    }

    #[test]
    fn test_aggregates_worker_outcomes_in_input_order() {
        let promises: Vec<Promise<String, i32>> = (0..4).map(|_| Promise::new()).collect();
        let futures: Vec<_> = promises.iter().map(|promise| promise.future()).collect();
        let aggregate = Future::all_result(&futures);

        let workers: Vec<_> = promises
            .into_iter()
            .enumerate()
            .map(|(i, promise)| {
                thread::spawn(move || {
                    if i % 2 == 0 {
                        promise.succeed(i as i32);
                    } else {
                        promise.fail(format!("worker {i}"));
                    }
                })
            })
            .collect();

        let results = block_on(aggregate)
            .expect("aggregate cannot be abandoned while workers run")
            .right()
            .expect("all_result never fails");
        assert_eq!(
            results,
            vec![
                Either::Right(0),
                Either::Left("worker 1".to_owned()),
                Either::Right(2),
                Either::Left("worker 3".to_owned()),
            ]
        );
        for worker in workers {
            worker.join().expect("A worker thread has panicked");
        }
    }

    #[test]
    fn test_any_settles_on_the_first_worker_to_finish() {
        let quick = Promise::<String, i32>::new();
        let slow = Promise::<String, i32>::new();
        let first = Future::any(&[quick.future(), slow.future()]);

        let fast_worker = thread::spawn(move || quick.succeed(1));
        fast_worker.join().expect("The fast worker has panicked");

        assert_eq!(block_on(first), Ok(Either::Right(1)));
        slow.succeed(2);
    }

    #[test]
    fn test_dropping_the_promise_wakes_a_blocked_waiter() {
        let promise = Promise::<String, i32>::new();
        let future = promise.future();

        let waiter = thread::spawn(move || block_on(future));
        thread::sleep(Duration::from_millis(50));
        drop(promise);

        assert_eq!(
            waiter.join().expect("The waiter thread has panicked"),
            Err(Error::PromiseDropped)
        );
    }

    #[test]
    fn test_cancellation_wakes_a_blocked_waiter() {
        let promise = Promise::<String, i32>::new();
        let future = promise.future();

        let waiter = thread::spawn(move || block_on(future));
        thread::sleep(Duration::from_millis(50));
        promise.cancel();

        assert_eq!(
            waiter.join().expect("The waiter thread has panicked"),
            Err(Error::Canceled)
        );
    }
}
