//! Tests for event channel merge and dispatch semantics

#[cfg(test)]
mod tests {
    use crate::error::{EventError, HandlerError, HandlerFailure};
    use crate::pool::{build_pool, Job, WorkerPool};
    use crate::{Event, Handler, SenderId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, OnceLock};
    use std::thread;
    use std::time::Duration;

    /// Pool wrapper that counts scheduled jobs
    struct CountingPool {
        inner: Arc<dyn WorkerPool>,
        scheduled: AtomicUsize,
    }

    impl CountingPool {
        fn new(threads: usize) -> Arc<Self> {
            Arc::new(Self {
                inner: build_pool(threads).unwrap(),
                scheduled: AtomicUsize::new(0),
            })
        }
    }

    impl WorkerPool for CountingPool {
        fn execute(&self, job: Job) {
            self.scheduled.fetch_add(1, Ordering::SeqCst);
            self.inner.execute(job);
        }

        fn size(&self) -> usize {
            self.inner.size()
        }
    }

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> Handler<u32> {
        let log = Arc::clone(log);
        Handler::named(tag, move |_, _| {
            log.lock().unwrap().push(tag);
            Ok(())
        })
    }

    fn counter(hits: &Arc<AtomicUsize>) -> Handler<u32> {
        let hits = Arc::clone(hits);
        Handler::infallible(move |_, _| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_invoke_without_handlers() {
        let event = Event::<u32>::named("empty");
        assert!(event.invoke(SenderId::nil(), 1).is_ok());

        let stats = event.stats();
        assert_eq!(stats.invocations, 1);
        assert_eq!(stats.handlers_called, 0);
    }

    #[test]
    fn test_invoke_preserves_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let event = Event::named("ordered");
        event.subscribe(&recorder(&log, "h1"));
        event.subscribe(&recorder(&log, "h2"));
        event.subscribe(&recorder(&log, "h3"));

        for _ in 0..3 {
            event.invoke(SenderId::nil(), 0).unwrap();
        }

        let expected: Vec<_> = ["h1", "h2", "h3"].repeat(3);
        assert_eq!(*log.lock().unwrap(), expected);
    }

    #[test]
    fn test_handlers_observe_sender_and_arg() {
        let sender = SenderId::new();
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = Arc::clone(&seen);

        let event = Event::named("observe");
        event.subscribe(&Handler::infallible(move |s, arg: &(u32, f32)| {
            *seen_clone.lock().unwrap() = Some((s, *arg));
        }));

        event.invoke(sender, (3, 0.5)).unwrap();
        assert_eq!(*seen.lock().unwrap(), Some((sender, (3, 0.5))));
    }

    #[test]
    fn test_invoke_stops_at_first_error() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let event = Event::named("abort");
        event.subscribe(&recorder(&log, "h1"));
        event.subscribe(&Handler::named("broken", |_, _| {
            Err(HandlerError::msg("shader link failed"))
        }));
        event.subscribe(&recorder(&log, "h3"));

        let err = event.invoke(SenderId::nil(), 0).unwrap_err();
        match &err {
            EventError::Handler { channel, failure } => {
                assert_eq!(channel.as_str(), "abort");
                assert_eq!(failure.index(), 1);
                assert_eq!(failure.handler(), "broken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(*log.lock().unwrap(), vec!["h1"]);
        assert_eq!(event.stats().handler_failures, 1);
    }

    #[test]
    fn test_invoke_propagates_panics() {
        let event = Event::<u32>::named("panicky");
        event.subscribe(&Handler::infallible(|_, _| panic!("texture decode")));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = event.invoke(SenderId::nil(), 0);
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_stats_count_calls_before_a_panic() {
        let hits = Arc::new(AtomicUsize::new(0));
        let event = Event::<u32>::named("panicky_stats");
        event.subscribe(&counter(&hits));
        event.subscribe(&Handler::infallible(|_, _| panic!("shader compile")));
        event.subscribe(&counter(&hits));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = event.invoke(SenderId::nil(), 0);
        }));
        assert!(result.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let stats = event.stats();
        assert_eq!(stats.invocations, 1);
        assert_eq!(stats.handlers_called, 2);
        assert_eq!(stats.handler_failures, 1);
    }

    #[test]
    fn test_subscribe_is_deferred_until_next_invoke() {
        let hits = Arc::new(AtomicUsize::new(0));
        let late = counter(&hits);

        let event = Arc::new(Event::<u32>::named("deferred"));
        let event_clone = Arc::clone(&event);
        let late_clone = late.clone();
        event.subscribe(&Handler::infallible(move |_, _| {
            event_clone.subscribe(&late_clone);
        }));

        event.invoke(SenderId::nil(), 0).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(event.pending_count(), 1);

        event.invoke(SenderId::nil(), 0).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_self_unsubscribe_takes_effect_next_call() {
        let hits = Arc::new(AtomicUsize::new(0));
        let event = Arc::new(Event::<u32>::named("once"));

        let slot: Arc<OnceLock<Handler<u32>>> = Arc::new(OnceLock::new());
        let handler = {
            let event = Arc::clone(&event);
            let slot = Arc::clone(&slot);
            let hits = Arc::clone(&hits);
            Handler::infallible(move |_, _| {
                hits.fetch_add(1, Ordering::SeqCst);
                if let Some(me) = slot.get() {
                    event.unsubscribe(me);
                }
            })
        };
        slot.set(handler.clone()).unwrap();
        event.subscribe(&handler);

        event.invoke(SenderId::nil(), 0).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        event.invoke(SenderId::nil(), 0).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(event.handler_count(), 0);
    }

    #[test]
    fn test_duplicate_subscriptions_run_twice() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = counter(&hits);
        let event = Event::named("dupes");
        event.subscribe(&h);
        event.subscribe(&h);

        event.invoke(SenderId::nil(), 0).unwrap();
        assert_eq!(event.handler_count(), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        event.unsubscribe(&h);
        event.invoke(SenderId::nil(), 0).unwrap();
        assert_eq!(event.handler_count(), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_removal_wins_over_pending_addition() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = counter(&hits);
        let event = Event::named("cancelled");
        event.subscribe(&h);
        event.unsubscribe(&h);

        event.invoke(SenderId::nil(), 0).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(event.handler_count(), 0);
    }

    #[test]
    fn test_unsubscribe_unknown_handler_is_noop() {
        let hits = Arc::new(AtomicUsize::new(0));
        let event = Event::named("noop");
        event.subscribe(&counter(&hits));
        event.unsubscribe(&Handler::infallible(|_, _: &u32| {}));

        event.invoke(SenderId::nil(), 0).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_parallel_without_handlers_schedules_nothing() {
        let pool = CountingPool::new(2);
        let event = Event::<u32>::with_pool("idle", pool.clone());

        assert!(event.invoke_parallel(SenderId::nil(), 0).is_ok());
        assert_eq!(pool.scheduled.load(Ordering::SeqCst), 0);
        assert_eq!(event.stats().parallel_invocations, 1);
    }

    #[test_log::test]
    fn test_parallel_waits_for_every_handler() {
        let pool = CountingPool::new(4);
        let event = Event::<u32>::with_pool("fan_out", pool.clone());
        let finished = Arc::new(AtomicUsize::new(0));

        for delay in [30u64, 5, 15] {
            let finished = Arc::clone(&finished);
            event.subscribe(&Handler::infallible(move |_, _| {
                thread::sleep(Duration::from_millis(delay));
                finished.fetch_add(1, Ordering::SeqCst);
            }));
        }

        event.invoke_parallel(SenderId::nil(), 0).unwrap();
        assert_eq!(finished.load(Ordering::SeqCst), 3);
        assert_eq!(pool.scheduled.load(Ordering::SeqCst), 3);
        assert_eq!(event.stats().handlers_called, 3);
    }

    #[test_log::test]
    fn test_parallel_aggregates_failures() {
        let hits = Arc::new(AtomicUsize::new(0));
        let event = Event::<u32>::with_pool("faulty", build_pool(2).unwrap());
        event.subscribe(&Handler::named("panics", |_, _| panic!("worker blew up")));
        event.subscribe(&counter(&hits));
        event.subscribe(&Handler::named("errors", |_, _| Err(HandlerError::msg("bad frame"))));

        let err = event.invoke_parallel(SenderId::nil(), 0).unwrap_err();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let EventError::Parallel { dispatched, failures, .. } = &err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(*dispatched, 3);
        assert_eq!(failures.len(), 2);
        assert!(matches!(
            &failures[0],
            HandlerFailure::Panicked { index: 0, message, .. } if message == "worker blew up"
        ));
        assert!(matches!(&failures[1], HandlerFailure::Error { index: 2, .. }));

        // The pool survived the panic and the barrier was released.
        let _ = event.invoke_parallel(SenderId::nil(), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(event.stats().handler_failures, 4);
    }

    #[test]
    fn test_subscribe_during_parallel_dispatch_is_deferred() {
        let hits = Arc::new(AtomicUsize::new(0));
        let late = counter(&hits);
        let event = Arc::new(Event::<u32>::with_pool("update", build_pool(2).unwrap()));

        let event_clone = Arc::clone(&event);
        let late_clone = late.clone();
        event.subscribe(&Handler::infallible(move |_, _| {
            event_clone.subscribe(&late_clone);
        }));

        event.invoke_parallel(SenderId::nil(), 0).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        event.invoke_parallel(SenderId::nil(), 0).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_during_parallel_dispatch_still_runs_latched_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let victim = counter(&hits);
        let event = Arc::new(Event::<u32>::with_pool("render", build_pool(2).unwrap()));

        let (started_tx, started_rx) = crossbeam::channel::bounded::<()>(1);
        let (release_tx, release_rx) = crossbeam::channel::bounded::<()>(1);
        let blocker = Handler::infallible(move |_, _| {
            started_tx.send(()).unwrap();
            release_rx.recv().unwrap();
        });
        event.subscribe(&blocker);
        event.subscribe(&victim);

        let dispatcher = {
            let event = Arc::clone(&event);
            thread::spawn(move || event.invoke_parallel(SenderId::nil(), 0))
        };

        started_rx.recv().unwrap();
        event.unsubscribe(&victim);
        event.unsubscribe(&blocker);
        release_tx.send(()).unwrap();
        dispatcher.join().unwrap().unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(event.pending_count(), 2);

        event.invoke_parallel(SenderId::nil(), 0).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(event.handler_count(), 0);
    }
}
