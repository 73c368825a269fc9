mod common;

use common::Recorder;
use deferred::{Deferred, Observer, Promise, Resolution, Thenable};

use std::rc::Rc;

/// A thenable that reports progress, then every outcome it can think of.
struct Chatty;

impl Thenable<i32, String, i32> for Chatty {
    fn then_observe(&self, observer: Observer<i32, String, i32>) {
        observer.notify(5);
        observer.fulfill(1);
        observer.reject("late".to_string());
        observer.fulfill(2);
    }
}

/// Applies recording handlers to `value` through `when`.
fn record_when<V>(runtime: &deferred::Runtime, log: &Recorder, value: V) -> Promise<(), String, i32>
where
    V: deferred::IntoResolution<i32, String, i32>,
{
    let on_fulfilled = log.clone();
    let on_rejected = log.clone();
    let on_progress = log.clone();

    runtime.when(
        value,
        move |value| {
            on_fulfilled.record("fulfilled", value);
            Ok(())
        },
        move |reason| {
            on_rejected.record("rejected", reason);
            Ok(())
        },
        move |step| {
            on_progress.record("progress", step);
            Ok(step)
        },
    )
}

#[deferred::test]
fn applies_handlers_to_a_plain_value() {
    let log = Recorder::new();

    let doubled: Promise<i32, String> = runtime.when(
        Ok::<_, String>(21),
        |n| Ok(n * 2),
        Resolution::Rejected,
        Ok,
    );

    let sink = log.clone();
    doubled.then(move |value| {
        sink.record("fulfilled", value);
        Ok(())
    });

    event_loop.run().unwrap();

    assert_eq!(log.events(), vec!["fulfilled(42)"]);
}

#[deferred::test]
fn handlers_run_on_a_later_turn() {
    let log = Recorder::new();

    record_when(&runtime, &log, Ok(1));
    assert!(log.is_empty());

    assert_eq!(event_loop.turn(), Ok(true));
    assert!(log.is_empty());

    event_loop.run().unwrap();
    assert_eq!(log.events(), vec!["fulfilled(1)"]);
}

#[deferred::test]
fn handler_output_settles_the_result_without_an_extra_turn() {
    let log = Recorder::new();

    let sink = log.clone();
    record_when(&runtime, &log, Ok(1)).then(move |()| {
        sink.push("result");
        Ok(())
    });

    // Turn 1 attaches to the coerced value, turn 2 runs the handler and
    // settles the result with its output.
    assert_eq!(event_loop.turn(), Ok(true));
    assert!(log.is_empty());
    assert_eq!(event_loop.turn(), Ok(true));
    assert_eq!(log.events(), vec!["fulfilled(1)"]);

    // The result then dispatches like any settled deferred: attach, deliver.
    assert_eq!(event_loop.run(), Ok(2));
    assert_eq!(log.events(), vec!["fulfilled(1)", "result"]);
}

#[deferred::test]
fn waits_for_a_promise() {
    let log = Recorder::new();
    let source: Deferred<i32, String, i32> = runtime.defer();

    record_when(&runtime, &log, source.promise());
    event_loop.run().unwrap();
    assert!(log.is_empty());

    source.resolve(Ok(3));
    event_loop.run().unwrap();

    assert_eq!(log.events(), vec!["fulfilled(3)"]);
}

#[deferred::test]
fn failure_handler_recovers_a_rejection() {
    let log = Recorder::new();
    let rejected: Promise<i32, String> = runtime.reject("bad input".to_string());

    let recovered: Promise<usize, String> =
        runtime.when(rejected, |n| Ok(n as usize), |reason| Ok(reason.len()), Ok);

    let sink = log.clone();
    recovered.then(move |value| {
        sink.record("fulfilled", value);
        Ok(())
    });

    event_loop.run().unwrap();

    assert_eq!(log.events(), vec!["fulfilled(9)"]);
}

#[deferred::test]
fn handler_errors_reject_the_result() {
    let log = Recorder::new();

    let checked: Promise<i32, String> = runtime.when(
        Ok::<_, String>(-1),
        |n| {
            if n < 0 {
                Err(format!("{n} is negative"))
            } else {
                Ok(n)
            }
        },
        Resolution::Rejected,
        Ok,
    );

    let sink = log.clone();
    checked.catch(move |reason| {
        sink.record("caught", reason);
        Ok(0)
    });

    event_loop.run().unwrap();

    assert_eq!(log.events(), vec!["caught(\"-1 is negative\")"]);
}

#[deferred::test]
fn only_the_first_outcome_of_a_misbehaving_thenable_counts() {
    common::init_tracing();

    let log = Recorder::new();
    let chatty: Rc<dyn Thenable<i32, String, i32>> = Rc::new(Chatty);

    record_when(&runtime, &log, chatty);
    event_loop.run().unwrap();

    assert_eq!(log.events(), vec!["progress(5)", "fulfilled(1)"]);
}

#[deferred::test]
fn progress_reaches_the_progress_handler() {
    let log = Recorder::new();
    let source: Deferred<i32, String, i32> = runtime.defer();

    record_when(&runtime, &log, source.promise());

    // Lets `when` attach its observer before anything is reported.
    event_loop.run().unwrap();

    source.notify(1);
    source.notify(2);
    source.resolve(Ok(10));
    event_loop.run().unwrap();

    assert_eq!(
        log.events(),
        vec!["progress(1)", "progress(2)", "fulfilled(10)"]
    );
}

#[deferred::test]
fn result_progress_is_the_progress_handler_output() {
    let log = Recorder::new();
    let source: Deferred<i32, String, i32> = runtime.defer();

    let result: Promise<i32, String, i32> = runtime.when(
        source.promise(),
        Resolution::Fulfilled,
        Resolution::Rejected,
        |step| if step > 0 { Ok(step * 100) } else { Err("negative".to_string()) },
    );

    let sink = log.clone();
    result.progress(move |step| {
        sink.record("progress", step);
        Ok(step)
    });
    event_loop.run().unwrap();

    source.notify(-1);
    source.notify(2);
    event_loop.run().unwrap();

    assert_eq!(log.events(), vec!["progress(200)"]);
}
