mod common;

use common::Recorder;
use deferred::{Deferred, Promise, Resolution};

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;

fn observe<T: Debug + Clone + 'static>(log: &Recorder, promise: &Promise<T, String>) {
    let on_fulfilled = log.clone();
    let on_rejected = log.clone();

    promise.then_or_else(
        move |value| {
            on_fulfilled.record("fulfilled", value);
            Ok::<(), String>(())
        },
        move |reason| {
            on_rejected.record("rejected", reason);
            Ok(())
        },
    );
}

#[deferred::test]
fn empty_inputs_fulfil_with_an_empty_container() {
    let log = Recorder::new();

    let sequence: Promise<Vec<i32>, String> = runtime.all(Vec::<Promise<i32, String>>::new());
    let map: Promise<BTreeMap<&str, i32>, String> =
        runtime.all(BTreeMap::<&str, Promise<i32, String>>::new());
    observe(&log, &sequence);
    observe(&log, &map);

    event_loop.run().unwrap();

    assert_eq!(log.events(), vec!["fulfilled([])", "fulfilled({})"]);
}

#[deferred::test]
fn values_keep_input_order() {
    let log = Recorder::new();
    let inputs: Vec<Deferred<i32, String>> = (0..3).map(|_| runtime.defer()).collect();

    let all: Promise<Vec<i32>, String> =
        runtime.all(inputs.iter().map(Deferred::promise).collect::<Vec<_>>());
    observe(&log, &all);

    for (deferred, value) in inputs.iter().zip([1, 2, 3]).rev() {
        deferred.resolve(Ok(value));
        event_loop.run().unwrap();
    }

    assert_eq!(log.events(), vec!["fulfilled([1, 2, 3])"]);
}

#[deferred::test]
fn plain_values_and_promises_mix() {
    let log = Recorder::new();
    let middle: Deferred<i32, String> = runtime.defer();

    let all: Promise<Vec<i32>, String> = runtime.all(vec![
        Resolution::Fulfilled(1),
        Resolution::from(middle.promise()),
        Resolution::Fulfilled(3),
    ]);
    observe(&log, &all);

    event_loop.run().unwrap();
    assert!(log.is_empty());

    middle.resolve(Ok(2));
    event_loop.run().unwrap();

    assert_eq!(log.events(), vec!["fulfilled([1, 2, 3])"]);
}

#[deferred::test]
fn any_rejection_rejects_the_aggregate() {
    let log = Recorder::new();
    let inputs: Vec<Promise<i32, String>> = vec![
        runtime.resolved(1),
        runtime.resolved(2),
        runtime.reject("e".to_string()),
    ];

    let all: Promise<Vec<i32>, String> = runtime.all(inputs);
    observe(&log, &all);

    event_loop.run().unwrap();

    assert_eq!(log.events(), vec!["rejected(\"e\")"]);
}

#[deferred::test]
fn the_first_rejection_wins() {
    let log = Recorder::new();
    let first: Deferred<i32, String> = runtime.defer();
    let second: Deferred<i32, String> = runtime.defer();

    let all: Promise<Vec<i32>, String> = runtime.all(vec![first.promise(), second.promise()]);
    observe(&log, &all);

    second.reject("second".to_string());
    event_loop.run().unwrap();
    first.reject("first".to_string());
    event_loop.run().unwrap();

    assert_eq!(log.events(), vec!["rejected(\"second\")"]);
}

#[deferred::test]
fn late_success_after_a_rejection_is_ignored() {
    let log = Recorder::new();
    let first: Deferred<i32, String> = runtime.defer();
    let second: Deferred<i32, String> = runtime.defer();

    let all: Promise<Vec<i32>, String> = runtime.all(vec![first.promise(), second.promise()]);
    observe(&log, &all);

    first.reject("failed".to_string());
    event_loop.run().unwrap();
    second.resolve(Ok(2));
    event_loop.run().unwrap();

    assert_eq!(log.events(), vec!["rejected(\"failed\")"]);
}

#[deferred::test]
fn an_input_that_never_settles_keeps_the_aggregate_pending() {
    let log = Recorder::new();
    let stuck: Deferred<i32, String> = runtime.defer();

    let all: Promise<Vec<i32>, String> =
        runtime.all(vec![runtime.resolved(1), stuck.promise(), runtime.resolved(3)]);
    observe(&log, &all);

    event_loop.run().unwrap();

    assert!(log.is_empty());
    assert!(event_loop.is_idle());
}

#[deferred::test]
fn maps_keep_their_keys() {
    let log = Recorder::new();
    let slow: Deferred<i32, String> = runtime.defer();

    let inputs = BTreeMap::from([
        ("b", slow.promise()),
        ("a", runtime.resolved(1)),
    ]);

    let all: Promise<BTreeMap<&str, i32>, String> = runtime.all(inputs);
    observe(&log, &all);

    event_loop.run().unwrap();
    slow.resolve(Ok(2));
    event_loop.run().unwrap();

    assert_eq!(log.events(), vec!["fulfilled({\"a\": 1, \"b\": 2})"]);
}

#[deferred::test]
fn hash_maps_are_aggregated_by_key() {
    let output = std::rc::Rc::new(std::cell::RefCell::new(HashMap::new()));

    let inputs: HashMap<String, Result<u32, String>> = ["x", "y", "z"]
        .into_iter()
        .zip(1..)
        .map(|(key, value)| (key.to_string(), Ok(value)))
        .collect();

    let all: Promise<HashMap<String, u32>, String> = runtime.all(inputs);

    let sink = output.clone();
    all.then(move |values| {
        *sink.borrow_mut() = values;
        Ok(())
    });

    event_loop.run().unwrap();

    let output = output.borrow();
    assert_eq!(output.len(), 3);
    assert_eq!(output["x"], 1);
    assert_eq!(output["y"], 2);
    assert_eq!(output["z"], 3);
}
