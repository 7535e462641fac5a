//! Settlement Tests
//!
//! The first settle call decides the outcome. Later calls report `false` and
//! change nothing.

use crate::*;
use proptest::prelude::*;

// =============================================================================
// SETTLE ONCE
// =============================================================================

#[test]
fn test_second_fulfill_is_ignored() {
    let rt = runtime();
    let (d, resolver) = rt.pending::<i32, Fault>();

    assert!(resolver.fulfill(1));
    assert!(!resolver.fulfill(2));

    assert_eq!(rt.block_on(&d), Ok(1));
    assert_eq!(d.outcome(), Some(Outcome::Fulfilled(1)));
}

#[test]
fn test_fulfill_after_reject_is_ignored() {
    let rt = runtime();
    let (result, error) = recorders();

    let chain = rt
        .deferred(|resolver: Resolver<i32, Fault>| {
            resolver.reject(Fault::new("first"));
            resolver.fulfill(10);
            Ok(())
        })
        .then({
            let result = result.clone();
            move |v| {
                result.record(v.to_string());
                Ok(v)
            }
        })
        .catch({
            let error = error.clone();
            move |fault| {
                error.record(fault.message());
                Ok(0)
            }
        });

    assert_eq!(rt.block_on(&chain), Ok(0));
    assert!(!result.was_called());
    assert_eq!(error.labels(), vec!["first"]);
}

#[test]
fn test_exactly_one_path_runs_per_settlement() {
    let rt = runtime();
    let (result, error) = recorders();

    let source: Deferred<i32, Fault> = rt.fulfilled(5);
    let chain = source.then_with(
        {
            let result = result.clone();
            move |v| {
                result.record_call();
                Ok(v)
            }
        },
        {
            let error = error.clone();
            move |_| {
                error.record_call();
                Ok(-1)
            }
        },
    );

    assert_eq!(rt.block_on(&chain), Ok(5));
    assert_eq!(result.call_count(), 1);
    assert_eq!(error.call_count(), 0);
}

#[test]
fn test_setup_failure_after_fulfill_is_ignored() {
    let rt = runtime();
    let d = rt.deferred(|resolver: Resolver<&'static str, Fault>| {
        resolver.fulfill("kept");
        Err(Fault::new("too late"))
    });

    assert_eq!(rt.block_on(&d), Ok("kept"));
}

#[test]
fn test_setup_failure_rejects() {
    let rt = runtime();
    let d = rt.deferred(|_resolver: Resolver<i32, Fault>| Err(Fault::new("setup failed")));

    assert_eq!(d.status(), Status::Rejected);
    assert_eq!(
        rt.block_on(&d),
        Err(AwaitError::Rejected(Fault::new("setup failed")))
    );
}

#[test]
fn test_resolver_settles_from_another_thread() {
    let rt = runtime();
    let (d, resolver) = rt.pending::<String, Fault>();
    let chain = d.then(|s| Ok(s.len()));

    let clone = resolver.clone();
    std::thread::spawn(move || clone.fulfill("from a worker".to_string()))
        .join()
        .unwrap();

    assert!(resolver.is_settled());
    assert!(!resolver.reject(Fault::new("late")));
    assert_eq!(rt.block_on(&chain), Ok(13));
}

#[test]
fn test_racing_threads_settle_once() {
    let rt = runtime();
    let (d, resolver) = rt.pending::<usize, Fault>();

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let resolver = resolver.clone();
            std::thread::spawn(move || resolver.fulfill(n))
        })
        .collect();
    let wins = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();

    assert_eq!(wins, 1);
    let value = rt.block_on(&d).unwrap();
    assert!(value < 8);
}

// =============================================================================
// PROPERTIES
// =============================================================================

#[derive(Debug, Clone)]
enum SettleCall {
    Fulfill(i32),
    Reject(String),
}

fn arb_settle_call() -> impl Strategy<Value = SettleCall> {
    prop_oneof![
        any::<i32>().prop_map(SettleCall::Fulfill),
        "[a-z]{1,12}".prop_map(SettleCall::Reject),
    ]
}

proptest! {
    #[test]
    fn first_settle_call_decides_outcome(calls in prop::collection::vec(arb_settle_call(), 1..12)) {
        let rt = Runtime::new();
        let replay = calls.clone();
        let d = rt.deferred(move |resolver: Resolver<i32, Fault>| {
            for call in replay {
                match call {
                    SettleCall::Fulfill(v) => resolver.fulfill(v),
                    SettleCall::Reject(m) => resolver.reject(Fault::new(m)),
                };
            }
            Ok(())
        });

        let expected = match &calls[0] {
            SettleCall::Fulfill(v) => Ok(*v),
            SettleCall::Reject(m) => Err(AwaitError::Rejected(Fault::new(m.clone()))),
        };
        prop_assert_eq!(rt.block_on(&d), expected);
    }

    #[test]
    fn exactly_one_handler_path_runs(fulfill in any::<bool>(), handlers in 1usize..6) {
        let rt = Runtime::new();
        let (result, error) = recorders();
        let source: Deferred<u8, Fault> = if fulfill {
            rt.fulfilled(1)
        } else {
            rt.rejected(Fault::new("no"))
        };

        for _ in 0..handlers {
            let result = result.clone();
            let error = error.clone();
            source.then_with(
                move |v| { result.record_call(); Ok(v) },
                move |_| { error.record_call(); Ok(0) },
            );
        }
        rt.run().unwrap();

        prop_assert_eq!(result.call_count() + error.call_count(), handlers);
        prop_assert_eq!(result.was_called(), fulfill);
        prop_assert_eq!(error.was_called(), !fulfill);
    }
}
