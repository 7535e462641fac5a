//! Combinator Tests
//!
//! all, all_settled and race over timer-driven inputs.

use crate::*;

fn after(rt: &Runtime, delay_ms: u64, outcome: Outcome<u64, Fault>) -> Deferred<u64, Fault> {
    let timers = rt.timers();
    rt.deferred(move |resolver| {
        timers.schedule_after(delay_ms, move || {
            resolver.settle(outcome);
        });
        Ok(())
    })
}

#[test]
fn test_all_keeps_input_order_not_settle_order() {
    let rt = runtime();
    let inputs = [
        after(&rt, 30, Outcome::Fulfilled(1)),
        after(&rt, 10, Outcome::Fulfilled(2)),
        after(&rt, 20, Outcome::Fulfilled(3)),
    ];

    let combined = all(&rt.scheduler(), &inputs);

    assert_eq!(rt.block_on(&combined), Ok(vec![1, 2, 3]));
    assert_eq!(rt.now_ms(), 30);
}

#[test]
fn test_all_rejects_as_soon_as_one_input_rejects() {
    let rt = runtime();
    let inputs = [
        after(&rt, 50, Outcome::Fulfilled(1)),
        after(&rt, 5, Outcome::Rejected(Fault::new("early"))),
    ];

    let combined = all(&rt.scheduler(), &inputs);

    assert_eq!(
        rt.block_on(&combined),
        Err(AwaitError::Rejected(Fault::new("early")))
    );
    assert_eq!(rt.now_ms(), 5);
}

#[test]
fn test_all_settled_reports_each_outcome() {
    let rt = runtime();
    let inputs = [
        after(&rt, 10, Outcome::Rejected(Fault::new("first"))),
        after(&rt, 20, Outcome::Fulfilled(2)),
    ];

    let combined = all_settled(&rt.scheduler(), &inputs);

    assert_eq!(
        rt.block_on(&combined),
        Ok(vec![
            Outcome::Rejected(Fault::new("first")),
            Outcome::Fulfilled(2),
        ])
    );
    assert!(rt.unhandled_rejections().is_empty());
}

#[test]
fn test_race_settles_with_earliest_input() {
    let rt = runtime();
    let inputs = [
        after(&rt, 40, Outcome::Fulfilled(40)),
        after(&rt, 15, Outcome::Rejected(Fault::new("fastest"))),
        after(&rt, 25, Outcome::Fulfilled(25)),
    ];

    let winner = race(&rt.scheduler(), &inputs);

    assert_eq!(
        rt.block_on(&winner),
        Err(AwaitError::Rejected(Fault::new("fastest")))
    );

    // Later inputs still settle without changing the winner
    rt.run().unwrap();
    assert_eq!(
        winner.outcome(),
        Some(Outcome::Rejected(Fault::new("fastest")))
    );
}

#[test]
fn test_race_of_nothing_stalls() {
    let rt = runtime();
    let winner = race::<u64, Fault>(&rt.scheduler(), &[]);

    match rt.block_on(&winner) {
        Err(AwaitError::Runtime(e)) => assert!(e.is_stalled()),
        other => panic!("expected a stall, got {:?}", other),
    }
}
