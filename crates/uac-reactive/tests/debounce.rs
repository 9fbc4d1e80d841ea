//! Debounce behaviour against both schedulers.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::LocalSet;
use uac_reactive::{DEFAULT_DEBOUNCE, Debounced, ManualScheduler, Signal, TokioScheduler};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Records every value published by the debounced output.
fn record(debounced: &Debounced<String>) -> (Rc<RefCell<Vec<String>>>, uac_reactive::Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let subscription = debounced.value().subscribe({
        let seen = Rc::clone(&seen);
        move |value: &String| seen.borrow_mut().push(value.clone())
    });
    (seen, subscription)
}

#[test]
fn burst_of_writes_publishes_once_with_last_value() {
    let scheduler = ManualScheduler::new();
    let input = Signal::new(String::new());
    let search = Debounced::new(&input, ms(400), Rc::new(scheduler.clone()));
    let (seen, _sub) = record(&search);

    for (gap, text) in [(0, "a"), (120, "an"), (399, "ann"), (50, "anna")] {
        scheduler.advance(ms(gap));
        input.set(text.to_string());
    }
    // Every write came within the delay of the previous one.
    assert!(seen.borrow().is_empty());

    scheduler.advance(ms(399));
    assert!(seen.borrow().is_empty());

    scheduler.advance(ms(1));
    assert_eq!(*seen.borrow(), vec!["anna".to_string()]);
    assert_eq!(search.value().get(), "anna");
    assert_eq!(search.value().version(), 1);
}

#[test]
fn separated_writes_each_publish() {
    let scheduler = ManualScheduler::new();
    let input = Signal::new(String::new());
    let search = Debounced::new(&input, ms(100), Rc::new(scheduler.clone()));
    let (seen, _sub) = record(&search);

    input.set("first".into());
    scheduler.advance(ms(100));
    input.set("second".into());
    scheduler.advance(ms(100));

    assert_eq!(*seen.borrow(), vec!["first".to_string(), "second".to_string()]);
}

#[test]
fn dispose_before_delay_prevents_any_update() {
    let scheduler = ManualScheduler::new();
    let input = Signal::new("initial".to_string());
    let mut search = Debounced::new(&input, ms(400), Rc::new(scheduler.clone()));
    let output = search.value();

    input.set("typed".into());
    scheduler.advance(ms(200));
    search.dispose();

    scheduler.run_until_idle();
    input.set("after".into());
    scheduler.run_until_idle();

    assert_eq!(output.get(), "initial");
    assert_eq!(output.version(), 0);
}

#[test]
fn dropping_projection_cancels_pending_publication() {
    let scheduler = ManualScheduler::new();
    let input = Signal::new(0_u32);
    let search = Debounced::new(&input, ms(50), Rc::new(scheduler.clone()));
    let output = search.value();

    input.set(7);
    assert_eq!(scheduler.pending(), 1);
    drop(search);

    assert_eq!(scheduler.pending(), 0);
    assert_eq!(input.observer_count(), 0);
    scheduler.run_until_idle();
    assert_eq!(output.get(), 0);
}

#[test]
fn default_delay_is_four_hundred_millis() {
    let scheduler = ManualScheduler::new();
    let input = Signal::new(1_i64);
    let projection = Debounced::with_default_delay(&input, Rc::new(scheduler.clone()));
    assert_eq!(projection.delay(), DEFAULT_DEBOUNCE);

    input.set(2);
    scheduler.advance(DEFAULT_DEBOUNCE - ms(1));
    assert_eq!(projection.value().get(), 1);
    scheduler.advance(ms(1));
    assert_eq!(projection.value().get(), 2);
}

#[tokio::test(start_paused = true)]
async fn tokio_scheduler_coalesces_on_local_set() {
    let local = LocalSet::new();
    local
        .run_until(async {
            let input = Signal::new(String::new());
            let search = Debounced::new(&input, ms(400), Rc::new(TokioScheduler));

            input.set("j".into());
            tokio::time::sleep(ms(100)).await;
            input.set("jo".into());
            tokio::time::sleep(ms(399)).await;
            assert_eq!(search.value().get(), "");

            tokio::time::sleep(ms(2)).await;
            assert_eq!(search.value().get(), "jo");
            assert_eq!(search.value().version(), 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn tokio_scheduler_dispose_aborts_timer() {
    let local = LocalSet::new();
    local
        .run_until(async {
            let input = Signal::new(1_u8);
            let mut projection = Debounced::new(&input, ms(50), Rc::new(TokioScheduler));

            input.set(2);
            projection.dispose();
            tokio::time::sleep(ms(200)).await;

            assert_eq!(projection.value().get(), 1);
        })
        .await;
}
