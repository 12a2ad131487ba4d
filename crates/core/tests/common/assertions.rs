//! Custom assertion helpers and event-channel utilities.

use sf_protocol::ipc::Event;
use std::time::Duration;
use tokio::sync::mpsc;

/// Receive events until one matches `pred`, panicking after five seconds.
///
/// Non-matching events are discarded, so callers can wait for the event
/// they care about without enumerating everything in between.
#[allow(dead_code)]
pub async fn wait_for_event<F>(rx: &mut mpsc::Receiver<Event>, pred: F) -> Event
where
    F: Fn(&Event) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match rx.recv().await {
                Some(event) if pred(&event) => return event,
                Some(_) => continue,
                None => panic!("event channel closed while waiting"),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

/// Collect every event arriving within `window`.
#[allow(dead_code)]
pub async fn collect_events_for(
    rx: &mut mpsc::Receiver<Event>,
    window: Duration,
) -> Vec<Event> {
    let mut events = Vec::new();
    let deadline = tokio::time::Instant::now() + window;

    while tokio::time::Instant::now() < deadline {
        match tokio::time::timeout(Duration::from_millis(50), rx.recv()).await {
            Ok(Some(event)) => events.push(event),
            Ok(None) => break,
            Err(_) => continue,
        }
    }
    events
}

/// Assert that a sequence of events contains a PipelineError naming
/// `operation`.
#[allow(dead_code)]
pub fn assert_has_error_for(events: &[Event], operation: &str) {
    assert!(
        events.iter().any(|e| matches!(
            e,
            Event::PipelineError { operation: op, .. } if op == operation
        )),
        "expected a PipelineError for '{operation}', got: {events:?}"
    );
}

/// Assert that no inventory update was ever delivered.
#[allow(dead_code)]
pub fn assert_no_inventory_update(events: &[Event]) {
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, Event::InventoryUpdated { .. })),
        "unexpected inventory update in: {events:?}"
    );
}
