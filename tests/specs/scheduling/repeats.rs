//! Repeat-count behavior observed through the registry surface.

use crate::prelude::*;
use chime_core::QueueOwner;

#[test]
fn finite_event_fires_n_times_with_decreasing_indicators() {
    let (registry, host) = harness();
    registry.add_event(QueueOwner::Global, cb(1), fixed(100), 3);

    registry.drive_tick(100);
    registry.drive_tick(100);
    registry.drive_tick(100);

    let indicators: Vec<u32> = host
        .invokes_for(1)
        .iter()
        .map(|call| call.repeats_left)
        .collect();
    assert_eq!(indicators, vec![2, 1, 0]);
    assert_eq!(host.release_count(1), 1);

    // A fourth tick invokes nothing further for the handle.
    registry.drive_tick(100);
    assert_eq!(host.invokes_for(1).len(), 3);
    assert_eq!(host.release_count(1), 1);
}

#[test]
fn every_firing_reports_the_delay_it_was_scheduled_with() {
    let (registry, host) = harness();
    registry.add_event(QueueOwner::Global, cb(1), fixed(100), 2);

    registry.drive_tick(100);
    registry.drive_tick(100);

    assert!(host.invokes().iter().all(|call| call.delay == 100));
}

#[test]
fn infinite_event_fires_on_every_due_tick_until_cancelled() {
    let (registry, host) = harness();
    registry.add_event(QueueOwner::Global, cb(2), fixed(50), 0);

    for _ in 0..10 {
        registry.drive_tick(50);
    }
    assert_eq!(host.invokes_for(2).len(), 10);
    assert!(host.releases().is_empty());
}

#[test]
fn randomized_delay_fires_within_its_bounds() {
    let (registry, host) = harness();
    let range = chime_core::DelayRange::new(10, 30).unwrap();
    registry.add_event(QueueOwner::Global, cb(3), range, 1);

    // After 30 ticks the event is due no matter what was rolled.
    registry.drive_tick(30);
    let invokes = host.invokes_for(3);
    assert_eq!(invokes.len(), 1);
    assert!((10..=30).contains(&invokes[0].delay));
}

#[test]
fn events_do_not_fire_before_their_delay() {
    let (registry, host) = harness();
    registry.add_event(QueueOwner::Global, cb(4), fixed(100), 1);

    registry.drive_tick(99);
    assert!(host.invokes().is_empty());

    registry.drive_tick(1);
    assert_eq!(host.invokes_for(4).len(), 1);
}
