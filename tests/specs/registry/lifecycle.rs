//! Owner queue lifecycle and registry teardown.

use crate::prelude::*;
use chime_core::{CallbackId, EventState, QueueOwner};

#[test]
fn destroying_an_owner_queue_releases_every_pending_reference_once() {
    let (registry, host) = harness();
    let npc = entity(0x100);
    registry.create_owner_queue(npc);
    registry.add_event(QueueOwner::Entity(npc), cb(1), fixed(10), 0);
    registry.add_event(QueueOwner::Entity(npc), cb(2), fixed(500), 3);

    registry.destroy_owner_queue(npc);

    assert_eq!(host.release_count(1), 1);
    assert_eq!(host.release_count(2), 1);
    assert!(!registry.has_owner_queue(npc));

    // Nothing fires for the entity afterwards.
    registry.drain_owner(npc, 1000);
    assert!(host.invokes().is_empty());
}

#[test]
fn entity_queues_are_isolated_from_each_other_and_from_global() {
    let (registry, host) = harness();
    let a = entity(1);
    let b = entity(2);
    registry.create_owner_queue(a);
    registry.create_owner_queue(b);
    registry.add_event(QueueOwner::Entity(a), cb(1), fixed(10), 1);
    registry.add_event(QueueOwner::Entity(b), cb(2), fixed(10), 1);
    registry.add_event(QueueOwner::Global, cb(3), fixed(10), 1);

    registry.drain_owner(a, 10);
    assert_eq!(host.invokes().len(), 1);
    assert_eq!(host.invokes()[0].owner, QueueOwner::Entity(a));

    registry.drive_tick(10);
    assert_eq!(host.invokes().len(), 2);
    assert_eq!(host.invokes()[1].owner, QueueOwner::Global);

    registry.drain_owner(b, 10);
    assert_eq!(host.invokes().len(), 3);
    assert_eq!(host.invokes()[2].owner, QueueOwner::Entity(b));
}

#[test]
fn owner_clocks_advance_independently() {
    let (registry, host) = harness();
    let fast = entity(1);
    let slow = entity(2);
    registry.create_owner_queue(fast);
    registry.create_owner_queue(slow);
    registry.add_event(QueueOwner::Entity(fast), cb(1), fixed(100), 1);
    registry.add_event(QueueOwner::Entity(slow), cb(2), fixed(100), 1);

    registry.drain_owner(fast, 60);
    registry.drain_owner(fast, 60);
    registry.drain_owner(slow, 60);

    assert_eq!(host.invokes_for(1).len(), 1, "fast owner reached 120 ticks");
    assert!(host.invokes_for(2).is_empty(), "slow owner sits at 60 ticks");
}

#[test]
fn broadcast_erase_stops_every_queue_without_releases() {
    let (registry, host) = harness();
    let npc = entity(0x200);
    registry.create_owner_queue(npc);
    registry.add_event(QueueOwner::Entity(npc), cb(1), fixed(10), 0);
    registry.add_event(QueueOwner::Global, cb(2), fixed(10), 0);

    registry.broadcast_set_all(EventState::Erase);
    registry.drain_owner(npc, 10);
    registry.drive_tick(10);

    assert!(host.invokes().is_empty());
    assert!(host.releases().is_empty());
}

#[test]
fn broadcast_cancel_by_handle_reaches_owner_queues() {
    let (registry, host) = harness();
    let npc = entity(0x300);
    registry.create_owner_queue(npc);
    registry.add_event(QueueOwner::Entity(npc), cb(7), fixed(10), 0);

    registry.broadcast_set_state(CallbackId::new(7), EventState::Abort);
    registry.drain_owner(npc, 10);

    assert!(host.invokes().is_empty());
    assert_eq!(host.release_count(7), 1);
}

#[test]
fn registry_teardown_discards_owner_queues_then_global() {
    let (registry, host) = harness();
    let npc = entity(0x400);
    registry.create_owner_queue(npc);
    registry.add_event(QueueOwner::Entity(npc), cb(1), fixed(10), 0);
    registry.add_event(QueueOwner::Global, cb(2), fixed(10), 0);

    drop(registry);

    let mut released: Vec<u32> = host.releases().iter().map(|h| h.slot()).collect();
    released.sort_unstable();
    assert_eq!(released, vec![1, 2]);
    assert!(host.invokes().is_empty(), "teardown never fires callbacks");
}
