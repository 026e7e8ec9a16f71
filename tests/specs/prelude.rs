//! Shared helpers for the behavioral specs.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use chime_core::{CallbackRef, DelayRange, EntityId};
use chime_engine::{EventRegistry, FakeHost};

/// A registry wired to a recording fake host, plus a handle on the host
/// for assertions.
pub fn harness() -> (EventRegistry<FakeHost>, FakeHost) {
    let host = FakeHost::new();
    (EventRegistry::new(host.clone()), host)
}

pub fn cb(slot: u32) -> CallbackRef {
    CallbackRef::new(slot)
}

pub fn fixed(ticks: u64) -> DelayRange {
    DelayRange::fixed(ticks)
}

pub fn entity(guid: u64) -> EntityId {
    EntityId::new(guid)
}
