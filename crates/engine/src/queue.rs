// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-owner event queue.
//!
//! Holds the owner-local clock, the due-time ordering and the handle index
//! used for O(1) cancellation. Physical removal of cancelled events is
//! always deferred to the next drain pass, which is the single place an
//! event's callback reference is finalized.

use crate::host::ScriptHost;
use chime_core::{CallbackId, CallbackRef, DelayRange, EventState, QueueOwner, TimedEvent};
use std::collections::{BTreeMap, HashMap};

/// Position of an event in the time-ordered index: absolute due tick plus a
/// per-queue sequence number breaking ties between equal due ticks.
type TimeKey = (u64, u64);

/// Time-ordered queue of scheduled callbacks for one owner.
///
/// All methods expect the caller to hold the host-wide execution lock; the
/// registry enforces that for every path it exposes.
#[derive(Debug)]
pub struct EventQueue {
    owner: QueueOwner,
    clock: u64,
    seq: u64,
    by_time: BTreeMap<TimeKey, TimedEvent>,
    by_handle: HashMap<CallbackId, TimeKey>,
}

impl EventQueue {
    pub fn new(owner: QueueOwner) -> Self {
        Self {
            owner,
            clock: 0,
            seq: 0,
            by_time: BTreeMap::new(),
            by_handle: HashMap::new(),
        }
    }

    pub fn owner(&self) -> QueueOwner {
        self.owner
    }

    /// Owner-local elapsed time, in ticks.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Number of scheduled entries, counting aborted and erased events not
    /// yet swept by drain.
    pub fn len(&self) -> usize {
        self.by_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_time.is_empty()
    }

    /// Absolute tick of the earliest scheduled entry.
    pub fn next_due(&self) -> Option<u64> {
        self.by_time.keys().next().map(|&(due, _)| due)
    }

    /// Schedule `callback` to fire after a delay drawn from `range`.
    ///
    /// `repeats` of zero repeats indefinitely; `N` fires N times total.
    /// Adding under a handle that is already scheduled replaces the prior
    /// schedule. Both registrations name the same interpreter slot, so the
    /// replaced event's reference is dropped without a release.
    pub fn add(&mut self, callback: CallbackRef, range: DelayRange, repeats: u32) {
        if let Some(key) = self.by_handle.remove(&callback.id()) {
            self.by_time.remove(&key);
        }
        self.schedule(TimedEvent::new(callback, range, repeats));
    }

    /// Request a state change for one handle.
    ///
    /// `Erase` drops the handle index entry immediately, so repeated erases
    /// are idempotent and a later add under the same handle starts clean.
    /// Unknown handles are a no-op.
    pub fn set_state(&mut self, handle: CallbackId, state: EventState) {
        let key = match state {
            EventState::Erase => self.by_handle.remove(&handle),
            _ => self.by_handle.get(&handle).copied(),
        };
        if let Some(key) = key {
            if let Some(event) = self.by_time.get_mut(&key) {
                event.set_state(state);
            }
        }
    }

    /// Request a state change for every scheduled event.
    pub fn set_all_states(&mut self, state: EventState) {
        for event in self.by_time.values_mut() {
            event.set_state(state);
        }
        if state == EventState::Erase {
            self.by_handle.clear();
        }
    }

    /// Advance the clock by `elapsed` ticks and handle everything due,
    /// earliest first.
    ///
    /// A repeating event is rescheduled *before* its callback runs, so a
    /// callback cancelling or inspecting its own handle observes the
    /// rescheduled event, never a dangling one.
    pub fn drain<H: ScriptHost>(&mut self, elapsed: u64, host: &H) {
        self.clock += elapsed;
        let owner = self.owner;
        loop {
            let key = match self.by_time.keys().next() {
                Some(&key) if key.0 <= self.clock => key,
                _ => break,
            };
            let Some(mut event) = self.by_time.remove(&key) else {
                break;
            };

            // The event is about to be finally handled; drop its index
            // entry. Erased events already lost theirs, and their handle
            // may since have been reused by a fresh registration.
            if event.state() != EventState::Erase {
                self.by_handle.remove(&event.handle());
            }

            match event.state() {
                EventState::Run => {
                    let handle = event.handle();
                    let delay = event.delay();
                    let final_firing = event.is_final_firing();
                    let repeats_left = event.consume_repeat();
                    if final_firing {
                        host.invoke_callback(self, handle, delay, repeats_left, owner);
                        Self::finalize(event, host);
                    } else {
                        event.reroll_delay();
                        self.schedule(event);
                        host.invoke_callback(self, handle, delay, repeats_left, owner);
                    }
                }
                EventState::Abort | EventState::Erase => Self::finalize(event, host),
            }
        }
    }

    /// Unconditionally remove every event, finalizing each the same way
    /// drain does. Used when an owner detaches and at full shutdown.
    pub fn discard_all<H: ScriptHost>(&mut self, host: &H) {
        for (_, event) in std::mem::take(&mut self.by_time) {
            Self::finalize(event, host);
        }
        self.by_handle.clear();
    }

    /// Insert an event keyed at `clock + delay` and index its handle.
    fn schedule(&mut self, event: TimedEvent) {
        let key = (self.clock + event.delay(), self.seq);
        self.seq += 1;
        self.by_handle.insert(event.handle(), key);
        self.by_time.insert(key, event);
    }

    /// Dispose of a removed event. Erase means ownership of the reference
    /// was already invalidated elsewhere; otherwise the reference is
    /// released, unless the host is torn down and there is nothing left to
    /// release into.
    fn finalize<H: ScriptHost>(event: TimedEvent, host: &H) {
        if event.state() != EventState::Erase
            && host.is_initialized()
            && host.has_interpreter_state()
        {
            host.release_callback(event.into_callback());
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
