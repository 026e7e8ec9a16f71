// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timed events and their lifecycle states.

use crate::delay::DelayRange;
use crate::handle::{CallbackId, CallbackRef};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a scheduled event.
///
/// `Run` events fire on drain. `Abort` and `Erase` both remove the event on
/// its next drain pass without firing; they differ in reference handling.
/// An aborted event still owns its callback reference and releases it on
/// removal. An erased event's reference was invalidated by teardown and is
/// dropped without release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventState {
    Run,
    Abort,
    Erase,
}

/// One scheduled callback instance.
///
/// Owns the callback reference for the lifetime of the schedule and tracks
/// the delay rolled at the most recent (re)schedule.
#[derive(Debug)]
pub struct TimedEvent {
    callback: CallbackRef,
    range: DelayRange,
    repeats: u32,
    state: EventState,
    delay: u64,
}

impl TimedEvent {
    /// Create a `Run` event with its first delay already rolled.
    ///
    /// `repeats` of zero repeats indefinitely; `N` fires N times total.
    pub fn new(callback: CallbackRef, range: DelayRange, repeats: u32) -> Self {
        let delay = range.roll();
        Self {
            callback,
            range,
            repeats,
            state: EventState::Run,
            delay,
        }
    }

    pub fn handle(&self) -> CallbackId {
        self.callback.id()
    }

    pub fn state(&self) -> EventState {
        self.state
    }

    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    /// Delay rolled at the most recent (re)schedule, in ticks.
    pub fn delay(&self) -> u64 {
        self.delay
    }

    /// Roll a fresh delay for a reschedule.
    pub fn reroll_delay(&mut self) {
        self.delay = self.range.roll();
    }

    /// Apply a caller-requested state change.
    ///
    /// Only forward transitions are honored: `Run` to `Abort`, `Run` to
    /// `Erase` and `Abort` to `Erase`. Nothing returns to `Run`, and an
    /// erased event never regains a release obligation.
    pub fn set_state(&mut self, next: EventState) {
        match next {
            EventState::Run => {}
            EventState::Abort => {
                if self.state == EventState::Run {
                    self.state = EventState::Abort;
                }
            }
            EventState::Erase => self.state = EventState::Erase,
        }
    }

    /// Whether the firing about to happen is the final one.
    pub fn is_final_firing(&self) -> bool {
        self.repeats == 1
    }

    /// Consume one repetition, returning the firings left after the current
    /// one. Zero means "none left" for finite events and "indefinite" for
    /// events created with a repeat count of zero.
    pub fn consume_repeat(&mut self) -> u32 {
        if self.repeats > 0 {
            self.repeats -= 1;
        }
        self.repeats
    }

    /// Surrender the callback reference for release or hand-off.
    pub fn into_callback(self) -> CallbackRef {
        self.callback
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
