// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake host interpreter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::ScriptHost;
use crate::queue::EventQueue;
use chime_core::{CallbackId, CallbackRef, DelayRange, EventState, QueueOwner};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Recorded callback invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeCall {
    pub handle: CallbackId,
    pub delay: u64,
    pub repeats_left: u32,
    pub owner: QueueOwner,
}

/// Re-entrant scheduler call a fake callback performs while it runs.
#[derive(Debug, Clone)]
pub enum Reaction {
    /// Cancel a handle (possibly the firing one) on the drained queue.
    Cancel(CallbackId, EventState),
    /// Cancel every event on the drained queue.
    CancelAll(EventState),
    /// Register a new event on the drained queue.
    Add {
        handle: CallbackId,
        range: DelayRange,
        repeats: u32,
    },
}

struct FakeHostState {
    initialized: bool,
    interpreter_alive: bool,
    invokes: Vec<InvokeCall>,
    releases: Vec<CallbackId>,
    reactions: HashMap<CallbackId, Reaction>,
}

/// Fake host interpreter recording invocations and releases.
#[derive(Clone)]
pub struct FakeHost {
    inner: Arc<Mutex<FakeHostState>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeHostState {
                initialized: true,
                interpreter_alive: true,
                invokes: Vec::new(),
                releases: Vec::new(),
                reactions: HashMap::new(),
            })),
        }
    }
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded invocations, in firing order.
    pub fn invokes(&self) -> Vec<InvokeCall> {
        self.inner.lock().invokes.clone()
    }

    /// Invocations recorded for one handle.
    pub fn invokes_for(&self, handle: impl Into<CallbackId>) -> Vec<InvokeCall> {
        let handle = handle.into();
        self.inner
            .lock()
            .invokes
            .iter()
            .filter(|call| call.handle == handle)
            .cloned()
            .collect()
    }

    /// Handles released so far, in release order.
    pub fn releases(&self) -> Vec<CallbackId> {
        self.inner.lock().releases.clone()
    }

    /// Number of times `handle` has been released.
    pub fn release_count(&self, handle: impl Into<CallbackId>) -> usize {
        let handle = handle.into();
        self.inner
            .lock()
            .releases
            .iter()
            .filter(|released| **released == handle)
            .count()
    }

    /// Script a re-entrant scheduler call to run whenever `handle` fires.
    pub fn react_on(&self, handle: impl Into<CallbackId>, reaction: Reaction) {
        self.inner.lock().reactions.insert(handle.into(), reaction);
    }

    /// Simulate full host teardown: releases are no longer possible.
    pub fn tear_down(&self) {
        let mut state = self.inner.lock();
        state.initialized = false;
        state.interpreter_alive = false;
    }

    /// Drop only the interpreter state, keeping the host initialized.
    pub fn drop_interpreter(&self) {
        self.inner.lock().interpreter_alive = false;
    }
}

impl ScriptHost for FakeHost {
    fn is_initialized(&self) -> bool {
        self.inner.lock().initialized
    }

    fn has_interpreter_state(&self) -> bool {
        self.inner.lock().interpreter_alive
    }

    fn invoke_callback(
        &self,
        queue: &mut EventQueue,
        handle: CallbackId,
        delay: u64,
        repeats_left: u32,
        owner: QueueOwner,
    ) {
        // Record first, then re-enter the queue outside the state lock.
        let reaction = {
            let mut state = self.inner.lock();
            state.invokes.push(InvokeCall {
                handle,
                delay,
                repeats_left,
                owner,
            });
            state.reactions.get(&handle).cloned()
        };
        match reaction {
            Some(Reaction::Cancel(target, state)) => queue.set_state(target, state),
            Some(Reaction::CancelAll(state)) => queue.set_all_states(state),
            Some(Reaction::Add {
                handle,
                range,
                repeats,
            }) => queue.add(CallbackRef::new(handle), range, repeats),
            None => {}
        }
    }

    fn release_callback(&self, callback: CallbackRef) {
        self.inner.lock().releases.push(callback.into_id());
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
