// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Callback handles and the owning reference token.
//!
//! The host interpreter stores registered callback bodies in its function
//! registry and hands out integer slots. [`CallbackId`] is the plain lookup
//! key for a slot; [`CallbackRef`] is the owning token for one registration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key for a callback slot in the host interpreter's function registry.
///
/// Doubles as the cancellation key: a queue holds at most one live event
/// per `CallbackId` at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallbackId(pub u32);

impl CallbackId {
    pub fn new(slot: u32) -> Self {
        Self(slot)
    }

    /// The raw registry slot.
    pub fn slot(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CallbackId {
    fn from(slot: u32) -> Self {
        Self(slot)
    }
}

/// Owning reference to one registered callback.
///
/// Exactly one live `CallbackRef` exists per registration. The token is
/// move-only: it leaves the system either through the host's
/// `release_callback`, which consumes it and frees the slot, or by being
/// dropped without release on the erase path, where ownership of the slot
/// was already invalidated by teardown.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct CallbackRef(CallbackId);

impl CallbackRef {
    pub fn new(id: impl Into<CallbackId>) -> Self {
        Self(id.into())
    }

    /// The lookup key for this reference.
    pub fn id(&self) -> CallbackId {
        self.0
    }

    /// Consume the token, yielding the slot to hand back to the host.
    pub fn into_id(self) -> CallbackId {
        self.0
    }
}

impl fmt::Display for CallbackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
