// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host interpreter adapter

use crate::queue::EventQueue;
use chime_core::{CallbackId, CallbackRef, QueueOwner};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeHost, InvokeCall, Reaction};

/// Adapter for the host interpreter that stores and runs callback bodies.
///
/// Every method is called with the host-wide execution lock held, so
/// invocations are strictly serialized and never overlap queue mutation.
/// Implementations take `&self`; a host that must mutate interpreter state
/// does so through its own interior mutability.
pub trait ScriptHost {
    /// Whether the host runtime is still initialized.
    fn is_initialized(&self) -> bool;

    /// Whether the host still has a live interpreter state.
    ///
    /// Together with [`ScriptHost::is_initialized`] this gates reference
    /// release during teardown: when either is false there is nothing left
    /// to release into.
    fn has_interpreter_state(&self) -> bool;

    /// Run the callback body registered under `handle`.
    ///
    /// `delay` is the delay this firing was scheduled with. `repeats_left`
    /// is the number of firings remaining after this one, and always zero
    /// for indefinitely repeating events. The callback may re-enter the
    /// scheduler through `queue`, adding or cancelling events on the very
    /// queue being drained; it must not drain it.
    fn invoke_callback(
        &self,
        queue: &mut EventQueue,
        handle: CallbackId,
        delay: u64,
        repeats_left: u32,
        owner: QueueOwner,
    );

    /// Tell the interpreter to forget a registered callback slot.
    fn release_callback(&self, callback: CallbackRef);
}
