// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of live event queues and the host-wide locking discipline.

use crate::host::ScriptHost;
use crate::queue::EventQueue;
use chime_core::{CallbackId, CallbackRef, DelayRange, EntityId, EventState, QueueOwner};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Everything the execution lock guards: the host adapter, the global
/// queue, and the storage of every owner-bound queue. Firing a callback
/// re-enters the shared interpreter, so all queue mutation, every drain and
/// every callback invocation is serialized here.
struct ExecState<H> {
    host: H,
    global: EventQueue,
    owned: HashMap<EntityId, EventQueue>,
}

impl<H> ExecState<H> {
    fn queue_mut(&mut self, target: QueueOwner) -> Option<&mut EventQueue> {
        match target {
            QueueOwner::Global => Some(&mut self.global),
            QueueOwner::Entity(id) => self.owned.get_mut(&id),
        }
    }
}

/// Tracks the global queue and every live per-owner queue.
///
/// Two locks with distinct roles. The execution lock serializes all queue
/// mutation, drains and callback invocation. The registry lock guards queue
/// membership only; it is never held while a callback runs and never held
/// while the execution lock is being taken, so no ordering inversion can
/// arise between a thread destroying a queue and a thread draining one.
pub struct EventRegistry<H: ScriptHost> {
    exec: Mutex<ExecState<H>>,
    members: Mutex<HashSet<EntityId>>,
}

impl<H: ScriptHost> EventRegistry<H> {
    pub fn new(host: H) -> Self {
        Self {
            exec: Mutex::new(ExecState {
                host,
                global: EventQueue::new(QueueOwner::Global),
                owned: HashMap::new(),
            }),
            members: Mutex::new(HashSet::new()),
        }
    }

    /// Create and register the queue for an entity attaching to the
    /// scripting system. An entity that already has a queue keeps it.
    pub fn create_owner_queue(&self, entity: EntityId) {
        {
            let mut exec = self.exec.lock();
            exec.owned
                .entry(entity)
                .or_insert_with(|| EventQueue::new(QueueOwner::Entity(entity)));
        }
        self.members.lock().insert(entity);
        tracing::debug!(entity = %entity, "owner queue registered");
    }

    /// Tear down an entity's queue: discard its pending events (releasing
    /// their callback references) under the execution lock, then drop its
    /// membership under the registry lock.
    pub fn destroy_owner_queue(&self, entity: EntityId) {
        {
            let mut exec = self.exec.lock();
            let exec = &mut *exec;
            if let Some(mut queue) = exec.owned.remove(&entity) {
                queue.discard_all(&exec.host);
            }
        }
        self.members.lock().remove(&entity);
        tracing::debug!(entity = %entity, "owner queue destroyed");
    }

    /// Schedule a callback on the targeted queue.
    ///
    /// Scheduling against an entity with no registered queue frees the slot
    /// instead of leaking it in the interpreter.
    pub fn add_event(
        &self,
        target: QueueOwner,
        callback: CallbackRef,
        range: DelayRange,
        repeats: u32,
    ) {
        let mut exec = self.exec.lock();
        let exec = &mut *exec;
        match target {
            QueueOwner::Global => exec.global.add(callback, range, repeats),
            QueueOwner::Entity(id) => match exec.owned.get_mut(&id) {
                Some(queue) => queue.add(callback, range, repeats),
                None => {
                    tracing::warn!(
                        entity = %id,
                        handle = %callback.id(),
                        "add_event for unregistered entity, releasing callback"
                    );
                    if exec.host.is_initialized() && exec.host.has_interpreter_state() {
                        exec.host.release_callback(callback);
                    }
                }
            },
        }
    }

    /// Cancel one handle on the targeted queue. Unknown handles and
    /// unregistered entities are a no-op.
    pub fn cancel_event(&self, target: QueueOwner, handle: CallbackId, state: EventState) {
        let mut exec = self.exec.lock();
        if let Some(queue) = exec.queue_mut(target) {
            queue.set_state(handle, state);
        }
    }

    /// Cancel every event on the targeted queue.
    pub fn cancel_all_events(&self, target: QueueOwner, state: EventState) {
        let mut exec = self.exec.lock();
        if let Some(queue) = exec.queue_mut(target) {
            queue.set_all_states(state);
        }
    }

    /// Drain the global queue. The host calls this once per tick with the
    /// elapsed time; owner queues are drained by the host's own per-entity
    /// tick through [`EventRegistry::drain_owner`].
    pub fn drive_tick(&self, elapsed: u64) {
        let mut exec = self.exec.lock();
        let exec = &mut *exec;
        exec.global.drain(elapsed, &exec.host);
    }

    /// Drain one entity's queue.
    pub fn drain_owner(&self, entity: EntityId, elapsed: u64) {
        let mut exec = self.exec.lock();
        let exec = &mut *exec;
        if let Some(queue) = exec.owned.get_mut(&entity) {
            queue.drain(elapsed, &exec.host);
        }
    }

    /// Apply a state change to one handle across every registered queue
    /// and the global queue.
    pub fn broadcast_set_state(&self, handle: CallbackId, state: EventState) {
        let members = self.snapshot_members();
        let mut exec = self.exec.lock();
        for entity in members {
            if let Some(queue) = exec.owned.get_mut(&entity) {
                queue.set_state(handle, state);
            }
        }
        exec.global.set_state(handle, state);
    }

    /// Apply a state change to every event in every registered queue and
    /// the global queue.
    pub fn broadcast_set_all(&self, state: EventState) {
        let members = self.snapshot_members();
        let mut exec = self.exec.lock();
        for entity in members {
            if let Some(queue) = exec.owned.get_mut(&entity) {
                queue.set_all_states(state);
            }
        }
        exec.global.set_all_states(state);
    }

    /// Whether an entity currently has a registered queue.
    pub fn has_owner_queue(&self, entity: EntityId) -> bool {
        self.members.lock().contains(&entity)
    }

    /// Number of events pending on the targeted queue, counting cancelled
    /// entries not yet swept by drain.
    pub fn pending_events(&self, target: QueueOwner) -> usize {
        let exec = self.exec.lock();
        match target {
            QueueOwner::Global => exec.global.len(),
            QueueOwner::Entity(id) => exec.owned.get(&id).map_or(0, EventQueue::len),
        }
    }

    /// Snapshot membership under the registry lock, released before the
    /// execution lock is taken. Queues destroyed in between are skipped.
    fn snapshot_members(&self) -> Vec<EntityId> {
        self.members.lock().iter().copied().collect()
    }
}

impl<H: ScriptHost> Drop for EventRegistry<H> {
    /// Full-system teardown: discard every remaining owner queue's pending
    /// events, then the global queue's, so nothing fires into a host that
    /// is shutting down.
    fn drop(&mut self) {
        let ExecState {
            host,
            global,
            owned,
        } = self.exec.get_mut();
        for queue in owned.values_mut() {
            queue.discard_all(host);
        }
        global.discard_all(host);
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
