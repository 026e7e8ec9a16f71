// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue ownership identity.
//!
//! Every event queue belongs either to one game entity or to the host-wide
//! global queue. The owner is stored on the queue and handed to every
//! callback invocation so scripts know which object fired.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a game entity (host object GUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn new(guid: u64) -> Self {
        Self(guid)
    }

    pub fn guid(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(guid: u64) -> Self {
        Self(guid)
    }
}

/// Owner of an event queue.
///
/// Serializes as a tagged enum:
/// - `{"type": "global"}`
/// - `{"type": "entity", "id": 42}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum QueueOwner {
    /// The host-wide queue with no owning entity.
    #[serde(rename = "global")]
    Global,
    /// A queue bound to one game entity.
    #[serde(rename = "entity")]
    Entity(EntityId),
}

impl QueueOwner {
    /// Create an entity owner.
    pub fn entity(id: impl Into<EntityId>) -> Self {
        QueueOwner::Entity(id.into())
    }

    pub fn is_global(&self) -> bool {
        matches!(self, QueueOwner::Global)
    }

    /// The owning entity, if this is not the global queue.
    pub fn entity_id(&self) -> Option<EntityId> {
        match self {
            QueueOwner::Global => None,
            QueueOwner::Entity(id) => Some(*id),
        }
    }
}

impl fmt::Display for QueueOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueOwner::Global => write!(f, "global"),
            QueueOwner::Entity(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
#[path = "owner_tests.rs"]
mod tests;
