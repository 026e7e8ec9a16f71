// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the scheduling API

use thiserror::Error;

/// Errors surfaced synchronously to the caller.
///
/// Lookup misses (cancelling an unknown handle) are defined as no-ops, not
/// errors, so the only domain error is the delay-range precondition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid delay range: min {min} exceeds max {max}")]
    InvalidDelayRange { min: u64, max: u64 },
}
