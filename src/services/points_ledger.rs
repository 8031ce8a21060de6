//! Points ledger: the only code path that changes a user's points.
//!
//! A completed task is worth [`POINTS_PER_TASK`] to its mentor and to every
//! mentee in the mentor's group. Updates are best effort: the mentor step and
//! the mentee step are always both attempted, and failures are logged and
//! counted instead of aborting the caller's operation.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::database::UserStore;

pub const POINTS_PER_TASK: i64 = 10;

static MENTOR_MISSES: AtomicU64 = AtomicU64::new(0);
static LEDGER_FAILURES: AtomicU64 = AtomicU64::new(0);

/// Times the mentor step matched no account
pub fn mentor_miss_count() -> u64 {
    MENTOR_MISSES.load(Ordering::Relaxed)
}

/// Times a ledger step failed at the store
pub fn failure_count() -> u64 {
    LEDGER_FAILURES.load(Ordering::Relaxed)
}

/// Points delta for a task moving into the given completion state
pub fn delta_for(completed: bool) -> i64 {
    if completed {
        POINTS_PER_TASK
    } else {
        -POINTS_PER_TASK
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerOutcome {
    pub delta: i64,
    pub mentor_updated: bool,
    pub mentees_updated: u64,
    pub failures: u32,
}

/// Adds `delta` to the mentor named `mentor_name` and to every member of their group.
pub async fn apply_delta<S>(users: &S, mentor_name: &str, delta: i64) -> LedgerOutcome
where
    S: UserStore + ?Sized,
{
    let mut outcome = LedgerOutcome {
        delta,
        mentor_updated: false,
        mentees_updated: 0,
        failures: 0,
    };

    match users.increment_mentor_points(mentor_name, delta).await {
        Ok(0) => {
            MENTOR_MISSES.fetch_add(1, Ordering::Relaxed);
            log::warn!(
                "⚠️  Points ledger: no mentor account named '{}' ({:+} not applied to mentor)",
                mentor_name,
                delta
            );
        }
        Ok(_) => outcome.mentor_updated = true,
        Err(e) => {
            LEDGER_FAILURES.fetch_add(1, Ordering::Relaxed);
            outcome.failures += 1;
            log::error!("❌ Points ledger: mentor update for '{}' failed: {}", mentor_name, e);
        }
    }

    match users.increment_mentee_points(mentor_name, delta).await {
        Ok(count) => outcome.mentees_updated = count,
        Err(e) => {
            LEDGER_FAILURES.fetch_add(1, Ordering::Relaxed);
            outcome.failures += 1;
            log::error!("❌ Points ledger: mentee update for '{}' failed: {}", mentor_name, e);
        }
    }

    log::info!(
        "🏆 Points ledger: {:+} for '{}' (mentor: {}, mentees: {})",
        delta,
        mentor_name,
        outcome.mentor_updated,
        outcome.mentees_updated
    );

    outcome
}
