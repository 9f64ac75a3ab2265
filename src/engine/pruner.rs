//! Good-for-day pruning daemon.
//!
//! The pruner thread sleeps until the next occurrence of the configured
//! prune hour (local wall-clock time), wakes, collects the ids of every
//! resting GFD order, and bulk-cancels them. Collection and cancellation are
//! separate critical sections with nothing held in between; the thread never
//! touches the book lock while sleeping.
//!
//! Shutdown is a flag under its own mutex plus a condvar: the engine's drop
//! sets the flag, notifies, and joins.

use std::time::Duration;

use chrono::{DateTime, Local, LocalResult, Timelike};
use tracing::info;

use super::Shared;

/// Used when the calendar math fails (end of representable time, or a local
/// time that does not exist); one day is always a safe re-check interval.
const FALLBACK_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Daemon loop: wait for the prune moment or shutdown, whichever first.
pub(super) fn run(shared: &Shared) {
    loop {
        let wait = duration_until_prune(shared.prune_hour);

        let stopped = {
            let guard = shared.shutdown.lock().expect("shutdown mutex poisoned");
            let (guard, _) = shared
                .shutdown_signal
                .wait_timeout_while(guard, wait, |stop| !*stop)
                .expect("shutdown mutex poisoned");
            *guard
        };
        if stopped {
            return;
        }

        let cancelled = prune_cycle(shared);
        if cancelled > 0 {
            info!(cancelled, "good-for-day orders pruned");
        }
    }
}

/// One prune pass: collect the GFD ids under the book lock, release, then
/// bulk-cancel under a fresh acquisition. Returns how many were cancelled.
pub(super) fn prune_cycle(shared: &Shared) -> usize {
    let ids = shared.lock_book().gfd_order_ids();
    if ids.is_empty() {
        return 0;
    }

    shared.lock_book().cancel_many(&ids);
    ids.len()
}

/// Time left until the next occurrence of `prune_hour` local time.
fn duration_until_prune(prune_hour: u32) -> Duration {
    prune_delay(Local::now(), prune_hour)
}

/// `duration_until_prune` with an injected clock. If today's occurrence has
/// already started, the next one is tomorrow's.
fn prune_delay(now: DateTime<Local>, prune_hour: u32) -> Duration {
    let mut date = now.date_naive();
    if now.hour() >= prune_hour {
        date = match date.succ_opt() {
            Some(next) => next,
            None => return FALLBACK_DELAY,
        };
    }

    let Some(target) = date.and_hms_opt(prune_hour, 0, 0) else {
        return FALLBACK_DELAY;
    };

    match target.and_local_timezone(Local) {
        LocalResult::Single(target) | LocalResult::Ambiguous(target, _) => {
            (target - now).to_std().unwrap_or(Duration::ZERO)
        }
        LocalResult::None => FALLBACK_DELAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_delay_bounded_for_every_hour() {
        let now = Local::now();
        for hour in 0..24 {
            let delay = prune_delay(now, hour);
            // Never more than a day plus a DST adjustment.
            assert!(delay <= Duration::from_secs(25 * 60 * 60), "hour {hour}");
        }
    }

    #[test]
    fn test_prune_delay_rolls_to_tomorrow_when_hour_started() {
        let now = Local::now();
        let delay = prune_delay(now, now.hour());
        // Today's occurrence already started, so the target is tomorrow's:
        // at least the rest of today plus the hours up to the prune hour,
        // which is always well over 20 hours even across a DST shift.
        assert!(delay > Duration::from_secs(20 * 60 * 60));
    }
}
