//! # Time Provider
//!
//! Abstracts UTC timekeeping (§6.3) behind a trait so the Scheduler and
//! BandSelector never call `chrono::Utc::now()` directly. `SystemTimeProvider`
//! backs real operation; `MockTimeProvider` drives a virtual clock for
//! deterministic, discrete-event tests (Design Notes §9) — the approach the
//! teacher crate applies to timer mocking in `tests/mock_support.rs`.

use chrono::{Datelike, Timelike, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Time source consumed by the Scheduler, BandSelector, and BeaconFsm.
pub trait TimeProvider: Send + Sync {
    /// Current time as UNIX seconds (UTC).
    fn now_unix_seconds(&self) -> i64;

    /// Current UTC hour-of-day, 0..23.
    fn utc_hour(&self) -> u32 {
        ((self.now_unix_seconds().rem_euclid(86_400)) / 3600) as u32
    }

    /// Current UTC minute-of-hour, 0..59.
    fn utc_minute(&self) -> u32 {
        ((self.now_unix_seconds().rem_euclid(3600)) / 60) as u32
    }

    /// Current UTC second-of-minute, 0..59.
    fn utc_second(&self) -> u32 {
        (self.now_unix_seconds().rem_euclid(60)) as u32
    }

    /// Whether the clock has been synchronized against an external source.
    fn is_synced(&self) -> bool;

    /// Request a (re-)sync against the given server. Fire-and-forget from the
    /// caller's perspective; completion is observed via `is_synced()`.
    fn request_sync(&self, server: &str);
}

/// Real wall-clock time source, backed by `chrono::Utc::now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeProvider {
    synced: bool,
}

impl SystemTimeProvider {
    pub fn new() -> Self {
        Self { synced: false }
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now_unix_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn utc_hour(&self) -> u32 {
        Utc::now().hour()
    }

    fn utc_minute(&self) -> u32 {
        Utc::now().minute()
    }

    fn utc_second(&self) -> u32 {
        Utc::now().second()
    }

    fn is_synced(&self) -> bool {
        self.synced
    }

    fn request_sync(&self, server: &str) {
        crate::logging::log_info(&format!("requesting SNTP sync against {server}"));
    }
}

/// A discrete-event virtual clock for host-side tests. `advance()` moves time
/// forward explicitly; nothing here ever calls `std::thread::sleep`.
#[derive(Clone)]
pub struct MockTimeProvider {
    unix_seconds: Arc<AtomicI64>,
    synced: Arc<std::sync::atomic::AtomicBool>,
}

impl MockTimeProvider {
    /// Create a mock clock starting at the given UNIX-seconds timestamp.
    pub fn new(start_unix_seconds: i64) -> Self {
        Self {
            unix_seconds: Arc::new(AtomicI64::new(start_unix_seconds)),
            synced: Arc::new(std::sync::atomic::AtomicBool::new(true)),
        }
    }

    /// Build a mock clock sitting at an exact UTC `hh:mm:ss` on an arbitrary
    /// reference day, which is all the Scheduler/BandSelector logic cares
    /// about.
    pub fn at_hms(hour: u32, minute: u32, second: u32) -> Self {
        let seconds_since_epoch_day = (hour as i64) * 3600 + (minute as i64) * 60 + second as i64;
        // Anchor on an arbitrary Thursday so `utc_hour` arithmetic via rem_euclid
        // lines up; the day component is irrelevant to every tested invariant.
        Self::new(1_700_000_000 - (1_700_000_000 % 86_400) + seconds_since_epoch_day)
    }

    /// Advance the virtual clock by `seconds`.
    pub fn advance(&self, seconds: i64) {
        self.unix_seconds.fetch_add(seconds, Ordering::SeqCst);
    }

    pub fn set_synced(&self, synced: bool) {
        self.synced.store(synced, Ordering::SeqCst);
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_unix_seconds(&self) -> i64 {
        self.unix_seconds.load(Ordering::SeqCst)
    }

    fn is_synced(&self) -> bool {
        self.synced.load(Ordering::SeqCst)
    }

    fn request_sync(&self, _server: &str) {
        self.synced.store(true, Ordering::SeqCst);
    }
}
