//! Transmission-opportunity scheduling (§4.5). Drives a 1 Hz tick that
//! dice-rolls against `tx_percent` at the start of each even UTC minute.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use tokio::time::{interval, sleep, Duration};

use crate::constants::WSPR_TX_DURATION;
use crate::time_provider::TimeProvider;

/// Pure, synchronous opportunity-evaluation state. Exposed standalone so
/// both the live async loop and tests can drive it without a runtime.
#[derive(Debug, Default)]
pub struct Scheduler {
    in_progress: bool,
    evaluated_this_window: bool,
    calibration_mode: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_transmission_in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn set_calibration_mode(&mut self, on: bool) {
        self.calibration_mode = on;
    }

    pub fn is_calibration_mode(&self) -> bool {
        self.calibration_mode
    }

    /// A pending end-callback becomes a no-op if the transmission was
    /// already cancelled or had already completed.
    pub fn cancel_current_transmission(&mut self) {
        self.in_progress = false;
    }

    pub fn complete_transmission(&mut self) {
        self.in_progress = false;
    }

    /// Evaluate one 1 Hz tick. Returns `true` exactly when `on_start`
    /// should fire this tick.
    pub fn evaluate_tick(&mut self, minute: u32, second: u32, tx_percent: u8, rng: &mut impl Rng) -> bool {
        if second >= 5 {
            self.evaluated_this_window = false;
        }

        let in_window = minute % 2 == 0 && second < 2;
        if !in_window || self.in_progress || self.evaluated_this_window || self.calibration_mode {
            return false;
        }

        self.evaluated_this_window = true;
        let roll: u8 = rng.gen_range(0..100);
        if roll < tx_percent {
            self.in_progress = true;
            true
        } else {
            false
        }
    }

    /// Seconds from `(minute, second)` to the start of the next even-minute
    /// window, computed deterministically with no reference to `now()`.
    pub fn seconds_until_next_opportunity(minute: u32, second: u32) -> u32 {
        if minute % 2 == 0 {
            if second < 2 {
                0
            } else {
                120 - second
            }
        } else {
            60 - second
        }
    }

    /// Seconds to the transmission expected to actually fire, assuming a
    /// uniform `tx_percent` dice-roll at every hour-eligible opportunity.
    /// Walks forward at most 24h (720 two-minute windows). Returns `-1` if
    /// `tx_percent == 0` or no eligible opportunity exists in that horizon.
    pub fn seconds_until_next_actual_transmission(
        hour: u32,
        minute: u32,
        second: u32,
        tx_percent: u8,
        band_eligible_this_hour: impl Fn(u32) -> bool,
    ) -> i64 {
        if tx_percent == 0 {
            return -1;
        }
        let target = (100 / tx_percent as u32).max(1);
        let first_offset = Self::seconds_until_next_opportunity(minute, second) as i64;
        let base_seconds_of_day = (hour * 3600 + minute * 60 + second) as i64;

        let mut found = 0u32;
        for k in 0..720i64 {
            let t = first_offset + k * 120;
            let abs = base_seconds_of_day + t;
            let hour_of_day = ((abs / 3600).rem_euclid(24)) as u32;
            if band_eligible_this_hour(hour_of_day) {
                found += 1;
                if found == target {
                    return t;
                }
            }
        }
        -1
    }
}

/// Drives `Scheduler` from a real 1 Hz tick, invoking `on_start`/`on_end`
/// callbacks. `on_start` returns `true` if the transmission actually began
/// (the caller may itself decline, e.g. if no band is eligible).
pub async fn run<T, FStart, FEnd>(
    scheduler: Arc<tokio::sync::Mutex<Scheduler>>,
    time: Arc<T>,
    tx_percent: impl Fn() -> u8 + Send + Sync + 'static,
    mut on_start: FStart,
    mut on_end: FEnd,
    stop: Arc<AtomicBool>,
) where
    T: TimeProvider + Send + Sync + 'static,
    FStart: FnMut() + Send + 'static,
    FEnd: FnMut() + Send + 'static,
{
    let mut tick = interval(Duration::from_secs(1));
    let mut rng = rand::thread_rng();

    while !stop.load(Ordering::Relaxed) {
        tick.tick().await;
        let minute = time.utc_minute();
        let second = time.utc_second();
        let fire = scheduler
            .lock()
            .await
            .evaluate_tick(minute, second, tx_percent(), &mut rng);

        if fire {
            on_start();
            let scheduler = scheduler.clone();
            tokio::spawn(async move {
                sleep(WSPR_TX_DURATION).await;
                scheduler.lock().await.complete_transmission();
            });
        }
    }
    on_end();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn window_boundaries_are_only_the_first_two_seconds_of_even_minutes() {
        assert_eq!(Scheduler::seconds_until_next_opportunity(0, 0), 0);
        assert_eq!(Scheduler::seconds_until_next_opportunity(0, 1), 0);
        assert_eq!(Scheduler::seconds_until_next_opportunity(0, 5), 115);
        assert_eq!(Scheduler::seconds_until_next_opportunity(1, 10), 50);
    }

    #[test]
    fn dice_roll_fires_at_most_once_per_window() {
        let mut sched = Scheduler::new();
        // StepRng alternates a value that is always < tx_percent, so every
        // opportunity "wins" the roll if allowed to run at all.
        let mut rng = StepRng::new(0, 0);
        assert!(sched.evaluate_tick(0, 0, 100, &mut rng));
        // Still within the same window (second < 5): latch should block a
        // second roll even though in_progress was reset.
        sched.complete_transmission();
        assert!(!sched.evaluate_tick(0, 1, 100, &mut rng));
    }

    #[test]
    fn latch_resets_once_past_second_five_of_the_window() {
        let mut sched = Scheduler::new();
        let mut rng = StepRng::new(0, 0);
        assert!(sched.evaluate_tick(0, 0, 100, &mut rng));
        sched.complete_transmission();
        // Still inside the same latched window (second 1): no re-roll.
        assert!(!sched.evaluate_tick(0, 1, 100, &mut rng));
        // Ticking past second 5 clears the latch for the next window.
        sched.evaluate_tick(0, 6, 100, &mut rng);
        assert!(sched.evaluate_tick(2, 0, 100, &mut rng));
    }

    #[test]
    fn calibration_mode_suppresses_new_starts() {
        let mut sched = Scheduler::new();
        sched.set_calibration_mode(true);
        let mut rng = StepRng::new(0, 0);
        assert!(!sched.evaluate_tick(0, 0, 100, &mut rng));
    }

    #[test]
    fn zero_percent_never_schedules_an_actual_transmission() {
        let t = Scheduler::seconds_until_next_actual_transmission(0, 0, 0, 0, |_| true);
        assert_eq!(t, -1);
    }

    #[test]
    fn no_eligible_hour_returns_minus_one() {
        let t = Scheduler::seconds_until_next_actual_transmission(0, 0, 0, 50, |_| false);
        assert_eq!(t, -1);
    }

    #[test]
    fn hundred_percent_fires_at_the_very_next_opportunity() {
        let t = Scheduler::seconds_until_next_actual_transmission(10, 3, 30, 100, |_| true);
        assert_eq!(t, Scheduler::seconds_until_next_opportunity(3, 30) as i64);
    }
}
