//! Scheduler invariants and literal scenarios from spec §8 (S6, boundary
//! behaviors, invariants 3/4/7). S3's exact dice-roll sequence is exercised
//! at the unit level in `scheduler::tests` with `StepRng`; the RNG-dependent
//! win/lose outcome for a non-0/100 tx_percent isn't reproduced here since it
//! depends on `rand`'s internal sampling algorithm rather than on anything
//! this crate controls, so it would be testing `rand`, not this scheduler.

use rand::rngs::mock::StepRng;
use wspr_beacon::scheduler::Scheduler;

/// Invariant 3 — tx_percent=0 never fires, over many successive windows.
#[test]
fn invariant_3_zero_percent_never_fires() {
    let mut sched = Scheduler::new();
    let mut rng = StepRng::new(0, 1);
    for minute in (0..120).step_by(2) {
        assert!(!sched.evaluate_tick(minute, 0, 0, &mut rng));
        sched.complete_transmission();
        // advance the latch past the window before the next even minute
        sched.evaluate_tick(minute, 6, 0, &mut rng);
    }
}

/// Invariant 4 — tx_percent=100 fires at every even-minute window.
#[test]
fn invariant_4_hundred_percent_fires_every_window() {
    let mut sched = Scheduler::new();
    let mut rng = StepRng::new(0, 1);
    for minute in (0..120).step_by(2) {
        assert!(sched.evaluate_tick(minute, 0, 100, &mut rng));
        sched.complete_transmission();
        sched.evaluate_tick(minute, 6, 100, &mut rng);
    }
}

/// Boundary — hh:00:00 on an even minute with tx_percent=100 fires.
#[test]
fn boundary_even_minute_zero_second_fires() {
    let mut sched = Scheduler::new();
    let mut rng = StepRng::new(0, 1);
    assert!(sched.evaluate_tick(0, 0, 100, &mut rng));
}

/// Boundary — hh:00:02 is outside the first-two-seconds window.
#[test]
fn boundary_second_two_is_outside_the_window() {
    let mut sched = Scheduler::new();
    let mut rng = StepRng::new(0, 1);
    assert!(!sched.evaluate_tick(0, 2, 100, &mut rng));
}

/// S6 — calibration mode suppresses new starts across several windows; an
/// in-progress transmission started before calibration still completes
/// (modeled here as `complete_transmission` remaining independently callable
/// while calibration is on).
#[test]
fn s6_calibration_mode_suppresses_new_starts_across_windows() {
    let mut sched = Scheduler::new();
    let mut rng = StepRng::new(0, 1);

    // A transmission is already in progress when calibration mode begins.
    assert!(sched.evaluate_tick(0, 0, 100, &mut rng));
    sched.evaluate_tick(0, 6, 100, &mut rng); // latch reset tick, as the live 1Hz loop would send
    sched.set_calibration_mode(true);

    // Three further even-minute windows: no new starts.
    for minute in [2, 4, 6] {
        assert!(!sched.evaluate_tick(minute, 0, 100, &mut rng));
        sched.evaluate_tick(minute, 6, 100, &mut rng);
    }

    // The earlier in-progress transmission can still complete normally.
    sched.complete_transmission();
    assert!(!sched.is_transmission_in_progress());

    // Leaving calibration mode restores normal scheduling.
    sched.set_calibration_mode(false);
    assert!(sched.evaluate_tick(8, 0, 100, &mut rng));
}

/// Invariant 7 — `seconds_until_next_opportunity` is a pure function of
/// (minute, second) alone, so a settings change mid-cycle doesn't perturb
/// the prediction for the same wall-clock instant.
#[test]
fn invariant_7_next_opportunity_prediction_is_stable_across_settings_changes() {
    let before = Scheduler::seconds_until_next_opportunity(7, 30);
    // Nothing in the scheduler's pure prediction depends on mutable state,
    // so "changing settings" (modeled by simply calling it again) is a no-op
    // on the computed value for the same (minute, second).
    let after = Scheduler::seconds_until_next_opportunity(7, 30);
    assert_eq!(before, after);
}

/// Round-trip/idempotence — `stop(); stop()` is a no-op, modeled here via
/// `cancel_current_transmission` since `Scheduler` itself has no `stop()`
/// beyond cancelling the latch.
#[test]
fn cancel_current_transmission_is_idempotent() {
    let mut sched = Scheduler::new();
    let mut rng = StepRng::new(0, 1);
    sched.evaluate_tick(0, 0, 100, &mut rng);
    sched.cancel_current_transmission();
    sched.cancel_current_transmission();
    assert!(!sched.is_transmission_in_progress());
}
