//! Clock synthesizer scenario tests from spec §8 (S5 and the
//! setup_clk_smooth/update_frequency_minimal idempotence round-trip).

use wspr_beacon::constants::TONE_SPACING_HZ;
use wspr_beacon::synth::{DriveStrength, MockHal, Si5351Driver};

const MS0_BASE: u8 = 42;
const OUTPUT_ENABLE_CONTROL: u8 = 3;
const PLL_RESET: u8 = 177;

/// S5 — glitch-free tone change. One WSPR tone step up from 14,097,100 Hz
/// touches only the fractional bytes at MS0_base+6; the output-enable and
/// PLL-reset registers are left alone.
#[test]
fn s5_glitch_free_tone_change_touches_only_the_fractional_bytes() {
    let mut driver = Si5351Driver::new(MockHal::new());
    driver
        .setup_clk_smooth(14_097_100, 0, DriveStrength::Ma8)
        .unwrap();
    driver.hal_mut().clear_trace();

    let next_hz = (14_097_100.0 + TONE_SPACING_HZ * 2.0).round() as u32;
    driver
        .update_frequency_minimal(next_hz, 0, DriveStrength::Ma8)
        .unwrap();

    let trace = driver.hal_mut().trace();
    assert_eq!(trace.len(), 1, "exactly one I2C transaction");
    let (reg, data) = &trace[0];
    assert_eq!(*reg, MS0_BASE + 6);
    assert_eq!(data.len(), 2);
    assert!(trace.iter().all(|(r, _)| *r != OUTPUT_ENABLE_CONTROL));
    assert!(trace.iter().all(|(r, _)| *r != PLL_RESET));
}

/// Round-trip/idempotence — calling `update_frequency_minimal` with the same
/// frequency `setup_clk_smooth` already programmed leaves the fractional
/// bytes unchanged from what `setup_clk_smooth` alone wrote.
#[test]
fn update_frequency_minimal_is_a_no_op_at_the_already_programmed_frequency() {
    let mut a = Si5351Driver::new(MockHal::new());
    a.setup_clk_smooth(14_097_100, 0, DriveStrength::Ma8).unwrap();
    let frac_after_smooth = {
        let trace = a.hal_mut().trace();
        trace
            .iter()
            .find(|(reg, _)| *reg == MS0_BASE + 6)
            .map(|(_, data)| data.clone())
    };

    let mut b = Si5351Driver::new(MockHal::new());
    b.setup_clk_smooth(14_097_100, 0, DriveStrength::Ma8).unwrap();
    b.update_frequency_minimal(14_097_100, 0, DriveStrength::Ma8)
        .unwrap();
    let frac_after_update = {
        let trace = b.hal_mut().trace();
        trace
            .iter()
            .rev()
            .find(|(reg, _)| *reg == MS0_BASE + 6)
            .map(|(_, data)| data.clone())
    };

    assert_eq!(frac_after_smooth, frac_after_update);
}
