//! Si5351-class clock synthesizer driver: PLL and MultiSynth programming
//! over the `Hal` I²C transport (§4.2, §6.4).

use crate::constants::si5351_regs::*;
use crate::constants::DEFAULT_XTAL_HZ;
use crate::error::{BeaconError, Result};

use super::hal::Hal;

/// Which of the two PLLs (A or B) a MultiSynth output is sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pll {
    A,
    B,
}

/// Output R-divider, encoded as the 3-bit field value the register expects
/// (`0` = ÷1, `6` = ÷64).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RDiv {
    Div1 = 0,
    Div64 = 6,
}

/// PLL feedback-divider parameters: `f_pll = f_xtal * (mult + num/denom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PllConfig {
    pub mult: i64,
    pub num: i64,
    pub denom: i64,
}

/// MultiSynth output-divider parameters: `f_out = f_pll / (div + num/denom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub div: i64,
    pub num: i64,
    pub denom: i64,
    pub r_div: RDiv,
    pub integer_mode: bool,
}

/// Relative output drive strength, passed through to the CLK control
/// register's low two bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveStrength {
    Ma2 = 0,
    Ma4 = 1,
    Ma6 = 2,
    Ma8 = 3,
}

fn ms_base(output: u8) -> Option<u8> {
    match output {
        0 => Some(MS0_BASE),
        1 => Some(MS1_BASE),
        2 => Some(MS2_BASE),
        _ => None,
    }
}

fn clk_control_reg(output: u8) -> Option<u8> {
    match output {
        0 => Some(CLK0_CONTROL),
        1 => Some(CLK1_CONTROL),
        2 => Some(CLK2_CONTROL),
        _ => None,
    }
}

/// Driver state needed by the fractional-only fast path: which output and
/// integer divisor `setup_clk_smooth` last programmed.
#[derive(Debug, Clone, Copy)]
struct SmoothState {
    output: u8,
    div: i64,
    r_div: RDiv,
}

pub struct Si5351Driver<H: Hal> {
    hal: H,
    crystal_hz: u32,
    smooth: Option<SmoothState>,
}

impl<H: Hal> Si5351Driver<H> {
    pub fn new(hal: H) -> Self {
        Self::with_crystal(hal, DEFAULT_XTAL_HZ)
    }

    pub fn with_crystal(hal: H, crystal_hz: u32) -> Self {
        Si5351Driver {
            hal,
            crystal_hz,
            smooth: None,
        }
    }

    /// Disable every output and set a conservative default crystal load,
    /// matching the reference driver's power-up sequence.
    pub fn init(&mut self) -> Result<()> {
        self.write(OUTPUT_ENABLE_CONTROL, &[0xFF])?;
        self.write(CLK0_CONTROL, &[0x80])?;
        self.write(CLK1_CONTROL, &[0x80])?;
        self.write(CLK2_CONTROL, &[0x80])?;
        self.write(CRYSTAL_LOAD, &[CRYSTAL_LOAD_10PF])
    }

    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    fn write(&mut self, reg: u8, data: &[u8]) -> Result<()> {
        self.hal
            .write_register(reg, data)
            .map_err(|e| BeaconError::I2cTransient(e.to_string()))
    }

    fn write_bulk(&mut self, base: u8, p1: i64, p2: i64, p3: i64, div_by_4: u8, r_div: RDiv) -> Result<()> {
        let buf = [
            ((p3 >> 8) & 0xFF) as u8,
            (p3 & 0xFF) as u8,
            (((p1 >> 16) & 0x3) as u8) | ((div_by_4 & 0x3) << 2) | (((r_div as u8) & 0x7) << 4),
            ((p1 >> 8) & 0xFF) as u8,
            (p1 & 0xFF) as u8,
            (((p3 >> 12) & 0xF0) as u8) | (((p2 >> 16) & 0xF) as u8),
            ((p2 >> 8) & 0xFF) as u8,
            (p2 & 0xFF) as u8,
        ];
        self.write(base, &buf)
    }

    /// Program PLL A or B. No-op (returns `InvalidSynthConfig`) if `denom`
    /// is zero.
    pub fn setup_pll(&mut self, pll: Pll, conf: PllConfig) -> Result<()> {
        if conf.denom == 0 {
            return Err(BeaconError::InvalidSynthConfig(
                "PLL denom must not be zero".into(),
            ));
        }
        let p1 = 128 * conf.mult + (128 * conf.num) / conf.denom - 512;
        let p2 = (128 * conf.num) % conf.denom;
        let p3 = conf.denom;
        let base = if pll == Pll::A { 26 } else { 34 };
        self.write_bulk(base, p1, p2, p3, 0, RDiv::Div1)?;
        self.write(PLL_RESET, &[PLL_RESET_PLLA_PLLB])
    }

    /// Configure MultiSynth `output` (0-2) and its control register.
    pub fn setup_output(
        &mut self,
        output: u8,
        source_pll: Pll,
        drive: DriveStrength,
        conf: OutputConfig,
    ) -> Result<()> {
        if output > 2 {
            return Err(BeaconError::InvalidSynthConfig(format!(
                "output index {output} out of range"
            )));
        }
        if !conf.integer_mode && (conf.div < 8 || (conf.div == 8 && conf.num == 0)) {
            return Err(BeaconError::InvalidSynthConfig(format!(
                "divisor {} too small outside integer mode",
                conf.div
            )));
        }

        let (p1, p2, p3, div_by_4) = if conf.div == 4 {
            (0, 0, 1, 0x3u8)
        } else {
            if conf.denom == 0 {
                return Err(BeaconError::InvalidSynthConfig(
                    "output denom must not be zero".into(),
                ));
            }
            let p1 = 128 * conf.div + (128 * conf.num) / conf.denom - 512;
            let p2 = (128 * conf.num) % conf.denom;
            (p1, p2, conf.denom, 0u8)
        };

        let base = ms_base(output).unwrap();
        let ctrl_reg = clk_control_reg(output).unwrap();

        let mut clk_control = 0x0C | (drive as u8);
        if source_pll == Pll::B {
            clk_control |= 1 << 5;
        }
        if conf.integer_mode && (conf.num == 0 || conf.div == 4) {
            clk_control |= 1 << 6;
        }

        self.write(ctrl_reg, &[clk_control])?;
        self.write_bulk(base, p1, p2, p3, div_by_4, conf.r_div)
    }

    /// Derive `(PllConfig, OutputConfig)` to hit `f_hz` exactly, applying a
    /// crystal-offset correction expressed in parts-per-hundred-million.
    pub fn calc(&self, f_hz: u32, ppm_correction: i32) -> (PllConfig, OutputConfig) {
        let mut fclk = f_hz.clamp(8_000, 160_000_000) as i64;

        let r_div = if fclk < 1_000_000 {
            fclk *= 64;
            RDiv::Div64
        } else {
            RDiv::Div1
        };

        fclk -= ((fclk as f64 / 100_000_000.0) * ppm_correction as f64) as i64;

        let fxtal = self.crystal_hz as i64;
        let (a, b, c, x, y, z);

        if fclk < 81_000_000 {
            a = 36;
            b = 0;
            c = 1;
            let fpll = 900_000_000i64;
            x = fpll / fclk;
            let t = (fclk >> 20) + 1;
            y = (fpll % fclk) / t;
            z = fclk / t;
        } else {
            x = if fclk >= 150_000_000 {
                4
            } else if fclk >= 100_000_000 {
                6
            } else {
                8
            };
            y = 0;
            z = 1;
            let numerator = x * fclk;
            a = numerator / fxtal;
            let t = (fxtal >> 20) + 1;
            b = (numerator % fxtal) / t;
            c = fxtal / t;
        }

        (
            PllConfig {
                mult: a,
                num: b,
                denom: c,
            },
            OutputConfig {
                div: x,
                num: y,
                denom: z,
                r_div,
                integer_mode: true,
            },
        )
    }

    /// Active-low output-enable register: bit `i` set in `mask` enables CLK_i.
    pub fn enable_outputs(&mut self, mask: u8) -> Result<()> {
        self.write(OUTPUT_ENABLE_CONTROL, &[!mask])
    }

    /// Pre-program PLL A and CLK0 for `base_hz`, remembering the integer
    /// divisor so `update_frequency_minimal` can validate its fast path.
    pub fn setup_clk_smooth(&mut self, base_hz: u32, ppm_correction: i32, drive: DriveStrength) -> Result<()> {
        let (pll_conf, out_conf) = self.calc(base_hz, ppm_correction);
        self.setup_pll(Pll::A, pll_conf)?;
        self.setup_output(0, Pll::A, drive, out_conf)?;
        self.smooth = Some(SmoothState {
            output: 0,
            div: out_conf.div,
            r_div: out_conf.r_div,
        });
        Ok(())
    }

    /// Fast path: recompute `p2` for `new_hz` and rewrite only the two
    /// fractional bytes at `base+6`, leaving the PLL and every other
    /// register untouched. Falls back to `setup_clk_smooth` if the integer
    /// divisor bucket would change.
    pub fn update_frequency_minimal(&mut self, new_hz: u32, ppm_correction: i32, drive: DriveStrength) -> Result<()> {
        let state = match self.smooth {
            Some(s) => s,
            None => {
                return Err(BeaconError::InvalidSynthConfig(
                    "update_frequency_minimal called before setup_clk_smooth".into(),
                ))
            }
        };

        let (_, out_conf) = self.calc(new_hz, ppm_correction);
        if out_conf.div != state.div || out_conf.r_div as u8 != state.r_div as u8 {
            return self.setup_clk_smooth(new_hz, ppm_correction, drive);
        }

        let p2 = (128 * out_conf.num) % out_conf.denom.max(1);
        let base = ms_base(state.output).unwrap();
        let buf = [((p2 >> 8) & 0xFF) as u8, (p2 & 0xFF) as u8];
        self.write(base + 6, &buf)
    }
}
