//! Top-level control state machine (§4.6): sequences network bring-up and
//! the IDLE/TX_PENDING/TRANSMITTING transmission cycle, and is the only
//! component that drives `BandSelector`, `WsprEncoder`, `ClockSynth`, and
//! `SymbolModulator` together.

use std::sync::Arc;

use rand::Rng;
use tokio::sync::Mutex;

use crate::band::BandSelector;
use crate::config::Settings;
use crate::constants::TONE_SPACING_HZ;
use crate::encoder::{self, WsprMessage};
use crate::error::{BeaconError, Result};
use crate::scheduler::Scheduler;
use crate::synth::{DriveStrength, Si5351Driver, SynthHal};

/// Network bring-up state. Wi-Fi provisioning UX and the SNTP transport
/// itself are out of scope; this tracks only the state the core needs to
/// gate transmission on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkState {
    Booting,
    ApMode,
    StaConnecting,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionState {
    Idle,
    TxPending,
    Transmitting,
}

/// Snapshot of what the last (or current) transmission used, kept for the
/// status interface (§6.2) and end-of-transmission bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct ActiveTransmission {
    pub band: String,
    pub base_frequency_hz: u32,
}

pub struct BeaconFsm<H: SynthHal + Send + 'static> {
    pub settings: Settings,
    band_selector: BandSelector,
    scheduler: Scheduler,
    synth: Arc<Mutex<Si5351Driver<H>>>,
    network_state: NetworkState,
    transmission_state: TransmissionState,
    active: Option<ActiveTransmission>,
    last_sync_unix: i64,
}

impl<H: SynthHal + Send + 'static> BeaconFsm<H> {
    pub fn new(settings: Settings, synth: Si5351Driver<H>) -> Self {
        BeaconFsm {
            settings,
            band_selector: BandSelector::new(),
            scheduler: Scheduler::new(),
            synth: Arc::new(Mutex::new(synth)),
            network_state: NetworkState::Booting,
            transmission_state: TransmissionState::Idle,
            active: None,
            last_sync_unix: 0,
        }
    }

    pub fn network_state(&self) -> NetworkState {
        self.network_state
    }

    pub fn transmission_state(&self) -> TransmissionState {
        self.transmission_state
    }

    pub fn active_transmission(&self) -> Option<&ActiveTransmission> {
        self.active.as_ref()
    }

    /// Decide the initial network transition out of BOOTING: STA if Wi-Fi
    /// credentials are present, AP otherwise.
    pub fn boot(&mut self) {
        let has_creds = !self.settings.ssid.is_empty();
        self.network_state = if has_creds {
            NetworkState::StaConnecting
        } else {
            NetworkState::ApMode
        };
    }

    pub fn sta_connected(&mut self) {
        if self.network_state == NetworkState::StaConnecting {
            self.network_state = NetworkState::Ready;
        }
    }

    pub fn sta_connect_failed(&mut self) {
        if self.network_state == NetworkState::StaConnecting {
            self.network_state = NetworkState::ApMode;
        }
    }

    pub fn ap_services_up(&mut self) {
        if self.network_state == NetworkState::ApMode {
            self.network_state = NetworkState::Ready;
        }
    }

    pub fn enter_error(&mut self) {
        self.network_state = NetworkState::Error;
    }

    /// Settings-change handler (§4.6): cancel any in-progress transmission
    /// and stop the scheduler's new-start latch; restart is the caller's
    /// responsibility once this returns, gated on READY and not-calibrating.
    pub fn apply_settings_change(&mut self, new_settings: Settings) -> bool {
        self.settings = new_settings;
        self.scheduler.cancel_current_transmission();
        self.network_state == NetworkState::Ready && !self.scheduler.is_calibration_mode()
    }

    /// Once-per-hour resync trigger (§4.6): `true` iff at least 3600
    /// seconds have elapsed since the last recorded sync.
    pub fn should_resync(&mut self, now_unix: i64) -> bool {
        if now_unix - self.last_sync_unix >= 3600 {
            self.last_sync_unix = now_unix;
            true
        } else {
            false
        }
    }

    /// Start-of-transmission sequence (§4.6 steps 1-6). Returns `Ok(None)`
    /// when no band is eligible (the FSM stays IDLE); `Ok(Some(symbols))`
    /// once the synth is primed and state has moved to TRANSMITTING.
    pub async fn begin_transmission(
        &mut self,
        hour: u32,
        rng: &mut impl Rng,
    ) -> Result<Option<[u8; crate::constants::WSPR_SYMBOL_COUNT]>> {
        if self.network_state != NetworkState::Ready {
            return Ok(None);
        }

        let Some(band) = self.band_selector.select_next(&self.settings, hour, rng) else {
            return Ok(None);
        };
        let base_hz = self
            .settings
            .bands
            .get(&band)
            .map(|b| b.frequency_hz)
            .unwrap_or(0);

        self.transmission_state = TransmissionState::TxPending;

        let msg = WsprMessage::new(
            &self.settings.callsign,
            &self.settings.locator,
            self.settings.power_dbm,
        );
        let symbols = encoder::encode(&msg);

        {
            let mut synth = self.synth.lock().await;
            synth.setup_clk_smooth(base_hz, self.settings.crystal_ppm, DriveStrength::Ma8)?;
            synth.enable_outputs(0b0000_0001)?;
        }

        self.transmission_state = TransmissionState::Transmitting;
        self.active = Some(ActiveTransmission {
            band,
            base_frequency_hz: base_hz,
        });

        Ok(Some(symbols))
    }

    /// Per-symbol retune (§4.6 step 6): `base_hz + symbol * TONE_SPACING_HZ`.
    pub async fn retune_for_symbol(&self, symbol: u8) -> Result<()> {
        let Some(active) = &self.active else {
            return Err(BeaconError::InvalidSynthConfig(
                "retune_for_symbol called with no active transmission".into(),
            ));
        };
        let offset_hz = (symbol as f64) * TONE_SPACING_HZ;
        let target_hz = (active.base_frequency_hz as f64 + offset_hz).round() as u32;
        self.synth
            .lock()
            .await
            .update_frequency_minimal(target_hz, self.settings.crystal_ppm, DriveStrength::Ma8)
    }

    /// End-of-transmission sequence: disable RF, update per-band stats,
    /// return to IDLE.
    pub async fn end_transmission(&mut self, tx_minutes: u32) -> Result<()> {
        self.synth.lock().await.enable_outputs(0)?;

        if let Some(active) = self.active.take() {
            if let Some(band) = self.settings.bands.get_mut(&active.band) {
                band.tx_count += 1;
                band.tx_minutes += tx_minutes;
            }
            self.settings.total_tx_count += 1;
            self.settings.total_tx_minutes += tx_minutes;
        }

        self.scheduler.complete_transmission();
        self.transmission_state = TransmissionState::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::MockHal;
    use rand::rngs::mock::StepRng;

    fn fsm() -> BeaconFsm<MockHal> {
        let mut settings = Settings::default();
        settings.ssid = String::new();
        BeaconFsm::new(settings, Si5351Driver::new(MockHal::new()))
    }

    #[test]
    fn boot_without_credentials_enters_ap_mode() {
        let mut f = fsm();
        f.boot();
        assert_eq!(f.network_state(), NetworkState::ApMode);
    }

    #[test]
    fn boot_with_credentials_enters_sta_connecting() {
        let mut settings = Settings::default();
        settings.ssid = "home-network".to_string();
        let mut f = BeaconFsm::new(settings, Si5351Driver::new(MockHal::new()));
        f.boot();
        assert_eq!(f.network_state(), NetworkState::StaConnecting);
        f.sta_connected();
        assert_eq!(f.network_state(), NetworkState::Ready);
    }

    #[test]
    fn failed_sta_connect_falls_back_to_ap_mode() {
        let mut settings = Settings::default();
        settings.ssid = "home-network".to_string();
        let mut f = BeaconFsm::new(settings, Si5351Driver::new(MockHal::new()));
        f.boot();
        f.sta_connect_failed();
        assert_eq!(f.network_state(), NetworkState::ApMode);
    }

    #[tokio::test]
    async fn begin_transmission_stays_idle_until_ready() {
        let mut f = fsm();
        let mut rng = StepRng::new(0, 0);
        let result = f.begin_transmission(12, &mut rng).await.unwrap();
        assert!(result.is_none());
        assert_eq!(f.transmission_state(), TransmissionState::Idle);
    }

    #[tokio::test]
    async fn begin_transmission_primes_the_synth_once_ready() {
        let mut f = fsm();
        f.boot();
        f.ap_services_up();
        assert_eq!(f.network_state(), NetworkState::Ready);

        let mut rng = StepRng::new(0, 0);
        let result = f.begin_transmission(12, &mut rng).await.unwrap();
        assert!(result.is_some());
        assert_eq!(f.transmission_state(), TransmissionState::Transmitting);

        f.end_transmission(2).await.unwrap();
        assert_eq!(f.transmission_state(), TransmissionState::Idle);
        assert_eq!(f.settings.total_tx_count, 1);
    }

    #[test]
    fn should_resync_fires_once_per_hour() {
        let mut f = fsm();
        assert!(f.should_resync(10_000));
        assert!(!f.should_resync(10_100));
        assert!(f.should_resync(13_601));
    }
}
