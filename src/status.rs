//! Status/observation snapshot (§6.2), serialized for the external HTTP
//! layer (out of scope here) to poll.

use serde::Serialize;

use crate::config::Settings;
use crate::fsm::{NetworkState, TransmissionState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandStats {
    pub tx_cnt: u32,
    pub tx_min: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub tx_cnt: u32,
    pub tx_min: u32,
    pub bands: std::collections::BTreeMap<String, BandStats>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub tx_state: &'static str,
    pub net_state: &'static str,
    pub cur_band: Option<String>,
    pub freq: Option<u32>,
    pub next_tx: i64,
    pub next_tx_band: Option<String>,
    pub next_tx_freq: Option<u32>,
    pub next_tx_valid: bool,
    pub stats: Stats,
}

pub fn tx_state_str(state: TransmissionState) -> &'static str {
    match state {
        TransmissionState::Idle => "IDLE",
        TransmissionState::TxPending => "TX_PENDING",
        TransmissionState::Transmitting => "TRANSMITTING",
    }
}

pub fn net_state_str(state: NetworkState) -> &'static str {
    match state {
        NetworkState::Booting => "BOOTING",
        NetworkState::ApMode => "AP_MODE",
        NetworkState::StaConnecting => "STA_CONNECTING",
        NetworkState::Ready => "READY",
        NetworkState::Error => "ERROR",
    }
}

impl StatusSnapshot {
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        tx_state: TransmissionState,
        net_state: NetworkState,
        cur_band: Option<String>,
        freq: Option<u32>,
        next_tx: i64,
        next_tx_band: Option<String>,
        settings: &Settings,
    ) -> Self {
        let next_tx_freq = next_tx_band
            .as_ref()
            .and_then(|b| settings.bands.get(b))
            .map(|b| b.frequency_hz);

        let bands = settings
            .bands
            .iter()
            .map(|(name, b)| {
                (
                    name.clone(),
                    BandStats {
                        tx_cnt: b.tx_count,
                        tx_min: b.tx_minutes,
                    },
                )
            })
            .collect();

        StatusSnapshot {
            tx_state: tx_state_str(tx_state),
            net_state: net_state_str(net_state),
            cur_band,
            freq,
            next_tx,
            next_tx_band,
            next_tx_valid: next_tx >= 0,
            next_tx_freq,
            stats: Stats {
                tx_cnt: settings.total_tx_count,
                tx_min: settings.total_tx_minutes,
                bands,
            },
        }
    }
}
