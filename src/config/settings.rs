//! Typed settings struct and the string-keyed bridge required by §6.1.

use super::hour_mask::HourMask;
use crate::constants::{self, VALID_DBM};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zeroize::Zeroize;

/// Band rotation policy (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BandMode {
    Sequential,
    RoundRobin,
    RandomExhaustive,
}

impl Default for BandMode {
    fn default() -> Self {
        BandMode::Sequential
    }
}

impl BandMode {
    fn as_key(self) -> &'static str {
        match self {
            BandMode::Sequential => "sequential",
            BandMode::RoundRobin => "roundRobin",
            BandMode::RandomExhaustive => "randomExhaustive",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "sequential" => Some(BandMode::Sequential),
            "roundRobin" => Some(BandMode::RoundRobin),
            "randomExhaustive" => Some(BandMode::RandomExhaustive),
            _ => None,
        }
    }
}

/// Wi-Fi operating mode. Provisioning UX itself is out of scope (§1); the
/// core only needs to know which mode to report/request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WifiMode {
    Sta,
    Ap,
}

impl Default for WifiMode {
    fn default() -> Self {
        WifiMode::Ap
    }
}

/// One amateur-radio band entry (§3 Data Model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub enabled: bool,
    pub frequency_hz: u32,
    pub schedule: HourMask,
    /// Cumulative completed transmissions on this band.
    pub tx_count: u32,
    /// Cumulative transmission minutes on this band (rounded).
    pub tx_minutes: u32,
}

impl Band {
    fn new(frequency_hz: u32) -> Self {
        Band {
            enabled: false,
            frequency_hz,
            schedule: HourMask::ALL,
            tx_count: 0,
            tx_minutes: 0,
        }
    }
}

/// Top-level beacon configuration. Merged at boot from persisted user values
/// over `Settings::default()`, and mutated only through `apply_str`/the typed
/// setters — every mutation is expected to trigger scheduler re-evaluation by
/// the caller (BeaconFsm owns that responsibility, not this struct).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub callsign: String,
    pub locator: String,
    pub power_dbm: i8,
    /// Probability (0..100) of transmitting at each opportunity.
    pub tx_percent: u8,
    pub band_mode: BandMode,
    pub bands: BTreeMap<String, Band>,
    pub wifi_mode: WifiMode,
    pub ssid: String,
    #[serde(skip_serializing)]
    pub wifi_password: SecretString,
    pub ssid_ap: String,
    #[serde(skip_serializing)]
    pub ap_password: SecretString,
    /// Crystal correction, in parts-per-billion*10 (i.e. the same units the
    /// ClockSynth driver's `ppm_correction` parameter expects).
    pub crystal_ppm: i32,
    pub total_tx_count: u32,
    pub total_tx_minutes: u32,
}

/// A `String` that zeroes its buffer on drop. Used for Wi-Fi credentials,
/// mirroring the teacher's use of `zeroize` for handled secret material.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretString(String);

impl Drop for SecretString {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        SecretString(s.to_string())
    }
}

impl SecretString {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Default for Settings {
    fn default() -> Self {
        let mut bands = BTreeMap::new();
        for name in constants::BAND_ORDER {
            let freq = constants::default_frequency_hz(name).unwrap_or(0);
            bands.insert(name.to_string(), Band::new(freq));
        }
        // 20m enabled by default, matching the original firmware's single
        // sane out-of-the-box band.
        if let Some(b) = bands.get_mut("20m") {
            b.enabled = true;
        }

        Settings {
            callsign: "N0CALL".to_string(),
            locator: "AA00AA".to_string(),
            power_dbm: 10,
            tx_percent: 20,
            band_mode: BandMode::default(),
            bands,
            wifi_mode: WifiMode::default(),
            ssid: String::new(),
            wifi_password: SecretString::default(),
            ssid_ap: "wspr-beacon".to_string(),
            ap_password: SecretString::default(),
            crystal_ppm: 0,
            total_tx_count: 0,
            total_tx_minutes: 0,
        }
    }
}

impl Settings {
    /// Merge `user` on top of `Settings::default()`: every field present
    /// (non-default) in `user` wins, anything absent keeps the default.
    /// Mirrors `SettingsBase::mergeDefaults` from the original firmware,
    /// re-expressed over a typed struct instead of a `cJSON` dictionary.
    pub fn merged_with_defaults(user: Settings) -> Settings {
        let defaults = Settings::default();
        let mut merged = defaults;
        merged.callsign = user.callsign;
        merged.locator = user.locator;
        merged.power_dbm = user.power_dbm;
        merged.tx_percent = user.tx_percent;
        merged.band_mode = user.band_mode;
        for (name, band) in user.bands {
            merged.bands.insert(name, band);
        }
        merged.wifi_mode = user.wifi_mode;
        merged.ssid = user.ssid;
        merged.wifi_password = user.wifi_password;
        merged.ssid_ap = user.ssid_ap;
        merged.ap_password = user.ap_password;
        merged.crystal_ppm = user.crystal_ppm;
        merged.total_tx_count = user.total_tx_count;
        merged.total_tx_minutes = user.total_tx_minutes;
        merged
    }

    /// Normalized callsign/locator/power as used by the encoder, applying the
    /// coercions from §4.1 step 1 so the scheduler/status layer can always
    /// report the *effective* values, not the raw ones.
    pub fn normalized_power_dbm(&self) -> i8 {
        crate::encoder::normalize_power(self.power_dbm)
    }

    /// Read a setting by its external string key (§6.1). Returns `None` for
    /// unrecognized keys.
    pub fn get_str(&self, key: &str) -> Option<String> {
        if let Some(rest) = key.strip_prefix("bands.") {
            let (band, field) = rest.split_once('.')?;
            let b = self.bands.get(band)?;
            return Some(match field {
                "en" => b.enabled.to_string(),
                "freq" => b.frequency_hz.to_string(),
                "sched" => b.schedule.bits().to_string(),
                _ => return None,
            });
        }
        Some(match key {
            "call" => self.callsign.clone(),
            "loc" => self.locator.clone(),
            "pwr" => self.power_dbm.to_string(),
            "txPct" => self.tx_percent.to_string(),
            "bandMode" => self.band_mode.as_key().to_string(),
            "wifiMode" => match self.wifi_mode {
                WifiMode::Sta => "sta".to_string(),
                WifiMode::Ap => "ap".to_string(),
            },
            "ssid" => self.ssid.clone(),
            "pwd" => self.wifi_password.expose().to_string(),
            "ssidAp" => self.ssid_ap.clone(),
            "pwdAp" => self.ap_password.expose().to_string(),
            "totalTxCnt" => self.total_tx_count.to_string(),
            "totalTxMin" => self.total_tx_minutes.to_string(),
            _ => {
                if let Some(band) = key.strip_suffix("TxCnt") {
                    return self.bands.get(band).map(|b| b.tx_count.to_string());
                }
                if let Some(band) = key.strip_suffix("TxMin") {
                    return self.bands.get(band).map(|b| b.tx_minutes.to_string());
                }
                return None;
            }
        })
    }

    /// Write a setting by its external string key (§6.1). Returns `false` for
    /// unrecognized keys or values that fail to parse; callers should treat
    /// that as a `SettingsStoreFailure`-adjacent no-op, not a panic.
    pub fn set_str(&mut self, key: &str, value: &str) -> bool {
        if let Some(rest) = key.strip_prefix("bands.") {
            let Some((band, field)) = rest.split_once('.') else {
                return false;
            };
            let Some(b) = self.bands.get_mut(band) else {
                return false;
            };
            return match field {
                "en" => value.parse().map(|v| b.enabled = v).is_ok(),
                "freq" => value.parse().map(|v| b.frequency_hz = v).is_ok(),
                "sched" => value
                    .parse::<u32>()
                    .map(|v| b.schedule = HourMask::from_bits(v))
                    .is_ok(),
                _ => false,
            };
        }
        match key {
            "call" => {
                self.callsign = value.to_string();
                true
            }
            "loc" => {
                self.locator = value.to_string();
                true
            }
            "pwr" => value.parse().map(|v| self.power_dbm = v).is_ok(),
            "txPct" => value
                .parse::<u8>()
                .map(|v| self.tx_percent = v.min(100))
                .is_ok(),
            "bandMode" => match BandMode::from_key(value) {
                Some(m) => {
                    self.band_mode = m;
                    true
                }
                None => false,
            },
            "wifiMode" => match value {
                "sta" => {
                    self.wifi_mode = WifiMode::Sta;
                    true
                }
                "ap" => {
                    self.wifi_mode = WifiMode::Ap;
                    true
                }
                _ => false,
            },
            "ssid" => {
                self.ssid = value.to_string();
                true
            }
            "pwd" => {
                self.wifi_password = SecretString::from(value);
                true
            }
            "ssidAp" => {
                self.ssid_ap = value.to_string();
                true
            }
            "pwdAp" => {
                self.ap_password = SecretString::from(value);
                true
            }
            "totalTxCnt" => value.parse().map(|v| self.total_tx_count = v).is_ok(),
            "totalTxMin" => value.parse().map(|v| self.total_tx_minutes = v).is_ok(),
            _ => {
                if let Some(band) = key.strip_suffix("TxCnt") {
                    return value
                        .parse()
                        .ok()
                        .and_then(|v| self.bands.get_mut(band).map(|b| b.tx_count = v))
                        .is_some();
                }
                if let Some(band) = key.strip_suffix("TxMin") {
                    return value
                        .parse()
                        .ok()
                        .and_then(|v| self.bands.get_mut(band).map(|b| b.tx_minutes = v))
                        .is_some();
                }
                false
            }
        }
    }
}

/// `true` iff `dbm` is one of the 28 legal WSPR power values.
pub fn is_legal_dbm(dbm: i8) -> bool {
    VALID_DBM.contains(&dbm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_have_no_transmissions_at_zero_percent() {
        let s = Settings::default();
        assert_eq!(s.tx_percent, 20);
        assert!(s.bands.values().any(|b| b.enabled));
    }

    #[test]
    fn string_key_round_trip() {
        let mut s = Settings::default();
        assert!(s.set_str("call", "K1ABC"));
        assert_eq!(s.get_str("call").as_deref(), Some("K1ABC"));

        assert!(s.set_str("bands.40m.en", "true"));
        assert_eq!(s.get_str("bands.40m.en").as_deref(), Some("true"));

        assert!(s.set_str("bands.40m.sched", "16777215"));
        assert_eq!(s.bands["40m"].schedule, HourMask::ALL);

        assert!(s.set_str("20mTxCnt", "7"));
        assert_eq!(s.bands["20m"].tx_count, 7);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut s = Settings::default();
        assert!(!s.set_str("bogus.key", "1"));
        assert!(s.get_str("bogus.key").is_none());
    }

    #[test]
    fn merge_keeps_defaulted_bands_not_present_in_user_settings() {
        let mut user = Settings::default();
        user.bands.clear();
        user.bands.insert("40m".to_string(), Band::new(7_040_000));
        let merged = Settings::merged_with_defaults(user);
        // user only specified 40m; 20m must still come from defaults.
        assert!(merged.bands.contains_key("20m"));
        assert_eq!(merged.bands["40m"].frequency_hz, 7_040_000);
    }
}
