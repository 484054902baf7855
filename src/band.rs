//! Band eligibility and selection policy (§4.4).

use rand::Rng;

use crate::config::{BandMode, Settings};
use crate::constants::BAND_ORDER;

/// Chooses which band the next transmission should use. Carries the state
/// needed for round-robin continuity and the random-exhaustive "used" set
/// across calls; stateless policies (`Sequential`) ignore that state.
#[derive(Debug, Default)]
pub struct BandSelector {
    current_hour: Option<u32>,
    current_band_index: Option<usize>,
    used: u16,
}

fn eligible_indices(settings: &Settings, hour: u32) -> Vec<usize> {
    BAND_ORDER
        .iter()
        .enumerate()
        .filter(|(_, name)| {
            settings
                .bands
                .get(**name)
                .map(|b| b.enabled && b.schedule.is_set(hour))
                .unwrap_or(false)
        })
        .map(|(i, _)| i)
        .collect()
}

impl BandSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the band for the next transmission, or `None` if no band is
    /// eligible this hour.
    pub fn select_next(&mut self, settings: &Settings, hour: u32, rng: &mut impl Rng) -> Option<String> {
        if self.current_hour != Some(hour) {
            self.used = 0;
            self.current_hour = Some(hour);
        }

        let eligible = eligible_indices(settings, hour);
        if eligible.is_empty() {
            return None;
        }

        let chosen = match settings.band_mode {
            BandMode::Sequential => eligible[0],
            BandMode::RoundRobin => self.round_robin_pick(&eligible),
            BandMode::RandomExhaustive => self.random_exhaustive_pick(&eligible, rng),
        };

        self.current_band_index = Some(chosen);
        Some(BAND_ORDER[chosen].to_string())
    }

    fn round_robin_pick(&self, eligible: &[usize]) -> usize {
        match self.current_band_index {
            Some(current) => match eligible.iter().position(|&i| i == current) {
                Some(pos) => eligible[(pos + 1) % eligible.len()],
                None => eligible[0],
            },
            None => eligible[0],
        }
    }

    fn random_exhaustive_pick(&mut self, eligible: &[usize], rng: &mut impl Rng) -> usize {
        let mut candidates: Vec<usize> = eligible
            .iter()
            .copied()
            .filter(|i| self.used & (1 << i) == 0)
            .collect();

        if candidates.is_empty() {
            self.used = 0;
            candidates = eligible.to_vec();
        }

        let pick = candidates[rng.gen_range(0..candidates.len())];
        self.used |= 1 << pick;
        pick
    }
}
