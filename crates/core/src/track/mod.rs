use serde::{Deserialize, Serialize};

use crate::timeline::{self, PhraseInfo};

/// How a recommended track relates to the one currently playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionType {
    Smooth,
    MoodSwitch,
    EnergyUp,
    RhythmicBreaker,
}

impl TransitionType {
    /// Fixed display order used for tabs and grouping.
    pub const ALL: [TransitionType; 4] = [
        TransitionType::Smooth,
        TransitionType::MoodSwitch,
        TransitionType::EnergyUp,
        TransitionType::RhythmicBreaker,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TransitionType::Smooth => "SMOOTH",
            TransitionType::MoodSwitch => "MOOD SWITCH",
            TransitionType::EnergyUp => "ENERGY UP",
            TransitionType::RhythmicBreaker => "RHYTHMIC BREAKER",
        }
    }

    /// Compact label for the tab strip.
    pub fn short_label(self) -> &'static str {
        match self {
            TransitionType::Smooth => "SMOOTH",
            TransitionType::MoodSwitch => "MOOD",
            TransitionType::EnergyUp => "ENERGY",
            TransitionType::RhythmicBreaker => "BREAKER",
        }
    }
}

/// Category tab selected in the recommendation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(TransitionType),
}

impl CategoryFilter {
    /// Tabs in display order: `ALL` first, then each transition type.
    pub fn tabs() -> [CategoryFilter; 5] {
        [
            CategoryFilter::All,
            CategoryFilter::Only(TransitionType::Smooth),
            CategoryFilter::Only(TransitionType::MoodSwitch),
            CategoryFilter::Only(TransitionType::EnergyUp),
            CategoryFilter::Only(TransitionType::RhythmicBreaker),
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "ALL",
            CategoryFilter::Only(kind) => kind.label(),
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            CategoryFilter::All => "ALL",
            CategoryFilter::Only(kind) => kind.short_label(),
        }
    }

    pub fn matches(self, kind: TransitionType) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => selected == kind,
        }
    }

    fn index(self) -> usize {
        Self::tabs()
            .iter()
            .position(|tab| *tab == self)
            .unwrap_or(0)
    }

    /// Next tab to the right, wrapping around.
    pub fn next(self) -> Self {
        let tabs = Self::tabs();
        tabs[(self.index() + 1) % tabs.len()]
    }

    /// Next tab to the left, wrapping around.
    pub fn previous(self) -> Self {
        let tabs = Self::tabs();
        tabs[(self.index() + tabs.len() - 1) % tabs.len()]
    }
}

/// The track currently on deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artist: String,
    #[serde(default)]
    pub key: Option<String>,
    pub progress_ms: u64,
    pub duration_ms: u64,
    /// When `progress_ms` was last known to be accurate (epoch millis).
    #[serde(default)]
    pub timestamp_ms: i64,
    pub is_playing: bool,
    pub tempo: f64,
    #[serde(default)]
    pub time_signature: Option<u32>,
}

impl Track {
    /// Playback position at `now_ms`, clamped to `[0, duration]`.
    pub fn position_ms(&self, now_ms: i64) -> u64 {
        let elapsed = if self.is_playing && self.timestamp_ms > 0 {
            (now_ms - self.timestamp_ms).max(0) as u64
        } else {
            0
        };
        self.progress_ms
            .saturating_add(elapsed)
            .min(self.duration_ms)
    }

    /// Fraction of the track played, in `[0, 1]`. Zero-length tracks read as 0.
    pub fn progress_fraction(&self, now_ms: i64) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        (self.position_ms(now_ms) as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    pub fn phrase_info(&self, now_ms: i64) -> PhraseInfo {
        timeline::calculate(
            self.tempo,
            self.progress_ms as f64,
            self.timestamp_ms,
            self.time_signature,
            self.is_playing,
            now_ms,
        )
    }

    /// Whether the meter is known and is not 4/4.
    pub fn has_odd_meter(&self) -> bool {
        matches!(self.time_signature, Some(beats) if beats != 4)
    }

    /// Freezes the elapsed time into `progress_ms` and flips play state.
    pub fn toggle_playback(&mut self, now_ms: i64) {
        self.progress_ms = self.position_ms(now_ms);
        self.timestamp_ms = now_ms;
        self.is_playing = !self.is_playing;
    }
}

/// A harmonically compatible suggestion for the next mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedTrack {
    pub name: String,
    pub artist: String,
    pub key: String,
    pub tempo: f64,
    pub transition: TransitionType,
}

impl RecommendedTrack {
    /// Tempo difference relative to `reference`, in percent.
    pub fn tempo_delta_percent(&self, reference: f64) -> Option<f64> {
        if reference > 0.0 && self.tempo > 0.0 {
            Some((self.tempo - reference) / reference * 100.0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track {
            name: "Night Drive".to_string(),
            artist: "Cobalt".to_string(),
            key: Some("8A".to_string()),
            progress_ms: 10_000,
            duration_ms: 20_000,
            timestamp_ms: 1_000,
            is_playing: true,
            tempo: 120.0,
            time_signature: Some(4),
        }
    }

    #[test]
    fn position_is_clamped_to_duration() {
        let track = track();
        assert_eq!(track.position_ms(6_000), 15_000);
        assert_eq!(track.position_ms(60_000), 20_000);
        assert_eq!(track.progress_fraction(60_000), 1.0);
    }

    #[test]
    fn zero_duration_reads_as_empty() {
        let mut track = track();
        track.duration_ms = 0;
        assert_eq!(track.progress_fraction(5_000), 0.0);
    }

    #[test]
    fn toggling_playback_freezes_position() {
        let mut track = track();
        track.toggle_playback(3_000);
        assert!(!track.is_playing);
        assert_eq!(track.progress_ms, 12_000);
        assert_eq!(track.position_ms(50_000), 12_000);
    }

    #[test]
    fn tabs_cycle_in_fixed_order() {
        let mut filter = CategoryFilter::All;
        let mut seen = Vec::new();
        for _ in 0..5 {
            filter = filter.next();
            seen.push(filter);
        }
        assert_eq!(seen.last(), Some(&CategoryFilter::All));
        assert_eq!(seen[0], CategoryFilter::Only(TransitionType::Smooth));
        assert_eq!(
            CategoryFilter::All.previous(),
            CategoryFilter::Only(TransitionType::RhythmicBreaker)
        );
    }

    #[test]
    fn tempo_delta_needs_a_reference() {
        let rec = RecommendedTrack {
            name: "Halo".to_string(),
            artist: "Vessel".to_string(),
            key: "9A".to_string(),
            tempo: 126.0,
            transition: TransitionType::EnergyUp,
        };
        assert!((rec.tempo_delta_percent(120.0).unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(rec.tempo_delta_percent(0.0), None);
    }

    #[test]
    fn transition_types_use_kebab_case() {
        let json = serde_json::to_string(&TransitionType::RhythmicBreaker).unwrap();
        assert_eq!(json, "\"rhythmic-breaker\"");
    }
}
