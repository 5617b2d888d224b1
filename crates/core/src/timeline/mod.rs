//! Beat and phrase timing.
//!
//! Everything here is a pure function of its inputs plus an explicit
//! `now_ms` value, so the dashboard can be replayed from any timestamp.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Beats in one phrase (eight bars of 4/4).
pub const PHRASE_BEATS: f64 = 32.0;

/// Source of wall-clock time in milliseconds since the UNIX epoch.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Reads the operating system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Clock that only moves when told to. Used by tests and snapshots.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    pub now_ms: i64,
}

impl ManualClock {
    pub fn at(now_ms: i64) -> Self {
        Self { now_ms }
    }

    pub fn advance(&mut self, delta_ms: i64) {
        self.now_ms = (self.now_ms + delta_ms).max(0);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms
    }
}

/// Position inside the current 32-beat phrase.
///
/// `(0, 0, 0)` means the phrase concept does not apply (non-4/4 meter). That
/// value is not self-describing; callers that care must check the track's
/// time signature themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhraseInfo {
    pub beats_remaining: f64,
    pub time_remaining_seconds: f64,
    pub phrase_count: u32,
}

impl PhraseInfo {
    /// Returned when the tempo is unknown or not positive.
    pub const UNKNOWN_TEMPO: Self = Self {
        beats_remaining: PHRASE_BEATS,
        time_remaining_seconds: 0.0,
        phrase_count: 1,
    };

    /// Returned when the meter is not 4/4.
    pub const NOT_APPLICABLE: Self = Self {
        beats_remaining: 0.0,
        time_remaining_seconds: 0.0,
        phrase_count: 0,
    };

    /// Whether the info describes a live 4/4 phrase.
    pub fn is_active(&self) -> bool {
        self.beats_remaining > 0.0
    }
}

/// Computes where playback sits inside the current phrase.
///
/// `reference_ms` is the moment `progress_ms` was last known accurate; values
/// `<= 0` mean "right now". Elapsed time is only added while playing.
pub fn calculate(
    bpm: f64,
    progress_ms: f64,
    reference_ms: i64,
    time_signature: Option<u32>,
    is_playing: bool,
    now_ms: i64,
) -> PhraseInfo {
    if bpm.is_nan() || bpm <= 0.0 {
        return PhraseInfo::UNKNOWN_TEMPO;
    }

    if matches!(time_signature, Some(beats) if beats != 4) {
        return PhraseInfo::NOT_APPLICABLE;
    }

    let elapsed_ms = if is_playing && reference_ms > 0 {
        (now_ms - reference_ms).max(0) as f64
    } else {
        0.0
    };

    let position_ms = progress_ms + elapsed_ms;
    let beat_ms = 60_000.0 / bpm;
    let total_beats = position_ms / beat_ms;

    // rem_euclid can round up to exactly PHRASE_BEATS for tiny negatives.
    let mut position_in_phrase = total_beats.rem_euclid(PHRASE_BEATS);
    if position_in_phrase >= PHRASE_BEATS {
        position_in_phrase = 0.0;
    }
    let beats_remaining = (PHRASE_BEATS - position_in_phrase).clamp(0.0, PHRASE_BEATS);

    PhraseInfo {
        beats_remaining,
        time_remaining_seconds: beats_remaining * beat_ms / 1000.0,
        phrase_count: position_in_phrase.floor() as u32 + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn non_positive_tempo_returns_default() {
        for bpm in [0.0, -1.0, -120.0, f64::NAN] {
            let info = calculate(bpm, 5_000.0, NOW - 500, Some(4), true, NOW);
            assert_eq!(info, PhraseInfo::UNKNOWN_TEMPO);
        }
    }

    #[test]
    fn non_four_four_returns_sentinel() {
        for signature in [1, 3, 5, 7] {
            let info = calculate(128.0, 10_000.0, NOW, Some(signature), true, NOW);
            assert_eq!(info, PhraseInfo::NOT_APPLICABLE);
            assert!(!info.is_active());
        }
    }

    #[test]
    fn one_second_at_120_bpm_is_two_beats() {
        let info = calculate(120.0, 0.0, NOW - 1_000, Some(4), true, NOW);
        assert!((info.beats_remaining - 30.0).abs() < 1e-9);
        assert!((info.time_remaining_seconds - 15.0).abs() < 1e-9);
        assert_eq!(info.phrase_count, 3);
    }

    #[test]
    fn paused_tracks_ignore_elapsed_time() {
        let info = calculate(120.0, 0.0, NOW - 60_000, None, false, NOW);
        assert_eq!(info.beats_remaining, 32.0);
        assert_eq!(info.phrase_count, 1);
    }

    #[test]
    fn missing_reference_means_no_drift() {
        let info = calculate(120.0, 2_000.0, 0, None, true, NOW);
        assert!((info.beats_remaining - 28.0).abs() < 1e-9);
    }

    #[test]
    fn stays_within_phrase_bounds() {
        for bpm in [60.0, 87.5, 120.0, 128.0, 174.0] {
            for progress in [-30_000.0, -1.0, 0.0, 999.0, 16_000.0, 61_234.5, 3_600_000.0] {
                let info = calculate(bpm, progress, NOW - 777, Some(4), true, NOW);
                assert!(info.beats_remaining >= 0.0 && info.beats_remaining <= PHRASE_BEATS);
                assert!(info.phrase_count >= 1 && info.phrase_count <= 32);
            }
        }
    }

    #[test]
    fn manual_clock_never_goes_negative() {
        let mut clock = ManualClock::at(100);
        clock.advance(50);
        assert_eq!(clock.now_ms(), 150);
        clock.advance(-1_000);
        assert_eq!(clock.now_ms(), 0);
    }
}
