use phrase_board_core::{palette, RecommendedTrack, Track, TransitionType};

use crate::session::Session;

/// (name, artist, key, bpm)
const LIBRARY: [(&str, &str, &str, f64); 24] = [
    ("Glass Harbor", "Lumen Drift", "8A", 122.0),
    ("Velvet Circuit", "Nadia Kross", "8A", 124.0),
    ("Undertow", "Marrow & Salt", "7A", 121.0),
    ("Paper Satellites", "Orla Venn", "7A", 123.5),
    ("Copper Sun", "Halvard", "9A", 125.0),
    ("Night Market", "Seta", "9A", 126.0),
    ("Afterimage", "Kobalt Youth", "8B", 122.0),
    ("Saltwater Choir", "Ines Mora", "8B", 120.0),
    ("Fever Lines", "DJ Ondine", "8A", 134.0),
    ("Pressure Drop Theory", "Tessellate", "9A", 112.0),
    ("Slow Orbit", "Meridian Fold", "7A", 110.0),
    ("Low Sun Over Lisbon", "Atlas Paloma", "8B", 123.0),
    ("Static Bloom", "Verity", "3B", 128.0),
    ("Ghost Tram", "Northbound", "11A", 122.0),
    ("Hollow Engine", "Rue Calder", "9B", 124.0),
    ("Ember Relay", "Cass Ithaca", "6A", 118.0),
    ("Mirage Loop", "Tarn", "8A", 123.0),
    ("Blue Hour Protocol", "Sylvie Orr", "9A", 124.5),
    ("Parallax", "Jun Okafor", "7B", 121.0),
    ("Radiant Decay", "Hexa", "1A", 130.0),
    ("Aurora Freight", "Polar Index", "8B", 125.5),
    ("Tidal Logic", "Mara Venn", "9A", 122.5),
    ("Quiet Riot Engine", "Onyx Theory", "7A", 131.0),
    ("Neon Cathedral", "Lior & The Arcs", "12B", 126.0),
];

/// Tracks the demo deck cycles through; the last one is in 3/4.
fn deck() -> Vec<Track> {
    [
        ("Glass Harbor", "Lumen Drift", "8A", 122.0, 245_000, 4),
        ("Copper Sun", "Halvard", "9A", 125.0, 212_000, 4),
        ("Waltz for a Warehouse", "Ines Mora", "8B", 96.0, 180_000, 3),
    ]
    .into_iter()
    .map(|(name, artist, key, tempo, duration_ms, beats)| Track {
        name: name.to_string(),
        artist: artist.to_string(),
        key: Some(key.to_string()),
        progress_ms: 0,
        duration_ms,
        timestamp_ms: 0,
        is_playing: true,
        tempo,
        time_signature: Some(beats),
    })
    .collect()
}

/// Signed step around the Camelot wheel from `from` to `to`, in `-5..=6`.
fn wheel_step(from: u8, to: u8) -> i32 {
    let step = (i32::from(to) - i32::from(from)).rem_euclid(12);
    if step > 6 {
        step - 12
    } else {
        step
    }
}

/// Decides how `candidate` would mix out of `current`, if at all.
pub fn classify(current: &Track, candidate_key: &str, candidate_bpm: f64) -> Option<TransitionType> {
    let (from, from_major) = palette::parse_camelot(current.key.as_deref()?)?;
    let (to, to_major) = palette::parse_camelot(candidate_key)?;
    let step = wheel_step(from, to);
    let tempo_jump = current.tempo > 0.0
        && ((candidate_bpm - current.tempo) / current.tempo).abs() > 0.06;

    if tempo_jump && from_major == to_major && step.abs() <= 1 {
        return Some(TransitionType::RhythmicBreaker);
    }
    match (from_major == to_major, step) {
        (true, 0) | (true, -1) => Some(TransitionType::Smooth),
        (true, 1) => Some(TransitionType::EnergyUp),
        (false, 0) => Some(TransitionType::MoodSwitch),
        _ => None,
    }
}

/// Stands in for the external data source while developing the dashboard.
#[derive(Debug, Clone)]
pub struct DemoSource {
    deck: Vec<Track>,
    position: usize,
    track: Option<Track>,
    library: Vec<(String, String, String, f64)>,
    fixed: Option<Vec<RecommendedTrack>>,
    library_size: usize,
    notices: Vec<String>,
}

impl DemoSource {
    pub fn sample(now_ms: i64) -> Self {
        let library: Vec<_> = LIBRARY
            .iter()
            .map(|(name, artist, key, bpm)| {
                (name.to_string(), artist.to_string(), key.to_string(), *bpm)
            })
            .collect();
        let deck = deck();
        let mut source = Self {
            track: None,
            position: 0,
            library_size: library.len(),
            library,
            fixed: None,
            notices: Vec::new(),
            deck,
        };
        source.load_deck_track(0, now_ms);
        source
    }

    /// Replays a saved session; recommendations stay as recorded.
    pub fn from_session(session: Session, now_ms: i64) -> Self {
        let library_size = session.library_size();
        let track = session.track.map(|mut track| {
            if track.timestamp_ms <= 0 {
                track.timestamp_ms = now_ms;
            }
            track
        });
        Self {
            deck: track.iter().cloned().collect(),
            position: 0,
            track,
            library: Vec::new(),
            fixed: Some(session.recommendations),
            library_size,
            notices: session.notices,
        }
    }

    fn load_deck_track(&mut self, index: usize, now_ms: i64) {
        let Some(mut track) = self.deck.get(index).cloned() else {
            self.track = None;
            return;
        };
        track.progress_ms = 0;
        track.timestamp_ms = now_ms;
        track.is_playing = true;
        tracing::info!(name = %track.name, bpm = track.tempo, "now playing");
        self.position = index;
        self.track = Some(track);
    }

    /// Moves to the next deck track once the current one has finished.
    pub fn tick(&mut self, now_ms: i64) {
        let finished = self
            .track
            .as_ref()
            .is_some_and(|track| track.is_playing && track.position_ms(now_ms) >= track.duration_ms);
        if finished {
            self.next_track(now_ms);
        }
    }

    /// Skips straight to the next deck track.
    pub fn next_track(&mut self, now_ms: i64) {
        if self.deck.is_empty() {
            return;
        }
        let next = (self.position + 1) % self.deck.len();
        self.load_deck_track(next, now_ms);
    }

    pub fn toggle_playback(&mut self, now_ms: i64) {
        if let Some(track) = self.track.as_mut() {
            track.toggle_playback(now_ms);
            tracing::info!(playing = track.is_playing, "playback toggled");
        }
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn library_size(&self) -> usize {
        self.library_size
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Harmonic matches for the current track, in library order.
    pub fn recommendations(&self) -> Vec<RecommendedTrack> {
        if let Some(fixed) = &self.fixed {
            return fixed.clone();
        }
        let Some(current) = self.track.as_ref() else {
            return Vec::new();
        };
        self.library
            .iter()
            .filter(|(name, ..)| *name != current.name)
            .filter_map(|(name, artist, key, bpm)| {
                classify(current, key, *bpm).map(|transition| RecommendedTrack {
                    name: name.clone(),
                    artist: artist.clone(),
                    key: key.clone(),
                    tempo: *bpm,
                    transition,
                })
            })
            .collect()
    }
}
