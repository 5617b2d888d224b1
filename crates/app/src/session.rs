use std::path::Path;

use phrase_board_core::{RecommendedTrack, Result, Track};
use serde::{Deserialize, Serialize};

/// A saved snapshot of what the data source would hand the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub track: Option<Track>,
    #[serde(default)]
    pub recommendations: Vec<RecommendedTrack>,
    /// Defaults to the number of recommendations when absent.
    #[serde(default)]
    pub library_size: Option<usize>,
    #[serde(default)]
    pub notices: Vec<String>,
}

impl Session {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!(?path, "loading session");
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn library_size(&self) -> usize {
        self.library_size.unwrap_or(self.recommendations.len())
    }
}

#[cfg(test)]
mod tests {
    use phrase_board_core::TransitionType;

    use super::*;

    #[test]
    fn parses_a_minimal_document() {
        let session: Session = serde_json::from_str(
            r#"{
                "track": {
                    "name": "Night Drive",
                    "artist": "Cobalt",
                    "key": "8A",
                    "progress_ms": 1000,
                    "duration_ms": 200000,
                    "is_playing": true,
                    "tempo": 122.0
                },
                "recommendations": [
                    { "name": "Halo", "artist": "Vessel", "key": "9A", "tempo": 124.0, "transition": "energy-up" }
                ]
            }"#,
        )
        .unwrap();

        let track = session.track.as_ref().unwrap();
        assert_eq!(track.time_signature, None);
        assert_eq!(track.timestamp_ms, 0);
        assert_eq!(session.recommendations[0].transition, TransitionType::EnergyUp);
        assert_eq!(session.library_size(), 1);
    }

    #[test]
    fn missing_files_surface_io_errors() {
        let err = Session::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, phrase_board_core::BoardError::Io(_)));
    }
}
