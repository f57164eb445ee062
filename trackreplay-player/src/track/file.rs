use crate::track::Track;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;

/// Load a JSON list of tracks: `[{"name": "...", "points": [[x, y], ...]}, ...]`
pub fn load_tracks(path: impl AsRef<Path>) -> Result<Vec<Track>, TrackFileError> {
	let text = read_to_string(path)?;

	parse_tracks(&text)
}

pub fn parse_tracks(text: &str) -> Result<Vec<Track>, TrackFileError> {
	Ok(serde_json::from_str(text)?)
}

#[derive(Error, Debug)]
pub enum TrackFileError {
	#[error("Failed to deserialize tracks: {0}")]
	DeserializationError(#[from] serde_json::Error),
	#[error("IO operation failed: {0}")]
	IoError(#[from] std::io::Error),
}
