use crate::configuration::ConfigurationError;
use crate::track::file::TrackFileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackReplayError {
	#[error("Failed to load configuration: {0}")]
	Configuration(#[from] ConfigurationError),
	#[error("Failed to load tracks: {0}")]
	TrackFile(#[from] TrackFileError),
	#[error("Invalid log filters: {0}")]
	LogFilters(#[from] tracing_subscriber::filter::ParseError),
	#[error("There are no tracks to play.")]
	NoTracks,
}
