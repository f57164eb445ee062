use crate::configuration::Configuration;
use crate::player::Player;
use crate::utils::time_source::TimeSource;

#[derive(Clone)]
pub struct ApplicationContext {
	pub configuration: Configuration,
	pub time_source: TimeSource,
}

impl ApplicationContext {
	#[must_use]
	pub fn new(configuration: Configuration, time_source: TimeSource) -> ApplicationContext {
		Self {
			configuration,
			time_source,
		}
	}

	/// A new paused player without tracks, set up from the configuration.
	#[must_use]
	pub fn player(&self) -> Player {
		Player::new(self.configuration.player_settings(), self.time_source.clone())
	}
}
