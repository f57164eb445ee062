use crate::player::PlayerSettings;
use crate::player::speed::SpeedMultiplier;
use serde::Deserialize;
use std::fs::read_to_string;
use std::num::NonZeroU64;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
	pub log_filters: String,
	pub initial_speed_multiplier: SpeedMultiplier,
	#[serde(with = "humantime_serde")]
	pub base_tick_period: Duration,
	pub recalculation_interval_seconds: NonZeroU64,
}

impl Configuration {
	pub fn from_file(path: impl AsRef<Path>) -> Result<Configuration, ConfigurationError> {
		let text = read_to_string(path)?;

		Configuration::try_from(text.as_str())
	}

	#[must_use]
	pub fn player_settings(&self) -> PlayerSettings {
		PlayerSettings::builder()
			.initial_speed(self.initial_speed_multiplier)
			.base_tick_period(self.base_tick_period)
			.recalculation_interval_seconds(self.recalculation_interval_seconds)
			.build()
	}
}

impl Default for Configuration {
	fn default() -> Self {
		let PlayerSettings {
			initial_speed,
			base_tick_period,
			recalculation_interval_seconds,
		} = PlayerSettings::default();

		Self {
			log_filters: "info".to_string(),
			initial_speed_multiplier: initial_speed,
			base_tick_period,
			recalculation_interval_seconds,
		}
	}
}

impl TryFrom<&str> for Configuration {
	type Error = ConfigurationError;

	fn try_from(text: &str) -> Result<Self, Self::Error> {
		let configuration: Configuration = toml::from_str(text)?;
		if configuration.base_tick_period.is_zero() {
			return Err(ConfigurationError::ZeroTickPeriod);
		}

		Ok(configuration)
	}
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
	#[error("Failed to deserialize with error: {0}")]
	DeserializationError(#[from] toml::de::Error),
	#[error("IO operation failed: {0}")]
	IoError(#[from] std::io::Error),
	#[error("The base tick period must not be zero.")]
	ZeroTickPeriod,
}
