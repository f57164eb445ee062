use derive_more::{Display, From, Into};
use nonzero_ext::nonzero;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;

/// Timer resolution of tokio, shorter periods would only burst.
const MINIMUM_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Simulated seconds per real tick period. Also divides the tick period, so that every tick advances the
/// playback by exactly one simulated second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Display, From, Into)]
#[display("{_0}x")]
pub struct SpeedMultiplier(NonZeroU32);

impl SpeedMultiplier {
	pub const MINIMUM: Self = Self(NonZeroU32::MIN);
	pub const DEFAULT: Self = Self(nonzero!(10u32));

	#[must_use]
	pub const fn get(self) -> u32 {
		self.0.get()
	}

	/// Next step up the ladder: +1 below 10, +5 below 50, +10 from there.
	#[must_use]
	pub fn increased(self) -> Self {
		let step = match self.get() {
			0..=9 => 1,
			10..=49 => 5,
			_ => 10,
		};
		Self(self.0.saturating_add(step))
	}

	/// Next step down the ladder: -5 above 10, -1 down to 1, never below 1.
	#[must_use]
	pub fn decreased(self) -> Self {
		let multiplier = self.get();
		let decreased = match multiplier {
			11.. => multiplier - 5,
			_ => multiplier - 1,
		};
		NonZeroU32::new(decreased).map_or(Self::MINIMUM, Self)
	}

	#[must_use]
	pub fn adjusted(self, increase: bool) -> Self {
		if increase { self.increased() } else { self.decreased() }
	}

	/// Real time between two ticks, given the period at a multiplier of 1.
	#[must_use]
	pub fn tick_period(self, base_tick_period: Duration) -> Duration {
		(base_tick_period / self.get()).max(MINIMUM_TICK_PERIOD)
	}
}

impl Default for SpeedMultiplier {
	fn default() -> Self {
		Self::DEFAULT
	}
}
