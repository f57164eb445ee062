use crate::player::speed::SpeedMultiplier;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
	Paused,
	Running,
	/// The cursor reached the end of the longest track. Implies being paused.
	Done,
}

/// Position and mode of the playback clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackState {
	/// Whole simulated seconds since the start of all tracks.
	pub cursor_seconds: u64,
	pub speed: SpeedMultiplier,
	pub paused: bool,
	pub done: bool,
	/// Duration of the longest track, `None` if there is nothing to play.
	pub max_duration_seconds: Option<u64>,
}

impl PlaybackState {
	#[must_use]
	pub fn new(speed: SpeedMultiplier) -> Self {
		Self {
			cursor_seconds: 0,
			speed,
			paused: true,
			done: false,
			max_duration_seconds: None,
		}
	}

	#[must_use]
	pub fn status(&self) -> PlaybackStatus {
		match (self.paused, self.done) {
			(_, true) => PlaybackStatus::Done,
			(true, false) => PlaybackStatus::Paused,
			(false, false) => PlaybackStatus::Running,
		}
	}

	/// Whether there is anything left to play from the current cursor.
	#[must_use]
	pub fn can_resume(&self) -> bool {
		self.max_duration_seconds
			.is_some_and(|max_duration_seconds| self.cursor_seconds < max_duration_seconds)
	}
}
