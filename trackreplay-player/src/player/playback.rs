use crate::player::speed::SpeedMultiplier;
use crate::player::state::PlaybackState;
use crate::track::Track;
use std::num::NonZeroU64;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
	Advanced,
	/// The tick moved the cursor onto the end, nothing is left to play.
	ReachedEnd,
	/// Paused or nothing to play. The cursor didn't move.
	Ignored,
}

/// The playback clock together with the tracks it drives. Purely synchronous, scheduling the ticks is up to
/// the owner.
#[derive(Clone, Debug)]
pub struct Playback {
	state: PlaybackState,
	tracks: Vec<Track>,
	recalculation_interval_seconds: NonZeroU64,
}

impl Playback {
	#[must_use]
	pub fn new(speed: SpeedMultiplier, recalculation_interval_seconds: NonZeroU64) -> Self {
		Self {
			state: PlaybackState::new(speed),
			tracks: Vec::new(),
			recalculation_interval_seconds,
		}
	}

	#[must_use]
	pub fn state(&self) -> PlaybackState {
		self.state
	}

	#[must_use]
	pub fn tracks(&self) -> &[Track] {
		&self.tracks
	}

	/// Replace all tracks and rewind to a paused start.
	pub fn set_tracks(&mut self, tracks: Vec<Track>) {
		self.tracks = tracks;
		self.state.max_duration_seconds = self.tracks.iter().filter_map(Track::duration_seconds).max();
		self.state.paused = true;
		self.state.done = false;
		self.state.cursor_seconds = 0;
		self.recalculate();

		info!(
			tracks = self.tracks.len(),
			max_duration_seconds = ?self.state.max_duration_seconds,
			"Replaced tracks."
		);
	}

	pub fn clear_tracks(&mut self) {
		self.set_tracks(Vec::new());
	}

	/// Pause or resume, inverting the current mode if `set_to_paused` is `None`.
	/// Resuming is refused while there is nothing left to play. Returns whether the playback is running.
	pub fn set_paused(&mut self, set_to_paused: Option<bool>) -> bool {
		let paused = set_to_paused.unwrap_or(!self.state.paused);
		if !paused && !self.state.can_resume() {
			warn!(
				cursor_seconds = self.state.cursor_seconds,
				max_duration_seconds = ?self.state.max_duration_seconds,
				"Nothing left to play, staying paused."
			);
			self.state.paused = true;
			return false;
		}

		self.state.paused = paused;
		!paused
	}

	/// Advance by one simulated second.
	pub fn tick(&mut self) -> TickOutcome {
		if self.state.paused {
			return TickOutcome::Ignored;
		}
		let Some(max_duration_seconds) = self.state.max_duration_seconds else {
			self.state.paused = true;
			return TickOutcome::Ignored;
		};

		if self.state.cursor_seconds < max_duration_seconds {
			self.state.cursor_seconds += 1;
		}

		debug!(cursor_seconds = self.state.cursor_seconds, "Tick.");

		let reached_end = self.state.cursor_seconds >= max_duration_seconds;
		if reached_end {
			self.state.done = true;
			self.state.paused = true;
		}

		// Accumulating is the expensive part, so only do it every few seconds and once more at the end.
		if reached_end || self.state.cursor_seconds % self.recalculation_interval_seconds == 0 {
			self.accumulate();
		}

		if reached_end {
			info!(cursor_seconds = self.state.cursor_seconds, "Reached the end of all tracks.");
			TickOutcome::ReachedEnd
		} else {
			TickOutcome::Advanced
		}
	}

	pub fn adjust_speed(&mut self, increase: bool) -> SpeedMultiplier {
		self.state.speed = self.state.speed.adjusted(increase);
		debug!(speed = %self.state.speed, "Adjusted speed.");
		self.state.speed
	}

	/// Move the cursor by `delta_seconds`, clamped to the playable range, and recompute all tracks from their
	/// start.
	pub fn seek(&mut self, delta_seconds: i64) {
		let upper_bound = self.state.max_duration_seconds.unwrap_or(0);
		self.state.cursor_seconds = self
			.state
			.cursor_seconds
			.saturating_add_signed(delta_seconds)
			.min(upper_bound);

		// Single-point tracks have nothing to play, so there is no end to reach either.
		self.state.done = self.state.max_duration_seconds.is_some_and(|max_duration_seconds| {
			max_duration_seconds > 0 && self.state.cursor_seconds >= max_duration_seconds
		});
		if self.state.done {
			self.state.paused = true;
		}

		self.recalculate();
		debug!(cursor_seconds = self.state.cursor_seconds, "Seeked.");
	}

	pub fn step_forward(&mut self) {
		self.seek(i64::from(self.state.speed.get()));
	}

	pub fn step_backward(&mut self) {
		self.seek(-i64::from(self.state.speed.get()));
	}

	fn recalculate(&mut self) {
		let cursor_seconds = self.state.cursor_seconds;
		for track in &mut self.tracks {
			track.reset_accumulation();
			track.accumulate_to(cursor_seconds);
		}
	}

	fn accumulate(&mut self) {
		let cursor_seconds = self.state.cursor_seconds;
		for track in &mut self.tracks {
			track.accumulate_to(cursor_seconds);
		}
	}
}
