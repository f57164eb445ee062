use crate::geo_math::format_duration;
use crate::player::center::center;
use crate::player::observer::{ObserverId, TickCallback, TickObservers};
use crate::player::playback::{Playback, TickOutcome};
use crate::player::scheduler::{TickHandle, schedule_ticks};
use crate::player::speed::SpeedMultiplier;
use crate::player::state::{PlaybackState, PlaybackStatus};
use crate::track::{Coordinate, Track};
use crate::utils::time_source::TimeSource;
use nonzero_ext::nonzero;
use static_assertions::assert_impl_all;
use std::num::NonZeroU64;
use std::ops::ControlFlow;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info};
use typed_builder::TypedBuilder;

pub mod center;
pub mod observer;
pub mod playback;
pub mod scheduler;
pub mod speed;
pub mod state;

#[derive(Clone, Copy, Debug, PartialEq, Eq, TypedBuilder)]
pub struct PlayerSettings {
	#[builder(default)]
	pub initial_speed: SpeedMultiplier,
	/// Real time between two ticks at a speed multiplier of 1.
	#[builder(default = Duration::from_secs(1))]
	pub base_tick_period: Duration,
	#[builder(default = nonzero!(10u64))]
	pub recalculation_interval_seconds: NonZeroU64,
}

impl Default for PlayerSettings {
	fn default() -> Self {
		Self::builder().build()
	}
}

/// What an observer needs to render one track.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackMetrics {
	pub name: String,
	pub accumulated_distance_miles: f64,
	pub average_pace: Option<String>,
	/// `None` once the cursor is past the end of the track.
	pub position: Option<Coordinate>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackSnapshot {
	pub state: PlaybackState,
	pub elapsed: String,
	pub center: Option<Coordinate>,
	pub tracks: Vec<TrackMetrics>,
}

/// Handle to the playback of a set of tracks. Cheap to clone, all clones control the same playback.
///
/// Starting playback spawns the ticks onto the current tokio runtime.
#[derive(Clone)]
pub struct Player {
	inner: Arc<Inner>,
}

assert_impl_all!(Player: Send, Sync);

struct Inner {
	time_source: TimeSource,
	base_tick_period: Duration,
	scheduling: parking_lot::Mutex<Scheduling>,
	observers: parking_lot::Mutex<TickObservers>,
}

struct Scheduling {
	playback: Playback,
	tick: Option<TickHandle>,
	/// Changes whenever ticks are cancelled, so ticks of a replaced schedule can tell that they are stale.
	generation: u64,
}

impl Scheduling {
	fn cancel_ticks(&mut self) {
		self.generation += 1;
		if self.tick.take().is_some() {
			debug!(generation = self.generation, "Cancelled ticks.");
		}
	}
}

impl Player {
	#[must_use]
	pub fn new(settings: PlayerSettings, time_source: TimeSource) -> Self {
		let scheduling = Scheduling {
			playback: Playback::new(settings.initial_speed, settings.recalculation_interval_seconds),
			tick: None,
			generation: 0,
		};

		Self {
			inner: Arc::new(Inner {
				time_source,
				base_tick_period: settings.base_tick_period,
				scheduling: parking_lot::Mutex::new(scheduling),
				observers: Default::default(),
			}),
		}
	}

	/// Replace all tracks. Pauses and rewinds to the start.
	pub fn set_tracks(&self, tracks: Vec<Track>) {
		let mut scheduling = self.inner.scheduling.lock();
		scheduling.cancel_ticks();
		scheduling.playback.set_tracks(tracks);
	}

	pub fn clear_tracks(&self) {
		let mut scheduling = self.inner.scheduling.lock();
		scheduling.cancel_ticks();
		scheduling.playback.clear_tracks();
	}

	/// Pause or resume, inverting the current mode if `set_to_paused` is `None`.
	pub fn toggle_play(&self, set_to_paused: Option<bool>) -> PlaybackStatus {
		let mut scheduling = self.inner.scheduling.lock();
		scheduling.playback.set_paused(set_to_paused);
		self.inner.restart_ticks(&mut scheduling);

		let status = scheduling.playback.state().status();
		info!(?status, cursor_seconds = scheduling.playback.state().cursor_seconds, "Toggled playback.");
		status
	}

	pub fn play(&self) -> PlaybackStatus {
		self.toggle_play(Some(false))
	}

	pub fn pause(&self) -> PlaybackStatus {
		self.toggle_play(Some(true))
	}

	pub fn adjust_speed(&self, increase: bool) -> SpeedMultiplier {
		let mut scheduling = self.inner.scheduling.lock();
		let speed = scheduling.playback.adjust_speed(increase);
		self.inner.restart_ticks(&mut scheduling);
		speed
	}

	/// Move the cursor by `delta_seconds`, clamped to the playable range.
	pub fn seek(&self, delta_seconds: i64) {
		self.move_cursor(|playback| playback.seek(delta_seconds));
	}

	/// Move the cursor forward by as many seconds as the speed multiplier.
	pub fn step_forward(&self) {
		self.move_cursor(Playback::step_forward);
	}

	/// Move the cursor backward by as many seconds as the speed multiplier.
	pub fn step_backward(&self) {
		self.move_cursor(Playback::step_backward);
	}

	fn move_cursor(&self, reposition: impl FnOnce(&mut Playback)) {
		let mut scheduling = self.inner.scheduling.lock();
		reposition(&mut scheduling.playback);
		if scheduling.playback.state().paused {
			scheduling.cancel_ticks();
		}
	}

	/// Register a callback for every tick. It is called without any lock held, so it may query or control the
	/// player.
	pub fn on_tick<Callback>(&self, callback: Callback) -> ObserverId
	where
		Callback: Fn(&Player) + Send + Sync + 'static,
	{
		self.inner.observers.lock().register(Arc::new(callback))
	}

	/// Returns `false` if there was no observer with this id.
	pub fn remove_tick_observer(&self, id: ObserverId) -> bool {
		self.inner.observers.lock().remove(id)
	}

	#[must_use]
	pub fn state(&self) -> PlaybackState {
		self.inner.scheduling.lock().playback.state()
	}

	#[must_use]
	pub fn status(&self) -> PlaybackStatus {
		self.state().status()
	}

	#[must_use]
	pub fn cursor_seconds(&self) -> u64 {
		self.state().cursor_seconds
	}

	#[must_use]
	pub fn is_paused(&self) -> bool {
		self.state().paused
	}

	#[must_use]
	pub fn is_done(&self) -> bool {
		self.state().done
	}

	#[must_use]
	pub fn speed(&self) -> SpeedMultiplier {
		self.state().speed
	}

	#[must_use]
	pub fn max_duration_seconds(&self) -> Option<u64> {
		self.state().max_duration_seconds
	}

	/// Whether a repeating tick is currently installed.
	#[must_use]
	pub fn is_ticking(&self) -> bool {
		self.inner.scheduling.lock().tick.is_some()
	}

	/// The cursor formatted as elapsed time.
	#[must_use]
	pub fn elapsed_text(&self) -> String {
		format_duration(self.cursor_seconds())
	}

	#[must_use]
	pub fn center(&self) -> Option<Coordinate> {
		let scheduling = self.inner.scheduling.lock();
		center(scheduling.playback.tracks(), scheduling.playback.state().cursor_seconds)
	}

	#[must_use]
	pub fn track_metrics(&self) -> Vec<TrackMetrics> {
		let scheduling = self.inner.scheduling.lock();
		track_metrics(&scheduling.playback)
	}

	/// Everything an observer needs, taken consistently under a single lock.
	#[must_use]
	pub fn snapshot(&self) -> PlaybackSnapshot {
		let scheduling = self.inner.scheduling.lock();
		let state = scheduling.playback.state();

		PlaybackSnapshot {
			state,
			elapsed: format_duration(state.cursor_seconds),
			center: center(scheduling.playback.tracks(), state.cursor_seconds),
			tracks: track_metrics(&scheduling.playback),
		}
	}
}

fn track_metrics(playback: &Playback) -> Vec<TrackMetrics> {
	let cursor_seconds = playback.state().cursor_seconds;
	playback
		.tracks()
		.iter()
		.map(|track| TrackMetrics {
			name: track.name.clone(),
			accumulated_distance_miles: track.accumulated_distance(),
			average_pace: track.average_pace().map(ToString::to_string),
			position: track.point_at(cursor_seconds),
		})
		.collect()
}

impl Inner {
	/// Cancel any installed tick and, if running, install a new one with the period of the current speed.
	fn restart_ticks(self: &Arc<Self>, scheduling: &mut Scheduling) {
		scheduling.cancel_ticks();

		let state = scheduling.playback.state();
		if state.paused {
			return;
		}

		let generation = scheduling.generation;
		let period = state.speed.tick_period(self.base_tick_period);
		let inner = Arc::downgrade(self);
		scheduling.tick = Some(schedule_ticks(&self.time_source, period, move || {
			tick(&inner, generation)
		}));
		debug!(generation, ?period, "Scheduled ticks.");
	}

	fn notify_observers(self: Arc<Self>) {
		let callbacks: Vec<TickCallback> = self.observers.lock().callbacks();
		let player = Player { inner: self };
		for callback in callbacks {
			callback(&player);
		}
	}
}

fn tick(inner: &Weak<Inner>, generation: u64) -> ControlFlow<()> {
	// All handles are gone, nobody is left to observe the ticks.
	let Some(inner) = inner.upgrade() else {
		return ControlFlow::Break(());
	};

	let outcome = {
		let mut scheduling = inner.scheduling.lock();
		if scheduling.generation != generation {
			return ControlFlow::Break(());
		}

		let outcome = scheduling.playback.tick();
		if outcome != TickOutcome::Advanced {
			scheduling.cancel_ticks();
		}
		outcome
	};

	match outcome {
		TickOutcome::Ignored => ControlFlow::Break(()),
		TickOutcome::Advanced => {
			inner.notify_observers();
			ControlFlow::Continue(())
		}
		TickOutcome::ReachedEnd => {
			inner.notify_observers();
			ControlFlow::Break(())
		}
	}
}
