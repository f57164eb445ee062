use crate::track::accumulation::Accumulation;
use serde::Deserialize;
use typed_builder::TypedBuilder;

pub mod accumulation;
pub mod file;

/// A position in degrees, `x` being the longitude and `y` the latitude.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "[f64; 2]")]
pub struct Coordinate {
	pub x: f64,
	pub y: f64,
}

impl Coordinate {
	#[must_use]
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	#[must_use]
	pub const fn longitude(&self) -> f64 {
		self.x
	}

	#[must_use]
	pub const fn latitude(&self) -> f64 {
		self.y
	}
}

impl From<[f64; 2]> for Coordinate {
	fn from([x, y]: [f64; 2]) -> Self {
		Self { x, y }
	}
}

/// One recorded activity. `points[t]` is the position `t` seconds after the start.
#[derive(Clone, Debug, PartialEq, Deserialize, TypedBuilder)]
pub struct Track {
	#[builder(setter(into))]
	pub name: String,
	pub points: Vec<Coordinate>,
	#[builder(default, setter(skip))]
	#[serde(skip)]
	accumulation: Accumulation,
}

impl Track {
	/// Seconds between the first and the last point, `None` for a track without points.
	#[must_use]
	pub fn duration_seconds(&self) -> Option<u64> {
		let last_index = self.points.len().checked_sub(1)?;
		u64::try_from(last_index).ok()
	}

	#[must_use]
	pub fn point_at(&self, second: u64) -> Option<Coordinate> {
		let index = usize::try_from(second).ok()?;
		self.points.get(index).copied()
	}

	/// Distance in miles from the start up to [`Track::last_accumulated_second`].
	#[must_use]
	pub fn accumulated_distance(&self) -> f64 {
		self.accumulation.accumulated_distance
	}

	#[must_use]
	pub fn last_accumulated_second(&self) -> u64 {
		self.accumulation.last_accumulated_second
	}

	/// Average pace as `MM:SS` per mile, if there is one yet.
	#[must_use]
	pub fn average_pace(&self) -> Option<&str> {
		self.accumulation.average_pace.as_deref()
	}
}
