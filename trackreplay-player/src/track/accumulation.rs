use crate::geo_math::{format_pace, great_circle_km, km_to_miles};
use crate::track::{Coordinate, Track};

/// Running totals of a track, only valid for a cursor that never moved backwards since the last reset.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Accumulation {
	pub(super) accumulated_distance: f64,
	/// Last second whose segment `(t - 1, t)` has been added. 0 means nothing has been added.
	pub(super) last_accumulated_second: u64,
	pub(super) average_pace: Option<String>,
}

impl Track {
	pub fn reset_accumulation(&mut self) {
		self.accumulation = Accumulation::default();
	}

	/// Fold the distance up to and including the point at `cursor_seconds` into the running total and
	/// refresh the average pace.
	///
	/// This only moves forward. If the cursor went backwards since the last call,
	/// [`Track::reset_accumulation`] has to be called first.
	pub fn accumulate_to(&mut self, cursor_seconds: u64) {
		let accumulation = &mut self.accumulation;

		if accumulation.last_accumulated_second <= cursor_seconds {
			let first_segment = usize::try_from(accumulation.last_accumulated_second).unwrap_or(usize::MAX);
			let end_segment = usize::try_from(cursor_seconds).unwrap_or(usize::MAX);

			// Adding one segment at a time keeps the sum identical no matter how the cursor got here.
			for segment in self
				.points
				.windows(2)
				.skip(first_segment)
				.take(end_segment - first_segment)
			{
				accumulation.accumulated_distance += segment_miles(segment[0], segment[1]);
			}
			accumulation.last_accumulated_second = cursor_seconds;
		}

		// Past the end of the track the pace is left as it is, which is unset right after a reset.
		let has_point_at_cursor = self.duration_seconds().is_some_and(|duration| cursor_seconds <= duration);
		if cursor_seconds > 0 && has_point_at_cursor {
			self.accumulation.average_pace = format_pace(cursor_seconds, self.accumulation.accumulated_distance);
		}
	}
}

fn segment_miles(from: Coordinate, to: Coordinate) -> f64 {
	km_to_miles(great_circle_km(from.latitude(), from.longitude(), to.latitude(), to.longitude()))
}
