use crate::track::{Coordinate, Track};

/// Mean position of all tracks that still have a point at `cursor_seconds`.
#[must_use]
pub fn center(tracks: &[Track], cursor_seconds: u64) -> Option<Coordinate> {
	let (sum, count) = tracks
		.iter()
		.filter_map(|track| track.point_at(cursor_seconds))
		.fold((Coordinate::default(), 0u32), |(sum, count), point| {
			(Coordinate::new(sum.x + point.x, sum.y + point.y), count + 1)
		});

	(count > 0).then(|| {
		let count = f64::from(count);
		Coordinate::new(sum.x / count, sum.y / count)
	})
}
