//! Distance and formatting primitives shared by the accumulator and the observers.

const EARTH_RADIUS_KILOMETERS: f64 = 6371.0;
const MILES_PER_KILOMETER: f64 = 0.621_371_192;

/// Haversine distance in kilometers between two coordinates given in degrees.
#[must_use]
pub fn great_circle_km(latitude1: f64, longitude1: f64, latitude2: f64, longitude2: f64) -> f64 {
	let delta_latitude = (latitude2 - latitude1).to_radians();
	let delta_longitude = (longitude2 - longitude1).to_radians();
	let latitude1 = latitude1.to_radians();
	let latitude2 = latitude2.to_radians();

	let a = (delta_latitude / 2.0).sin().powi(2)
		+ (delta_longitude / 2.0).sin().powi(2) * latitude1.cos() * latitude2.cos();
	let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
	EARTH_RADIUS_KILOMETERS * c
}

#[must_use]
pub fn km_to_miles(kilometers: f64) -> f64 {
	kilometers * MILES_PER_KILOMETER
}

/// Formats as `H:MM:SS`, or `M:SS` when there are no full hours.
#[must_use]
pub fn format_duration(total_seconds: u64) -> String {
	let hours = total_seconds / 3600;
	let minutes = (total_seconds % 3600) / 60;
	let seconds = total_seconds % 60;

	if hours > 0 {
		format!("{hours}:{minutes:02}:{seconds:02}")
	} else {
		format!("{minutes}:{seconds:02}")
	}
}

/// Average pace in minutes per mile, formatted as `MM:SS`.
///
/// Both parts are truncated, not rounded. Returns `None` if the pace isn't a finite number,
/// which is the case for any distance that isn't strictly positive.
#[must_use]
pub fn format_pace(total_seconds: u64, distance_miles: f64) -> Option<String> {
	if !(distance_miles.is_finite() && distance_miles > 0.0) {
		return None;
	}

	#[allow(clippy::cast_precision_loss)]
	let minutes_per_mile = total_seconds as f64 / distance_miles / 60.0;
	if !minutes_per_mile.is_finite() {
		return None;
	}

	let minutes = minutes_per_mile.trunc();
	let seconds = ((minutes_per_mile - minutes) * 60.0).trunc();
	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	let (minutes, seconds) = (minutes as u64, seconds as u64);
	Some(format!("{minutes:02}:{seconds:02}"))
}

#[cfg(test)]
mod test {
	use super::*;

	const ONE_DEGREE_KILOMETERS: f64 = 6371.0 * std::f64::consts::PI / 180.0;

	#[test]
	fn great_circle_should_measure_one_degree_along_a_meridian() {
		let distance = great_circle_km(0.0, 0.0, 1.0, 0.0);

		assert!((distance - ONE_DEGREE_KILOMETERS).abs() < 1e-9, "Unexpected distance: {distance}");
	}

	#[test]
	fn great_circle_should_measure_one_degree_along_the_equator() {
		let distance = great_circle_km(0.0, 0.0, 0.0, 1.0);

		assert!((distance - ONE_DEGREE_KILOMETERS).abs() < 1e-9, "Unexpected distance: {distance}");
	}

	#[test]
	fn great_circle_should_be_zero_for_identical_points() {
		assert_eq!(0.0, great_circle_km(52.52, 13.405, 52.52, 13.405));
	}

	#[test]
	fn great_circle_should_be_symmetric() {
		let there = great_circle_km(48.8566, 2.3522, 51.5074, -0.1278);
		let back = great_circle_km(51.5074, -0.1278, 48.8566, 2.3522);

		assert!((there - back).abs() < 1e-9);
		assert!((340.0..350.0).contains(&there), "Paris to London was {there}km");
	}

	#[test]
	fn should_convert_kilometers_to_miles() {
		assert!((km_to_miles(1.609_344) - 1.0).abs() < 1e-6);
		assert_eq!(0.0, km_to_miles(0.0));
	}

	#[test]
	fn should_format_duration_without_hours() {
		assert_eq!("0:00", format_duration(0));
		assert_eq!("0:59", format_duration(59));
		assert_eq!("2:05", format_duration(125));
		assert_eq!("59:59", format_duration(3599));
	}

	#[test]
	fn should_format_duration_with_hours() {
		assert_eq!("1:00:00", format_duration(3600));
		assert_eq!("1:02:05", format_duration(3725));
		assert_eq!("27:46:40", format_duration(100_000));
	}

	#[test]
	fn should_format_whole_minute_pace() {
		assert_eq!(Some("10:00".to_string()), format_pace(600, 1.0));
	}

	#[test]
	fn should_format_pace_with_seconds() {
		assert_eq!(Some("07:30".to_string()), format_pace(450, 1.0));
		assert_eq!(Some("07:30".to_string()), format_pace(900, 2.0));
	}

	#[test]
	fn should_truncate_pace_instead_of_rounding() {
		// 7.999 minutes per mile
		assert_eq!(Some("07:59".to_string()), format_pace(479_940, 1000.0));
	}

	#[test]
	fn should_not_cut_off_slow_paces() {
		assert_eq!(Some("200:00".to_string()), format_pace(6000, 0.5));
	}

	#[test]
	fn should_not_format_pace_without_distance() {
		assert_eq!(None, format_pace(42, 0.0));
		assert_eq!(None, format_pace(0, 0.0));
		assert_eq!(None, format_pace(42, -1.0));
		assert_eq!(None, format_pace(42, f64::NAN));
	}
}
