use crate::configuration::Configuration;
use crate::context::ApplicationContext;
use crate::error::TrackReplayError;
use crate::geo_math::{format_duration, format_pace};
use crate::player::PlaybackSnapshot;
use crate::player::state::PlaybackStatus;
use crate::track::file::load_tracks;
use crate::utils::time_source::TimeSource;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser)]
pub struct Commandline {
	#[clap(short = 'c', long = "config-file", default_value = "configuration.toml")]
	pub configuration_file_path: String,
	#[clap(subcommand)]
	pub command: BaseCommand,
}

#[derive(clap::Subcommand)]
pub enum BaseCommand {
	/// Play back the tracks in a JSON file, printing every tick
	Run {
		/// JSON file with a list of tracks
		#[clap(long)]
		tracks: PathBuf,
	},
	/// Print total duration, distance and pace of every track in a JSON file
	Summary {
		/// JSON file with a list of tracks
		#[clap(long)]
		tracks: PathBuf,
	},
	/// Print the configuration
	Configuration,
}

impl Commandline {
	pub async fn run(self) -> Result<(), TrackReplayError> {
		let configuration = Configuration::from_file(&self.configuration_file_path)?;

		tracing_subscriber::fmt()
			.with_env_filter(EnvFilter::try_new(&configuration.log_filters)?)
			.init();

		let application_context = ApplicationContext::new(configuration, TimeSource::default());
		match self.command {
			BaseCommand::Run { tracks } => run_playback(&application_context, tracks).await?,
			BaseCommand::Summary { tracks } => print_summary(&application_context, tracks)?,
			BaseCommand::Configuration => println!("{:?}", application_context.configuration),
		}
		Ok(())
	}
}

async fn run_playback(application_context: &ApplicationContext, tracks_path: PathBuf) -> Result<(), TrackReplayError> {
	let tracks = load_tracks(&tracks_path)?;
	if tracks.is_empty() {
		return Err(TrackReplayError::NoTracks);
	}

	let player = application_context.player();
	player.set_tracks(tracks);

	let done = Arc::new(Notify::new());
	player.on_tick({
		let done = done.clone();
		move |player| {
			let snapshot = player.snapshot();
			print_snapshot(&snapshot);
			if snapshot.state.done {
				done.notify_one();
			}
		}
	});

	info!(path = %tracks_path.display(), speed = %player.speed(), "Starting playback.");
	if player.play() != PlaybackStatus::Running {
		info!("Every track is a single point, nothing to play.");
		return Ok(());
	}

	done.notified().await;
	info!(elapsed = %player.elapsed_text(), "Playback finished.");
	Ok(())
}

fn print_snapshot(snapshot: &PlaybackSnapshot) {
	let center = snapshot
		.center
		.map_or_else(|| "-".to_string(), |center| format!("{:.5}, {:.5}", center.latitude(), center.longitude()));
	println!("{} [{}] center {}", snapshot.elapsed, snapshot.state.speed, center);

	for track in &snapshot.tracks {
		println!(
			"  {}: {:.2} mi, pace {}",
			track.name,
			track.accumulated_distance_miles,
			track.average_pace.as_deref().unwrap_or("--:--")
		);
	}
}

/// Jumps to the end of all tracks, which finishes the distance of every track without ticking.
fn print_summary(application_context: &ApplicationContext, tracks_path: PathBuf) -> Result<(), TrackReplayError> {
	let tracks = load_tracks(tracks_path)?;
	if tracks.is_empty() {
		return Err(TrackReplayError::NoTracks);
	}

	let durations: Vec<Option<u64>> = tracks.iter().map(|track| track.duration_seconds()).collect();
	let player = application_context.player();
	player.set_tracks(tracks);
	player.seek(i64::MAX);

	for (track, duration) in player.track_metrics().iter().zip(durations) {
		let duration = duration.unwrap_or(0);
		let pace = format_pace(duration, track.accumulated_distance_miles);
		println!(
			"{}: {}, {:.2} mi, pace {}",
			track.name,
			format_duration(duration),
			track.accumulated_distance_miles,
			pace.as_deref().unwrap_or("--:--")
		);
	}
	Ok(())
}
