use futures_util::{Stream, StreamExt};
use std::any::type_name;
use std::collections::BTreeMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::{Notify, broadcast};
use tokio::time::interval_at;
use tokio_stream::wrappers::BroadcastStream;

/// Hands out intervals that run on tokio's clock, or in test mode, on virtual clocks that only move when a
/// test advances them by name.
#[derive(Clone, Default)]
pub struct TimeSource {
	test_time_sources: Option<Arc<TestTimeSources>>,
}

#[derive(Default)]
pub struct TestTimeSources {
	named_time_sources: parking_lot::Mutex<BTreeMap<&'static str, Arc<TestTimeSource>>>,
}

pub struct TestTimeSource {
	time_sender: broadcast::Sender<Duration>,
	notification: Notify,
}

impl Default for TestTimeSource {
	fn default() -> Self {
		Self {
			time_sender: broadcast::channel(1024).0,
			notification: Default::default(),
		}
	}
}

impl TestTimeSources {
	fn interval_at(&self, name: &'static str, start: Duration, period: Duration) -> TestInterval {
		let mut time_sources = self.named_time_sources.lock();
		let time_source = time_sources.entry(name).or_default();
		let interval = TestInterval {
			current_time: Default::default(),
			next_deadline: start,
			period,
			receiver: BroadcastStream::new(time_source.time_sender.subscribe()),
		};

		time_source.notification.notify_one();

		interval
	}

	fn advance_time(&self, name: &'static str, by_duration: Duration) {
		let time_sources = self.named_time_sources.lock();
		let time_source = time_sources.get(name).expect("No time sender of this name");
		let _ = time_source.time_sender.send(by_duration); // ignore error so this works even without anyone waiting
	}

	async fn wait_for_time_request(&self, name: &'static str) {
		let time_source = {
			// subscope so the MutexGuard isn't held across an await point
			let mut time_sources = self.named_time_sources.lock();
			time_sources.entry(name).or_default().clone()
		};

		time_source.notification.notified().await;
	}
}

impl TimeSource {
	#[must_use]
	pub fn test() -> Self {
		Self {
			test_time_sources: Some(Default::default()),
		}
	}

	/// First tick after `start`, then every `period`.
	///
	/// # Panics
	/// With tokio's clock if `period` is zero.
	#[must_use]
	pub fn interval_at(&self, name: &'static str, start: Duration, period: Duration) -> Interval {
		match &self.test_time_sources {
			None => Interval::Tokio(interval_at(tokio::time::Instant::now() + start, period)),
			Some(test_time_source) => Interval::Test(test_time_source.interval_at(name, start, period)),
		}
	}

	/// # Panics
	/// If not in test mode or if no interval of this name was ever created.
	pub fn advance_time(&self, name: &'static str, by_duration: Duration) {
		self.test_time_sources
			.as_ref()
			.expect("Can only be called in test mode.")
			.advance_time(name, by_duration);
	}

	/// Wait until an interval of this name is created. Returns immediately with tokio's clock.
	pub async fn wait_for_time_request(&self, name: &'static str) {
		match &self.test_time_sources {
			None => (),
			Some(test_time_source) => test_time_source.wait_for_time_request(name).await,
		}
	}
}

pub enum Interval {
	Tokio(tokio::time::Interval),
	Test(TestInterval),
}

impl Interval {
	pub async fn tick(&mut self) {
		match self {
			Interval::Tokio(interval) => {
				interval.tick().await;
			}
			Interval::Test(interval) => interval
				.next()
				.await
				.unwrap_or_else(|| panic!("{} dropped prematurely.", type_name::<TimeSource>())),
		}
	}
}

pub struct TestInterval {
	current_time: Duration,
	next_deadline: Duration,
	period: Duration,
	receiver: BroadcastStream<Duration>,
}

impl Stream for TestInterval {
	type Item = ();

	fn poll_next(mut self: Pin<&mut Self>, context: &mut Context) -> Poll<Option<Self::Item>> {
		// Drain everything that is available so the waker stays registered when returning Pending.
		loop {
			match self.receiver.poll_next_unpin(context) {
				Poll::Ready(Some(time_delta)) => {
					self.current_time += time_delta.expect("Failed to receive current time.");
				}
				Poll::Ready(None) => return Poll::Ready(None),
				Poll::Pending => break,
			}
		}

		if self.current_time >= self.next_deadline {
			let period = self.period;
			self.next_deadline += period;
			return Poll::Ready(Some(()));
		}

		Poll::Pending
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use std::fmt::Debug;
	use std::future::Future;
	use tokio::time::timeout;

	#[tokio::test]
	async fn time_source_should_create_tokio_interval_with_correct_short_period() {
		let mut interval =
			create_tokio_based_interval_via_time_source(Duration::from_millis(0), Duration::from_millis(1));

		timeout(Duration::from_millis(100), interval.tick())
			.await
			.expect("Incorrect start time");
		timeout(Duration::from_millis(100), interval.tick())
			.await
			.expect("Incorrect period");
	}

	#[tokio::test]
	async fn time_source_should_create_tokio_interval_with_long_period() {
		let mut interval =
			create_tokio_based_interval_via_time_source(Duration::from_millis(0), Duration::from_secs(1));

		timeout(Duration::from_millis(500), interval.tick())
			.await
			.expect("Incorrect start time");
		timeout(Duration::from_millis(10), interval.tick())
			.await
			.expect_err("Incorrect period");
	}

	#[tokio::test]
	async fn time_source_should_create_tokio_interval_with_long_start_time() {
		let mut interval = create_tokio_based_interval_via_time_source(Duration::from_secs(1), Duration::from_secs(1));

		timeout(Duration::from_millis(500), interval.tick())
			.await
			.expect_err("Incorrect start time");
	}

	fn create_tokio_based_interval_via_time_source(start: Duration, period: Duration) -> Interval {
		let time_source = TimeSource::default();
		let interval = time_source.interval_at("irrelevant", start, period);

		assert!(matches!(interval, Interval::Tokio(_)));
		interval
	}

	#[tokio::test]
	async fn test_interval_should_only_trigger_when_advanced_to_its_start_time() {
		let time_source = TimeSource::test();

		let start = Duration::from_secs(1337);
		let period = Duration::from_secs(42);
		let mut interval = time_source.interval_at("test", start, period);
		assert!(matches!(interval, Interval::Test(_)));

		assert_poll(Poll::Pending, interval.tick()).await;

		time_source.advance_time("test", Duration::from_secs(42));
		assert_poll(Poll::Pending, interval.tick()).await;

		time_source.advance_time("test", Duration::from_secs(1337 - 42));
		assert_poll(Poll::Ready(()), interval.tick()).await;
	}

	#[tokio::test]
	async fn test_interval_should_trigger_after_period() {
		let time_source = TimeSource::test();

		let start = Duration::from_secs(0);
		let period = Duration::from_secs(42);
		let mut interval = time_source.interval_at("nirvana", start, period);

		interval.tick().await;
		assert_poll(Poll::Pending, interval.tick()).await;

		time_source.advance_time("nirvana", Duration::from_secs(1));
		assert_poll(Poll::Pending, interval.tick()).await;

		time_source.advance_time("nirvana", Duration::from_secs(41));
		assert_poll(Poll::Ready(()), interval.tick()).await;

		time_source.advance_time("nirvana", Duration::from_secs(10));
		assert_poll(Poll::Pending, interval.tick()).await;

		time_source.advance_time("nirvana", Duration::from_secs(32));
		assert_poll(Poll::Ready(()), interval.tick()).await;
	}

	#[tokio::test]
	async fn test_time_source_should_advance_time_with_cloned_objects() {
		let original_time_source = TimeSource::test();
		let mut interval = original_time_source.interval_at("dolly", Duration::from_millis(1), Duration::from_millis(1));

		let cloned_time_source = original_time_source.clone();
		cloned_time_source.advance_time("dolly", Duration::from_millis(1));
		assert_poll(Poll::Ready(()), interval.tick()).await;
	}

	#[tokio::test]
	async fn test_interval_should_trigger_multiple_times_after_advancing_multiple_period_lengths() {
		let time_source = TimeSource::test();

		let start = Duration::from_secs(10);
		let period = Duration::from_secs(100);
		let mut interval = time_source.interval_at("multiple", start, period);

		time_source.advance_time("multiple", Duration::from_secs(210));

		assert_poll(Poll::Ready(()), interval.tick()).await;
		assert_poll(Poll::Ready(()), interval.tick()).await;
		assert_poll(Poll::Ready(()), interval.tick()).await;
		assert_poll(Poll::Pending, interval.tick()).await;
	}

	#[tokio::test]
	async fn test_interval_should_trigger_time_request() {
		const INTERVAL_NAME: &str = "interval";
		let time_source = TimeSource::test();

		assert_poll(Poll::Pending, time_source.wait_for_time_request(INTERVAL_NAME)).await;

		let wait_before = time_source.wait_for_time_request(INTERVAL_NAME);
		let _interval = time_source.interval_at(INTERVAL_NAME, Duration::from_millis(0), Duration::from_millis(1));
		assert_poll(Poll::Ready(()), wait_before).await;
	}

	#[tokio::test]
	async fn test_interval_with_different_name_should_not_trigger_time_request() {
		const INTERVAL_NAME: &str = "interval";
		const WAIT_NAME: &str = "infinity";
		let time_source = TimeSource::test();

		let wait_before = time_source.wait_for_time_request(WAIT_NAME);
		let mut interval = time_source.interval_at(INTERVAL_NAME, Duration::from_millis(0), Duration::from_millis(1));
		interval.tick().await;
		assert_poll(Poll::Pending, wait_before).await;
	}

	#[tokio::test]
	async fn tokio_time_source_should_not_wait_for_time_requests() {
		let time_source = TimeSource::default();

		assert_poll(Poll::Ready(()), time_source.wait_for_time_request("anything")).await;
	}

	async fn assert_poll<OutputType: Debug + PartialEq>(expected: Poll<OutputType>, future: impl Future<Output = OutputType>) {
		let mut pinned = std::pin::pin!(future);
		assert_eq!(expected, futures_util::poll!(pinned.as_mut()));
	}
}
