use crate::player::observer::TICK_NOTIFICATION;
use crate::utils::time_source::TimeSource;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Repeating tick that is aborted once dropped.
#[must_use = "dropping the handle cancels the ticks immediately"]
pub struct TickHandle(JoinHandle<()>);

#[cfg(test)]
impl TickHandle {
	pub fn is_finished(&self) -> bool {
		self.0.is_finished()
	}
}

impl Drop for TickHandle {
	fn drop(&mut self) {
		self.0.abort();
	}
}

/// Call `on_tick` every `period`, starting one period from now, until it breaks or the handle is dropped.
///
/// Must be called from within a tokio runtime.
pub fn schedule_ticks<OnTick>(time_source: &TimeSource, period: Duration, mut on_tick: OnTick) -> TickHandle
where
	OnTick: FnMut() -> ControlFlow<()> + Send + 'static,
{
	let mut interval = time_source.interval_at(TICK_NOTIFICATION, period, period);
	let join_handle = tokio::spawn(async move {
		loop {
			interval.tick().await;
			if on_tick().is_break() {
				break;
			}
		}
		debug!("Stopped ticking.");
	});

	TickHandle(join_handle)
}

#[cfg(test)]
mod test {
	use super::*;
	use tokio::sync::mpsc;

	#[tokio::test]
	async fn should_tick_every_period() {
		let time_source = TimeSource::test();
		let (sender, mut receiver) = mpsc::unbounded_channel();

		let _handle = schedule_ticks(&time_source, Duration::from_millis(100), move || {
			let _ = sender.send(());
			ControlFlow::Continue(())
		});
		time_source.advance_time(TICK_NOTIFICATION, Duration::from_millis(300));

		for _ in 0..3 {
			receiver.recv().await.expect("Ticks stopped");
		}
		tokio::task::yield_now().await;
		assert!(receiver.try_recv().is_err(), "Ticked more often than expected");
	}

	#[tokio::test]
	async fn should_stop_once_the_callback_breaks() {
		let time_source = TimeSource::test();
		let (sender, mut receiver) = mpsc::unbounded_channel();

		let mut remaining = 2;
		let handle = schedule_ticks(&time_source, Duration::from_secs(1), move || {
			let _ = sender.send(());
			remaining -= 1;
			if remaining == 0 {
				ControlFlow::Break(())
			} else {
				ControlFlow::Continue(())
			}
		});
		time_source.advance_time(TICK_NOTIFICATION, Duration::from_secs(5));

		receiver.recv().await.expect("First tick missing");
		receiver.recv().await.expect("Second tick missing");
		// The sender is dropped together with the finished task.
		assert_eq!(None, receiver.recv().await);
		assert!(handle.is_finished());
	}

	#[tokio::test]
	async fn dropping_the_handle_should_cancel_the_ticks() {
		let time_source = TimeSource::test();
		let (sender, mut receiver) = mpsc::unbounded_channel::<()>();

		let handle = schedule_ticks(&time_source, Duration::from_secs(1), move || {
			let _ = sender.send(());
			ControlFlow::Continue(())
		});
		drop(handle);

		// The aborted task drops the sender without ever ticking.
		assert_eq!(None, receiver.recv().await);
	}

	#[tokio::test]
	async fn should_not_tick_before_the_first_period() {
		let time_source = TimeSource::test();
		let (sender, mut receiver) = mpsc::unbounded_channel();

		let _handle = schedule_ticks(&time_source, Duration::from_secs(1), move || {
			let _ = sender.send(());
			ControlFlow::Continue(())
		});
		time_source.wait_for_time_request(TICK_NOTIFICATION).await;
		time_source.advance_time(TICK_NOTIFICATION, Duration::from_millis(999));

		tokio::task::yield_now().await;
		assert!(receiver.try_recv().is_err(), "Ticked too early");

		time_source.advance_time(TICK_NOTIFICATION, Duration::from_millis(1));
		receiver.recv().await.expect("Tick missing");
	}
}
