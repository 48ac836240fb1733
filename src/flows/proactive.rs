//! Periodic silent refresh while a session is active.

// crates.io
use tokio::{
	sync::oneshot,
	task::JoinHandle,
	time::{self, Instant, MissedTickBehavior},
};
// self
use crate::{_prelude::*, flows::Gateway, http::ApiTransport, obs};

/// Handle to a scheduled proactive refresh task.
///
/// Dropping the handle aborts the task.
#[derive(Debug)]
pub struct ProactiveRefresh {
	task: Option<JoinHandle<()>>,
	expired: Option<oneshot::Receiver<()>>,
}
impl ProactiveRefresh {
	/// Waits until the task stops.
	///
	/// Returns `true` when the backend rejected the refresh token and the session was torn
	/// down, so the caller should return to the login screen. Returns `false` when the
	/// task stopped for any other reason (session cleared elsewhere, cancelled). Once
	/// resolved, later calls return `false` immediately.
	pub async fn expired(&mut self) -> bool {
		match self.expired.take() {
			Some(rx) => rx.await.is_ok(),
			None => false,
		}
	}

	/// Returns `true` once the task is no longer running.
	pub fn is_finished(&self) -> bool {
		self.task.as_ref().is_none_or(JoinHandle::is_finished)
	}

	/// Stops the task.
	pub fn cancel(mut self) {
		self.abort();
	}

	fn abort(&mut self) {
		if let Some(task) = self.task.take() {
			task.abort();
		}
	}
}
impl Drop for ProactiveRefresh {
	fn drop(&mut self) {
		self.abort();
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + ApiTransport,
{
	/// Spawns a task that refreshes the session every
	/// [`proactive_refresh_interval`](crate::config::GatewayConfig::proactive_refresh_interval).
	///
	/// Ticks without a refresh token are skipped; the task stops once no session is held.
	/// Scheduling again aborts the previously scheduled task, as does [`Gateway::logout`].
	///
	/// # Panics
	///
	/// Panics when called outside a Tokio runtime.
	pub fn schedule_proactive_refresh(&self) -> ProactiveRefresh {
		let period = self.config.proactive_refresh_interval().unsigned_abs();
		let (expired_tx, expired_rx) = oneshot::channel();
		let gateway = self.clone();
		let task = tokio::spawn(async move {
			let mut ticker = time::interval_at(Instant::now() + period, period);

			ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

			loop {
				ticker.tick().await;

				let Some(session) = gateway.session() else {
					break;
				};

				if !session.can_refresh() {
					continue;
				}

				match gateway.refresh_session().await {
					Ok(_) => {},
					Err(Error::SessionExpired) => {
						if !gateway.is_authenticated() {
							let _ = expired_tx.send(());
						}

						break;
					},
					Err(e) => obs::trace_proactive_failure(&e),
				}
			}
		});

		if let Some(previous) = self.proactive.lock().replace(task.abort_handle()) {
			previous.abort();
		}

		ProactiveRefresh { task: Some(task), expired: Some(expired_rx) }
	}
}
