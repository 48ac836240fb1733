//! Refresh-token rotation behind a singleflight guard.
//!
//! Every 401 recovery and every proactive refresh goes through one async mutex. A caller
//! that saw a 401 under session epoch `E` takes the guard and only calls
//! `/auth/refresh` if the epoch is still `E`; otherwise an earlier holder already
//! refreshed (or tore the session down) and the caller reuses that outcome. A refresh
//! that never reached the server leaves the epoch alone but bumps an `unreachable`
//! counter, so callers queued behind it reuse the transport failure too. Taking the
//! guard is the check-and-mark, so N concurrent 401s under one token produce exactly one
//! refresh call whatever its outcome.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{Session, TokenSecret, session::RefreshResponse},
	error::TransportError,
	flows::{ApiRequest, Gateway, SessionStamp, common},
	http::ApiTransport,
	obs::{self, OpKind, OpOutcome, OpSpan, TeardownReason},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
	refresh_token: &'a str,
}

impl<C> Gateway<C>
where
	C: ?Sized + ApiTransport,
{
	/// Forces a silent refresh of the current session.
	///
	/// Fails with [`Error::SessionExpired`] (after tearing the session down) when no
	/// refresh token is stored or the backend rejects it. A transport failure leaves the
	/// session in place.
	pub async fn refresh_session(&self) -> Result<Session> {
		let _singleflight = self.refresh_guard.lock().await;

		self.rotate_locked().await
	}

	/// Recovers from a 401 observed under `stale` and returns the token to retry with.
	pub(crate) async fn recover_from_unauthorized(
		&self,
		stale: SessionStamp,
	) -> Result<TokenSecret> {
		let _singleflight = self.refresh_guard.lock().await;
		let settled = {
			let state = self.state.read();

			if state.epoch != stale.epoch {
				Some(
					state
						.session
						.as_ref()
						.map(|session| session.access_token.clone())
						.ok_or(Error::SessionExpired),
				)
			} else if state.unreachable != stale.unreachable {
				Some(Err(TransportError::RefreshUnreachable.into()))
			} else {
				None
			}
		};

		if let Some(outcome) = settled {
			self.refresh_metrics.record_reuse();

			return outcome;
		}

		self.rotate_locked().await.map(|session| session.access_token)
	}

	/// Calls the refresh endpoint and installs the result. Callers must hold the guard.
	async fn rotate_locked(&self) -> Result<Session> {
		const KIND: OpKind = OpKind::Refresh;

		let span = OpSpan::new(KIND, "rotate");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.refresh_metrics.record_attempt();

				let (current, epoch) = {
					let state = self.state.read();

					(state.session.clone(), state.epoch)
				};
				let Some(current) = current else {
					return Err(Error::SessionExpired);
				};
				let Some(refresh_token) = current.refresh_token.clone() else {
					self.teardown_if(epoch, TeardownReason::MissingRefreshToken)?;

					return Err(Error::SessionExpired);
				};
				let request = ApiRequest::post(common::REFRESH_PATH)
					.json(&RefreshRequest { refresh_token: refresh_token.expose() })?;
				let response = match self.send(&request, None).await {
					Ok(response) => response,
					Err(e) => {
						if matches!(e, Error::Transport(_)) {
							self.state.write().unreachable += 1;
						}

						return Err(e);
					},
				};
				let rotated = if response.is_success() {
					common::decode::<RefreshResponse>(&response)
						.ok()
						.map(|body| current.rotated(body.token, body.refresh_token))
				} else {
					None
				};
				let Some(rotated) = rotated else {
					self.teardown_if(epoch, TeardownReason::RefreshRejected)?;

					return Err(Error::SessionExpired);
				};

				// A logout or a new login while the refresh was in flight wins.
				self.install_if(epoch, rotated)?.ok_or(Error::SessionExpired)
			})
			.await;

		match &result {
			Ok(_) => {
				self.refresh_metrics.record_success();
				obs::record_op_outcome(KIND, OpOutcome::Success);
			},
			Err(_) => {
				self.refresh_metrics.record_failure();
				obs::record_op_outcome(KIND, OpOutcome::Failure);
			},
		}

		result
	}
}
