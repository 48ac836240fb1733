//! Session and request gateway: the one place that owns tokens and talks to the backend.

pub mod common;
pub mod proactive;
pub mod refresh;

mod request;
mod session;

pub use common::*;
pub use proactive::*;
pub use refresh::*;

// self
use crate::{
	_prelude::*,
	auth::{Session, TokenSecret, UserProfile},
	config::GatewayConfig,
	http::ApiTransport,
	obs::{self, TeardownReason},
	store::{SessionStore, StoreError, StoreKey},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestTransport>;

/// Owns the client session and performs every backend call.
///
/// The gateway holds the access token, refresh token, and cached profile, attaches bearer
/// credentials, refreshes transparently on a 401 (at most one refresh in flight), retries
/// the original request once, and tears the session down when recovery is impossible.
/// Views only observe [`Gateway::is_authenticated`] and [`Gateway::current_user`].
///
/// Clones share the same session, store, and refresh guard.
pub struct Gateway<C>
where
	C: ?Sized + ApiTransport,
{
	/// HTTP transport used for every outbound request.
	pub transport: Arc<C>,
	/// Persistence for the three session entries.
	pub store: Arc<dyn SessionStore>,
	/// Base URL and refresh cadence.
	pub config: GatewayConfig,
	/// Shared metrics recorder for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	state: Arc<RwLock<SessionState>>,
	refresh_guard: Arc<AsyncMutex<()>>,
	proactive: Arc<Mutex<Option<tokio::task::AbortHandle>>>,
}
impl<C> Gateway<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates a gateway that reuses the caller-provided transport.
	pub fn with_transport(
		config: GatewayConfig,
		store: Arc<dyn SessionStore>,
		transport: impl Into<Arc<C>>,
	) -> Self {
		Self {
			transport: transport.into(),
			store,
			config,
			refresh_metrics: Default::default(),
			state: Default::default(),
			refresh_guard: Default::default(),
			proactive: Default::default(),
		}
	}

	/// True iff an access token is present; validity is discovered on the next request.
	pub fn is_authenticated(&self) -> bool {
		self.state.read().session.is_some()
	}

	/// Returns the cached profile, if any.
	pub fn current_user(&self) -> Option<UserProfile> {
		self.state.read().session.as_ref().and_then(|session| session.user.clone())
	}

	/// Returns a snapshot of the current session.
	pub fn session(&self) -> Option<Session> {
		self.state.read().session.clone()
	}

	/// Access token plus the stamp it was read under.
	fn credential(&self) -> Option<(TokenSecret, SessionStamp)> {
		let state = self.state.read();

		state.session.as_ref().map(|session| (session.access_token.clone(), state.stamp()))
	}

	/// Persists `session` and makes it current. On a store failure the previous session
	/// stays in place.
	fn install(&self, session: Session) -> Result<Session, StoreError> {
		let mut state = self.state.write();

		persist(self.store.as_ref(), &session)?;
		state.session = Some(session.clone());
		state.epoch += 1;

		Ok(session)
	}

	/// Installs `session` only if nothing replaced or cleared the session since `epoch`.
	fn install_if(&self, epoch: u64, session: Session) -> Result<Option<Session>, StoreError> {
		let mut state = self.state.write();

		if state.epoch != epoch {
			return Ok(state.session.clone());
		}

		persist(self.store.as_ref(), &session)?;
		state.session = Some(session.clone());
		state.epoch += 1;

		Ok(Some(session))
	}

	/// Clears the session in memory, then in the store. No-op when already cleared.
	fn teardown(&self, reason: TeardownReason) -> Result<(), StoreError> {
		let mut state = self.state.write();

		self.clear(&mut state, reason)
	}

	/// Clears the session only if it is still the one observed at `epoch`.
	fn teardown_if(&self, epoch: u64, reason: TeardownReason) -> Result<(), StoreError> {
		let mut state = self.state.write();

		if state.epoch != epoch {
			return Ok(());
		}

		self.clear(&mut state, reason)
	}

	fn clear(&self, state: &mut SessionState, reason: TeardownReason) -> Result<(), StoreError> {
		if state.session.take().is_some() {
			state.epoch += 1;
			obs::record_teardown(reason);
			obs::trace_teardown(reason);
		}

		StoreKey::ALL.into_iter().try_for_each(|key| self.store.remove(key))
	}

	/// Aborts the registered proactive refresh task, if any.
	fn cancel_proactive_refresh(&self) {
		if let Some(handle) = self.proactive.lock().take() {
			handle.abort();
		}
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestTransport> {
	/// Creates a new gateway that provisions its own reqwest-backed transport.
	pub fn new(config: GatewayConfig, store: Arc<dyn SessionStore>) -> Self {
		Self::with_transport(config, store, ReqwestTransport::default())
	}
}
impl<C> Clone for Gateway<C>
where
	C: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			store: self.store.clone(),
			config: self.config.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			state: self.state.clone(),
			refresh_guard: self.refresh_guard.clone(),
			proactive: self.proactive.clone(),
		}
	}
}
impl<C> Debug for Gateway<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.read();

		f.debug_struct("Gateway")
			.field("base_url", &self.config.base_url().as_str())
			.field("authenticated", &state.session.is_some())
			.field("epoch", &state.epoch)
			.finish()
	}
}

/// Current session plus a counter bumped on every install and teardown.
#[derive(Debug, Default)]
struct SessionState {
	session: Option<Session>,
	epoch: u64,
	/// Refresh attempts that never reached the server.
	unreachable: u64,
}
impl SessionState {
	fn stamp(&self) -> SessionStamp {
		SessionStamp { epoch: self.epoch, unreachable: self.unreachable }
	}
}

/// Point-in-time view of [`SessionState`] counters taken before a request is sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SessionStamp {
	epoch: u64,
	unreachable: u64,
}

fn persist(store: &dyn SessionStore, session: &Session) -> Result<(), StoreError> {
	store.set(StoreKey::AccessToken, session.access_token.expose())?;

	match &session.refresh_token {
		Some(token) => store.set(StoreKey::RefreshToken, token.expose())?,
		None => store.remove(StoreKey::RefreshToken)?,
	}
	match &session.user {
		Some(user) => {
			let json = serde_json::to_string(user).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize user profile: {e}"),
			})?;

			store.set(StoreKey::UserProfile, &json)
		},
		None => store.remove(StoreKey::UserProfile),
	}
}
