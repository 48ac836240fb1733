//! Session bootstrap: login, registration, logout, and restore from the store.

// self
use crate::{
	_prelude::*,
	auth::{Session, TokenSecret, UserProfile, session::AuthResponse},
	flows::{ApiRequest, Gateway, common},
	http::{ApiTransport, HttpResponse},
	message::ErrorBody,
	obs::{self, OpKind, OpOutcome, OpSpan, TeardownReason},
	store::{StoreError, StoreKey},
};

#[derive(Serialize)]
struct LoginRequest<'a> {
	username: &'a str,
	password: &'a str,
}

impl<C> Gateway<C>
where
	C: ?Sized + ApiTransport,
{
	/// Exchanges credentials for a new session, replacing any previous one.
	///
	/// On failure the previous session (if any) is left untouched.
	pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
		const KIND: OpKind = OpKind::Login;

		let span = OpSpan::new(KIND, "login");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request =
					ApiRequest::post(common::LOGIN_PATH).json(&LoginRequest { username, password })?;
				let response = self.send(&request, None).await?;

				if !response.is_success() {
					return Err(common::credential_failure(&response, "Invalid username or password"));
				}

				self.establish(&response)
			})
			.await;

		record(KIND, &result);

		result
	}

	/// Registers a new user and signs them in.
	///
	/// Field-level rejections (`{errors: {field: message}}`) are aggregated into one
	/// [`Error::Validation`] message.
	pub async fn register<P>(&self, profile: &P) -> Result<Session>
	where
		P: ?Sized + Serialize + Sync,
	{
		const KIND: OpKind = OpKind::Register;

		let span = OpSpan::new(KIND, "register");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = ApiRequest::post(common::REGISTER_PATH).json(profile)?;
				let response = self.send(&request, None).await?;

				if !response.is_success() {
					return Err(registration_failure(&response));
				}

				self.establish(&response)
			})
			.await;

		record(KIND, &result);

		result
	}

	/// Clears the session locally and cancels the proactive refresh task. Never calls
	/// the backend; calling it while logged out is a no-op.
	///
	/// The in-memory session is always cleared; the only possible error is a store
	/// failure while removing the persisted entries.
	pub fn logout(&self) -> Result<()> {
		self.cancel_proactive_refresh();
		self.teardown(TeardownReason::Logout)?;

		Ok(())
	}

	/// Loads a previously persisted session (page-reload equivalent).
	///
	/// Returns `None` when no access token is stored.
	pub fn restore(&self) -> Result<Option<Session>> {
		let Some(access_token) = self.store.get(StoreKey::AccessToken)? else {
			return Ok(None);
		};
		let refresh_token = self.store.get(StoreKey::RefreshToken)?.map(TokenSecret::from);
		let user = self
			.store
			.get(StoreKey::UserProfile)?
			.map(|raw| {
				serde_json::from_str::<UserProfile>(&raw).map_err(|e| StoreError::Serialization {
					message: format!("Stored user profile is not valid JSON: {e}"),
				})
			})
			.transpose()?;
		let session = Session { access_token: TokenSecret::from(access_token), refresh_token, user };

		Ok(Some(self.install(session)?))
	}

	fn establish(&self, response: &HttpResponse) -> Result<Session> {
		let body = common::decode::<AuthResponse>(response)?;

		Ok(self.install(Session::from(body))?)
	}
}

fn registration_failure(response: &HttpResponse) -> Error {
	let body = ErrorBody::parse(&response.body);

	if let Some(message) = body.joined_field_errors() {
		return Error::Validation { message, fields: body.errors.unwrap_or_default() };
	}

	common::credential_failure(response, "Registration failed")
}

fn record<T>(kind: OpKind, result: &Result<T>) {
	match result {
		Ok(_) => obs::record_op_outcome(kind, OpOutcome::Success),
		Err(_) => obs::record_op_outcome(kind, OpOutcome::Failure),
	}
}
