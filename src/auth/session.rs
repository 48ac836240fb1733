//! Client-held authentication state and the wire payloads that create it.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Role attached to a user profile.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
	/// Retail banking customer.
	Customer,
	/// Back-office administrator.
	Admin,
	/// Any role the client does not know about, preserved verbatim.
	Other(String),
}
impl Role {
	/// Returns the wire label.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Customer => "CUSTOMER",
			Self::Admin => "ADMIN",
			Self::Other(value) => value,
		}
	}
}
impl From<String> for Role {
	fn from(value: String) -> Self {
		match value.as_str() {
			"CUSTOMER" => Self::Customer,
			"ADMIN" => Self::Admin,
			_ => Self::Other(value),
		}
	}
}
impl From<Role> for String {
	fn from(value: Role) -> Self {
		match value {
			Role::Other(value) => value,
			known => known.as_str().to_owned(),
		}
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Cached profile of the signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Login name.
	pub username: String,
	/// Role granted by the backend.
	pub role: Role,
}
impl UserProfile {
	/// Creates a profile.
	pub fn new(username: impl Into<String>, role: Role) -> Self {
		Self { username: username.into(), role }
	}
}

/// Authentication state owned by the gateway.
///
/// A session always carries an access token; "no session" is modelled as `None` on the
/// gateway, so token presence and authenticated status cannot drift apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
	/// Short-lived bearer credential.
	pub access_token: TokenSecret,
	/// Credential used solely to mint a new access token.
	pub refresh_token: Option<TokenSecret>,
	/// Profile cached alongside the tokens.
	pub user: Option<UserProfile>,
}
impl Session {
	/// Returns `true` when a silent refresh is possible.
	pub fn can_refresh(&self) -> bool {
		self.refresh_token.is_some()
	}

	/// Applies a refresh response, keeping the previous refresh token unless a new one
	/// was issued.
	pub fn rotated(&self, access_token: TokenSecret, refresh_token: Option<TokenSecret>) -> Self {
		Self {
			access_token,
			refresh_token: refresh_token.or_else(|| self.refresh_token.clone()),
			user: self.user.clone(),
		}
	}
}

/// Success body of `/auth/login` and `/auth/register`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
	pub token: TokenSecret,
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	pub username: String,
	pub role: Role,
}
impl From<AuthResponse> for Session {
	fn from(value: AuthResponse) -> Self {
		Self {
			access_token: value.token,
			refresh_token: value.refresh_token,
			user: Some(UserProfile { username: value.username, role: value.role }),
		}
	}
}

/// Success body of `/auth/refresh`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshResponse {
	pub token: TokenSecret,
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
}
