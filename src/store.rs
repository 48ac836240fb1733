//! Key-value persistence for the three session entries and the built-in backends.
//!
//! The contract is deliberately synchronous: the gateway mutates its in-memory session
//! and the persisted copy without a suspension point in between, so concurrent requests
//! never observe one without the other.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::_prelude::*;

/// Storage backend contract implemented by session stores.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Returns the value stored under `key`, if present.
	fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError>;

	/// Persists or replaces the value under `key`.
	fn set(&self, key: StoreKey, value: &str) -> Result<(), StoreError>;

	/// Removes `key`; removing a missing key is not an error.
	fn remove(&self, key: StoreKey) -> Result<(), StoreError>;
}

/// The persisted session entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StoreKey {
	/// Bearer access token.
	AccessToken,
	/// Refresh token.
	RefreshToken,
	/// Serialized [`UserProfile`](crate::auth::UserProfile) JSON.
	UserProfile,
}
impl StoreKey {
	/// Every key, in teardown order.
	pub const ALL: [StoreKey; 3] =
		[StoreKey::AccessToken, StoreKey::RefreshToken, StoreKey::UserProfile];

	/// Returns the storage key name.
	pub const fn as_str(self) -> &'static str {
		match self {
			StoreKey::AccessToken => "jwt_token",
			StoreKey::RefreshToken => "refresh_token",
			StoreKey::UserProfile => "user_info",
		}
	}
}
impl Display for StoreKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend or a stored value.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
