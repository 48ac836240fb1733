//! Gateway-level error types shared across flows, resources, and stores.
//!
//! Every variant renders a human-readable English message through [`Display`], so
//! callers above the gateway only ever show the message and never inspect status
//! codes themselves.

// self
use crate::_prelude::*;

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS); no response was received.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Login or registration rejected by the server for bad input.
	#[error("{message}")]
	InvalidCredentials {
		/// Server-supplied message, or a generic fallback.
		message: String,
	},
	/// Registration rejected with per-field messages.
	#[error("{message}")]
	Validation {
		/// Field messages joined into one string.
		message: String,
		/// Raw field-to-message map returned by the server.
		fields: BTreeMap<String, String>,
	},
	/// Access token missing or rejected and not recoverable through a refresh.
	#[error("Your session has expired. Please login again.")]
	SessionExpired,
	/// Authenticated but not authorized (HTTP 403).
	#[error("{message}")]
	Forbidden {
		/// Permission message surfaced to the user.
		message: String,
	},
	/// Resource does not exist (HTTP 404).
	#[error("{message}")]
	NotFound {
		/// Not-found message surfaced to the user.
		message: String,
	},
	/// Upstream failure (HTTP 5xx); callers may retry later.
	#[error(
		"Something went wrong on our end ({detail}). Please try again in a moment. If the problem persists, contact support."
	)]
	Server {
		/// HTTP status code.
		status: u16,
		/// Message extracted from the error body or the synthesized `HTTP <status>` line.
		detail: String,
	},
	/// Any other non-2xx response.
	#[error("{message}")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Refined server message.
		message: String,
	},
	/// Successful response whose body could not be decoded.
	#[error("The server returned an unexpected response.")]
	MalformedResponse {
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Returns the HTTP status carried by the error, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Server { status, .. }
			| Self::Rejected { status, .. }
			| Self::MalformedResponse { status, .. } => Some(*status),
			Self::Forbidden { .. } => Some(403),
			Self::NotFound { .. } => Some(404),
			_ => None,
		}
	}

	/// Returns `true` when the caller should prompt for a new login.
	///
	/// The session is usually gone by then, but a 401 on the retried request leaves the
	/// freshly refreshed session in place; check [`Gateway::is_authenticated`] for the
	/// actual state.
	///
	/// [`Gateway::is_authenticated`]: crate::flows::Gateway::is_authenticated
	pub fn is_session_expired(&self) -> bool {
		matches!(self, Self::SessionExpired)
	}
}

/// Configuration and validation failures raised by the gateway.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL `{value}` is invalid.")]
	InvalidBaseUrl {
		/// Raw value that failed to parse.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL cannot carry paths (e.g. `mailto:` or `data:` URLs).
	#[error("Base URL `{value}` cannot be used as an API root.")]
	UnsupportedBaseUrl {
		/// Offending URL.
		value: String,
	},
	/// A request path could not be joined onto the base URL.
	#[error("Request path `{path}` is invalid.")]
	InvalidPath {
		/// Path that failed to join.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Body(#[from] serde_json::Error),
	/// Proactive refresh interval must be positive.
	#[error("The proactive refresh interval must be positive.")]
	NonPositiveRefreshInterval,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Unable to reach the server. Please check your connection and try again.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("Unable to reach the server. Please check your connection and try again.")]
	Io(#[from] std::io::Error),
	/// A refresh started by a concurrent request could not reach the server; the
	/// outcome was shared instead of calling the refresh endpoint again.
	#[error("Unable to reach the server. Please check your connection and try again.")]
	RefreshUnreachable,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
