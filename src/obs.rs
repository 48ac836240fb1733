//! Optional observability helpers for gateway operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `bank_gateway.op` with the `op` and
//!   `stage` (call site) fields, plus events for session teardown.
//! - Enable `metrics` to increment the `bank_gateway_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Gateway operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Password login.
	Login,
	/// Account registration.
	Register,
	/// Access-token refresh (reactive or proactive).
	Refresh,
	/// Authenticated backend request.
	Request,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::Login => "login",
			OpKind::Register => "register",
			OpKind::Refresh => "refresh",
			OpKind::Request => "request",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to a gateway operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Why a session was torn down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TeardownReason {
	/// Explicit logout.
	Logout,
	/// No refresh token was available to recover from a 401.
	MissingRefreshToken,
	/// The refresh endpoint rejected the refresh token.
	RefreshRejected,
}
impl TeardownReason {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TeardownReason::Logout => "logout",
			TeardownReason::MissingRefreshToken => "missing_refresh_token",
			TeardownReason::RefreshRejected => "refresh_rejected",
		}
	}
}
