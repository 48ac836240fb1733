// self
use crate::{
	_prelude::*,
	obs::{OpKind, TeardownReason},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span builder used by gateway operations.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("bank_gateway.op", op = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a session-teardown event (when tracing is enabled).
pub fn trace_teardown(reason: TeardownReason) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(reason = reason.as_str(), "session torn down");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = reason;
	}
}

/// Emits a retry event after a successful refresh (when tracing is enabled).
pub fn trace_retry(method: &str, path: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(method, path, "retrying request with refreshed access token");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, path);
	}
}

/// Emits a warning when a scheduled refresh failed without ending the session.
pub fn trace_proactive_failure(error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(error = %error, "proactive refresh failed; will retry on next tick");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn op_span_noop_without_tracing() {
		let span = OpSpan::new(OpKind::Request, "test");

		trace_teardown(TeardownReason::Logout);
		trace_retry("GET", "/accounts");
		trace_proactive_failure(&Error::SessionExpired);

		let _ = span;
	}

	#[cfg(feature = "tracing")]
	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OpSpan::new(OpKind::Refresh, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
