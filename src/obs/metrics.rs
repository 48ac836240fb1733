// self
use crate::obs::{OpKind, OpOutcome, TeardownReason};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"bank_gateway_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records a session teardown via the global metrics recorder (when enabled).
pub fn record_teardown(reason: TeardownReason) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("bank_gateway_session_teardown_total", "reason" => reason.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = reason;
	}
}
