//! User-facing message extraction and refinement for backend error payloads.
//!
//! The backend emits free-text messages only (no machine-readable error kinds), so the
//! refinements here are best-effort string matching. Anything that does not match is
//! passed through unchanged.

// std
use std::sync::LazyLock;
// crates.io
use regex::Regex;
// self
use crate::_prelude::*;

const INSUFFICIENT_FUNDS: &str = "You don't have enough funds in your account for this transaction. Please check your balance and try again.";
const ACCOUNT_NOT_FOUND: &str =
	"The account you're trying to use doesn't exist. Please refresh the page and try again.";

/// Generic permission message used for HTTP 403.
pub const FORBIDDEN: &str = "You don't have permission to perform this action.";
/// Generic message used for HTTP 404.
pub const NOT_FOUND: &str = "The resource you're looking for doesn't exist.";

static BALANCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"Current balance: \$?([\d,]+\.?\d*), Required: \$?([\d,]+\.?\d*)")
		.expect("Balance pattern must compile.")
});
static VALIDATION_PATTERN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)validation").expect("Validation pattern must compile."));

/// Decoded error body: `{error?, message?, errors?: {field: message}}`.
///
/// Decoding is lenient: a body that is not JSON, or fields of the wrong type, simply
/// leave the corresponding value empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorBody {
	/// Short error label.
	pub error: Option<String>,
	/// Human-readable message; preferred over `error`.
	pub message: Option<String>,
	/// Field-level validation messages.
	pub errors: Option<BTreeMap<String, String>>,
}
impl ErrorBody {
	/// Decodes a raw response body.
	pub fn parse(body: &[u8]) -> Self {
		let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) else {
			return Self::default();
		};
		let text = |key: &str| {
			map.get(key).and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty()).map(
				str::to_owned,
			)
		};
		let errors = map.get("errors").and_then(Value::as_object).map(|fields| {
			fields
				.iter()
				.map(|(field, value)| {
					let message = match value {
						Value::String(s) => s.clone(),
						other => other.to_string(),
					};

					(field.clone(), message)
				})
				.collect()
		});

		Self { error: text("error"), message: text("message"), errors }
	}

	/// Picks `message`, then `error`.
	pub fn text(&self) -> Option<&str> {
		self.message.as_deref().or(self.error.as_deref())
	}

	/// Picks `message`, then `error`, then `HTTP <status>: <reason>`.
	pub fn text_or_status(&self, status: u16, reason: &str) -> String {
		self.text().map(str::to_owned).unwrap_or_else(|| status_line(status, reason))
	}

	/// Joins field messages with `", "`; `None` when no `errors` map was sent.
	pub fn joined_field_errors(&self) -> Option<String> {
		self.errors.as_ref().map(|fields| {
			let joined = fields.values().map(String::as_str).collect::<Vec<_>>().join(", ");

			if joined.is_empty() { "Validation failed".into() } else { joined }
		})
	}
}

/// Synthesized fallback line: `HTTP 503: Service Unavailable`.
pub fn status_line(status: u16, reason: &str) -> String {
	format!("HTTP {status}: {reason}")
}

/// Rewrites known server phrasings into friendlier text; `None` when nothing matched.
pub fn refine(message: &str) -> Option<String> {
	if message.contains("Insufficient funds") {
		return Some(insufficient_funds(message));
	}
	if VALIDATION_PATTERN.is_match(message) {
		return Some(VALIDATION_PATTERN.replace_all(message, "Please check your input").into_owned());
	}

	let lower = message.to_lowercase();

	if message.contains("Account not found")
		|| (lower.contains("account") && lower.contains("not found"))
	{
		return Some(ACCOUNT_NOT_FOUND.into());
	}

	None
}

fn insufficient_funds(message: &str) -> String {
	let amounts = BALANCE_PATTERN.captures(message).and_then(|caps| {
		Some((parse_amount(caps.get(1)?.as_str())?, parse_amount(caps.get(2)?.as_str())?))
	});

	match amounts {
		Some((balance, required)) => format!(
			"You don't have enough funds for this transaction. Your current balance is ${balance:.2}, but you need ${required:.2}. You're short by ${:.2}.",
			required - balance
		),
		None => INSUFFICIENT_FUNDS.into(),
	}
}

fn parse_amount(raw: &str) -> Option<f64> {
	raw.replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn message_preferred_over_error() {
		let body = ErrorBody::parse(br#"{"error":"Bad Request","message":"Amount must be positive"}"#);

		assert_eq!(body.text(), Some("Amount must be positive"));

		let body = ErrorBody::parse(br#"{"error":"Bad Request","message":""}"#);

		assert_eq!(body.text(), Some("Bad Request"));
	}

	#[test]
	fn empty_or_malformed_body_falls_back_to_status_line() {
		let bodies: [&[u8]; 4] = [b"{}", b"", b"<html>oops</html>", b"[1,2]"];

		for raw in bodies {
			let body = ErrorBody::parse(raw);

			assert_eq!(
				body.text_or_status(503, "Service Unavailable"),
				"HTTP 503: Service Unavailable"
			);
		}
	}

	#[test]
	fn field_errors_are_joined() {
		let body =
			ErrorBody::parse(br#"{"errors":{"email":"invalid","password":"too short"}}"#);
		let joined = body.joined_field_errors().expect("Field errors should be present.");

		assert!(joined.contains("invalid"));
		assert!(joined.contains("too short"));
		assert_eq!(
			ErrorBody::parse(br#"{"errors":{}}"#).joined_field_errors(),
			Some("Validation failed".into())
		);
		assert_eq!(ErrorBody::parse(b"{}").joined_field_errors(), None);
	}

	#[test]
	fn insufficient_funds_reports_shortfall() {
		let refined = refine("Insufficient funds. Current balance: $1,200.50, Required: $1,500")
			.expect("Insufficient funds messages should be refined.");

		assert_eq!(
			refined,
			"You don't have enough funds for this transaction. Your current balance is $1200.50, but you need $1500.00. You're short by $299.50."
		);
		assert_eq!(refine("Insufficient funds").as_deref(), Some(INSUFFICIENT_FUNDS));
	}

	#[test]
	fn other_refinements() {
		assert_eq!(
			refine("Validation failed for amount").as_deref(),
			Some("Please check your input failed for amount")
		);
		assert_eq!(refine("Account not found: 42").as_deref(), Some(ACCOUNT_NOT_FOUND));
		assert_eq!(refine("Destination account was not found").as_deref(), Some(ACCOUNT_NOT_FOUND));
		assert_eq!(refine("Daily limit exceeded"), None);
	}
}
