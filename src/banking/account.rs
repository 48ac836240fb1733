//! Account resources.

// self
use crate::{_prelude::*, banking::ResourceId};

/// Account as returned by `/accounts`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
	/// Backend identifier.
	pub id: ResourceId,
	/// Full account number, when disclosed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub account_number: Option<String>,
	/// Account type, e.g. `Checking` or `Savings`.
	#[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
	pub account_type: Option<String>,
	/// User-chosen label.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nickname: Option<String>,
	/// Last four digits for display.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last4: Option<String>,
	/// Current balance, display only.
	#[serde(default)]
	pub balance: f64,
	/// ISO currency code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
	/// Fields not modeled above.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}
impl Account {
	/// Last four digits, taken from `last4` or the tail of the account number.
	pub fn masked_suffix(&self) -> Option<&str> {
		self.last4.as_deref().or_else(|| {
			self.account_number.as_deref().map(|number| {
				let start = number.char_indices().rev().nth(3).map_or(0, |(i, _)| i);

				&number[start..]
			})
		})
	}
}

/// Payload for `POST /accounts`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
	/// Account type to open.
	pub account_type: String,
	/// Optional display label.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub nickname: Option<String>,
	/// Optional opening deposit.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub initial_deposit: Option<f64>,
}
impl NewAccount {
	/// Creates a payload for `account_type` with no label or deposit.
	pub fn new(account_type: impl Into<String>) -> Self {
		Self { account_type: account_type.into(), nickname: None, initial_deposit: None }
	}
}
