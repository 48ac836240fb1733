//! Typed banking resources served through the authenticated request path.

pub mod account;
pub mod transaction;

pub use account::*;
pub use transaction::*;

// self
use crate::{
	_prelude::*,
	flows::{ApiRequest, Gateway},
	http::ApiTransport,
};

const ACCOUNTS_PATH: &str = "/accounts";
const TRANSACTIONS_PATH: &str = "/transactions";
const FRAUD_ALERTS_PATH: &str = "/transactions/fraud/FLAGGED";

/// Identifier issued by the backend; numeric or opaque text depending on the resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
	/// Numeric identifier.
	Number(i64),
	/// Opaque string identifier.
	Text(String),
}
impl Display for ResourceId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			ResourceId::Number(n) => write!(f, "{n}"),
			ResourceId::Text(s) => f.write_str(s),
		}
	}
}
impl From<i64> for ResourceId {
	fn from(value: i64) -> Self {
		Self::Number(value)
	}
}
impl From<&str> for ResourceId {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl From<String> for ResourceId {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + ApiTransport,
{
	/// Lists the signed-in user's accounts.
	pub async fn accounts(&self) -> Result<Vec<Account>> {
		self.request_json(ApiRequest::get(ACCOUNTS_PATH)).await
	}

	/// Opens a new account.
	pub async fn create_account(&self, account: &NewAccount) -> Result<Account> {
		self.request_json(ApiRequest::post(ACCOUNTS_PATH).json(account)?).await
	}

	/// Fetches one page of transactions matching `query`.
	pub async fn transactions(&self, query: &TransactionQuery) -> Result<TransactionPage> {
		let request = query
			.to_pairs()
			.into_iter()
			.fold(ApiRequest::get(TRANSACTIONS_PATH), |request, (key, value)| {
				request.query(key, value)
			});

		self.request_json(request).await
	}

	/// Submits a new transaction.
	pub async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction> {
		self.request_json(ApiRequest::post(TRANSACTIONS_PATH).json(transaction)?).await
	}

	/// Lists transactions flagged by fraud detection.
	pub async fn fraud_alerts(&self) -> Result<Vec<Transaction>> {
		self.request_json(ApiRequest::get(FRAUD_ALERTS_PATH)).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn resource_ids_accept_numbers_and_text() {
		let ids: Vec<ResourceId> =
			serde_json::from_str(r#"[7, "chk-1234"]"#).expect("Mixed ids should decode.");

		assert_eq!(ids, vec![ResourceId::from(7), ResourceId::from("chk-1234")]);
		assert_eq!(ids[0].to_string(), "7");
		assert_eq!(ids[1].to_string(), "chk-1234");
		assert_eq!(serde_json::to_string(&ids).expect("Ids should encode."), r#"[7,"chk-1234"]"#);
	}
}
