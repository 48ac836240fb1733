//! Transaction resources, filters, and paginated listings.

// crates.io
use time::Date;
// self
use crate::{_prelude::*, banking::ResourceId};

/// Transaction as returned by `/transactions` and the fraud listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
	/// Backend identifier.
	pub id: ResourceId,
	/// Owning account.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub account_id: Option<ResourceId>,
	/// Signed amount; negative for debits.
	pub amount: f64,
	/// Transaction type, e.g. `DEPOSIT` or `TRANSFER`.
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// Free-text description.
	#[serde(default, alias = "desc", skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Booking date or timestamp, as sent by the backend.
	#[serde(default, alias = "timestamp", skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
	/// Processing or fraud-review status.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	/// Fields not modeled above.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}
impl Transaction {
	/// Returns `true` for money coming in.
	pub fn is_credit(&self) -> bool {
		self.amount >= 0.0
	}
}

/// Payload for `POST /transactions`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
	/// Source account.
	pub account_id: ResourceId,
	/// Amount to move.
	pub amount: f64,
	/// Transaction type.
	#[serde(rename = "type")]
	pub kind: String,
	/// Optional description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Destination account for transfers.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub target_account_id: Option<ResourceId>,
}

/// Filters and pagination for `GET /transactions`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionQuery {
	/// Zero-based page index.
	pub page: u32,
	/// Page size.
	pub size: u32,
	/// Inclusive lower date bound.
	pub start_date: Option<Date>,
	/// Inclusive upper date bound.
	pub end_date: Option<Date>,
	/// Transaction type filter.
	pub kind: Option<String>,
	/// Restricts results to one account.
	pub account_id: Option<ResourceId>,
}
impl TransactionQuery {
	/// Default page size.
	pub const DEFAULT_SIZE: u32 = 20;

	/// Query string pairs in wire order; unset filters are omitted.
	pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];

		if let Some(date) = self.start_date {
			pairs.push(("startDate", date.to_string()));
		}
		if let Some(date) = self.end_date {
			pairs.push(("endDate", date.to_string()));
		}
		if let Some(kind) = &self.kind {
			pairs.push(("type", kind.clone()));
		}
		if let Some(id) = &self.account_id {
			pairs.push(("accountId", id.to_string()));
		}

		pairs
	}
}
impl Default for TransactionQuery {
	fn default() -> Self {
		Self {
			page: 0,
			size: Self::DEFAULT_SIZE,
			start_date: None,
			end_date: None,
			kind: None,
			account_id: None,
		}
	}
}

/// Transaction listing; the backend answers with either a bare array or a page object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionPage {
	/// Paginated envelope.
	Paged {
		/// Transactions on this page.
		content: Vec<Transaction>,
		/// Total matches across all pages.
		#[serde(default, rename = "totalElements")]
		total_elements: Option<u64>,
		/// Number of pages.
		#[serde(default, rename = "totalPages")]
		total_pages: Option<u32>,
	},
	/// Unpaginated list.
	List(Vec<Transaction>),
}
impl TransactionPage {
	/// Transactions carried by this response.
	pub fn transactions(&self) -> &[Transaction] {
		match self {
			TransactionPage::Paged { content, .. } => content,
			TransactionPage::List(items) => items,
		}
	}

	/// Total matches; the item count when the backend sent no total.
	pub fn total_elements(&self) -> u64 {
		match self {
			TransactionPage::Paged { total_elements: Some(total), .. } => *total,
			_ => self.transactions().len() as u64,
		}
	}

	/// Number of pages; a bare list counts as one page.
	pub fn total_pages(&self) -> u32 {
		match self {
			TransactionPage::Paged { total_pages: Some(pages), .. } => *pages,
			_ => 1,
		}
	}

	/// Consumes the page and returns its transactions.
	pub fn into_transactions(self) -> Vec<Transaction> {
		match self {
			TransactionPage::Paged { content, .. } => content,
			TransactionPage::List(items) => items,
		}
	}
}
