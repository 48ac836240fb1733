#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
use time::macros::date;
// self
use securebank_gateway::{
	_preludet::*,
	banking::{NewAccount, NewTransaction, ResourceId, TransactionQuery},
};

async fn signed_in(server: &MockServer) -> ReqwestTestGateway {
	let (gateway, _store) = build_reqwest_test_gateway(&server.base_url());
	let mut login = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(200).json_body(json!({
				"token": "T1",
				"refreshToken": "R1",
				"username": "alice",
				"role": "CUSTOMER",
			}));
		})
		.await;

	gateway.login("alice", "correct-horse").await.expect("Fixture login should succeed.");
	login.delete_async().await;

	gateway
}

#[tokio::test]
async fn accounts_are_listed_and_created() {
	let server = MockServer::start_async().await;
	let gateway = signed_in(&server).await;
	let list = server
		.mock_async(|when, then| {
			when.method(GET).path("/accounts").header("authorization", "Bearer T1");
			then.status(200).json_body(json!([
				{ "id": "chk-1234", "type": "Checking", "last4": "1234", "nickname": "Everyday Spend", "balance": 2845.71 },
				{ "id": "svg-9876", "type": "Savings", "last4": "9876", "balance": 9200.0 },
			]));
		})
		.await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/accounts").json_body(json!({
				"accountType": "Savings",
				"nickname": "Rainy Day",
				"initialDeposit": 100.0,
			}));
			then.status(201).json_body(json!({
				"id": 77,
				"accountType": "Savings",
				"accountNumber": "9000000077",
				"nickname": "Rainy Day",
				"balance": 100.0,
			}));
		})
		.await;
	let accounts = gateway.accounts().await.expect("Listing accounts should succeed.");

	list.assert_async().await;

	assert_eq!(accounts.len(), 2);
	assert_eq!(accounts[0].account_type.as_deref(), Some("Checking"));
	assert_eq!(accounts[1].masked_suffix(), Some("9876"));

	let created = gateway
		.create_account(&NewAccount {
			nickname: Some("Rainy Day".into()),
			initial_deposit: Some(100.0),
			..NewAccount::new("Savings")
		})
		.await
		.expect("Creating an account should succeed.");

	create.assert_async().await;

	assert_eq!(created.id, ResourceId::from(77));
	assert_eq!(created.masked_suffix(), Some("0077"));
}

#[tokio::test]
async fn transactions_forward_filters_and_accept_pages() {
	let server = MockServer::start_async().await;
	let gateway = signed_in(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/transactions")
				.query_param("page", "1")
				.query_param("size", "5")
				.query_param("startDate", "2025-10-01")
				.query_param("endDate", "2025-10-31")
				.query_param("accountId", "chk-1234")
				.query_param_missing("type");
			then.status(200).json_body(json!({
				"content": [
					{ "id": 6, "accountId": "chk-1234", "amount": -5.25, "description": "Coffee Shop", "date": "2025-10-12" },
				],
				"totalElements": 6,
				"totalPages": 2,
			}));
		})
		.await;
	let page = gateway
		.transactions(&TransactionQuery {
			page: 1,
			size: 5,
			start_date: Some(date!(2025 - 10 - 01)),
			end_date: Some(date!(2025 - 10 - 31)),
			account_id: Some(ResourceId::from("chk-1234")),
			..Default::default()
		})
		.await
		.expect("Listing transactions should succeed.");

	mock.assert_async().await;

	assert_eq!(page.total_elements(), 6);
	assert_eq!(page.total_pages(), 2);
	assert_eq!(page.transactions()[0].description.as_deref(), Some("Coffee Shop"));
	assert!(!page.transactions()[0].is_credit());
}

#[tokio::test]
async fn transactions_accept_bare_lists() {
	let server = MockServer::start_async().await;
	let gateway = signed_in(&server).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/transactions").query_param("page", "0").query_param("size", "20");
			then.status(200).json_body(json!([
				{ "id": 1, "amount": 3200.0, "type": "DEPOSIT" },
				{ "id": 2, "amount": -89.99, "type": "PAYMENT" },
			]));
		})
		.await;

	let page = gateway
		.transactions(&TransactionQuery::default())
		.await
		.expect("Listing transactions should succeed.");

	assert_eq!(page.total_elements(), 2);
	assert_eq!(page.total_pages(), 1);
}

#[tokio::test]
async fn transactions_and_fraud_alerts() {
	let server = MockServer::start_async().await;
	let gateway = signed_in(&server).await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/transactions").json_body(json!({
				"accountId": 1,
				"amount": 250.0,
				"type": "TRANSFER",
				"description": "Rent",
				"targetAccountId": 2,
			}));
			then.status(201).json_body(json!({
				"id": 900,
				"accountId": 1,
				"amount": -250.0,
				"type": "TRANSFER",
				"status": "PENDING",
				"riskScore": 0.12,
			}));
		})
		.await;
	let fraud = server
		.mock_async(|when, then| {
			when.method(GET).path("/transactions/fraud/FLAGGED");
			then.status(200).json_body(json!([
				{ "id": 13, "amount": -4999.0, "status": "FLAGGED", "description": "Wire transfer" },
			]));
		})
		.await;
	let created = gateway
		.create_transaction(&NewTransaction {
			account_id: ResourceId::from(1),
			amount: 250.0,
			kind: "TRANSFER".into(),
			description: Some("Rent".into()),
			target_account_id: Some(ResourceId::from(2)),
		})
		.await
		.expect("Creating a transaction should succeed.");

	create.assert_async().await;

	assert_eq!(created.status.as_deref(), Some("PENDING"));
	assert_eq!(created.extra.get("riskScore"), Some(&json!(0.12)));

	let alerts = gateway.fraud_alerts().await.expect("Listing fraud alerts should succeed.");

	fraud.assert_async().await;

	assert_eq!(alerts.len(), 1);
	assert_eq!(alerts[0].status.as_deref(), Some("FLAGGED"));
}
