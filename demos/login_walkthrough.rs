//! Walks through a login, an account listing that silently refreshes an expired access
//! token, and a logout against a mock SecureBank backend.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use securebank_gateway::{
	config::GatewayConfig,
	flows::Gateway,
	store::{MemoryStore, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/login");
			then.status(200).json_body(json!({
				"token": "demo-access-1",
				"refreshToken": "demo-refresh-1",
				"username": "alice",
				"role": "CUSTOMER",
			}));
		})
		.await;
	let expired_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/accounts").header("authorization", "Bearer demo-access-1");
			then.status(401);
		})
		.await;
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/refresh");
			then.status(200).json_body(json!({
				"token": "demo-access-2",
				"refreshToken": "demo-refresh-2",
			}));
		})
		.await;
	let accounts_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/accounts").header("authorization", "Bearer demo-access-2");
			then.status(200).json_body(json!([
				{ "id": "chk-1234", "type": "Checking", "last4": "1234", "balance": 2845.71 },
				{ "id": "svg-9876", "type": "Savings", "last4": "9876", "balance": 9200.0 },
			]));
		})
		.await;
	let config = GatewayConfig::builder().base_url(server.url("/api")).build()?;
	let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::default());
	let gateway = Gateway::new(config, store);
	let session = gateway.login("alice", "correct-horse").await?;

	println!(
		"Signed in as {}.",
		session.user.as_ref().map(|user| user.username.as_str()).unwrap_or("unknown")
	);

	for account in gateway.accounts().await? {
		println!(
			"{} •••• {}: ${:.2}",
			account.account_type.as_deref().unwrap_or("Account"),
			account.masked_suffix().unwrap_or("----"),
			account.balance
		);
	}

	println!("Refreshes performed: {}.", gateway.refresh_metrics.successes());

	gateway.logout()?;

	println!("Signed out; authenticated = {}.", gateway.is_authenticated());

	login_mock.assert_async().await;
	expired_mock.assert_async().await;
	refresh_mock.assert_async().await;
	accounts_mock.assert_async().await;

	Ok(())
}
