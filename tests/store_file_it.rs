#![cfg(all(feature = "reqwest", feature = "test"))]

// std
use std::{
	env, fs,
	path::{Path, PathBuf},
	process,
};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use securebank_gateway::{
	_preludet::*,
	auth::{Role, UserProfile},
	flows::Gateway,
	http::ReqwestTransport,
	store::{FileStore, SessionStore},
};

fn scratch_path(name: &str) -> PathBuf {
	let path = env::temp_dir()
		.join(format!("securebank-gateway-it-{}-{name}", process::id()))
		.join("session.json");
	let _ = fs::remove_file(&path);

	path
}

fn gateway_on(path: &Path, base_url: &str) -> Gateway<ReqwestTransport> {
	let store: Arc<dyn SessionStore> =
		Arc::new(FileStore::open(path).expect("Opening the file store should succeed."));

	Gateway::with_transport(test_config(base_url), store, ReqwestTransport::default())
}

#[tokio::test]
async fn session_survives_restart_until_logout() {
	let server = MockServer::start_async().await;
	let path = scratch_path("restart");

	server
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

	let first = gateway_on(&path, &server.base_url());

	first.login("alice", "correct-horse").await.expect("Login should succeed.");

	drop(first);

	let second = gateway_on(&path, &server.base_url());
	let restored = second
		.restore()
		.expect("Restoring from disk should succeed.")
		.expect("A persisted session should be found.");

	assert_eq!(restored.access_token.expose(), "T1");
	assert_eq!(restored.refresh_token.as_ref().map(|token| token.expose()), Some("R1"));
	assert_eq!(second.current_user(), Some(UserProfile::new("alice", Role::Customer)));

	second.logout().expect("Logout should succeed.");

	let third = gateway_on(&path, &server.base_url());

	assert!(third.restore().expect("Restoring an empty store should succeed.").is_none());
	assert!(!third.is_authenticated());

	let _ = fs::remove_file(&path);
}
