//! Session and request gateway for the SecureBank client: bearer tokens, singleflight
//! refresh with retry-once semantics, persisted sessions, and typed banking resources.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod banking;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod message;
pub mod obs;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::GatewayConfig,
		flows::Gateway,
		http::ReqwestTransport,
		store::{MemoryStore, SessionStore},
	};

	/// Gateway type alias used by reqwest-backed integration tests.
	pub type ReqwestTestGateway = Gateway<ReqwestTransport>;

	/// Builds a gateway config rooted at `base_url` (typically an `httpmock` server URL).
	pub fn test_config(base_url: &str) -> GatewayConfig {
		GatewayConfig::builder()
			.base_url(base_url)
			.build()
			.expect("Failed to build gateway config for tests.")
	}

	/// Constructs a [`Gateway`] backed by an in-memory store and the reqwest transport
	/// used across integration tests.
	pub fn build_reqwest_test_gateway(base_url: &str) -> (ReqwestTestGateway, Arc<MemoryStore>) {
		build_reqwest_test_gateway_with(test_config(base_url))
	}

	/// Same as [`build_reqwest_test_gateway`] with a caller-provided config.
	pub fn build_reqwest_test_gateway_with(
		config: GatewayConfig,
	) -> (ReqwestTestGateway, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn SessionStore> = store_backend.clone();
		let gateway = Gateway::with_transport(config, store, ReqwestTransport::default());

		(gateway, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
