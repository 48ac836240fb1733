//! Gateway configuration: backend base URL and proactive refresh cadence.
//!
//! The base URL is the single external setting the gateway needs. It defaults to the
//! same-origin API root and can be overridden through [`GatewayConfig::ENV_BASE_URL`].

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Validated gateway configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
	base_url: Url,
	proactive_refresh_interval: Duration,
}
impl GatewayConfig {
	/// Environment variable holding an absolute backend URL.
	pub const ENV_BASE_URL: &'static str = "SECUREBANK_API_URL";
	/// Same-origin API root used when nothing else is configured.
	pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8080/api";
	/// One minute inside the backend's 15-minute access-token lifetime.
	pub const DEFAULT_PROACTIVE_REFRESH_INTERVAL: Duration = Duration::minutes(14);

	/// Creates a new builder seeded with defaults.
	pub fn builder() -> GatewayConfigBuilder {
		GatewayConfigBuilder::default()
	}

	/// Reads [`Self::ENV_BASE_URL`], falling back to [`Self::DEFAULT_BASE_URL`].
	pub fn from_env() -> Result<Self, ConfigError> {
		let mut builder = Self::builder();

		if let Some(value) = env::var(Self::ENV_BASE_URL).ok().filter(|v| !v.trim().is_empty()) {
			builder = builder.base_url(value.trim());
		}

		builder.build()
	}

	/// API root every request path is appended to.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Interval between silent refreshes while a session is active; always positive.
	pub fn proactive_refresh_interval(&self) -> Duration {
		self.proactive_refresh_interval
	}

	/// Joins a request path (e.g. `/accounts`) onto the API root.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let joined = format!(
			"{}/{}",
			self.base_url.as_str().trim_end_matches('/'),
			path.trim_start_matches('/')
		);

		Url::parse(&joined).map_err(|source| ConfigError::InvalidPath { path: path.into(), source })
	}
}
impl Default for GatewayConfig {
	fn default() -> Self {
		Self {
			base_url: normalize(
				Url::parse(Self::DEFAULT_BASE_URL).expect("Default base URL must parse."),
			),
			proactive_refresh_interval: Self::DEFAULT_PROACTIVE_REFRESH_INTERVAL,
		}
	}
}

/// Builder for [`GatewayConfig`] values.
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
	/// Raw base URL, parsed at build time.
	pub base_url: Option<String>,
	/// Override for the proactive refresh interval.
	pub proactive_refresh_interval: Option<Duration>,
}
impl GatewayConfigBuilder {
	/// Sets the API root.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());

		self
	}

	/// Overrides the proactive refresh interval (defaults to 14 minutes).
	pub fn proactive_refresh_interval(mut self, interval: Duration) -> Self {
		self.proactive_refresh_interval = Some(interval);

		self
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<GatewayConfig, ConfigError> {
		let defaults = GatewayConfig::default();
		let base_url = match self.base_url {
			Some(raw) => {
				let url = Url::parse(&raw)
					.map_err(|source| ConfigError::InvalidBaseUrl { value: raw.clone(), source })?;

				if url.cannot_be_a_base() {
					return Err(ConfigError::UnsupportedBaseUrl { value: raw });
				}

				normalize(url)
			},
			None => defaults.base_url,
		};
		let proactive_refresh_interval =
			self.proactive_refresh_interval.unwrap_or(defaults.proactive_refresh_interval);

		if !proactive_refresh_interval.is_positive() {
			return Err(ConfigError::NonPositiveRefreshInterval);
		}

		Ok(GatewayConfig { base_url, proactive_refresh_interval })
	}
}

fn normalize(mut url: Url) -> Url {
	let trimmed = url.path().trim_end_matches('/').to_owned();

	url.set_path(&trimmed);
	url.set_query(None);
	url.set_fragment(None);

	url
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_config_targets_same_origin_api_root() {
		let config = GatewayConfig::default();

		assert_eq!(config.base_url().as_str(), "http://localhost:8080/api");
		assert_eq!(config.proactive_refresh_interval(), Duration::minutes(14));
	}

	#[test]
	fn endpoint_keeps_base_path() {
		let config = GatewayConfig::builder()
			.base_url("https://bank.example.com/api/")
			.build()
			.expect("Config with trailing slash should build.");

		assert_eq!(
			config.endpoint("/accounts").expect("Endpoint should join.").as_str(),
			"https://bank.example.com/api/accounts"
		);
		assert_eq!(
			config.endpoint("transactions/fraud/FLAGGED").expect("Endpoint should join.").as_str(),
			"https://bank.example.com/api/transactions/fraud/FLAGGED"
		);
	}

	#[test]
	fn builder_rejects_bad_input() {
		let err = GatewayConfig::builder()
			.base_url("not a url")
			.build()
			.expect_err("Relative base URLs should be rejected.");

		assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));

		let err = GatewayConfig::builder()
			.base_url("mailto:ops@example.com")
			.build()
			.expect_err("Opaque URLs cannot act as an API root.");

		assert!(matches!(err, ConfigError::UnsupportedBaseUrl { .. }));

		let err = GatewayConfig::builder()
			.proactive_refresh_interval(Duration::ZERO)
			.build()
			.expect_err("Zero refresh interval should be rejected.");

		assert!(matches!(err, ConfigError::NonPositiveRefreshInterval));

		let err = GatewayConfig::builder()
			.proactive_refresh_interval(Duration::seconds(-5))
			.build()
			.expect_err("Negative refresh interval should be rejected.");

		assert!(matches!(err, ConfigError::NonPositiveRefreshInterval));
	}

	#[test]
	fn built_interval_is_always_positive() {
		let config = GatewayConfig::builder()
			.proactive_refresh_interval(Duration::milliseconds(1))
			.build()
			.expect("A one-millisecond interval should build.");

		assert!(config.proactive_refresh_interval().is_positive());
		assert!(!config.proactive_refresh_interval().unsigned_abs().is_zero());
		assert!(GatewayConfig::default().proactive_refresh_interval().is_positive());
	}
}
