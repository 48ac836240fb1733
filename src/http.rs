//! Transport primitives for backend calls.
//!
//! The module exposes [`ApiTransport`] alongside the owned [`HttpRequest`] and
//! [`HttpResponse`] values so downstream crates can plug in custom HTTP stacks (or
//! scripted fakes in tests) without touching the gateway's session logic. The gateway
//! builds every request itself, including the bearer header, so transports stay dumb:
//! send bytes, return status + body.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::_prelude::*;

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a, E> = Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing backend requests.
///
/// The trait acts as the gateway's only dependency on an HTTP stack. Implementations
/// must be `Send + Sync + 'static` so one transport can be shared by cloned gateways and
/// by the proactive refresh task. A transport returns `Err` only when no response was
/// received at all; every HTTP status (including 401 and 5xx) is an `Ok` response.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves once the full response body has been read.
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError>;
}

/// HTTP methods used by the backend contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `PATCH`.
	Patch,
	/// `DELETE`.
	Delete,
}
impl Method {
	/// Returns the method token as sent on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved request handed to a transport.
#[derive(Clone, Debug)]
pub struct HttpRequest {
	/// Request method.
	pub method: Method,
	/// Absolute target URL, query included.
	pub url: Url,
	/// Header name/value pairs.
	pub headers: Vec<(String, String)>,
	/// Serialized body, if any.
	pub body: Option<Vec<u8>>,
}
impl HttpRequest {
	/// Returns the first header value matching `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
	}
}

/// Response returned by a transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Reason phrase (`statusText`), when known.
	pub reason: Option<String>,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response with the given status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, reason: None, body: body.into() }
	}

	/// Attaches a reason phrase.
	pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
		self.reason = Some(reason.into());

		self
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Reason phrase, or an empty string when the transport did not supply one.
	pub fn reason(&self) -> &str {
		self.reason.as_deref().unwrap_or_default()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
				Method::Put => reqwest::Method::PUT,
				Method::Patch => reqwest::Method::PATCH,
				Method::Delete => reqwest::Method::DELETE,
			};
			let mut builder = client.request(method, request.url);

			for (name, value) in request.headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse {
				status: status.as_u16(),
				reason: status.canonical_reason().map(str::to_owned),
				body,
			})
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn header_lookup_ignores_case() {
		let request = HttpRequest {
			method: Method::Get,
			url: Url::parse("http://localhost/api/accounts").expect("Fixture URL should parse."),
			headers: vec![("Authorization".into(), "Bearer T1".into())],
			body: None,
		};

		assert_eq!(request.header("authorization"), Some("Bearer T1"));
		assert_eq!(request.header("content-type"), None);
	}

	#[test]
	fn response_helpers_report_status() {
		let ok = HttpResponse::new(204, Vec::new());
		let unavailable = HttpResponse::new(503, "{}").with_reason("Service Unavailable");

		assert!(ok.is_success());
		assert_eq!(ok.reason(), "");
		assert!(!unavailable.is_success());
		assert_eq!(unavailable.reason(), "Service Unavailable");
	}
}
