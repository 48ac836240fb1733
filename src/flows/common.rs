//! Shared helpers for gateway flows (request descriptors, dispatch, error classification).

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, TransportError},
	flows::Gateway,
	http::{ApiTransport, HttpRequest, HttpResponse, Method},
	message::{self, ErrorBody},
};

pub(crate) const LOGIN_PATH: &str = "/auth/login";
pub(crate) const REGISTER_PATH: &str = "/auth/register";
pub(crate) const REFRESH_PATH: &str = "/auth/refresh";

/// Transient description of one backend call.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
	/// Request method.
	pub method: Method,
	/// Path relative to the API root, e.g. `/accounts`.
	pub path: String,
	/// Query parameters appended in order.
	pub query: Vec<(String, String)>,
	/// JSON body, if any.
	pub body: Option<Value>,
	/// Extra headers sent alongside the gateway's own.
	pub headers: Vec<(String, String)>,
}
impl ApiRequest {
	/// Creates a request for `method` + `path`.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), query: Vec::new(), body: None, headers: Vec::new() }
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// Serializes `body` as the JSON payload.
	pub fn json<T>(mut self, body: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_value(body)?);

		Ok(self)
	}

	/// Appends a query parameter.
	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Appends a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Login, registration, and refresh calls never trigger token recovery.
	pub fn is_auth_endpoint(&self) -> bool {
		self.path.trim_start_matches('/').starts_with("auth/")
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + ApiTransport,
{
	/// Resolves `request` against the API root and sends it, attaching `bearer` if given.
	pub(crate) async fn send(
		&self,
		request: &ApiRequest,
		bearer: Option<&TokenSecret>,
	) -> Result<HttpResponse> {
		let mut url = self.config.endpoint(&request.path)?;

		if !request.query.is_empty() {
			url.query_pairs_mut().extend_pairs(&request.query);
		}

		let mut headers = vec![
			("Content-Type".to_owned(), "application/json".to_owned()),
			("Accept".to_owned(), "application/json".to_owned()),
		];

		headers.extend(
			request
				.headers
				.iter()
				.filter(|(name, _)| !name.eq_ignore_ascii_case("authorization"))
				.cloned(),
		);

		if let Some(token) = bearer {
			headers.push(("Authorization".to_owned(), token.bearer()));
		}

		let body = request
			.body
			.as_ref()
			.map(serde_json::to_vec)
			.transpose()
			.map_err(ConfigError::from)?;
		let http_request = HttpRequest { method: request.method, url, headers, body };

		self.transport.execute(http_request).await.map_err(|e| TransportError::network(e).into())
	}
}

/// Passes 2xx responses through and classifies everything else.
pub(crate) fn ensure_success(response: HttpResponse, auth_endpoint: bool) -> Result<HttpResponse> {
	if response.is_success() { Ok(response) } else { Err(classify(&response, auth_endpoint)) }
}

/// Maps a non-2xx response onto the error taxonomy.
pub(crate) fn classify(response: &HttpResponse, auth_endpoint: bool) -> Error {
	let status = response.status;
	let text = ErrorBody::parse(&response.body).text_or_status(status, response.reason());

	match status {
		401 if auth_endpoint => Error::InvalidCredentials { message: text },
		401 => Error::SessionExpired,
		403 => Error::Forbidden { message: message::FORBIDDEN.into() },
		404 => Error::NotFound {
			message: message::refine(&text).unwrap_or_else(|| message::NOT_FOUND.into()),
		},
		s if s >= 500 => Error::Server { status, detail: text },
		_ => Error::Rejected { status, message: message::refine(&text).unwrap_or(text) },
	}
}

/// Maps a failed login/registration response; `fallback` replaces an empty body.
pub(crate) fn credential_failure(response: &HttpResponse, fallback: &str) -> Error {
	let body = ErrorBody::parse(&response.body);

	if response.status >= 500 {
		return Error::Server {
			status: response.status,
			detail: body.text_or_status(response.status, response.reason()),
		};
	}

	Error::InvalidCredentials { message: body.text().unwrap_or(fallback).to_owned() }
}

/// Decodes a 2xx body; an empty body decodes as JSON `null`.
pub(crate) fn decode<T>(response: &HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
		b"null"
	} else {
		&response.body
	};
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::MalformedResponse { status: response.status, source })
}
