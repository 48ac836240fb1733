//! Authenticated request dispatch with reactive refresh and retry-once semantics.

// self
use crate::{
	_prelude::*,
	flows::{ApiRequest, Gateway, common},
	http::{ApiTransport, HttpResponse},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

impl<C> Gateway<C>
where
	C: ?Sized + ApiTransport,
{
	/// Performs an authenticated call and returns the decoded JSON body.
	///
	/// A 401 on a non-auth endpoint triggers one silent refresh (shared with every other
	/// request that hit a 401 under the same token) and one retry. A refresh that cannot
	/// succeed tears the session down and fails with [`Error::SessionExpired`].
	pub async fn authenticated_request(&self, request: ApiRequest) -> Result<Value> {
		self.request_json(request).await
	}

	/// Typed variant of [`Gateway::authenticated_request`].
	pub async fn request_json<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		const KIND: OpKind = OpKind::Request;

		let span = OpSpan::new(KIND, "authenticated_request");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let response = self.dispatch(&request).await?;

				common::decode(&response)
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	async fn dispatch(&self, request: &ApiRequest) -> Result<HttpResponse> {
		let auth_endpoint = request.is_auth_endpoint();
		let credential = self.credential();
		let response = self.send(request, credential.as_ref().map(|(token, _)| token)).await?;

		if response.status != 401 || auth_endpoint {
			return common::ensure_success(response, auth_endpoint);
		}

		let Some((_, stamp)) = credential else {
			return Err(Error::SessionExpired);
		};
		let token = self.recover_from_unauthorized(stamp).await?;

		obs::trace_retry(request.method.as_str(), &request.path);

		// A second 401 is surfaced as-is; only one refresh per request.
		let retried = self.send(request, Some(&token)).await?;

		common::ensure_success(retried, false)
	}
}
