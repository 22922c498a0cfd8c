//! Signed outcome POSTs (`replaceResult`, `readResult`, `deleteResult`).
//!
//! Each call validates its input, renders the envelope, signs the POST with a fresh nonce and
//! timestamp, and performs exactly one transport call. Non-2xx statuses and unreadable
//! envelopes surface as [`ProtocolError`] with the raw status and body; nothing is retried.

// crates.io
use ::http::{
	Method,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::{ConsumerCredential, SourcedId},
	config::{BodySigning, LtiConfig},
	error::{ConfigError, ProtocolError},
	http::{HttpRequest, HttpResponse, OutcomeHttpClient},
	oauth1::{self, OAuthParams},
	obs::{self, LtiOperation, OperationOutcome, OperationSpan},
	outcome::{
		envelope::{self, OutcomeEnvelope, OutcomeOperation},
		record::{GradePassbackRecord, GradeReturn},
	},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Content type of every outcome POST.
pub const OUTCOME_CONTENT_TYPE: &str = "application/xml";

/// Result of one outcome POST that reached the provider and returned 2xx.
#[derive(Clone, Debug, PartialEq)]
pub struct OutcomeResult {
	/// HTTP status code.
	pub http_status: u16,
	/// Decoded envelope fields.
	pub envelope: OutcomeEnvelope,
	/// Raw response body.
	pub raw_body: String,
}
impl OutcomeResult {
	/// `imsx_codeMajor` as reported by the provider, when present.
	pub fn provider_status(&self) -> Option<&str> {
		self.envelope.code_major.as_ref().map(|code| code.as_str())
	}

	/// Returns `true` when the provider reported `success`.
	pub fn is_success(&self) -> bool {
		self.envelope.is_success()
	}
}

/// Signs and sends outcome requests for one consumer credential.
///
/// The credential and [`BodySigning`] mode are fixed at construction; the client holds no
/// other state and may be shared freely across tasks.
#[derive(Clone)]
pub struct OutcomeClient<C>
where
	C: ?Sized + OutcomeHttpClient,
{
	/// Credential used as HMAC key material.
	pub credential: ConsumerCredential,
	/// How the XML body participates in the signature.
	pub body_signing: BodySigning,
	/// Transport used for every POST.
	pub http_client: Arc<C>,
}
impl<C> OutcomeClient<C>
where
	C: ?Sized + OutcomeHttpClient,
{
	/// Creates a client over the caller-provided transport, using [`BodySigning::BodyHash`].
	pub fn with_http_client(credential: ConsumerCredential, http_client: impl Into<Arc<C>>) -> Self {
		Self { credential, body_signing: BodySigning::default(), http_client: http_client.into() }
	}

	/// Creates a client from validated configuration.
	pub fn from_config(config: &LtiConfig, http_client: impl Into<Arc<C>>) -> Result<Self> {
		config.validate()?;

		Ok(Self::with_http_client(config.credential.clone(), http_client)
			.with_body_signing(config.body_signing))
	}

	/// Overrides the body signing mode.
	pub fn with_body_signing(mut self, body_signing: BodySigning) -> Self {
		self.body_signing = body_signing;

		self
	}

	/// Reports `record.score` through `replaceResultRequest`.
	///
	/// Fails with [`Error::Validation`] before any signing or network work when the score is
	/// outside `[0.0, 1.0]`.
	pub async fn send_grade(&self, record: &GradePassbackRecord) -> Result<OutcomeResult> {
		let operation = record.validated_score().map(OutcomeOperation::ReplaceResult);

		self.call(
			LtiOperation::ReplaceResult,
			operation.map_err(Error::from),
			&record.sourced_id,
			&record.outcome_service_url,
		)
		.await
	}

	/// Reads the stored score through `readResultRequest`.
	pub async fn read_grade(&self, target: &GradeReturn) -> Result<OutcomeResult> {
		self.call(
			LtiOperation::ReadResult,
			Ok(OutcomeOperation::ReadResult),
			&target.sourced_id,
			&target.outcome_service_url,
		)
		.await
	}

	/// Removes the stored score through `deleteResultRequest`.
	pub async fn delete_grade(&self, target: &GradeReturn) -> Result<OutcomeResult> {
		self.call(
			LtiOperation::DeleteResult,
			Ok(OutcomeOperation::DeleteResult),
			&target.sourced_id,
			&target.outcome_service_url,
		)
		.await
	}

	/// Builds the signed POST for `body` without sending it.
	pub fn signed_request(&self, service_url: &Url, body: String) -> Result<HttpRequest> {
		self.signed_request_with(OAuthParams::generate(&self.credential), service_url, body)
	}

	/// Builds the signed POST using caller-supplied protocol parameters (fixed nonce and
	/// timestamp for reproducible signatures). The consumer key is taken from the client's
	/// credential, and any body hash already on `oauth` is replaced according to the configured
	/// [`BodySigning`].
	pub fn signed_request_with(
		&self,
		oauth: OAuthParams,
		service_url: &Url,
		body: String,
	) -> Result<HttpRequest> {
		let oauth = OAuthParams { consumer_key: self.credential.key.clone(), ..oauth };
		let oauth = match self.body_signing {
			BodySigning::BodyHash => oauth.with_body_hash(oauth1::body_hash(body.as_bytes())),
			BodySigning::OAuthParamsOnly => OAuthParams { body_hash: None, ..oauth },
		};
		let mut pairs = oauth.to_pairs();
		let signature = oauth1::sign(
			Method::POST.as_str(),
			service_url,
			pairs.iter().map(|(key, value)| (key, value)),
			&self.credential,
		)?;

		pairs.push((oauth1::SIGNATURE_PARAM.into(), signature));

		let request = ::http::Request::builder()
			.method(Method::POST)
			.uri(service_url.as_str())
			.header(CONTENT_TYPE, OUTCOME_CONTENT_TYPE)
			.header(AUTHORIZATION, oauth1::authorization_header(pairs))
			.body(body.into_bytes())
			.map_err(ConfigError::from)?;

		Ok(request)
	}

	async fn call(
		&self,
		kind: LtiOperation,
		operation: Result<OutcomeOperation>,
		sourced_id: &SourcedId,
		service_url: &Url,
	) -> Result<OutcomeResult> {
		let span = OperationSpan::new(kind, "outcome_post");

		obs::record_operation_outcome(kind, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let operation = operation?;

				self.credential.validate()?;

				let body =
					envelope::encode_request(operation, sourced_id, &envelope::new_message_id());
				let request = self.signed_request(service_url, body)?;
				let response = self.http_client.execute(request).await?;

				classify_response(response)
			})
			.await;

		match &result {
			Ok(_) => obs::record_operation_outcome(kind, OperationOutcome::Success),
			Err(_) => obs::record_operation_outcome(kind, OperationOutcome::Failure),
		}

		result
	}
}
#[cfg(feature = "reqwest")]
impl OutcomeClient<ReqwestHttpClient> {
	/// Creates a client backed by its own reqwest transport (redirects disabled).
	pub fn new(credential: ConsumerCredential) -> Result<Self> {
		Ok(Self::with_http_client(credential, ReqwestHttpClient::new()?))
	}
}
impl<C> Debug for OutcomeClient<C>
where
	C: ?Sized + OutcomeHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OutcomeClient")
			.field("credential", &self.credential)
			.field("body_signing", &self.body_signing)
			.finish()
	}
}

fn classify_response(response: HttpResponse) -> Result<OutcomeResult> {
	let status = response.status();
	let raw_body = String::from_utf8_lossy(response.body()).into_owned();

	if !status.is_success() {
		return Err(ProtocolError::UnexpectedStatus { status: status.as_u16(), body: raw_body }.into());
	}

	match envelope::decode_response(&raw_body) {
		Ok(envelope) => Ok(OutcomeResult { http_status: status.as_u16(), envelope, raw_body }),
		Err(source) =>
			Err(ProtocolError::MalformedResponse { status: status.as_u16(), body: raw_body, source }
				.into()),
	}
}
