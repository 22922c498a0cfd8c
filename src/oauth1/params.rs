//! Per-request `oauth_*` protocol parameters and the `Authorization` header rendering.

// crates.io
use rand::Rng;
// self
use crate::{_prelude::*, auth::ConsumerCredential, oauth1::encode::percent_encode};

/// Only signature method this crate emits.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
/// OAuth protocol version sent as `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";

/// Fresh `oauth_*` protocol parameters for one request.
///
/// [`OAuthParams::generate`] draws a 128-bit random nonce and reads the clock once; two calls
/// never produce replay-identical sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthParams {
	/// Value for `oauth_consumer_key`.
	pub consumer_key: String,
	/// Value for `oauth_nonce`.
	pub nonce: String,
	/// Unix seconds for `oauth_timestamp`.
	pub timestamp: i64,
	/// Value for `oauth_body_hash`, when the body-hash extension is in use.
	pub body_hash: Option<String>,
}
impl OAuthParams {
	/// Generates parameters with a fresh nonce and the current Unix time.
	pub fn generate(credential: &ConsumerCredential) -> Self {
		Self {
			consumer_key: credential.key.clone(),
			nonce: generate_nonce(),
			timestamp: OffsetDateTime::now_utc().unix_timestamp(),
			body_hash: None,
		}
	}

	/// Overrides the nonce, for deterministic fixtures.
	pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
		self.nonce = nonce.into();

		self
	}

	/// Overrides the timestamp, for deterministic fixtures.
	pub fn with_timestamp(mut self, timestamp: i64) -> Self {
		self.timestamp = timestamp;

		self
	}

	/// Attaches an `oauth_body_hash` value.
	pub fn with_body_hash(mut self, body_hash: impl Into<String>) -> Self {
		self.body_hash = Some(body_hash.into());

		self
	}

	/// Returns the protocol parameters as `(name, value)` pairs, excluding `oauth_signature`.
	pub fn to_pairs(&self) -> Vec<(String, String)> {
		let mut pairs = Vec::with_capacity(6);

		if let Some(hash) = &self.body_hash {
			pairs.push(("oauth_body_hash".into(), hash.clone()));
		}

		pairs.push(("oauth_consumer_key".into(), self.consumer_key.clone()));
		pairs.push(("oauth_nonce".into(), self.nonce.clone()));
		pairs.push(("oauth_signature_method".into(), SIGNATURE_METHOD.into()));
		pairs.push(("oauth_timestamp".into(), self.timestamp.to_string()));
		pairs.push(("oauth_version".into(), OAUTH_VERSION.into()));

		pairs
	}
}

/// Returns 128 random bits as 32 lowercase hex characters.
pub fn generate_nonce() -> String {
	let value: u128 = rand::rng().random();

	format!("{value:032x}")
}

/// Renders `OAuth realm="", name="value", ...` with percent-encoded names and values.
pub fn authorization_header<I, K, V>(params: I) -> String
where
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<str>,
	V: AsRef<str>,
{
	let mut header = String::from("OAuth realm=\"\"");

	for (key, value) in params {
		header.push_str(", ");
		header.push_str(&percent_encode(key.as_ref()));
		header.push_str("=\"");
		header.push_str(&percent_encode(value.as_ref()));
		header.push('"');
	}

	header
}
