//! Consumer credential and the redacting secret wrapper.

// self
use crate::{_prelude::*, error::ConfigError};

/// Redacted consumer secret keeping HMAC key material out of logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ConsumerSecret(String);
impl ConsumerSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for ConsumerSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ConsumerSecret").field(&"<redacted>").finish()
	}
}
impl Display for ConsumerSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Consumer key + shared secret issued by the tool provider.
///
/// The value is read-only after construction and safe to share across threads. Only the
/// signer reads the secret, and only as HMAC key material.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ConsumerCredential {
	/// Public consumer key sent as `oauth_consumer_key`.
	#[serde(rename = "consumer_key")]
	pub key: String,
	/// Shared secret; never transmitted.
	#[serde(rename = "consumer_secret")]
	pub secret: ConsumerSecret,
}
impl ConsumerCredential {
	/// Creates a credential. Emptiness is checked by [`ConsumerCredential::validate`], which
	/// every signing path calls.
	pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { key: key.into(), secret: ConsumerSecret::new(secret) }
	}

	/// Rejects an empty key or secret.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.key.is_empty() {
			return Err(ConfigError::EmptyConsumerKey);
		}
		if self.secret.expose().is_empty() {
			return Err(ConfigError::EmptyConsumerSecret);
		}

		Ok(())
	}
}
