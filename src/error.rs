//! Crate-level error types shared by the signer, launch builder, outcome client, and stores.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Gradebook collaborator failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Missing or empty credential, or an unusable URL. Fatal; never retried.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Caller supplied an invalid value; rejected before any signing or network work.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// The outcome service could not be reached.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The outcome service answered with a non-2xx status or an unreadable envelope.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
}

/// Configuration failures. Raised at startup or on first signing attempt.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Consumer key is empty.
	#[error("Consumer key must not be empty.")]
	EmptyConsumerKey,
	/// Consumer secret is empty.
	#[error("Consumer secret must not be empty.")]
	EmptyConsumerSecret,
	/// HMAC rejected the signing key.
	#[error("Signing key was rejected by the HMAC primitive.")]
	SigningKey,
	/// URL is not an absolute HTTP(S) URL.
	#[error("The {field} URL must use http or https: {url}.")]
	UnsupportedUrl {
		/// Which configured URL failed validation.
		field: &'static str,
		/// URL that failed validation.
		url: String,
	},
	/// Configuration document could not be parsed.
	#[error("Configuration could not be parsed.")]
	Parse {
		/// Structured parsing failure including the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Caller errors detected before any signing or transport work.
#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum ValidationError {
	/// Score lies outside `[0.0, 1.0]` or is not a number.
	#[error("Score {score} is outside the range [0.0, 1.0].")]
	ScoreOutOfRange {
		/// Rejected score.
		score: f64,
	},
	/// Required launch field is missing or malformed.
	#[error(transparent)]
	Identifier(#[from] crate::auth::IdentifierError),
	/// Role string is empty.
	#[error("Role must not be empty.")]
	EmptyRole,
	/// A supplied URL is unusable.
	#[error("The {field} URL is invalid: {value}.")]
	InvalidUrl {
		/// Which field carried the URL.
		field: &'static str,
		/// Raw value that failed parsing or scheme checks.
		value: String,
	},
	/// A custom launch parameter name normalizes to nothing or to a name already in use.
	#[error("Custom parameter name `{name}` is empty or collides with another after normalization.")]
	InvalidCustomParameter {
		/// Raw parameter name.
		name: String,
	},
}

/// Transport-level failures. Never retried by this crate.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the outcome service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request exceeded the transport's timeout.
	#[error("Request to the outcome service timed out.")]
	Timeout,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

/// Outcome service responses that cannot be accepted. Raw status and body are preserved.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// HTTP status outside the 2xx range.
	#[error("Outcome service returned HTTP {status}.")]
	UnexpectedStatus {
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// 2xx response whose body is not a readable outcome envelope.
	#[error("Outcome service returned an unreadable envelope (HTTP {status}).")]
	MalformedResponse {
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
		/// Decoder failure.
		#[source]
		source: crate::outcome::EnvelopeError,
	},
}
impl ProtocolError {
	/// HTTP status attached to the failure.
	pub fn status(&self) -> u16 {
		match self {
			Self::UnexpectedStatus { status, .. } | Self::MalformedResponse { status, .. } =>
				*status,
		}
	}

	/// Raw response body attached to the failure.
	pub fn body(&self) -> &str {
		match self {
			Self::UnexpectedStatus { body, .. } | Self::MalformedResponse { body, .. } => body,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn protocol_error_exposes_raw_response() {
		let err = ProtocolError::UnexpectedStatus { status: 401, body: "nope".into() };

		assert_eq!(err.status(), 401);
		assert_eq!(err.body(), "nope");
		assert!(matches!(Error::from(err), Error::Protocol(_)));
	}

	#[test]
	fn validation_error_renders_score() {
		let err = ValidationError::ScoreOutOfRange { score: 1.5 };

		assert_eq!(err.to_string(), "Score 1.5 is outside the range [0.0, 1.0].");
	}
}
