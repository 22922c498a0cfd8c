//! Process-wide consumer configuration, loaded once and read-only afterwards.

// self
use crate::{_prelude::*, auth::ConsumerCredential, error::ConfigError};

/// How an outcome POST carries its XML body into the OAuth signature.
///
/// The choice is fixed per [`OutcomeClient`](crate::outcome::OutcomeClient); it is never
/// switched per request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySigning {
	/// Sign `oauth_body_hash = base64(SHA1(body))` alongside the `oauth_*` parameters, as the
	/// LTI 1.1 Outcomes binding requires.
	#[default]
	BodyHash,
	/// Sign only the `oauth_*` parameters, for providers predating the body-hash extension.
	OAuthParamsOnly,
}

/// Recognized configuration options.
///
/// ```json
/// { "consumer_key": "K", "consumer_secret": "S", "launch_url": "https://tool.example/lti" }
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct LtiConfig {
	/// Consumer key + secret issued by the tool provider.
	#[serde(flatten)]
	pub credential: ConsumerCredential,
	/// Tool-provider launch endpoint.
	pub launch_url: Url,
	/// Outcome body signing mode.
	#[serde(default)]
	pub body_signing: BodySigning,
}
impl LtiConfig {
	/// Builds and validates a configuration.
	pub fn new(
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
		launch_url: Url,
	) -> Result<Self, ConfigError> {
		let config = Self {
			credential: ConsumerCredential::new(consumer_key, consumer_secret),
			launch_url,
			body_signing: BodySigning::default(),
		};

		config.validate()?;

		Ok(config)
	}

	/// Parses a JSON document and validates it. Parse failures report the offending field path.
	pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(raw);
		let config: Self = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ConfigError::Parse { source })?;

		config.validate()?;

		Ok(config)
	}

	/// Overrides the outcome body signing mode.
	pub fn with_body_signing(mut self, body_signing: BodySigning) -> Self {
		self.body_signing = body_signing;

		self
	}

	/// Rejects empty credentials and non-HTTP(S) launch URLs.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.credential.validate()?;

		ensure_http_url("launch", &self.launch_url)
	}
}

pub(crate) fn is_http_url(url: &Url) -> bool {
	matches!(url.scheme(), "http" | "https") && url.has_host()
}

pub(crate) fn ensure_http_url(field: &'static str, url: &Url) -> Result<(), ConfigError> {
	if is_http_url(url) {
		Ok(())
	} else {
		Err(ConfigError::UnsupportedUrl { field, url: url.to_string() })
	}
}
