//! Signed LTI 1.1 launch parameter construction.

// crates.io
use ::http::Method;
// self
use crate::{
	_prelude::*,
	auth::ConsumerCredential,
	config::{self, LtiConfig},
	error::{ConfigError, ValidationError},
	launch::context::{LaunchContext, custom_param_name},
	oauth1::{self, OAuthParams},
	obs::{self, LtiOperation, OperationOutcome, OperationSpan},
	outcome::record::{SERVICE_URL_PARAM, SOURCED_ID_PARAM},
};

/// `lti_version` value for LTI 1.1 launches.
pub const LTI_VERSION: &str = "LTI-1p0";
/// `lti_message_type` value for a basic launch.
pub const LTI_MESSAGE_TYPE: &str = "basic-lti-launch-request";

/// Fully signed launch parameters, ready to be rendered as an auto-submitting form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchRequest {
	/// Form `action`. Query parameters on this URL were signed but are not repeated in
	/// [`LaunchRequest::params`].
	pub url: Url,
	params: BTreeMap<String, String>,
}
impl LaunchRequest {
	/// All form fields, `oauth_signature` included.
	pub fn params(&self) -> &BTreeMap<String, String> {
		&self.params
	}

	/// Consumes the request, yielding the form fields.
	pub fn into_params(self) -> BTreeMap<String, String> {
		self.params
	}

	/// Looks up one form field.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	/// The computed `oauth_signature`.
	pub fn signature(&self) -> Option<&str> {
		self.get(oauth1::SIGNATURE_PARAM)
	}

	/// The `oauth_nonce` used for this launch.
	pub fn nonce(&self) -> Option<&str> {
		self.get("oauth_nonce")
	}

	/// Renders the fields as an `application/x-www-form-urlencoded` body.
	pub fn form_body(&self) -> String {
		url::form_urlencoded::Serializer::new(String::new()).extend_pairs(&self.params).finish()
	}
}

/// Builds signed launch requests against one tool-provider endpoint.
#[derive(Clone, Debug)]
pub struct LaunchRequestBuilder {
	credential: ConsumerCredential,
	launch_url: Url,
}
impl LaunchRequestBuilder {
	/// Creates a builder after validating the credential and launch URL.
	pub fn new(credential: ConsumerCredential, launch_url: Url) -> Result<Self, ConfigError> {
		credential.validate()?;
		config::ensure_http_url("launch", &launch_url)?;

		Ok(Self { credential, launch_url })
	}

	/// Creates a builder from validated configuration.
	pub fn from_config(config: &LtiConfig) -> Result<Self, ConfigError> {
		Self::new(config.credential.clone(), config.launch_url.clone())
	}

	/// Endpoint every launch targets.
	pub fn launch_url(&self) -> &Url {
		&self.launch_url
	}

	/// Builds and signs a launch with a fresh nonce and the current timestamp.
	pub fn build_launch(&self, context: &LaunchContext) -> Result<LaunchRequest> {
		self.build_launch_with(context, OAuthParams::generate(&self.credential))
	}

	/// Builds and signs a launch with caller-supplied protocol parameters.
	///
	/// `oauth_consumer_key` always comes from the builder's credential and `oauth_body_hash` is
	/// never sent with a form launch. The signature is computed last, over the final field set;
	/// nothing is added afterwards.
	pub fn build_launch_with(
		&self,
		context: &LaunchContext,
		oauth: OAuthParams,
	) -> Result<LaunchRequest> {
		let _guard = OperationSpan::new(LtiOperation::Launch, "build_launch").entered();

		obs::record_operation_outcome(LtiOperation::Launch, OperationOutcome::Attempt);

		let result = self.assemble(context, oauth);

		match &result {
			Ok(_) => obs::record_operation_outcome(LtiOperation::Launch, OperationOutcome::Success),
			Err(_) => obs::record_operation_outcome(LtiOperation::Launch, OperationOutcome::Failure),
		}

		result
	}

	fn assemble(&self, context: &LaunchContext, oauth: OAuthParams) -> Result<LaunchRequest> {
		let mut params = BTreeMap::new();

		params.insert("lti_version".to_owned(), LTI_VERSION.to_owned());
		params.insert("lti_message_type".to_owned(), LTI_MESSAGE_TYPE.to_owned());
		params.insert("user_id".to_owned(), context.user_id.to_string());
		params.insert("roles".to_owned(), context.role.to_string());
		params.insert("context_id".to_owned(), context.context_id.to_string());
		params.insert("resource_link_id".to_owned(), context.resource_link_id.to_string());

		if let Some(title) = &context.context_title {
			params.insert("context_title".to_owned(), title.clone());
		}
		if let Some(label) = &context.context_label {
			params.insert("context_label".to_owned(), label.clone());
		}
		if let Some(url) = &context.return_url {
			params.insert("launch_presentation_return_url".to_owned(), url.to_string());
		}
		if let Some(grade_return) = &context.grade_return {
			params.insert(SOURCED_ID_PARAM.to_owned(), grade_return.sourced_id.to_string());
			params.insert(SERVICE_URL_PARAM.to_owned(), grade_return.outcome_service_url.to_string());
		}

		for (name, value) in &context.custom {
			if params.insert(custom_param_name(name)?, value.clone()).is_some() {
				return Err(ValidationError::InvalidCustomParameter { name: name.clone() }.into());
			}
		}

		let oauth =
			OAuthParams { consumer_key: self.credential.key.clone(), body_hash: None, ..oauth };

		params.extend(oauth.to_pairs());

		let signature =
			oauth1::sign(Method::POST.as_str(), &self.launch_url, &params, &self.credential)?;

		params.insert(oauth1::SIGNATURE_PARAM.to_owned(), signature);

		Ok(LaunchRequest { url: self.launch_url.clone(), params })
	}
}
