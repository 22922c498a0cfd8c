//! Walks one learner through a signed launch, remembers the grade-return target the LMS
//! handed out, and posts a score back against a local mock Outcomes endpoint.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use lti_bridge::{
	auth::{ContextId, ResourceLinkId, Role, SourcedId, UserId},
	config::{BodySigning, LtiConfig},
	http::ReqwestHttpClient,
	launch::{LaunchContext, LaunchRequestBuilder},
	outcome::{GradeReturn, OutcomeClient},
	reqwest::{Client, redirect::Policy},
	store::{GradebookStore, MemoryGradebook},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let outcome_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/outcome");
			then.status(200).header("content-type", "application/xml").body(
				"<imsx_POXEnvelopeResponse><imsx_POXHeader><imsx_POXResponseHeaderInfo>\
				 <imsx_statusInfo><imsx_codeMajor>success</imsx_codeMajor>\
				 <imsx_description>Score recorded.</imsx_description></imsx_statusInfo>\
				 </imsx_POXResponseHeaderInfo></imsx_POXHeader>\
				 <imsx_POXBody><replaceResultResponse/></imsx_POXBody></imsx_POXEnvelopeResponse>",
			);
		})
		.await;
	let config = LtiConfig::new("demo-key", "demo-secret", Url::parse("https://tool.example/lti")?)?
		.with_body_signing(BodySigning::BodyHash);
	let grade_return =
		GradeReturn::new(SourcedId::new("course-7:learner-42")?, Url::parse(&server.url("/outcome"))?)?;
	let context = LaunchContext::new(
		UserId::new("learner-42")?,
		Role::Learner,
		ContextId::new("course-7")?,
		ResourceLinkId::new("quiz-1")?,
	)
	.with_context_title("Intro to Psychology")
	.with_grade_return(grade_return.clone())
	.with_custom_param("attempt", "1");
	let launch = LaunchRequestBuilder::from_config(&config)?.build_launch(&context)?;

	println!("POST {}", launch.url);
	println!("{}", launch.form_body());

	let gradebook = MemoryGradebook::default();

	gradebook.put(&context.user_id, &context.resource_link_id, grade_return).await?;

	let Some(target) = gradebook.get(&context.user_id, &context.resource_link_id).await? else {
		return Ok(());
	};
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(Policy::none())
			.build()?,
	);
	let client = <OutcomeClient<ReqwestHttpClient>>::from_config(&config, http_client)?;
	let result = client.send_grade(&target.with_score(0.85)).await?;

	outcome_mock.assert_calls_async(1).await;
	println!(
		"HTTP {} codeMajor={:?} description={:?}",
		result.http_status,
		result.provider_status(),
		result.envelope.description
	);

	Ok(())
}
