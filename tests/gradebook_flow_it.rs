// crates.io
use httpmock::prelude::*;
// self
use lti_bridge::{
	_preludet::*,
	config::LtiConfig,
	error::ConfigError,
	http::ReqwestHttpClient,
	launch::{LaunchContext, LaunchRequestBuilder},
	outcome::{GradeReturn, OutcomeClient},
	store::{GradebookStore, MemoryGradebook},
};

const SUCCESS_BODY: &str = "<imsx_POXEnvelopeResponse><imsx_POXHeader><imsx_POXResponseHeaderInfo>\
                            <imsx_statusInfo><imsx_codeMajor>success</imsx_codeMajor>\
                            </imsx_statusInfo></imsx_POXResponseHeaderInfo></imsx_POXHeader>\
                            <imsx_POXBody><replaceResultResponse/></imsx_POXBody>\
                            </imsx_POXEnvelopeResponse>";

fn config_json(launch_url: &str) -> String {
	format!(
		r#"{{"consumer_key":"K","consumer_secret":"S","launch_url":"{launch_url}","body_signing":"body_hash"}}"#
	)
}

#[tokio::test]
async fn stored_grade_return_round_trips_into_a_grade_post() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/outcome").header("content-type", "application/xml");
			then.status(200).body(SUCCESS_BODY);
		})
		.await;
	let config = LtiConfig::from_json(&config_json("https://tool.example/lti"))
		.expect("Config fixture should load.");
	let outcome_url = server.url("/outcome");
	let inbound = [
		("user_id", "u1"),
		("lis_result_sourcedid", "abc"),
		("lis_outcome_service_url", outcome_url.as_str()),
	];
	let grade_return = GradeReturn::from_params(inbound)
		.expect("Inbound outcome fields should be valid.")
		.expect("Both outcome fields are present.");
	let context = LaunchContext::parse("u1", "Learner", "c1", "r1")
		.expect("Launch context should be valid.")
		.with_grade_return(grade_return.clone());
	let launch = LaunchRequestBuilder::from_config(&config)
		.expect("Launch builder should build from config.")
		.build_launch(&context)
		.expect("Launch should build.");

	assert_eq!(launch.params().get("lis_result_sourcedid").map(String::as_str), Some("abc"));

	let gradebook = MemoryGradebook::default();

	gradebook
		.put(&context.user_id, &context.resource_link_id, grade_return)
		.await
		.expect("Put should succeed.");

	let stored = gradebook
		.get(&context.user_id, &context.resource_link_id)
		.await
		.expect("Get should succeed.")
		.expect("Grade return should be stored.");
	let client: ReqwestTestOutcomeClient =
		OutcomeClient::from_config(&config, test_reqwest_http_client())
			.expect("Outcome client should build from config.");
	let result = client.send_grade(&stored.with_score(0.8)).await.expect("Send should succeed.");

	mock.assert_calls_async(1).await;

	assert!(result.is_success());
}

#[test]
fn launch_without_outcome_fields_has_no_grade_return() {
	let inbound = [("user_id", "u1"), ("lis_result_sourcedid", "abc")];

	assert_eq!(GradeReturn::from_params(inbound), Ok(None));
}

#[test]
fn empty_secret_config_is_rejected_up_front() {
	let raw = r#"{"consumer_key":"K","consumer_secret":"","launch_url":"https://tool.example/lti"}"#;

	assert!(matches!(LtiConfig::from_json(raw), Err(ConfigError::EmptyConsumerSecret)));

	let mut config = LtiConfig::from_json(&config_json("https://tool.example/lti"))
		.expect("Config fixture should load.");

	config.credential.key.clear();

	let http = ReqwestHttpClient::new().expect("Reqwest client should build.");
	let result = OutcomeClient::<ReqwestHttpClient>::from_config(&config, http);

	assert!(matches!(result, Err(Error::Config(ConfigError::EmptyConsumerKey))));
}
