// std
use std::collections::BTreeMap;
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::Sha1;
// self
use lti_bridge::{
	auth::{ConsumerCredential, SourcedId},
	launch::{LaunchContext, LaunchRequestBuilder},
	oauth1::OAuthParams,
	outcome::GradeReturn,
	url::Url,
};

const RFC3986: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

fn enc(value: &str) -> String {
	utf8_percent_encode(value, RFC3986).to_string()
}

// Independent HMAC-SHA1 recomputation over a form, mirroring what a tool provider does.
fn provider_signature(url: &str, form: &BTreeMap<String, String>, secret: &str) -> String {
	let mut pairs = form
		.iter()
		.filter(|(key, _)| key.as_str() != "oauth_signature")
		.map(|(key, value)| (enc(key), enc(value)))
		.collect::<Vec<_>>();

	pairs.sort();

	let normalized =
		pairs.iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join("&");
	let base = format!("POST&{}&{}", enc(url), enc(&normalized));
	let mut mac = Hmac::<Sha1>::new_from_slice(format!("{}&", enc(secret)).as_bytes())
		.expect("HMAC accepts any key length.");

	mac.update(base.as_bytes());

	STANDARD.encode(mac.finalize().into_bytes())
}

fn builder(url: &str) -> LaunchRequestBuilder {
	LaunchRequestBuilder::new(
		ConsumerCredential::new("K", "S"),
		Url::parse(url).expect("Launch URL fixture should parse."),
	)
	.expect("Launch builder fixture should be valid.")
}

fn learner() -> LaunchContext {
	LaunchContext::parse("u1", "Learner", "c1", "r1").expect("Learner context should be valid.")
}

#[test]
fn provider_verifies_minimal_launch() {
	let launch = builder("https://tool.example/lti/a")
		.build_launch(&learner())
		.expect("Minimal launch should build.");
	let form = launch.params();

	assert_eq!(form.get("lti_version").map(String::as_str), Some("LTI-1p0"));
	assert_eq!(form.get("lti_message_type").map(String::as_str), Some("basic-lti-launch-request"));
	assert_eq!(form.get("user_id").map(String::as_str), Some("u1"));
	assert_eq!(form.get("context_id").map(String::as_str), Some("c1"));
	assert_eq!(form.get("resource_link_id").map(String::as_str), Some("r1"));
	assert_eq!(form.get("oauth_consumer_key").map(String::as_str), Some("K"));
	assert_eq!(form.get("oauth_version").map(String::as_str), Some("1.0"));
	assert_eq!(form.len(), 12);
	assert_eq!(
		launch.signature(),
		Some(provider_signature("https://tool.example/lti/a", form, "S").as_str())
	);
}

#[test]
fn provider_verifies_launch_with_every_optional_field() {
	let grade_return = GradeReturn::new(
		SourcedId::new("course:1/user:2").expect("Sourced id fixture should be valid."),
		Url::parse("https://lms.example/outcome?x=1").expect("Outcome URL fixture should parse."),
	)
	.expect("Grade return fixture should be valid.");
	let context = learner()
		.with_context_title("Intro to Psychology")
		.with_context_label("PSY 101")
		.with_return_url(Url::parse("https://lms.example/return").expect("URL should parse."))
		.with_grade_return(grade_return)
		.with_custom_param("Review Mode", "on & off");
	let launch = builder("https://tool.example/lti/a")
		.build_launch(&context)
		.expect("Full launch should build.");
	let form = launch.params();

	assert_eq!(form.get("custom_review_mode").map(String::as_str), Some("on & off"));
	assert_eq!(form.get("lis_result_sourcedid").map(String::as_str), Some("course:1/user:2"));
	assert_eq!(
		form.get("lis_outcome_service_url").map(String::as_str),
		Some("https://lms.example/outcome?x=1")
	);
	assert_eq!(
		launch.signature(),
		Some(provider_signature("https://tool.example/lti/a", form, "S").as_str())
	);
}

#[test]
fn launch_url_query_is_signed_but_not_repeated() {
	let launch = builder("https://tool.example/lti/a?tool=7")
		.build_launch(&learner())
		.expect("Launch should build.");
	let mut signed = launch.params().clone();

	assert!(!signed.contains_key("tool"));

	signed.insert("tool".into(), "7".into());

	assert_eq!(
		launch.signature(),
		Some(provider_signature("https://tool.example/lti/a", &signed, "S").as_str())
	);
}

#[test]
fn fixed_protocol_params_reproduce_the_signature() {
	let oauth = OAuthParams::generate(&ConsumerCredential::new("K", "S"))
		.with_nonce("fixed-nonce")
		.with_timestamp(1_300_000_000);
	let builder = builder("https://tool.example/lti/a");
	let first = builder.build_launch_with(&learner(), oauth.clone()).expect("Launch should build.");
	let second = builder.build_launch_with(&learner(), oauth).expect("Launch should build.");

	assert_eq!(first, second);
	assert_eq!(first.nonce(), Some("fixed-nonce"));
}

#[test]
fn a_hundred_launches_never_repeat_a_nonce() {
	let builder = builder("https://tool.example/lti/a");
	let mut nonces = std::collections::HashSet::new();

	for _ in 0..100 {
		let launch = builder.build_launch(&learner()).expect("Launch should build.");

		assert!(nonces.insert(launch.nonce().map(str::to_owned)));
	}
}
