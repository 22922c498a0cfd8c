//! Signature base string construction and HMAC-SHA1 signing (RFC 5849 §3.4).

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};
// self
use crate::{
	_prelude::*,
	auth::ConsumerCredential,
	error::ConfigError,
	oauth1::encode::{base_string_uri, normalize_parameters, percent_encode},
};

type HmacSha1 = Hmac<Sha1>;

/// Builds `METHOD&encoded-base-uri&encoded-normalized-parameters`.
///
/// Query parameters already present on `url` join `params` before normalization, so a URL
/// such as `https://lms.example/outcome?course=1` signs `course=1` too.
pub fn signature_base_string<I, K, V>(method: &str, url: &Url, params: I) -> String
where
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<str>,
	V: AsRef<str>,
{
	let owned = params
		.into_iter()
		.map(|(key, value)| (key.as_ref().to_owned(), value.as_ref().to_owned()))
		.chain(url.query_pairs().map(|(key, value)| (key.into_owned(), value.into_owned())));
	let normalized = normalize_parameters(owned);

	format!(
		"{}&{}&{}",
		method.to_ascii_uppercase(),
		percent_encode(&base_string_uri(url)),
		percent_encode(&normalized),
	)
}

/// Computes `oauth_signature` for a consumer-only (token-less) request.
///
/// Fails only when the credential carries an empty key or secret.
pub fn sign<I, K, V>(
	method: &str,
	url: &Url,
	params: I,
	credential: &ConsumerCredential,
) -> Result<String, ConfigError>
where
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<str>,
	V: AsRef<str>,
{
	credential.validate()?;

	let base_string = signature_base_string(method, url, params);

	hmac_sha1_base64(&signing_key(credential.secret.expose(), ""), &base_string)
}

/// `oauth_body_hash` value: base64 of the SHA-1 digest of the raw body bytes.
pub fn body_hash(body: &[u8]) -> String {
	STANDARD.encode(Sha1::digest(body))
}

fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
	format!("{}&{}", percent_encode(consumer_secret), percent_encode(token_secret))
}

fn hmac_sha1_base64(key: &str, base_string: &str) -> Result<String, ConfigError> {
	let mut mac =
		HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| ConfigError::SigningKey)?;

	mac.update(base_string.as_bytes());

	Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Fixture URL should parse.")
	}

	#[test]
	fn base_string_encodes_space_twice() {
		let base = signature_base_string(
			"post",
			&url("https://example.org/lti/a"),
			[("a", "1"), ("b", "2 3")],
		);

		assert_eq!(base, "POST&https%3A%2F%2Fexample.org%2Flti%2Fa&a%3D1%26b%3D2%25203");
	}

	// RFC 5849 §1.2 / OAuth Core 1.0 Appendix A.5 photo example, which carries a token secret.
	#[test]
	fn matches_published_hmac_sha1_vector() {
		let params = [
			("file", "vacation.jpg"),
			("size", "original"),
			("oauth_consumer_key", "dpf43f3p2l4k3l03"),
			("oauth_token", "nnch734d00sl2jdk"),
			("oauth_signature_method", "HMAC-SHA1"),
			("oauth_timestamp", "1191242096"),
			("oauth_nonce", "kllo9940pd9333jh"),
			("oauth_version", "1.0"),
		];
		let base = signature_base_string("GET", &url("http://photos.example.net/photos"), params);

		assert_eq!(
			base,
			"GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26\
			 oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26\
			 oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26\
			 oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal"
		);

		let signature =
			hmac_sha1_base64(&signing_key("kd94hf93k423kf44", "pfkkdhi9sl3r4s00"), &base)
				.expect("HMAC accepts keys of any length.");

		assert_eq!(signature, "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");
	}

	#[test]
	fn url_query_parameters_are_signed() {
		let with_query = signature_base_string(
			"POST",
			&url("https://example.org/outcome?course=1"),
			[("a", "1")],
		);

		assert_eq!(
			with_query,
			"POST&https%3A%2F%2Fexample.org%2Foutcome&a%3D1%26course%3D1"
		);
	}

	#[test]
	fn signing_is_deterministic_and_sensitive_to_every_value() {
		let credential = ConsumerCredential::new("K", "S");
		let target = url("https://example.org/lti/a");
		let params = [("a", "1"), ("b", "2 3"), ("oauth_nonce", "n"), ("oauth_timestamp", "1")];
		let first = sign("POST", &target, params, &credential).expect("Signing should succeed.");
		let second = sign("POST", &target, params, &credential).expect("Signing should succeed.");

		assert_eq!(first, second);

		for idx in 0..params.len() {
			let mut changed = params.map(|(key, value)| (key.to_owned(), value.to_owned()));

			changed[idx].1.push('x');

			let signature =
				sign("POST", &target, changed, &credential).expect("Signing should succeed.");

			assert_ne!(signature, first, "Changing `{}` must change the signature.", params[idx].0);
		}
	}

	#[test]
	fn signature_ignores_existing_signature_param() {
		let credential = ConsumerCredential::new("K", "S");
		let target = url("https://example.org/lti/a");
		let plain = sign("POST", &target, [("a", "1")], &credential)
			.expect("Signing should succeed.");
		let with_stale = sign("POST", &target, [("a", "1"), ("oauth_signature", "old")], &credential)
			.expect("Signing should succeed.");

		assert_eq!(plain, with_stale);
	}

	#[test]
	fn sign_rejects_empty_credentials() {
		let target = url("https://example.org/lti/a");

		assert!(matches!(
			sign("POST", &target, [("a", "1")], &ConsumerCredential::new("K", "")),
			Err(ConfigError::EmptyConsumerSecret)
		));
		assert!(matches!(
			sign("POST", &target, [("a", "1")], &ConsumerCredential::new("", "S")),
			Err(ConfigError::EmptyConsumerKey)
		));
	}

	#[test]
	fn body_hash_matches_sha1_of_empty_input() {
		assert_eq!(body_hash(b""), "2jmj7l5rSw0yVb/vlWAYkK/YBwk=");
	}
}
