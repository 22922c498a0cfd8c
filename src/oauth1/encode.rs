//! Percent-encoding and parameter normalization (RFC 5849 §3.4.1 and §3.6).

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
// self
use crate::_prelude::*;

/// Everything except the RFC 3986 unreserved set `A-Z a-z 0-9 - . _ ~`.
const OAUTH_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Parameter that never participates in its own base string.
pub const SIGNATURE_PARAM: &str = "oauth_signature";

/// Percent-encodes `value` as UTF-8 with uppercase hex digits. Spaces become `%20`, never `+`.
pub fn percent_encode(value: &str) -> String {
	utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Builds the normalized parameter string.
///
/// Every key and value is encoded first, pairs are sorted by encoded key then encoded value in
/// byte order, and joined as `key=value` with `&`. Duplicate keys are kept. Any
/// `oauth_signature` entry is dropped.
pub fn normalize_parameters<I, K, V>(params: I) -> String
where
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<str>,
	V: AsRef<str>,
{
	let mut pairs = params
		.into_iter()
		.filter(|(key, _)| key.as_ref() != SIGNATURE_PARAM)
		.map(|(key, value)| (percent_encode(key.as_ref()), percent_encode(value.as_ref())))
		.collect::<Vec<_>>();

	pairs.sort();

	let mut buf = String::new();

	for (idx, (key, value)) in pairs.iter().enumerate() {
		if idx > 0 {
			buf.push('&');
		}

		buf.push_str(key);
		buf.push('=');
		buf.push_str(value);
	}

	buf
}

/// Base string URI: lowercase scheme and host, default port omitted, no query or fragment.
pub fn base_string_uri(url: &Url) -> String {
	let mut base = url.clone();

	base.set_query(None);
	base.set_fragment(None);

	base.to_string()
}
