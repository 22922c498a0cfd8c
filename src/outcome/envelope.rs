//! IMS POX envelope codec for the LTI 1.1 Outcomes service.
//!
//! Requests are rendered from a fixed template with every text node escaped. Responses are
//! read with a streaming parser that tolerates namespace prefixes and unknown elements but
//! refuses anything that is not a well-formed `imsx_POXEnvelopeResponse`.

// crates.io
use quick_xml::{Reader, escape::escape, events::Event};
use uuid::Uuid;
// self
use crate::{_prelude::*, auth::SourcedId, outcome::record::Score};

/// Namespace of the LTI 1.1 Outcomes (`imsoms_v1p0`) envelope.
pub const IMSOMS_NAMESPACE: &str = "http://www.imsglobal.org/services/ltiv1p1/xsd/imsoms_v1p0";

const RESPONSE_ROOT: &str = "imsx_POXEnvelopeResponse";

/// Operation carried in the envelope body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OutcomeOperation {
	/// Store (or overwrite) the score for a sourced id.
	ReplaceResult(Score),
	/// Fetch the stored score.
	ReadResult,
	/// Remove the stored score.
	DeleteResult,
}
impl OutcomeOperation {
	/// Stable label without the `Request`/`Response` suffix.
	pub const fn as_str(self) -> &'static str {
		match self {
			OutcomeOperation::ReplaceResult(_) => "replaceResult",
			OutcomeOperation::ReadResult => "readResult",
			OutcomeOperation::DeleteResult => "deleteResult",
		}
	}
}
impl Display for OutcomeOperation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// `imsx_codeMajor` values defined by the IMS POX binding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CodeMajor {
	/// The operation succeeded.
	Success,
	/// The operation was accepted and is still running.
	Processing,
	/// The operation failed.
	Failure,
	/// The provider does not implement the operation.
	Unsupported,
	/// Any value outside the enumeration, kept verbatim.
	Other(String),
}
impl CodeMajor {
	/// Wire value.
	pub fn as_str(&self) -> &str {
		match self {
			CodeMajor::Success => "success",
			CodeMajor::Processing => "processing",
			CodeMajor::Failure => "failure",
			CodeMajor::Unsupported => "unsupported",
			CodeMajor::Other(raw) => raw,
		}
	}

	/// Returns `true` only for `success`.
	pub fn is_success(&self) -> bool {
		matches!(self, CodeMajor::Success)
	}
}
impl From<&str> for CodeMajor {
	fn from(value: &str) -> Self {
		match value {
			"success" => CodeMajor::Success,
			"processing" => CodeMajor::Processing,
			"failure" => CodeMajor::Failure,
			"unsupported" => CodeMajor::Unsupported,
			other => CodeMajor::Other(other.to_owned()),
		}
	}
}
impl Display for CodeMajor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Decoding failures. The caller still holds the raw status and body.
#[derive(Debug, ThisError)]
pub enum EnvelopeError {
	/// The body is not well-formed XML.
	#[error("Outcome response is not well-formed XML.")]
	Xml(#[from] quick_xml::Error),
	/// The body holds no root element.
	#[error("Outcome response is empty.")]
	MissingRoot,
	/// The root element is not `imsx_POXEnvelopeResponse`.
	#[error("Outcome response root is `{found}`, expected `imsx_POXEnvelopeResponse`.")]
	UnexpectedRoot {
		/// Local name of the root element.
		found: String,
	},
	/// The document ended with open elements.
	#[error("Outcome response ended before `{open}` was closed.")]
	Truncated {
		/// Innermost unclosed element.
		open: String,
	},
	/// A returned score is not a decimal number in `0.0..=1.0`.
	#[error("Outcome response carries an invalid score `{value}`.")]
	InvalidScore {
		/// Raw `textString` content.
		value: String,
	},
}

/// Fields decoded from an `imsx_POXEnvelopeResponse`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutcomeEnvelope {
	/// `imsx_codeMajor`, absent when the provider omitted it.
	pub code_major: Option<CodeMajor>,
	/// `imsx_severity` (`status`, `warning`, `error`).
	pub severity: Option<String>,
	/// Human-readable `imsx_description`.
	pub description: Option<String>,
	/// The response's own `imsx_messageIdentifier`.
	pub message_id: Option<String>,
	/// `imsx_messageRefIdentifier`, echoing the request's message id.
	pub message_ref_id: Option<String>,
	/// `imsx_operationRefIdentifier`, e.g. `replaceResult`.
	pub operation_ref: Option<String>,
	/// Local name of the body element, e.g. `replaceResultResponse`.
	pub body_operation: Option<String>,
	/// Score returned by `readResult`; `None` when no grade is stored.
	pub score: Option<f64>,
}
impl OutcomeEnvelope {
	/// Returns `true` when the provider reported `imsx_codeMajor = success`.
	pub fn is_success(&self) -> bool {
		self.code_major.as_ref().is_some_and(CodeMajor::is_success)
	}
}

/// Draws a fresh `imsx_messageIdentifier`.
pub fn new_message_id() -> String {
	Uuid::new_v4().to_string()
}

/// Encodes a `replaceResultRequest`. The score must already be validated.
pub fn encode_replace_result(sourced_id: &SourcedId, score: Score, message_id: &str) -> String {
	encode_request(OutcomeOperation::ReplaceResult(score), sourced_id, message_id)
}

/// Encodes any supported outcome request.
pub fn encode_request(
	operation: OutcomeOperation,
	sourced_id: &SourcedId,
	message_id: &str,
) -> String {
	let op = operation.as_str();
	let mut xml = String::with_capacity(1024);

	xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
	xml.push_str(&format!("<imsx_POXEnvelopeRequest xmlns=\"{IMSOMS_NAMESPACE}\">\n"));
	xml.push_str("  <imsx_POXHeader>\n");
	xml.push_str("    <imsx_POXRequestHeaderInfo>\n");
	xml.push_str("      <imsx_version>V1.0</imsx_version>\n");
	xml.push_str(&format!(
		"      <imsx_messageIdentifier>{}</imsx_messageIdentifier>\n",
		escape(message_id)
	));
	xml.push_str("    </imsx_POXRequestHeaderInfo>\n");
	xml.push_str("  </imsx_POXHeader>\n");
	xml.push_str("  <imsx_POXBody>\n");
	xml.push_str(&format!("    <{op}Request>\n"));
	xml.push_str("      <resultRecord>\n");
	xml.push_str(&format!(
		"        <sourcedGUID><sourcedId>{}</sourcedId></sourcedGUID>\n",
		escape(sourced_id.as_ref())
	));

	if let OutcomeOperation::ReplaceResult(score) = operation {
		xml.push_str("        <result>\n");
		xml.push_str("          <resultScore>\n");
		xml.push_str("            <language>en</language>\n");
		xml.push_str(&format!("            <textString>{score}</textString>\n"));
		xml.push_str("          </resultScore>\n");
		xml.push_str("        </result>\n");
	}

	xml.push_str("      </resultRecord>\n");
	xml.push_str(&format!("    </{op}Request>\n"));
	xml.push_str("  </imsx_POXBody>\n");
	xml.push_str("</imsx_POXEnvelopeRequest>\n");

	xml
}

/// Decodes a provider response envelope.
pub fn decode_response(xml: &str) -> Result<OutcomeEnvelope, EnvelopeError> {
	let mut reader = Reader::from_str(xml);

	reader.config_mut().trim_text(true);

	let mut envelope = OutcomeEnvelope::default();
	let mut stack = Vec::<String>::new();
	let mut seen_root = false;

	loop {
		match reader.read_event()? {
			Event::Start(start) => {
				let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

				open_element(&mut envelope, &mut stack, &mut seen_root, name)?;
			},
			Event::Empty(start) => {
				let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

				open_element(&mut envelope, &mut stack, &mut seen_root, name)?;
				stack.pop();
			},
			Event::End(_) => {
				stack.pop();
			},
			Event::Text(text) => {
				let value = text.unescape()?;

				capture_text(&mut envelope, &stack, value.trim())?;
			},
			Event::CData(data) => {
				let value = String::from_utf8_lossy(&data.into_inner()).into_owned();

				capture_text(&mut envelope, &stack, value.trim())?;
			},
			Event::Eof => break,
			_ => {},
		}
	}

	if let Some(open) = stack.pop() {
		return Err(EnvelopeError::Truncated { open });
	}
	if !seen_root {
		return Err(EnvelopeError::MissingRoot);
	}

	Ok(envelope)
}

fn open_element(
	envelope: &mut OutcomeEnvelope,
	stack: &mut Vec<String>,
	seen_root: &mut bool,
	name: String,
) -> Result<(), EnvelopeError> {
	if stack.is_empty() {
		if *seen_root || name != RESPONSE_ROOT {
			return Err(EnvelopeError::UnexpectedRoot { found: name });
		}

		*seen_root = true;
	}
	if envelope.body_operation.is_none() && stack.last().is_some_and(|parent| parent == "imsx_POXBody")
	{
		envelope.body_operation = Some(name.clone());
	}

	stack.push(name);

	Ok(())
}

fn capture_text(
	envelope: &mut OutcomeEnvelope,
	stack: &[String],
	value: &str,
) -> Result<(), EnvelopeError> {
	let Some(current) = stack.last() else {
		return Ok(());
	};
	let parent = stack.len().checked_sub(2).and_then(|idx| stack.get(idx)).map(String::as_str);

	match (current.as_str(), parent) {
		("imsx_codeMajor", _) => envelope.code_major = Some(CodeMajor::from(value)),
		("imsx_severity", _) => envelope.severity = Some(value.to_owned()),
		("imsx_description", _) => envelope.description = Some(value.to_owned()),
		("imsx_messageIdentifier", Some("imsx_POXResponseHeaderInfo")) =>
			envelope.message_id = Some(value.to_owned()),
		("imsx_messageRefIdentifier", _) => envelope.message_ref_id = Some(value.to_owned()),
		("imsx_operationRefIdentifier", _) => envelope.operation_ref = Some(value.to_owned()),
		("textString", Some("resultScore")) if !value.is_empty() => {
			let score = value
				.parse::<f64>()
				.ok()
				.and_then(|parsed| Score::new(parsed).ok())
				.ok_or_else(|| EnvelopeError::InvalidScore { value: value.to_owned() })?;

			envelope.score = Some(score.value());
		},
		_ => {},
	}

	Ok(())
}
