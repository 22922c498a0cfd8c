//! Grade-return targets captured at launch time and the records sent at grading time.

// self
use crate::{_prelude::*, auth::SourcedId, config, error::ValidationError};

/// Launch parameter naming the result sourced id.
pub const SOURCED_ID_PARAM: &str = "lis_result_sourcedid";
/// Launch parameter naming the outcome service endpoint.
pub const SERVICE_URL_PARAM: &str = "lis_outcome_service_url";

/// Score already checked to lie within `[0.0, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(into = "f64")]
pub struct Score(f64);
impl Score {
	/// Lowest accepted score.
	pub const MIN: f64 = 0.0;
	/// Highest accepted score.
	pub const MAX: f64 = 1.0;

	/// Validates `value`. NaN and anything outside `[0.0, 1.0]` is a caller error; nothing is
	/// clamped.
	pub fn new(value: f64) -> Result<Self, ValidationError> {
		if (Self::MIN..=Self::MAX).contains(&value) {
			// `-0.0 + 0.0` is `+0.0`, so a negative zero never reaches the wire.
			Ok(Self(value + 0.0))
		} else {
			Err(ValidationError::ScoreOutOfRange { score: value })
		}
	}

	/// Returns the raw value.
	pub fn value(self) -> f64 {
		self.0
	}
}
impl From<Score> for f64 {
	fn from(value: Score) -> Self {
		value.0
	}
}
impl TryFrom<f64> for Score {
	type Error = ValidationError;

	fn try_from(value: f64) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl Display for Score {
	// Whole values keep one fractional digit (`1.0`, `0.0`) so providers parsing a decimal
	// always see one.
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		if self.0.fract() == 0.0 { write!(f, "{:.1}", self.0) } else { write!(f, "{}", self.0) }
	}
}

/// Where and for whom a grade may later be posted; produced when a launch carries outcome
/// fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeReturn {
	/// Opaque id echoed back to the provider.
	pub sourced_id: SourcedId,
	/// Outcome service endpoint supplied by the launch.
	pub outcome_service_url: Url,
}
impl GradeReturn {
	/// Creates a target after checking the service URL is HTTP(S).
	pub fn new(sourced_id: SourcedId, outcome_service_url: Url) -> Result<Self, ValidationError> {
		if !config::is_http_url(&outcome_service_url) {
			return Err(ValidationError::InvalidUrl {
				field: "outcome service",
				value: outcome_service_url.into(),
			});
		}

		Ok(Self { sourced_id, outcome_service_url })
	}

	/// Extracts grade-return fields from inbound form parameters.
	///
	/// Returns `Ok(None)` unless both `lis_result_sourcedid` and `lis_outcome_service_url` are
	/// present and non-empty (instructor launches typically carry neither).
	pub fn from_params<I, K, V>(params: I) -> Result<Option<Self>, ValidationError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let mut sourced_id = None;
		let mut service_url = None;

		for (key, value) in params {
			let value = value.as_ref();

			if value.is_empty() {
				continue;
			}

			match key.as_ref() {
				SOURCED_ID_PARAM => sourced_id = Some(value.to_owned()),
				SERVICE_URL_PARAM => service_url = Some(value.to_owned()),
				_ => {},
			}
		}

		let (Some(sourced_id), Some(service_url)) = (sourced_id, service_url) else {
			return Ok(None);
		};
		let url = Url::parse(&service_url).map_err(|_| ValidationError::InvalidUrl {
			field: "outcome service",
			value: service_url.clone(),
		})?;

		Self::new(SourcedId::new(sourced_id)?, url).map(Some)
	}

	/// Pairs this target with a score to send.
	pub fn with_score(&self, score: f64) -> GradePassbackRecord {
		GradePassbackRecord {
			sourced_id: self.sourced_id.clone(),
			outcome_service_url: self.outcome_service_url.clone(),
			score,
		}
	}
}

/// One grade to report. `score` is validated by the client before any signing or I/O.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradePassbackRecord {
	/// Opaque id echoed back to the provider.
	pub sourced_id: SourcedId,
	/// Outcome service endpoint.
	pub outcome_service_url: Url,
	/// Score in `[0.0, 1.0]`.
	pub score: f64,
}
impl GradePassbackRecord {
	/// Validates and returns the score.
	pub fn validated_score(&self) -> Result<Score, ValidationError> {
		Score::new(self.score)
	}
}
