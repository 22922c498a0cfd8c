//! LTI roles passed through to the tool provider verbatim.

// self
use crate::{_prelude::*, error::ValidationError};

/// Role of the launching user, rendered into the `roles` launch parameter.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
	/// Course instructor.
	Instructor,
	/// Course learner.
	Learner,
	/// Any other role string (full URN or comma-separated list), passed through unchanged.
	Other(String),
}
impl Role {
	/// Returns the wire value for the `roles` parameter.
	pub fn as_str(&self) -> &str {
		match self {
			Role::Instructor => "Instructor",
			Role::Learner => "Learner",
			Role::Other(value) => value,
		}
	}
}
impl Debug for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Role({})", self.as_str())
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Role {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"" => Err(ValidationError::EmptyRole),
			"Instructor" => Ok(Role::Instructor),
			"Learner" => Ok(Role::Learner),
			other => Ok(Role::Other(other.to_owned())),
		}
	}
}
impl TryFrom<String> for Role {
	type Error = ValidationError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
impl From<Role> for String {
	fn from(value: Role) -> Self {
		match value {
			Role::Other(raw) => raw,
			known => known.as_str().to_owned(),
		}
	}
}
