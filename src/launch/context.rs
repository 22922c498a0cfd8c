//! Per-launch identity and placement data supplied by the surrounding web layer.

// self
use crate::{
	_prelude::*,
	auth::{ContextId, ResourceLinkId, Role, UserId},
	error::ValidationError,
	outcome::GradeReturn,
};

/// Identifies one launch attempt. Immutable once built; discarded after signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchContext {
	/// Launching user.
	pub user_id: UserId,
	/// Role passed through as `roles`.
	pub role: Role,
	/// Course or context.
	pub context_id: ContextId,
	/// Placed link being launched.
	pub resource_link_id: ResourceLinkId,
	/// Optional `context_title`.
	pub context_title: Option<String>,
	/// Optional `context_label`.
	pub context_label: Option<String>,
	/// Caller-supplied grade-return target; never defaulted.
	pub grade_return: Option<GradeReturn>,
	/// Optional `launch_presentation_return_url`.
	pub return_url: Option<Url>,
	/// Raw custom parameter names and values, normalized to `custom_*` at signing time.
	pub custom: BTreeMap<String, String>,
}
impl LaunchContext {
	/// Creates a context carrying only the mandatory fields.
	pub fn new(
		user_id: UserId,
		role: Role,
		context_id: ContextId,
		resource_link_id: ResourceLinkId,
	) -> Self {
		Self {
			user_id,
			role,
			context_id,
			resource_link_id,
			context_title: None,
			context_label: None,
			grade_return: None,
			return_url: None,
			custom: BTreeMap::new(),
		}
	}

	/// Parses raw form values; any empty or malformed field is a [`ValidationError`].
	pub fn parse(
		user_id: &str,
		role: &str,
		context_id: &str,
		resource_link_id: &str,
	) -> Result<Self, ValidationError> {
		Ok(Self::new(
			UserId::new(user_id)?,
			role.parse()?,
			ContextId::new(context_id)?,
			ResourceLinkId::new(resource_link_id)?,
		))
	}

	/// Sets `context_title`. Empty strings are treated as absent.
	pub fn with_context_title(mut self, title: impl Into<String>) -> Self {
		self.context_title = Some(title.into()).filter(|value| !value.is_empty());

		self
	}

	/// Sets `context_label`. Empty strings are treated as absent.
	pub fn with_context_label(mut self, label: impl Into<String>) -> Self {
		self.context_label = Some(label.into()).filter(|value| !value.is_empty());

		self
	}

	/// Attaches the grade-return target supplied by the caller.
	pub fn with_grade_return(mut self, grade_return: GradeReturn) -> Self {
		self.grade_return = Some(grade_return);

		self
	}

	/// Sets `launch_presentation_return_url`.
	pub fn with_return_url(mut self, url: Url) -> Self {
		self.return_url = Some(url);

		self
	}

	/// Adds a custom parameter; `name` is normalized when the launch is built.
	pub fn with_custom_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.custom.insert(name.into(), value.into());

		self
	}
}

/// Maps a custom parameter name to its wire form: lowercase, every non-alphanumeric ASCII
/// character replaced by `_`, prefixed with `custom_`.
pub fn custom_param_name(name: &str) -> Result<String, ValidationError> {
	let trimmed = name.strip_prefix("custom_").unwrap_or(name);

	if trimmed.is_empty() {
		return Err(ValidationError::InvalidCustomParameter { name: name.to_owned() });
	}

	let normalized = trimmed
		.chars()
		.map(|ch| if ch.is_ascii_alphanumeric() { ch.to_ascii_lowercase() } else { '_' })
		.collect::<String>();

	Ok(format!("custom_{normalized}"))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parse_rejects_missing_required_fields() {
		assert!(LaunchContext::parse("u1", "Learner", "c1", "r1").is_ok());
		assert!(matches!(
			LaunchContext::parse("", "Learner", "c1", "r1"),
			Err(ValidationError::Identifier(_))
		));
		assert!(matches!(
			LaunchContext::parse("u1", "", "c1", "r1"),
			Err(ValidationError::EmptyRole)
		));
		assert!(LaunchContext::parse("u1", "Learner", "c1", "").is_err());
	}

	#[test]
	fn optional_fields_ignore_empty_strings() {
		let context = LaunchContext::parse("u1", "Learner", "c1", "r1")
			.expect("Fixture context is valid.")
			.with_context_title("")
			.with_context_label("PSY101");

		assert_eq!(context.context_title, None);
		assert_eq!(context.context_label.as_deref(), Some("PSY101"));
	}

	#[test]
	fn custom_names_are_normalized() {
		assert_eq!(custom_param_name("Chapter-Number").as_deref(), Ok("custom_chapter_number"));
		assert_eq!(custom_param_name("custom_Level 2").as_deref(), Ok("custom_level_2"));
		assert!(custom_param_name("custom_").is_err());
		assert!(custom_param_name("").is_err());
	}
}
