//! Gradebook collaborator contract: remembers where each launch may post its grade.
//!
//! Launch handling writes a [`GradeReturn`] keyed by (user, resource link); grading code reads
//! it back before calling [`OutcomeClient::send_grade`](crate::outcome::OutcomeClient::send_grade).

#[cfg(any(test, feature = "test"))] pub mod fixed;
pub mod memory;

#[cfg(any(test, feature = "test"))] pub use fixed::FixedGradebook;
pub use memory::MemoryGradebook;

// self
use crate::{
	_prelude::*,
	auth::{ResourceLinkId, UserId},
	outcome::GradeReturn,
};

/// Boxed future yielded by [`GradebookStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Keyed storage for grade-return targets.
pub trait GradebookStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the target for `user` + `resource_link`.
	fn put<'a>(
		&'a self,
		user: &'a UserId,
		resource_link: &'a ResourceLinkId,
		grade_return: GradeReturn,
	) -> StoreFuture<'a, ()>;

	/// Fetches the target for `user` + `resource_link`, if one was stored.
	fn get<'a>(
		&'a self,
		user: &'a UserId,
		resource_link: &'a ResourceLinkId,
	) -> StoreFuture<'a, Option<GradeReturn>>;

	/// Removes and returns the target for `user` + `resource_link`.
	fn remove<'a>(
		&'a self,
		user: &'a UserId,
		resource_link: &'a ResourceLinkId,
	) -> StoreFuture<'a, Option<GradeReturn>>;
}

/// Error type produced by [`GradebookStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Unique key identifying a stored grade-return target.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GradebookKey {
	/// Launching user.
	pub user: UserId,
	/// Launched resource link.
	pub resource_link: ResourceLinkId,
}
impl GradebookKey {
	/// Builds a key from its components.
	pub fn new(user: &UserId, resource_link: &ResourceLinkId) -> Self {
		Self { user: user.clone(), resource_link: resource_link.clone() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_crate_error_with_source() {
		let store_error = StoreError::Backend { message: "database unreachable".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("database unreachable"));

		let source = StdError::source(&error)
			.expect("Crate error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn gradebook_key_serializes_plain_ids() {
		let key = GradebookKey::new(
			&UserId::new("u1").expect("User fixture should be valid."),
			&ResourceLinkId::new("r1").expect("Resource link fixture should be valid."),
		);
		let payload = serde_json::to_string(&key).expect("Key should serialize to JSON.");

		assert_eq!(payload, r#"{"user":"u1","resource_link":"r1"}"#);
	}
}
