//! Test double that answers every lookup with one preconfigured target.

// self
use crate::{
	auth::{ResourceLinkId, UserId},
	outcome::GradeReturn,
	store::{GradebookStore, StoreFuture},
};

/// Returns the same [`GradeReturn`] for every (user, resource link) pair and ignores writes.
///
/// Only compiled for tests and the `test` feature, so fixed sourced ids and service URLs never
/// reach a production launch.
#[derive(Clone, Debug)]
pub struct FixedGradebook(GradeReturn);
impl FixedGradebook {
	/// Wraps the target returned by every lookup.
	pub fn new(grade_return: GradeReturn) -> Self {
		Self(grade_return)
	}
}
impl GradebookStore for FixedGradebook {
	fn put<'a>(
		&'a self,
		_user: &'a UserId,
		_resource_link: &'a ResourceLinkId,
		_grade_return: GradeReturn,
	) -> StoreFuture<'a, ()> {
		Box::pin(async move { Ok(()) })
	}

	fn get<'a>(
		&'a self,
		_user: &'a UserId,
		_resource_link: &'a ResourceLinkId,
	) -> StoreFuture<'a, Option<GradeReturn>> {
		let grade_return = self.0.clone();

		Box::pin(async move { Ok(Some(grade_return)) })
	}

	fn remove<'a>(
		&'a self,
		_user: &'a UserId,
		_resource_link: &'a ResourceLinkId,
	) -> StoreFuture<'a, Option<GradeReturn>> {
		let grade_return = self.0.clone();

		Box::pin(async move { Ok(Some(grade_return)) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_prelude::*, auth::SourcedId};

	#[tokio::test]
	async fn every_lookup_returns_the_fixture() {
		let fixture = GradeReturn::new(
			SourcedId::new("fixture-sourced-id").expect("Sourced id fixture should be valid."),
			Url::parse("http://localhost/outcome").expect("Fixture URL should parse."),
		)
		.expect("Grade return fixture should be valid.");
		let store = FixedGradebook::new(fixture.clone());
		let user = UserId::new("anyone").expect("User fixture should be valid.");
		let link = ResourceLinkId::new("anything").expect("Resource link fixture should be valid.");

		store.put(&user, &link, fixture.clone()).await.expect("Put should succeed.");

		assert_eq!(store.get(&user, &link).await.expect("Get should succeed."), Some(fixture));
	}
}
