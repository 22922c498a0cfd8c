//! Thread-safe in-memory [`GradebookStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{ResourceLinkId, UserId},
	outcome::GradeReturn,
	store::{GradebookKey, GradebookStore, StoreFuture},
};

type GradebookMap = Arc<RwLock<HashMap<GradebookKey, GradeReturn>>>;

/// Process-local gradebook; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryGradebook(GradebookMap);
impl MemoryGradebook {
	/// Number of stored targets.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl GradebookStore for MemoryGradebook {
	fn put<'a>(
		&'a self,
		user: &'a UserId,
		resource_link: &'a ResourceLinkId,
		grade_return: GradeReturn,
	) -> StoreFuture<'a, ()> {
		let map = self.0.clone();
		let key = GradebookKey::new(user, resource_link);

		Box::pin(async move {
			map.write().insert(key, grade_return);

			Ok(())
		})
	}

	fn get<'a>(
		&'a self,
		user: &'a UserId,
		resource_link: &'a ResourceLinkId,
	) -> StoreFuture<'a, Option<GradeReturn>> {
		let map = self.0.clone();
		let key = GradebookKey::new(user, resource_link);

		Box::pin(async move { Ok(map.read().get(&key).cloned()) })
	}

	fn remove<'a>(
		&'a self,
		user: &'a UserId,
		resource_link: &'a ResourceLinkId,
	) -> StoreFuture<'a, Option<GradeReturn>> {
		let map = self.0.clone();
		let key = GradebookKey::new(user, resource_link);

		Box::pin(async move { Ok(map.write().remove(&key)) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::SourcedId;

	fn target(sourced_id: &str) -> GradeReturn {
		GradeReturn::new(
			SourcedId::new(sourced_id).expect("Sourced id fixture should be valid."),
			Url::parse("https://lms.example/outcome").expect("Fixture URL should parse."),
		)
		.expect("Grade return fixture should be valid.")
	}

	#[tokio::test]
	async fn put_replaces_and_get_is_keyed_per_link() {
		let store = MemoryGradebook::default();
		let user = UserId::new("u1").expect("User fixture should be valid.");
		let link_a = ResourceLinkId::new("r1").expect("Resource link fixture should be valid.");
		let link_b = ResourceLinkId::new("r2").expect("Resource link fixture should be valid.");

		store.put(&user, &link_a, target("first")).await.expect("Put should succeed.");
		store.put(&user, &link_a, target("second")).await.expect("Put should succeed.");

		let fetched = store.get(&user, &link_a).await.expect("Get should succeed.");

		assert_eq!(fetched, Some(target("second")));
		assert_eq!(store.get(&user, &link_b).await.expect("Get should succeed."), None);
		assert_eq!(store.len(), 1);

		let removed = store.remove(&user, &link_a).await.expect("Remove should succeed.");

		assert_eq!(removed, Some(target("second")));
		assert!(store.is_empty());
	}
}
