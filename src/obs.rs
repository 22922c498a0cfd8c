//! Optional observability helpers for launches and outcome calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `lti_bridge.operation` with the
//!   `operation` and `stage` (call site) fields.
//! - Enable `metrics` to increment the `lti_bridge_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LtiOperation {
	/// Signed launch parameter construction.
	Launch,
	/// `replaceResult` outcome POST.
	ReplaceResult,
	/// `readResult` outcome POST.
	ReadResult,
	/// `deleteResult` outcome POST.
	DeleteResult,
}
impl LtiOperation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LtiOperation::Launch => "launch",
			LtiOperation::ReplaceResult => "replace_result",
			LtiOperation::ReadResult => "read_result",
			LtiOperation::DeleteResult => "delete_result",
		}
	}
}
impl Display for LtiOperation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
