//! LTI 1.1 consumer core: sign tool launches with OAuth 1.0a HMAC-SHA1 and report grades back
//! through the IMS Outcomes service over any HTTP transport.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod launch;
pub mod oauth1;
pub mod obs;
pub mod outcome;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::ConsumerCredential, config::BodySigning, http::ReqwestHttpClient,
		outcome::OutcomeClient,
	};

	/// Consumer key shared by integration fixtures.
	pub const TEST_CONSUMER_KEY: &str = "K";
	/// Consumer secret shared by integration fixtures.
	pub const TEST_CONSUMER_SECRET: &str = "S";

	/// Outcome client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestOutcomeClient = OutcomeClient<ReqwestHttpClient>;

	/// Returns the fixture credential (`K` / `S`).
	pub fn test_credential() -> ConsumerCredential {
		ConsumerCredential::new(TEST_CONSUMER_KEY, TEST_CONSUMER_SECRET)
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs an [`OutcomeClient`] signing with the fixture credential over the reqwest
	/// transport used across integration tests.
	pub fn build_reqwest_test_outcome_client(signing: BodySigning) -> ReqwestTestOutcomeClient {
		OutcomeClient::with_http_client(test_credential(), test_reqwest_http_client())
			.with_body_signing(signing)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
