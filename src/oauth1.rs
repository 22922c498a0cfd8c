//! RFC 5849 (OAuth 1.0a) HMAC-SHA1 request signing, limited to consumer-only credentials.
//!
//! Launches sign their form parameters directly. Outcome posts sign the `oauth_*` set, plus
//! `oauth_body_hash` when [`BodySigning::BodyHash`](crate::config::BodySigning) is configured,
//! and ship the result as an `Authorization` header built by [`authorization_header`].

pub mod encode;
pub mod params;
pub mod signer;

pub use encode::*;
pub use params::*;
pub use signer::*;
