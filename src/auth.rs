//! Launch identities, roles, and the consumer credential used as HMAC key material.

pub mod credential;
pub mod id;
pub mod role;

pub use credential::*;
pub use id::*;
pub use role::*;
