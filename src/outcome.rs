//! LTI 1.1 Outcomes service: grade records, the POX envelope codec, and the signing client.

pub mod client;
pub mod envelope;
pub mod record;

pub use client::*;
pub use envelope::*;
pub use record::*;
