//! LTI 1.1 basic launch: the per-launch context and the signed parameter builder.

pub mod builder;
pub mod context;

pub use builder::*;
pub use context::*;
