//! Auth-domain models: the discovered CDN endpoint and the bearer credential it issues.

pub mod cdn;
pub mod token;

pub use cdn::*;
pub use token::{secret::*, *};
