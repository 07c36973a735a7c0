//! `stockroom-core` — foundation building blocks for the auth core.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod clock;
pub mod error;
pub mod id;

pub use clock::{Clock, SystemClock};
pub use error::{AuthError, AuthResult};
pub use id::{GroupId, PrincipalId};
