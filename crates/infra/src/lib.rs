//! Infrastructure adapters for the auth core.
//!
//! In-memory implementations of the collaborator contracts, intended for
//! tests/dev. Production adapters (SQL stores, SMTP transport) plug in behind
//! the same traits and are out of scope here.

pub mod clock;
pub mod hasher;
pub mod mailer;
pub mod memory;

pub use clock::ManualClock;
pub use hasher::BcryptHasher;
pub use mailer::RecordingMailSender;
pub use memory::{InMemoryGroupStore, InMemoryPrincipalStore};
