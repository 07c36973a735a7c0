//! `stockroom-auth` — authentication/authorization core.
//!
//! This crate owns session issuance and rotation, the two password-recovery
//! paths, the invitation/activation workflow and permission resolution. It is
//! intentionally decoupled from HTTP and storage: persistence, hashing and
//! mail dispatch are consumed through the traits in [`store`].

pub mod config;
pub mod group;
pub mod invitation;
pub mod principal;
pub mod recovery;
pub mod recovery_code;
pub mod resolver;
pub mod rule;
pub mod session;
pub mod store;
pub mod token;

pub use config::{AuthConfig, TokenConfig, TokenKindConfig};
pub use group::Group;
pub use invitation::InvitationManager;
pub use principal::{Principal, PrincipalProfile, SessionPair};
pub use recovery::RecoveryFlowManager;
pub use recovery_code::{RecoveryCode, RecoverySecretManager};
pub use resolver::PermissionResolver;
pub use rule::{Action, PermissionRule};
pub use session::{AuthSessionManager, LoginOutcome};
pub use store::{GroupStore, MailSender, MailTemplate, OutboundMail, PasswordHasher, PrincipalStore};
pub use token::{Claims, TokenKind, TokenService};
