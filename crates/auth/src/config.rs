//! Configuration values consumed by the auth core.
//!
//! Values only: loading (env, files, flags) is a collaborator concern.

use serde::Deserialize;

use crate::token::TokenKind;

/// Secret and TTL for one token kind.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenKindConfig {
    pub secret: String,
    pub ttl_secs: u64,
}

impl TokenKindConfig {
    pub fn new(secret: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }
}

/// Per-kind token configuration.
///
/// Each kind uses a distinct secret so that compromising one kind's secret
/// cannot forge another kind's tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    pub access: TokenKindConfig,
    pub refresh: TokenKindConfig,
    pub password_recovery: TokenKindConfig,
    pub invite: TokenKindConfig,
}

impl TokenConfig {
    /// Default TTLs: access 15 min, refresh 7 days, password recovery 30 min.
    /// The invite token's TTL is generous on purpose; the real expiry for the
    /// invitation flow is the activation window checked against `invited_at`.
    pub fn with_secrets(
        access: impl Into<String>,
        refresh: impl Into<String>,
        password_recovery: impl Into<String>,
        invite: impl Into<String>,
    ) -> Self {
        Self {
            access: TokenKindConfig::new(access, 15 * 60),
            refresh: TokenKindConfig::new(refresh, 7 * 24 * 60 * 60),
            password_recovery: TokenKindConfig::new(password_recovery, 30 * 60),
            invite: TokenKindConfig::new(invite, 24 * 60 * 60),
        }
    }

    pub fn for_kind(&self, kind: TokenKind) -> &TokenKindConfig {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
            TokenKind::PasswordRecovery => &self.password_recovery,
            TokenKind::Invite => &self.invite,
        }
    }
}

/// Everything the managers need, in one place.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub tokens: TokenConfig,

    /// When set, `refresh` rotates the refresh token as well; otherwise the
    /// existing refresh token is kept and only the access token is renewed.
    #[serde(default)]
    pub single_session_refresh: bool,

    /// Validity window for recovery codes (default 1 hour).
    #[serde(default = "defaults::recovery_code_ttl_secs")]
    pub recovery_code_ttl_secs: u64,

    /// Wall-clock activation window measured from `invited_at` (default
    /// 5 minutes, exclusive at the boundary).
    #[serde(default = "defaults::activation_window_secs")]
    pub activation_window_secs: u64,

    /// Base URL embedded in recovery emails; the token is appended.
    #[serde(default = "defaults::recovery_link_base")]
    pub recovery_link_base: String,

    /// Base URL embedded in invitation emails; the token is appended.
    #[serde(default = "defaults::invite_link_base")]
    pub invite_link_base: String,

    /// Group whose permission set is assigned on activation.
    #[serde(default = "defaults::default_group")]
    pub default_group: String,
}

impl AuthConfig {
    pub fn new(tokens: TokenConfig) -> Self {
        Self {
            tokens,
            single_session_refresh: false,
            recovery_code_ttl_secs: defaults::recovery_code_ttl_secs(),
            activation_window_secs: defaults::activation_window_secs(),
            recovery_link_base: defaults::recovery_link_base(),
            invite_link_base: defaults::invite_link_base(),
            default_group: defaults::default_group(),
        }
    }
}

mod defaults {
    pub fn recovery_code_ttl_secs() -> u64 {
        60 * 60
    }

    pub fn activation_window_secs() -> u64 {
        5 * 60
    }

    pub fn recovery_link_base() -> String {
        "/auth/recover".to_string()
    }

    pub fn invite_link_base() -> String {
        "/auth/activate".to_string()
    }

    pub fn default_group() -> String {
        "default".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttls_match_the_documented_windows() {
        let tokens = TokenConfig::with_secrets("a", "b", "c", "d");
        assert_eq!(tokens.access.ttl_secs, 900);
        assert_eq!(tokens.refresh.ttl_secs, 604_800);
        assert_eq!(tokens.password_recovery.ttl_secs, 1_800);

        let cfg = AuthConfig::new(tokens);
        assert_eq!(cfg.recovery_code_ttl_secs, 3_600);
        assert_eq!(cfg.activation_window_secs, 300);
        assert!(!cfg.single_session_refresh);
    }

    #[test]
    fn deserializes_with_defaults() {
        let cfg: AuthConfig = serde_json::from_value(serde_json::json!({
            "tokens": {
                "access": { "secret": "a", "ttl_secs": 900 },
                "refresh": { "secret": "b", "ttl_secs": 604800 },
                "password_recovery": { "secret": "c", "ttl_secs": 1800 },
                "invite": { "secret": "d", "ttl_secs": 86400 }
            }
        }))
        .unwrap();

        assert_eq!(cfg.default_group, "default");
        assert_eq!(cfg.activation_window_secs, 300);
    }
}
