//! API key handling for the parser service
//!
//! Submitting a document needs two keys: one for the Upstage OCR/layout
//! backend and one for the OpenAI backend the service uses for
//! post-processing. Keys are passed through opaquely; they are never stored
//! by this crate and never printed.

use std::fmt;

use crate::constants::env as env_constants;
use crate::errors::{ClientError, ClientResult};

/// The two API keys forwarded to the parser service
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiCredentials {
    upstage_api_key: Option<String>,
    openai_api_key: Option<String>,
}

/// Borrowed view of a complete key pair, obtained through [`ApiCredentials::require`]
#[derive(Clone, Copy)]
pub struct ResolvedKeys<'a> {
    pub upstage: &'a str,
    pub openai: &'a str,
}

impl ApiCredentials {
    /// Build credentials from optional keys; blank strings count as absent
    pub fn new(upstage_api_key: Option<String>, openai_api_key: Option<String>) -> Self {
        Self {
            upstage_api_key: upstage_api_key.filter(|k| !k.trim().is_empty()),
            openai_api_key: openai_api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Keep already-set keys and fill the missing ones from `other`
    pub fn or(self, other: ApiCredentials) -> Self {
        Self {
            upstage_api_key: self.upstage_api_key.or(other.upstage_api_key),
            openai_api_key: self.openai_api_key.or(other.openai_api_key),
        }
    }

    /// Both keys, or `MissingCredential` naming the first absent one
    pub fn require(&self) -> ClientResult<ResolvedKeys<'_>> {
        let upstage = self
            .upstage_api_key
            .as_deref()
            .ok_or(ClientError::MissingCredential {
                name: "Upstage",
                env_var: env_constants::UPSTAGE_API_KEY,
            })?;
        let openai = self
            .openai_api_key
            .as_deref()
            .ok_or(ClientError::MissingCredential {
                name: "OpenAI",
                env_var: env_constants::OPENAI_API_KEY,
            })?;
        Ok(ResolvedKeys { upstage, openai })
    }

    /// Presence summary for diagnostics
    pub fn status(&self) -> AuthStatus {
        AuthStatus {
            upstage_set: self.upstage_api_key.is_some(),
            openai_set: self.openai_api_key.is_some(),
        }
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(key: &Option<String>) -> &'static str {
            if key.is_some() {
                "<redacted>"
            } else {
                "<unset>"
            }
        }
        f.debug_struct("ApiCredentials")
            .field("upstage_api_key", &redact(&self.upstage_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .finish()
    }
}

/// Authentication status information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthStatus {
    /// Whether the Upstage key is configured
    pub upstage_set: bool,
    /// Whether the OpenAI key is configured
    pub openai_set: bool,
}

impl AuthStatus {
    /// Check if both keys are available
    pub fn has_credentials(&self) -> bool {
        self.upstage_set && self.openai_set
    }

    /// Get descriptive status message for display
    pub fn status_message(&self) -> String {
        match (self.upstage_set, self.openai_set) {
            (true, true) => "API keys configured".to_string(),
            (false, true) => format!("Missing {}", env_constants::UPSTAGE_API_KEY),
            (true, false) => format!("Missing {}", env_constants::OPENAI_API_KEY),
            (false, false) => format!(
                "Missing {} and {}",
                env_constants::UPSTAGE_API_KEY,
                env_constants::OPENAI_API_KEY
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_both_keys() {
        let creds = ApiCredentials::new(Some("up".into()), Some("oa".into()));
        let keys = creds.require().unwrap();
        assert_eq!(keys.upstage, "up");
        assert_eq!(keys.openai, "oa");
        assert!(creds.status().has_credentials());
    }

    #[test]
    fn test_require_reports_missing_key() {
        let creds = ApiCredentials::new(Some("up".into()), None);
        match creds.require() {
            Err(ClientError::MissingCredential { env_var, .. }) => {
                assert_eq!(env_var, env_constants::OPENAI_API_KEY)
            }
            other => panic!("Expected MissingCredential, got {:?}", other.map(|_| ())),
        }

        let creds = ApiCredentials::new(None, Some("oa".into()));
        assert!(matches!(
            creds.require(),
            Err(ClientError::MissingCredential { name: "Upstage", .. })
        ));
    }

    #[test]
    fn test_blank_keys_are_absent() {
        let creds = ApiCredentials::new(Some("  ".into()), Some(String::new()));
        assert_eq!(
            creds.status(),
            AuthStatus {
                upstage_set: false,
                openai_set: false
            }
        );
        let message = creds.status().status_message();
        assert!(message.contains(env_constants::UPSTAGE_API_KEY));
        assert!(message.contains(env_constants::OPENAI_API_KEY));
    }

    #[test]
    fn test_or_keeps_explicit_values() {
        let explicit = ApiCredentials::new(Some("cli".into()), None);
        let fallback = ApiCredentials::new(Some("env".into()), Some("env-oa".into()));
        let merged = explicit.or(fallback);
        let keys = merged.require().unwrap();
        assert_eq!(keys.upstage, "cli");
        assert_eq!(keys.openai, "env-oa");
    }

    #[test]
    fn test_debug_redacts_keys() {
        let creds = ApiCredentials::new(Some("secret-up".into()), None);
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("secret-up"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("<unset>"));
    }
}
