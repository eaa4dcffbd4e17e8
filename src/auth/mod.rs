//! API credentials for the parser service
//!
//! The service needs an Upstage key and an OpenAI key on every parse
//! request. This module only models them; where they come from is decided
//! by the configuration layer.
//!
//! # Examples
//!
//! ```rust
//! use teddynote_parser_client::auth::ApiCredentials;
//!
//! let creds = ApiCredentials::new(Some("up-key".into()), None);
//! assert!(!creds.status().has_credentials());
//! assert!(creds.require().is_err());
//! ```

pub mod credentials;

// Re-export main public API
pub use credentials::{ApiCredentials, AuthStatus, ResolvedKeys};
