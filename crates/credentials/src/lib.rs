//! Google service-account and authorized-user credentials, and the two ways
//! this workspace turns them into tokens:
//!
//! - [`AccessTokenMinter`] exchanges a credentials file for an OAuth2 bearer
//!   access token at the file's `token_uri`.
//! - [`CustomTokenMinter`] signs a Firebase custom token locally with a
//!   service account's private key.
//!
//! Both implement [`TokenMinter`], which is the only thing the HTTP layer sees.

pub mod access_token;
pub mod custom_token;
pub mod error;
pub mod file;
pub mod minter;

pub use access_token::AccessTokenMinter;
pub use custom_token::CustomTokenMinter;
pub use error::CredentialError;
pub use file::{AuthorizedUser, CredentialsFile, ServiceAccount};
pub use minter::TokenMinter;
