//! `stockdesk-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod claims;
pub mod permissions;
pub mod roles;
pub mod token;

pub use authorize::{authorize, role_permissions, AuthzError, Principal};
pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use permissions::Permission;
pub use roles::Role;
pub use token::Hs256TokenCodec;
