//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from the session
//!   cookie or a Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the administrator user type.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.

pub mod auth;
pub mod rbac;
