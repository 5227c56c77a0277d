//! Authentication and authorization
//!
//! - [`JwtService`] - session token service (access/refresh pair)
//! - [`CurrentUser`] - current caller context
//! - [`require_auth`] / [`require_admin`] / [`require_vendor`] - middleware

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_vendor};
