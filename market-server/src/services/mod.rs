//! External collaborators
//!
//! The backend delegates identity verification, payment processing and
//! image hosting to external services. Each collaborator is an explicitly
//! constructed client built once at startup and injected through
//! [`crate::core::ServerState`] — no ambient singletons.

pub mod assets;
pub mod identity;
pub mod payments;

pub use assets::AssetHost;
pub use identity::{IdentityResolver, VerifiedIdentity};
pub use payments::{PaymentGateway, PaymentIntent};
