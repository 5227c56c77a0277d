//! Market Server - marketplace backend
//!
//! # Architecture overview
//!
//! - **API** (`api`): RESTful routes and handlers per entity
//! - **Auth** (`auth`): external-identity sign-in, JWT session pair, role middleware
//! - **Database** (`db`): embedded SurrealDB models and repositories
//! - **Moderation** (`moderation`): the approve/reject state machine shared
//!   by products, vendor applications and ads
//! - **Services** (`services`): injected clients for the identity provider,
//!   payment gateway and asset host
//!
//! # Module structure
//!
//! ```text
//! market-server/src/
//! ├── core/          # configuration, state, server
//! ├── auth/          # JWT sessions, role middleware
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models and repositories
//! ├── moderation.rs  # shared decision engine
//! ├── services/      # external collaborators
//! └── utils/         # logging, validation, errors
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod moderation;
pub mod services;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Set up the process environment: dotenv and logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
