//! Catalog Server - e-commerce catalog API with dynamic pricing
//!
//! # Architecture
//!
//! - **Catalog** (`catalog`): filter normalization, query building,
//!   pagination and facets for listings and search
//! - **Pricing** (`pricing`): session-visit based dynamic pricing
//! - **Sessions** (`session`): in-memory per-browser visit ledger
//! - **Database** (`db`): embedded SurrealDB storage and repositories
//! - **Auth** (`auth`): JWT + Argon2 authentication
//! - **HTTP API** (`api`): RESTful endpoints
//!
//! # Module structure
//!
//! ```text
//! catalog-server/src/
//! ├── core/          # config, state, server lifecycle
//! ├── auth/          # JWT authentication and middleware
//! ├── api/           # HTTP routes and handlers
//! ├── catalog/       # query building, pagination, facets
//! ├── pricing/       # dynamic price computation
//! ├── session/       # session store and visit ledger
//! ├── db/            # models and repositories
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod db;
pub mod pricing;
pub mod session;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load .env, prepare the working directory and start logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    if config.is_production() {
        init_logger_with_file(log_level.as_deref(), config.log_dir().to_str());
    } else {
        init_logger_with_file(log_level.as_deref(), None);
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______      __        __
  / ____/___ _/ /_____ _/ /___  ____ _
 / /   / __ `/ __/ __ `/ / __ \/ __ `/
/ /___/ /_/ / /_/ /_/ / / /_/ / /_/ /
\____/\__,_/\__/\__,_/_/\____/\__, /
                             /____/
    "#
    );
}
