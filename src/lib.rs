//! User API - a CRUD REST service for the User resource.
//!
//! The service accepts JSON, validates it, delegates to a persistence layer
//! behind the [`repository::UserRepository`] trait, and deterministically
//! maps every persistence outcome to an HTTP status and JSON body.
//!
//! # Architecture Layers
//!
//! - **config**: environment-driven configuration
//! - **domain**: the User entity and input validation
//! - **errors**: centralized error handling and response shapes
//! - **extractors**: the parse-and-validate JSON extractor
//! - **handlers**: one handler per CRUD operation
//! - **repository**: the persistence gateway trait and its SeaORM store
//! - **infra**: database connection and migrations
//! - **routes** / **state**: router wiring and injected dependencies

pub mod config;
pub mod domain;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod infra;
pub mod repository;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::Config;
pub use errors::{AppError, AppResult};
pub use state::AppState;

use crate::infra::Database;
use crate::repository::UserStore;
use crate::routes::create_router;

/// Database migration actions exposed to the CLI.
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run the HTTP server with the given configuration.
pub async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database_url).await?;
    let users = Arc::new(UserStore::new(db.get_connection()));
    let state = AppState::new(users);

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("User API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run a migration action against the configured database.
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    let db = Database::connect_without_migrations(&config.database_url).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Last migration rolled back");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                println!("{} {}", if applied { "[applied]" } else { "[pending]" }, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrated");
        }
    }

    Ok(())
}
