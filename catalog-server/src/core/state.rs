use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::session::SessionStore;

/// How often expired browsing sessions are swept out
const SESSION_PRUNE_INTERVAL_SECS: u64 = 60;

/// Server state - shared handles to every service
///
/// Cloning is cheap: everything inside is either `Clone`-by-handle
/// (the database connection) or behind an `Arc`.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | Immutable configuration |
/// | db | Embedded SurrealDB handle |
/// | jwt_service | Token generation/validation |
/// | sessions | In-memory per-session visit ledger |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub sessions: Arc<SessionStore>,
}

impl ServerState {
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            sessions,
        }
    }

    /// Full startup path: work dir layout, on-disk database, services.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("catalog.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::with_db(config, db_service.db)
    }

    /// State over an existing database handle. The test harness pairs
    /// this with [`DbService::new_in_memory`].
    pub fn with_db(config: &Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let sessions = Arc::new(SessionStore::new(config.session_ttl_minutes as i64));

        Self::new(config.clone(), db, jwt_service, sessions)
    }

    /// Spawn the periodic session sweeper
    pub fn start_background_tasks(&self) {
        let sessions = self.sessions.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(SESSION_PRUNE_INTERVAL_SECS));
            loop {
                interval.tick().await;
                let removed = sessions.prune_expired();
                if removed > 0 {
                    tracing::debug!(removed, "Pruned expired sessions");
                }
            }
        });
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}
