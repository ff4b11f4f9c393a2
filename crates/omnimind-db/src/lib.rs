//! # omnimind-db
//!
//! PostgreSQL database layer for the OmniMind backend.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for all core entities
//! - The durable AI-processing queue (claimed with `FOR UPDATE SKIP LOCKED`)
//! - Embedded schema migrations
//!
//! ## Example
//!
//! ```rust,ignore
//! use omnimind_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/omnimind").await?;
//!     let page = db.tasks.list(user_id, &Default::default()).await?;
//!     println!("{} tasks", page.pagination.total);
//!     Ok(())
//! }
//! ```

pub mod jobs;
pub mod meetings;
pub mod notifications;
pub mod pool;
pub mod preferences;
pub mod projects;
pub mod tasks;
pub mod users;

// Re-export core types
pub use omnimind_core::*;

pub use jobs::PgJobRepository;
pub use meetings::PgMeetingRepository;
pub use notifications::PgNotificationRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use preferences::PgPreferenceRepository;
pub use projects::PgProjectRepository;
pub use tasks::PgTaskRepository;
pub use users::PgUserRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// User account repository.
    pub users: PgUserRepository,
    /// Project repository.
    pub projects: PgProjectRepository,
    /// Task repository.
    pub tasks: PgTaskRepository,
    /// Meeting repository.
    pub meetings: PgMeetingRepository,
    /// Notification repository.
    pub notifications: PgNotificationRepository,
    /// User preference repository.
    pub preferences: PgPreferenceRepository,
    /// AI job queue repository.
    pub jobs: PgJobRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            projects: PgProjectRepository::new(pool.clone()),
            tasks: PgTaskRepository::new(pool.clone()),
            meetings: PgMeetingRepository::new(pool.clone()),
            notifications: PgNotificationRepository::new(pool.clone()),
            preferences: PgPreferenceRepository::new(pool.clone()),
            jobs: PgJobRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            users: PgUserRepository::new(self.pool.clone()),
            projects: PgProjectRepository::new(self.pool.clone()),
            tasks: PgTaskRepository::new(self.pool.clone()),
            meetings: PgMeetingRepository::new(self.pool.clone()),
            notifications: PgNotificationRepository::new(self.pool.clone()),
            preferences: PgPreferenceRepository::new(self.pool.clone()),
            // Cloned, not recreated: the worker wake handle must be shared
            // across clones.
            jobs: self.jobs.clone(),
        }
    }
}
