//! Application state for the SafeStage API

use anyhow::Result;
use chrono::Utc;
use compliance_engine::{catalog::CALCULATION_TYPES, CantonCode};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;

/// Tables clients can pull through `/v1/sync/data`
pub const SYNC_TABLES: [&str; 3] = ["cantons", "calculation_types", "calculation_parameters"];

pub struct AppState {
    pub db: SqlitePool,
}

impl AppState {
    /// Open the database and bring the schema up to date
    pub async fn connect(database_url: &str) -> Result<Self> {
        tracing::info!("Connecting to database: {}", database_url);

        let pool = pool_options(database_url).connect(database_url).await?;

        Self::run_migrations(&pool).await?;

        Ok(Self { db: pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cantons (
                id INTEGER PRIMARY KEY,
                code TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                name_official TEXT NOT NULL,
                language TEXT NOT NULL,
                sort_order INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS calculation_types (
                id INTEGER PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                description TEXT,
                formula TEXT,
                icon TEXT,
                sort_order INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS calculation_parameters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                calculation_type_id INTEGER NOT NULL REFERENCES calculation_types(id),
                canton_id INTEGER REFERENCES cantons(id),
                parameter_key TEXT NOT NULL,
                parameter_value TEXT NOT NULL,
                value_type TEXT NOT NULL DEFAULT 'FLOAT',
                unit TEXT,
                description TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        // One row per (type, canton-or-default, key); NULL cantons would not collide otherwise
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_calculation_parameters_scope
            ON calculation_parameters(calculation_type_id, COALESCE(canton_id, 0), parameter_key)
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS data_versions (
                table_name TEXT PRIMARY KEY,
                version INTEGER NOT NULL DEFAULT 1,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Load cantons, the calculation catalog and nationwide defaults.
    ///
    /// Existing rows are left alone, so edited parameters survive a restart.
    pub async fn seed(&self) -> Result<()> {
        let mut tx = self.db.begin().await?;

        for canton in CantonCode::all() {
            let record = canton.to_record();
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO cantons (id, code, name, name_official, language, sort_order)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.id)
            .bind(&record.code)
            .bind(&record.name)
            .bind(&record.name_official)
            .bind(record.language.as_str())
            .bind(record.sort_order)
            .execute(&mut *tx)
            .await?;
        }

        let mut parameter_count = 0;
        for seed in CALCULATION_TYPES.iter() {
            let record = seed.to_record();
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO calculation_types (id, slug, name, description, formula, icon, sort_order)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.id)
            .bind(&record.slug)
            .bind(&record.name)
            .bind(&record.description)
            .bind(&record.formula)
            .bind(&record.icon)
            .bind(record.sort_order)
            .execute(&mut *tx)
            .await?;

            for default in seed.parameters {
                let inserted = sqlx::query(
                    r#"
                    INSERT OR IGNORE INTO calculation_parameters
                        (calculation_type_id, canton_id, parameter_key, parameter_value, value_type, unit, description)
                    VALUES (?, NULL, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(record.id)
                .bind(default.key)
                .bind(default.value)
                .bind(default.value_type.as_str())
                .bind(default.unit)
                .bind(default.description)
                .execute(&mut *tx)
                .await?;
                parameter_count += inserted.rows_affected();
            }
        }

        let now = Utc::now().to_rfc3339();
        for table in SYNC_TABLES {
            sqlx::query(
                "INSERT OR IGNORE INTO data_versions (table_name, version, updated_at) VALUES (?, 1, ?)",
            )
            .bind(table)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Seed complete: {} cantons, {} calculation types, {} new default parameters",
            CantonCode::all().len(),
            CALCULATION_TYPES.len(),
            parameter_count
        );
        Ok(())
    }
}

/// Pool settings for `database_url`.
///
/// Every in-memory connection is a separate database, so an in-memory pool
/// holds exactly one connection and never retires it.
pub fn pool_options(database_url: &str) -> SqlitePoolOptions {
    if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    }
}

/// SQLite file in the platform data directory
pub fn default_database_url() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("safestage-api");
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::warn!("Cannot create {}: {}", data_dir.display(), e);
    }
    format!("sqlite:{}/safestage.db?mode=rwc", data_dir.display())
}

/// Get platform-specific data directory
mod dirs {
    use std::path::PathBuf;

    pub fn data_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }
}
