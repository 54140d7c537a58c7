use sqlx::{Executor, Sqlite, SqlitePool};

use crate::error::{QuizError, Result};

/// A versioned schema script. Versions are applied in slice order.
struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: "V1",
    sql: include_str!("../../migrations/V1__init.sql"),
}];

const CREATE_LEDGER: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

pub(super) async fn is_applied<'e, E>(executor: E, version: &str) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = ?)")
        .bind(version)
        .fetch_one(executor)
        .await
}

/// Brings the schema up to date. Each script and its ledger row are written
/// in one transaction, so a failed script leaves no partial version behind.
pub(super) async fn run(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_LEDGER).execute(pool).await?;

    let mut applied = 0;
    for migration in MIGRATIONS {
        if is_applied(pool, migration.version).await? {
            continue;
        }
        apply(pool, migration).await?;
        applied += 1;
    }

    if applied == 0 {
        tracing::debug!("schema is up to date");
    }
    Ok(())
}

async fn apply(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    let failed = |source| QuizError::Migration {
        version: migration.version,
        source,
    };

    let mut tx = pool.begin().await.map_err(failed)?;
    sqlx::raw_sql(migration.sql)
        .execute(&mut *tx)
        .await
        .map_err(failed)?;
    sqlx::query("INSERT INTO schema_migrations (version) VALUES (?)")
        .bind(migration.version)
        .execute(&mut *tx)
        .await
        .map_err(failed)?;
    tx.commit().await.map_err(failed)?;

    tracing::info!(version = migration.version, "applied database migration");
    Ok(())
}
