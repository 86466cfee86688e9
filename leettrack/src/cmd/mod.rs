pub mod catalog;
pub mod hint;
pub mod mine;
pub mod parse;
pub mod progress;
pub mod server;
pub mod sync;

use anyhow::{Context, Result};
use leettrack_libs::{
    catalog::source::{GitHubContentSource, DEFAULT_CATALOG_API_URL},
    identity::Identity,
    progress::{local::FileSlot, store::ProgressStore},
    store::postgres::MIGRATOR,
};
use serde::Serialize;
use sqlx::{postgres::Postgres, Pool};
use std::{env, path::PathBuf};

pub const DEFAULT_DATA_DIR: &str = "./.leettrack";

pub fn catalog_source() -> Result<GitHubContentSource> {
    let base_url =
        env::var("CATALOG_API_URL").unwrap_or_else(|_| String::from(DEFAULT_CATALOG_API_URL));
    let token = env::var("GITHUB_TOKEN").ok();

    GitHubContentSource::new(&base_url, token.as_deref()).with_context(|| {
        let message = format!("couldn't create catalog client for {}", base_url);
        tracing::error!(message);
        message
    })
}

/// Identity given on the command line, else `LEETTRACK_USER`.
pub fn identity(user: Option<&str>) -> Option<Identity> {
    let from_env = env::var("LEETTRACK_USER").ok();
    Identity::from_optional(user.or(from_env.as_deref()))
}

pub fn progress_store() -> ProgressStore<FileSlot> {
    let dir = env::var("LEETTRACK_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
    ProgressStore::new(FileSlot::new(&dir))
}

pub async fn connect_pool() -> Result<Pool<Postgres>> {
    let database_url: String = env::var("DATABASE_URL").with_context(|| {
        let message = "DATABASE_URL must be configured.";
        tracing::error!(message);
        message
    })?;

    let pool: Pool<Postgres> = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .with_context(|| {
            let message = "Failed to create database connection pool.";
            tracing::error!(message);
            message
        })?;

    MIGRATOR.run(&pool).await.with_context(|| {
        let message = "Failed to apply database migrations.";
        tracing::error!(message);
        message
    })?;

    Ok(pool)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
