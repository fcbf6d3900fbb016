use async_trait::async_trait;
use lantern_core::{Fragment, FragmentBuilder, LanternConfig, LanternError, LanternExecutor, Vector};
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;

use crate::QueryBuilderExt;

/// Errors returned by [`LanternPg`].
///
/// Builder errors and database errors keep their original types so callers
/// can tell a bad argument from a failed statement.
#[derive(Debug, Error)]
pub enum PgLanternError {
    #[error(transparent)]
    Lantern(#[from] LanternError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Lantern operations over a sqlx Postgres pool.
///
/// The handle is cheap to clone and carries no state besides the pool and
/// the fragment builder.
#[derive(Debug, Clone)]
pub struct LanternPg {
    pool: PgPool,
    builder: FragmentBuilder,
}

impl LanternPg {
    /// Create a handle with the default extension names.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            builder: FragmentBuilder::default(),
        }
    }

    /// Create a handle with custom names; fails if the config does not
    /// validate.
    pub fn with_config(pool: PgPool, config: LanternConfig) -> Result<Self, PgLanternError> {
        Ok(Self {
            pool,
            builder: FragmentBuilder::new(config)?,
        })
    }

    /// Return a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn query(fragment: &Fragment) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("");
        qb.push_fragment(fragment);
        qb
    }
}

#[async_trait]
impl LanternExecutor for LanternPg {
    type Error = PgLanternError;

    fn builder(&self) -> &FragmentBuilder {
        &self.builder
    }

    async fn execute(&self, fragment: &Fragment) -> Result<(), PgLanternError> {
        let mut qb = Self::query(fragment);
        tracing::debug!(sql = qb.sql(), "executing lantern statement");
        let result = qb.build().execute(&self.pool).await?;
        tracing::debug!(rows = result.rows_affected(), "lantern statement done");
        Ok(())
    }

    async fn fetch_vector(&self, fragment: &Fragment) -> Result<Vector, PgLanternError> {
        let mut qb = Self::query(fragment);
        tracing::debug!(sql = qb.sql(), "fetching embedding");
        let values: Vec<f32> = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(Vector::from(values))
    }
}
