//! Lantern: SQL fragments for the Lantern Postgres vector extension.
//!
//! This crate re-exports the Lantern sub-crates for single-import usage.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `default` | `sqlx` |
//! | `sqlx` | `LanternPg` executor and `QueryBuilderExt` for sqlx Postgres |
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lantern::core::{FragmentBuilder, TextEmbeddingModel, EmbeddingInput};
//! use lantern::sqlx::{LanternPg, QueryBuilderExt};
//! ```

/// Vector codec, model registry, fragment builder and the executor trait.
/// Always available.
pub use lantern_core as core;

/// sqlx Postgres adapter.
#[cfg(feature = "sqlx")]
pub use lantern_sqlx as sqlx;

pub use lantern_core::{
    decode, encode, resolve, CohereTextEmbeddingModel, DistanceOperand, DistanceOperator,
    EmbeddingInput, EmbeddingModel, Fragment, FragmentBuilder, HnswIndex, HnswOptions,
    ImageEmbeddingModel, LanternConfig, LanternError, LanternExecutor, ModelNamespace,
    OpenAiTextEmbeddingModel, PostgresDialect, TextEmbeddingModel, Vector,
};
