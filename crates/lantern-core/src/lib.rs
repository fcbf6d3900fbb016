//! Core building blocks for issuing Lantern SQL from Rust query builders.
//!
//! The crate has no I/O. It provides:
//!
//! - the vector codec ([`encode`], [`decode`], [`Vector`]) for the Postgres
//!   array-literal form `{1,1,2}`
//! - the embedding model registry ([`TextEmbeddingModel`], [`resolve`], ...)
//! - the [`FragmentBuilder`], which produces [`Fragment`]s for extension
//!   bootstrap, embedding generation, embedding expressions and distance
//!   expressions, plus [`HnswIndex`] DDL
//! - the [`LanternExecutor`] trait adapters implement to run fragments
//!
//! # Example
//!
//! ```rust
//! use lantern_core::{EmbeddingInput, FragmentBuilder, PostgresDialect, TextEmbeddingModel};
//!
//! # fn main() -> Result<(), lantern_core::LanternError> {
//! let builder = FragmentBuilder::default();
//! let query = builder.text_embedding(
//!     TextEmbeddingModel::BaaiBgeBaseEn,
//!     EmbeddingInput::value("My text input"),
//! )?;
//! let order_by = builder.cosine_distance("embedding", query)?;
//!
//! let (sql, params) = order_by.to_sql_with(&PostgresDialect);
//! assert_eq!(sql, "\"embedding\" <=> text_embedding('BAAI/bge-base-en', $1)");
//! assert_eq!(params.len(), 1);
//! # Ok(())
//! # }
//! ```

mod config;
mod dialect;
mod error;
mod executor;
mod fragment;
mod index;
mod models;
mod vector;

pub use config::LanternConfig;
pub use dialect::{is_plain_identifier, Dialect, PostgresDialect};
pub use error::LanternError;
pub use executor::LanternExecutor;
pub use fragment::{
    DistanceOperand, DistanceOperator, EmbeddingInput, Fragment, FragmentBuilder, FragmentKind,
    Piece, SqlParam,
};
pub use index::{HnswIndex, HnswOptions};
pub use models::{
    resolve, CohereTextEmbeddingModel, EmbeddingModel, ImageEmbeddingModel, ModelNamespace,
    OpenAiTextEmbeddingModel, TextEmbeddingModel,
};
pub use vector::{decode, encode, Vector, VectorValue};
