//! Tests for the provided `LanternExecutor` operations against an in-memory
//! executor that records rendered SQL instead of talking to a database.

use std::sync::Mutex;

use async_trait::async_trait;
use lantern_core::{
    decode, DistanceOperand, EmbeddingInput, Fragment, FragmentBuilder, HnswIndex,
    ImageEmbeddingModel, LanternError, LanternExecutor, OpenAiTextEmbeddingModel,
    PostgresDialect, SqlParam, TextEmbeddingModel, Vector,
};

// ---------------------------------------------------------------------------
// Recording executor
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
enum FakeError {
    #[error(transparent)]
    Lantern(#[from] LanternError),
    #[error("backend: {0}")]
    Backend(String),
}

struct RecordingExecutor {
    builder: FragmentBuilder,
    statements: Mutex<Vec<(String, Vec<SqlParam>)>>,
    /// Text the fake database returns for `fetch_vector`.
    row: String,
    fail_with: Option<String>,
}

impl RecordingExecutor {
    fn new(row: &str) -> Self {
        Self {
            builder: FragmentBuilder::default(),
            statements: Mutex::new(Vec::new()),
            row: row.to_string(),
            fail_with: None,
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new("{}")
        }
    }

    fn record(&self, fragment: &Fragment) -> Result<(), FakeError> {
        if let Some(message) = &self.fail_with {
            return Err(FakeError::Backend(message.clone()));
        }
        self.statements
            .lock()
            .unwrap()
            .push(fragment.to_sql_with(&PostgresDialect));
        Ok(())
    }

    fn statements(&self) -> Vec<(String, Vec<SqlParam>)> {
        self.statements.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanternExecutor for RecordingExecutor {
    type Error = FakeError;

    fn builder(&self) -> &FragmentBuilder {
        &self.builder
    }

    async fn execute(&self, fragment: &Fragment) -> Result<(), FakeError> {
        self.record(fragment)
    }

    async fn fetch_vector(&self, fragment: &Fragment) -> Result<Vector, FakeError> {
        self.record(fragment)?;
        Ok(decode(&self.row)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn creates_both_extensions() {
    let executor = RecordingExecutor::new("{}");
    executor.create_extension().await.unwrap();
    executor.create_extras_extension().await.unwrap();

    let sql: Vec<String> = executor.statements().into_iter().map(|(s, _)| s).collect();
    assert_eq!(
        sql,
        vec![
            "CREATE EXTENSION IF NOT EXISTS lantern",
            "CREATE EXTENSION IF NOT EXISTS lantern_extras",
        ]
    );
}

#[tokio::test]
async fn generates_text_embedding_with_bound_text() {
    let executor = RecordingExecutor::new("{0.5,1,-2}");
    let vector = executor
        .generate_text_embedding(TextEmbeddingModel::BaaiBgeBaseEn, "hello")
        .await
        .unwrap();
    assert_eq!(vector.as_slice(), &[0.5, 1.0, -2.0]);

    let statements = executor.statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].0, "SELECT text_embedding('BAAI/bge-base-en', $1)");
    assert_eq!(statements[0].1, vec![SqlParam::Text("hello".into())]);
}

#[tokio::test]
async fn openai_generation_passes_dimension() {
    let executor = RecordingExecutor::new("{1,2}");
    executor
        .generate_openai_embedding(OpenAiTextEmbeddingModel::Large3, "hello", Some(2))
        .await
        .unwrap();
    let (sql, params) = executor.statements().remove(0);
    assert_eq!(sql, "SELECT openai_embedding('openai/text-embedding-3-large', $1, $2)");
    assert_eq!(params[1], SqlParam::Int(2));
}

#[tokio::test]
async fn missing_url_fails_before_any_statement() {
    let executor = RecordingExecutor::new("{}");
    let err = executor
        .generate_image_embedding(ImageEmbeddingModel::ClipVitB32Visual, "")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FakeError::Lantern(LanternError::MissingValue("url"))
    ));
    assert!(executor.statements().is_empty());
}

#[tokio::test]
async fn malformed_row_surfaces_as_malformed_vector() {
    let executor = RecordingExecutor::new("not a vector");
    let err = executor
        .generate_text_embedding(TextEmbeddingModel::BaaiBgeSmallEn, "hello")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FakeError::Lantern(LanternError::MalformedVector { .. })
    ));
}

#[tokio::test]
async fn backend_errors_are_returned_unchanged() {
    let executor = RecordingExecutor::failing("permission denied to create extension");
    let err = executor.create_extension().await.unwrap_err();
    match err {
        FakeError::Backend(message) => {
            assert_eq!(message, "permission denied to create extension")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn creates_hnsw_index() {
    let executor = RecordingExecutor::new("{}");
    let index = HnswIndex::new("book_index", "books", "embedding")
        .with_m(2)
        .with_ef_construction(10)
        .with_ef(4)
        .with_dim(3);
    executor.create_index(&index).await.unwrap();
    let (sql, _) = executor.statements().remove(0);
    assert_eq!(
        sql,
        "CREATE INDEX IF NOT EXISTS \"book_index\" ON \"books\" USING \
         lantern_hnsw(\"embedding\" dist_l2sq_ops) WITH (M=2, ef=4, dim=3, ef_construction=10)"
    );
}

#[test]
fn expression_operations_are_exposed_on_the_handle() {
    let executor = RecordingExecutor::new("{}");
    let embedding = executor
        .text_embedding(
            TextEmbeddingModel::BaaiBgeBaseEn,
            EmbeddingInput::column("name"),
        )
        .unwrap();
    let distance = executor
        .l2_distance("embedding", embedding)
        .unwrap();
    let (sql, params) = distance.to_sql_with(&PostgresDialect);
    assert_eq!(
        sql,
        "\"embedding\" <-> text_embedding('BAAI/bge-base-en', \"name\")"
    );
    assert!(params.is_empty());

    let hamming = executor
        .hamming_distance("embedding", [1i32, 1, 1])
        .unwrap();
    assert_eq!(
        hamming.to_inline_sql(&PostgresDialect),
        "\"embedding\" <+> '{1,1,1}'"
    );

    let cosine = executor
        .cosine_distance("embedding", DistanceOperand::Raw("{2,2,2}".into()))
        .unwrap();
    assert_eq!(
        cosine.to_inline_sql(&PostgresDialect),
        "\"embedding\" <=> '{2,2,2}'"
    );
}
