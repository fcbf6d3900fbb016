use async_trait::async_trait;

use crate::fragment::{DistanceOperand, EmbeddingInput, Fragment, FragmentBuilder};
use crate::index::HnswIndex;
use crate::models::{
    CohereTextEmbeddingModel, ImageEmbeddingModel, OpenAiTextEmbeddingModel, TextEmbeddingModel,
};
use crate::vector::Vector;
use crate::LanternError;

/// Binds the fragment builder to a query builder that can run SQL.
///
/// Implementors supply statement execution; the Lantern operations come as
/// provided methods. Builder errors reach the caller through
/// `From<LanternError>` before any SQL is sent, and backend errors are
/// returned as the implementor produced them.
#[async_trait]
pub trait LanternExecutor: Send + Sync {
    type Error: From<LanternError> + std::error::Error + Send + Sync + 'static;

    fn builder(&self) -> &FragmentBuilder;

    /// Run a statement, discarding any rows.
    async fn execute(&self, fragment: &Fragment) -> Result<(), Self::Error>;

    /// Run a statement returning a single row with a single array column.
    async fn fetch_vector(&self, fragment: &Fragment) -> Result<Vector, Self::Error>;

    async fn create_extension(&self) -> Result<(), Self::Error> {
        let fragment = self.builder().create_extension();
        tracing::debug!(extension = %self.builder().config().extension, "creating extension");
        self.execute(&fragment).await
    }

    async fn create_extras_extension(&self) -> Result<(), Self::Error> {
        let fragment = self.builder().create_extras_extension();
        tracing::debug!(
            extension = %self.builder().config().extras_extension,
            "creating extension"
        );
        self.execute(&fragment).await
    }

    async fn create_index(&self, index: &HnswIndex) -> Result<(), Self::Error> {
        let fragment = index.to_fragment()?;
        self.execute(&fragment).await
    }

    async fn generate_text_embedding(
        &self,
        model: TextEmbeddingModel,
        text: &str,
    ) -> Result<Vector, Self::Error> {
        let fragment = self.builder().generate_text_embedding(model, text)?;
        self.fetch_vector(&fragment).await
    }

    async fn generate_image_embedding(
        &self,
        model: ImageEmbeddingModel,
        url: &str,
    ) -> Result<Vector, Self::Error> {
        let fragment = self.builder().generate_image_embedding(model, url)?;
        self.fetch_vector(&fragment).await
    }

    async fn generate_openai_embedding(
        &self,
        model: OpenAiTextEmbeddingModel,
        text: &str,
        dimension: Option<u32>,
    ) -> Result<Vector, Self::Error> {
        let fragment = self
            .builder()
            .generate_openai_embedding(model, text, dimension)?;
        self.fetch_vector(&fragment).await
    }

    async fn generate_cohere_embedding(
        &self,
        model: CohereTextEmbeddingModel,
        text: &str,
    ) -> Result<Vector, Self::Error> {
        let fragment = self.builder().generate_cohere_embedding(model, text)?;
        self.fetch_vector(&fragment).await
    }

    fn text_embedding(
        &self,
        model: TextEmbeddingModel,
        input: EmbeddingInput,
    ) -> Result<Fragment, LanternError> {
        self.builder().text_embedding(model, input)
    }

    fn image_embedding(
        &self,
        model: ImageEmbeddingModel,
        input: EmbeddingInput,
    ) -> Result<Fragment, LanternError> {
        self.builder().image_embedding(model, input)
    }

    fn openai_embedding(
        &self,
        model: OpenAiTextEmbeddingModel,
        input: EmbeddingInput,
        dimension: Option<u32>,
    ) -> Result<Fragment, LanternError> {
        self.builder().openai_embedding(model, input, dimension)
    }

    fn cohere_embedding(
        &self,
        model: CohereTextEmbeddingModel,
        input: EmbeddingInput,
    ) -> Result<Fragment, LanternError> {
        self.builder().cohere_embedding(model, input)
    }

    fn l2_distance(
        &self,
        column: &str,
        operand: impl Into<DistanceOperand>,
    ) -> Result<Fragment, LanternError>
    where
        Self: Sized,
    {
        self.builder().l2_distance(column, operand)
    }

    fn cosine_distance(
        &self,
        column: &str,
        operand: impl Into<DistanceOperand>,
    ) -> Result<Fragment, LanternError>
    where
        Self: Sized,
    {
        self.builder().cosine_distance(column, operand)
    }

    fn hamming_distance(
        &self,
        column: &str,
        operand: impl Into<DistanceOperand>,
    ) -> Result<Fragment, LanternError>
    where
        Self: Sized,
    {
        self.builder().hamming_distance(column, operand)
    }
}
