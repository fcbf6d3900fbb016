//! SQL fragments for Lantern functions and operators.
//!
//! A [`Fragment`] is a dialect-neutral list of pieces. Identifiers, string
//! literals and bound values stay separate until an adapter renders the
//! fragment through its [`Dialect`], either with placeholders
//! ([`Fragment::to_sql_with`]) or fully inlined ([`Fragment::to_inline_sql`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dialect::{is_plain_identifier, Dialect};
use crate::models::{
    CohereTextEmbeddingModel, EmbeddingModel, ImageEmbeddingModel, OpenAiTextEmbeddingModel,
    TextEmbeddingModel,
};
use crate::vector::{encode, Vector, VectorValue};
use crate::{LanternConfig, LanternError};

// ---------------------------------------------------------------------------
// Fragment
// ---------------------------------------------------------------------------

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i32),
}

/// One piece of a [`Fragment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// SQL text emitted verbatim.
    Sql(String),
    /// Column or table reference, quoted by the dialect.
    Identifier(String),
    /// String literal, quoted and escaped by the dialect.
    Literal(String),
    /// Value bound through a placeholder.
    Param(SqlParam),
}

/// Whether a fragment is a standalone statement or an expression meant to be
/// embedded in a larger query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Expression,
    Statement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    kind: FragmentKind,
    pieces: Vec<Piece>,
}

impl Fragment {
    pub fn expression() -> Self {
        Self {
            kind: FragmentKind::Expression,
            pieces: Vec::new(),
        }
    }

    pub fn statement() -> Self {
        Self {
            kind: FragmentKind::Statement,
            pieces: Vec::new(),
        }
    }

    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> impl Iterator<Item = &SqlParam> {
        self.pieces.iter().filter_map(|p| match p {
            Piece::Param(param) => Some(param),
            _ => None,
        })
    }

    pub fn push_sql(&mut self, sql: impl Into<String>) -> &mut Self {
        let sql = sql.into();
        match self.pieces.last_mut() {
            Some(Piece::Sql(prev)) => prev.push_str(&sql),
            _ => self.pieces.push(Piece::Sql(sql)),
        }
        self
    }

    pub fn push_identifier(&mut self, ident: impl Into<String>) -> &mut Self {
        self.pieces.push(Piece::Identifier(ident.into()));
        self
    }

    pub fn push_literal(&mut self, value: impl Into<String>) -> &mut Self {
        self.pieces.push(Piece::Literal(value.into()));
        self
    }

    pub fn push_param(&mut self, param: SqlParam) -> &mut Self {
        self.pieces.push(Piece::Param(param));
        self
    }

    /// Append another fragment's pieces unchanged. Statements are wrapped in
    /// parentheses so they can stand in value position.
    pub fn push_fragment(&mut self, other: &Fragment) -> &mut Self {
        let statement = other.kind == FragmentKind::Statement;
        if statement {
            self.push_sql("(");
        }
        for piece in &other.pieces {
            match piece {
                Piece::Sql(sql) => {
                    self.push_sql(sql.as_str());
                }
                piece => self.pieces.push(piece.clone()),
            }
        }
        if statement {
            self.push_sql(")");
        }
        self
    }

    /// Render with placeholders, returning the SQL text and the values to
    /// bind in placeholder order.
    pub fn to_sql_with<D: Dialect + ?Sized>(&self, dialect: &D) -> (String, Vec<SqlParam>) {
        let mut sql = String::new();
        let mut params = Vec::new();
        for piece in &self.pieces {
            match piece {
                Piece::Sql(text) => sql.push_str(text),
                Piece::Identifier(ident) => sql.push_str(&dialect.quote_identifier(ident)),
                Piece::Literal(value) => sql.push_str(&dialect.quote_string(value)),
                Piece::Param(param) => {
                    params.push(param.clone());
                    sql.push_str(&dialect.placeholder(params.len()));
                }
            }
        }
        tracing::trace!(sql = %sql, params = params.len(), "rendered fragment");
        (sql, params)
    }

    /// Render with every bound value inlined as an escaped literal.
    pub fn to_inline_sql<D: Dialect + ?Sized>(&self, dialect: &D) -> String {
        let mut sql = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Sql(text) => sql.push_str(text),
                Piece::Identifier(ident) => sql.push_str(&dialect.quote_identifier(ident)),
                Piece::Literal(value) | Piece::Param(SqlParam::Text(value)) => {
                    sql.push_str(&dialect.quote_string(value))
                }
                Piece::Param(SqlParam::Int(n)) => sql.push_str(&n.to_string()),
            }
        }
        sql
    }
}

// ---------------------------------------------------------------------------
// Operands
// ---------------------------------------------------------------------------

/// Lantern distance operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceOperator {
    /// Euclidean (L2) distance.
    L2,
    Cosine,
    Hamming,
}

impl DistanceOperator {
    pub const ALL: [DistanceOperator; 3] = [
        DistanceOperator::L2,
        DistanceOperator::Cosine,
        DistanceOperator::Hamming,
    ];

    /// Operator token understood by the extension.
    pub fn token(&self) -> &'static str {
        match self {
            DistanceOperator::L2 => "<->",
            DistanceOperator::Cosine => "<=>",
            DistanceOperator::Hamming => "<+>",
        }
    }

    /// Operator class for a `lantern_hnsw` index answering this operator.
    pub fn operator_class(&self) -> &'static str {
        match self {
            DistanceOperator::L2 => "dist_l2sq_ops",
            DistanceOperator::Cosine => "dist_cos_ops",
            DistanceOperator::Hamming => "dist_hamming_ops",
        }
    }
}

impl fmt::Display for DistanceOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Second argument of an embedding function.
///
/// Only an empty string counts as missing; whitespace is passed on as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingInput {
    /// A column whose contents are embedded row by row.
    Column(String),
    /// Text (or an image URL) bound as a parameter.
    Value(String),
}

impl EmbeddingInput {
    pub fn column(name: impl Into<String>) -> Self {
        EmbeddingInput::Column(name.into())
    }

    pub fn value(value: impl Into<String>) -> Self {
        EmbeddingInput::Value(value.into())
    }
}

/// Right-hand side of a distance expression.
#[derive(Debug, Clone, PartialEq)]
pub enum DistanceOperand {
    Vector(Vector),
    /// Integer elements for `INT[]` columns, such as packed bits compared
    /// with Hamming distance. Encoded exactly.
    IntVector(Vec<i32>),
    /// Text already in array-literal shape, escaped but otherwise untouched.
    Raw(String),
    /// Another fragment, nested as is.
    Fragment(Fragment),
}

impl From<Vector> for DistanceOperand {
    fn from(vector: Vector) -> Self {
        DistanceOperand::Vector(vector)
    }
}

impl From<Vec<f32>> for DistanceOperand {
    fn from(values: Vec<f32>) -> Self {
        DistanceOperand::Vector(values.into())
    }
}

impl From<&[f32]> for DistanceOperand {
    fn from(values: &[f32]) -> Self {
        DistanceOperand::Vector(values.into())
    }
}

impl<const N: usize> From<[f32; N]> for DistanceOperand {
    fn from(values: [f32; N]) -> Self {
        DistanceOperand::Vector(values.into())
    }
}

impl From<Vec<i32>> for DistanceOperand {
    fn from(values: Vec<i32>) -> Self {
        DistanceOperand::IntVector(values)
    }
}

impl From<&[i32]> for DistanceOperand {
    fn from(values: &[i32]) -> Self {
        DistanceOperand::IntVector(values.to_vec())
    }
}

impl<const N: usize> From<[i32; N]> for DistanceOperand {
    fn from(values: [i32; N]) -> Self {
        DistanceOperand::IntVector(values.to_vec())
    }
}

impl From<VectorValue> for DistanceOperand {
    fn from(value: VectorValue) -> Self {
        match value {
            VectorValue::Vector(v) => DistanceOperand::Vector(v),
            VectorValue::Raw(raw) => DistanceOperand::Raw(raw),
        }
    }
}

impl From<&str> for DistanceOperand {
    fn from(raw: &str) -> Self {
        DistanceOperand::Raw(raw.to_string())
    }
}

impl From<String> for DistanceOperand {
    fn from(raw: String) -> Self {
        DistanceOperand::Raw(raw)
    }
}

impl From<Fragment> for DistanceOperand {
    fn from(fragment: Fragment) -> Self {
        DistanceOperand::Fragment(fragment)
    }
}

impl From<&Fragment> for DistanceOperand {
    fn from(fragment: &Fragment) -> Self {
        DistanceOperand::Fragment(fragment.clone())
    }
}

// ---------------------------------------------------------------------------
// FragmentBuilder
// ---------------------------------------------------------------------------

/// Builds Lantern fragments from a validated [`LanternConfig`].
///
/// Every method is pure; a builder can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct FragmentBuilder {
    config: LanternConfig,
}

impl FragmentBuilder {
    pub fn new(config: LanternConfig) -> Result<Self, LanternError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LanternConfig {
        &self.config
    }

    /// `CREATE EXTENSION IF NOT EXISTS lantern`
    pub fn create_extension(&self) -> Fragment {
        create_extension_sql(&self.config.extension)
    }

    /// `CREATE EXTENSION IF NOT EXISTS lantern_extras`
    pub fn create_extras_extension(&self) -> Fragment {
        create_extension_sql(&self.config.extras_extension)
    }

    pub fn create_extension_named(&self, name: &str) -> Result<Fragment, LanternError> {
        if !is_plain_identifier(name) || name.contains('.') {
            return Err(LanternError::InvalidIdentifier(format!(
                "extension name '{name}'"
            )));
        }
        Ok(create_extension_sql(name))
    }

    /// `<function>('<model>', <input>[, <dimension>])` for use inside a
    /// larger query.
    ///
    /// `dimension` is only emitted when given and non-zero, and only models
    /// whose function takes one accept it.
    pub fn embedding(
        &self,
        model: impl Into<EmbeddingModel>,
        input: EmbeddingInput,
        dimension: Option<u32>,
    ) -> Result<Fragment, LanternError> {
        let model = model.into();
        let dimension = match dimension.filter(|d| *d > 0) {
            Some(d) if !model.accepts_dimension() => {
                return Err(LanternError::InvalidArgument(format!(
                    "{} does not take an output dimension (got {d})",
                    model.function_name()
                )));
            }
            Some(d) => Some(i32::try_from(d).map_err(|_| {
                LanternError::InvalidArgument(format!("dimension {d} is out of range"))
            })?),
            None => None,
        };

        let mut fragment = Fragment::expression();
        fragment
            .push_sql(format!("{}(", self.function(&model)))
            .push_literal(model.model_name())
            .push_sql(", ");

        match input {
            EmbeddingInput::Column(column) => {
                if column.is_empty() {
                    return Err(LanternError::MissingValue("column"));
                }
                fragment.push_identifier(column);
            }
            EmbeddingInput::Value(value) => {
                if value.is_empty() {
                    return Err(LanternError::MissingValue(input_label(&model)));
                }
                fragment.push_param(SqlParam::Text(value));
            }
        }

        if let Some(d) = dimension {
            fragment.push_sql(", ").push_param(SqlParam::Int(d));
        }
        fragment.push_sql(")");
        Ok(fragment)
    }

    pub fn text_embedding(
        &self,
        model: TextEmbeddingModel,
        input: EmbeddingInput,
    ) -> Result<Fragment, LanternError> {
        self.embedding(model, input, None)
    }

    pub fn image_embedding(
        &self,
        model: ImageEmbeddingModel,
        input: EmbeddingInput,
    ) -> Result<Fragment, LanternError> {
        self.embedding(model, input, None)
    }

    pub fn openai_embedding(
        &self,
        model: OpenAiTextEmbeddingModel,
        input: EmbeddingInput,
        dimension: Option<u32>,
    ) -> Result<Fragment, LanternError> {
        self.embedding(model, input, dimension)
    }

    pub fn cohere_embedding(
        &self,
        model: CohereTextEmbeddingModel,
        input: EmbeddingInput,
    ) -> Result<Fragment, LanternError> {
        self.embedding(model, input, None)
    }

    /// `SELECT <function>('<model>', $1[, $2])`, executed on its own to get
    /// the embedding of `value` back as a row.
    pub fn generate_embedding(
        &self,
        model: impl Into<EmbeddingModel>,
        value: &str,
        dimension: Option<u32>,
    ) -> Result<Fragment, LanternError> {
        let expression = self.embedding(model, EmbeddingInput::value(value), dimension)?;
        let mut statement = Fragment::statement();
        statement.push_sql("SELECT ");
        statement.pieces.extend(expression.pieces);
        Ok(statement)
    }

    pub fn generate_text_embedding(
        &self,
        model: TextEmbeddingModel,
        text: &str,
    ) -> Result<Fragment, LanternError> {
        self.generate_embedding(model, text, None)
    }

    pub fn generate_image_embedding(
        &self,
        model: ImageEmbeddingModel,
        url: &str,
    ) -> Result<Fragment, LanternError> {
        self.generate_embedding(model, url, None)
    }

    pub fn generate_openai_embedding(
        &self,
        model: OpenAiTextEmbeddingModel,
        text: &str,
        dimension: Option<u32>,
    ) -> Result<Fragment, LanternError> {
        self.generate_embedding(model, text, dimension)
    }

    pub fn generate_cohere_embedding(
        &self,
        model: CohereTextEmbeddingModel,
        text: &str,
    ) -> Result<Fragment, LanternError> {
        self.generate_embedding(model, text, None)
    }

    /// `<column> <op> <operand>`
    pub fn distance(
        &self,
        op: DistanceOperator,
        column: &str,
        operand: impl Into<DistanceOperand>,
    ) -> Result<Fragment, LanternError> {
        if column.is_empty() {
            return Err(LanternError::MissingValue("column"));
        }

        let mut fragment = Fragment::expression();
        fragment
            .push_identifier(column)
            .push_sql(format!(" {} ", op.token()));

        match operand.into() {
            DistanceOperand::Vector(vector) => {
                fragment.push_literal(vector.to_sql());
            }
            DistanceOperand::IntVector(values) => {
                fragment.push_literal(encode(&values));
            }
            DistanceOperand::Raw(raw) => {
                if raw.is_empty() {
                    return Err(LanternError::MissingValue("vector"));
                }
                fragment.push_literal(raw);
            }
            DistanceOperand::Fragment(nested) => {
                fragment.push_fragment(&nested);
            }
        }
        Ok(fragment)
    }

    pub fn l2_distance(
        &self,
        column: &str,
        operand: impl Into<DistanceOperand>,
    ) -> Result<Fragment, LanternError> {
        self.distance(DistanceOperator::L2, column, operand)
    }

    pub fn cosine_distance(
        &self,
        column: &str,
        operand: impl Into<DistanceOperand>,
    ) -> Result<Fragment, LanternError> {
        self.distance(DistanceOperator::Cosine, column, operand)
    }

    pub fn hamming_distance(
        &self,
        column: &str,
        operand: impl Into<DistanceOperand>,
    ) -> Result<Fragment, LanternError> {
        self.distance(DistanceOperator::Hamming, column, operand)
    }

    fn function(&self, model: &EmbeddingModel) -> String {
        match &self.config.function_schema {
            Some(schema) => format!("{schema}.{}", model.function_name()),
            None => model.function_name().to_string(),
        }
    }
}

fn create_extension_sql(name: &str) -> Fragment {
    let mut fragment = Fragment::statement();
    fragment.push_sql(format!("CREATE EXTENSION IF NOT EXISTS {name}"));
    fragment
}

fn input_label(model: &EmbeddingModel) -> &'static str {
    match model {
        EmbeddingModel::Image(_) => "url",
        _ => "text",
    }
}
