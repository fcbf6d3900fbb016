use lantern_core::{Dialect, Fragment, Piece, PostgresDialect, SqlParam};
use sqlx::{Postgres, QueryBuilder};

/// Splice Lantern fragments into a sqlx query builder.
pub trait QueryBuilderExt {
    /// Append `fragment`: identifiers and literals are quoted for Postgres,
    /// bound values go through `push_bind` and get the builder's next `$n`.
    fn push_fragment(&mut self, fragment: &Fragment) -> &mut Self;
}

impl<'args> QueryBuilderExt for QueryBuilder<'args, Postgres> {
    fn push_fragment(&mut self, fragment: &Fragment) -> &mut Self {
        let dialect = PostgresDialect;
        for piece in fragment.pieces() {
            match piece {
                Piece::Sql(sql) => {
                    self.push(sql);
                }
                Piece::Identifier(ident) => {
                    self.push(dialect.quote_identifier(ident));
                }
                Piece::Literal(value) => {
                    self.push(dialect.quote_string(value));
                }
                Piece::Param(SqlParam::Text(text)) => {
                    self.push_bind(text.clone());
                }
                Piece::Param(SqlParam::Int(n)) => {
                    self.push_bind(*n);
                }
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use lantern_core::{
        EmbeddingInput, FragmentBuilder, OpenAiTextEmbeddingModel, TextEmbeddingModel,
    };

    use super::*;

    #[test]
    fn pushes_bound_values_with_numbered_placeholders() {
        let builder = FragmentBuilder::default();
        let fragment = builder
            .generate_text_embedding(TextEmbeddingModel::BaaiBgeBaseEn, "hello")
            .unwrap();

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("");
        qb.push_fragment(&fragment);
        assert_eq!(qb.sql(), "SELECT text_embedding('BAAI/bge-base-en', $1)");
    }

    #[test]
    fn continues_numbering_after_existing_binds() {
        let builder = FragmentBuilder::default();
        let embedding = builder
            .openai_embedding(
                OpenAiTextEmbeddingModel::Small3,
                EmbeddingInput::value("query"),
                Some(512),
            )
            .unwrap();
        let order = builder.l2_distance("embedding", embedding).unwrap();

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT id FROM books WHERE name <> ");
        qb.push_bind("skip")
            .push(" ORDER BY ")
            .push_fragment(&order)
            .push(" LIMIT 5");
        assert_eq!(
            qb.sql(),
            "SELECT id FROM books WHERE name <> $1 ORDER BY \"embedding\" <-> \
             openai_embedding('openai/text-embedding-3-small', $2, $3) LIMIT 5"
        );
    }

    #[test]
    fn inlines_vector_literals() {
        let fragment = FragmentBuilder::default()
            .hamming_distance("movies.embedding", vec![1.0f32, 1.0, 2.0])
            .unwrap();
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("");
        qb.push_fragment(&fragment);
        assert_eq!(qb.sql(), "\"movies\".\"embedding\" <+> '{1,1,2}'");
    }
}
