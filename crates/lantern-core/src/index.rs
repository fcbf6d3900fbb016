use serde::{Deserialize, Serialize};

use crate::fragment::{DistanceOperator, Fragment};
use crate::LanternError;

/// Build parameters of a `lantern_hnsw` index. Unset options are left to the
/// extension's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HnswOptions {
    /// Maximum number of neighbours per node (`M`).
    pub m: Option<u32>,
    /// Candidate list size during search (`ef`).
    pub ef: Option<u32>,
    /// Vector dimensionality (`dim`).
    pub dim: Option<u32>,
    /// Candidate list size during construction (`ef_construction`).
    pub ef_construction: Option<u32>,
}

impl HnswOptions {
    fn is_empty(&self) -> bool {
        self.m.is_none() && self.ef.is_none() && self.dim.is_none() && self.ef_construction.is_none()
    }

    fn render(&self) -> String {
        [
            ("M", self.m),
            ("ef", self.ef),
            ("dim", self.dim),
            ("ef_construction", self.ef_construction),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| format!("{name}={v}")))
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// `CREATE INDEX ... USING lantern_hnsw(<column> <opclass>) WITH (...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HnswIndex {
    name: String,
    table: String,
    column: String,
    operator: DistanceOperator,
    if_not_exists: bool,
    options: HnswOptions,
}

impl HnswIndex {
    pub fn new(
        name: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            column: column.into(),
            operator: DistanceOperator::L2,
            if_not_exists: true,
            options: HnswOptions::default(),
        }
    }

    /// Distance the index serves; picks the operator class (default: L2).
    pub fn with_operator(mut self, operator: DistanceOperator) -> Self {
        self.operator = operator;
        self
    }

    pub fn with_if_not_exists(mut self, if_not_exists: bool) -> Self {
        self.if_not_exists = if_not_exists;
        self
    }

    pub fn with_options(mut self, options: HnswOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_m(mut self, m: u32) -> Self {
        self.options.m = Some(m);
        self
    }

    pub fn with_ef(mut self, ef: u32) -> Self {
        self.options.ef = Some(ef);
        self
    }

    pub fn with_dim(mut self, dim: u32) -> Self {
        self.options.dim = Some(dim);
        self
    }

    pub fn with_ef_construction(mut self, ef_construction: u32) -> Self {
        self.options.ef_construction = Some(ef_construction);
        self
    }

    pub fn options(&self) -> &HnswOptions {
        &self.options
    }

    pub fn to_fragment(&self) -> Result<Fragment, LanternError> {
        for (what, value) in [
            ("index name", &self.name),
            ("table", &self.table),
            ("column", &self.column),
        ] {
            if value.trim().is_empty() {
                return Err(LanternError::InvalidIdentifier(format!("{what} must not be empty")));
            }
        }
        // Postgres creates the index in the table's schema.
        if self.name.contains('.') {
            return Err(LanternError::InvalidIdentifier(format!(
                "index name '{}' must not be schema-qualified",
                self.name
            )));
        }

        let mut fragment = Fragment::statement();
        fragment.push_sql(if self.if_not_exists {
            "CREATE INDEX IF NOT EXISTS "
        } else {
            "CREATE INDEX "
        });
        fragment
            .push_identifier(self.name.as_str())
            .push_sql(" ON ")
            .push_identifier(self.table.as_str())
            .push_sql(" USING lantern_hnsw(")
            .push_identifier(self.column.as_str())
            .push_sql(format!(" {})", self.operator.operator_class()));

        if !self.options.is_empty() {
            fragment.push_sql(format!(" WITH ({})", self.options.render()));
        }
        Ok(fragment)
    }
}
