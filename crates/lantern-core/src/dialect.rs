/// Quoting and placeholder rules of the query builder hosting a fragment.
///
/// [`Fragment`](crate::Fragment)s never quote anything themselves; every
/// identifier, string literal and bound value is rendered through the
/// dialect the adapter supplies.
pub trait Dialect: Send + Sync {
    /// Quote a (possibly dotted) column or table reference.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote text as a SQL string literal.
    fn quote_string(&self, value: &str) -> String;

    /// Placeholder for the `index`-th bound parameter (1-based).
    fn placeholder(&self, index: usize) -> String;
}

/// Postgres rules, shared by every Postgres driver: `"ident"`, `'text'`, `$n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn quote_identifier(&self, ident: &str) -> String {
        let mut out = String::with_capacity(ident.len() + 2);
        for (i, part) in ident.split('.').enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push('"');
            out.push_str(&part.replace('"', "\"\""));
            out.push('"');
        }
        out
    }

    fn quote_string(&self, value: &str) -> String {
        // E'' keeps backslashes literal whatever standard_conforming_strings says.
        if value.contains('\\') {
            format!("E'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
        } else {
            format!("'{}'", value.replace('\'', "''"))
        }
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }
}

/// Whether `name` is a bare SQL identifier, optionally schema-qualified
/// (`public.books`), that is safe to splice into DDL without quoting.
pub fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            !part.is_empty()
                && !part.starts_with(|c: char| c.is_ascii_digit())
                && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
