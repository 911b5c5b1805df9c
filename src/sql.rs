//! SQL text helpers behind the optional parser/formatter integration.
//!
//! With the `sql-format` feature enabled the real parser and formatter are
//! used; without it a no-op assistant keeps the editor working with
//! formatting unavailable and a keyword-based statement classifier.

use std::sync::Arc;

/// Coarse classification of a statement batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatementKind {
    /// Every statement only reads data.
    Read,
    /// At least one statement may modify data or schema.
    Write,
}

/// Provider interface for SQL parsing and formatting.
pub trait SqlAssistant: Send + Sync {
    /// Pretty-print a statement. The no-op assistant returns its input.
    fn format(&self, sql: &str) -> String;
    /// Parse and return the statement count, or a syntax error message.
    fn validate(&self, sql: &str) -> Result<usize, String>;
    fn classify(&self, sql: &str) -> StatementKind;
}

/// Whether the parser/formatter integration is compiled in.
pub fn available() -> bool {
    cfg!(feature = "sql-format")
}

/// Selects the assistant implementation for this build.
pub fn assistant() -> Arc<dyn SqlAssistant> {
    #[cfg(feature = "sql-format")]
    {
        Arc::new(ParserAssistant)
    }
    #[cfg(not(feature = "sql-format"))]
    {
        Arc::new(PlainAssistant)
    }
}

/// Classifies a statement batch using the best classifier in this build.
pub fn classify(sql: &str) -> StatementKind {
    #[cfg(feature = "sql-format")]
    {
        ParserAssistant.classify(sql)
    }
    #[cfg(not(feature = "sql-format"))]
    {
        PlainAssistant.classify(sql)
    }
}

/// Leading-keyword fallback classifier, also used when parsing fails.
fn classify_by_keyword(sql: &str) -> StatementKind {
    let first = sql
        .trim()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match first.as_str() {
        "select" | "with" | "explain" | "show" | "values" | "table" => StatementKind::Read,
        _ => StatementKind::Write,
    }
}

#[cfg(feature = "sql-format")]
pub struct ParserAssistant;

#[cfg(feature = "sql-format")]
impl SqlAssistant for ParserAssistant {
    fn format(&self, sql: &str) -> String {
        let mut options = sqlformat::FormatOptions::default();
        options.uppercase = true;
        sqlformat::format(sql, &sqlformat::QueryParams::None, options)
    }

    fn validate(&self, sql: &str) -> Result<usize, String> {
        let statements = parse(sql).map_err(|e| e.to_string())?;
        if statements.is_empty() {
            return Err("no statements found".to_string());
        }
        Ok(statements.len())
    }

    fn classify(&self, sql: &str) -> StatementKind {
        use sqlparser::ast::Statement;

        let Ok(statements) = parse(sql) else {
            return classify_by_keyword(sql);
        };
        let all_reads = !statements.is_empty()
            && statements.iter().all(|statement| {
                matches!(
                    statement,
                    Statement::Query(_)
                        | Statement::Explain { .. }
                        | Statement::ShowVariable { .. }
                )
            });
        if all_reads {
            StatementKind::Read
        } else {
            StatementKind::Write
        }
    }
}

#[cfg(feature = "sql-format")]
fn parse(sql: &str) -> Result<Vec<sqlparser::ast::Statement>, sqlparser::parser::ParserError> {
    sqlparser::parser::Parser::parse_sql(&sqlparser::dialect::PostgreSqlDialect {}, sql)
}

/// Assistant used when the parser/formatter integration is absent.
pub struct PlainAssistant;

impl SqlAssistant for PlainAssistant {
    fn format(&self, sql: &str) -> String {
        sql.to_string()
    }

    fn validate(&self, _sql: &str) -> Result<usize, String> {
        Err("SQL parser is not installed".to_string())
    }

    fn classify(&self, sql: &str) -> StatementKind {
        classify_by_keyword(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_classifier_spots_reads() {
        assert_eq!(classify_by_keyword("SELECT 1"), StatementKind::Read);
        assert_eq!(
            classify_by_keyword("  with t as (select 1) select * from t"),
            StatementKind::Read
        );
        assert_eq!(
            classify_by_keyword("DELETE FROM orders"),
            StatementKind::Write
        );
        assert_eq!(classify_by_keyword(""), StatementKind::Write);
    }

    #[test]
    fn plain_assistant_is_a_no_op() {
        let assistant = PlainAssistant;
        assert_eq!(assistant.format("select 1"), "select 1");
        assert!(assistant.validate("select 1").is_err());
    }

    #[cfg(feature = "sql-format")]
    #[test]
    fn parser_assistant_validates_and_classifies() {
        let assistant = ParserAssistant;
        assert_eq!(assistant.validate("SELECT 1; SELECT 2"), Ok(2));
        assert!(assistant.validate("SELEC 1").is_err());
        assert_eq!(assistant.classify("SELECT * FROM t"), StatementKind::Read);
        assert_eq!(
            assistant.classify("UPDATE t SET a = 1"),
            StatementKind::Write
        );
        assert_eq!(
            assistant.classify("SELECT 1; DROP TABLE t"),
            StatementKind::Write
        );
    }

    #[cfg(feature = "sql-format")]
    #[test]
    fn formatting_uppercases_keywords() {
        let formatted = ParserAssistant.format("select id from users");
        assert!(formatted.contains("SELECT"));
        assert!(formatted.contains("FROM"));
    }
}
