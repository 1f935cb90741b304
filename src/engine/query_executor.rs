use std::cmp::Ordering;
use std::time::Instant;

use tracing::debug;

use crate::engine::evaluator;
use crate::engine::query_parser::parse_select;
use crate::utils::config::EngineConfig;
use crate::utils::error::QueryError;
use crate::utils::types::{
    OrderBy, OrderDirection, Projection, QueryResult, Row, Table, Value,
};

/// Executes SELECT queries against an in-memory table.
///
/// The table is supplied whole at construction time and is read-only
/// for the engine's lifetime; each `execute` call works on its own
/// copies and never mutates or aliases the shared rows.
pub struct QueryEngine {
    table: Table,
    config: EngineConfig,
}

impl QueryEngine {
    /// Create an engine over a loaded table with default configuration.
    pub fn new(table: Table) -> Self {
        Self::with_config(table, EngineConfig::default())
    }

    pub fn with_config(table: Table, config: EngineConfig) -> Self {
        Self { table, config }
    }

    /// Execute one query: parse, filter, sort, limit, project.
    ///
    /// Structural failures (length cap, non-SELECT statement, missing
    /// FROM) surface as `QueryError`. Evaluation-time anomalies never
    /// do: an undecidable WHERE predicate drops the row and the query
    /// completes with whatever matched.
    pub fn execute(&self, query: &str) -> Result<QueryResult, QueryError> {
        let started = Instant::now();

        if query.len() > self.config.max_query_length {
            return Err(QueryError::TooLong {
                len: query.len(),
                max: self.config.max_query_length,
            });
        }

        if !query.trim().to_ascii_lowercase().starts_with("select") {
            return Err(QueryError::Unsupported(
                "only SELECT statements are supported".to_string(),
            ));
        }

        let parsed = parse_select(query)?;

        let mut rows: Vec<Row> = match &parsed.where_clause {
            Some(predicate) => self
                .table
                .iter()
                .filter(|row| match evaluator::evaluate(row, predicate) {
                    Ok(matched) => matched,
                    Err(e) => {
                        debug!(predicate = %predicate, error = %e, "undecidable predicate, skipping row");
                        false
                    }
                })
                .cloned()
                .collect(),
            None => self.table.clone(),
        };

        if let Some(order_by) = &parsed.order_by {
            Self::apply_sort(&mut rows, order_by);
        }

        if let Some(limit) = parsed.limit {
            rows.truncate(limit);
        }

        let (columns, rows) = Self::project(rows, &parsed.projection);

        Ok(QueryResult {
            columns,
            row_count: rows.len(),
            rows,
            execution_time: started.elapsed(),
        })
    }

    /// Stable sort of the working copy by one column.
    fn apply_sort(rows: &mut [Row], order_by: &OrderBy) {
        rows.sort_by(|a, b| {
            let ordering =
                Self::compare_values(a.get(&order_by.column), b.get(&order_by.column));
            match order_by.direction {
                OrderDirection::Ascending => ordering,
                OrderDirection::Descending => ordering.reverse(),
            }
        });
    }

    /// Total order over optional cell values. Missing values sort
    /// first; mixed tags order by type rank (numbers before text)
    /// instead of inheriting any host quirk.
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(Value::Number(x)), Some(Value::Number(y))) => {
                x.partial_cmp(y).unwrap_or(Ordering::Equal)
            }
            (Some(Value::Text(x)), Some(Value::Text(y))) => x.cmp(y),
            (Some(Value::Number(_)), Some(Value::Text(_))) => Ordering::Less,
            (Some(Value::Text(_)), Some(Value::Number(_))) => Ordering::Greater,
        }
    }

    /// Column projection. Wildcard output columns are the key set of
    /// the first post-limit row; an explicit list builds fresh rows
    /// containing only the requested columns that exist on the source
    /// row, silently omitting the rest.
    fn project(rows: Vec<Row>, projection: &Projection) -> (Vec<String>, Vec<Row>) {
        match projection {
            Projection::All => {
                let columns = rows
                    .first()
                    .map(|row| row.columns().map(str::to_string).collect())
                    .unwrap_or_default();
                (columns, rows)
            }
            Projection::Columns(requested) => {
                let projected = rows
                    .into_iter()
                    .map(|row| {
                        requested
                            .iter()
                            .filter_map(|name| {
                                row.get(name).map(|value| (name.clone(), value.clone()))
                            })
                            .collect()
                    })
                    .collect();
                (requested.clone(), projected)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let people = [
            ("John", 30.0, 75000.0),
            ("Jane", 25.0, 65000.0),
            ("Bob", 35.0, 80000.0),
            ("Alice", 28.0, 70000.0),
        ];
        people
            .iter()
            .map(|(name, age, salary)| {
                let mut row = Row::new();
                row.insert("name", Value::Text(name.to_string()));
                row.insert("age", Value::Number(*age));
                row.insert("salary", Value::Number(*salary));
                row
            })
            .collect()
    }

    fn names(result: &QueryResult) -> Vec<String> {
        result
            .rows
            .iter()
            .map(|row| row.get("name").unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_select_star_returns_whole_table() {
        let engine = QueryEngine::new(sample_table());
        let result = engine.execute("SELECT * FROM people").unwrap();

        assert_eq!(result.row_count, 4);
        assert_eq!(result.rows.len(), 4);
        assert_eq!(result.columns, vec!["name", "age", "salary"]);
    }

    #[test]
    fn test_select_star_on_empty_table() {
        let engine = QueryEngine::new(Vec::new());
        let result = engine.execute("SELECT * FROM people").unwrap();

        assert_eq!(result.row_count, 0);
        assert!(result.columns.is_empty());
    }

    #[test]
    fn test_where_equality() {
        let engine = QueryEngine::new(sample_table());
        let result = engine.execute("SELECT * FROM people WHERE age = 30").unwrap();

        assert_eq!(result.row_count, 1);
        assert_eq!(names(&result), vec!["John"]);
    }

    #[test]
    fn test_where_ordering() {
        let engine = QueryEngine::new(sample_table());
        let result = engine
            .execute("SELECT * FROM people WHERE salary > 70000")
            .unwrap();

        assert_eq!(names(&result), vec!["John", "Bob"]);
    }

    #[test]
    fn test_where_and() {
        let engine = QueryEngine::new(sample_table());
        let result = engine
            .execute("SELECT * FROM people WHERE age > 25 AND salary < 80000")
            .unwrap();

        assert_eq!(names(&result), vec!["John", "Alice"]);
    }

    #[test]
    fn test_where_or() {
        let engine = QueryEngine::new(sample_table());
        let result = engine
            .execute("SELECT * FROM people WHERE age = 25 OR age = 30")
            .unwrap();

        assert_eq!(names(&result), vec!["John", "Jane"]);
    }

    #[test]
    fn test_where_like() {
        let engine = QueryEngine::new(sample_table());
        let result = engine
            .execute("SELECT * FROM people WHERE name LIKE \"J%\"")
            .unwrap();

        assert_eq!(names(&result), vec!["John", "Jane"]);
    }

    #[test]
    fn test_full_pipeline() {
        let engine = QueryEngine::new(sample_table());
        let result = engine
            .execute(
                "SELECT name, salary FROM people WHERE salary >= 70000 ORDER BY salary DESC LIMIT 2",
            )
            .unwrap();

        assert_eq!(result.columns, vec!["name", "salary"]);
        assert_eq!(result.row_count, 2);
        assert_eq!(names(&result), vec!["Bob", "John"]);
        assert_eq!(
            result.rows[0].get("salary"),
            Some(&Value::Number(80000.0))
        );
        assert!(result.rows[0].get("age").is_none());
    }

    #[test]
    fn test_update_is_unsupported() {
        let engine = QueryEngine::new(sample_table());
        let result = engine.execute("UPDATE people SET age=30");

        assert!(matches!(result, Err(QueryError::Unsupported(_))));
    }

    #[test]
    fn test_query_too_long() {
        let engine = QueryEngine::with_config(
            sample_table(),
            EngineConfig { max_query_length: 32 },
        );
        let query = format!("SELECT * FROM people WHERE name = '{}'", "x".repeat(64));
        let result = engine.execute(&query);

        assert!(matches!(result, Err(QueryError::TooLong { .. })));
    }

    #[test]
    fn test_missing_from_is_malformed() {
        let engine = QueryEngine::new(sample_table());
        let result = engine.execute("SELECT name");

        assert!(matches!(result, Err(QueryError::Malformed(_))));
    }

    #[test]
    fn test_bad_where_reference_yields_zero_rows() {
        let engine = QueryEngine::new(sample_table());
        let result = engine
            .execute("SELECT * FROM people WHERE nonexistent = 1")
            .unwrap();

        assert_eq!(result.row_count, 0);
    }

    #[test]
    fn test_undecidable_where_yields_zero_rows() {
        let engine = QueryEngine::new(sample_table());
        let result = engine
            .execute("SELECT * FROM people WHERE gibberish")
            .unwrap();

        assert_eq!(result.row_count, 0);
    }

    #[test]
    fn test_order_by_ascending_and_descending_reverse() {
        let engine = QueryEngine::new(sample_table());
        let asc = engine
            .execute("SELECT * FROM people ORDER BY age")
            .unwrap();
        let desc = engine
            .execute("SELECT * FROM people ORDER BY age DESC")
            .unwrap();

        assert_eq!(names(&asc), vec!["Jane", "Alice", "John", "Bob"]);
        let mut reversed = names(&desc);
        reversed.reverse();
        assert_eq!(names(&asc), reversed);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut table = sample_table();
        for row in &mut table {
            row.insert("dept", Value::Text("eng".to_string()));
        }
        let engine = QueryEngine::new(table);
        let result = engine
            .execute("SELECT * FROM people ORDER BY dept")
            .unwrap();

        // Equal keys preserve the upstream order
        assert_eq!(names(&result), vec!["John", "Jane", "Bob", "Alice"]);
    }

    #[test]
    fn test_sort_does_not_mutate_source_table() {
        let engine = QueryEngine::new(sample_table());
        engine
            .execute("SELECT * FROM people ORDER BY age")
            .unwrap();
        let again = engine.execute("SELECT * FROM people").unwrap();

        assert_eq!(names(&again), vec!["John", "Jane", "Bob", "Alice"]);
    }

    #[test]
    fn test_limit_truncates() {
        let engine = QueryEngine::new(sample_table());
        let result = engine.execute("SELECT * FROM people LIMIT 2").unwrap();
        assert_eq!(result.row_count, 2);

        let result = engine.execute("SELECT * FROM people LIMIT 100").unwrap();
        assert_eq!(result.row_count, 4);
    }

    #[test]
    fn test_limit_zero_is_ignored() {
        let engine = QueryEngine::new(sample_table());
        let result = engine.execute("SELECT * FROM people LIMIT 0").unwrap();

        assert_eq!(result.row_count, 4);
    }

    #[test]
    fn test_projection_omits_missing_columns() {
        let engine = QueryEngine::new(sample_table());
        let result = engine
            .execute("SELECT name, nonexistent FROM people")
            .unwrap();

        assert_eq!(result.columns, vec!["name", "nonexistent"]);
        for row in &result.rows {
            assert_eq!(row.len(), 1);
            assert!(row.contains("name"));
        }
    }

    #[test]
    fn test_projection_builds_fresh_rows() {
        let engine = QueryEngine::new(sample_table());
        let result = engine.execute("SELECT name FROM people").unwrap();

        for row in &result.rows {
            let columns: Vec<&str> = row.columns().collect();
            assert_eq!(columns, vec!["name"]);
        }
    }

    #[test]
    fn test_row_count_matches_rows() {
        let engine = QueryEngine::new(sample_table());
        for query in [
            "SELECT * FROM people",
            "SELECT * FROM people WHERE age > 27",
            "SELECT name FROM people LIMIT 3",
        ] {
            let result = engine.execute(query).unwrap();
            assert_eq!(result.row_count, result.rows.len());
        }
    }

    #[test]
    fn test_compare_values_mixed_types_rank() {
        use std::cmp::Ordering;

        let number = Value::Number(1.0);
        let text = Value::Text("a".to_string());

        assert_eq!(
            QueryEngine::compare_values(Some(&number), Some(&text)),
            Ordering::Less
        );
        assert_eq!(
            QueryEngine::compare_values(Some(&text), Some(&number)),
            Ordering::Greater
        );
        assert_eq!(
            QueryEngine::compare_values(None, Some(&number)),
            Ordering::Less
        );
        assert_eq!(QueryEngine::compare_values(None, None), Ordering::Equal);
    }
}
