use colored::*;
use serde_json::{json, Value as JsonValue};

use crate::cli::cli_args::OutputFormat;
use crate::utils::error::CsvqlError;
use crate::utils::types::{QueryResult, Value};

/// Formats query results for CLI output
pub struct OutputFormatter;

impl OutputFormatter {
    /// Format query results according to the specified format
    pub fn format_result(result: &QueryResult, format: &OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_table(result),
            OutputFormat::Json => Self::format_json(result),
            OutputFormat::Csv => Self::format_csv(result),
        }
    }

    /// Format results as a colored table
    fn format_table(result: &QueryResult) -> String {
        if result.is_empty() {
            return "No results found.".dimmed().to_string();
        }

        let mut output = String::new();

        // Calculate column widths
        let mut col_widths: Vec<usize> =
            result.columns.iter().map(|col| col.len()).collect();

        for row in &result.rows {
            for (i, col) in result.columns.iter().enumerate() {
                let value_str = Self::cell_to_string(row.get(col));
                col_widths[i] = col_widths[i].max(value_str.len());
            }
        }

        // Ensure minimum width
        for width in &mut col_widths {
            *width = (*width).max(8);
        }

        // Header
        output.push_str(&Self::format_table_separator(&col_widths));
        output.push('|');
        for (i, col) in result.columns.iter().enumerate() {
            output.push_str(&format!(
                " {:<width$} |",
                col.bold().cyan(),
                width = col_widths[i]
            ));
        }
        output.push('\n');
        output.push_str(&Self::format_table_separator(&col_widths));

        // Data rows
        for row in &result.rows {
            output.push('|');
            for (i, col) in result.columns.iter().enumerate() {
                let formatted_value = Self::format_cell_colored(row.get(col));
                output.push_str(&format!(
                    " {:<width$} |",
                    formatted_value,
                    width = col_widths[i]
                ));
            }
            output.push('\n');
        }

        output.push_str(&Self::format_table_separator(&col_widths));

        // Footer with metadata
        output.push_str(&format!(
            "\n{} {} in {:.2}ms\n",
            result.row_count.to_string().green().bold(),
            if result.row_count == 1 { "row" } else { "rows" },
            result.execution_time.as_secs_f64() * 1000.0
        ));

        output
    }

    /// Format table separator line
    fn format_table_separator(col_widths: &[usize]) -> String {
        let mut separator = String::new();
        separator.push('+');
        for &width in col_widths {
            separator.push_str(&"-".repeat(width + 2));
            separator.push('+');
        }
        separator.push('\n');
        separator
    }

    /// Format results as JSON
    fn format_json(result: &QueryResult) -> String {
        let mut rows = Vec::new();

        for row in &result.rows {
            let mut row_obj = serde_json::Map::new();
            for (column, value) in row.iter() {
                row_obj.insert(column.to_string(), Self::value_to_json(value));
            }
            rows.push(JsonValue::Object(row_obj));
        }

        let output = json!({
            "data": rows,
            "metadata": {
                "columns": result.columns,
                "row_count": result.row_count,
                "execution_time_ms": result.execution_time.as_millis() as u64
            }
        });

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format results as CSV
    fn format_csv(result: &QueryResult) -> String {
        let mut output = String::new();

        // Header
        let headers: Vec<String> = result
            .columns
            .iter()
            .map(|col| Self::escape_csv_field(col))
            .collect();
        output.push_str(&headers.join(","));
        output.push('\n');

        // Data rows
        for row in &result.rows {
            let values: Vec<String> = result
                .columns
                .iter()
                .map(|col| Self::escape_csv_field(&Self::cell_to_string(row.get(col))))
                .collect();
            output.push_str(&values.join(","));
            output.push('\n');
        }

        output
    }

    /// Convert an optional cell to a display string; a column the
    /// projection omitted renders empty.
    fn cell_to_string(value: Option<&Value>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    /// Convert a cell to a colored string for table display
    fn format_cell_colored(value: Option<&Value>) -> ColoredString {
        match value {
            Some(Value::Text(s)) => s.normal(),
            Some(Value::Number(n)) => n.to_string().blue(),
            None => "".normal(),
        }
    }

    /// Convert a Value to JSON
    fn value_to_json(value: &Value) -> JsonValue {
        match value {
            Value::Text(s) => JsonValue::String(s.clone()),
            Value::Number(n) => {
                // Integral numbers serialize without a trailing .0
                if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 {
                    JsonValue::Number((*n as i64).into())
                } else if let Some(num) = serde_json::Number::from_f64(*n) {
                    JsonValue::Number(num)
                } else {
                    JsonValue::Null
                }
            }
        }
    }

    /// Escape CSV field if it contains special characters
    fn escape_csv_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Format error message for CLI display
    pub fn format_error(error: &CsvqlError) -> String {
        format!("{} {}", "Error:".red().bold(), error.to_string().red())
    }

    /// Format info message for CLI display
    pub fn format_info(message: &str) -> String {
        format!("{} {}", "Info:".blue().bold(), message)
    }
}
