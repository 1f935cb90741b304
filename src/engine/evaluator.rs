use regex::Regex;

use crate::utils::error::EvalError;
use crate::utils::types::{Row, Value};

/// Algebraic operators, tried in this fixed order. For each, the
/// first occurrence with a non-empty column name to its left wins the
/// split into column and literal.
const COMPARISON_OPS: [&str; 6] = [">=", "<=", "!=", ">", "<", "="];

/// Evaluate a WHERE predicate against one row.
///
/// Two-level grammar with no parentheses: the predicate is an OR of
/// AND-groups of comparisons, so `A and B or C` reads as
/// `(A and B) or C`. A comparison that cannot be parsed counts as
/// false inside its group; `Err` is returned only when nothing in the
/// predicate was decidable, and the caller is expected to log it and
/// treat the row as a non-match rather than fail the query.
pub fn evaluate(row: &Row, predicate: &str) -> Result<bool, EvalError> {
    let mut first_error = None;
    let mut errored = 0;
    let groups = split_keyword(predicate, "or");
    let group_count = groups.len();

    for group in groups {
        match evaluate_and_group(row, group) {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(e) => {
                errored += 1;
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        // Nothing was decidable
        Some(e) if errored == group_count => Err(e),
        _ => Ok(false),
    }
}

/// All comparisons in the group must hold. A decided-false comparison
/// settles the group even when a sibling comparison is unparseable.
fn evaluate_and_group(row: &Row, group: &str) -> Result<bool, EvalError> {
    let mut first_error = None;

    for comparison in split_keyword(group, "and") {
        match evaluate_comparison(row, comparison) {
            Ok(false) => return Ok(false),
            Ok(true) => {}
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(true),
    }
}

/// Split on a lower-case keyword delimited by single spaces,
/// case-insensitively, without regex. Returns the whole text as one
/// part when the keyword is absent.
fn split_keyword<'a>(text: &'a str, keyword: &str) -> Vec<&'a str> {
    let lower = text.to_ascii_lowercase();
    let needle = format!(" {} ", keyword);

    let mut parts = Vec::new();
    let mut start = 0;
    let mut search = 0;
    while let Some(pos) = lower[search..].find(&needle).map(|p| search + p) {
        parts.push(text[start..pos].trim());
        start = pos + needle.len();
        search = start;
    }
    parts.push(text[start..].trim());
    parts
}

/// Evaluate a single `column op literal` comparison.
fn evaluate_comparison(row: &Row, comparison: &str) -> Result<bool, EvalError> {
    // LIKE first: its literal may contain characters such as < or >
    // inside the quotes.
    if let Some(pos) = find_case_insensitive(comparison, " like ") {
        let column = comparison[..pos].trim();
        if column.is_empty() {
            return Err(EvalError::UnparsableComparison(comparison.to_string()));
        }
        let literal = comparison[pos + " like ".len()..].trim();
        return evaluate_like(row, column, literal);
    }

    for op in COMPARISON_OPS {
        if let Some(pos) = comparison.find(op) {
            let column = comparison[..pos].trim();
            if column.is_empty() {
                continue;
            }
            let literal = strip_quotes(comparison[pos + op.len()..].trim());

            // Absent column: this row simply does not match; the
            // overall evaluation carries on.
            let value = match row.get(column) {
                Some(value) => value,
                None => return Ok(false),
            };
            return Ok(compare_value(value, op, literal));
        }
    }

    Err(EvalError::UnparsableComparison(comparison.to_string()))
}

/// SQL LIKE: `%` matches zero or more of any character, everything
/// else is literal. Case-insensitive and anchored to the whole value.
fn evaluate_like(row: &Row, column: &str, literal: &str) -> Result<bool, EvalError> {
    let pattern = unquote(literal)
        .ok_or_else(|| EvalError::UnquotedLikePattern(literal.to_string()))?;

    // Escape before substituting the wildcard so no other
    // metacharacter survives into the match.
    let regex_pattern = format!("(?i)^{}$", regex::escape(pattern).replace('%', ".*"));
    let regex = Regex::new(&regex_pattern)
        .map_err(|_| EvalError::InvalidLikePattern(pattern.to_string()))?;

    Ok(row
        .get(column)
        .map(|value| regex.is_match(&value.to_string()))
        .unwrap_or(false))
}

/// Compare with explicit tag dispatch. A numeric row value coerces the
/// literal to f64; when that fails the comparison is mixed-type and
/// resolves to the original host's outcomes: equality false,
/// inequality true, ordering false.
fn compare_value(value: &Value, op: &str, literal: &str) -> bool {
    match value {
        Value::Number(n) => match literal.parse::<f64>() {
            Ok(lit) => match op {
                "=" => *n == lit,
                "!=" => *n != lit,
                ">" => *n > lit,
                "<" => *n < lit,
                ">=" => *n >= lit,
                "<=" => *n <= lit,
                _ => false,
            },
            Err(_) => op == "!=",
        },
        Value::Text(s) => match op {
            "=" => s == literal,
            "!=" => s != literal,
            ">" => s.as_str() > literal,
            "<" => s.as_str() < literal,
            ">=" => s.as_str() >= literal,
            "<=" => s.as_str() <= literal,
            _ => false,
        },
    }
}

fn find_case_insensitive(text: &str, needle: &str) -> Option<usize> {
    text.to_ascii_lowercase().find(needle)
}

/// Strip one matching pair of surrounding quotes, if present.
fn strip_quotes(literal: &str) -> &str {
    unquote(literal).unwrap_or(literal)
}

fn unquote(literal: &str) -> Option<&str> {
    let bytes = literal.as_bytes();
    if literal.len() >= 2
        && (bytes[0] == b'\'' || bytes[0] == b'"')
        && bytes[literal.len() - 1] == bytes[0]
    {
        Some(&literal[1..literal.len() - 1])
    } else {
        None
    }
}
