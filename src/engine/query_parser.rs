use crate::utils::error::QueryError;
use crate::utils::types::{OrderBy, OrderDirection, ParsedQuery, Projection};

/// Splits a raw SELECT query into its clause substrings using linear
/// substring scans. Clause markers are located case-insensitively on
/// an ASCII-lowercased shadow of the normalized text, so byte offsets
/// line up for slicing the original. No validation against the
/// table's actual columns happens here; invalid references surface
/// later as non-matches or are dropped by projection.
pub fn parse_select(query: &str) -> Result<ParsedQuery, QueryError> {
    let normalized = normalize_whitespace(query);
    let lower = normalized.to_ascii_lowercase();

    let select_pos = lower
        .find("select ")
        .ok_or_else(|| QueryError::Malformed("missing SELECT clause".to_string()))?;
    let columns_start = select_pos + "select ".len();

    let from_pos = find_from(&lower, " from", columns_start)
        .ok_or_else(|| QueryError::Malformed("missing FROM clause".to_string()))?;

    let projection = parse_projection(normalized[columns_start..from_pos].trim());

    // Clause markers are searched from just past " from"; each clause
    // runs to the start of the next marker that is present.
    let tail_start = from_pos + " from".len();
    let where_pos = find_from(&lower, " where ", tail_start);
    let order_pos = find_from(&lower, " order by", tail_start);
    let limit_pos = find_from(&lower, " limit", tail_start);

    let where_clause = where_pos.map(|pos| {
        let start = pos + " where ".len();
        let end = clause_end(start, &[order_pos, limit_pos], normalized.len());
        normalized[start..end].trim().to_string()
    });

    let order_by = order_pos.and_then(|pos| {
        let start = pos + " order by".len();
        let end = clause_end(start, &[limit_pos], normalized.len());
        parse_order_by(normalized[start..end].trim())
    });

    let limit = limit_pos.and_then(|pos| {
        let start = pos + " limit".len();
        parse_limit(normalized[start..].trim())
    });

    Ok(ParsedQuery {
        projection,
        where_clause,
        order_by,
        limit,
    })
}

/// Collapse every whitespace run to a single space and trim. Makes the
/// fixed-offset marker searches reliable and bounds the cost of any
/// later matching against pathological whitespace.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn find_from(haystack: &str, needle: &str, start: usize) -> Option<usize> {
    haystack.get(start..)?.find(needle).map(|pos| start + pos)
}

/// End of a clause: the nearest following marker, or end of string.
fn clause_end(start: usize, next_markers: &[Option<usize>], len: usize) -> usize {
    next_markers
        .iter()
        .flatten()
        .copied()
        .filter(|&pos| pos >= start)
        .min()
        .unwrap_or(len)
        .max(start)
}

fn parse_projection(text: &str) -> Projection {
    if text == "*" {
        Projection::All
    } else {
        Projection::Columns(text.split(',').map(|name| name.trim().to_string()).collect())
    }
}

/// ORDER BY text splits on the single space left by normalization;
/// direction is descending only when the second token says so.
fn parse_order_by(text: &str) -> Option<OrderBy> {
    let mut tokens = text.split(' ');
    let column = tokens.next().filter(|name| !name.is_empty())?;
    let direction = match tokens.next() {
        Some(token) if token.eq_ignore_ascii_case("desc") => OrderDirection::Descending,
        _ => OrderDirection::Ascending,
    };
    Some(OrderBy {
        column: column.to_string(),
        direction,
    })
}

/// A present but non-positive or non-numeric LIMIT is ignored rather
/// than treated as an error.
fn parse_limit(text: &str) -> Option<usize> {
    text.parse::<i64>().ok().filter(|&n| n > 0).map(|n| n as usize)
}
