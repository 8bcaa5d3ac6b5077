//! Path expressions over JSON documents.
//!
//! Grammar:
//!
//! ```text
//! $.<segment>(.<segment>)*
//! segment := name | name[<index>]... | name[?(@.<key>==<literal>)]
//! ```
//!
//! Exactly one filter clause shape is recognised, matched by a fixed
//! pattern: `<arrayPath>[?(@.<key>==<literal>)]<remainingPath>`. The clause
//! selects the FIRST array element whose `key` loosely equals `literal`.
//! Anything else containing `[?(@.` is resolved as a plain path, which then
//! misses and yields `null`.
//!
//! Resolution is total: a missing key, a type mismatch, or a path that does
//! not parse all produce `None` (or `Value::Null` from [`extract`]), with a
//! diagnostic emitted through `tracing`.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// The marker that announces a filter clause.
const FILTER_OPEN: &str = "[?(@.";
const FILTER_EQ: &str = "==";
const FILTER_CLOSE: &str = ")]";

/// Why a path expression could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path expression is empty")]
    Empty,

    #[error("empty segment in path '{path}'")]
    EmptySegment { path: String },

    #[error("unbalanced bracket in path '{path}'")]
    UnbalancedBracket { path: String },

    #[error("unexpected text after ']' in path '{path}'")]
    TrailingText { path: String },
}

/// One step of a plain traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Property name. A numeric key also indexes arrays (`items.0`).
    Key(String),
    /// Bracketed array index (`items[0]`).
    Index(usize),
}

impl Segment {
    fn lookup<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        match (self, value) {
            (Segment::Key(key), Value::Object(map)) => map.get(key),
            (Segment::Key(key), Value::Array(items)) => {
                key.parse::<usize>().ok().and_then(|i| items.get(i))
            }
            (Segment::Index(i), Value::Array(items)) => items.get(*i),
            (Segment::Index(i), Value::Object(map)) => map.get(&i.to_string()),
            _ => None,
        }
    }
}

/// The right-hand side of a filter comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl Literal {
    /// Numeric if the text parses as a finite number, otherwise a string.
    pub fn parse(raw: &str) -> Self {
        match parse_number(raw) {
            Some(n) => Literal::Number(n),
            None => Literal::Text(raw.to_string()),
        }
    }

    /// Loose equality between a document value and this literal.
    ///
    /// Numeric strings compare equal to numbers and booleans count as 1/0
    /// against a numeric literal. Null, objects, and arrays never match.
    pub fn matches(&self, candidate: &Value) -> bool {
        match (candidate, self) {
            (Value::Number(n), Literal::Number(x)) => n.as_f64() == Some(*x),
            (Value::String(s), Literal::Number(x)) => parse_number(s) == Some(*x),
            (Value::String(s), Literal::Text(t)) => s == t,
            (Value::Bool(b), Literal::Number(x)) => {
                let as_number = if *b { 1.0 } else { 0.0 };
                as_number == *x
            }
            _ => false,
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `<array>[?(@.<key>==<literal>)]<rest>`
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub array: Vec<Segment>,
    pub key: Vec<Segment>,
    pub literal: Literal,
    /// Applied to the selected element; empty means "the element itself".
    pub rest: Vec<Segment>,
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq)]
pub enum PathExpression {
    Plain(Vec<Segment>),
    Filtered(FilterClause),
}

impl PathExpression {
    /// Parse `raw`, stripping a leading `$.` when present.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let body = raw.strip_prefix("$.").unwrap_or(raw);
        if body.is_empty() {
            return Err(PathError::Empty);
        }

        if body.contains(FILTER_OPEN) {
            if let Some((array, key, literal, rest)) = split_filter(body) {
                let rest = rest.strip_prefix('.').unwrap_or(rest);
                let rest = if rest.is_empty() {
                    Vec::new()
                } else {
                    parse_segments(rest)?
                };
                return Ok(PathExpression::Filtered(FilterClause {
                    array: parse_segments(array)?,
                    key: parse_segments(key)?,
                    literal: Literal::parse(literal),
                    rest,
                }));
            }
        }

        parse_segments(body).map(PathExpression::Plain)
    }

    pub fn has_filter(&self) -> bool {
        matches!(self, PathExpression::Filtered(_))
    }

    /// Resolve against `document`. `None` on any miss.
    pub fn resolve<'v>(&self, document: &'v Value) -> Option<&'v Value> {
        match self {
            PathExpression::Plain(segments) => walk(document, segments),
            PathExpression::Filtered(clause) => {
                let items = walk(document, &clause.array)?.as_array()?;
                let selected = items.iter().find(|item| {
                    walk(item, &clause.key).is_some_and(|v| clause.literal.matches(v))
                })?;
                walk(selected, &clause.rest)
            }
        }
    }
}

fn walk<'v>(root: &'v Value, segments: &[Segment]) -> Option<&'v Value> {
    segments
        .iter()
        .try_fold(root, |current, segment| segment.lookup(current))
}

/// Resolve `path` against `document`, borrowing the result.
pub fn resolve_path<'v>(document: &'v Value, path: &str) -> Option<&'v Value> {
    let expr = match PathExpression::parse(path) {
        Ok(expr) => expr,
        Err(e) => {
            warn!(path = %path, error = %e, "unparsable path expression");
            return None;
        }
    };

    if path.contains(FILTER_OPEN) && !expr.has_filter() {
        warn!(
            path = %path,
            "filter clause does not match the supported [?(@.key==value)] shape"
        );
    }

    let resolved = expr.resolve(document).filter(|v| !v.is_null());
    if resolved.is_none() {
        debug!(path = %path, "path did not resolve");
    }
    resolved
}

/// Extract the value at `path`, or `Value::Null` when it cannot be resolved.
///
/// Never fails. Composite values (objects, arrays) are returned as-is.
pub fn extract(document: &Value, path: &str) -> Value {
    resolve_path(document, path).cloned().unwrap_or(Value::Null)
}

/// Split `body` into `(array, key, literal, rest)` using the leftmost,
/// shortest match of `^(.+?)\[\?\(@\.(.+?)==(.+?)\)\](.*)$`.
fn split_filter(body: &str) -> Option<(&str, &str, &str, &str)> {
    for open in positions(body, FILTER_OPEN).filter(|&i| i > 0) {
        let tail = &body[open + FILTER_OPEN.len()..];
        for eq in positions(tail, FILTER_EQ).filter(|&i| i > 0) {
            let value_tail = &tail[eq + FILTER_EQ.len()..];
            if let Some(close) = positions(value_tail, FILTER_CLOSE).find(|&i| i > 0) {
                return Some((
                    &body[..open],
                    &tail[..eq],
                    &value_tail[..close],
                    &value_tail[close + FILTER_CLOSE.len()..],
                ));
            }
        }
    }
    None
}

/// Every byte offset at which `needle` starts, overlapping matches included.
fn positions<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = usize> + 'a {
    haystack
        .char_indices()
        .map(|(i, _)| i)
        .filter(move |&i| haystack[i..].starts_with(needle))
}

/// Parse a plain dotted path with optional `[n]` / `['key']` brackets.
fn parse_segments(path: &str) -> Result<Vec<Segment>, PathError> {
    let mut segments = Vec::new();
    let mut name = String::new();
    // True right after a `]`, where only `.` or `[` may follow.
    let mut closed_bracket = false;
    let mut chars = path.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '.' => {
                if name.is_empty() && !closed_bracket {
                    return Err(PathError::EmptySegment { path: path.to_string() });
                }
                if !name.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut name)));
                }
                closed_bracket = false;
                if i + 1 == path.len() {
                    return Err(PathError::EmptySegment { path: path.to_string() });
                }
            }
            '[' => {
                if !name.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut name)));
                }
                let inner_start = i + 1;
                let close = path[inner_start..]
                    .find(']')
                    .map(|offset| inner_start + offset)
                    .ok_or_else(|| PathError::UnbalancedBracket { path: path.to_string() })?;
                segments.push(bracket_segment(&path[inner_start..close], path)?);
                // Skip past the closing bracket.
                for (j, _) in chars.by_ref() {
                    if j == close {
                        break;
                    }
                }
                closed_bracket = true;
            }
            ']' => return Err(PathError::UnbalancedBracket { path: path.to_string() }),
            _ => {
                if closed_bracket {
                    return Err(PathError::TrailingText { path: path.to_string() });
                }
                name.push(c);
            }
        }
    }

    if !name.is_empty() {
        segments.push(Segment::Key(name));
    } else if segments.is_empty() {
        return Err(PathError::EmptySegment { path: path.to_string() });
    }

    Ok(segments)
}

fn bracket_segment(inner: &str, path: &str) -> Result<Segment, PathError> {
    let inner = inner.trim();
    if inner.is_empty() {
        return Err(PathError::EmptySegment { path: path.to_string() });
    }
    let quoted = ['\'', '"']
        .iter()
        .find_map(|q| inner.strip_prefix(*q).and_then(|s| s.strip_suffix(*q)));
    if let Some(key) = quoted {
        return Ok(Segment::Key(key.to_string()));
    }
    Ok(match inner.parse::<usize>() {
        Ok(index) => Segment::Index(index),
        Err(_) => Segment::Key(inner.to_string()),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
