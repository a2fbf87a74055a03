use serde::Serialize;
use thiserror::Error;

/// Comparison in a metrics filter clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FilterOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
}

impl FilterOp {
    fn parse(token: &str) -> Option<Self> {
        Some(match token {
            "==" => FilterOp::Eq,
            "!=" => FilterOp::Ne,
            ">=" => FilterOp::Ge,
            "<=" => FilterOp::Le,
            ">" => FilterOp::Gt,
            "<" => FilterOp::Lt,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilterClause {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("empty filter clause")]
    EmptyClause,
    #[error("expected `field op value`, got `{0}`")]
    Shape(String),
    #[error("invalid field name `{0}`")]
    Field(String),
    #[error("unknown operator `{0}`")]
    Operator(String),
}

/// Parses `field op value [and field op value ...]`.
///
/// Values may be double-quoted to carry spaces. An empty filter string yields
/// no clauses.
pub fn parse_filter(input: &str) -> Result<Vec<FilterClause>, FilterError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    input.split(" and ").map(parse_clause).collect()
}

fn parse_clause(raw: &str) -> Result<FilterClause, FilterError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FilterError::EmptyClause);
    }
    let mut parts = raw.splitn(3, char::is_whitespace);
    let (Some(field), Some(op), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FilterError::Shape(raw.to_string()));
    };
    if !is_field_name(field) {
        return Err(FilterError::Field(field.to_string()));
    }
    let op = FilterOp::parse(op).ok_or_else(|| FilterError::Operator(op.to_string()))?;
    let value = unquote(value.trim()).ok_or_else(|| FilterError::Shape(raw.to_string()))?;
    Ok(FilterClause {
        field: field.to_string(),
        op,
        value,
    })
}

fn is_field_name(field: &str) -> bool {
    let mut chars = field.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn unquote(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    match value.strip_prefix('"') {
        Some(rest) => rest
            .strip_suffix('"')
            .filter(|inner| !inner.contains('"'))
            .map(str::to_string),
        None if value.contains(char::is_whitespace) || value.contains('"') => None,
        None => Some(value.to_string()),
    }
}
