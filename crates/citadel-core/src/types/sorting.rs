//! Sorting types for list endpoints.
//!
//! List endpoints accept `order_by=column:dir,column:dir`. Columns are
//! checked against a per-resource whitelist before they ever reach SQL.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(AppError::validation(format!(
                "invalid order direction: {s} (must be 'asc' or 'desc')"
            ))),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A sort specification consisting of a whitelisted column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Column name, always one of the whitelist entries it was parsed against.
    pub field: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortField {
    /// Create a new sort field.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Create an ascending sort on the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Create a descending sort on the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Parse a comma-separated `column:direction` list.
    ///
    /// Every column must appear in `allowed`; an empty input yields an
    /// empty list so the caller can apply its own default ordering.
    pub fn parse_list(raw: &str, allowed: &[&str]) -> Result<Vec<Self>, AppError> {
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        raw.split(',')
            .map(|part| {
                let part = part.trim();
                let (column, direction) = part.split_once(':').ok_or_else(|| {
                    AppError::validation(format!(
                        "invalid order_by format: {part} (expected 'column:order')"
                    ))
                })?;
                if direction.contains(':') {
                    return Err(AppError::validation(format!(
                        "invalid order_by format: {part} (expected 'column:order')"
                    )));
                }

                let column = column.trim();
                let field = allowed
                    .iter()
                    .find(|c| **c == column)
                    .ok_or_else(|| AppError::validation(format!("invalid column name: {column}")))?;

                Ok(Self::new(*field, direction.parse()?))
            })
            .collect()
    }
}
