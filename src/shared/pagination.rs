use serde::Serialize;
use utoipa::ToSchema;

pub const MAX_LIMIT: i64 = 100;

/// Limit/offset window applied to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    /// Clamp caller-supplied values: limit to `1..=MAX_LIMIT`, offset to `>= 0`.
    pub fn new(limit: Option<i64>, offset: Option<i64>, default_limit: i64) -> Self {
        Self {
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}
