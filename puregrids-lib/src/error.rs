use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    /// A column count that is not a positive integer.
    #[error("Invalid column count: {0} (expected a positive integer)")]
    InvalidColumnCount(i64),
    /// A generated selector without a `N` or `N-D` suffix after its prefix.
    /// Only reachable through a generator bug.
    #[error("Malformed grid unit selector: {0}")]
    MalformedSelector(String),
    #[error("Invalid grid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Failed to render CSS: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, GridError>;

/// Checks caller-supplied column counts, rejecting anything that is not a
/// positive integer that fits a `u32`.
pub fn validate_column_counts(counts: &[i64]) -> Result<Vec<u32>> {
    counts
        .iter()
        .map(|&count| match u32::try_from(count) {
            Ok(valid) if valid > 0 => Ok(valid),
            _ => Err(GridError::InvalidColumnCount(count)),
        })
        .collect()
}
