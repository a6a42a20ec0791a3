//! Sort direction for list queries.

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the wire name used in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }

    /// Parses a wire name, defaulting to ascending for unknown input.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "desc" => Direction::Desc,
            _ => Direction::Asc,
        }
    }
}
