use crate::types::DirectoryEntry;

/// Wraps an optional caller predicate into a query over the top-level array.
///
/// The predicate is interpolated as-is; it is only checked when the query is
/// parsed.
pub fn build_query(filter: Option<&str>) -> String {
    match filter.map(str::trim) {
        Some(expr) if !expr.is_empty() => format!(".[] | select({expr})"),
        _ => ".[]".to_string(),
    }
}

/// Which entries pass, by their `valid` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityFilter {
    Only(bool),
    All,
}

impl Default for ValidityFilter {
    fn default() -> Self {
        ValidityFilter::Only(true)
    }
}

impl ValidityFilter {
    /// `all` disables the filter, a boolean selects on it, and anything else
    /// (including a malformed value) falls back to valid entries only.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("all") => ValidityFilter::All,
            Some(raw) => parse_bool(raw).map_or_else(Self::default, ValidityFilter::Only),
            None => Self::default(),
        }
    }

    pub fn matches(&self, entry: &DirectoryEntry) -> bool {
        match self {
            ValidityFilter::All => true,
            ValidityFilter::Only(valid) => entry.valid == *valid,
        }
    }
}

/// Boolean request flag, false unless it parses as true.
pub fn parse_flag(param: Option<&str>) -> bool {
    param.and_then(parse_bool).unwrap_or(false)
}

/// Accepts the spellings existing clients send: `1 t T TRUE true True` and
/// their false counterparts.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
