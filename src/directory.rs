use serde_json::Value;
use tracing::{debug, warn};

use crate::filter::{build_query, ValidityFilter};
use crate::query::Query;
use crate::types::DirectoryEntry;

/// Re-encodes a query output and decodes it as an entry. Either the whole
/// value conforms or the caller gets the error; there is no partial entry.
pub fn normalize(value: &Value) -> Result<DirectoryEntry, serde_json::Error> {
    let bytes = serde_json::to_vec(value)?;
    serde_json::from_slice(&bytes)
}

/// Entries that survived one fetch-and-filter pass, in collector order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directory {
    entries: Vec<DirectoryEntry>,
}

impl Directory {
    /// Runs the caller filter over `document` and keeps every output that
    /// normalizes. A bad filter, a non-array document and malformed elements
    /// are logged and shrink the result; they never fail the request.
    pub fn collect(document: Value, filter: Option<&str>) -> Self {
        let source = build_query(filter);
        let query = match Query::parse(&source) {
            Ok(q) => q,
            Err(e) => {
                warn!(error=%e, query=%source, "filter rejected");
                return Self::default();
            }
        };

        if !document.is_array() {
            warn!(kind = kind(&document), "collector document is not an array");
            return Self::default();
        }

        let mut entries = Vec::new();
        for (idx, out) in query.run(document).enumerate() {
            let value = match out {
                Ok(v) => v,
                Err(e) => {
                    warn!(error=%e, output = idx, "filter failed on element");
                    continue;
                }
            };
            match normalize(&value) {
                Ok(entry) => entries.push(entry),
                Err(e) => debug!(error=%e, output = idx, "dropping non-conforming entry"),
            }
        }
        debug!(query=%source, kept = entries.len(), "directory collected");
        Self { entries }
    }

    pub fn select(&self, validity: ValidityFilter) -> impl Iterator<Item = &DirectoryEntry> + '_ {
        self.entries.iter().filter(move |e| validity.matches(e))
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
