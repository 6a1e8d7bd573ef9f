use super::*;
use thiserror::Error;

/// Ways a schema-aware parse can come up short.
///
/// None of these escape the engine: `Empty` is converted into a successful
/// empty-status result, `MissingKey` triggers partial extraction, and the
/// rest make the structured tier decline so the chain moves on.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Output is valid but syntactically empty (treated as success upstream).
    #[error("output is syntactically empty")]
    Empty,
    /// The schema partially matched but a required key is absent.
    #[error("required key '{0}' missing from output")]
    MissingKey(String),
    /// No template is registered for this command/platform pair.
    #[error("no template registered for command")]
    NoTemplate,
    /// The template exists but failed against this output.
    #[error("structured parse failed: {0}")]
    Failed(String),
}

/// Pluggable schema-aware parsing capability.
///
/// The engine checks for this capability once at construction; when absent it
/// simply starts at the text-pattern tier. Implementations must be safe to
/// share across worker threads.
pub trait StructuredParser: Send + Sync {
    /// Attempts a schema parse of `raw_output` for the resolved `command`.
    fn parse(
        &self,
        command: &str,
        platform: Platform,
        raw_output: &str,
    ) -> Result<Map<String, Value>, SchemaError>;
}

/// Column separator for tabular scraps: a tab or two-plus spaces.
static COLUMN_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t+| {2,}").expect("column regex"));

/// Best-effort recovery when the structured schema only partially matches.
///
/// Scans for `key: value` pairs (keys normalized to lower snake case) and for
/// tabular rows with two or more fields, collected under `tabular_data`.
/// Returns `None` when nothing at all was recovered.
pub(super) fn extract_partial(raw_output: &str) -> Option<Map<String, Value>> {
    let mut data = Map::new();
    let mut tabular = Vec::new();

    for line in raw_output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            let key = snake_key(key);
            let value = value.trim();
            if !key.is_empty() && !value.is_empty() {
                data.insert(key, Value::String(value.to_string()));
                continue;
            }
        }

        let fields: Vec<Value> = COLUMN_SPLIT
            .split(line)
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(|f| Value::String(f.to_string()))
            .collect();
        if fields.len() >= 2 {
            tabular.push(Value::Array(fields));
        }
    }

    if !tabular.is_empty() {
        data.insert("tabular_data".to_string(), Value::Array(tabular));
    }
    if data.is_empty() { None } else { Some(data) }
}

/// Normalizes a free-form key to lower snake case.
fn snake_key(raw: &str) -> String {
    let mut key = String::new();
    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c.to_ascii_lowercase());
        } else if !key.is_empty() && !key.ends_with('_') {
            key.push('_');
        }
    }
    key.trim_end_matches('_').to_string()
}
