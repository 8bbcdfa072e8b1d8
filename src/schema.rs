// Column-presence checks that gate each analysis feature
use crate::model::Table;
use tracing::warn;

/// Required columns that `table` does not have, in declaration order.
pub fn missing_columns(table: &Table, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !table.has_column(name))
        .map(|name| name.to_string())
        .collect()
}

/// Returns true when every required column is present. A gap is logged, never raised.
pub fn validate(table: &Table, required: &[&str]) -> bool {
    let missing = missing_columns(table, required);
    if missing.is_empty() {
        return true;
    }
    warn!(
        "Columns required: {} (missing: {})",
        required.join(", "),
        missing.join(", ")
    );
    false
}
