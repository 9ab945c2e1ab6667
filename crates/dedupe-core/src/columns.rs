//! Resolution of configured column names against a schema.

use dedupe_model::Schema;

/// Column indices selected for comparison, plus the names that could not be
/// found in the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    pub indices: Vec<usize>,
    pub missing: Vec<String>,
    /// False when the selection fell back to every column.
    pub from_keys: bool,
}

impl ColumnSelection {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }
}

/// Look up `names` in order, skipping repeats and recording unknown names.
pub fn select_columns(schema: &Schema, names: &[String]) -> ColumnSelection {
    let mut selection = ColumnSelection {
        from_keys: true,
        ..ColumnSelection::default()
    };
    for name in names {
        match schema.index_of(name) {
            Some(idx) if !selection.indices.contains(&idx) => selection.indices.push(idx),
            Some(_) => {}
            None => {
                if !selection.missing.contains(name) {
                    selection.missing.push(name.clone());
                }
            }
        }
    }
    selection
}

/// Key columns when any are configured, otherwise every column.
pub fn comparison_columns(schema: &Schema, key_columns: &[String]) -> ColumnSelection {
    if key_columns.is_empty() {
        ColumnSelection {
            indices: schema.all_indices(),
            missing: Vec::new(),
            from_keys: false,
        }
    } else {
        select_columns(schema, key_columns)
    }
}
