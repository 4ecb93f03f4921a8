//! Table layout description.

use serde::{Deserialize, Serialize};

/// Names the index/label columns of a volume table.
///
/// Index columns only locate a row in the survey; they are dropped before the
/// remaining columns are flattened into samples. Names absent from a file are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    pub index_columns: Vec<String>,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            index_columns: vec!["inline".to_string(), "crossline".to_string()],
        }
    }
}

impl TableLayout {
    /// Layout with the given index columns.
    pub fn new<S: Into<String>>(index_columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            index_columns: index_columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Layout whose every column carries samples.
    pub fn without_index() -> Self {
        Self {
            index_columns: Vec::new(),
        }
    }

    /// Whether `name` is an index column.
    pub fn is_index(&self, name: &str) -> bool {
        self.index_columns.iter().any(|c| c == name)
    }
}
