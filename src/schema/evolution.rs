//! Reconcile the header of an incoming batch with the header already on disk.
//!
//! Columns only ever grow: the file's columns keep their positions and any
//! column the batch introduces is placed after them, in the batch's order.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDiff {
    /// Header currently on disk.
    pub existing: Vec<String>,
    /// Batch columns the file has never seen, in batch order.
    pub new_columns: Vec<String>,
    /// File columns the batch does not carry; filled with empty cells.
    pub missing_columns: Vec<String>,
}

impl SchemaDiff {
    pub fn between(existing: &[String], batch: &[String]) -> Self {
        let on_disk: HashSet<&str> = existing.iter().map(String::as_str).collect();
        let incoming: HashSet<&str> = batch.iter().map(String::as_str).collect();

        let mut seen = HashSet::new();
        let new_columns = batch
            .iter()
            .filter(|c| !on_disk.contains(c.as_str()) && seen.insert(c.as_str()))
            .cloned()
            .collect();
        let missing_columns = existing
            .iter()
            .filter(|c| !incoming.contains(c.as_str()))
            .cloned()
            .collect();

        Self {
            existing: existing.to_vec(),
            new_columns,
            missing_columns,
        }
    }

    pub fn needs_widening(&self) -> bool {
        !self.new_columns.is_empty()
    }

    /// Existing header followed by the new columns.
    pub fn unified(&self) -> Vec<String> {
        self.existing
            .iter()
            .chain(self.new_columns.iter())
            .cloned()
            .collect()
    }

    /// Rearrange `rows` (laid out as `batch_header`) into the unified header,
    /// leaving cells of missing columns empty.
    pub fn reorder(&self, batch_header: &[String], rows: &[Vec<String>]) -> Vec<Vec<String>> {
        let position: HashMap<&str, usize> = batch_header
            .iter()
            .enumerate()
            .rev()
            .map(|(i, c)| (c.as_str(), i))
            .collect();
        let layout: Vec<Option<usize>> = self
            .unified()
            .iter()
            .map(|c| position.get(c.as_str()).copied())
            .collect();

        rows.iter()
            .map(|row| {
                layout
                    .iter()
                    .map(|slot| {
                        slot.and_then(|i| row.get(i))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }
}
