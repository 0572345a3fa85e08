// src/process/aggregate.rs

use std::collections::HashMap;

use crate::jobs::Job;
use crate::process::{raw_table::RawTable, utils::format_float};
use crate::schema::Reduction;
use crate::store::Batch;

/// A single summary cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    /// Building ids span the whole `u64` range.
    UInt(u64),
    /// `None` when a month had no value at all for an averaged column.
    Float(Option<f64>),
}

impl Value {
    pub fn to_cell(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float(Some(v)) => format_float(*v),
            Value::Float(None) => String::new(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => *v,
            Value::Int(i) => Some(*i as f64),
            Value::UInt(u) => Some(*u as f64),
            Value::Text(_) => None,
        }
    }
}

/// One row per month of one job.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl SummaryTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of `column` for `month`, if both exist.
    pub fn get(&self, month: &str, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows
            .iter()
            .find(|r| matches!(&r[0], Value::Text(m) if m == month))
            .map(|r| &r[col])
    }

    pub fn to_batch(&self) -> Batch {
        Batch {
            header: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .map(|r| r.iter().map(Value::to_cell).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

/// Collapse `table` into one row per month, months in first-seen order.
pub fn summarize(job: &Job, table: &RawTable) -> SummaryTable {
    let reduced: Vec<Reduction> = table.schema.reduced().map(|c| c.reduction).collect();

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Accumulator>> = HashMap::new();
    for row in &table.rows {
        let acc = groups.entry(row.month.clone()).or_insert_with(|| {
            order.push(row.month.clone());
            vec![Accumulator::default(); reduced.len()]
        });
        for (slot, value) in acc.iter_mut().zip(&row.values) {
            if let Some(v) = value {
                slot.sum += v;
                slot.count += 1;
            }
        }
    }

    let rows = order
        .into_iter()
        .map(|month| {
            let acc = &groups[&month];
            let mut row = vec![
                Value::Text(month.clone()),
                Value::UInt(job.building_id),
                Value::Int(i64::from(job.year)),
                Value::Text(job.weather_scenario.clone()),
            ];
            row.extend(reduced.iter().zip(acc).map(|(reduction, a)| match reduction {
                Reduction::Mean if a.count == 0 => Value::Float(None),
                Reduction::Mean => Value::Float(Some(a.sum / a.count as f64)),
                _ => Value::Float(Some(a.sum)),
            }));
            row
        })
        .collect();

    SummaryTable {
        columns: table.schema.output_header(),
        rows,
    }
}
