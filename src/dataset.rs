//! Dataset table: ordered rows over a unified, first-seen column set.
//!
//! Records are appended as extraction proceeds; later stages rewrite whole
//! columns in place and the finished table is materialized as a polars
//! `DataFrame` for serialization.

use crate::error::Result;
use crate::models::{Cell, Record};
use chrono::NaiveDateTime;
use polars::prelude::{Column, DataFrame};
use std::collections::HashMap;
use tracing::debug;

static NULL: Cell = Cell::Null;

/// Ordered collection of records sharing one column set
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    /// Rows may be shorter than `columns`; missing trailing cells are null
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Append one record, registering any columns not seen before
    pub fn append(&mut self, record: Record) {
        let mut row = Vec::with_capacity(self.columns.len());
        for (name, cell) in record.into_fields() {
            let idx = self.column_index_or_insert(&name);
            if row.len() <= idx {
                row.resize(idx + 1, Cell::Null);
            }
            row[idx] = cell;
        }
        self.rows.push(row);
    }

    /// Cell at (row, column name); null for unknown columns
    pub fn cell(&self, row: usize, name: &str) -> &Cell {
        match self.index.get(name) {
            Some(&idx) => self.rows[row].get(idx).unwrap_or(&NULL),
            None => &NULL,
        }
    }

    /// All cells of one column in row order
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell>> {
        let idx = *self.index.get(name)?;
        Some(self.rows.iter().map(move |row| row.get(idx).unwrap_or(&NULL)))
    }

    /// Rewrite every cell of a column. Returns false if the column is absent.
    pub fn transform_column<F>(&mut self, name: &str, mut f: F) -> bool
    where
        F: FnMut(&Cell) -> Cell,
    {
        let Some(&idx) = self.index.get(name) else {
            return false;
        };
        for row in &mut self.rows {
            if row.len() <= idx {
                row.resize(idx + 1, Cell::Null);
            }
            row[idx] = f(&row[idx]);
        }
        true
    }

    /// Rewrite every cell of every column
    pub fn transform_all<F>(&mut self, mut f: F)
    where
        F: FnMut(&Cell) -> Cell,
    {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                *cell = f(cell);
            }
        }
    }

    /// Set a column from one cell per row, creating it at the end if needed
    pub fn set_column(&mut self, name: &str, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.rows.len());
        let idx = self.column_index_or_insert(name);
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            if row.len() <= idx {
                row.resize(idx + 1, Cell::Null);
            }
            row[idx] = cell;
        }
    }

    /// Rename columns through `f`; names that collide keep the first column
    pub fn rename_columns<F>(&mut self, f: F)
    where
        F: Fn(&str) -> String,
    {
        self.columns = self.columns.iter().map(|c| f(c)).collect();
        self.index.clear();
        for (idx, name) in self.columns.iter().enumerate() {
            self.index.entry(name.clone()).or_insert(idx);
        }
    }

    /// Keep only the rows at `order`, in that order
    pub fn select_rows(&mut self, order: &[usize]) {
        let mut taken: Vec<Option<Vec<Cell>>> =
            std::mem::take(&mut self.rows).into_iter().map(Some).collect();
        self.rows = order
            .iter()
            .filter_map(|&i| taken.get_mut(i).and_then(Option::take))
            .collect();
    }

    /// Materialize as a polars DataFrame, inferring one dtype per column
    pub fn to_frame(&self) -> Result<DataFrame> {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| self.build_column(idx, name))
            .collect::<Vec<_>>();

        debug!(
            "Materializing dataset: {} rows x {} columns",
            self.rows.len(),
            columns.len()
        );
        Ok(DataFrame::new(columns)?)
    }

    fn column_index_or_insert(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.columns.len();
        self.columns.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    fn build_column(&self, idx: usize, name: &str) -> Column {
        let cells: Vec<&Cell> = self
            .rows
            .iter()
            .map(|row| row.get(idx).unwrap_or(&NULL))
            .collect();

        match ColumnKind::infer(&cells) {
            ColumnKind::Integer => {
                let values: Vec<Option<i64>> = cells
                    .iter()
                    .map(|c| match c {
                        Cell::Integer(i) => Some(*i),
                        _ => None,
                    })
                    .collect();
                Column::new(name.into(), values)
            }
            ColumnKind::Float => {
                let values: Vec<Option<f64>> = cells
                    .iter()
                    .map(|c| match c {
                        Cell::Integer(i) => Some(*i as f64),
                        Cell::Number(n) => Some(*n),
                        _ => None,
                    })
                    .collect();
                Column::new(name.into(), values)
            }
            ColumnKind::Timestamp => {
                let values: Vec<Option<NaiveDateTime>> = cells
                    .iter()
                    .map(|c| match c {
                        Cell::Timestamp(ts) => Some(*ts),
                        _ => None,
                    })
                    .collect();
                Column::new(name.into(), values)
            }
            ColumnKind::Text => {
                let values: Vec<Option<String>> = cells
                    .iter()
                    .map(|c| match c {
                        Cell::Null => None,
                        other => Some(other.to_string()),
                    })
                    .collect();
                Column::new(name.into(), values)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Timestamp,
    Text,
}

impl ColumnKind {
    /// Narrowest dtype holding every non-null cell; all-null columns are text
    fn infer(cells: &[&Cell]) -> Self {
        let mut kind: Option<ColumnKind> = None;
        for cell in cells {
            let cell_kind = match cell {
                Cell::Null => continue,
                Cell::Integer(_) => ColumnKind::Integer,
                Cell::Number(_) => ColumnKind::Float,
                Cell::Timestamp(_) => ColumnKind::Timestamp,
                Cell::Text(_) => return ColumnKind::Text,
            };
            kind = Some(match (kind, cell_kind) {
                (None, k) => k,
                (Some(a), b) if a == b => a,
                (Some(ColumnKind::Integer), ColumnKind::Float)
                | (Some(ColumnKind::Float), ColumnKind::Integer) => ColumnKind::Float,
                _ => return ColumnKind::Text,
            });
        }
        kind.unwrap_or(ColumnKind::Text)
    }
}
