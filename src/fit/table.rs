//! Tabulated fit results.

use std::fmt;

use ndarray::{Array2, ArrayView1};
use serde::{Serialize, Serializer};

use crate::error::{FitError, Result};
use crate::models::FitMode;

/// Fitted parameter values, one row per dataset and one column per role.
///
/// The table is allocated with a slot for every dataset up front and rows are
/// written by index, so results land in input order however the fits were
/// scheduled. Rows not yet written hold NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct FitTable {
    columns: Vec<String>,
    values: Array2<f64>,
    mode: FitMode,
}

#[derive(Serialize)]
struct TableRepr<'a> {
    mode: FitMode,
    columns: &'a [String],
    rows: Vec<Vec<f64>>,
}

impl FitTable {
    /// Create a table of `n_rows` empty rows
    pub fn new(columns: &[&str], n_rows: usize, mode: FitMode) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            values: Array2::from_elem((n_rows, columns.len()), f64::NAN),
            mode,
        }
    }

    /// Write the values of row `i`, in column order
    pub fn set_row(&mut self, i: usize, values: &[f64]) -> Result<()> {
        if i >= self.len() {
            return Err(FitError::DimensionMismatch(format!(
                "row {} out of range for a table of {} rows",
                i,
                self.len()
            )));
        }
        if values.len() != self.columns.len() {
            return Err(FitError::DimensionMismatch(format!(
                "expected {} values per row, got {}",
                self.columns.len(),
                values.len()
            )));
        }

        self.values
            .row_mut(i)
            .iter_mut()
            .zip(values)
            .for_each(|(slot, &v)| *slot = v);
        Ok(())
    }

    /// Number of rows (datasets)
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the rows came from one joint fit or from independent fits
    pub fn mode(&self) -> FitMode {
        self.mode
    }

    /// All values as an `n_rows × n_columns` array
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn row(&self, i: usize) -> Option<ArrayView1<f64>> {
        (i < self.len()).then(|| self.values.row(i))
    }

    /// Values of one role across every dataset
    pub fn column(&self, name: &str) -> Option<ArrayView1<f64>> {
        self.column_index(name).map(|j| self.values.column(j))
    }

    pub fn get(&self, row: usize, name: &str) -> Option<f64> {
        let j = self.column_index(name)?;
        self.values.get((row, j)).copied()
    }

    /// Serialize the table to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

impl Serialize for FitTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        TableRepr {
            mode: self.mode,
            columns: &self.columns,
            rows: self.values.outer_iter().map(|row| row.to_vec()).collect(),
        }
        .serialize(serializer)
    }
}

impl fmt::Display for FitTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5}", "")?;
        for name in &self.columns {
            write!(f, " {:>14}", name)?;
        }
        writeln!(f)?;

        for (i, row) in self.values.outer_iter().enumerate() {
            write!(f, "{:>5}", i)?;
            for v in row.iter() {
                write!(f, " {:>14.6e}", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
