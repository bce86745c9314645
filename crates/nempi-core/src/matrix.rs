//! Dense matrix with named rows and columns.

use std::collections::HashMap;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::errors::InferenceError;

/// A dense `f64` matrix whose rows and columns carry unique names.
///
/// Used for the data matrix (E-genes × samples), assignment matrices
/// (P-genes × samples) and ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledMatrix {
    rows: Vec<String>,
    cols: Vec<String>,
    values: DMatrix<f64>,
}

impl LabeledMatrix {
    /// Build a labeled matrix, checking that names match the shape and are unique.
    pub fn new(
        rows: Vec<String>,
        cols: Vec<String>,
        values: DMatrix<f64>,
    ) -> Result<Self, InferenceError> {
        if rows.len() != values.nrows() {
            return Err(InferenceError::mismatch(
                "matrix row names",
                values.nrows(),
                rows.len(),
            ));
        }
        if cols.len() != values.ncols() {
            return Err(InferenceError::mismatch(
                "matrix column names",
                values.ncols(),
                cols.len(),
            ));
        }
        check_unique("matrix row names", &rows)?;
        check_unique("matrix column names", &cols)?;
        Ok(Self { rows, cols, values })
    }

    /// Build from row-major values.
    pub fn from_rows(
        rows: Vec<String>,
        cols: Vec<String>,
        data: &[Vec<f64>],
    ) -> Result<Self, InferenceError> {
        if let Some(bad) = data.iter().find(|r| r.len() != cols.len()) {
            return Err(InferenceError::mismatch(
                "matrix row length",
                cols.len(),
                bad.len(),
            ));
        }
        let flat: Vec<f64> = data.iter().flatten().copied().collect();
        let values = DMatrix::from_row_slice(data.len(), cols.len(), &flat);
        Self::new(rows, cols, values)
    }

    /// All-zero matrix with the given names.
    pub fn zeros(rows: Vec<String>, cols: Vec<String>) -> Self {
        let values = DMatrix::zeros(rows.len(), cols.len());
        Self { rows, cols, values }
    }

    pub fn row_names(&self) -> &[String] {
        &self.rows
    }

    pub fn col_names(&self) -> &[String] {
        &self.cols
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn into_values(self) -> DMatrix<f64> {
        self.values
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Value at (row, col) by position.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    /// Value at (row, col) by name.
    pub fn get_named(&self, row: &str, col: &str) -> Option<f64> {
        let r = self.row_index(row)?;
        let c = self.col_index(col)?;
        Some(self.values[(r, c)])
    }

    pub fn row_index(&self, name: &str) -> Option<usize> {
        self.rows.iter().position(|r| r == name)
    }

    pub fn col_index(&self, name: &str) -> Option<usize> {
        self.cols.iter().position(|c| c == name)
    }

    /// Sum of one column.
    pub fn column_sum(&self, col: usize) -> f64 {
        self.values.column(col).sum()
    }

    /// Index of the largest entry in a column (lowest index on ties).
    pub fn column_argmax(&self, col: usize) -> Option<usize> {
        let column = self.values.column(col);
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in column.iter().enumerate() {
            match best {
                Some((_, b)) if v <= b => {}
                _ => best = Some((i, v)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Reorder rows and columns to follow the given names.
    ///
    /// Both name lists must be permutations of this matrix's names.
    pub fn aligned_to(&self, rows: &[String], cols: &[String]) -> Result<Self, InferenceError> {
        let row_map = permutation("row names", &self.rows, rows)?;
        let col_map = permutation("column names", &self.cols, cols)?;
        let values =
            DMatrix::from_fn(rows.len(), cols.len(), |i, j| self.values[(row_map[i], col_map[j])]);
        Ok(Self {
            rows: rows.to_vec(),
            cols: cols.to_vec(),
            values,
        })
    }
}

fn check_unique(context: &str, names: &[String]) -> Result<(), InferenceError> {
    let mut seen = HashMap::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        if let Some(prev) = seen.insert(name.as_str(), i) {
            return Err(InferenceError::mismatch(
                context,
                "unique names",
                format!("'{name}' at positions {prev} and {i}"),
            ));
        }
    }
    Ok(())
}

/// For each target name, the index of that name in `source`.
fn permutation(
    context: &str,
    source: &[String],
    target: &[String],
) -> Result<Vec<usize>, InferenceError> {
    if source.len() != target.len() {
        return Err(InferenceError::mismatch(context, source.len(), target.len()));
    }
    check_unique(context, target)?;
    let index: HashMap<&str, usize> = source
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();
    target
        .iter()
        .map(|name| {
            index.get(name.as_str()).copied().ok_or_else(|| {
                InferenceError::mismatch(context, format!("{source:?}"), format!("'{name}'"))
            })
        })
        .collect()
}
