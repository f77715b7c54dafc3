// dense matrices built from observations over an ordered entity axis
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::types::Observation;

/// Row-major grid of raw observation values. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Option<String>>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col].as_deref()
    }

    /// # Panics
    ///
    /// Panics if `row >= self.rows` or `col >= self.cols`.
    pub fn set(&mut self, row: usize, col: usize, value: &str) {
        assert!(row < self.rows && col < self.cols, "cell ({}, {}) outside {}x{}", row, col, self.rows, self.cols);
        self.cells[row * self.cols + col] = Some(value.to_string());
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// # Panics
    ///
    /// Panics if `row >= self.rows`.
    pub fn row(&self, row: usize) -> &[Option<String>] {
        assert!(row < self.rows, "row {} outside {} rows", row, self.rows);
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Missing and non-numeric cells become NaN.
    pub fn to_numeric(&self) -> NumericMatrix {
        let values = self
            .cells
            .iter()
            .map(|c| {
                c.as_deref()
                    .and_then(|v| v.trim().parse::<f64>().ok())
                    .unwrap_or(f64::NAN)
            })
            .collect();
        NumericMatrix {
            rows: self.rows,
            cols: self.cols,
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericMatrix {
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<f64>,
}

impl NumericMatrix {
    /// # Panics
    ///
    /// Panics if `row >= self.rows` or `col >= self.cols`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "cell ({}, {}) outside {}x{}", row, col, self.rows, self.cols);
        self.values[row * self.cols + col]
    }

    /// Min-max scale the finite values into [0, 1]. NaN stays NaN and a
    /// constant matrix maps to zeros.
    pub fn normalized(&self) -> NumericMatrix {
        let finite = self.values.iter().copied().filter(|v| v.is_finite());
        let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let span = hi - lo;

        let values = self
            .values
            .iter()
            .map(|&v| {
                if !v.is_finite() {
                    v
                } else if span > 0.0 {
                    (v - lo) / span
                } else {
                    0.0
                }
            })
            .collect();
        NumericMatrix {
            rows: self.rows,
            cols: self.cols,
            values,
        }
    }
}

fn index_of(axis: &[String]) -> HashMap<&str, usize> {
    let mut idx = HashMap::with_capacity(axis.len());
    for (i, e) in axis.iter().enumerate() {
        idx.entry(e.as_str()).or_insert(i);
    }
    idx
}

/// `entities × relations` matrix of unary observations. Later observations
/// for the same cell overwrite earlier ones.
pub fn build_unary(observations: &[&Observation], entities: &[String], relations: &[String]) -> Matrix {
    let rows = index_of(entities);
    let cols = index_of(relations);
    let mut m = Matrix::new(entities.len(), relations.len());

    let mut off_axis = 0usize;
    for ob in observations.iter().filter(|ob| ob.arity() == 1) {
        let Some(&j) = cols.get(ob.relation.as_str()) else {
            continue;
        };
        match rows.get(ob.items[0].as_str()) {
            Some(&i) => m.set(i, j, &ob.value),
            None => off_axis += 1,
        }
    }
    if off_axis > 0 {
        warn!(skipped = off_axis, "unary observations whose entity is not on the row axis");
    }
    debug!(rows = m.rows, cols = m.cols, missing = m.missing_count(), "built unary matrix");
    m
}

/// `row_entities × col_entities` matrix of binary observations, item 0 on the
/// rows and item 1 on the columns.
pub fn build_binary(observations: &[&Observation], row_entities: &[String], col_entities: &[String]) -> Matrix {
    let rows = index_of(row_entities);
    let cols = index_of(col_entities);
    let mut m = Matrix::new(row_entities.len(), col_entities.len());

    let mut off_axis = 0usize;
    for ob in observations.iter().filter(|ob| ob.arity() == 2) {
        match (rows.get(ob.items[0].as_str()), cols.get(ob.items[1].as_str())) {
            (Some(&i), Some(&j)) => m.set(i, j, &ob.value),
            _ => off_axis += 1,
        }
    }
    if off_axis > 0 {
        warn!(skipped = off_axis, "binary observations with an item off the matrix axes");
    }
    debug!(rows = m.rows, cols = m.cols, missing = m.missing_count(), "built binary matrix");
    m
}

/// Observations split by arity. Arity other than 1 or 2 is left out.
#[derive(Debug, Default)]
pub struct Collated<'a> {
    pub unary: Vec<&'a Observation>,
    binary: Vec<(String, Vec<&'a Observation>)>,
    binary_index: HashMap<String, usize>,
}

impl<'a> Collated<'a> {
    /// Binary observations grouped per relation, relations in first-seen order.
    pub fn binary(&self) -> impl Iterator<Item = (&str, &[&'a Observation])> + '_ {
        self.binary.iter().map(|(r, obs)| (r.as_str(), obs.as_slice()))
    }

    pub fn binary_for(&self, relation: &str) -> Option<&[&'a Observation]> {
        self.binary_index
            .get(relation)
            .map(|&pos| self.binary[pos].1.as_slice())
    }

    pub fn binary_relation_count(&self) -> usize {
        self.binary.len()
    }
}

pub fn collate<'a, I>(observations: I) -> Collated<'a>
where
    I: IntoIterator<Item = &'a Observation>,
{
    let mut out = Collated::default();
    for ob in observations {
        match ob.arity() {
            1 => out.unary.push(ob),
            2 => {
                let pos = match out.binary_index.get(&ob.relation) {
                    Some(&pos) => pos,
                    None => {
                        out.binary_index.insert(ob.relation.clone(), out.binary.len());
                        out.binary.push((ob.relation.clone(), Vec::new()));
                        out.binary.len() - 1
                    }
                };
                out.binary[pos].1.push(ob);
            }
            _ => {}
        }
    }
    out
}
