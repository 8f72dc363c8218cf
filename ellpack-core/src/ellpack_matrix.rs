use crate::error::{EllpackError, Result};
use crate::traits::Matrix;
use num_traits::Float;
use std::fmt::Debug;

/// A used slot: the column it holds and the stored value.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry<T> {
    col: usize,
    value: T,
}

/// Result of searching a row for a column.
enum Probe {
    /// The column lives in this slot.
    Found(usize),
    /// The column is absent; this is the row's first unused slot.
    Vacant(usize),
    /// The column is absent and every slot is used.
    Full,
}

/// Represents a sparse matrix in ELLPACK format on the CPU.
///
/// Every row owns exactly `max_nnz` slots, fixed at construction. A slot is
/// either unused (`None`) or holds a `(column, value)` entry. Used slots are
/// kept packed at the front of their row, so a search can stop at the first
/// unused slot.
#[derive(Debug, Clone, PartialEq)]
pub struct EllpackMatrix<T = f64> {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Slots available to each row.
    max_nnz: usize,
    /// Row `r` owns `slots[r * max_nnz..(r + 1) * max_nnz]`.
    slots: Vec<Option<Entry<T>>>,
}

impl<T: Float + Debug> EllpackMatrix<T> {
    /// Creates an empty matrix with room for `max_nnz` entries in every row.
    pub fn new(rows: usize, cols: usize, max_nnz: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || max_nnz == 0 {
            return Err(EllpackError::InvalidDimensions(format!(
                "rows ({}), cols ({}) and max_nnz ({}) must all be positive",
                rows, cols, max_nnz
            )));
        }
        let len = rows.checked_mul(max_nnz).ok_or_else(|| {
            EllpackError::InvalidDimensions(format!(
                "{} rows with {} slots each overflows the slot array",
                rows, max_nnz
            ))
        })?;
        Ok(Self {
            rows,
            cols,
            max_nnz,
            slots: vec![None; len],
        })
    }

    /// Assembles a matrix from triplets. Repeated coordinates are summed,
    /// the way element contributions are accumulated in finite-element assembly.
    pub fn from_triplets<I>(rows: usize, cols: usize, max_nnz: usize, triplets: I) -> Result<Self>
    where
        I: IntoIterator<Item = Triplet<T>>,
    {
        let mut matrix = Self::new(rows, cols, max_nnz)?;
        for Triplet { row, col, value } in triplets {
            matrix.add(row, col, value)?;
        }
        Ok(matrix)
    }

    /// Creates a matrix from a dense, row-major 2D representation.
    /// Only non-zero values are stored and `max_nnz` is sized to the densest row.
    pub fn from_dense(dense: &[Vec<T>]) -> Result<Self> {
        let cols = dense.first().map_or(0, |row| row.len());
        if let Some((r, row)) = dense.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(EllpackError::InvalidDimensions(format!(
                "Dense input must be rectangular: row {} has {} columns, expected {}",
                r,
                row.len(),
                cols
            )));
        }
        let max_nnz = dense
            .iter()
            .map(|row| row.iter().filter(|v| !v.is_zero()).count())
            .max()
            .unwrap_or(0)
            .max(1);

        let mut matrix = Self::new(dense.len(), cols, max_nnz)?;
        for (r, row) in dense.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if !value.is_zero() {
                    matrix.insert(r, c, value)?;
                }
            }
        }
        Ok(matrix)
    }

    /// Builds a new matrix with the same entries and a different per-row capacity.
    ///
    /// # Errors
    /// `CapacityExceeded` for the first row holding more than `max_nnz` entries.
    pub fn rebuild(&self, max_nnz: usize) -> Result<Self> {
        log::debug!(
            "Rebuilding {}x{} matrix: max_nnz {} -> {}",
            self.rows,
            self.cols,
            self.max_nnz,
            max_nnz
        );
        let mut rebuilt = Self::new(self.rows, self.cols, max_nnz)?;
        for Triplet { row, col, value } in self.iter() {
            rebuilt.insert(row, col, value)?;
        }
        Ok(rebuilt)
    }

    /// Returns the dimensions of the matrix (rows, cols).
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Maximum number of entries a single row can hold.
    pub fn max_nnz(&self) -> usize {
        self.max_nnz
    }

    /// Returns the number of stored entries.
    pub fn nnz(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns the number of stored entries in `row`.
    pub fn row_nnz(&self, row: usize) -> Result<usize> {
        self.check_row(row)?;
        Ok(self.used(row).count())
    }

    /// Sets the entry at (`row`, `col`), overwriting any stored value.
    ///
    /// # Errors
    /// `CapacityExceeded` if the column is new and the row is full; the matrix is left unchanged.
    pub fn insert(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check_index(row, col)?;
        match self.probe(row, col) {
            Probe::Found(slot) | Probe::Vacant(slot) => {
                self.row_slots_mut(row)[slot] = Some(Entry { col, value });
                Ok(())
            }
            Probe::Full => Err(self.capacity_exceeded(row, col)),
        }
    }

    /// Adds `value` to the entry at (`row`, `col`), creating it if absent.
    ///
    /// # Errors
    /// `CapacityExceeded` if the column is new and the row is full; the matrix is left unchanged.
    pub fn add(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check_index(row, col)?;
        match self.probe(row, col) {
            Probe::Found(slot) => {
                if let Some(entry) = self.row_slots_mut(row)[slot].as_mut() {
                    entry.value = entry.value + value;
                }
                Ok(())
            }
            Probe::Vacant(slot) => {
                self.row_slots_mut(row)[slot] = Some(Entry { col, value });
                Ok(())
            }
            Probe::Full => Err(self.capacity_exceeded(row, col)),
        }
    }

    /// Gets the value stored at (`row`, `col`), or `None` if there is no entry.
    pub fn get(&self, row: usize, col: usize) -> Result<Option<T>> {
        self.check_index(row, col)?;
        Ok(self
            .used(row)
            .find(|entry| entry.col == col)
            .map(|entry| entry.value))
    }

    /// Clears every slot of `row`.
    pub fn delete_row(&mut self, row: usize) -> Result<()> {
        self.check_row(row)?;
        self.row_slots_mut(row).fill(None);
        log::trace!("Deleted row {}", row);
        Ok(())
    }

    /// Iterates over the `(col, value)` entries stored in `row`.
    pub fn row_entries(&self, row: usize) -> Result<impl Iterator<Item = (usize, T)> + '_> {
        self.check_row(row)?;
        Ok(self.used(row).map(|entry| (entry.col, entry.value)))
    }

    /// Returns the diagonal `A[i][i]` for `i < min(rows, cols)`.
    ///
    /// # Errors
    /// `MissingDiagonal` for the first row whose diagonal entry is absent or zero.
    pub fn diagonal(&self) -> Result<Vec<T>> {
        (0..self.rows.min(self.cols))
            .map(|i| match self.get(i, i)? {
                Some(d) if !d.is_zero() => Ok(d),
                _ => Err(EllpackError::MissingDiagonal { row: i }),
            })
            .collect()
    }

    /// Computes `y = self * x`. Only the first `rows` elements of `y` are written.
    ///
    /// # Errors
    /// `InvalidDimensions` if `x` is shorter than `cols` or `y` is shorter than `rows`.
    pub fn mvp(&self, x: &[T], y: &mut [T]) -> Result<()> {
        if x.len() < self.cols || y.len() < self.rows {
            return Err(EllpackError::InvalidDimensions(format!(
                "mvp on a {}x{} matrix needs x >= {} and y >= {} elements (got x={}, y={})",
                self.rows,
                self.cols,
                self.cols,
                self.rows,
                x.len(),
                y.len()
            )));
        }
        for (row, yi) in y[..self.rows].iter_mut().enumerate() {
            *yi = self
                .used(row)
                .fold(T::zero(), |acc, entry| acc + entry.value * x[entry.col]);
        }
        Ok(())
    }

    /// Allocating form of [`mvp`](Self::mvp).
    pub fn mul_vec(&self, x: &[T]) -> Result<Vec<T>> {
        let mut y = vec![T::zero(); self.rows];
        self.mvp(x, &mut y)?;
        Ok(y)
    }

    pub fn iter(&self) -> EllpackIter<'_, T> {
        EllpackIter {
            matrix: self,
            row: 0,
            slot: 0,
        }
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.rows {
            return Err(EllpackError::IndexOutOfRange {
                row,
                col: None,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(EllpackError::IndexOutOfRange {
                row,
                col: Some(col),
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    fn row_slots(&self, row: usize) -> &[Option<Entry<T>>] {
        let start = row * self.max_nnz;
        &self.slots[start..start + self.max_nnz]
    }

    fn row_slots_mut(&mut self, row: usize) -> &mut [Option<Entry<T>>] {
        let start = row * self.max_nnz;
        &mut self.slots[start..start + self.max_nnz]
    }

    fn used(&self, row: usize) -> impl Iterator<Item = &Entry<T>> {
        self.row_slots(row).iter().map_while(Option::as_ref)
    }

    fn probe(&self, row: usize, col: usize) -> Probe {
        for (slot, entry) in self.row_slots(row).iter().enumerate() {
            match entry {
                Some(entry) if entry.col == col => return Probe::Found(slot),
                Some(_) => {}
                None => return Probe::Vacant(slot),
            }
        }
        Probe::Full
    }

    fn capacity_exceeded(&self, row: usize, col: usize) -> EllpackError {
        log::debug!(
            "Rejected entry ({}, {}): row already holds {} entries",
            row,
            col,
            self.max_nnz
        );
        EllpackError::CapacityExceeded {
            row,
            max_nnz: self.max_nnz,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triplet<T = f64> {
    row: usize,
    col: usize,
    value: T,
}

impl<T: Copy> Triplet<T> {
    pub fn new(row: usize, col: usize, value: T) -> Self {
        Triplet { row, col, value }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn value(&self) -> T {
        self.value
    }
}

/// Iterates the stored entries row by row, in slot order within a row.
pub struct EllpackIter<'a, T> {
    matrix: &'a EllpackMatrix<T>,
    row: usize,
    slot: usize,
}

impl<T: Copy> Iterator for EllpackIter<'_, T> {
    type Item = Triplet<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let matrix = self.matrix;
        while self.row < matrix.rows {
            if self.slot < matrix.max_nnz {
                if let Some(entry) = matrix.slots[self.row * matrix.max_nnz + self.slot] {
                    self.slot += 1;
                    return Some(Triplet {
                        row: self.row,
                        col: entry.col,
                        value: entry.value,
                    });
                }
            }
            self.row += 1;
            self.slot = 0;
        }
        None
    }
}

impl<T: Float + Debug> Matrix for EllpackMatrix<T> {
    type Value = T;

    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    // rows(), cols(), is_square() are provided by default impls in the trait
}
