//! FILENAME: report-engine/src/cursor.rs
//! Data cursor abstraction - positional handle into one data set.
//!
//! The engine never retrieves data itself; it consumes cursors that the
//! host opened beforehand. A cursor is always positioned ON a row (or on
//! an empty result set). `advance` moves forward, `restore_to` rewinds
//! or fast-forwards to a previously recorded position - nested and
//! sibling executors share one cursor per data set, so restoration is
//! what keeps each subtree on the row it expects.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Row position within a data set (0-based).
pub type CursorPosition = u64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("position {requested} out of range (row count {row_count})")]
    OutOfRange {
        requested: CursorPosition,
        row_count: u64,
    },
}

/// A value read from one cursor field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CursorValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CursorValue {
    pub fn display(&self) -> String {
        match self {
            CursorValue::Empty => String::new(),
            CursorValue::Number(n) => format!("{}", n),
            CursorValue::Text(s) => s.clone(),
            CursorValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }
}

/// Positional handle into one result set.
pub trait DataCursor {
    /// Index of the row the cursor is currently on.
    fn position(&self) -> CursorPosition;

    /// Repositions the cursor to a previously observed position.
    fn restore_to(&mut self, position: CursorPosition) -> Result<(), CursorError>;

    /// Moves to the next row. Returns false when no row follows; the
    /// cursor then stays on its current row.
    fn advance(&mut self) -> bool;

    /// False when the result set is empty.
    fn has_rows(&self) -> bool;

    /// Value of one field of the current row. Out-of-range fields and
    /// empty result sets read as `Empty`.
    fn value(&self, field: usize) -> CursorValue;
}

// ============================================================================
// IN-MEMORY CURSOR
// ============================================================================

/// Cursor over an in-memory row vector. Used by tests and by embedders
/// whose data already lives in memory.
pub struct VecCursor {
    rows: Vec<Vec<CursorValue>>,
    position: usize,
}

impl VecCursor {
    pub fn new(rows: Vec<Vec<CursorValue>>) -> Self {
        VecCursor { rows, position: 0 }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl DataCursor for VecCursor {
    fn position(&self) -> CursorPosition {
        self.position as CursorPosition
    }

    fn restore_to(&mut self, position: CursorPosition) -> Result<(), CursorError> {
        // Position 0 is the resting position of an empty result set.
        if position != 0 && (position as usize) >= self.rows.len() {
            return Err(CursorError::OutOfRange {
                requested: position,
                row_count: self.rows.len() as u64,
            });
        }
        self.position = position as usize;
        Ok(())
    }

    fn advance(&mut self) -> bool {
        if self.position + 1 < self.rows.len() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    fn value(&self, field: usize) -> CursorValue {
        self.rows
            .get(self.position)
            .and_then(|row| row.get(field))
            .cloned()
            .unwrap_or(CursorValue::Empty)
    }
}

// ============================================================================
// TESTS
// ============================================================================
