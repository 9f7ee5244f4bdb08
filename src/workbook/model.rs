/*!
 * Cell addressing types shared by extraction and write-back.
 */

use std::fmt;
use umya_spreadsheet::helper::coordinate::coordinate_from_index;

/// Position of one cell inside a loaded workbook.
///
/// Only meaningful for the workbook it was collected from; the sheet is
/// addressed by its index in document order, the name is kept for messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellRef {
    /// Zero-based sheet index in document order
    pub sheet_index: usize,

    /// Sheet name at collection time
    pub sheet_name: String,

    /// One-based row number
    pub row: u32,

    /// One-based column number
    pub column: u32,
}

impl CellRef {
    /// Create a new cell reference
    pub fn new(sheet_index: usize, sheet_name: impl Into<String>, row: u32, column: u32) -> Self {
        Self {
            sheet_index,
            sheet_name: sheet_name.into(),
            row,
            column,
        }
    }

    /// A1-style coordinate without the sheet, e.g. `C3`
    pub fn a1(&self) -> String {
        coordinate_from_index(&self.column, &self.row)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.sheet_name, self.a1())
    }
}

/// A cell selected for translation together with its original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCell {
    /// Where the translation is written back
    pub cell_ref: CellRef,

    /// The cell text as stored in the workbook (non-blank)
    pub text: String,
}

impl TextCell {
    /// Create a new text cell
    pub fn new(cell_ref: CellRef, text: impl Into<String>) -> Self {
        Self {
            cell_ref,
            text: text.into(),
        }
    }
}
