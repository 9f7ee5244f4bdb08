/*!
 * Loaded workbook handling.
 *
 * A `Workbook` owns the parsed spreadsheet for the duration of one
 * translation run: it is opened from disk, text cells are overwritten in
 * memory, and the result is written to a different path. The input file is
 * never touched.
 */

use log::debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use umya_spreadsheet::Spreadsheet;

use crate::errors::WorkbookError;

use super::extractor;
use super::model::{CellRef, TextCell};

/// An xlsx workbook loaded into memory
pub struct Workbook {
    /// Where the workbook was read from
    source_path: PathBuf,

    /// Parsed spreadsheet
    book: Spreadsheet,
}

impl Workbook {
    /// Open and fully parse an xlsx file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, WorkbookError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(WorkbookError::NotFound(path.to_path_buf()));
        }

        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| WorkbookError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        debug!(
            "Loaded workbook {} with {} sheet(s)",
            path.display(),
            book.get_sheet_collection().len()
        );

        Ok(Self {
            source_path: path.to_path_buf(),
            book,
        })
    }

    /// Wrap an already built spreadsheet
    pub fn from_spreadsheet(book: Spreadsheet, source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            book,
        }
    }

    /// Underlying spreadsheet
    pub fn spreadsheet(&self) -> &Spreadsheet {
        &self.book
    }

    /// Translatable cells in traversal order
    pub fn extract_text_cells(&self) -> Vec<TextCell> {
        extractor::extract_text_cells(self)
    }

    /// Overwrite the string value of one cell, keeping its style
    pub fn write_text(&mut self, cell: &CellRef, text: &str) -> Result<(), WorkbookError> {
        let sheet = self
            .book
            .get_sheet_mut(&cell.sheet_index)
            .ok_or(WorkbookError::MissingSheet(cell.sheet_index))?;

        sheet
            .get_cell_mut((cell.column, cell.row))
            .set_value_string(text);

        Ok(())
    }

    /// Write the workbook to `path`.
    ///
    /// The data goes to a temporary file in the target directory first and is
    /// renamed into place, so a failed write leaves no truncated output.
    pub fn save_as<P: AsRef<Path>>(&self, path: P) -> Result<(), WorkbookError> {
        let path = path.as_ref();
        let save_error = |message: String| WorkbookError::Save {
            path: path.to_path_buf(),
            message,
        };

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = tempfile::Builder::new()
            .prefix(".xlsxwai-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| save_error(e.to_string()))?;

        umya_spreadsheet::writer::xlsx::write_writer(&self.book, temp.as_file_mut())
            .map_err(|e| save_error(e.to_string()))?;
        temp.as_file_mut()
            .flush()
            .map_err(|e| save_error(e.to_string()))?;

        temp.persist(path).map_err(|e| save_error(e.error.to_string()))?;

        debug!("Saved {} as {}", self.source_path.display(), path.display());
        Ok(())
    }
}
