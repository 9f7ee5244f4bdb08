/*!
 * Selection of translatable cells.
 */

use umya_spreadsheet::structs::{Cell, CellRawValue};

use super::document::Workbook;
use super::model::{CellRef, TextCell};

/// Collect every cell holding non-blank literal text.
///
/// Sheets are visited in document order, rows top to bottom and columns left
/// to right. Numbers, booleans, dates, errors, empty cells and formula cells
/// are skipped. The result is deterministic for an unmodified workbook.
pub fn extract_text_cells(workbook: &Workbook) -> Vec<TextCell> {
    let mut text_cells = Vec::new();

    for (sheet_index, sheet) in workbook.spreadsheet().get_sheet_collection().iter().enumerate() {
        let mut cells: Vec<&Cell> = sheet
            .get_cell_collection()
            .into_iter()
            .filter(|cell| is_translatable(cell))
            .collect();

        // cell storage is not ordered by position
        cells.sort_by_key(|cell| {
            let coordinate = cell.get_coordinate();
            (*coordinate.get_row_num(), *coordinate.get_col_num())
        });

        for cell in cells {
            let coordinate = cell.get_coordinate();
            let cell_ref = CellRef::new(
                sheet_index,
                sheet.get_name(),
                *coordinate.get_row_num(),
                *coordinate.get_col_num(),
            );
            text_cells.push(TextCell::new(cell_ref, cell.get_value().into_owned()));
        }
    }

    text_cells
}

/// Literal string (plain or rich text), not a formula, not blank
fn is_translatable(cell: &Cell) -> bool {
    if cell.is_formula() {
        return false;
    }

    match cell.get_raw_value() {
        CellRawValue::String(_) | CellRawValue::RichText(_) => !cell.get_value().trim().is_empty(),
        _ => false,
    }
}
