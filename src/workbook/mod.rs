/*!
 * Workbook access for translation.
 *
 * - `model`: cell references and extracted text cells
 * - `document`: loading, write-back and atomic saving of xlsx files
 * - `extractor`: deterministic selection of translatable cells
 */

pub use self::document::Workbook;
pub use self::extractor::extract_text_cells;
pub use self::model::{CellRef, TextCell};

pub mod document;
pub mod extractor;
pub mod model;
