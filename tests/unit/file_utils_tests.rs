/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;
use xlsxwai::file_utils::FileManager;
use crate::common;

/// Test that the output lands next to the input
#[test]
fn test_translated_output_path_withNestedInput_shouldStayInSameDirectory() {
    let output = FileManager::translated_output_path(Path::new("/data/q3/report.xlsx"), "Japanese");
    assert_eq!(output, Path::new("/data/q3/report_translated_Japanese.xlsx"));
}

/// Test that path separators in the language never escape the directory
#[test]
fn test_translated_output_path_withSeparatorInLanguage_shouldSanitize() {
    let output = FileManager::translated_output_path(Path::new("/data/report.xlsx"), "zh/TW");
    assert_eq!(output, Path::new("/data/report_translated_zh_TW.xlsx"));
}

/// Test that output files are recognised as such
#[test]
fn test_is_translated_output_withDerivedPath_shouldReturnTrue() {
    let output = FileManager::translated_output_path(Path::new("book.xlsx"), "French");
    assert!(FileManager::is_translated_output(&output));
    assert!(!FileManager::is_translated_output(Path::new("book.xlsx")));
}

/// Test that workbook discovery recurses and sorts
#[test]
fn test_find_workbooks_withNestedFolders_shouldReturnSortedInputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    std::fs::create_dir_all(root.join("sub"))?;
    for name in ["b.xlsx", "a.XLSX", "sub/c.xlsx", "notes.txt", "a_translated_French.xlsx"] {
        std::fs::write(root.join(name), b"x")?;
    }

    let found = FileManager::find_workbooks(root)?;
    let names: Vec<String> = found
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(names, vec!["a.XLSX", "b.xlsx", "sub/c.xlsx"]);
    Ok(())
}
