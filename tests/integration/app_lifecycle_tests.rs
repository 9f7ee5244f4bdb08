/*!
 * Controller runs over single files and folders
 */

use anyhow::Result;
use indicatif::MultiProgress;
use xlsxwai::app_controller::{Controller, FileOutcome, FolderSummary, ISSUES_LOG_FILE};
use crate::common::{self, Value};

/// Test that folder mode translates every workbook once
#[tokio::test]
async fn test_run_folder_withNestedWorkbooks_shouldTranslateEach() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    std::fs::create_dir_all(root.join("nested"))?;
    common::write_workbook(root, "one.xlsx", &[("Sheet1", &[("A1", Value::Text("one"))])])?;
    common::write_workbook(&root.join("nested"), "two.xlsx", &[("Sheet1", &[("A1", Value::Text("two"))])])?;
    common::write_workbook(root, "empty.xlsx", &[("Sheet1", &[("A1", Value::Number(1.0))])])?;

    let provider = common::uppercasing_provider();
    let controller = Controller::new_for_test()?;
    let summary = controller
        .run_folder_with_translator(&common::mock_translator(provider.clone()), root, false)
        .await?;

    assert_eq!(
        summary,
        FolderSummary {
            processed: 3,
            skipped: 0,
            errors: 0
        }
    );
    assert_eq!(provider.request_count(), 2);
    assert_eq!(common::read_cell(&root.join("one_translated_English.xlsx"), 0, "A1")?, "ONE");
    assert_eq!(
        common::read_cell(&root.join("nested").join("two_translated_English.xlsx"), 0, "A1")?,
        "TWO"
    );
    assert!(!root.join("empty_translated_English.xlsx").exists());
    assert!(root.join(ISSUES_LOG_FILE).exists());
    Ok(())
}

/// Test that a second folder run skips what the first produced
#[tokio::test]
async fn test_run_folder_twice_shouldSkipExistingOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::write_workbook(root, "one.xlsx", &[("Sheet1", &[("A1", Value::Text("one"))])])?;

    let controller = Controller::new_for_test()?;
    let translator = common::mock_translator(common::uppercasing_provider());

    controller.run_folder_with_translator(&translator, root, false).await?;
    let second = controller.run_folder_with_translator(&translator, root, false).await?;

    assert_eq!(second.processed, 0);
    assert_eq!(second.skipped, 1);
    Ok(())
}

/// Test that a corrupt workbook counts as an error without stopping the folder
#[tokio::test]
async fn test_run_folder_withCorruptWorkbook_shouldContinue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    std::fs::write(root.join("a_broken.xlsx"), b"garbage")?;
    common::write_workbook(root, "b_good.xlsx", &[("Sheet1", &[("A1", Value::Text("ok"))])])?;

    let controller = Controller::new_for_test()?;
    let summary = controller
        .run_folder_with_translator(&common::mock_translator(common::uppercasing_provider()), root, false)
        .await?;

    assert_eq!(summary.errors, 1);
    assert_eq!(summary.processed, 1);
    assert!(root.join("b_good_translated_English.xlsx").exists());
    Ok(())
}

/// Test that failed cells end up in the issues log
#[tokio::test]
async fn test_run_withFailedCell_shouldWriteIssuesLog() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::write_workbook(
        temp_dir.path(),
        "issues.xlsx",
        &[("Data", &[("A1", Value::Text("fine")), ("C4", Value::Text("broken"))])],
    )?;
    let provider = common::uppercasing_provider().with_failure_when(|req| req.text == "broken");

    let controller = Controller::new_for_test()?;
    let outcome = controller
        .run_with_translator(&common::mock_translator(provider), &input, false, &MultiProgress::new())
        .await?;

    let report = match outcome {
        FileOutcome::Translated(report) => report,
        other => panic!("unexpected outcome: {:?}", other),
    };
    assert_eq!(report.failed_cells.len(), 1);

    let log = std::fs::read_to_string(temp_dir.path().join(ISSUES_LOG_FILE))?;
    assert!(log.contains("1 of 2 cells failed"));
    assert!(log.contains("Data!C4 kept original text"));
    Ok(())
}

/// Test that folder mode needs at least one workbook
#[tokio::test]
async fn test_run_folder_withoutWorkbooks_shouldReturnError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    std::fs::write(temp_dir.path().join("readme.txt"), b"nothing here")?;

    let controller = Controller::new_for_test()?;
    let result = controller
        .run_folder_with_translator(
            &common::mock_translator(common::uppercasing_provider()),
            temp_dir.path(),
            false,
        )
        .await;

    assert!(result.is_err());
    Ok(())
}
