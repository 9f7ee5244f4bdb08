/*!
 * Tests for the application controller
 */

use anyhow::Result;
use indicatif::MultiProgress;
use xlsxwai::app_config::Config;
use xlsxwai::app_controller::{Controller, FileOutcome};
use crate::common::{self, Value};

/// Test that an invalid configuration is rejected up front
#[test]
fn test_with_config_withZeroConcurrency_shouldFail() {
    let mut config = Config::default();
    config.provider.api_key = "sk-test".to_string();
    config.max_concurrent_requests = 0;

    assert!(Controller::with_config(config).is_err());
}

/// Test that an existing output is not overwritten without force
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::write_workbook(temp_dir.path(), "book.xlsx", &[("Sheet1", &[("A1", Value::Text("Hi"))])])?;
    let existing = temp_dir.path().join("book_translated_English.xlsx");
    std::fs::write(&existing, b"previous run")?;

    let provider = common::uppercasing_provider();
    let controller = Controller::new_for_test()?;
    let outcome = controller
        .run_with_translator(
            &common::mock_translator(provider.clone()),
            &input,
            false,
            &MultiProgress::new(),
        )
        .await?;

    assert!(matches!(outcome, FileOutcome::Skipped(ref path) if *path == existing));
    assert_eq!(provider.request_count(), 0);
    assert_eq!(std::fs::read(&existing)?, b"previous run");
    Ok(())
}

/// Test that force overwrite replaces an existing output
#[tokio::test]
async fn test_run_withForceOverwrite_shouldReplaceOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::write_workbook(temp_dir.path(), "book.xlsx", &[("Sheet1", &[("A1", Value::Text("Hi"))])])?;
    let existing = temp_dir.path().join("book_translated_English.xlsx");
    std::fs::write(&existing, b"previous run")?;

    let controller = Controller::new_for_test()?;
    let outcome = controller
        .run_with_translator(
            &common::mock_translator(common::uppercasing_provider()),
            &input,
            true,
            &MultiProgress::new(),
        )
        .await?;

    assert!(matches!(outcome, FileOutcome::Translated(_)));
    assert_eq!(common::read_cell(&existing, 0, "A1")?, "HI");
    Ok(())
}

/// Test that a missing input file is an error
#[tokio::test]
async fn test_run_withMissingInput_shouldReturnError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;

    let result = controller
        .run_with_translator(
            &common::mock_translator(common::uppercasing_provider()),
            &temp_dir.path().join("absent.xlsx"),
            false,
            &MultiProgress::new(),
        )
        .await;

    assert!(result.is_err());
    Ok(())
}
