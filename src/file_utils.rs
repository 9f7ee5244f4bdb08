use anyhow::{Context, Result};
use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Marker inserted between the file stem and the target language
pub const TRANSLATED_MARKER: &str = "_translated_";

// Characters rejected by at least one common filesystem, plus control characters
static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1F]"#).expect("valid filename regex"));

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Make a target language usable inside a file name.
    ///
    /// Path separators, reserved characters and control characters become `_`;
    /// leading/trailing dots and whitespace are dropped.
    pub fn sanitize_file_component(component: &str) -> String {
        let replaced = UNSAFE_FILENAME_CHARS.replace_all(component, "_");
        let trimmed = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());
        if trimmed.is_empty() {
            "unknown".to_string()
        } else {
            trimmed.to_string()
        }
    }

    // @generates: Output path for a translated workbook
    // @example: report.xlsx + "French" -> report_translated_French.xlsx
    pub fn translated_output_path<P: AsRef<Path>>(input_file: P, target_language: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let language = Self::sanitize_file_component(target_language);

        let stem = input_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());

        let file_name = match input_file.extension() {
            Some(ext) => format!("{}{}{}.{}", stem, TRANSLATED_MARKER, language, ext.to_string_lossy()),
            None => format!("{}{}{}", stem, TRANSLATED_MARKER, language),
        };

        input_file.with_file_name(file_name)
    }

    /// Whether a file name looks like something this tool produced
    pub fn is_translated_output<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().contains(TRANSLATED_MARKER))
            .unwrap_or(false)
    }

    /// Find `.xlsx` workbooks below a directory, skipping earlier outputs and Excel lock files
    pub fn find_workbooks<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            let is_xlsx = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("xlsx"));
            let is_lock_file = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with("~$"));

            if is_xlsx && !is_lock_file && !Self::is_translated_output(path) {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
