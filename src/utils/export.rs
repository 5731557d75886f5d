// src/utils/export.rs

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;

use crate::{config::DEFAULT_RESULTS_PREFIX, error::PersistenceError, models::result::ResultRecord};

/// Flat CSV row; `options` is carried as a JSON array string.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    question_number: usize,
    question: &'a str,
    question_type: &'a str,
    user_answer: &'a str,
    correct_answer: &'a str,
    options: String,
    is_correct: bool,
}

impl<'a> From<&'a ResultRecord> for CsvRow<'a> {
    fn from(r: &'a ResultRecord) -> Self {
        Self {
            question_number: r.question_number,
            question: &r.question,
            question_type: &r.question_type,
            user_answer: &r.user_answer,
            correct_answer: &r.correct_answer,
            options: Value::from(r.options.clone()).to_string(),
            is_correct: r.is_correct,
        }
    }
}

/// Keeps a caller-supplied prefix to a single safe path component.
pub fn sanitize_prefix(prefix: &str) -> String {
    let cleaned: String = prefix
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if cleaned.is_empty() {
        DEFAULT_RESULTS_PREFIX.to_string()
    } else {
        cleaned
    }
}

/// `{prefix}_{YYYYMMDD_HHMMSS}.csv`
pub fn results_file_name(prefix: &str, at: DateTime<Local>) -> String {
    format!("{}_{}.csv", sanitize_prefix(prefix), at.format("%Y%m%d_%H%M%S"))
}

/// Writes `records` as CSV under `dir` and returns the final path.
///
/// Rows go to a hidden temporary file first and are linked into place,
/// so a failed write never leaves a truncated `.csv` behind. An existing
/// file is never replaced: a second save in the same second gets `_2`.
pub fn write_results_csv(
    dir: &Path,
    prefix: &str,
    records: &[ResultRecord],
    at: DateTime<Local>,
) -> Result<PathBuf, PersistenceError> {
    fs::create_dir_all(dir).map_err(|source| PersistenceError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let file_name = results_file_name(prefix, at);
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    if let Err(source) = write_rows(&tmp_path, records) {
        let _ = fs::remove_file(&tmp_path);
        return Err(PersistenceError::Write {
            path: dir.join(&file_name),
            source,
        });
    }

    let claimed = claim_free_name(dir, &file_name, &tmp_path);
    let _ = fs::remove_file(&tmp_path);
    let path = claimed?;

    tracing::info!("Saved {} results to {}", records.len(), path.display());
    Ok(path)
}

/// Links `tmp_path` under the first name not yet taken:
/// `file_name`, then `{stem}_2.csv`, `{stem}_3.csv`, ...
fn claim_free_name(dir: &Path, file_name: &str, tmp_path: &Path) -> Result<PathBuf, PersistenceError> {
    let stem = file_name.trim_end_matches(".csv");
    let mut n = 1;

    loop {
        let candidate = if n == 1 {
            file_name.to_string()
        } else {
            format!("{}_{}.csv", stem, n)
        };
        let path = dir.join(candidate);

        match fs::hard_link(tmp_path, &path) {
            Ok(()) => return Ok(path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(source) => return Err(PersistenceError::Finalize { path, source }),
        }
    }
}

fn write_rows(path: &Path, records: &[ResultRecord]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}
