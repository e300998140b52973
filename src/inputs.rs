use glob::{glob_with, MatchOptions, Pattern};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::MergeError;
use crate::excel::ExcelError;

/// Workbook extensions accepted as input.
pub const EXCEL_EXTENSIONS: [&str; 3] = ["xlsx", "xlsm", "xls"];

/// Files to merge, plus paths that were passed but are not workbooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSet {
    pub files: Vec<PathBuf>,
    pub rejected: Vec<PathBuf>,
}

impl InputSet {
    fn push(&mut self, path: PathBuf, seen: &mut HashSet<PathBuf>) {
        if !is_excel_file(&path) {
            tracing::warn!(path = %path.display(), "not an Excel workbook, skipping");
            self.rejected.push(path);
            return;
        }
        if seen.insert(path.clone()) {
            self.files.push(path);
        }
    }
}

/// Excel lock files (`~$name.xlsx`) are not workbooks.
pub fn is_excel_file(path: &Path) -> bool {
    let is_lock_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with("~$"))
        .unwrap_or(false);

    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| EXCEL_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false);

    has_extension && !is_lock_file
}

/// Expand directories and filter the given paths down to workbooks.
///
/// Order is preserved; a directory contributes its workbooks sorted by path.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<InputSet, MergeError> {
    let mut set = InputSet::default();
    let mut seen = HashSet::new();

    for path in paths {
        if path.is_dir() {
            for file in expand_dir(path)? {
                set.push(file, &mut seen);
            }
        } else if path.exists() {
            set.push(path.clone(), &mut seen);
        } else {
            return Err(ExcelError::file_not_found(&path.display().to_string()).into());
        }
    }

    tracing::debug!(
        accepted = set.files.len(),
        rejected = set.rejected.len(),
        "collected inputs"
    );

    Ok(set)
}

fn expand_dir(dir: &Path) -> Result<Vec<PathBuf>, MergeError> {
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };
    let escaped = Pattern::escape(&dir.to_string_lossy());

    let mut files = Vec::new();
    for ext in EXCEL_EXTENSIONS {
        let pattern = format!("{}/*.{}", escaped, ext);
        let entries = glob_with(&pattern, options).map_err(|source| MergeError::Pattern {
            path: dir.display().to_string(),
            source,
        })?;

        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "unreadable directory entry"),
            }
        }
    }

    files.sort();
    Ok(files)
}
