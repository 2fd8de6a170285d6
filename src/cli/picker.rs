//! Interactive CSV picker for `steps import` without `--csv`.
//!
//! clap handles structured flags; the picker covers the "upload a file" flow
//! by listing `*.csv` files under the current directory and asking for one.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Default directory recursion depth for finding CSV files.
const DEFAULT_SEARCH_DEPTH: usize = 3;

/// Prompt on stdin/stdout for a CSV file from the current directory tree.
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let files = find_csv_files(Path::new("."), DEFAULT_SEARCH_DEPTH);
    let stdin = io::stdin();
    prompt_with(&files, stdin.lock(), io::stdout())
}

/// Prompt loop over arbitrary input/output.
///
/// Accepts a list number or an explicit path; `q` cancels.
pub fn prompt_with<R: BufRead, W: Write>(
    files: &[PathBuf],
    mut input: R,
    mut output: W,
) -> Result<PathBuf, AppError> {
    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No .csv files found. Provide one with `steps import --csv <file.csv>`.",
        ));
    }

    let io_err = |e: io::Error| AppError::new(4, format!("Failed to talk to the terminal: {e}"));

    writeln!(output, "Found {} CSV file(s):", files.len()).map_err(io_err)?;
    for (idx, path) in files.iter().enumerate() {
        writeln!(output, "{:>3}) {}", idx + 1, pretty_path(path)).map_err(io_err)?;
    }

    loop {
        write!(output, "Pick a file (1-{}), type a path, or q to quit: ", files.len()).map_err(io_err)?;
        output.flush().map_err(io_err)?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(io_err)? == 0 {
            return Err(AppError::new(
                2,
                "No input received. Provide a CSV path with `steps import --csv <file.csv>`.",
            ));
        }

        let choice = line.trim();
        if choice.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        let candidate = match choice.parse::<usize>() {
            Ok(n) if (1..=files.len()).contains(&n) => files[n - 1].clone(),
            Ok(n) => {
                writeln!(output, "No file number {n}.").map_err(io_err)?;
                continue;
            }
            Err(_) => PathBuf::from(choice),
        };

        match validate_csv_path(&candidate) {
            Ok(path) => return Ok(path),
            Err(err) => writeln!(output, "{err}").map_err(io_err)?,
        }
    }
}

/// Check that `path` is an existing `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.is_file() {
        return Err(AppError::new(2, format!("CSV file not found: {}", path.display())));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(
            2,
            format!("Expected a .csv file (got: {}).", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

/// `*.csv` files under `root` up to `max_depth`, sorted by display path.
pub fn find_csv_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk(root, 0, max_depth, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn walk(dir: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() && !should_skip_dir(&path) {
            walk(&path, depth + 1, max_depth, out);
        } else if file_type.is_file() && has_csv_extension(&path) {
            out.push(path);
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

fn pretty_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_csv_files_and_skips_target() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "hour,steps\n").unwrap();
        fs::write(dir.path().join("a.CSV"), "hour,steps\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("target").join("c.csv"), "").unwrap();

        let files = find_csv_files(dir.path(), 2);
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
    }

    #[test]
    fn prompt_accepts_number_after_bad_choice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day.csv");
        fs::write(&path, "hour,steps\n").unwrap();
        let files = vec![path.clone()];

        let mut out = Vec::new();
        let picked = prompt_with(&files, "7\n1\n".as_bytes(), &mut out).unwrap();
        assert_eq!(picked, path);
        assert!(String::from_utf8(out).unwrap().contains("No file number 7."));
    }

    #[test]
    fn prompt_can_be_canceled() {
        let files = vec![PathBuf::from("x.csv")];
        let err = prompt_with(&files, "q\n".as_bytes(), Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Canceled.");

        let err = prompt_with(&files, "".as_bytes(), Vec::new()).unwrap_err();
        assert!(err.to_string().starts_with("No input received"));
    }

    #[test]
    fn validate_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day.txt");
        fs::write(&path, "").unwrap();
        assert!(validate_csv_path(&path).is_err());
        assert!(validate_csv_path(&dir.path().join("missing.csv")).is_err());
    }
}
