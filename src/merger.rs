use std::io::Write;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{BennyError, Result};

pub struct MergeReport {
    pub files: Vec<(String, usize)>,
    pub total: usize,
}

/// Entry count of a ledger file: lines opening a transaction block
/// (date followed by an asterisk).
pub fn count_entries(path: &Path) -> Result<usize> {
    let re = Regex::new(r"^\d{4}-\d{2}-\d{2}\s+\*")
        .map_err(|e| BennyError::Other(e.to_string()))?;
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().filter(|line| re.is_match(line)).count())
}

/// Append ledger files to the master ledger between start/end markers.
/// Dry-run counts entries without writing. Merging the same file twice
/// appends a duplicate block; nothing here detects already-merged content.
pub fn merge(files: &[PathBuf], output: &Path, dry_run: bool) -> Result<MergeReport> {
    if files.is_empty() {
        return Err(BennyError::Other("no input files provided".to_string()));
    }
    for file in files {
        if !file.exists() {
            return Err(BennyError::Other(format!(
                "file not found: {}",
                file.display()
            )));
        }
    }

    let mut report = MergeReport {
        files: Vec::new(),
        total: 0,
    };

    for file in files {
        let entries = count_entries(file)?;
        report.total += entries;
        let basename = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if !dry_run {
            append_file(file, &basename, output)?;
        }
        report.files.push((basename, entries));
    }

    Ok(report)
}

fn append_file(file: &Path, basename: &str, output: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)?;
    let mut out = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(output)?;
    write!(
        out,
        "\n; === Start: {basename} ===\n\n{}\n\n; === End: {basename} ===\n",
        content.trim_end()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_ENTRIES: &str = "\
2025-01-15 * \"Starbucks\" \"Coffee\"
  Liabilities:CreditCard:Amex  -85.00 MXN
  Expenses:Food:Coffee

2025-01-16 * \"OXXO\"
  Liabilities:CreditCard:Amex  -120.00 MXN
  Expenses:FIXME

; trailing comment
";

    fn write_ledger(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, TWO_ENTRIES).unwrap();
        path
    }

    #[test]
    fn test_count_entries_matches_date_asterisk_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_ledger(dir.path(), "amex.ledger");
        assert_eq!(count_entries(&path).unwrap(), 2);
    }

    #[test]
    fn test_merge_appends_with_markers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_ledger(dir.path(), "amex.ledger");
        let main = dir.path().join("main.ledger");
        std::fs::write(&main, "; master\n").unwrap();

        let report = merge(&[path], &main, false).unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].1, 2);

        let merged = std::fs::read_to_string(&main).unwrap();
        assert!(merged.starts_with("; master\n\n; === Start: amex.ledger ===\n\n"));
        assert!(merged.ends_with("\n\n; === End: amex.ledger ===\n"));
        assert_eq!(count_entries(&main).unwrap(), 2);
    }

    #[test]
    fn test_merge_creates_missing_master() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_ledger(dir.path(), "amex.ledger");
        let main = dir.path().join("main.ledger");

        merge(&[path], &main, false).unwrap();
        assert!(main.exists());
        assert_eq!(count_entries(&main).unwrap(), 2);
    }

    #[test]
    fn test_dry_run_leaves_master_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_ledger(dir.path(), "amex.ledger");
        let main = dir.path().join("main.ledger");
        std::fs::write(&main, "; master\n").unwrap();

        let report = merge(&[path], &main, true).unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(std::fs::read_to_string(&main).unwrap(), "; master\n");
    }

    #[test]
    fn test_double_merge_doubles_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_ledger(dir.path(), "amex.ledger");
        let main = dir.path().join("main.ledger");

        merge(&[path.clone()], &main, false).unwrap();
        merge(&[path], &main, false).unwrap();
        assert_eq!(count_entries(&main).unwrap(), 4);
    }

    #[test]
    fn test_missing_input_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("main.ledger");
        let missing = dir.path().join("nope.ledger");
        assert!(merge(&[missing], &main, false).is_err());
    }

    #[test]
    fn test_no_input_files_errors() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("main.ledger");
        assert!(merge(&[], &main, false).is_err());
    }
}
