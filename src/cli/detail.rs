use std::path::{Path, PathBuf};

use crate::detailer;
use crate::error::{BennyError, Result};
use crate::resolver::{self, AccountBook};
use crate::settings::{accounts_path, detailers_dir};

pub fn run(file: &str, rules: Option<&str>) -> Result<()> {
    let path = PathBuf::from(file);
    let rules_path = match rules {
        Some(r) => PathBuf::from(r),
        None => auto_detect_rules(&path)?,
    };

    let stats = detailer::detail_file(&path, &rules_path)?;
    println!(
        "{} of {} transaction(s) detailed, {} remaining",
        stats.detailed, stats.total, stats.remaining
    );
    Ok(())
}

fn auto_detect_rules(file: &Path) -> Result<PathBuf> {
    let book = AccountBook::load(&accounts_path())?;
    let rules_path = resolver::parse_filename(file)
        .and_then(|identity| {
            book.canonical_name(&identity.name)
                .map(|canonical| resolver::rule_set_path(&detailers_dir(), canonical))
        })
        .filter(|path| path.exists());

    rules_path.ok_or_else(|| {
        BennyError::Other(format!(
            "could not auto-detect a rule set for '{}'; available accounts: {}; use --rules",
            file.display(),
            book.names().join(", ")
        ))
    })
}
