use std::path::PathBuf;

use crate::error::{BennyError, Result};
use crate::merger;
use crate::settings::load_settings;

pub fn run(files: &[String], output: Option<&str>, dry_run: bool) -> Result<()> {
    let output = match output {
        Some(o) => PathBuf::from(o),
        None => load_settings()
            .main_ledger
            .map(PathBuf::from)
            .ok_or_else(|| {
                BennyError::Settings(
                    "no master ledger configured; set main_ledger in settings.json or use --output"
                        .to_string(),
                )
            })?,
    };

    let files: Vec<PathBuf> = files.iter().map(PathBuf::from).collect();
    let report = merger::merge(&files, &output, dry_run)?;

    for (name, entries) in &report.files {
        if dry_run {
            println!("Would merge: {name} ({entries} entries)");
        } else {
            println!("Merged: {name} ({entries} entries)");
        }
    }

    println!();
    if dry_run {
        println!(
            "Dry run complete. Would merge {} entries from {} file(s).",
            report.total,
            report.files.len()
        );
    } else {
        println!(
            "Done. Merged {} entries from {} file(s) into {}",
            report.total,
            report.files.len(),
            output.display()
        );
    }
    Ok(())
}
