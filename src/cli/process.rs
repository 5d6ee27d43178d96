use colored::Colorize;

use crate::error::{BennyError, Result};
use crate::extractor::{ExtractionClient, HttpExtractionApi};
use crate::pipeline::{Outcome, PipelineOptions, StatementPipeline};
use crate::resolver::AccountBook;
use crate::settings::{accounts_path, detailers_dir, load_settings, settings_file_exists};

pub fn run(dry_run: bool, auto_accept: bool) -> Result<()> {
    if !settings_file_exists() {
        return Err(BennyError::Settings(
            "configuration not found; run `benny init` first".to_string(),
        ));
    }

    let settings = load_settings();
    let accounts = AccountBook::load(&accounts_path())?;

    let client = if dry_run {
        None
    } else {
        Some(ExtractionClient::new(HttpExtractionApi::from_settings(
            &settings,
        )?))
    };

    let pipeline = StatementPipeline::new(
        &settings,
        &accounts,
        detailers_dir(),
        client,
        PipelineOptions {
            dry_run,
            auto_accept,
        },
    );

    let reports = pipeline.run()?;
    if reports.is_empty() {
        return Ok(());
    }

    let processed = count(&reports, |o| matches!(o, Outcome::Processed { .. }));
    let would = count(&reports, |o| matches!(o, Outcome::WouldProcess));
    let skipped = count(&reports, |o| matches!(o, Outcome::Skipped { .. }));
    let failed = count(&reports, |o| matches!(o, Outcome::Failed { .. }));

    if dry_run {
        println!(
            "Dry run complete: {} would process, {} skipped",
            would, skipped
        );
    } else {
        println!(
            "{} processed, {} skipped, {}",
            processed.to_string().green(),
            skipped,
            if failed > 0 {
                format!("{failed} failed").red().to_string()
            } else {
                "0 failed".to_string()
            }
        );
    }
    Ok(())
}

fn count(
    reports: &[crate::pipeline::DocumentReport],
    predicate: impl Fn(&Outcome) -> bool,
) -> usize {
    reports.iter().filter(|r| predicate(&r.outcome)).count()
}
