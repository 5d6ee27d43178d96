use std::io::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::converter;
use crate::detailer;
use crate::error::{BennyError, Result};
use crate::extractor::{ExtractionApi, ExtractionClient};
use crate::fmt::money;
use crate::merger;
use crate::models::{AccountConfig, AccountIdentity, StatementDocument};
use crate::resolver::{self, AccountBook};
use crate::settings::Settings;

pub struct PipelineOptions {
    pub dry_run: bool,
    pub auto_accept: bool,
}

pub enum Outcome {
    Processed { transactions: usize, merged: bool },
    WouldProcess,
    Skipped { reason: String },
    Failed { error: BennyError },
}

pub struct DocumentReport {
    pub file: String,
    pub outcome: Outcome,
}

/// Remote copy of an uploaded document. Deleted exactly once: explicitly
/// via `release` on the happy path, or on drop when processing unwinds
/// early. Deletion failures are logged, never surfaced.
struct RemoteFile<'a, A: ExtractionApi> {
    api: &'a A,
    id: Option<String>,
}

impl<'a, A: ExtractionApi> RemoteFile<'a, A> {
    fn new(api: &'a A, id: String) -> Self {
        Self { api, id: Some(id) }
    }

    fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    fn release(mut self) {
        self.delete_remote();
    }

    fn delete_remote(&mut self) {
        if let Some(id) = self.id.take() {
            match self.api.delete(&id) {
                Ok(true) => {}
                Ok(false) => eprintln!("  warning: remote file {id} was not deleted"),
                Err(e) => eprintln!("  warning: could not delete remote file {id}: {e}"),
            }
        }
    }
}

impl<A: ExtractionApi> Drop for RemoteFile<'_, A> {
    fn drop(&mut self) {
        self.delete_remote();
    }
}

/// Sequential statement pipeline: resolve, extract, enrich, convert,
/// optionally merge, archive. One document at a time; one document's
/// failure never stops the batch.
pub struct StatementPipeline<'a, A: ExtractionApi> {
    settings: &'a Settings,
    accounts: &'a AccountBook,
    rules_dir: PathBuf,
    client: Option<ExtractionClient<A>>,
    options: PipelineOptions,
}

impl<'a, A: ExtractionApi> StatementPipeline<'a, A> {
    pub fn new(
        settings: &'a Settings,
        accounts: &'a AccountBook,
        rules_dir: PathBuf,
        client: Option<ExtractionClient<A>>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            settings,
            accounts,
            rules_dir,
            client,
            options,
        }
    }

    pub fn run(&self) -> Result<Vec<DocumentReport>> {
        self.ensure_directories()?;
        let documents = self.list_documents()?;

        if documents.is_empty() {
            println!("No PDF files found in {}", self.settings.input_dir);
            return Ok(Vec::new());
        }

        println!("Found {} PDF(s) to process", documents.len());
        println!();

        let mut reports = Vec::new();
        for path in &documents {
            let file = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let outcome = self.process_document(path);
            reports.push(DocumentReport { file, outcome });
            println!();
        }
        Ok(reports)
    }

    fn ensure_directories(&self) -> Result<()> {
        if self.options.dry_run {
            return Ok(());
        }
        let output_dir = PathBuf::from(&self.settings.output_dir);
        for subdir in ["json", "ledger", "processed"] {
            std::fs::create_dir_all(output_dir.join(subdir))?;
        }
        Ok(())
    }

    fn list_documents(&self) -> Result<Vec<PathBuf>> {
        let input_dir = PathBuf::from(&self.settings.input_dir);
        if !input_dir.exists() {
            return Ok(Vec::new());
        }
        let mut documents: Vec<PathBuf> = std::fs::read_dir(&input_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .map_or(false, |e| e.eq_ignore_ascii_case("pdf"))
            })
            .collect();
        documents.sort();
        Ok(documents)
    }

    fn process_document(&self, path: &Path) -> Outcome {
        let stem = path
            .file_stem()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        println!("Processing: {stem}");

        let Some(identity) = resolver::parse_filename(path) else {
            println!("  {}", "SKIP: could not parse filename format".yellow());
            return Outcome::Skipped {
                reason: "unparseable filename".to_string(),
            };
        };

        let Some((canonical, config)) = self.accounts.resolve(&identity.name) else {
            println!(
                "  {}",
                format!("SKIP: no account configuration for '{}'", identity.name).yellow()
            );
            return Outcome::Skipped {
                reason: format!("unknown account '{}'", identity.name),
            };
        };
        let canonical = canonical.to_string();
        let config = config.clone();

        println!("  Account: {canonical}");
        println!("  Ledger account: {}", config.ledger_account);
        println!("  Period: {}", identity.period);

        if self.options.dry_run {
            println!("  [DRY RUN] would process this file");
            return Outcome::WouldProcess;
        }

        match self.run_document(path, &identity, &canonical, &config) {
            Ok((transactions, merged)) => {
                println!("  {}", "Done".green());
                Outcome::Processed {
                    transactions,
                    merged,
                }
            }
            Err(error) => {
                println!("  {}", format!("ERROR: {error}").red());
                Outcome::Failed { error }
            }
        }
    }

    fn run_document(
        &self,
        path: &Path,
        identity: &AccountIdentity,
        canonical: &str,
        config: &AccountConfig,
    ) -> Result<(usize, bool)> {
        let client = self.client.as_ref().ok_or_else(|| {
            BennyError::Settings("extraction client required outside dry-run".to_string())
        })?;

        let base_name = format!("{}_{}", identity.name.replace(' ', "_"), identity.period);
        let output_dir = PathBuf::from(&self.settings.output_dir);
        let json_path = output_dir.join("json").join(format!("{base_name}.json"));
        let ledger_path = output_dir.join("ledger").join(format!("{base_name}.ledger"));
        let processed_path = output_dir
            .join("processed")
            .join(path.file_name().unwrap_or_default());

        println!("  Uploading...");
        let remote = RemoteFile::new(client.api(), client.upload(path)?);
        println!("  File id: {}", remote.id());

        let profile = self
            .settings
            .extraction_profile(config.extraction_profile.as_deref())
            .ok_or_else(|| {
                BennyError::Settings("no extraction profile configured".to_string())
            })?;

        println!("  Extracting transactions...");
        let document = client.extract(remote.id(), &profile)?;
        println!("  Found {} transaction(s)", document.transactions.len());
        report_totals(&document);

        let json = serde_json::to_string_pretty(&document)?;
        std::fs::write(&json_path, format!("{json}\n"))?;
        println!("  Saved JSON: {}", json_path.display());

        let rules_path = resolver::rule_set_path(&self.rules_dir, canonical);
        if rules_path.exists() {
            let stats = detailer::detail_file(&json_path, &rules_path)?;
            println!(
                "  Detailed {} of {} transaction(s), {} remaining",
                stats.detailed, stats.total, stats.remaining
            );
        } else {
            println!("  No rule set found, skipping enrichment");
        }

        converter::convert_file(
            &json_path,
            &config.ledger_account,
            &ledger_path,
            converter::DEFAULT_EXPENSE_ACCOUNT,
            &self.settings.default_currency,
        )?;
        println!("  Saved ledger: {}", ledger_path.display());

        let merged = self.merge_into_main(&ledger_path)?;

        remote.release();

        std::fs::rename(path, &processed_path)?;
        println!("  Archived: {}", processed_path.display());

        Ok((document.transactions.len(), merged))
    }

    fn merge_into_main(&self, ledger_path: &Path) -> Result<bool> {
        let Some(main_ledger) = self.settings.main_ledger.as_deref() else {
            return Ok(false);
        };
        if !self.options.auto_accept && !confirm(&format!("  Merge into {main_ledger}? [y/N] ")) {
            return Ok(false);
        }
        let report = merger::merge(&[ledger_path.to_path_buf()], Path::new(main_ledger), false)?;
        println!("  Merged {} entries into {main_ledger}", report.total);
        Ok(true)
    }
}

fn report_totals(document: &StatementDocument) {
    let credits: f64 = document
        .transactions
        .iter()
        .map(|t| t.amount)
        .filter(|a| *a > 0.0)
        .sum();
    let debits: f64 = document
        .transactions
        .iter()
        .map(|t| t.amount)
        .filter(|a| *a < 0.0)
        .sum();
    println!("  Credits total: {}", money(credits).green());
    println!("  Debits total: {}", money(debits).red());
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt}");
    let _ = std::io::stdout().flush();
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).ok();
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
