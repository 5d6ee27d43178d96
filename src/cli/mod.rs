pub mod accounts;
pub mod convert;
pub mod detail;
pub mod init;
pub mod merge;
pub mod process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "benny",
    about = "Statement ingestion CLI: scanned statements in, ledger entries out."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up Benny: create the config directory with example settings,
    /// accounts and rule files.
    Init,
    /// Process statement PDFs from the input directory end-to-end.
    Process {
        /// Show what would be processed without making changes
        #[arg(long = "dry-run")]
        dry_run: bool,
        /// Skip interactive prompts (auto-yes)
        #[arg(long = "auto-accept")]
        auto_accept: bool,
    },
    /// Enrich a raw transaction document with an account's rule set.
    Detail {
        /// Path to a transactions JSON file
        file: String,
        /// Rule-set file (auto-detected from the filename if omitted)
        #[arg(long)]
        rules: Option<String>,
    },
    /// Convert a raw transaction document to ledger text.
    Convert {
        /// Path to a transactions JSON file
        file: String,
        /// Primary ledger account (auto-detected from the filename if omitted)
        #[arg(long)]
        account: Option<String>,
        /// Output ledger file (default: input path with .ledger extension)
        #[arg(long)]
        output: Option<String>,
        /// Default expense account for transactions without one
        #[arg(long, default_value = "Expenses:FIXME")]
        expense: String,
    },
    /// Merge ledger files into the master ledger.
    Merge {
        /// Ledger files to append
        files: Vec<String>,
        /// Master ledger file (default: main_ledger from settings)
        #[arg(long)]
        output: Option<String>,
        /// Report entry counts without writing
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// Inspect accounts.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
}

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// List configured statement accounts.
    List,
    /// Search account names opened in the ledger.
    Search {
        /// Case-insensitive substring filter
        query: Option<String>,
    },
}
