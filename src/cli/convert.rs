use std::path::{Path, PathBuf};

use crate::converter;
use crate::error::{BennyError, Result};
use crate::resolver::{self, AccountBook};
use crate::settings::{accounts_path, load_settings};

pub fn run(
    file: &str,
    account: Option<&str>,
    output: Option<&str>,
    expense: &str,
) -> Result<()> {
    let input = PathBuf::from(file);
    let settings = load_settings();

    let account = match account {
        Some(a) => a.to_string(),
        None => auto_detect_account(&input)?,
    };
    let output = output
        .map(PathBuf::from)
        .unwrap_or_else(|| input.with_extension("ledger"));

    converter::convert_file(&input, &account, &output, expense, &settings.default_currency)?;
    println!("Saved ledger: {}", output.display());
    Ok(())
}

fn auto_detect_account(file: &Path) -> Result<String> {
    let book = AccountBook::load(&accounts_path())?;
    let account = resolver::parse_filename(file)
        .and_then(|identity| book.find(&identity.name).cloned())
        .map(|config| config.ledger_account);

    match account {
        Some(account) => {
            println!("Auto-detected account: {account}");
            Ok(account)
        }
        None => Err(BennyError::Other(format!(
            "could not auto-detect an account for '{}'; available accounts: {}; use --account",
            file.display(),
            book.names().join(", ")
        ))),
    }
}
