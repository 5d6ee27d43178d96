use std::path::Path;

use comfy_table::{Cell, Table};

use crate::error::{BennyError, Result};
use crate::resolver::{rule_set_path, AccountBook, LedgerAccounts};
use crate::settings::{accounts_path, detailers_dir, load_settings};

pub fn list() -> Result<()> {
    let book = AccountBook::load(&accounts_path())?;
    if book.is_empty() {
        println!(
            "No accounts configured. Edit {} to add some.",
            accounts_path().display()
        );
        return Ok(());
    }

    let rules_dir = detailers_dir();
    let mut table = Table::new();
    table.set_header(vec!["Name", "Ledger Account", "Extraction Profile", "Rules"]);
    for (name, config) in book.iter() {
        let has_rules = rule_set_path(&rules_dir, name).exists();
        table.add_row(vec![
            Cell::new(name),
            Cell::new(&config.ledger_account),
            Cell::new(config.extraction_profile.as_deref().unwrap_or("default")),
            Cell::new(if has_rules { "yes" } else { "" }),
        ]);
    }
    println!("Accounts\n{table}");
    Ok(())
}

pub fn search(query: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let file = settings.ledger_accounts_file.ok_or_else(|| {
        BennyError::Settings(
            "no ledger accounts file configured; set ledger_accounts_file in settings.json"
                .to_string(),
        )
    })?;

    let accounts = LedgerAccounts::parse(Path::new(&file))?;
    let matches: Vec<&String> = match query {
        Some(query) => accounts.search(query),
        None => accounts.all().iter().collect(),
    };
    if matches.is_empty() {
        println!("No accounts match.");
        return Ok(());
    }
    for account in matches {
        println!("{account}");
    }
    Ok(())
}
