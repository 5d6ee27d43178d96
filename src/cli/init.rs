use std::path::PathBuf;

use indexmap::IndexMap;

use crate::error::{BennyError, Result};
use crate::models::{AccountConfig, RuleFields, RuleSet};
use crate::settings::{
    accounts_path, config_dir, detailers_dir, save_settings, settings_file_exists, Settings,
};

pub fn run() -> Result<()> {
    let config_dir = config_dir();

    if settings_file_exists() {
        return Err(BennyError::Settings(format!(
            "configuration already exists at {}; remove it first to reinitialize",
            config_dir.display()
        )));
    }

    std::fs::create_dir_all(&config_dir)?;
    std::fs::create_dir_all(detailers_dir())?;

    let settings = Settings::default();
    save_settings(&settings)?;
    write_example_accounts()?;
    write_example_rules()?;

    std::fs::create_dir_all(PathBuf::from(&settings.input_dir))?;
    std::fs::create_dir_all(PathBuf::from(&settings.output_dir))?;

    println!("Created configuration at {}", config_dir.display());
    println!();
    println!("Edit these files to configure benny:");
    println!("  {}  - service URL, API key and paths", config_dir.join("settings.json").display());
    println!("  {}  - account mappings", accounts_path().display());
    println!("  {}  - transaction matching rules", detailers_dir().display());
    Ok(())
}

fn write_example_accounts() -> Result<()> {
    let mut accounts: IndexMap<String, AccountConfig> = IndexMap::new();
    accounts.insert(
        "Amex".to_string(),
        AccountConfig {
            ledger_account: "Liabilities:CreditCard:Amex".to_string(),
            extraction_profile: Some("credit_card".to_string()),
        },
    );
    let json = serde_json::to_string_pretty(&accounts)?;
    std::fs::write(accounts_path(), format!("{json}\n"))?;
    Ok(())
}

fn write_example_rules() -> Result<()> {
    let mut rules = RuleSet::default();
    rules.prefix_rules.insert(
        "STARBUCKS".to_string(),
        RuleFields {
            payee: Some("Starbucks".to_string()),
            narration: None,
            account: Some("Expenses:Food:Coffee".to_string()),
        },
    );
    rules.substring_rules.insert(
        "UBER EATS".to_string(),
        RuleFields {
            payee: Some("Uber Eats".to_string()),
            narration: None,
            account: Some("Expenses:Food:Delivery".to_string()),
        },
    );
    let json = serde_json::to_string_pretty(&rules)?;
    std::fs::write(detailers_dir().join("example.json"), format!("{json}\n"))?;
    Ok(())
}
