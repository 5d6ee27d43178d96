use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex::Regex;

use crate::error::{BennyError, Result};
use crate::models::{AccountConfig, AccountIdentity};

// "Amex 2501.pdf" and "BBVA_TDC_2501.json" both name an account and a
// 4-digit period; space-separated is tried first.
const FILENAME_PATTERNS: &[&str] = &[r"^(.+?)\s+(\d{4})$", r"^(.+?)_(\d{4})$"];

/// Parse a statement filename into (account name, period). Returns None
/// when the name fits neither convention.
pub fn parse_filename(path: &Path) -> Option<AccountIdentity> {
    let stem = path.file_stem()?.to_str()?;
    for pattern in FILENAME_PATTERNS {
        let re = Regex::new(pattern).ok()?;
        if let Some(caps) = re.captures(stem) {
            return Some(AccountIdentity {
                name: caps[1].to_string(),
                period: caps[2].to_string(),
            });
        }
    }
    None
}

/// Rule-set file for an account: lowercase, spaces to underscores.
/// Callers check existence; a missing file means "no enrichment".
pub fn rule_set_path(rules_dir: &Path, account_name: &str) -> PathBuf {
    let slug = account_name.to_lowercase().replace(' ', "_");
    rules_dir.join(format!("{slug}.json"))
}

/// The configured accounts, keyed by canonical name in file order.
#[derive(Debug, Clone, Default)]
pub struct AccountBook {
    accounts: IndexMap<String, AccountConfig>,
}

impl AccountBook {
    /// Load from an accounts JSON file. A missing file is an empty book,
    /// not an error; callers decide whether unknown accounts are fatal.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let accounts: IndexMap<String, AccountConfig> = serde_json::from_str(&content)?;
        Ok(Self { accounts })
    }

    pub fn from_accounts(accounts: IndexMap<String, AccountConfig>) -> Self {
        Self { accounts }
    }

    /// Exact key match first, then case-insensitive with underscores
    /// treated as spaces.
    pub fn find(&self, name: &str) -> Option<&AccountConfig> {
        self.canonical_name(name)
            .and_then(|key| self.accounts.get(key))
    }

    /// Resolve an input name to its canonical key and config. Rule-set
    /// files live under the canonical spelling.
    pub fn resolve(&self, name: &str) -> Option<(&str, &AccountConfig)> {
        let key = self.canonical_name(name)?;
        self.accounts.get(key).map(|config| (key, config))
    }

    /// The canonical key an input name resolves to.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        if self.accounts.contains_key(name) {
            return self.accounts.get_key_value(name).map(|(k, _)| k.as_str());
        }
        let normalized = name.replace('_', " ").to_lowercase();
        let lowered = name.to_lowercase();
        self.accounts
            .keys()
            .find(|key| {
                let k = key.to_lowercase();
                k == normalized || k == lowered
            })
            .map(|k| k.as_str())
    }

    pub fn names(&self) -> Vec<&str> {
        self.accounts.keys().map(|k| k.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AccountConfig)> {
        self.accounts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Account names declared by `open` directives in a ledger file.
#[derive(Debug, Clone)]
pub struct LedgerAccounts {
    accounts: Vec<String>,
}

impl LedgerAccounts {
    pub fn parse(path: &Path) -> Result<Self> {
        let re = Regex::new(
            r"^\d{4}-\d{2}-\d{2}\s+open\s+((?:Assets|Liabilities|Income|Expenses|Equity)(?::\S+)+)",
        )
        .map_err(|e| BennyError::Other(e.to_string()))?;
        let content = std::fs::read_to_string(path)?;
        let mut accounts: Vec<String> = content
            .lines()
            .filter_map(|line| re.captures(line).map(|c| c[1].to_string()))
            .collect();
        accounts.sort();
        accounts.dedup();
        Ok(Self { accounts })
    }

    pub fn all(&self) -> &[String] {
        &self.accounts
    }

    pub fn search(&self, query: &str) -> Vec<&String> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.accounts.iter().collect();
        }
        self.accounts
            .iter()
            .filter(|a| a.to_lowercase().contains(&query))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> AccountBook {
        let mut accounts = IndexMap::new();
        accounts.insert(
            "Amex".to_string(),
            AccountConfig {
                ledger_account: "Liabilities:CreditCard:Amex".to_string(),
                extraction_profile: Some("credit_card".to_string()),
            },
        );
        accounts.insert(
            "BBVA TDC".to_string(),
            AccountConfig {
                ledger_account: "Liabilities:CreditCard:BBVA".to_string(),
                extraction_profile: None,
            },
        );
        AccountBook::from_accounts(accounts)
    }

    #[test]
    fn test_parse_space_separated() {
        let id = parse_filename(Path::new("Amex 2501.pdf")).unwrap();
        assert_eq!(id.name, "Amex");
        assert_eq!(id.period, "2501");
    }

    #[test]
    fn test_parse_underscore_separated() {
        let id = parse_filename(Path::new("BBVA_TDC_2501.json")).unwrap();
        assert_eq!(id.name, "BBVA_TDC");
        assert_eq!(id.period, "2501");
    }

    #[test]
    fn test_parse_multiword_account() {
        let id = parse_filename(Path::new("Banorte Nomina 2412.pdf")).unwrap();
        assert_eq!(id.name, "Banorte Nomina");
        assert_eq!(id.period, "2412");
    }

    #[test]
    fn test_parse_rejects_unparseable() {
        assert!(parse_filename(Path::new("invalid.pdf")).is_none());
        assert!(parse_filename(Path::new("Amex 251.pdf")).is_none());
        assert!(parse_filename(Path::new("Amex 12501.pdf")).is_none());
        assert!(parse_filename(Path::new("2501.pdf")).is_none());
    }

    #[test]
    fn test_find_exact_match() {
        let book = book();
        let config = book.find("Amex").unwrap();
        assert_eq!(config.ledger_account, "Liabilities:CreditCard:Amex");
    }

    #[test]
    fn test_find_case_insensitive() {
        let book = book();
        assert!(book.find("amex").is_some());
        assert!(book.find("AMEX").is_some());
    }

    #[test]
    fn test_find_underscores_as_spaces() {
        let book = book();
        assert!(book.find("BBVA_TDC").is_some());
        assert!(book.find("bbva_tdc").is_some());
        assert_eq!(book.canonical_name("bbva_tdc"), Some("BBVA TDC"));
    }

    #[test]
    fn test_find_unknown_is_none() {
        let book = book();
        assert!(book.find("Chase").is_none());
        assert!(book.canonical_name("Chase").is_none());
    }

    #[test]
    fn test_rule_set_path_slug() {
        let path = rule_set_path(Path::new("/cfg/detailers"), "BBVA TDC");
        assert_eq!(path, PathBuf::from("/cfg/detailers/bbva_tdc.json"));
    }

    #[test]
    fn test_ledger_accounts_parse_and_search() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.ledger");
        std::fs::write(
            &path,
            "2020-01-01 open Assets:Bank:Checking\n\
             2020-01-01 open Expenses:Food:Coffee\n\
             2020-01-01 open Expenses:Food:Coffee\n\
             2021-06-15 open Liabilities:CreditCard:Amex\n\
             ; comment line\n\
             2021-06-15 balance Assets:Bank:Checking 100.00 MXN\n",
        )
        .unwrap();
        let accounts = LedgerAccounts::parse(&path).unwrap();
        assert_eq!(
            accounts.all(),
            &[
                "Assets:Bank:Checking".to_string(),
                "Expenses:Food:Coffee".to_string(),
                "Liabilities:CreditCard:Amex".to_string(),
            ]
        );
        assert_eq!(accounts.search("food").len(), 1);
        assert_eq!(accounts.search("").len(), 3);
        assert!(accounts.search("payroll").is_empty());
    }
}
