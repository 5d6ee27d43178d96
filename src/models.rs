use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One line-item extracted from a statement. Enrichment only ever touches
/// `payee`, `narration` and `expense_account`; the rest is read-only after
/// extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: String,
    pub description: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_account: Option<String>,
}

/// Raw transaction document: what the extraction service returns and what
/// gets persisted under `<output>/json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementDocument {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

/// (account name, 4-digit period) parsed from a statement filename.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountIdentity {
    pub name: String,
    pub period: String,
}

/// Per-account configuration, keyed by canonical account name in the
/// accounts file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub ledger_account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_profile: Option<String>,
}

/// Fields a detailing rule may set on a matching record. A rule only sets
/// the fields it provides; it never clears one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

/// Ordered rule groups for one account. IndexMap keeps the declared key
/// order, which is the evaluation order within each group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub prefix_rules: IndexMap<String, RuleFields>,
    #[serde(default)]
    pub substring_rules: IndexMap<String, RuleFields>,
}
