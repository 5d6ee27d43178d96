use std::path::Path;

use crate::error::Result;
use crate::models::{RuleFields, RuleSet, StatementDocument, TransactionRecord};

pub struct DetailStats {
    pub total: usize,
    pub detailed: usize,
    pub remaining: usize,
}

fn apply_fields(record: &mut TransactionRecord, fields: &RuleFields) {
    if let Some(payee) = &fields.payee {
        record.payee = Some(payee.clone());
    }
    if let Some(narration) = &fields.narration {
        record.narration = Some(narration.clone());
    }
    if let Some(account) = &fields.account {
        record.expense_account = Some(account.clone());
    }
}

/// Enrich records with the rule set: all prefix rules in declared order,
/// then all substring rules. Every matching record takes each field the
/// rule provides, so a later rule overwrites an earlier one for the same
/// field (last match wins). Matching is tracked positionally.
pub fn apply_rules(transactions: &mut [TransactionRecord], rules: &RuleSet) -> DetailStats {
    let mut matched = vec![false; transactions.len()];

    for (pattern, fields) in &rules.prefix_rules {
        for (i, record) in transactions.iter_mut().enumerate() {
            if record.description.starts_with(pattern.as_str()) {
                apply_fields(record, fields);
                matched[i] = true;
            }
        }
    }

    for (pattern, fields) in &rules.substring_rules {
        for (i, record) in transactions.iter_mut().enumerate() {
            if record.description.contains(pattern.as_str()) {
                apply_fields(record, fields);
                matched[i] = true;
            }
        }
    }

    let total = transactions.len();
    let detailed = matched.iter().filter(|m| **m).count();
    DetailStats {
        total,
        detailed,
        remaining: total - detailed,
    }
}

/// Enrich a raw transaction document on disk in place.
pub fn detail_file(file: &Path, rules_path: &Path) -> Result<DetailStats> {
    let rules: RuleSet = serde_json::from_str(&std::fs::read_to_string(rules_path)?)?;
    let mut document: StatementDocument = serde_json::from_str(&std::fs::read_to_string(file)?)?;

    let stats = apply_rules(&mut document.transactions, &rules);

    let json = serde_json::to_string_pretty(&document)?;
    std::fs::write(file, format!("{json}\n"))?;
    Ok(stats)
}
