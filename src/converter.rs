use std::path::Path;

use chrono::NaiveDate;

use crate::error::{BennyError, Result};
use crate::models::{StatementDocument, TransactionRecord};

pub const DEFAULT_EXPENSE_ACCOUNT: &str = "Expenses:FIXME";

/// Render transactions as ledger text, one block per transaction in input
/// order. Pure function of its inputs.
pub fn render(
    transactions: &[TransactionRecord],
    account: &str,
    expense_account: &str,
    default_currency: &str,
) -> Result<String> {
    let mut out = String::new();

    for record in transactions {
        let date = NaiveDate::parse_from_str(record.date.trim(), "%Y-%m-%d")
            .map_err(|_| {
                BennyError::InvalidRecord(format!(
                    "bad date '{}' on '{}'",
                    record.date, record.description
                ))
            })?
            .format("%Y-%m-%d");

        let description = normalize_whitespace(&record.description);
        let currency = record.currency.as_deref().unwrap_or(default_currency);
        let target = record
            .expense_account
            .as_deref()
            .unwrap_or(expense_account);

        // Without a narration the description serves as one and no
        // source_desc comment is emitted.
        let (narration, source_desc) = match record.narration.as_deref() {
            Some(narration) => (narration.to_string(), Some(description)),
            None => (description, None),
        };

        match record.payee.as_deref() {
            Some(payee) => out.push_str(&format!("{date} * \"{payee}\" \"{narration}\"\n")),
            None => out.push_str(&format!("{date} * \"{narration}\"\n")),
        }
        if let Some(desc) = source_desc {
            out.push_str(&format!("  source_desc: \"{desc}\"\n"));
        }
        out.push_str(&format!("  {account}  {:.2} {currency}\n", record.amount));
        out.push_str(&format!("  {target}\n"));
        out.push('\n');
    }

    Ok(out)
}

fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render a raw transaction document from disk into a ledger file.
pub fn convert_file(
    input: &Path,
    account: &str,
    output: &Path,
    expense_account: &str,
    default_currency: &str,
) -> Result<()> {
    let document: StatementDocument = serde_json::from_str(&std::fs::read_to_string(input)?)?;
    let text = render(
        &document.transactions,
        account,
        expense_account,
        default_currency,
    )?;
    std::fs::write(output, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(description: &str, amount: f64) -> TransactionRecord {
        TransactionRecord {
            date: "2025-01-15".to_string(),
            description: description.to_string(),
            amount,
            currency: None,
            payee: None,
            narration: None,
            expense_account: None,
        }
    }

    #[test]
    fn test_description_becomes_narration_without_comment() {
        let txns = vec![record("STARBUCKS   REFORMA ", -85.0)];
        let text = render(&txns, "Liabilities:CreditCard:Amex", DEFAULT_EXPENSE_ACCOUNT, "MXN")
            .unwrap();
        assert!(text.contains("2025-01-15 * \"STARBUCKS REFORMA\"\n"));
        assert!(!text.contains("source_desc"));
        assert!(text.contains("  Liabilities:CreditCard:Amex  -85.00 MXN\n"));
        assert!(text.contains("  Expenses:FIXME\n"));
    }

    #[test]
    fn test_payee_and_narration_with_source_comment() {
        let mut txn = record("STARBUCKS REFORMA 123", -85.0);
        txn.payee = Some("Starbucks".to_string());
        txn.narration = Some("Coffee".to_string());
        let text = render(&[txn], "Liabilities:CreditCard:Amex", DEFAULT_EXPENSE_ACCOUNT, "MXN")
            .unwrap();
        assert!(text.contains("2025-01-15 * \"Starbucks\" \"Coffee\"\n"));
        assert!(text.contains("  source_desc: \"STARBUCKS REFORMA 123\"\n"));
    }

    #[test]
    fn test_enriched_target_account_wins() {
        let mut txn = record("STARBUCKS REFORMA", -85.0);
        txn.payee = Some("Starbucks".to_string());
        txn.expense_account = Some("Expenses:Food:Coffee".to_string());
        let text = render(&[txn], "Liabilities:CreditCard:Amex", DEFAULT_EXPENSE_ACCOUNT, "MXN")
            .unwrap();
        assert!(text.contains("2025-01-15 * \"Starbucks\" \"STARBUCKS REFORMA\"\n"));
        assert!(text.contains("  Expenses:Food:Coffee\n"));
        assert!(!text.contains("Expenses:FIXME"));
    }

    #[test]
    fn test_record_currency_overrides_default() {
        let mut txn = record("WIRE IN", 1200.5);
        txn.currency = Some("USD".to_string());
        let text = render(&[txn], "Assets:Bank:Checking", DEFAULT_EXPENSE_ACCOUNT, "MXN").unwrap();
        assert!(text.contains("  Assets:Bank:Checking  1200.50 USD\n"));
    }

    #[test]
    fn test_amounts_have_two_decimals() {
        let txns = vec![record("ROUND", -85.0), record("THIRDS", 33.333)];
        let text = render(&txns, "A:B", DEFAULT_EXPENSE_ACCOUNT, "MXN").unwrap();
        assert!(text.contains("-85.00 MXN"));
        assert!(text.contains("33.33 MXN"));
    }

    #[test]
    fn test_blocks_separated_by_blank_line() {
        let txns = vec![record("ONE", -1.0), record("TWO", -2.0)];
        let text = render(&txns, "A:B", DEFAULT_EXPENSE_ACCOUNT, "MXN").unwrap();
        let blocks: Vec<&str> = text.trim_end().split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_bad_date_is_invalid_record() {
        let mut txn = record("BROKEN", -1.0);
        txn.date = "15/01/2025".to_string();
        let err = render(&[txn], "A:B", DEFAULT_EXPENSE_ACCOUNT, "MXN").unwrap_err();
        assert!(matches!(err, BennyError::InvalidRecord(_)));
    }

    #[test]
    fn test_convert_file_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("amex_2501.json");
        let output = dir.path().join("amex_2501.ledger");
        std::fs::write(
            &input,
            r#"{"transactions": [{"date": "2025-01-15", "description": "STARBUCKS", "amount": -85.0}]}"#,
        )
        .unwrap();

        convert_file(&input, "Liabilities:CreditCard:Amex", &output, DEFAULT_EXPENSE_ACCOUNT, "MXN")
            .unwrap();
        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("2025-01-15 * \"STARBUCKS\"\n"));
    }
}
