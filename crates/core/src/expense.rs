//! Expenses (and income entries) recorded against a user.
//!
//! The HTTP layer hands over an [`ExpenseDraft`] exactly as the client sent it.
//! Presence is checked first, the way a caller would see it ("is anything
//! missing?"), and only then are the values coerced into column types. Failures
//! of the second kind are reported like a rejected insert, not like missing input.

use core::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::{DomainError, DomainResult, ExpenseId, UserId};

/// Fractional digits kept for `amount` (`DECIMAL(10, 2)`).
pub const AMOUNT_SCALE: u32 = 2;

/// Format accepted for `date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest magnitude a `DECIMAL(10, 2)` column holds.
pub fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999, AMOUNT_SCALE)
}

/// A row of the `expenses` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub user_id: UserId,
    pub name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    /// Classification such as `expense` or `income` (column `type`).
    #[serde(rename = "type")]
    pub kind: String,
}

/// An expense about to be inserted (id not yet assigned).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub user_id: UserId,
    pub name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub kind: String,
}

impl NewExpense {
    pub fn into_expense(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            user_id: self.user_id,
            name: self.name,
            amount: self.amount,
            date: self.date,
            kind: self.kind,
        }
    }
}

/// Unvalidated expense fields as received from a client.
///
/// `amount` stays a raw JSON value so that both `3.5` and `"3.5"` are accepted
/// and a zero amount can be told apart from a malformed one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExpenseDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<JsonValue>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl ExpenseDraft {
    /// Check that `name`, `amount` and `date` were supplied.
    ///
    /// Empty strings, `null`, `false` and a zero amount all count as missing.
    /// `type` is not part of this check; the schema rejects it later.
    pub fn ensure_present(&self) -> DomainResult<()> {
        let name = self.name.as_deref().is_some_and(|s| !s.is_empty());
        let date = self.date.as_deref().is_some_and(|s| !s.is_empty());
        let amount = self.amount.as_ref().is_some_and(is_truthy);

        if name && amount && date {
            Ok(())
        } else {
            Err(DomainError::MissingInputs)
        }
    }

    /// Validate and coerce into a row ready for insertion under `user_id`.
    pub fn into_new_expense(self, user_id: UserId) -> DomainResult<NewExpense> {
        self.ensure_present()?;

        let amount = parse_amount(self.amount.as_ref().unwrap_or(&JsonValue::Null))?;
        let date = parse_date(self.date.as_deref().unwrap_or_default())?;
        let kind = self
            .kind
            .ok_or_else(|| DomainError::validation("type is required"))?;

        Ok(NewExpense {
            user_id,
            name: self.name.unwrap_or_default(),
            amount,
            date,
            kind,
        })
    }
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// Read an amount from a JSON number or numeric string, rounded half away from
/// zero to two fractional digits.
pub fn parse_amount(value: &JsonValue) -> DomainResult<Decimal> {
    let raw = match value {
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.trim().to_string(),
        other => return Err(DomainError::invalid_amount(format!("not a number: {other}"))),
    };

    let parsed = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|e| DomainError::invalid_amount(format!("{raw}: {e}")))?;

    let rounded = parsed.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.abs() > max_amount() {
        return Err(DomainError::invalid_amount(format!("{raw}: out of range")));
    }
    Ok(rounded)
}

/// Read a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| DomainError::invalid_date(format!("{raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn draft(body: JsonValue) -> ExpenseDraft {
        serde_json::from_value(body).unwrap()
    }

    fn user() -> UserId {
        UserId::new(7)
    }

    #[test]
    fn complete_draft_becomes_new_expense() {
        let d = draft(json!({
            "name": "Coffee",
            "amount": 3.5,
            "date": "2024-01-01",
            "type": "expense",
        }));

        let e = d.into_new_expense(user()).unwrap();
        assert_eq!(e.user_id, user());
        assert_eq!(e.name, "Coffee");
        assert_eq!(e.amount, Decimal::new(350, 2));
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(e.kind, "expense");
    }

    #[test]
    fn missing_name_amount_or_date_is_missing_inputs() {
        let cases = [
            json!({ "amount": 1, "date": "2024-01-01", "type": "expense" }),
            json!({ "name": "", "amount": 1, "date": "2024-01-01" }),
            json!({ "name": "Tea", "date": "2024-01-01" }),
            json!({ "name": "Tea", "amount": null, "date": "2024-01-01" }),
            json!({ "name": "Tea", "amount": 0, "date": "2024-01-01" }),
            json!({ "name": "Tea", "amount": "", "date": "2024-01-01" }),
            json!({ "name": "Tea", "amount": 2 }),
            json!({ "name": "Tea", "amount": 2, "date": "" }),
        ];

        for body in cases {
            let d = draft(body.clone());
            assert_eq!(d.ensure_present(), Err(DomainError::MissingInputs), "{body}");
            assert_eq!(
                d.into_new_expense(user()),
                Err(DomainError::MissingInputs),
                "{body}"
            );
        }
    }

    #[test]
    fn zero_as_string_counts_as_present() {
        let d = draft(json!({ "name": "Tea", "amount": "0", "date": "2024-01-01" }));
        assert!(d.ensure_present().is_ok());
    }

    #[test]
    fn missing_type_is_a_validation_error_not_missing_inputs() {
        let d = draft(json!({ "name": "Tea", "amount": 2, "date": "2024-01-01" }));
        assert!(matches!(
            d.into_new_expense(user()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn amount_accepts_numeric_strings_and_rounds_half_away_from_zero() {
        assert_eq!(parse_amount(&json!("12.345")).unwrap(), Decimal::new(1235, 2));
        assert_eq!(parse_amount(&json!(-0.005)).unwrap(), Decimal::new(-1, 2));
        assert_eq!(parse_amount(&json!(" 40 ")).unwrap(), Decimal::new(40, 0));
        assert_eq!(parse_amount(&json!(1e3)).unwrap(), Decimal::new(1000, 0));
    }

    #[test]
    fn amount_rejects_garbage_and_overflow() {
        assert!(matches!(parse_amount(&json!("abc")), Err(DomainError::InvalidAmount(_))));
        assert!(matches!(parse_amount(&json!(true)), Err(DomainError::InvalidAmount(_))));
        assert!(matches!(
            parse_amount(&json!(100_000_000)),
            Err(DomainError::InvalidAmount(_))
        ));
        assert!(parse_amount(&json!(99_999_999.99)).is_ok());
    }

    #[test]
    fn date_must_be_iso() {
        assert!(parse_date("2024-02-29").is_ok());
        assert!(matches!(parse_date("2023-02-29"), Err(DomainError::InvalidDate(_))));
        assert!(matches!(parse_date("01/02/2024"), Err(DomainError::InvalidDate(_))));
    }

    proptest! {
        #[test]
        fn two_digit_amounts_survive_parsing(cents in -9_999_999_999i64..=9_999_999_999i64) {
            prop_assume!(cents != 0);
            let expected = Decimal::new(cents, AMOUNT_SCALE);
            let parsed = parse_amount(&JsonValue::String(expected.to_string())).unwrap();
            prop_assert_eq!(parsed, expected);
        }

        #[test]
        fn empty_name_is_always_missing(amount in any::<i32>(), day in 1u32..=28) {
            let d = ExpenseDraft {
                name: Some(String::new()),
                amount: Some(json!(amount)),
                date: Some(format!("2024-03-{day:02}")),
                kind: Some("expense".to_string()),
            };
            prop_assert_eq!(d.ensure_present(), Err(DomainError::MissingInputs));
        }
    }
}
