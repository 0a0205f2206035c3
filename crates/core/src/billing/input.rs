//! Typed parsing for form input.
//!
//! Form values arrive as strings; this is the only place strings enter the
//! billing domain. Empty fields normalize to zero/absent, malformed fields
//! are rejected.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::surcharge::SurchargePolicy;
use super::types::{InstallmentGroup, PaymentPlan, UpfrontPayment};

/// Errors produced when form input cannot be converted to domain values.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Not a monetary amount.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Not a non-negative integer count.
    #[error("Invalid installment count: {0:?}")]
    InvalidCount(String),

    /// Not an ISO calendar date.
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    /// Not a positive percentage rate.
    #[error("Invalid rate: {0:?}")]
    InvalidRate(String),
}

/// Parses a monetary amount.
///
/// Empty input is zero; a comma decimal separator is accepted ("1500,50").
pub fn parse_amount(raw: &str) -> Result<Decimal, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let normalized = trimmed.replace(',', ".");
    Decimal::from_str(&normalized).map_err(|_| ParseError::InvalidAmount(raw.to_string()))
}

/// Parses an installment count. Empty input is zero.
pub fn parse_count(raw: &str) -> Result<u32, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidCount(raw.to_string()))
}

/// Parses an optional ISO (`%Y-%m-%d`) calendar date. Empty input is `None`.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ParseError::InvalidDate(raw.to_string()))
}

/// Parses a percentage rate, which must be positive.
pub fn parse_rate(raw: &str) -> Result<Decimal, ParseError> {
    let value = parse_amount(raw).map_err(|_| ParseError::InvalidRate(raw.to_string()))?;
    if value <= Decimal::ZERO {
        return Err(ParseError::InvalidRate(raw.to_string()));
    }
    Ok(value)
}

/// Raw entrada fields as the form submits them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpfrontForm {
    /// Entrada value.
    pub value: String,
    /// Entrada due date, ISO format or empty.
    pub due_date: String,
}

/// One raw installment group as the form submits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupForm {
    /// Group label.
    pub description: String,
    /// Installment count.
    pub count: String,
    /// Per-installment value.
    pub installment_value: String,
    /// First due date, ISO format or empty.
    pub start_date: String,
}

/// Raw plan form state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanForm {
    /// Entrada fields; absent when the client pays no entrada.
    pub upfront: Option<UpfrontForm>,
    /// Raw groups in display order.
    pub groups: Vec<GroupForm>,
}

impl PlanForm {
    /// Converts raw form state into a typed plan.
    ///
    /// Groups are numbered 1..N in the order submitted.
    #[allow(clippy::cast_possible_truncation)]
    pub fn parse(&self) -> Result<PaymentPlan, ParseError> {
        let upfront = match &self.upfront {
            Some(raw) => Some(UpfrontPayment {
                value: parse_amount(&raw.value)?,
                due_date: parse_date(&raw.due_date)?,
            }),
            None => None,
        };

        let mut groups = Vec::with_capacity(self.groups.len());
        for (i, raw) in self.groups.iter().enumerate() {
            groups.push(InstallmentGroup {
                order: i as u32 + 1,
                description: raw.description.trim().to_string(),
                count: parse_count(&raw.count)?,
                installment_value: parse_amount(&raw.installment_value)?,
                start_date: parse_date(&raw.start_date)?,
            });
        }

        Ok(PaymentPlan { upfront, groups })
    }
}

/// Raw surcharge policy form state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyForm {
    /// Whether monthly interest is enabled.
    pub apply_interest: bool,
    /// Interest rate, percent per month.
    pub monthly_interest_rate: String,
    /// Whether the one-time penalty is enabled.
    pub apply_penalty: bool,
    /// Penalty rate, flat percent.
    pub penalty_rate: String,
}

impl PolicyForm {
    /// Converts raw form state into a typed policy.
    ///
    /// A rate is parsed, and required positive, only when its flag is on.
    pub fn parse(&self) -> Result<SurchargePolicy, ParseError> {
        let monthly_interest_rate = if self.apply_interest {
            parse_rate(&self.monthly_interest_rate)?
        } else {
            Decimal::ZERO
        };
        let penalty_rate = if self.apply_penalty {
            parse_rate(&self.penalty_rate)?
        } else {
            Decimal::ZERO
        };

        Ok(SurchargePolicy {
            apply_interest: self.apply_interest,
            monthly_interest_rate,
            apply_penalty: self.apply_penalty,
            penalty_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("1000.00", dec!(1000.00))]
    #[case("1500,50", dec!(1500.50))]
    #[case("  790.00  ", dec!(790.00))]
    #[case("", dec!(0))]
    #[case("-50", dec!(-50))]
    fn test_parse_amount(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw).unwrap(), expected);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(matches!(
            parse_amount("abc"),
            Err(ParseError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_amount("10,0,0"),
            Err(ParseError::InvalidAmount(_))
        ));
    }

    #[rstest]
    #[case("12", 12)]
    #[case("", 0)]
    #[case(" 3 ", 3)]
    fn test_parse_count(#[case] raw: &str, #[case] expected: u32) {
        assert_eq!(parse_count(raw).unwrap(), expected);
    }

    #[test]
    fn test_parse_count_rejects_negative_and_fractional() {
        assert!(matches!(parse_count("-1"), Err(ParseError::InvalidCount(_))));
        assert!(matches!(
            parse_count("2.5"),
            Err(ParseError::InvalidCount(_))
        ));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-10").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10)
        );
        assert_eq!(parse_date("").unwrap(), None);
        assert!(matches!(
            parse_date("10/01/2024"),
            Err(ParseError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_parse_rate_requires_positive() {
        assert_eq!(parse_rate("0,5").unwrap(), dec!(0.5));
        assert!(matches!(parse_rate("0"), Err(ParseError::InvalidRate(_))));
        assert!(matches!(parse_rate("-1"), Err(ParseError::InvalidRate(_))));
        assert!(matches!(parse_rate(""), Err(ParseError::InvalidRate(_))));
    }

    #[test]
    fn test_plan_form_parse() {
        let form = PlanForm {
            upfront: Some(UpfrontForm {
                value: "2000,00".into(),
                due_date: "2024-01-15".into(),
            }),
            groups: vec![
                GroupForm {
                    description: " Honorários ".into(),
                    count: "10".into(),
                    installment_value: "790.00".into(),
                    start_date: "2024-02-10".into(),
                },
                GroupForm::default(),
            ],
        };

        let plan = form.parse().unwrap();

        let upfront = plan.upfront.unwrap();
        assert_eq!(upfront.value, dec!(2000.00));
        assert_eq!(upfront.due_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(plan.groups.len(), 2);
        assert_eq!(plan.groups[0].order, 1);
        assert_eq!(plan.groups[0].description, "Honorários");
        assert_eq!(plan.groups[0].count, 10);
        assert_eq!(plan.groups[1].order, 2);
        assert_eq!(plan.groups[1].count, 0);
        assert!(plan.groups[1].start_date.is_none());
    }

    #[test]
    fn test_plan_form_parse_propagates_field_errors() {
        let form = PlanForm {
            upfront: None,
            groups: vec![GroupForm {
                description: String::new(),
                count: "doze".into(),
                installment_value: String::new(),
                start_date: String::new(),
            }],
        };

        assert!(matches!(form.parse(), Err(ParseError::InvalidCount(_))));
    }

    #[test]
    fn test_policy_form_ignores_rates_behind_off_flags() {
        let form = PolicyForm {
            apply_interest: false,
            monthly_interest_rate: "not a number".into(),
            apply_penalty: true,
            penalty_rate: "2".into(),
        };

        let policy = form.parse().unwrap();

        assert!(!policy.apply_interest);
        assert_eq!(policy.monthly_interest_rate, Decimal::ZERO);
        assert_eq!(policy.penalty_rate, dec!(2));
    }

    #[test]
    fn test_policy_form_requires_rate_when_enabled() {
        let form = PolicyForm {
            apply_interest: true,
            monthly_interest_rate: String::new(),
            apply_penalty: false,
            penalty_rate: String::new(),
        };

        assert!(matches!(form.parse(), Err(ParseError::InvalidRate(_))));
    }
}
