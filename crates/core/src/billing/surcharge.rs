//! Late-payment surcharges: monthly compound interest (juros) and the
//! one-time fixed penalty (multa).

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Surcharge policy attached to a client's contract.
///
/// Applies uniformly to every installment of that contract. The plan form
/// offers a fixed set of rates (see [`monthly_interest_choices`] and
/// [`penalty_choices`]) but any positive rate is computable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargePolicy {
    /// Whether monthly compound interest accrues on late installments.
    pub apply_interest: bool,
    /// Interest rate, percent per month.
    pub monthly_interest_rate: Decimal,
    /// Whether the one-time penalty applies to late installments.
    pub apply_penalty: bool,
    /// Penalty rate, flat percent of the installment value.
    pub penalty_rate: Decimal,
}

/// Extra amount owed on an installment due to lateness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surcharge {
    /// Accrued compound interest.
    pub interest: Decimal,
    /// One-time fixed penalty.
    pub penalty: Decimal,
    /// Base value plus interest and penalty.
    pub total: Decimal,
}

impl Surcharge {
    /// A zero surcharge over the given base value.
    #[must_use]
    pub fn none(base_value: Decimal) -> Self {
        Self {
            interest: Decimal::ZERO,
            penalty: Decimal::ZERO,
            total: base_value,
        }
    }
}

/// Interest-rate choices offered by the policy form (percent per month).
#[must_use]
pub fn monthly_interest_choices() -> [Decimal; 4] {
    [
        Decimal::new(5, 1),
        Decimal::ONE,
        Decimal::TWO,
        Decimal::new(3, 0),
    ]
}

/// Penalty-rate choices offered by the policy form (flat percent).
#[must_use]
pub fn penalty_choices() -> [Decimal; 3] {
    [Decimal::TWO, Decimal::new(5, 0), Decimal::new(10, 0)]
}

/// Whole calendar months elapsed from `from` to `to`.
///
/// A month counts once `to` reaches the same day-of-month as `from`; the
/// partial month in progress never counts. Returns zero when `to` is not
/// after `from`.
#[must_use]
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn whole_months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }
    let mut months = (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32);
    if to.day() < from.day() {
        months -= 1;
    }
    if months < 0 { 0 } else { months as u32 }
}

/// Computes the surcharge for one installment as of a reference date.
///
/// Pure function of its four inputs. Not yet late (`as_of <= due_date`)
/// means zero surcharge regardless of policy. The penalty is charged
/// exactly once however long the delay; interest compounds monthly over
/// [`whole_months_between`] elapsed months:
/// `base x ((1 + rate/100)^months - 1)`. Amounts are rounded to centavos.
#[must_use]
pub fn late_surcharge(
    due_date: NaiveDate,
    base_value: Decimal,
    as_of: NaiveDate,
    policy: &SurchargePolicy,
) -> Surcharge {
    if as_of <= due_date {
        return Surcharge::none(base_value);
    }

    let penalty = if policy.apply_penalty {
        (base_value * policy.penalty_rate / Decimal::ONE_HUNDRED).round_dp(2)
    } else {
        Decimal::ZERO
    };

    let interest = if policy.apply_interest {
        let months = whole_months_between(due_date, as_of);
        let monthly = Decimal::ONE + policy.monthly_interest_rate / Decimal::ONE_HUNDRED;
        let mut factor = Decimal::ONE;
        for _ in 0..months {
            factor *= monthly;
        }
        (base_value * (factor - Decimal::ONE)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    Surcharge {
        interest,
        penalty,
        total: base_value + interest + penalty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn full_policy() -> SurchargePolicy {
        SurchargePolicy {
            apply_interest: true,
            monthly_interest_rate: dec!(1),
            apply_penalty: true,
            penalty_rate: dec!(2),
        }
    }

    #[test]
    fn test_zero_before_due_date() {
        let s = late_surcharge(
            date(2024, 1, 10),
            dec!(1000.00),
            date(2024, 1, 5),
            &full_policy(),
        );
        assert_eq!(s.interest, Decimal::ZERO);
        assert_eq!(s.penalty, Decimal::ZERO);
        assert_eq!(s.total, dec!(1000.00));
    }

    #[test]
    fn test_zero_on_due_date() {
        let s = late_surcharge(
            date(2024, 1, 10),
            dec!(1000.00),
            date(2024, 1, 10),
            &full_policy(),
        );
        assert_eq!(s.total, dec!(1000.00));
    }

    #[test]
    fn test_three_months_late_with_penalty() {
        let s = late_surcharge(
            date(2024, 1, 10),
            dec!(1000.00),
            date(2024, 4, 10),
            &full_policy(),
        );
        assert_eq!(s.penalty, dec!(20.00));
        assert_eq!(s.interest, dec!(30.30));
        assert_eq!(s.total, dec!(1050.30));
    }

    #[rstest]
    #[case(date(2024, 1, 11), date(2025, 1, 10))]
    fn test_penalty_is_one_time(#[case] one_day: NaiveDate, #[case] one_year: NaiveDate) {
        let policy = SurchargePolicy {
            apply_interest: false,
            monthly_interest_rate: Decimal::ZERO,
            apply_penalty: true,
            penalty_rate: dec!(5),
        };
        let due = date(2024, 1, 10);

        let early = late_surcharge(due, dec!(800.00), one_day, &policy);
        let late = late_surcharge(due, dec!(800.00), one_year, &policy);

        assert_eq!(early.penalty, dec!(40.00));
        assert_eq!(early.penalty, late.penalty);
        assert_eq!(early.total, late.total);
    }

    #[test]
    fn test_interest_only_policy() {
        let policy = SurchargePolicy {
            apply_interest: true,
            monthly_interest_rate: dec!(2),
            apply_penalty: false,
            penalty_rate: Decimal::ZERO,
        };

        let s = late_surcharge(date(2024, 3, 1), dec!(500.00), date(2024, 5, 1), &policy);

        // 500 x (1.02^2 - 1) = 20.20
        assert_eq!(s.interest, dec!(20.20));
        assert_eq!(s.penalty, Decimal::ZERO);
        assert_eq!(s.total, dec!(520.20));
    }

    #[test]
    fn test_no_flags_means_no_surcharge() {
        let s = late_surcharge(
            date(2024, 1, 10),
            dec!(1000.00),
            date(2025, 1, 10),
            &SurchargePolicy::default(),
        );
        assert_eq!(s.total, dec!(1000.00));
    }

    #[test]
    fn test_late_but_under_one_month_accrues_no_interest() {
        let s = late_surcharge(
            date(2024, 1, 10),
            dec!(1000.00),
            date(2024, 2, 9),
            &full_policy(),
        );
        assert_eq!(s.interest, Decimal::ZERO);
        // The penalty still applies from the first late day.
        assert_eq!(s.penalty, dec!(20.00));
    }

    #[rstest]
    #[case(date(2024, 1, 10), date(2024, 1, 10), 0)]
    #[case(date(2024, 1, 10), date(2024, 2, 9), 0)]
    #[case(date(2024, 1, 10), date(2024, 2, 10), 1)]
    #[case(date(2024, 1, 10), date(2024, 4, 10), 3)]
    #[case(date(2024, 1, 10), date(2025, 1, 10), 12)]
    #[case(date(2024, 1, 31), date(2024, 2, 28), 0)]
    #[case(date(2024, 1, 31), date(2024, 3, 31), 2)]
    #[case(date(2023, 11, 15), date(2024, 2, 14), 2)]
    #[case(date(2024, 2, 10), date(2024, 1, 10), 0)]
    fn test_whole_months_between(
        #[case] from: NaiveDate,
        #[case] to: NaiveDate,
        #[case] expected: u32,
    ) {
        assert_eq!(whole_months_between(from, to), expected);
    }
}
