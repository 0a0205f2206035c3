//! Payment-plan data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upfront payment (entrada) preceding the recurring installment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpfrontPayment {
    /// Amount paid up front.
    pub value: Decimal,
    /// Due date; unset while the plan is still being drafted.
    pub due_date: Option<NaiveDate>,
}

/// An ordered batch of installments sharing a count, per-installment value,
/// and start date (grupo de parcelas).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentGroup {
    /// Position in the plan, kept dense 1..N.
    pub order: u32,
    /// Free-form label shown on the schedule.
    pub description: String,
    /// Number of installments in this group.
    pub count: u32,
    /// Value of each installment.
    pub installment_value: Decimal,
    /// Due date of the first installment; unset while drafting.
    pub start_date: Option<NaiveDate>,
}

impl InstallmentGroup {
    /// Creates an empty group at the given position.
    #[must_use]
    pub const fn empty(order: u32) -> Self {
        Self {
            order,
            description: String::new(),
            count: 0,
            installment_value: Decimal::ZERO,
            start_date: None,
        }
    }

    /// Total value of this group (count x per-installment value).
    #[must_use]
    pub fn total(&self) -> Decimal {
        Decimal::from(self.count) * self.installment_value
    }
}

/// A client's payment plan: optional entrada plus ordered installment groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPlan {
    /// Optional upfront payment.
    pub upfront: Option<UpfrontPayment>,
    /// Installment groups, held in `order` sequence.
    pub groups: Vec<InstallmentGroup>,
}

/// Direction for [`PaymentPlan::move_group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Toward the start of the plan.
    Up,
    /// Toward the end of the plan.
    Down,
}

/// Single-field update applied by [`PaymentPlan::update_group`].
///
/// No cross-field validation happens at update time; an inconsistent value
/// only surfaces through [`PaymentPlan::summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupPatch {
    /// Replace the description.
    Description(String),
    /// Replace the installment count.
    Count(u32),
    /// Replace the per-installment value.
    InstallmentValue(Decimal),
    /// Replace or clear the start date.
    StartDate(Option<NaiveDate>),
}

/// Monetary summary of a plan measured against its contract value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Total number of recurring installments (the entrada never counts).
    pub total_installments: u32,
    /// Entrada plus the value of every group.
    pub plan_total: Decimal,
    /// Whether the plan total matches the contract value within tolerance.
    ///
    /// Advisory only: the UI shows a warning but saving is never blocked.
    pub is_valid: bool,
    /// Absolute gap between plan total and contract value; the display
    /// layer surfaces it only when the plan is out of balance.
    pub difference: Decimal,
}
