//! Installment schedule generation and the reconciliation projection.

use advoga_shared::types::{ClientId, InstallmentId};
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::surcharge::{Surcharge, SurchargePolicy, late_surcharge};
use super::types::{PaymentPlan, PlanSummary};

/// Errors surfaced when materializing a plan into dated installments.
///
/// Generation happens at contract save time; a plan still being drafted
/// never reaches this code path.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The plan has no entrada and no installments to generate.
    #[error("Plan has no payable items")]
    EmptyPlan,

    /// The entrada has no due date yet.
    #[error("Upfront payment has no due date")]
    MissingUpfrontDueDate,

    /// A non-empty group has no start date yet.
    #[error("Group {0} has no start date")]
    MissingStartDate(u32),

    /// Stepping a start date by months left the calendar range.
    #[error("Due date out of calendar range for group {0}")]
    DateOutOfRange(u32),
}

/// One generated (or persisted) installment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// Row identifier.
    pub id: InstallmentId,
    /// Owning client record.
    pub client_id: ClientId,
    /// 1-based position in the schedule (the entrada comes first).
    pub number: u32,
    /// Display label: "Entrada" or the group description.
    pub description: String,
    /// Date the installment falls due.
    pub due_date: NaiveDate,
    /// Amount owed before surcharges.
    pub base_value: Decimal,
    /// Whether a payment has been recorded.
    pub paid: bool,
    /// Date the payment was recorded, when paid.
    pub paid_date: Option<NaiveDate>,
}

/// Display status of an installment.
///
/// Precedence is paid > late > pending: an installment settled after its
/// due date reports as paid, never late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    /// A payment has been recorded.
    Paid,
    /// Unpaid and past its due date.
    Late,
    /// Unpaid and not yet due.
    Pending,
}

impl Installment {
    /// Records a payment against this installment.
    pub fn record_payment(&mut self, paid_date: NaiveDate) {
        self.paid = true;
        self.paid_date = Some(paid_date);
    }

    /// Clears a mistakenly recorded payment.
    pub fn clear_payment(&mut self) {
        self.paid = false;
        self.paid_date = None;
    }

    /// Status as of a reference date.
    #[must_use]
    pub fn status(&self, as_of: NaiveDate) -> InstallmentStatus {
        if self.paid {
            InstallmentStatus::Paid
        } else if as_of > self.due_date {
            InstallmentStatus::Late
        } else {
            InstallmentStatus::Pending
        }
    }
}

/// Materializes a plan into dated installment rows.
///
/// The entrada, when present, becomes row 1; each group then contributes
/// `count` rows due monthly from its start date. End-of-month dates clamp
/// (Jan 31 steps to Feb 28/29). Groups still being drafted with a zero
/// count contribute nothing.
pub fn generate(plan: &PaymentPlan, client_id: ClientId) -> Result<Vec<Installment>, ScheduleError> {
    let mut rows = Vec::new();
    let mut number = 1u32;

    if let Some(upfront) = &plan.upfront {
        let due_date = upfront
            .due_date
            .ok_or(ScheduleError::MissingUpfrontDueDate)?;
        rows.push(Installment {
            id: InstallmentId::new(),
            client_id,
            number,
            description: "Entrada".to_string(),
            due_date,
            base_value: upfront.value,
            paid: false,
            paid_date: None,
        });
        number += 1;
    }

    for group in &plan.groups {
        if group.count == 0 {
            continue;
        }
        let start = group
            .start_date
            .ok_or(ScheduleError::MissingStartDate(group.order))?;
        for step in 0..group.count {
            let due_date = start
                .checked_add_months(Months::new(step))
                .ok_or(ScheduleError::DateOutOfRange(group.order))?;
            rows.push(Installment {
                id: InstallmentId::new(),
                client_id,
                number,
                description: group.description.clone(),
                due_date,
                base_value: group.installment_value,
                paid: false,
                paid_date: None,
            });
            number += 1;
        }
    }

    if rows.is_empty() {
        return Err(ScheduleError::EmptyPlan);
    }
    Ok(rows)
}

/// Regenerates the schedule after the plan's payment terms changed.
///
/// Equivalent to [`generate`]; callers replace the previously persisted
/// rows wholesale, so payments recorded against the old rows are lost.
pub fn regenerate(
    plan: &PaymentPlan,
    client_id: ClientId,
) -> Result<Vec<Installment>, ScheduleError> {
    generate(plan, client_id)
}

/// One schedule row with its derived display state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentView {
    /// Row position.
    pub number: u32,
    /// Display label.
    pub description: String,
    /// Due date.
    pub due_date: NaiveDate,
    /// Amount owed before surcharges.
    pub base_value: Decimal,
    /// Paid / late / pending badge.
    pub status: InstallmentStatus,
    /// Recorded payment date, when paid.
    pub paid_date: Option<NaiveDate>,
    /// Juros/multa applied to the row; zero unless it is late.
    pub surcharge: Surcharge,
}

/// Display-ready projection of a plan against its recorded payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReconciliation {
    /// Monetary summary vs the contract value (advisory validity and gap).
    pub summary: PlanSummary,
    /// Per-installment rows in schedule order.
    pub rows: Vec<InstallmentView>,
    /// Sum of base values with a recorded payment.
    pub total_paid: Decimal,
    /// Sum of amounts still owed, surcharges included.
    pub total_outstanding: Decimal,
}

/// Projects the schedule against recorded payments.
///
/// Pure projection: never writes back. Late rows carry the surcharge owed
/// under `policy` as of the reference date.
#[must_use]
pub fn reconcile(
    plan: &PaymentPlan,
    contract_value: Decimal,
    installments: &[Installment],
    policy: &SurchargePolicy,
    as_of: NaiveDate,
) -> PlanReconciliation {
    let summary = plan.summary(contract_value);
    let mut total_paid = Decimal::ZERO;
    let mut total_outstanding = Decimal::ZERO;

    let rows = installments
        .iter()
        .map(|installment| {
            let status = installment.status(as_of);
            let surcharge = if status == InstallmentStatus::Late {
                late_surcharge(installment.due_date, installment.base_value, as_of, policy)
            } else {
                Surcharge::none(installment.base_value)
            };
            match status {
                InstallmentStatus::Paid => total_paid += installment.base_value,
                InstallmentStatus::Late | InstallmentStatus::Pending => {
                    total_outstanding += surcharge.total;
                }
            }
            InstallmentView {
                number: installment.number,
                description: installment.description.clone(),
                due_date: installment.due_date,
                base_value: installment.base_value,
                status,
                paid_date: installment.paid_date,
                surcharge,
            }
        })
        .collect();

    PlanReconciliation {
        summary,
        rows,
        total_paid,
        total_outstanding,
    }
}
